/// Per-solid thumbnail views
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::composer::PlacedSolid;
use crate::config::{CameraConfig, IconConfig};
use crate::navigation::SolidLink;
use crate::projection::Camera;
use crate::scene::{Environment, Mesh};

/// An isolated scene showing one solid, framed to fit a square viewport
#[derive(Debug, Clone)]
pub struct IconView {
    pub name: String,
    pub environment: Environment,
    /// Independent copy of the solid, without markers
    pub mesh: Mesh,
    pub camera: Camera,
    /// Side of the square viewport in pixels
    pub size: u32,
    link: SolidLink,
}

impl IconView {
    pub fn objects(&self) -> [&Mesh; 1] {
        [&self.mesh]
    }

    /// Page to open when the icon is clicked
    pub fn link(&self) -> &SolidLink {
        &self.link
    }

    pub fn toggle_wireframe(&mut self) {
        self.mesh.toggle_wireframe();
    }
}

pub fn build_icon(solid: &PlacedSolid, icons: &IconConfig, camera: &CameraConfig) -> IconView {
    let mut mesh = solid.mesh.deep_clone();
    mesh.position = Vector3::zeros();

    let bounds = mesh.world_bounding_box();
    let center = bounds.center();
    let size = bounds.size();
    let max_dimension = size.x.max(size.y).max(size.z);

    let mut view_camera = Camera::perspective(camera.fov, 1.0, camera.near, camera.far);
    view_camera.position = Point3::new(center.x, center.y, max_dimension * 2.0);
    view_camera.target = center;

    debug!(
        solid = %solid.spec.name,
        distance = max_dimension * 2.0,
        "built icon"
    );

    IconView {
        name: solid.spec.name.clone(),
        environment: Environment::new(solid.spec.color),
        mesh,
        camera: view_camera,
        size: icons.size,
        link: SolidLink::new(icons.page.clone(), icons.param.clone(), solid.spec.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{place_solids, MarkerStyle};
    use crate::config::{LayoutConfig, MarkerConfig};
    use crate::registry::default_registry;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn icons() -> (Vec<PlacedSolid>, Vec<IconView>) {
        let markers = MarkerStyle::new(&MarkerConfig::default());
        let solids = place_solids(&default_registry(), &LayoutConfig::default(), &markers);
        let views = solids
            .iter()
            .map(|s| build_icon(s, &IconConfig::default(), &CameraConfig::default()))
            .collect();
        (solids, views)
    }

    #[test]
    fn test_camera_distance_follows_bounding_box() {
        let (solids, views) = icons();
        for (solid, view) in solids.iter().zip(&views) {
            let size = solid.mesh.geometry.bounding_box().unwrap().size();
            let expected = 2.0 * size.x.max(size.y).max(size.z);
            assert_relative_eq!(view.camera.position.z, expected, epsilon = 1e-5);
        }
        // Cube with edge 2 sits at distance 4
        assert_relative_eq!(views[3].camera.position.z, 4.0, epsilon = 1e-5);
        // Distances differ per solid: nothing is hardcoded
        assert!(views[0].camera.position.z > views[2].camera.position.z);
    }

    #[test]
    fn test_icon_scene_is_isolated() {
        let (solids, views) = icons();
        for (solid, view) in solids.iter().zip(&views) {
            assert_eq!(view.environment.background, solid.spec.color);
            assert!(view.environment.lights.is_empty());
            assert!(view.mesh.children.is_empty());
            assert_eq!(view.mesh.position, Vector3::zeros());
            assert!(!Rc::ptr_eq(&view.mesh.geometry, &solid.mesh.geometry));
            assert!(!Rc::ptr_eq(&view.mesh.material, &solid.mesh.material));
            assert_eq!(view.size, 100);
            assert_eq!(view.camera.aspect, 1.0);
        }
    }

    #[test]
    fn test_wireframe_toggle_does_not_reach_main_scene() {
        let (solids, mut views) = icons();
        let before = (*solids[1].mesh.material).clone();
        views[1].toggle_wireframe();
        assert!(!views[1].mesh.material.wireframe);
        assert_eq!(*solids[1].mesh.material, before);
        assert!(solids[1].mesh.material.wireframe);
    }

    #[test]
    fn test_link_carries_solid_name() {
        let (_, views) = icons();
        assert_eq!(views[4].link().to_url(), "solido.html?nome=dodecahedron");
    }
}
