/// Main scene composition: one mesh per registry entry, laid out along x,
/// with a marker sphere at every vertex of the position buffer
use nalgebra::Vector3;
use std::rc::Rc;
use tracing::debug;

use crate::config::{LayoutConfig, MarkerConfig};
use crate::geometry::Geometry;
use crate::primitives;
use crate::registry::SolidSpec;
use crate::scene::{Material, Mesh};

/// Geometry and material shared by every vertex marker in a scene.
///
/// Marker identity is geometry identity: a mesh is a marker exactly when it
/// points at this geometry.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
}

impl MarkerStyle {
    pub fn new(config: &MarkerConfig) -> Self {
        Self {
            geometry: Rc::new(primitives::sphere(
                config.radius,
                config.width_segments,
                config.height_segments,
            )),
            material: Rc::new(Material::basic(config.color)),
        }
    }

    pub fn is_marker(&self, mesh: &Mesh) -> bool {
        Rc::ptr_eq(&mesh.geometry, &self.geometry)
    }

    fn marker_at(&self, local: Vector3<f32>) -> Mesh {
        let mut marker = Mesh::new(Rc::clone(&self.geometry), Rc::clone(&self.material));
        marker.position = local;
        marker
    }
}

/// A registry entry turned into a mesh in the main scene
#[derive(Debug, Clone)]
pub struct PlacedSolid {
    pub spec: SolidSpec,
    /// Carries the solid's name; its children are the vertex markers
    pub mesh: Mesh,
    pub draggable: bool,
}

impl PlacedSolid {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn position(&self) -> Vector3<f32> {
        self.mesh.position
    }

    pub fn marker_count(&self, markers: &MarkerStyle) -> usize {
        self.mesh
            .children
            .iter()
            .filter(|child| markers.is_marker(child))
            .count()
    }
}

/// Attach one marker per vertex triplet, duplicates included.
/// A geometry without positions gets none.
pub fn attach_markers(mesh: &mut Mesh, markers: &MarkerStyle) {
    let Some(position) = mesh.geometry.position.as_ref() else {
        return;
    };
    let vertices: Vec<Vector3<f32>> = position
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect();
    for vertex in vertices {
        mesh.add(markers.marker_at(vertex));
    }
}

pub fn place_solids(
    specs: &[SolidSpec],
    layout: &LayoutConfig,
    markers: &MarkerStyle,
) -> Vec<PlacedSolid> {
    let mut x = layout.start_x;
    let mut placed = Vec::with_capacity(specs.len());

    for spec in specs {
        let mut mesh = Mesh::new(Rc::new(spec.geometry()), Rc::new(spec.material()))
            .with_name(spec.name.clone());
        mesh.position = Vector3::new(x, 0.0, 0.0);
        attach_markers(&mut mesh, markers);

        debug!(
            solid = %spec.name,
            x,
            markers = mesh.children.len(),
            "placed solid"
        );

        placed.push(PlacedSolid {
            spec: spec.clone(),
            mesh,
            draggable: true,
        });
        x += layout.step;
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_registry;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Point3};

    fn compose() -> (Vec<PlacedSolid>, MarkerStyle) {
        let markers = MarkerStyle::new(&MarkerConfig::default());
        let solids = place_solids(&default_registry(), &LayoutConfig::default(), &markers);
        (solids, markers)
    }

    #[test]
    fn test_x_positions_form_sequence() {
        let (solids, _) = compose();
        let xs: Vec<f32> = solids.iter().map(|s| s.position().x).collect();
        assert_eq!(xs, vec![-14.0, -7.0, 0.0, 7.0, 14.0]);
        for solid in &solids {
            assert_eq!(solid.position().y, 0.0);
            assert_eq!(solid.position().z, 0.0);
            assert_eq!(solid.mesh.name, solid.spec.name);
            assert!(solid.draggable);
        }
    }

    #[test]
    fn test_placed_solid_keeps_registry_entry() {
        let (solids, _) = compose();
        for (solid, spec) in solids.iter().zip(default_registry()) {
            assert_eq!(solid.spec, spec);
            assert_eq!(solid.name(), spec.name);
            assert_eq!(solid.mesh.material.color, spec.color);
        }
    }

    #[test]
    fn test_marker_count_matches_position_buffer() {
        let (solids, markers) = compose();
        for solid in &solids {
            let buffer_len = solid.mesh.geometry.position.as_ref().unwrap().len();
            assert_eq!(solid.marker_count(&markers), buffer_len / 3, "{}", solid.name());
            assert_eq!(solid.mesh.children.len(), buffer_len / 3);
        }
        let counts: Vec<usize> = solids.iter().map(|s| s.marker_count(&markers)).collect();
        assert_eq!(counts, vec![60, 24, 12, 24, 108]);
    }

    #[test]
    fn test_markers_share_one_geometry() {
        let (solids, markers) = compose();
        for child in solids.iter().flat_map(|s| &s.mesh.children) {
            assert!(Rc::ptr_eq(&child.geometry, &markers.geometry));
            assert!(Rc::ptr_eq(&child.material, &markers.material));
        }
    }

    #[test]
    fn test_markers_follow_parent_transform() {
        let (mut solids, _) = compose();
        let cube = &mut solids[3];
        cube.mesh.position = Vector3::new(1.0, 2.0, 3.0);

        let first_vertex = cube.mesh.geometry.vertices().next().unwrap();
        let mut world_positions = Vec::new();
        cube.mesh.visit(&Matrix4::identity(), &mut |mesh, world| {
            if mesh.children.is_empty() {
                world_positions.push(world.transform_point(&Point3::origin()));
            }
        });
        assert_relative_eq!(
            world_positions[0],
            first_vertex + Vector3::new(1.0, 2.0, 3.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_missing_positions_skip_markers() {
        let markers = MarkerStyle::new(&MarkerConfig::default());
        let mut mesh = Mesh::new(
            Rc::new(Geometry::empty()),
            Rc::new(Material::basic(crate::color::Rgb::WHITE)),
        );
        attach_markers(&mut mesh, &markers);
        assert!(mesh.children.is_empty());
    }

    #[test]
    fn test_duplicate_vertices_are_not_merged() {
        let markers = MarkerStyle::new(&MarkerConfig::default());
        let spec = &default_registry()[2];
        let solids = place_solids(std::slice::from_ref(spec), &LayoutConfig::default(), &markers);
        // 4 distinct corners, each shared by 3 faces
        assert_eq!(solids[0].mesh.children.len(), 12);
    }
}
