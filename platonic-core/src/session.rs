/// The scene session: owns every solid, icon and control and routes
/// pointer input between them
use nalgebra::{Point3, Vector2};
use tracing::{debug, info, trace};

use crate::composer::{place_solids, MarkerStyle, PlacedSolid};
use crate::config::SceneConfig;
use crate::controls::{DragControls, DragEvent, OrbitControls, OrbitState};
use crate::icon::{build_icon, IconView};
use crate::projection::{pointer_to_ndc, Camera};
use crate::raycast::{Intersection, Raycaster};
use crate::scene::{Environment, Mesh};
use crate::tooltip::{hovered_marker, Tooltip};

/// Last pointer position, in pixels and normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub ndc: Vector2<f32>,
}

pub struct SceneSession {
    config: SceneConfig,
    environment: Environment,
    camera: Camera,
    width: f32,
    height: f32,
    markers: MarkerStyle,
    solids: Vec<PlacedSolid>,
    icons: Vec<IconView>,
    orbit: OrbitControls,
    drag: DragControls,
    tooltip: Tooltip,
    pointer: PointerState,
    /// Pixel position of the previous move while orbiting with a pressed pointer
    orbiting: Option<(f32, f32)>,
}

impl SceneSession {
    /// Compose the main scene and one icon per solid for a viewport of
    /// `width` × `height` pixels
    pub fn new(config: SceneConfig, width: f32, height: f32) -> Self {
        let registry = config.registry();
        let markers = MarkerStyle::new(&config.markers);
        let solids = place_solids(&registry, &config.layout, &markers);
        let icons: Vec<IconView> = solids
            .iter()
            .map(|solid| build_icon(solid, &config.icons, &config.camera))
            .collect();

        let mut camera = Camera::perspective(
            config.camera.fov,
            1.0,
            config.camera.near,
            config.camera.far,
        );
        camera.set_viewport(width, height);
        camera.position = Point3::new(0.0, 0.0, config.camera.distance);
        camera.target = Point3::origin();
        let orbit = OrbitControls::new(&camera);

        info!(
            solids = solids.len(),
            icons = icons.len(),
            width,
            height,
            "scene session ready"
        );

        Self {
            config,
            environment: Environment::studio(),
            camera,
            width,
            height,
            markers,
            solids,
            icons,
            orbit,
            drag: DragControls::new(),
            tooltip: Tooltip::new(),
            pointer: PointerState::default(),
            orbiting: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn markers(&self) -> &MarkerStyle {
        &self.markers
    }

    pub fn solids(&self) -> &[PlacedSolid] {
        &self.solids
    }

    pub fn solid(&self, name: &str) -> Option<&PlacedSolid> {
        self.solids.iter().find(|solid| solid.name() == name)
    }

    pub fn icons(&self) -> &[IconView] {
        &self.icons
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn orbit_state(&self) -> OrbitState {
        self.orbit.state()
    }

    /// Top-level objects of the main scene, in registry order
    pub fn objects(&self) -> Vec<&Mesh> {
        self.solids.iter().map(|solid| &solid.mesh).collect()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.camera.set_viewport(width, height);
    }

    /// Every main-scene hit under a pixel, nearest first
    pub fn pick(&self, px: f32, py: f32) -> Vec<Intersection<'_>> {
        let ndc = pointer_to_ndc(px, py, self.width, self.height);
        let raycaster = Raycaster::new(self.camera.ray_from_ndc(ndc));
        raycaster.intersect_objects(self.solids.iter().map(|solid| &solid.mesh), true)
    }

    pub fn pointer_move(&mut self, px: f32, py: f32) {
        self.pointer = PointerState {
            x: px,
            y: py,
            ndc: pointer_to_ndc(px, py, self.width, self.height),
        };

        if self.drag.dragging().is_some() {
            let ray = self.camera.ray_from_ndc(self.pointer.ndc);
            if let Some(event) = self.drag.drag(&ray) {
                self.apply_drag(event);
            }
        } else if let Some((last_x, last_y)) = self.orbiting {
            let delta = Vector2::new((px - last_x) / self.width, (py - last_y) / self.height);
            self.orbit.rotate(delta);
            self.orbiting = Some((px, py));
        }

        self.update_hover();
    }

    /// Press: grab the solid under the pointer, or start orbiting
    pub fn pointer_down(&mut self, px: f32, py: f32) {
        self.pointer = PointerState {
            x: px,
            y: py,
            ndc: pointer_to_ndc(px, py, self.width, self.height),
        };

        let grabbed = self
            .pick(px, py)
            .into_iter()
            .find(|hit| self.solids[hit.root].draggable)
            .map(|hit| hit.root);

        match grabbed {
            Some(index) => {
                let ray = self.camera.ray_from_ndc(self.pointer.ndc);
                let position = self.solids[index].position();
                if let Some(event) = self.drag.start(index, position, &ray, &self.camera) {
                    self.apply_drag(event);
                }
            }
            None if self.orbit.is_enabled() => self.orbiting = Some((px, py)),
            None => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.orbiting = None;
        if let Some(event) = self.drag.end() {
            self.apply_drag(event);
        }
    }

    /// Wheel input, positive moves the camera closer
    pub fn zoom(&mut self, steps: f32) {
        self.orbit.zoom(steps);
    }

    /// Pan by a pixel delta
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let world_per_pixel = 2.0 * self.orbit.radius * (0.5 * self.camera.fov).tan() / self.height;
        self.orbit.pan(
            &self.camera,
            Vector2::new(dx * world_per_pixel, dy * world_per_pixel),
        );
    }

    /// Keyboard rotation, delta as a fraction of a full turn
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.orbit.rotate(Vector2::new(dx, dy));
    }

    /// Link for the icon at `index`
    pub fn icon_link(&self, index: usize) -> Option<String> {
        let icon = self.icons.get(index)?;
        let url = icon.link().to_url();
        info!(solid = %icon.name, %url, "icon clicked");
        Some(url)
    }

    pub fn toggle_icon_wireframes(&mut self) {
        for icon in &mut self.icons {
            icon.toggle_wireframe();
        }
    }

    /// Per-frame camera update from the orbit controls
    pub fn update(&mut self) {
        self.orbit.update(&mut self.camera);
    }

    fn apply_drag(&mut self, event: DragEvent) {
        match event {
            DragEvent::Start { object } => {
                debug!(solid = %self.solids[object].name(), "drag start");
                self.orbit.set_state(OrbitState::Disabled);
                self.orbiting = None;
            }
            DragEvent::Drag { object, position } => {
                self.solids[object].mesh.position = position;
            }
            DragEvent::End { object } => {
                debug!(
                    solid = %self.solids[object].name(),
                    position = ?self.solids[object].position(),
                    "drag end"
                );
                self.orbit.set_state(OrbitState::Enabled);
            }
        }
    }

    fn update_hover(&mut self) {
        let hovered = {
            let hits = self.pick(self.pointer.x, self.pointer.y);
            hovered_marker(&hits, &self.markers, self.config.tooltip.policy).map(|i| {
                trace!(distance = hits[i].distance, hits = hits.len(), "marker hovered");
                hits[i].root
            })
        };
        match hovered {
            Some(_) => {
                let text = self.config.tooltip.text.clone();
                self.tooltip.show(self.pointer.x, self.pointer.y, &text);
            }
            None => self.tooltip.hide(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HoverPolicy;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn session() -> SceneSession {
        let mut session = SceneSession::new(SceneConfig::default(), W, H);
        session.update();
        session
    }

    fn screen_of(session: &SceneSession, world: Vector3<f32>) -> (f32, f32) {
        let (x, y, _) = session
            .camera()
            .project_to_screen(&Point3::from(world), &Matrix4::identity(), W as u32, H as u32)
            .unwrap();
        (x, y)
    }

    #[test]
    fn test_session_owns_all_views() {
        let session = session();
        assert_eq!(session.solids().len(), 5);
        assert_eq!(session.icons().len(), 5);
        assert_eq!(session.orbit_state(), OrbitState::Enabled);
        assert!(!session.tooltip().visible);
        assert!(session.solid("cube").is_some());
        assert_eq!(
            session.icon_link(3).as_deref(),
            Some("solido.html?nome=cube")
        );
        assert_eq!(session.icon_link(9), None);
    }

    #[test]
    fn test_tooltip_over_visible_marker() {
        let mut session = session();
        // Front top-right corner of the cube at x = 7
        let (x, y) = screen_of(&session, Vector3::new(8.0, 1.0, 1.0));
        session.pointer_move(x, y);

        let tooltip = session.tooltip();
        assert!(tooltip.visible);
        assert_eq!(tooltip.text, "Inserir aqui");
        assert_eq!((tooltip.x, tooltip.y), (x, y));
        assert_relative_eq!(session.pointer().ndc.x, x / W * 2.0 - 1.0);
    }

    #[test]
    fn test_tooltip_hidden_over_face_and_empty_space() {
        let mut session = session();
        let (x, y) = screen_of(&session, Vector3::new(8.0, 1.0, 1.0));
        session.pointer_move(x, y);
        assert!(session.tooltip().visible);

        let (x, y) = screen_of(&session, Vector3::new(7.0, 0.3, 1.0));
        session.pointer_move(x, y);
        assert!(!session.tooltip().visible);

        session.pointer_move(x, y);
        session.pointer_move(5.0, 5.0);
        assert!(session.pick(5.0, 5.0).is_empty());
        assert!(!session.tooltip().visible);
    }

    #[test]
    fn test_occluded_marker_depends_on_policy() {
        let back_corner = Vector3::new(8.0, 1.0, -1.0);

        let mut nearest = session();
        let (x, y) = screen_of(&nearest, back_corner);
        nearest.pointer_move(x, y);
        assert!(!nearest.tooltip().visible);

        let mut config = SceneConfig::default();
        config.tooltip.policy = HoverPolicy::FirstMarker;
        let mut see_through = SceneSession::new(config, W, H);
        see_through.update();
        see_through.pointer_move(x, y);
        assert!(see_through.tooltip().visible);
    }

    #[test]
    fn test_drag_toggles_orbit_and_moves_solid() {
        let mut session = session();
        let (x, y) = screen_of(&session, Vector3::new(7.0, 0.0, 0.0));
        session.pointer_down(x, y);
        assert_eq!(session.orbit_state(), OrbitState::Disabled);

        let camera_before = session.camera().clone();
        let (x, y) = screen_of(&session, Vector3::new(3.0, 2.0, 0.0));
        session.pointer_move(x, y);
        session.update();
        assert_eq!(session.orbit_state(), OrbitState::Disabled);
        assert_eq!(*session.camera(), camera_before);

        session.pointer_up();
        assert_eq!(session.orbit_state(), OrbitState::Enabled);

        let cube = session.solid("cube").unwrap();
        assert_relative_eq!(cube.position(), Vector3::new(3.0, 2.0, 0.0), epsilon = 1e-3);
        // Markers ride along as children
        let mut first_marker = None;
        cube.mesh.visit(&Matrix4::identity(), &mut |mesh, world| {
            if first_marker.is_none() && session.markers().is_marker(mesh) {
                first_marker = Some(world.transform_point(&Point3::origin()));
            }
        });
        assert_relative_eq!(
            first_marker.unwrap(),
            Point3::new(4.0, 3.0, 1.0),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_grabbing_a_marker_drags_its_solid() {
        let mut session = session();
        let (x, y) = screen_of(&session, Vector3::new(8.0, 1.0, 1.0));
        session.pointer_down(x, y);
        assert_eq!(session.orbit_state(), OrbitState::Disabled);
        let (x2, y2) = screen_of(&session, Vector3::new(8.0, -2.0, 1.0));
        session.pointer_move(x2, y2);
        session.pointer_up();
        assert!(session.solid("cube").unwrap().position().y < -1.0);
        assert_eq!(session.solid("tetrahedron").unwrap().position(), Vector3::zeros());
    }

    #[test]
    fn test_orbit_state_over_gesture_sequences() {
        let mut session = session();
        let on_cube = screen_of(&session, Vector3::new(7.0, 0.0, 0.0));
        let on_tetra = screen_of(&session, Vector3::new(0.0, 0.0, 0.0));

        // Release without a press, press on nothing, repeated drags
        session.pointer_up();
        assert_eq!(session.orbit_state(), OrbitState::Enabled);
        session.pointer_down(5.0, 5.0);
        assert_eq!(session.orbit_state(), OrbitState::Enabled);
        session.pointer_up();

        for target in [on_cube, on_tetra, on_cube] {
            session.pointer_down(target.0, target.1);
            assert_eq!(session.orbit_state(), OrbitState::Disabled);
            session.pointer_move(target.0 + 3.0, target.1);
            assert_eq!(session.orbit_state(), OrbitState::Disabled);
            session.pointer_up();
            assert_eq!(session.orbit_state(), OrbitState::Enabled);
            session.pointer_up();
            assert_eq!(session.orbit_state(), OrbitState::Enabled);
        }
    }

    #[test]
    fn test_pointer_drag_on_empty_space_orbits() {
        let mut session = session();
        let before = session.camera().position;
        session.pointer_down(5.0, 5.0);
        session.pointer_move(105.0, 5.0);
        session.pointer_up();
        session.update();
        assert!((session.camera().position - before).norm() > 1.0);
        assert_eq!(session.solid("cube").unwrap().position().x, 7.0);
    }

    #[test]
    fn test_icon_wireframe_isolated_from_main_scene() {
        let mut session = session();
        session.toggle_icon_wireframes();
        for (solid, icon) in session.solids().iter().zip(session.icons()) {
            assert!(!icon.mesh.material.wireframe);
            assert!(solid.mesh.material.wireframe);
        }
    }
}
