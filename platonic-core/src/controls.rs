/// Camera orbit and object drag controls
use nalgebra::{Point3, Vector2, Vector3};
use std::f32::consts::PI;

use crate::projection::Camera;
use crate::raycast::Ray;

/// Whether the orbit controls accept pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitState {
    #[default]
    Enabled,
    Disabled,
}

/// Orbits the camera around a target on a sphere
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub radius: f32,
    /// Azimuth around +y, zero looks down -z
    pub theta: f32,
    /// Polar angle from +y
    pub phi: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    state: OrbitState,
}

impl OrbitControls {
    /// Controls reproducing the camera's current placement
    pub fn new(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.norm().max(1e-3);
        Self {
            target: camera.target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_radius: 0.5,
            max_radius: 500.0,
            state: OrbitState::Enabled,
        }
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn set_state(&mut self, state: OrbitState) {
        self.state = state;
    }

    pub fn is_enabled(&self) -> bool {
        self.state == OrbitState::Enabled
    }

    /// Rotate by a pointer delta given as a fraction of the viewport
    pub fn rotate(&mut self, delta: Vector2<f32>) {
        if !self.is_enabled() {
            return;
        }
        self.theta -= 2.0 * PI * delta.x * self.rotate_speed;
        self.phi = (self.phi - 2.0 * PI * delta.y * self.rotate_speed).clamp(1e-3, PI - 1e-3);
    }

    /// Positive steps move closer
    pub fn zoom(&mut self, steps: f32) {
        if !self.is_enabled() {
            return;
        }
        let scale = 0.95f32.powf(steps * self.zoom_speed);
        self.radius = (self.radius * scale).clamp(self.min_radius, self.max_radius);
    }

    /// Slide target and camera in the view plane, delta in world units
    pub fn pan(&mut self, camera: &Camera, delta: Vector2<f32>) {
        if !self.is_enabled() {
            return;
        }
        let forward = camera.forward();
        let right = forward.cross(&camera.up).normalize();
        let up = right.cross(&forward);
        self.target += right * -delta.x + up * delta.y;
    }

    /// Write the orbit placement into the camera
    pub fn update(&self, camera: &mut Camera) {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vector3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );
        camera.position = self.target + offset;
        camera.target = self.target;
    }
}

/// Notification emitted by [`DragControls`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start { object: usize },
    Drag { object: usize, position: Vector3<f32> },
    End { object: usize },
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    object: usize,
    plane_point: Point3<f32>,
    plane_normal: Vector3<f32>,
    offset: Vector3<f32>,
}

/// Moves objects on a camera-facing plane through their position
#[derive(Debug, Clone, Default)]
pub struct DragControls {
    active: Option<ActiveDrag>,
}

impl DragControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<usize> {
        self.active.map(|drag| drag.object)
    }

    /// Grab `object` (currently at `position`) where `ray` hit it
    pub fn start(
        &mut self,
        object: usize,
        position: Vector3<f32>,
        ray: &Ray,
        camera: &Camera,
    ) -> Option<DragEvent> {
        if self.active.is_some() {
            return None;
        }
        let plane_point = Point3::from(position);
        let plane_normal = camera.forward();
        let hit = ray.intersect_plane(&plane_point, &plane_normal)?;
        self.active = Some(ActiveDrag {
            object,
            plane_point,
            plane_normal,
            offset: ray.at(hit) - plane_point,
        });
        Some(DragEvent::Start { object })
    }

    /// New position for the dragged object, if any
    pub fn drag(&mut self, ray: &Ray) -> Option<DragEvent> {
        let drag = self.active?;
        let hit = ray.intersect_plane(&drag.plane_point, &drag.plane_normal)?;
        Some(DragEvent::Drag {
            object: drag.object,
            position: (ray.at(hit) - drag.offset).coords,
        })
    }

    pub fn end(&mut self) -> Option<DragEvent> {
        let drag = self.active.take()?;
        Some(DragEvent::End {
            object: drag.object,
        })
    }
}
