/// Camera, projection and picking rays
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

use crate::raycast::Ray;

/// Perspective camera for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Perspective camera with the field of view given in degrees
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::y(),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `x`/`y` in pixels (origin top-left) and
    /// depth in normalized device units, or `None` when the point falls
    /// outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or on its plane
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&depth)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }

    /// Picking ray through a point in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Ray {
        let forward = self.forward();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);

        let half_h = (0.5 * self.fov).tan();
        let half_w = half_h * self.aspect;
        let direction = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
        Ray::new(self.position, direction)
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height > 0.0 {
        width / height
    } else {
        1.0
    }
}

/// Pixel position inside a viewport to normalized device coordinates:
/// x grows right, y grows up, both in `[-1, 1]`
pub fn pointer_to_ndc(px: f32, py: f32, width: f32, height: f32) -> Vector2<f32> {
    Vector2::new((px / width) * 2.0 - 1.0, -(py / height) * 2.0 + 1.0)
}
