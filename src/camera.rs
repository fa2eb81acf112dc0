use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::transform::Transform;

/// Viewer: a world transform plus a projection into clip space.
///
/// Projections follow the OpenGL convention (view looks down local -z, NDC depth in
/// `[-1, 1]`), so the camera's `forward` axis points away from what it sees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    projection: Mat4,
}

impl Camera {
    pub fn new(transform: Transform, projection: Mat4) -> Self {
        Self { transform, projection }
    }

    /// Perspective camera; `fov_y` is in radians.
    pub fn perspective(transform: Transform, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(transform, Mat4::perspective_rh_gl(fov_y, aspect, near, far))
    }

    /// Orthographic camera covering `[-half_width, half_width] x [-half_height, half_height]`.
    pub fn orthographic(transform: Transform, half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self::new(
            transform,
            Mat4::orthographic_rh_gl(-half_width, half_width, -half_height, half_height, near, far),
        )
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Inverse of the camera's own transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn forward(&self) -> Result<Vec3> {
        self.transform.forward()
    }
}
