use glam::{Mat4, Vec3, Vec4};

use crate::error::{RasterError, Result};

/// World transform shared by entities and cameras.
///
/// Column-major 4x4 matrix. Operations post-multiply, so they apply in the
/// object's local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Mat4::IDENTITY }
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self { matrix }
    }
}

fn checked_unit(axis: Vec4, scale: f32, name: &str) -> Result<Vec3> {
    if scale.abs() <= f32::EPSILON {
        return Err(RasterError::DivideByZero(format!("{name} scale = {scale}")));
    }
    Ok(axis.truncate() / scale)
}

impl Transform {
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    pub fn translate(&mut self, translation: Vec3) -> &mut Self {
        self.matrix *= Mat4::from_translation(translation);
        self
    }

    pub fn scale(&mut self, scale: Vec3) -> &mut Self {
        self.matrix *= Mat4::from_scale(scale);
        self
    }

    /// Rotate around the local x, then y, then z axis (radians).
    pub fn rotate_euler(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix *= Mat4::from_rotation_x(x);
        self.matrix *= Mat4::from_rotation_y(y);
        self.matrix *= Mat4::from_rotation_z(z);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.matrix.w_axis = position.extend(1.0);
        self
    }

    /// Length of each basis column.
    pub fn scale_factors(&self) -> Vec3 {
        Vec3::new(
            self.matrix.x_axis.truncate().length(),
            self.matrix.y_axis.truncate().length(),
            self.matrix.z_axis.truncate().length(),
        )
    }

    /// Rescale so each axis ends up with the given length.
    pub fn set_scale(&mut self, scale: Vec3) -> Result<&mut Self> {
        let current = self.scale_factors();
        if current.cmple(Vec3::splat(f32::EPSILON)).any() {
            return Err(RasterError::DivideByZero(format!("scale = {current}")));
        }
        Ok(self.scale(scale / current))
    }

    pub fn rightward(&self) -> Result<Vec3> {
        checked_unit(self.matrix.x_axis, self.scale_factors().x, "x")
    }

    pub fn leftward(&self) -> Result<Vec3> {
        Ok(-self.rightward()?)
    }

    pub fn upward(&self) -> Result<Vec3> {
        checked_unit(self.matrix.y_axis, self.scale_factors().y, "y")
    }

    pub fn downward(&self) -> Result<Vec3> {
        Ok(-self.upward()?)
    }

    /// Local +z axis, normalized.
    pub fn forward(&self) -> Result<Vec3> {
        checked_unit(self.matrix.z_axis, self.scale_factors().z, "z")
    }

    pub fn backward(&self) -> Result<Vec3> {
        Ok(-self.forward()?)
    }

    /// Rotation-only matrix built from the normalized basis, for transforming directions.
    pub fn rotation(&self) -> Result<Mat4> {
        Ok(Mat4::from_cols(
            self.rightward()?.extend(0.0),
            self.upward()?.extend(0.0),
            self.forward()?.extend(0.0),
            Vec4::W,
        ))
    }

    pub fn to_world_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}
