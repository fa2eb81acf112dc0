use glam::Vec3;

/// Inclusive pixel rectangle. Empty when `min > max` on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

// helper methods
impl Rect {
    /// Integer bounding box of projected points, clamped to a `width x height` target.
    pub fn bounding(points: &[Vec3; 3], width: u32, height: u32) -> Rect {
        let min = points[0].min(points[1]).min(points[2]);
        let max = points[0].max(points[1]).max(points[2]);
        Rect {
            min_x: min.x.max(0.0) as i32,
            min_y: min.y.max(0.0) as i32,
            max_x: max.x.min(width as f32 - 1.0) as i32,
            max_y: max.y.min(height as f32 - 1.0) as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Number of columns covered, zero when empty.
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x + 1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1).max(0) as u32
    }
}
