use glam::{Vec2, Vec3};

use crate::geometry::Barycentric;
use crate::mesh::Vertex;
use crate::rectangle::Rect;

/// A world-space triangle together with its projected pixel positions.
///
/// `pixels[i]` is `(x, y, ndc depth)` for `vertices[i]`. Built per draw call, never stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub pixels: [Vec3; 3],
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], pixels: [Vec3; 3]) -> Self {
        Self { vertices, pixels }
    }

    pub fn bounds(&self, width: u32, height: u32) -> Rect {
        Rect::bounding(&self.pixels, width, height)
    }

    pub fn screen_points(&self) -> [Vec2; 3] {
        self.pixels.map(|p| p.truncate())
    }

    pub fn weights_at(&self, x: i32, y: i32) -> Barycentric {
        let [a, b, c] = self.screen_points();
        Barycentric::at(a, b, c, Vec2::new(x as f32, y as f32))
    }

    pub fn depth(&self, stw: &Barycentric) -> f32 {
        stw.mix(self.pixels[0].z, self.pixels[1].z, self.pixels[2].z)
    }

    /// Spread of u and v over the three vertices.
    pub fn uv_extent(&self) -> Vec2 {
        let [a, b, c] = self.vertices;
        let u_min = a.u.min(b.u).min(c.u);
        let u_max = a.u.max(b.u).max(c.u);
        let v_min = a.v.min(b.v).min(c.v);
        let v_max = a.v.max(b.v).max(c.v);
        Vec2::new(u_max - u_min, v_max - v_min)
    }
}
