use std::ops::{Add, Mul};

use glam::{Mat4, Vec2, Vec3};

use crate::color::Color;

/// Barycentric weights of a point relative to a triangle `(p0, p1, p2)`.
///
/// `s` weighs `p0`, `t` weighs `p1`, `w` weighs `p2`; they always sum to one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Barycentric {
    pub s: f32,
    pub t: f32,
    pub w: f32,
}

impl Barycentric {
    /// Degenerate (zero area) triangles produce non-finite weights, which
    /// [`Barycentric::is_inside`] rejects.
    #[inline(always)]
    pub fn at(p0: Vec2, p1: Vec2, p2: Vec2, point: Vec2) -> Self {
        let vs1 = p1 - p0;
        let vs2 = p2 - p0;
        let q = point - p0;

        let area = vs1.perp_dot(vs2);
        let t = q.perp_dot(vs2) / area;
        let w = vs1.perp_dot(q) / area;
        Self { s: 1.0 - t - w, t, w }
    }

    #[inline(always)]
    pub fn is_inside(&self) -> bool {
        self.s >= 0.0 && self.t >= 0.0 && self.w >= 0.0 && self.t + self.w <= 1.0
    }

    /// Linear (screen-space) interpolation of a per-vertex attribute.
    #[inline(always)]
    pub fn mix<T>(&self, a: T, b: T, c: T) -> T
    where
        T: Mul<f32, Output = T> + Add<Output = T>,
    {
        a * self.s + b * self.t + c * self.w
    }

    /// Per-channel color interpolation, rounded once at the end.
    #[inline(always)]
    pub fn mix_color(&self, a: Color, b: Color, c: Color) -> Color {
        let channel = |x: u8, y: u8, z: u8| {
            (x as f32 * self.s + y as f32 * self.t + z as f32 * self.w).round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: channel(a.r, b.r, c.r),
            g: channel(a.g, b.g, c.g),
            b: channel(a.b, b.b, c.b),
            a: channel(a.a, b.a, c.a),
        }
    }
}

/// Project a world position to `(pixel x, pixel y, ndc depth)` on a `width x height` target.
///
/// NDC y is flipped so that pixel rows grow downwards.
#[inline(always)]
pub fn world_to_pixel(position: Vec3, width: u32, height: u32, view_projection: &Mat4) -> Vec3 {
    let clip = *view_projection * position.extend(1.0);
    let ndc = clip / clip.w;

    let x = (ndc.x + 1.0) * 0.5 * width as f32;
    let y = (1.0 - ndc.y) * 0.5 * height as f32;
    Vec3::new(x, y, ndc.z)
}

/// Point of segment `a..b` closest to `point`.
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Whether some edge of the triangle passes within one pixel (per axis) of `point`.
pub fn is_near_edge(point: Vec2, corners: &[Vec2; 3]) -> bool {
    let edges = [(corners[0], corners[1]), (corners[1], corners[2]), (corners[2], corners[0])];
    edges.iter().any(|&(a, b)| {
        let d = (closest_point_on_segment(point, a, b) - point).abs();
        d.x <= 1.0 && d.y <= 1.0
    })
}

/// Back-face test: the face is visible only when its normal opposes the view ray.
pub fn should_draw_face(center: Vec3, face_normal: Vec3, view_pos: Vec3) -> bool {
    (center - view_pos).dot(face_normal) < 0.0
}

/// Rejects triangles lying on the far side of the viewer's `forward` axis.
pub fn check_facing_direction(center: Vec3, view_pos: Vec3, forward: Vec3) -> bool {
    (center - view_pos).dot(forward) <= 0.0
}
