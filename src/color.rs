use std::ops::{Add, AddAssign, Div, Mul, MulAssign};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// RGBA color, 8 bits per channel.
///
/// Arithmetic never wraps: every operator clamps each channel to `0..=255`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[inline(always)]
fn channel(value: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    value.clamp(0.0, 255.0) as u8
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build a color from float channels, clamping each to `0..=255`.
    pub fn from_rgb_vec(rgb: Vec3, a: u8) -> Self {
        Self { r: channel(rgb.x), g: channel(rgb.y), b: channel(rgb.z), a }
    }

    pub fn rgb_vec(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    pub fn is_opaque(self) -> bool {
        self.a == u8::MAX
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Per-channel linear interpolation, `t = 0` gives `a` and `t = 1` gives `b`.
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        let mix = |from: u8, to: u8| channel(from as f32 + (to as f32 - from as f32) * t);
        Color {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: mix(a.a, b.a),
        }
    }

    /// Bilinear interpolation between four corner colors.
    ///
    /// `corners` is ordered `[(min.x, min.y), (max.x, min.y), (min.x, max.y), (max.x, max.y)]`.
    /// The point is clamped into the `min..=max` box first; a degenerate axis uses
    /// the `min` side only.
    pub fn bilerp(corners: [Color; 4], point: Vec2, min: Vec2, max: Vec2) -> Color {
        let point = point.clamp(min, max);
        let delta = max - min;

        let tx = if delta.x != 0.0 { (point.x - min.x) / delta.x } else { 0.0 };
        let top = Color::lerp(corners[0], corners[1], tx);
        let bottom = Color::lerp(corners[2], corners[3], tx);

        let ty = if delta.y != 0.0 { (point.y - min.y) / delta.y } else { 0.0 };
        Color::lerp(top, bottom, ty)
    }

    /// Source-over compositing of `self` onto `dest`, weighted by the source alpha.
    /// The result is always fully opaque.
    pub fn blend(self, dest: Color) -> Color {
        let alpha = self.a as f32 / 255.0;
        let over = |src: u8, dst: u8| channel((src as f32 * alpha + dst as f32 * (1.0 - alpha)).round());
        Color {
            r: over(self.r, dest.r),
            g: over(self.g, dest.g),
            b: over(self.b, dest.b),
            a: u8::MAX,
        }
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, other: Color) -> Color {
        Color {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a.saturating_add(other.a),
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, scalar: f32) -> Color {
        Color {
            r: channel(self.r as f32 * scalar),
            g: channel(self.g as f32 * scalar),
            b: channel(self.b as f32 * scalar),
            a: channel(self.a as f32 * scalar),
        }
    }
}

/// Scales the color channels only, alpha is untouched.
impl Mul<Vec3> for Color {
    type Output = Color;
    fn mul(self, scale: Vec3) -> Color {
        Color {
            r: channel(self.r as f32 * scale.x),
            g: channel(self.g as f32 * scale.y),
            b: channel(self.b as f32 * scale.z),
            a: self.a,
        }
    }
}

/// Modulation, `255` acts as identity.
impl Mul for Color {
    type Output = Color;
    fn mul(self, other: Color) -> Color {
        let modulate = |a: u8, b: u8| (a as u16 * b as u16 / 255) as u8;
        Color {
            r: modulate(self.r, other.r),
            g: modulate(self.g, other.g),
            b: modulate(self.b, other.b),
            a: modulate(self.a, other.a),
        }
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, other: Color) {
        *self = *self * other;
    }
}

impl Div<f32> for Color {
    type Output = Color;
    fn div(self, scalar: f32) -> Color {
        Color {
            r: channel(self.r as f32 / scalar),
            g: channel(self.g as f32 / scalar),
            b: channel(self.b as f32 / scalar),
            a: channel(self.a as f32 / scalar),
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color { r, g, b, a }
    }
}
