use std::path::Path;

use glam::Vec2;

use crate::color::Color;
use crate::error::{RasterError, Result};

/// Row-major 2D color buffer with its origin at the top-left corner.
///
/// Used both for material textures and as a render target. Cloning copies the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

#[inline(always)]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

impl Texture {
    /// Create a black texture.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::BLACK)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyTexture { width, height });
        }
        Ok(Self { width, height, pixels: vec![color; width as usize * height as usize] })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyTexture { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RasterError::PixelCountMismatch { expected, found: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Decode any format the `image` crate understands.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels: Vec<Color> = bytemuck::cast_slice(rgba.as_raw()).to_vec();
        Self::from_pixels(width, height, pixels)
    }

    /// Write the buffer out as an RGBA image, format picked from the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(path, self.as_bytes(), self.width, self.height, image::ColorType::Rgba8)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Raw RGBA bytes, 4 per pixel, for blitting to a display.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::PixelOutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<Color> {
        let i = self.index(x, y)?;
        Ok(self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let i = self.index(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Nearest texel for `(u, v)`. Coordinates wrap, so `1.25` samples like `0.25`.
    pub fn sample_nearest(&self, u: f32, v: f32) -> Result<Color> {
        let u = u - u.floor();
        let v = v - v.floor();
        // `round` can land on `width` for u close to 1
        let x = ((u * self.width as f32).round() as u32).min(self.width - 1);
        let y = ((v * self.height as f32).round() as u32).min(self.height - 1);
        self.pixel(x, y)
    }

    /// Bilinear sample around the fractional texel position `(x, y)`.
    ///
    /// `delta_ratio` is the size of the destination this texture is being mapped onto:
    /// the sampling footprint is `texture size / delta_ratio` texels per destination
    /// pixel. Half of that footprint is spread around the sample point, the box is
    /// clamped to the texture and its four corner texels are interpolated. A zero
    /// footprint degrades to plain bilinear filtering between the neighbouring texels.
    pub fn sample_bilinear(&self, x: f32, y: f32, delta_ratio: Vec2) -> Color {
        let size = Vec2::new(self.width as f32, self.height as f32);
        let footprint = size / delta_ratio;
        let half = Vec2::new(finite_or_zero(footprint.x), finite_or_zero(footprint.y)) * 0.5;

        let point = Vec2::new(x, y);
        let last = size - Vec2::ONE;
        let min = (point - half).floor().clamp(Vec2::ZERO, last);
        let max = (point + half).ceil().clamp(Vec2::ZERO, last);

        let (x0, y0) = (min.x as usize, min.y as usize);
        let (x1, y1) = (max.x as usize, max.y as usize);
        let w = self.width as usize;
        let corners = [
            self.pixels[y0 * w + x0],
            self.pixels[y0 * w + x1],
            self.pixels[y1 * w + x0],
            self.pixels[y1 * w + x1],
        ];

        Color::bilerp(corners, point, min, max)
    }
}
