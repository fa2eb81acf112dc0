//! The rendering pipeline.
//!
//! A frame goes through these steps:
//!
//! 1. Clear the active buffer (the target, or a `(W+1)*S x (H+1)*S` supersample
//!    buffer when the sample count `S` is above one) to black and reset depth.
//! 2. Draw opaque entities in scene order, then every non-opaque entity in scene
//!    order. Transparent entities are not depth sorted against each other.
//! 3. Per entity: move vertices and normals to world space, project them, cull
//!    back faces and triangles behind the viewer, scan-convert what is left.
//! 4. Downsample the supersample buffer into the target with a bilinear filter.
//!
//! Attributes (depth, color, uv, position, normal) are interpolated linearly in
//! screen space. This is not perspective-correct, so textures swim slightly on
//! surfaces at a steep angle to the camera.

use std::str::FromStr;

use glam::{Vec2, Vec3};
use log::{debug, trace, warn};
use serde::Deserialize;

use crate::camera::Camera;
use crate::color::Color;
use crate::depth::DepthBuffer;
use crate::error::{RasterError, Result};
use crate::geometry::{check_facing_direction, is_near_edge, should_draw_face, world_to_pixel};
use crate::light::{Light, Lighting, SurfacePoint};
use crate::mesh::{Mesh, Vertex};
use crate::scene::{Entity, Scene};
use crate::texture::Texture;
use crate::triangle::Triangle;

/// How triangles are scan-converted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DrawMode {
    #[default]
    Fill,
    /// Only pixels within one pixel of a triangle edge.
    Wireframe,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Fill => DrawMode::Wireframe,
            DrawMode::Wireframe => DrawMode::Fill,
        }
    }
}

impl FromStr for DrawMode {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fill" => Ok(DrawMode::Fill),
            "wireframe" | "wire_frame" => Ok(DrawMode::Wireframe),
            _ => Err(RasterError::InvalidDrawMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for DrawMode {
    type Error = RasterError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// How the texture is read for a covered pixel.
#[derive(Debug, Copy, Clone)]
enum TexelFilter {
    Nearest,
    /// Bilinear with a footprint, see [`Texture::sample_bilinear`].
    Footprint(Vec2),
}

/// Everything a triangle needs while the frame is being drawn.
struct Frame<'a> {
    target: &'a mut Texture,
    depth: &'a mut DepthBuffer,
    lights: &'a [Light],
    lighting: Lighting,
    view_pos: Vec3,
}

/// CPU rasterizer. Owns the depth buffer, which is reset at the start of every frame.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    sample_count: u8,
    draw_mode: DrawMode,
    lighting: Lighting,
    depth: DepthBuffer,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            sample_count: 1,
            draw_mode: DrawMode::default(),
            lighting: Lighting::default(),
            depth: DepthBuffer::default(),
        }
    }
}

impl Rasterizer {
    /// `sample_count` is the supersampling factor per axis; 1 renders straight into the target.
    pub fn new(sample_count: u8) -> Result<Self> {
        if sample_count == 0 {
            return Err(RasterError::InvalidSampleCount(sample_count));
        }
        Ok(Self { sample_count, ..Self::default() })
    }

    pub fn with_draw_mode(mut self, draw_mode: DrawMode) -> Self {
        self.draw_mode = draw_mode;
        self
    }

    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn sample_count(&self) -> u8 {
        self.sample_count
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn lighting(&self) -> Lighting {
        self.lighting
    }

    pub fn toggle_wireframe_mode(&mut self) {
        self.draw_mode = self.draw_mode.toggled();
    }

    /// Depth values of the last rendered buffer (the supersample buffer when `S > 1`).
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Render `scene` as seen by `camera` into `target`, overwriting all of it.
    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera, target: &mut Texture) -> Result<()> {
        if self.sample_count == 1 {
            return self.draw_scene(scene, camera, target);
        }

        let s = self.sample_count as u32;
        let mut supersampled = Texture::new((target.width() + 1) * s, (target.height() + 1) * s)?;
        self.draw_scene(scene, camera, &mut supersampled)?;
        resolve(&supersampled, target, s)
    }

    fn draw_scene(&mut self, scene: &Scene, camera: &Camera, buffer: &mut Texture) -> Result<()> {
        buffer.fill(Color::BLACK);
        self.depth.reset(buffer.width(), buffer.height());

        let forward = camera.forward()?;
        let draw_mode = self.draw_mode;
        let mut frame = Frame {
            target: buffer,
            depth: &mut self.depth,
            lights: scene.lights(),
            lighting: self.lighting,
            view_pos: camera.position(),
        };

        let mut deferred: Vec<(&Entity, &Mesh)> = Vec::new();
        for entity in scene.entities() {
            let Some(mesh) = scene.mesh(entity.mesh()) else {
                warn!("entity refers to unknown mesh {:?}, skipping", entity.mesh());
                continue;
            };
            if entity.is_opaque(mesh) {
                draw_entity(&mut frame, draw_mode, camera, forward, scene, entity, mesh)?;
            } else {
                deferred.push((entity, mesh));
            }
        }

        debug!(
            "frame {}x{}: {} entities ({} transparent), {} lights",
            frame.target.width(),
            frame.target.height(),
            scene.entities().len(),
            deferred.len(),
            frame.lights.len()
        );

        for (entity, mesh) in deferred {
            draw_entity(&mut frame, draw_mode, camera, forward, scene, entity, mesh)?;
        }
        Ok(())
    }
}

/// Downsample `source` into `target`, one bilinear tap at the centre of each `s x s` block.
fn resolve(source: &Texture, target: &mut Texture, s: u32) -> Result<()> {
    let delta = Vec2::new(target.width() as f32, target.height() as f32);
    let s = s as f32;
    for y in 0..target.height() {
        for x in 0..target.width() {
            let sx = s * x as f32 + s * 0.5;
            let sy = s * y as f32 + s * 0.5;
            target.set_pixel(x, y, source.sample_bilinear(sx, sy, delta))?;
        }
    }
    Ok(())
}

fn draw_entity(
    frame: &mut Frame,
    draw_mode: DrawMode,
    camera: &Camera,
    forward: Vec3,
    scene: &Scene,
    entity: &Entity,
    mesh: &Mesh,
) -> Result<()> {
    let transform = entity.transform.matrix();
    let rotation = entity.rotation()?;
    let transparency = entity.transparency();
    // Model transform is baked into the vertices below
    let view_projection = camera.view_projection();
    let (width, height) = (frame.target.width(), frame.target.height());

    let texture = mesh.texture().and_then(|id| {
        let texture = scene.texture(id);
        if texture.is_none() {
            warn!("mesh refers to unknown texture {:?}, drawing untextured", id);
        }
        texture
    });

    let vertices: Vec<Vertex> = mesh
        .vertices()
        .iter()
        .map(|v| Vertex {
            position: transform.transform_point3(v.position),
            normal: rotation.transform_vector3(v.normal),
            color: v.color.with_alpha((v.color.a as f32 * transparency) as u8),
            ..*v
        })
        .collect();

    let pixels: Vec<Vec3> = vertices
        .iter()
        .map(|v| world_to_pixel(v.position, width, height, &view_projection))
        .collect();

    let mut drawn = 0usize;
    for (tri, normal) in mesh.indices().chunks_exact(3).zip(mesh.normals()) {
        let face_normal = rotation.transform_vector3(*normal);
        let corners = [vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]];
        let center = (corners[0].position + corners[1].position + corners[2].position) / 3.0;

        if should_draw_face(center, face_normal, frame.view_pos)
            && check_facing_direction(center, frame.view_pos, forward)
        {
            let triangle = Triangle::new(corners, [pixels[tri[0]], pixels[tri[1]], pixels[tri[2]]]);
            draw_triangle(draw_mode, frame, &triangle, texture)?;
            drawn += 1;
        }
    }

    trace!("entity {:?}: drew {} of {} triangles", entity.mesh(), drawn, mesh.triangle_count());
    Ok(())
}

fn draw_triangle(mode: DrawMode, frame: &mut Frame, triangle: &Triangle, texture: Option<&Texture>) -> Result<()> {
    match mode {
        DrawMode::Fill => fill_triangle(frame, triangle, texture),
        DrawMode::Wireframe => wireframe_triangle(frame, triangle, texture),
    }
}

fn fill_triangle(frame: &mut Frame, triangle: &Triangle, texture: Option<&Texture>) -> Result<()> {
    scan_triangle(frame, triangle, texture, TexelFilter::Nearest, |_| true)
}

fn wireframe_triangle(frame: &mut Frame, triangle: &Triangle, texture: Option<&Texture>) -> Result<()> {
    let bounds = triangle.bounds(frame.target.width(), frame.target.height());
    let extent = Vec2::new((bounds.max_x - bounds.min_x) as f32, (bounds.max_y - bounds.min_y) as f32);
    // Texels per pixel is `texture size * uv extent / extent`
    let delta_ratio = extent / triangle.uv_extent();
    let corners = triangle.screen_points();

    scan_triangle(frame, triangle, texture, TexelFilter::Footprint(delta_ratio), |pixel| {
        is_near_edge(pixel, &corners)
    })
}

/// Walk the clamped bounding box and shade every covered pixel that passes the depth test.
fn scan_triangle(
    frame: &mut Frame,
    triangle: &Triangle,
    texture: Option<&Texture>,
    filter: TexelFilter,
    covers: impl Fn(Vec2) -> bool,
) -> Result<()> {
    let bounds = triangle.bounds(frame.target.width(), frame.target.height());
    if bounds.is_empty() {
        return Ok(());
    }
    let [a, b, c] = &triangle.vertices;

    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            let stw = triangle.weights_at(x, y);
            if !stw.is_inside() || !covers(Vec2::new(x as f32, y as f32)) {
                continue;
            }

            let (px, py) = (x as u32, y as u32);
            let z = triangle.depth(&stw);
            let nearest = frame.depth.get(px, py).unwrap_or(f32::NEG_INFINITY);
            if z.abs() > 1.0 || z >= nearest {
                continue;
            }

            let mut color = stw.mix_color(a.color, b.color, c.color);
            // Absorb float error so interpolated opaque vertices stay opaque
            if color.a >= u8::MAX - 2 {
                color.a = u8::MAX;
            }

            if color.is_opaque() {
                frame.depth.set(px, py, z);
            } else {
                color = color.blend(frame.target.pixel(px, py)?);
            }
            let alpha = color.a;

            if let Some(texture) = texture {
                let u = stw.mix(a.u, b.u, c.u);
                let v = stw.mix(a.v, b.v, c.v);
                color *= sample(texture, u, v, filter)?;
            }

            if !frame.lights.is_empty() {
                let surface = SurfacePoint {
                    position: stw.mix(a.position, b.position, c.position),
                    normal: stw.mix(a.normal, b.normal, c.normal).normalize_or_zero(),
                    color,
                };
                // Texel alpha does not survive lighting
                color = frame.lighting.shade(frame.lights, &surface, frame.view_pos).with_alpha(alpha);
            }

            frame.target.set_pixel(px, py, color)?;
        }
    }
    Ok(())
}

fn sample(texture: &Texture, u: f32, v: f32, filter: TexelFilter) -> Result<Color> {
    match filter {
        TexelFilter::Nearest => texture.sample_nearest(u, v),
        TexelFilter::Footprint(delta_ratio) => {
            let x = (u - u.floor()) * texture.width() as f32;
            let y = (v - v.floor()) * texture.height() as f32;
            Ok(texture.sample_bilinear(x, y, delta_ratio))
        }
    }
}
