use glam::{Vec2, Vec3};

use crate::color::Color;
use crate::error::{RasterError, Result};
use crate::scene::TextureId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Color, uv: Vec2) -> Self {
        Self { position, normal, color, u: uv.x, v: uv.y }
    }

    /// Position and color only, normal zero and uv at the origin.
    pub fn colored(position: Vec3, color: Color) -> Self {
        Self { position, normal: Vec3::ZERO, color, u: 0.0, v: 0.0 }
    }
}

/// Immutable triangle list.
///
/// Indices are validated on construction. Each triangle carries a face normal,
/// either supplied or computed from counter-clockwise winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<usize>,
    normals: Vec<Vec3>,
    texture: Option<TextureId>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<usize>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(RasterError::IndexBufferNotTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(RasterError::IndexOutOfRange { index, vertex_count: vertices.len() });
        }

        let normals = indices
            .chunks_exact(3)
            .map(|tri| {
                let (a, b, c) = (vertices[tri[0]].position, vertices[tri[1]].position, vertices[tri[2]].position);
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect();

        Ok(Self { vertices, indices, normals, texture: None })
    }

    /// Replace the computed face normals, one per triangle.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self> {
        let expected = self.triangle_count();
        if normals.len() != expected {
            return Err(RasterError::NormalCountMismatch { expected, found: normals.len() });
        }
        self.normals = normals;
        Ok(self)
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Per-triangle normals in mesh space.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when no vertex carries any transparency.
    pub fn is_opaque(&self) -> bool {
        self.vertices.iter().all(|v| v.color.is_opaque())
    }
}
