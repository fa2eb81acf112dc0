//! Software rasterizer for textured, lit, alpha-blended triangle meshes.
//!
//! Build a [`Scene`] of meshes, textures, entities and lights, point a [`Camera`]
//! at it and let a [`Rasterizer`] draw it into a [`Texture`].

pub mod camera;
pub mod color;
pub mod config;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod light;
pub mod mesh;
pub mod obj;
pub mod rasterizer;
pub mod rectangle;
pub mod scene;
pub mod texture;
pub mod transform;
pub mod triangle;

pub use camera::Camera;
pub use color::Color;
pub use config::RenderConfig;
pub use depth::DepthBuffer;
pub use error::{RasterError, Result};
pub use light::{Light, Lighting, SurfacePoint};
pub use mesh::{Mesh, Vertex};
pub use rasterizer::{DrawMode, Rasterizer};
pub use scene::{Entity, MeshId, Scene, TextureId};
pub use texture::Texture;
pub use transform::Transform;
