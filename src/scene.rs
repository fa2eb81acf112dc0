use std::collections::HashMap;

use glam::Mat4;

use crate::error::Result;
use crate::light::Light;
use crate::mesh::Mesh;
use crate::texture::Texture;
use crate::transform::Transform;

/// Handle to a mesh stored in a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

/// Handle to a texture stored in a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

/// One drawable instance of a mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Entity {
    mesh: MeshId,
    pub transform: Transform,
    transparency: f32,
}

impl Entity {
    pub fn new(mesh: MeshId, transform: Mat4) -> Self {
        Self { mesh, transform: Transform::new(transform), transparency: 1.0 }
    }

    /// `transparency` is the alpha multiplier applied to the mesh, clamped to `[0, 1]`.
    pub fn with_transparency(mesh: MeshId, transparency: f32, transform: Mat4) -> Self {
        Self { mesh, transform: Transform::new(transform), transparency: transparency.clamp(0.0, 1.0) }
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    pub fn is_opaque(&self, mesh: &Mesh) -> bool {
        self.transparency >= 1.0 && mesh.is_opaque()
    }

    pub fn rotation(&self) -> Result<Mat4> {
        self.transform.rotation()
    }
}

/// Owns every mesh and texture; entities and meshes refer to them by handle.
///
/// Storage is append-only so handles stay valid for the scene's lifetime.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    meshes: Vec<Mesh>,
    mesh_names: HashMap<String, MeshId>,
    textures: Vec<Texture>,
    entities: Vec<Entity>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mesh under `name`. Re-using a name points it at the new mesh.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len());
        self.meshes.push(mesh);
        self.mesh_names.insert(name.into(), id);
        id
    }

    pub fn mesh_id(&self, name: &str) -> Option<MeshId> {
        self.mesh_names.get(name).copied()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
