use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::light::Lighting;
use crate::rasterizer::{DrawMode, Rasterizer};

/// Render settings, usually read from a TOML file.
///
/// ```toml
/// width = 800
/// height = 600
/// sample_count = 2
/// draw_mode = "wireframe"
///
/// [lighting]
/// model = "phong"
/// shininess = 16
/// ```
///
/// Missing keys keep their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub sample_count: u8,
    pub draw_mode: DrawMode,
    pub lighting: Lighting,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            sample_count: 2,
            draw_mode: DrawMode::default(),
            lighting: Lighting::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// A rasterizer with these settings. Fails on a zero sample count.
    pub fn rasterizer(&self) -> Result<Rasterizer> {
        Ok(Rasterizer::new(self.sample_count)?
            .with_draw_mode(self.draw_mode)
            .with_lighting(self.lighting))
    }
}
