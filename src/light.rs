use glam::Vec3;
use serde::Deserialize;

use crate::color::Color;

/// Point light with ambient, diffuse and specular coefficients.
///
/// Coefficients are clamped to `[0, 1]` on construction. Intensity is per channel
/// and is attenuated with the inverse square of the distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    position: Vec3,
    ambient: f32,
    diffuse: f32,
    specular: f32,
    intensity: Vec3,
}

/// The surface point being lit.
#[derive(Debug, Copy, Clone)]
pub struct SurfacePoint {
    pub position: Vec3,
    /// Expected to be normalized.
    pub normal: Vec3,
    pub color: Color,
}

impl Light {
    pub fn new(position: Vec3, ambient: f32, diffuse: f32, specular: f32, intensity: f32) -> Self {
        Self::with_rgb_intensity(position, ambient, diffuse, specular, Vec3::splat(intensity))
    }

    pub fn with_rgb_intensity(position: Vec3, ambient: f32, diffuse: f32, specular: f32, intensity: Vec3) -> Self {
        Self {
            position,
            ambient: ambient.clamp(0.0, 1.0),
            diffuse: diffuse.clamp(0.0, 1.0),
            specular: specular.clamp(0.0, 1.0),
            intensity,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    pub fn diffuse(&self) -> f32 {
        self.diffuse
    }

    pub fn specular(&self) -> f32 {
        self.specular
    }

    pub fn intensity(&self) -> Vec3 {
        self.intensity
    }

    /// Blinn-Phong: ambient plus distance-attenuated lambertian and half-vector specular.
    ///
    /// A surface point sitting exactly on the light divides by zero; callers keep them apart.
    /// Output alpha is the input alpha.
    pub fn blinn_phong(&self, surface: &SurfacePoint, view_pos: Vec3, shininess: i32) -> Color {
        let light_dir = (self.position - surface.position).normalize_or_zero();
        let squared_dist = self.position.distance_squared(surface.position);

        let lambertian = light_dir.dot(surface.normal).max(0.0);
        let mut specular = 0.0;

        if lambertian > 0.0 {
            let view_dir = (view_pos - surface.position).normalize_or_zero();
            let half_dir = (light_dir + view_dir).normalize_or_zero();
            let specular_angle = half_dir.dot(surface.normal).max(0.0);
            specular = specular_angle.powi(shininess);
        }

        let ambient_color = surface.color * self.ambient;
        let diffuse_color = surface.color * self.diffuse;
        let specular_color = surface.color * self.specular;

        let color = ambient_color
            + diffuse_color * lambertian * self.intensity / squared_dist
            + specular_color * specular * self.intensity / squared_dist;

        color.with_alpha(surface.color.a)
    }

    /// Classic Phong without attenuation. The specular highlight is white and the
    /// result is always opaque.
    pub fn phong(&self, surface: &SurfacePoint, view_pos: Vec3, shininess: i32) -> Color {
        let light_angle = surface.normal.dot(self.position - surface.position).clamp(0.0, 1.0);
        let half_vector = (view_pos + self.position - 2.0 * surface.position).normalize_or_zero();
        let n_dot_h = surface.normal.dot(half_vector).clamp(0.0, 1.0);

        let base = surface.color.rgb_vec();
        let ambient = base * self.ambient;
        let diffuse = base * self.diffuse * n_dot_h;
        let specular = Color::WHITE.rgb_vec() * n_dot_h.powi(shininess) * self.specular;

        Color::from_rgb_vec(ambient + (diffuse + specular) * light_angle * self.intensity, u8::MAX)
    }
}

/// Which illumination model the per-pixel lighting pass runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Lighting {
    BlinnPhong {
        #[serde(default = "default_blinn_shininess")]
        shininess: i32,
    },
    Phong {
        #[serde(default = "default_phong_shininess")]
        shininess: i32,
    },
}

fn default_blinn_shininess() -> i32 {
    20
}

fn default_phong_shininess() -> i32 {
    10
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting::BlinnPhong { shininess: default_blinn_shininess() }
    }
}

impl Lighting {
    pub fn illuminate(&self, light: &Light, surface: &SurfacePoint, view_pos: Vec3) -> Color {
        match *self {
            Lighting::BlinnPhong { shininess } => light.blinn_phong(surface, view_pos, shininess),
            Lighting::Phong { shininess } => light.phong(surface, view_pos, shininess),
        }
    }

    /// Sum every light's contribution on top of black, keeping the surface alpha.
    pub fn shade(&self, lights: &[Light], surface: &SurfacePoint, view_pos: Vec3) -> Color {
        let mut lit = Color::BLACK;
        for light in lights {
            lit += self.illuminate(light, surface, view_pos);
        }
        lit.with_alpha(surface.color.a)
    }
}
