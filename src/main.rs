// External crates
use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::{Mat4, Vec2, Vec3};
use log::{debug, info};
use rayon::prelude::*;

// STD library
use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// Internal imports
use rusterizer::obj::load_obj;
use rusterizer::{Camera, Color, DrawMode, Entity, Light, Mesh, RenderConfig, Scene, Texture, Transform, Vertex};

#[derive(Debug, Parser)]
#[command(name = "rusterizer", version, about = "Render a mesh to PNG on the CPU", long_about = None)]
struct Arguments {
    /// TOML render settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wavefront OBJ to render instead of the built-in cubes
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Image applied to the OBJ mesh
    #[arg(long, requires = "obj")]
    texture: Option<PathBuf>,

    /// Output PNG. With several frames a zero padded index is appended to the stem
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Supersampling factor per axis
    #[arg(short, long)]
    samples: Option<u8>,

    /// Draw triangle edges only
    #[arg(long, action = clap::ArgAction::SetTrue)]
    wireframe: bool,

    /// Number of turntable frames, rendered in parallel
    #[arg(short, long, default_value_t = 1)]
    frames: usize,
}

impl Arguments {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path).with_context(|| format!("reading {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.sample_count = samples;
        }
        if self.wireframe {
            config.draw_mode = DrawMode::Wireframe;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Arguments::parse();
    let config = args.render_config()?;
    if args.frames == 0 {
        bail!("--frames must be at least 1");
    }
    // Fail early on bad settings instead of once per frame
    config.rasterizer()?;

    let cores = num_cpus::get();
    info!("number of logical CPU cores: {}", cores);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(cores).build()?;

    let scene = match &args.obj {
        Some(path) => obj_scene(path, args.texture.as_deref())?,
        None => demo_scene()?,
    };
    let camera = demo_camera(config.width, config.height);

    let start = Instant::now();
    let frame_times = pool.install(|| {
        (0..args.frames)
            .into_par_iter()
            .map(|frame| render_frame(&config, &scene, &camera, frame, args.frames, &args.output))
            .collect::<Result<Vec<Duration>>>()
    })?;

    let total: Duration = frame_times.iter().sum();
    info!(
        "rendered {} frame(s) at {}x{} ({}x samples) in {:.2?}, {:.2?} per frame",
        frame_times.len(),
        config.width,
        config.height,
        config.sample_count,
        start.elapsed(),
        total / frame_times.len() as u32
    );
    Ok(())
}

/// Every frame owns its rasterizer, scene copy and target.
fn render_frame(
    config: &RenderConfig,
    scene: &Scene,
    camera: &Camera,
    frame: usize,
    frames: usize,
    output: &Path,
) -> Result<Duration> {
    let frame_start = Instant::now();

    let mut rasterizer = config.rasterizer()?;
    let mut target = Texture::new(config.width, config.height)?;
    let mut scene = scene.clone();

    let angle = TAU * frame as f32 / frames as f32;
    for entity in scene.entities_mut() {
        let spin = Mat4::from_rotation_y(angle);
        entity.transform.set_matrix(spin * entity.transform.matrix());
    }

    rasterizer.render_scene(&scene, camera, &mut target)?;

    let path = frame_path(output, frame, frames);
    target.save(&path).with_context(|| format!("writing {}", path.display()))?;

    let elapsed = frame_start.elapsed();
    debug!("frame {} -> {} in {:.2?}", frame, path.display(), elapsed);
    Ok(elapsed)
}

fn frame_path(output: &Path, frame: usize, frames: usize) -> PathBuf {
    if frames == 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let ext = output.extension().and_then(|s| s.to_str()).unwrap_or("png");
    output.with_file_name(format!("{stem}_{frame:04}.{ext}"))
}

fn demo_camera(width: u32, height: u32) -> Camera {
    let transform = Transform::new(Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)));
    Camera::perspective(transform, FRAC_PI_2, width as f32 / height.max(1) as f32, 0.1, 8.0)
}

fn demo_lights(scene: &mut Scene) {
    scene.add_light(Light::new(Vec3::new(1.5, 2.0, 2.5), 0.1, 0.5, 0.4, 8.0));
    scene.add_light(Light::new(Vec3::new(-2.0, 0.5, 1.5), 0.1, 0.5, 0.4, 8.0));
}

/// An opaque cube with a colored face per axis and a smaller see-through cube in front of it.
fn demo_scene() -> Result<Scene> {
    let mut scene = Scene::new();
    let faces = [Color::RED, Color::rgb(0, 255, 255), Color::GREEN, Color::rgb(255, 0, 255), Color::BLUE, Color::rgb(255, 255, 0)];

    let cube = scene.add_mesh("cube", cube_mesh(faces)?);
    scene.add_entity(Entity::new(cube, Mat4::from_rotation_x(0.4)));

    let glass = scene.add_mesh("glass", cube_mesh([Color::WHITE; 6])?);
    let placement = Mat4::from_translation(Vec3::new(0.45, -0.2, 0.6)) * Mat4::from_scale(Vec3::splat(0.35));
    scene.add_entity(Entity::with_transparency(glass, 0.4, placement));

    demo_lights(&mut scene);
    Ok(scene)
}

/// Unit cube centred on the origin, faces ordered +x, -x, +y, -y, +z, -z.
fn cube_mesh(face_colors: [Color; 6]) -> Result<Mesh> {
    // (normal, u axis, v axis) with u x v = normal so every face winds counter-clockwise
    let axes = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (-Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (-Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (-Vec3::Z, Vec3::Y, Vec3::X),
    ];
    let corners = [Vec2::new(-0.5, -0.5), Vec2::new(0.5, -0.5), Vec2::new(0.5, 0.5), Vec2::new(-0.5, 0.5)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for ((normal, u, v), color) in axes.into_iter().zip(face_colors) {
        let base = vertices.len();
        for corner in corners {
            let position = normal * 0.5 + u * corner.x + v * corner.y;
            vertices.push(Vertex::new(position, normal, color, corner + Vec2::splat(0.5)));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    Ok(Mesh::new(vertices, indices)?)
}

fn obj_scene(path: &Path, texture: Option<&Path>) -> Result<Scene> {
    let load_start = Instant::now();
    let mut mesh = load_obj(path).with_context(|| format!("loading {}", path.display()))?;
    let mut scene = Scene::new();

    if let Some(texture_path) = texture {
        let image = Texture::load(texture_path).with_context(|| format!("loading {}", texture_path.display()))?;
        mesh = mesh.with_texture(scene.add_texture(image));
    }
    info!("loaded {} ({} triangles) in {:.2?}", path.display(), mesh.triangle_count(), load_start.elapsed());

    let fit = fit_to_unit(&mesh);
    let id = scene.add_mesh("model", mesh);
    scene.add_entity(Entity::new(id, fit));
    demo_lights(&mut scene);
    Ok(scene)
}

/// Centre the mesh on the origin and scale its largest side to one unit.
fn fit_to_unit(mesh: &Mesh) -> Mat4 {
    let (min, max) = mesh
        .vertices()
        .iter()
        .fold((Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        });
    let size = (max - min).max_element();
    if !size.is_finite() || size <= 0.0 {
        return Mat4::IDENTITY;
    }
    Mat4::from_scale(Vec3::splat(1.0 / size)) * Mat4::from_translation(-(min + max) * 0.5)
}
