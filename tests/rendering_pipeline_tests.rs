use std::f32::consts::{FRAC_PI_3, PI};

use glam::{Mat4, Vec2, Vec3};
use rusterizer::obj::parse_obj_str;
use rusterizer::{
    Camera, Color, DrawMode, Entity, Light, Lighting, Mesh, Rasterizer, RenderConfig, Scene, Texture, Transform, Vertex,
};

const SIZE: u32 = 4;

fn camera_at(transform: Mat4) -> Camera {
    Camera::orthographic(Transform::new(transform), 1.0, 1.0, 0.1, 10.0)
}

/// Orthographic camera at z = 5 looking at the origin.
fn front_camera() -> Camera {
    camera_at(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)))
}

/// Triangle facing +z that covers the whole 2x2 view window.
fn covering_triangle(color: Color, z: f32) -> Mesh {
    let corners = [Vec3::new(-4.0, -4.0, z), Vec3::new(4.0, -4.0, z), Vec3::new(0.0, 4.0, z)];
    let vertices = corners.iter().map(|p| Vertex::colored(*p, color)).collect();
    Mesh::new(vertices, vec![0, 1, 2]).unwrap()
}

/// Same footprint as [`covering_triangle`] but with +z normals and uvs spanning the unit square.
fn lit_triangle(color: Color) -> Mesh {
    let corners = [(-4.0, -4.0, 0.0, 1.0), (4.0, -4.0, 1.0, 1.0), (0.0, 4.0, 0.5, 0.0)];
    let vertices = corners
        .iter()
        .map(|&(x, y, u, v)| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, color, Vec2::new(u, v)))
        .collect();
    Mesh::new(vertices, vec![0, 1, 2]).unwrap()
}

fn render(rasterizer: &mut Rasterizer, scene: &Scene, camera: &Camera) -> Texture {
    let mut target = Texture::new(SIZE, SIZE).unwrap();
    rasterizer.render_scene(scene, camera, &mut target).unwrap();
    target
}

fn single_entity_scene(mesh: Mesh) -> Scene {
    let mut scene = Scene::new();
    let id = scene.add_mesh("mesh", mesh);
    scene.add_entity(Entity::new(id, Mat4::IDENTITY));
    scene
}

#[test]
fn ambient_light_on_white_triangle() {
    let mut scene = single_entity_scene(covering_triangle(Color::WHITE, 0.0));
    scene.add_light(Light::new(Vec3::new(0.0, 0.0, 3.0), 1.0, 0.0, 0.0, 1.0));
    let camera = front_camera();

    let mut rasterizer = Rasterizer::default();
    let target = render(&mut rasterizer, &scene, &camera);
    assert!(target.pixels().iter().all(|&c| c == Color::WHITE));

    let expected = camera.view_projection().project_point3(Vec3::ZERO).z;
    let depth = rasterizer.depth_buffer();
    assert_eq!((depth.width(), depth.height()), (SIZE, SIZE));
    for d in depth.values() {
        assert!((d - expected).abs() < 1e-5, "depth {d}, expected {expected}");
    }
}

#[test]
fn half_ambient_dims_the_surface() {
    let mut scene = single_entity_scene(covering_triangle(Color::WHITE, 0.0));
    scene.add_light(Light::new(Vec3::new(0.0, 0.0, 3.0), 0.5, 0.0, 0.0, 1.0));
    let target = render(&mut Rasterizer::default(), &scene, &front_camera());

    let c = target.pixel(2, 2).unwrap();
    assert!((126..=128).contains(&c.r) && c.r == c.g && c.g == c.b, "{c:?}");
    assert_eq!(c.a, 255);
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    for flip in [false, true] {
        let mut scene = Scene::new();
        let far = scene.add_mesh("far", covering_triangle(Color::RED, 0.0));
        let near = scene.add_mesh("near", covering_triangle(Color::BLUE, 1.0));
        let order = if flip { [near, far] } else { [far, near] };
        for id in order {
            scene.add_entity(Entity::new(id, Mat4::IDENTITY));
        }

        let target = render(&mut Rasterizer::default(), &scene, &front_camera());
        assert!(target.pixels().iter().all(|&c| c == Color::BLUE), "flip = {flip}");
    }
}

#[test]
fn nearer_geometry_has_smaller_depth() {
    let mut depths = Vec::new();
    for z in [-2.0, 0.0, 2.0] {
        let scene = single_entity_scene(covering_triangle(Color::WHITE, z));
        let mut rasterizer = Rasterizer::default();
        render(&mut rasterizer, &scene, &front_camera());
        depths.push(rasterizer.depth_buffer().get(1, 1).unwrap());
    }
    assert!(depths[0] > depths[1] && depths[1] > depths[2], "{depths:?}");
}

#[test]
fn sample_count_one_renders_directly() {
    let scene = single_entity_scene(covering_triangle(Color::GREEN, 0.0));
    let camera = front_camera();

    let mut direct = Rasterizer::new(1).unwrap();
    let a = render(&mut direct, &scene, &camera);
    let b = render(&mut Rasterizer::default(), &scene, &camera);
    assert_eq!(a, b);
    assert_eq!(direct.depth_buffer().width(), SIZE);
}

#[test]
fn supersampled_solid_fill_matches_direct_render() {
    let scene = single_entity_scene(covering_triangle(Color::GREEN, 0.0));
    let camera = front_camera();

    let direct = render(&mut Rasterizer::default(), &scene, &camera);
    let mut msaa = Rasterizer::new(3).unwrap();
    let resolved = render(&mut msaa, &scene, &camera);

    assert_eq!(direct, resolved);
    assert_eq!(msaa.depth_buffer().width(), (SIZE + 1) * 3);
}

#[test]
fn back_faces_are_culled_from_behind() {
    let behind = camera_at(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)) * Mat4::from_rotation_y(PI));

    let front_facing = single_entity_scene(covering_triangle(Color::RED, 0.0));
    let target = render(&mut Rasterizer::default(), &front_facing, &behind);
    assert!(target.pixels().iter().all(|&c| c == Color::BLACK));

    let mesh = covering_triangle(Color::RED, 0.0);
    let flipped = Mesh::new(mesh.vertices().to_vec(), vec![0, 2, 1]).unwrap();
    let target = render(&mut Rasterizer::default(), &single_entity_scene(flipped), &behind);
    assert!(target.pixels().iter().all(|&c| c == Color::RED));
}

#[test]
fn texture_modulates_vertex_color() {
    let mut scene = Scene::new();
    let texture = scene.add_texture(Texture::filled(2, 2, Color::RED).unwrap());
    let mesh = covering_triangle(Color::WHITE, 0.0).with_texture(texture);
    let id = scene.add_mesh("textured", mesh);
    scene.add_entity(Entity::new(id, Mat4::IDENTITY));

    let target = render(&mut Rasterizer::default(), &scene, &front_camera());
    assert!(target.pixels().iter().all(|&c| c == Color::RED));
}

#[test]
fn lit_pixel_keeps_alpha_from_before_texturing() {
    let mut scene = Scene::new();
    let texture = scene.add_texture(Texture::filled(2, 2, Color::new(255, 255, 255, 100)).unwrap());
    let id = scene.add_mesh("textured", covering_triangle(Color::WHITE, 0.0).with_texture(texture));
    scene.add_entity(Entity::new(id, Mat4::IDENTITY));
    scene.add_light(Light::new(Vec3::new(0.0, 0.0, 3.0), 1.0, 0.0, 0.0, 1.0));

    let mut rasterizer = Rasterizer::default();
    let target = render(&mut rasterizer, &scene, &front_camera());
    assert!(target.pixels().iter().all(|&c| c == Color::WHITE), "{:?}", target.pixel(1, 1));
    assert!(rasterizer.depth_buffer().values().iter().all(|d| d.is_finite()));
}

#[test]
fn textured_wireframe_edges_take_the_texel_color() {
    let vertices = vec![
        Vertex::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::Z, Color::WHITE, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::Z, Color::WHITE, Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec3::Z, Color::WHITE, Vec2::new(1.0, 1.0)),
    ];
    let mut scene = Scene::new();
    let texture = scene.add_texture(Texture::filled(2, 2, Color::RED).unwrap());
    let id = scene.add_mesh("tri", Mesh::new(vertices, vec![0, 1, 2]).unwrap().with_texture(texture));
    scene.add_entity(Entity::new(id, Mat4::IDENTITY));

    let mut rasterizer = Rasterizer::default().with_draw_mode(DrawMode::Wireframe);
    let mut target = Texture::new(16, 16).unwrap();
    rasterizer.render_scene(&scene, &front_camera(), &mut target).unwrap();

    assert_eq!(target.pixel(0, 8).unwrap(), Color::RED);
    assert_eq!(target.pixel(15, 15).unwrap(), Color::RED);
    assert_eq!(target.pixel(4, 11).unwrap(), Color::BLACK);
}

#[test]
fn phong_and_blinn_phong_shade_differently() {
    let mut scene = single_entity_scene(lit_triangle(Color::WHITE));
    scene.add_light(Light::new(Vec3::new(0.0, 0.0, 3.0), 0.1, 0.5, 0.4, 8.0));
    let camera = front_camera();

    let blinn = render(&mut Rasterizer::default(), &scene, &camera).pixel(2, 2).unwrap();
    let mut phong_rasterizer = Rasterizer::default().with_lighting(Lighting::Phong { shininess: 10 });
    let phong = render(&mut phong_rasterizer, &scene, &camera).pixel(2, 2).unwrap();

    // attenuated by distance squared vs. unattenuated and saturated
    assert!(blinn.r < phong.r, "blinn {blinn:?}, phong {phong:?}");
    assert_eq!(phong, Color::WHITE);
    assert_eq!(blinn.a, 255);
}

#[test]
fn rotated_and_scaled_entity_is_lit_with_unit_normals() {
    let mut scene = Scene::new();
    let id = scene.add_mesh("tilted", lit_triangle(Color::WHITE));
    let transform = Mat4::from_rotation_x(FRAC_PI_3) * Mat4::from_scale(Vec3::splat(3.0));
    scene.add_entity(Entity::new(id, transform));

    // diffuse only, one unit in front of the surface point under pixel (2, 2)
    let distance: f32 = 1.0;
    scene.add_light(Light::new(Vec3::new(0.0, 0.0, distance), 0.0, 1.0, 0.0, 1.0));
    let c = render(&mut Rasterizer::default(), &scene, &front_camera()).pixel(2, 2).unwrap();

    let lambertian = FRAC_PI_3.cos();
    let expected = 255.0 * 1.0 * lambertian * 1.0 / (distance * distance);
    assert!((c.r as f32 - expected).abs() <= 1.5, "got {c:?}, expected r close to {expected}");
    assert_eq!((c.r, c.r), (c.g, c.b));
}

#[test]
fn fully_transparent_entity_leaves_background() {
    let mut scene = Scene::new();
    let id = scene.add_mesh("ghost", covering_triangle(Color::WHITE, 0.0));
    scene.add_entity(Entity::with_transparency(id, 0.0, Mat4::IDENTITY));

    let mut rasterizer = Rasterizer::default();
    let target = render(&mut rasterizer, &scene, &front_camera());
    assert!(target.pixels().iter().all(|&c| c == Color::BLACK));
    assert!(rasterizer.depth_buffer().values().iter().all(|d| d.is_infinite()));
}

#[test]
fn frames_do_not_leak_into_each_other() {
    let camera = front_camera();
    let mut rasterizer = Rasterizer::default();
    render(&mut rasterizer, &single_entity_scene(covering_triangle(Color::RED, 0.0)), &camera);

    let target = render(&mut rasterizer, &Scene::new(), &camera);
    assert!(target.pixels().iter().all(|&c| c == Color::BLACK));
    assert!(rasterizer.depth_buffer().values().iter().all(|d| d.is_infinite()));
}

#[test]
fn configured_wireframe_render_of_obj_quad() {
    let config = RenderConfig::from_toml_str(
        r#"
        width = 16
        height = 16
        sample_count = 1
        draw_mode = "wireframe"
        "#,
    )
    .unwrap();
    let mut rasterizer = config.rasterizer().unwrap();
    assert_eq!(rasterizer.draw_mode(), DrawMode::Wireframe);

    let quad = parse_obj_str("v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3 4\n").unwrap();
    let scene = single_entity_scene(quad);
    let mut target = Texture::new(config.width, config.height).unwrap();
    rasterizer.render_scene(&scene, &front_camera(), &mut target).unwrap();

    // Left border is an edge, the area between it and the diagonal is not
    assert_eq!(target.pixel(0, 8).unwrap(), Color::WHITE);
    assert_eq!(target.pixel(4, 8).unwrap(), Color::BLACK);

    rasterizer.toggle_wireframe_mode();
    rasterizer.render_scene(&scene, &front_camera(), &mut target).unwrap();
    assert_eq!(target.pixel(4, 8).unwrap(), Color::WHITE);
}

#[test]
fn rendered_frame_survives_png_round_trip() {
    let scene = single_entity_scene(covering_triangle(Color::rgb(10, 200, 30), 0.0));
    let target = render(&mut Rasterizer::default(), &scene, &front_camera());

    let path = std::env::temp_dir().join(format!("rusterizer-{}.png", std::process::id()));
    target.save(&path).unwrap();
    let loaded = Texture::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, target);
}
