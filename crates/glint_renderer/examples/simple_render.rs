//! Simple ray tracer example.
//!
//! Builds a small scene in code (two spheres over a mirror floor, one point
//! and one spot light) and saves it as a PPM.

use glint_renderer::{render, save_image, Color, Light, RenderConfig, Scene, Surface, Vec3};

fn main() {
    println!("Glint Ray Tracer - Simple Example");
    println!("=================================");

    let scene = build_scene();
    println!(
        "Scene: {} surfaces, {} lights",
        scene.surface_count(),
        scene.light_count()
    );

    let (width, height) = (640, 480);
    let config = RenderConfig::default();

    println!("Rendering {}x{} @ depth {}...", width, height, config.max_depth);

    let start = std::time::Instant::now();
    let image = render(&scene, width, height, &config).expect("Scene has a camera");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_image(filename, &image).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // 4:3 sensor to match the output
    scene.add_surface(Surface::camera(Vec3::ZERO, 1.0, 0.75));

    // Mirror-ish floor
    scene.add_surface(
        Surface::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y)
            .with_diffuse(Color::new(0.3, 0.3, 0.35))
            .with_reflectivity(0.35),
    );

    scene.add_surface(
        Surface::sphere(Vec3::new(-1.0, 0.0, -5.0), 1.0)
            .with_diffuse(Color::new(0.9, 0.15, 0.1))
            .with_specular(Color::ONE)
            .with_shininess(40.0),
    );

    scene.add_surface(
        Surface::sphere(Vec3::new(1.3, -0.4, -4.0), 0.6)
            .with_diffuse(Color::new(0.1, 0.3, 0.9))
            .with_specular(Color::splat(0.6))
            .with_reflectivity(0.2),
    );

    scene.add_light(Light::point(Vec3::new(2.0, 4.0, 0.0), Color::splat(1.5)).with_radial(0.5, 0.05, 0.01));
    scene.add_light(
        Light::spot(
            Vec3::new(-3.0, 5.0, -3.0),
            Color::new(0.8, 0.8, 0.6),
            Vec3::new(0.4, -1.0, -0.3),
            30.0,
            2.0,
        )
        .with_radial(1.0, 0.0, 0.0),
    );

    scene
}
