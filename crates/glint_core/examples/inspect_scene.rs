//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example inspect_scene -- demos/spheres.txt

use std::env;

use glint_core::{load_scene, LightKind, SurfaceKind};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene>");
        println!("\nExamples:");
        println!("  cargo run --example inspect_scene -- demos/spheres.txt");
        println!("  cargo run --example inspect_scene -- demos/spheres.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\nSurfaces: {}", scene.surface_count());
            for (i, surface) in scene.surfaces.iter().enumerate() {
                let shape = match surface.kind {
                    SurfaceKind::Camera { width, height } => format!("camera {}x{}", width, height),
                    SurfaceKind::Sphere { radius } => format!("sphere r={}", radius),
                    SurfaceKind::Plane { normal } => format!("plane n={}", normal),
                };
                println!(
                    "  [{}] {} at {} (reflectivity {}, ns {})",
                    i, shape, surface.position, surface.reflectivity, surface.ns
                );
            }

            println!("\nLights: {}", scene.light_count());
            for (i, light) in scene.lights.iter().enumerate() {
                let kind = match light.kind {
                    LightKind::Point => "point".to_string(),
                    LightKind::Spot(spot) => format!("spot {} deg along {}", spot.theta, spot.direction),
                };
                println!("  [{}] {} at {} color {}", i, kind, light.position, light.color);
            }
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
