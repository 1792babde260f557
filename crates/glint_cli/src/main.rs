// Render a scene file to an image.
// Run with: cargo run --release -- <width> <height> <scene> <output>

use std::env;
use std::process;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use glint_core::load_scene;
use glint_renderer::{render, save_image, RenderConfig};

const USAGE: &str = "<width> <height> <scene> <output>";

/// Parse an image dimension in pixels.
fn parse_dimension(arg: &str, name: &str) -> Result<u32> {
    let value: u32 = arg
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} `{}`: expected a pixel count", name, arg))?;
    if value == 0 {
        bail!("Invalid {} `{}`: must be at least 1", name, arg);
    }
    Ok(value)
}

/// Human-readable render time, split into minutes, seconds and milliseconds.
fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let milliseconds = total_ms % 1000;
    format!(
        "The raytracer took {} minutes, {} seconds, and {} milliseconds",
        minutes, seconds, milliseconds
    )
}

fn run(width: &str, height: &str, scene_path: &str, output_path: &str) -> Result<()> {
    let width = parse_dimension(width, "width")?;
    let height = parse_dimension(height, "height")?;

    let start = Instant::now();

    let scene = load_scene(scene_path).with_context(|| format!("Failed to load scene {}", scene_path))?;

    let image = render(&scene, width, height, &RenderConfig::default())
        .with_context(|| format!("Failed to render {}", scene_path))?;

    save_image(output_path, &image).with_context(|| format!("Failed to write {}", output_path))?;

    log::info!("{}", format_elapsed(start.elapsed()));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        let program = args.first().map(String::as_str).unwrap_or("glint");
        eprintln!("Error: expected 4 arguments, got {}", args.len().saturating_sub(1));
        eprintln!("Usage: {} {}", program, USAGE);
        process::exit(1);
    }

    run(&args[1], &args[2], &args[3], &args[4])
}
