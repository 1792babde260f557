//! Image sampling.
//!
//! One primary ray per pixel through a sensor plane one unit in front of
//! the camera (toward -Z), shaded by [`illuminate`] and quantized to 8-bit
//! RGB. Rows are independent, so they are rendered in parallel with rayon.

use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use glint_core::{Scene, Sensor};
use glint_math::{Color, Ray, Vec3, VectorExt};
use rayon::prelude::*;
use thiserror::Error;

use crate::intersect::find_nearest;
use crate::shade::illuminate;

/// Maximum number of shading levels along a reflection chain.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Ambient light added at every shaded point.
pub const AMBIENT: Color = Color::new(0.01, 0.01, 0.01);

/// Errors that can occur when starting a render.
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("Scene has no camera")]
    MissingCamera,

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Depth budget for primary rays
    pub max_depth: u32,
    /// Ambient term added at every shaded point
    pub ambient: Color,
    /// Render rows on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            ambient: AMBIENT,
            parallel: true,
        }
    }
}

/// An 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Map a channel in [0, 1] to 0-255, rounding to nearest.
#[inline]
pub fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> Rgb8 {
    Rgb8 {
        r: quantize(color.x),
        g: quantize(color.y),
        b: quantize(color.z),
    }
}

/// Primary ray through the center of pixel (`x`, `y`).
///
/// `x` counts columns from the left edge and `y` rows from the top.
pub fn primary_ray(sensor: &Sensor, image_width: u32, image_height: u32, x: u32, y: u32) -> Ray {
    let pixel_width = sensor.width / image_width as f32;
    let pixel_height = sensor.height / image_height as f32;

    let sx = -sensor.width / 2.0 + pixel_width * (x as f32 + 0.5);
    let sy = sensor.height / 2.0 - pixel_height * (y as f32 + 0.5);

    Ray::new(sensor.position, Vec3::new(sx, sy, -1.0).normalize_precise())
}

/// Compute the color seen along a primary ray. Misses are black.
pub fn trace(scene: &Scene, config: &RenderConfig, ray: &Ray) -> Color {
    match find_nearest(&scene.surfaces, ray, None) {
        Some(hit) => illuminate(scene, config, hit.index, ray.at(hit.t), ray.origin(), config.max_depth),
        None => Color::ZERO,
    }
}

/// Render a single pixel.
pub fn render_pixel(
    scene: &Scene,
    sensor: &Sensor,
    config: &RenderConfig,
    image_width: u32,
    image_height: u32,
    x: u32,
    y: u32,
) -> Color {
    let ray = primary_ray(sensor, image_width, image_height, x, y);
    trace(scene, config, &ray)
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to packed RGB bytes, row-major from the top row.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let pixels: Vec<Rgb8> = self.pixels.iter().map(|c| color_to_rgb8(*c)).collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }
}

/// Render the scene as seen from its first camera.
pub fn render(scene: &Scene, width: u32, height: u32, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }
    let sensor = scene.camera().ok_or(RenderError::MissingCamera)?;

    log::info!(
        "Rendering {}x{}: {} surfaces, {} lights, depth {}",
        width,
        height,
        scene.surface_count(),
        scene.light_count(),
        config.max_depth
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(width, height);
    let shade_row = |(y, row): (usize, &mut [Color])| {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = render_pixel(scene, &sensor, config, width, height, x as u32, y as u32);
        }
    };

    if config.parallel {
        image
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(shade_row);
    } else {
        image
            .pixels
            .chunks_mut(width as usize)
            .enumerate()
            .for_each(shade_row);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
