//! Glint Renderer - Whitted-style CPU ray tracing
//!
//! Traces one primary ray per pixel, shades hits with Phong lighting and
//! hard shadows, and follows a single mirror bounce per hit up to a fixed
//! depth.

mod intersect;
mod output;
mod renderer;
mod shade;

pub use intersect::{find_nearest, intersect_plane, intersect_sphere, intersect_surface, Hit};
pub use output::{output_format, save_image, save_rgb8, write_ppm, OutputError, OutputResult};
pub use renderer::{
    color_to_rgb8, primary_ray, quantize, render, render_pixel, trace, ImageBuffer, RenderConfig,
    RenderError, RenderResult, Rgb8, AMBIENT, DEFAULT_MAX_DEPTH,
};
pub use shade::{angular_attenuation, illuminate, radial_attenuation};

/// Re-export scene and math types used in the public API
pub use glint_core::{Light, Scene, Sensor, Surface};
pub use glint_math::{Color, Ray, Vec3};
