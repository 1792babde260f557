//! Glint Core - Scene model and scene loading for the Glint ray tracer.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Surface` (camera/sphere/plane), `Light` (point/spot)
//! - **Scene loading**: the line-oriented `.txt` scene format and JSON scenes
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let scene = load_scene("demos/spheres.txt")?;
//! println!("Loaded {} surfaces, {} lights",
//!     scene.surface_count(),
//!     scene.light_count());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, parse_scene, parse_scene_json, LoadError, LoadResult};
pub use scene::{
    Light, LightKind, LightRecord, RadialAttenuation, Scene, SceneError, Sensor, Spotlight,
    Surface, SurfaceKind, DEFAULT_SHININESS,
};
