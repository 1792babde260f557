// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod ray;
mod vector;
pub use ray::Ray;
pub use vector::{from_points, VectorExt};

/// Color type alias (RGB values, nominally 0-1)
pub type Color = Vec3;
