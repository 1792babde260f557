//! Extra vector operations used by the tracer.
//!
//! `glam` already covers add, subtract, dot, cross and scalar scaling. The
//! helpers here pin down the exact behaviour the shading code depends on:
//! double-precision length, reflection about a unit normal and a
//! tolerance-based comparison for tests.

use crate::Vec3;

/// Vector from `a` to `b` (`b - a`).
#[inline]
pub fn from_points(a: Vec3, b: Vec3) -> Vec3 {
    b - a
}

/// Tracer-specific operations on `Vec3`.
pub trait VectorExt {
    /// Euclidean norm, accumulated in `f64` and narrowed to `f32`.
    fn length_precise(self) -> f32;

    /// Divide by [`VectorExt::length_precise`].
    ///
    /// The input must be nonzero; a zero vector yields NaN components.
    fn normalize_precise(self) -> Vec3;

    /// Reflect `self` about the unit normal `n`: `v - 2(n·v)n`.
    fn reflect_about(self, n: Vec3) -> Vec3;

    /// Per-component absolute difference strictly below `tolerance`.
    fn approx_eq(self, other: Vec3, tolerance: f32) -> bool;
}

impl VectorExt for Vec3 {
    #[inline]
    fn length_precise(self) -> f32 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt() as f32
    }

    #[inline]
    fn normalize_precise(self) -> Vec3 {
        self / self.length_precise()
    }

    #[inline]
    fn reflect_about(self, n: Vec3) -> Vec3 {
        self - n * (2.0 * n.dot(self))
    }

    fn approx_eq(self, other: Vec3, tolerance: f32) -> bool {
        let diff = (self - other).abs();
        diff.x < tolerance && diff.y < tolerance && diff.z < tolerance
    }
}
