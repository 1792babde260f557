//! Ray-surface intersection.
//!
//! The primitive tests return the ray parameter `t` of the hit, with any
//! negative value meaning "no forward intersection". Callers keep only
//! strictly positive distances.

use glint_core::{Surface, SurfaceKind};
use glint_math::{Ray, Vec3};

/// Nearest intersection found by [`find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the surface in the scene's surface list
    pub index: usize,
    /// Ray parameter of the hit (always > 0)
    pub t: f32,
}

/// Intersect a ray with a sphere.
///
/// `direction` must be unit length, which makes the quadratic's `A` term 1.
/// Returns the near root when it is in front of the origin, otherwise the far
/// root (the origin is inside the sphere). Both may be negative.
pub fn intersect_sphere(direction: Vec3, center: Vec3, origin: Vec3, radius: f32) -> f32 {
    let oc = origin - center;
    let b = 2.0 * direction.dot(oc);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return -1.0;
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / 2.0;
    if near >= 0.0 {
        return near;
    }
    (-b + sqrtd) / 2.0
}

/// Intersect a ray with the plane through `point` with unit `normal`.
///
/// Uses the plane equation `N·X + d = 0` with `d = -N·point`.
/// Rays parallel to the plane return -1.
pub fn intersect_plane(point: Vec3, normal: Vec3, origin: Vec3, direction: Vec3) -> f32 {
    let denom = normal.dot(direction);
    if denom == 0.0 {
        return -1.0;
    }

    let d = -normal.dot(point);
    -(normal.dot(origin) + d) / denom
}

/// Intersect a ray with any surface. Cameras never intersect.
pub fn intersect_surface(surface: &Surface, ray: &Ray) -> f32 {
    match surface.kind {
        SurfaceKind::Sphere { radius } => {
            intersect_sphere(ray.direction(), surface.position, ray.origin(), radius)
        }
        SurfaceKind::Plane { normal } => {
            intersect_plane(surface.position, normal, ray.origin(), ray.direction())
        }
        SurfaceKind::Camera { .. } => -1.0,
    }
}

/// Find the closest surface hit by `ray` at a strictly positive distance.
///
/// `exclude` skips one surface, used when casting shadow and reflection rays
/// from a point on that surface. Ties go to the earlier surface.
pub fn find_nearest(surfaces: &[Surface], ray: &Ray, exclude: Option<usize>) -> Option<Hit> {
    surfaces
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != exclude)
        .filter_map(|(index, surface)| {
            let t = intersect_surface(surface, ray);
            (t > 0.0).then_some(Hit { index, t })
        })
        .min_by(|a, b| a.t.total_cmp(&b.t))
}
