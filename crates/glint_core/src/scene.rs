//! Scene model for Glint.
//!
//! A scene is two insertion-ordered lists: surfaces (the camera plus the
//! renderable spheres and planes) and lights. Both are filled once by a loader
//! and treated as read-only while rendering.

use glint_math::{Color, Vec3, VectorExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phong exponent used when a surface does not specify `ns`.
pub const DEFAULT_SHININESS: f32 = 20.0;

fn default_shininess() -> f32 {
    DEFAULT_SHININESS
}

fn default_sensor_extent() -> f32 {
    1.0
}

/// Errors found while validating a scene.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Plane at surface index {index} has a zero-length normal")]
    DegenerateNormal { index: usize },

    #[error("Spot light at light index {index} has a zero-length direction")]
    DegenerateDirection { index: usize },

    #[error("Scene has no camera")]
    MissingCamera,
}

/// Unit vector along `v`, or `None` when `v` has no usable length.
fn unit(v: Vec3) -> Option<Vec3> {
    let len = v.length_precise();
    if len > 0.0 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Variant-specific surface data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Pinhole camera looking down -Z with a sensor of the given extent.
    Camera {
        #[serde(default = "default_sensor_extent")]
        width: f32,
        #[serde(default = "default_sensor_extent")]
        height: f32,
    },
    /// Sphere centered at the surface position.
    Sphere {
        #[serde(default)]
        radius: f32,
    },
    /// Infinite plane through the surface position.
    Plane {
        /// Unit normal (normalized by the loaders)
        #[serde(default)]
        normal: Vec3,
    },
}

/// A camera, sphere or plane together with its shading finish.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    #[serde(flatten)]
    pub kind: SurfaceKind,

    /// Camera position, sphere center, or a point on the plane
    #[serde(default)]
    pub position: Vec3,

    /// Diffuse color (RGB, 0-1)
    #[serde(default, alias = "diffuse_color")]
    pub diffuse: Color,

    /// Specular color (RGB, 0-1)
    #[serde(default, alias = "specular_color")]
    pub specular: Color,

    /// Fraction of outgoing light taken from the mirror bounce, in [0, 1]
    #[serde(default)]
    pub reflectivity: f32,

    /// Phong shininess exponent
    #[serde(default = "default_shininess")]
    pub ns: f32,
}

impl Surface {
    fn with_kind(kind: SurfaceKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            reflectivity: 0.0,
            ns: DEFAULT_SHININESS,
        }
    }

    /// Create a camera with the given sensor extent.
    pub fn camera(position: Vec3, width: f32, height: f32) -> Self {
        Self::with_kind(SurfaceKind::Camera { width, height }, position)
    }

    /// Create a sphere. Negative radii are clamped to zero.
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::with_kind(
            SurfaceKind::Sphere {
                radius: radius.max(0.0),
            },
            center,
        )
    }

    /// Create a plane through `point`. The normal is normalized if it has length.
    pub fn plane(point: Vec3, normal: Vec3) -> Self {
        let normal = unit(normal).unwrap_or(normal);
        Self::with_kind(SurfaceKind::Plane { normal }, point)
    }

    /// Set the diffuse color.
    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set the specular color.
    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    /// Set the reflectivity, clamped to [0, 1].
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Set the Phong shininess exponent.
    pub fn with_shininess(mut self, ns: f32) -> Self {
        self.ns = ns;
        self
    }

    /// Cameras are not geometry and never take part in intersection.
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, SurfaceKind::Camera { .. })
    }

    /// Outward surface normal at `point`, assumed to lie on the surface.
    ///
    /// Returns `None` for cameras.
    pub fn normal_at(&self, point: Vec3) -> Option<Vec3> {
        match self.kind {
            SurfaceKind::Plane { normal } => Some(normal),
            SurfaceKind::Sphere { .. } => Some((point - self.position).normalize_precise()),
            SurfaceKind::Camera { .. } => None,
        }
    }
}

/// Distance falloff `1 / (a0 + a1·d + a2·d²)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RadialAttenuation {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
}

impl RadialAttenuation {
    pub fn new(a0: f32, a1: f32, a2: f32) -> Self {
        Self { a0, a1, a2 }
    }

    /// No falloff.
    pub const NONE: RadialAttenuation = RadialAttenuation {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
    };
}

/// Cone parameters of a spot light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spotlight {
    /// Cone half-angle in degrees
    pub theta: f32,
    /// `cos(theta)`; points whose direction cosine exceeds it are lit
    pub cos_threshold: f32,
    /// Angular falloff exponent
    pub angular_exponent: f32,
    /// Unit direction the cone points along
    pub direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Point,
    Spot(Spotlight),
}

/// Flat light description as it appears in scene files.
///
/// The light kind is not stored: a zero `theta` means a point light,
/// anything else a spot light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRecord {
    pub position: Vec3,
    pub color: Color,
    pub radial_a0: f32,
    pub radial_a1: f32,
    pub radial_a2: f32,
    pub theta: f32,
    pub angular_a0: f32,
    pub direction: Vec3,
}

/// A point or spot light.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "LightRecord", into = "LightRecord")]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub radial: RadialAttenuation,
    pub kind: LightKind,
}

impl Light {
    /// Create a point light with no distance falloff.
    pub fn point(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color,
            radial: RadialAttenuation::NONE,
            kind: LightKind::Point,
        }
    }

    /// Create a spot light with no distance falloff.
    ///
    /// `theta` is the cone half-angle in degrees.
    pub fn spot(position: Vec3, color: Color, direction: Vec3, theta: f32, angular_exponent: f32) -> Self {
        Self {
            position,
            color,
            radial: RadialAttenuation::NONE,
            kind: LightKind::Spot(Spotlight {
                theta,
                cos_threshold: theta.to_radians().cos(),
                angular_exponent,
                direction: unit(direction).unwrap_or(direction),
            }),
        }
    }

    /// Set the radial attenuation coefficients.
    pub fn with_radial(mut self, a0: f32, a1: f32, a2: f32) -> Self {
        self.radial = RadialAttenuation::new(a0, a1, a2);
        self
    }

    pub fn is_spot(&self) -> bool {
        matches!(self.kind, LightKind::Spot(_))
    }
}

impl From<LightRecord> for Light {
    fn from(record: LightRecord) -> Self {
        let light = if record.theta == 0.0 {
            Light::point(record.position, record.color)
        } else {
            Light::spot(
                record.position,
                record.color,
                record.direction,
                record.theta,
                record.angular_a0,
            )
        };
        light.with_radial(record.radial_a0, record.radial_a1, record.radial_a2)
    }
}

impl From<Light> for LightRecord {
    fn from(light: Light) -> Self {
        let (theta, angular_a0, direction) = match light.kind {
            LightKind::Point => (0.0, 0.0, Vec3::ZERO),
            LightKind::Spot(spot) => (spot.theta, spot.angular_exponent, spot.direction),
        };
        Self {
            position: light.position,
            color: light.color,
            radial_a0: light.radial.a0,
            radial_a1: light.radial.a1,
            radial_a2: light.radial.a2,
            theta,
            angular_a0,
            direction,
        }
    }
}

/// Camera parameters the image sampler needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensor {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
}

/// A complete scene: surfaces and lights in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface and return its index.
    pub fn add_surface(&mut self, surface: Surface) -> usize {
        let index = self.surfaces.len();
        self.surfaces.push(surface);
        index
    }

    /// Add a light and return its index.
    pub fn add_light(&mut self, light: Light) -> usize {
        let index = self.lights.len();
        self.lights.push(light);
        index
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// The first camera in the scene, if any.
    pub fn camera(&self) -> Option<Sensor> {
        let surface = self.surfaces.iter().find(|surface| surface.is_camera())?;
        match surface.kind {
            SurfaceKind::Camera { width, height } => Some(Sensor {
                position: surface.position,
                width,
                height,
            }),
            _ => None,
        }
    }

    /// Normalize stored normals and directions and check the scene is renderable.
    ///
    /// Negative sphere radii are clamped to zero and reflectivity to [0, 1].
    pub fn validate(&mut self) -> Result<(), SceneError> {
        for (index, surface) in self.surfaces.iter_mut().enumerate() {
            if !(0.0..=1.0).contains(&surface.reflectivity) {
                let clamped = surface.reflectivity.clamp(0.0, 1.0);
                log::warn!(
                    "Surface {} has reflectivity {} outside [0, 1], clamping to {}",
                    index,
                    surface.reflectivity,
                    clamped
                );
                surface.reflectivity = clamped;
            }

            match &mut surface.kind {
                SurfaceKind::Plane { normal } => {
                    *normal = unit(*normal).ok_or(SceneError::DegenerateNormal { index })?;
                }
                SurfaceKind::Sphere { radius } if *radius < 0.0 => {
                    log::warn!("Sphere {} has negative radius {}, clamping to 0", index, radius);
                    *radius = 0.0;
                }
                _ => {}
            }
        }

        for (index, light) in self.lights.iter_mut().enumerate() {
            if let LightKind::Spot(spot) = &mut light.kind {
                spot.direction = unit(spot.direction).ok_or(SceneError::DegenerateDirection { index })?;
            }
        }

        if self.camera().is_none() {
            return Err(SceneError::MissingCamera);
        }

        Ok(())
    }
}
