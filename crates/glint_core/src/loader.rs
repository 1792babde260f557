//! Scene file loading.
//!
//! The text format holds one entity per line:
//!
//! ```text
//! camera, width: 2.0, height: 2.0
//! sphere, diffuse_color: [1, 0, 0], position: [0, 1, -5], radius: 2
//! plane, diffuse_color: [0, 0, 1], position: [0, -1, 0], normal: [0, 1, 0]
//! light, color: [2, 2, 2], theta: 0, radial-a2: 0.125, radial-a1: 0.125, radial-a0: 0.125, position: [1, 3, 0]
//! ```
//!
//! Keys may appear in any order and missing keys take their defaults. Blank
//! lines and lines starting with `#` are skipped. Files ending in `.json` are
//! read as a serialized [`Scene`] instead.

use std::path::Path;

use glint_math::{Vec3, VectorExt};
use thiserror::Error;

use crate::scene::{Light, LightRecord, Scene, SceneError, Surface, SurfaceKind};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number `{value}` at line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("Unknown entity kind `{kind}` at line {line}")]
    UnknownKind { line: usize, kind: String },

    #[error("Zero-length `{field}` at line {line}")]
    DegenerateVector { line: usize, field: &'static str },

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// A parsed field value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Scalar(f32),
    Vector(Vec3),
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}

/// Load a scene from disk, choosing the format by extension.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let scene = if is_json {
        parse_scene_json(&content)?
    } else {
        parse_scene(&content)?
    };

    log::info!(
        "Loaded {}: {} surfaces, {} lights",
        path.display(),
        scene.surface_count(),
        scene.light_count()
    );

    Ok(scene)
}

/// Parse a JSON scene and validate it.
pub fn parse_scene_json(content: &str) -> LoadResult<Scene> {
    let mut scene: Scene = serde_json::from_str(content)?;
    scene.validate()?;
    Ok(scene)
}

/// Parse the line-oriented text format and validate the result.
pub fn parse_scene(content: &str) -> LoadResult<Scene> {
    let mut scene = Scene::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (kind, rest) = trimmed.split_once(',').unwrap_or((trimmed, ""));
        let kind = kind.trim();
        let fields = parse_fields(rest, line)?;

        match kind {
            "light" => {
                let light = light_from_fields(&fields, line)?;
                log::debug!(
                    "Line {}: {} light at {}",
                    line,
                    if light.is_spot() { "spot" } else { "point" },
                    light.position
                );
                scene.add_light(light);
            }
            "camera" | "sphere" | "plane" => {
                let surface = surface_from_fields(kind, &fields, line)?;
                log::debug!("Line {}: {} at {}", line, kind, surface.position);
                scene.add_surface(surface);
            }
            other => {
                return Err(LoadError::UnknownKind {
                    line,
                    kind: other.to_string(),
                })
            }
        }
    }

    scene.validate()?;
    Ok(scene)
}

/// Split `key: value, key: [x, y, z], ...` into key/value pairs.
fn parse_fields(rest: &str, line: usize) -> LoadResult<Vec<(String, Value)>> {
    let mut fields = Vec::new();
    let mut remaining = rest.trim();

    while !remaining.is_empty() {
        let (key, after) = remaining
            .split_once(':')
            .ok_or_else(|| parse_error(line, format!("expected `key: value`, found `{}`", remaining)))?;
        let key = key.trim();
        let after = after.trim_start();

        let (value, tail) = if let Some(inner) = after.strip_prefix('[') {
            let (body, tail) = inner
                .split_once(']')
                .ok_or_else(|| parse_error(line, format!("unclosed `[` in `{}`", key)))?;
            (Value::Vector(parse_vector(body, line)?), tail)
        } else {
            let (token, tail) = after.split_once(',').unwrap_or((after, ""));
            (Value::Scalar(parse_number(token, line)?), tail)
        };

        fields.push((key.to_string(), value));
        remaining = tail.trim_start().trim_start_matches(',').trim_start();
    }

    Ok(fields)
}

fn parse_number(token: &str, line: usize) -> LoadResult<f32> {
    let token = token.trim();
    token.parse::<f32>().map_err(|_| LoadError::InvalidNumber {
        line,
        value: token.to_string(),
    })
}

fn parse_vector(body: &str, line: usize) -> LoadResult<Vec3> {
    let components = body
        .split(',')
        .map(|c| parse_number(c, line))
        .collect::<LoadResult<Vec<f32>>>()?;

    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(parse_error(
            line,
            format!("expected 3 components, found {}", components.len()),
        )),
    }
}

fn expect_scalar(key: &str, value: Value, line: usize) -> LoadResult<f32> {
    match value {
        Value::Scalar(s) => Ok(s),
        Value::Vector(_) => Err(parse_error(line, format!("`{}` expects a number", key))),
    }
}

fn expect_vector(key: &str, value: Value, line: usize) -> LoadResult<Vec3> {
    match value {
        Value::Vector(v) => Ok(v),
        Value::Scalar(_) => Err(parse_error(line, format!("`{}` expects [x, y, z]", key))),
    }
}

fn unit_vector(v: Vec3, field: &'static str, line: usize) -> LoadResult<Vec3> {
    let len = v.length_precise();
    if len > 0.0 && len.is_finite() {
        Ok(v / len)
    } else {
        Err(LoadError::DegenerateVector { line, field })
    }
}

fn surface_from_fields(kind: &str, fields: &[(String, Value)], line: usize) -> LoadResult<Surface> {
    let mut surface = match kind {
        "camera" => Surface::camera(Vec3::ZERO, 1.0, 1.0),
        "sphere" => Surface::sphere(Vec3::ZERO, 0.0),
        _ => Surface::plane(Vec3::ZERO, Vec3::ZERO),
    };

    for (key, value) in fields {
        let value = *value;
        match (key.as_str(), &mut surface.kind) {
            ("diffuse_color", _) => surface.diffuse = expect_vector(key, value, line)?,
            ("specular_color", _) => surface.specular = expect_vector(key, value, line)?,
            ("position", _) => surface.position = expect_vector(key, value, line)?,
            ("reflectivity", _) => surface.reflectivity = expect_scalar(key, value, line)?,
            ("ns", _) => surface.ns = expect_scalar(key, value, line)?,
            ("width", SurfaceKind::Camera { width, .. }) => *width = expect_scalar(key, value, line)?,
            ("height", SurfaceKind::Camera { height, .. }) => *height = expect_scalar(key, value, line)?,
            ("radius", SurfaceKind::Sphere { radius }) => *radius = expect_scalar(key, value, line)?,
            ("normal", SurfaceKind::Plane { normal }) => *normal = expect_vector(key, value, line)?,
            _ => log::warn!("Line {}: ignoring unknown {} key `{}`", line, kind, key),
        }
    }

    if let SurfaceKind::Plane { normal } = &mut surface.kind {
        *normal = unit_vector(*normal, "normal", line)?;
    }

    Ok(surface)
}

fn light_from_fields(fields: &[(String, Value)], line: usize) -> LoadResult<Light> {
    let mut record = LightRecord::default();

    for (key, value) in fields {
        let value = *value;
        match key.as_str() {
            "color" => record.color = expect_vector(key, value, line)?,
            "position" => record.position = expect_vector(key, value, line)?,
            "direction" => record.direction = expect_vector(key, value, line)?,
            "radial-a0" => record.radial_a0 = expect_scalar(key, value, line)?,
            "radial-a1" => record.radial_a1 = expect_scalar(key, value, line)?,
            "radial-a2" => record.radial_a2 = expect_scalar(key, value, line)?,
            "theta" => record.theta = expect_scalar(key, value, line)?,
            "angular-a0" => record.angular_a0 = expect_scalar(key, value, line)?,
            _ => log::warn!("Line {}: ignoring unknown light key `{}`", line, key),
        }
    }

    if record.theta != 0.0 {
        record.direction = unit_vector(record.direction, "direction", line)?;
    }

    Ok(Light::from(record))
}
