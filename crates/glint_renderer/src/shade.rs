//! Local Phong illumination with hard shadows and mirror reflection.

use glint_core::{Light, LightKind, RadialAttenuation, Scene, Surface};
use glint_math::{from_points, Color, Ray, Vec3, VectorExt};

use crate::intersect::find_nearest;
use crate::renderer::RenderConfig;

/// Distance falloff `1 / (a0 + a1·d + a2·d²)`.
///
/// When the denominator is zero or negative (all-zero coefficients, or a
/// negative term outweighing the rest) the light is not attenuated and 1 is
/// returned instead of an infinite or negative factor.
#[inline]
pub fn radial_attenuation(radial: &RadialAttenuation, distance: f32) -> f32 {
    let denom = radial.a0 + radial.a1 * distance + radial.a2 * distance * distance;
    if denom > 0.0 {
        1.0 / denom
    } else {
        1.0
    }
}

/// Cone falloff for spot lights; always 1 for point lights.
///
/// `to_light` is the unit vector from the shaded point toward the light.
#[inline]
pub fn angular_attenuation(light: &Light, to_light: Vec3) -> f32 {
    match light.kind {
        LightKind::Point => 1.0,
        LightKind::Spot(spot) => {
            let cos_angle = (-to_light).dot(spot.direction);
            if cos_angle > spot.cos_threshold {
                cos_angle.powf(spot.angular_exponent)
            } else {
                0.0
            }
        }
    }
}

/// Diffuse plus specular light arriving at `point` from one light.
///
/// Zero when the light is blocked by another surface.
fn light_contribution(
    scene: &Scene,
    surface: &Surface,
    hit_index: usize,
    point: Vec3,
    normal: Vec3,
    ray_origin: Vec3,
    light: &Light,
) -> Color {
    let to_light = from_points(point, light.position);
    let distance = to_light.length_precise();
    if distance == 0.0 {
        return Color::ZERO;
    }
    let l = to_light / distance;

    // Hard shadow: anything between the point and the light blocks it entirely
    let shadow_ray = Ray::new(point, l);
    if let Some(blocker) = find_nearest(&scene.surfaces, &shadow_ray, Some(hit_index)) {
        if blocker.t < distance {
            return Color::ZERO;
        }
    }

    let attenuation = radial_attenuation(&light.radial, distance) * angular_attenuation(light, l);
    if attenuation == 0.0 {
        return Color::ZERO;
    }

    let n_dot_l = normal.dot(l);
    if n_dot_l <= 0.0 {
        return Color::ZERO;
    }

    let diffuse = n_dot_l * light.color * surface.diffuse;

    let reflected = (-l).reflect_about(normal);
    let view = from_points(point, ray_origin).normalize_precise();
    let r_dot_v = reflected.dot(view);
    let specular = if r_dot_v > 0.0 {
        r_dot_v.powf(surface.ns) * light.color * surface.specular
    } else {
        Color::ZERO
    };

    (diffuse + specular) * attenuation
}

/// Color leaving `hit_point` on surface `hit_index` toward `ray_origin`.
///
/// Sums every unshadowed light's diffuse and specular terms, adds the ambient
/// term and, for reflective surfaces, one mirror bounce traced with
/// `depth - 1`. A depth of 0 contributes nothing. Channels are clamped to at
/// most 1; they are never negative.
pub fn illuminate(
    scene: &Scene,
    config: &RenderConfig,
    hit_index: usize,
    hit_point: Vec3,
    ray_origin: Vec3,
    depth: u32,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(surface) = scene.surfaces.get(hit_index) else {
        return Color::ZERO;
    };
    let Some(normal) = surface.normal_at(hit_point) else {
        return Color::ZERO;
    };

    let lights: Color = scene
        .lights
        .iter()
        .map(|light| light_contribution(scene, surface, hit_index, hit_point, normal, ray_origin, light))
        .sum();

    let mut color = config.ambient + lights * (1.0 - surface.reflectivity);

    if surface.reflectivity == 0.0 {
        return color.min(Color::ONE);
    }

    let incoming = from_points(ray_origin, hit_point).normalize_precise();
    let bounce = Ray::new(hit_point, incoming.reflect_about(normal));

    if let Some(hit) = find_nearest(&scene.surfaces, &bounce, Some(hit_index)) {
        let reflected = illuminate(scene, config, hit.index, bounce.at(hit.t), hit_point, depth - 1);
        color += reflected * surface.reflectivity;
    }

    color.min(Color::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::AMBIENT;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn floor(reflectivity: f32) -> Surface {
        Surface::plane(Vec3::ZERO, Vec3::Y)
            .with_diffuse(Color::splat(0.5))
            .with_reflectivity(reflectivity)
    }

    fn assert_color(actual: Color, expected: Color) {
        assert!(
            actual.approx_eq(expected, 1e-5),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    /// Floor lit from straight above, with a red sphere in the floor's mirror
    /// direction as seen from (0, 1, 1). The light also reaches the sphere's
    /// underside.
    fn mirror_scene(reflectivity: f32) -> Scene {
        let mut scene = Scene::new();
        scene.add_surface(floor(reflectivity));
        scene.add_surface(
            Surface::sphere(Vec3::new(0.0, 5.0, -5.0), 1.0).with_diffuse(Color::new(1.0, 0.0, 0.0)),
        );
        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0), Color::ONE));
        scene
    }

    #[test]
    fn test_radial_attenuation() {
        let radial = RadialAttenuation::new(1.0, 0.5, 0.25);
        assert_eq!(radial_attenuation(&radial, 0.0), 1.0);
        assert_eq!(radial_attenuation(&radial, 2.0), 1.0 / 3.0);
        assert_eq!(radial_attenuation(&RadialAttenuation::NONE, 100.0), 1.0);
        assert_eq!(radial_attenuation(&RadialAttenuation::default(), 5.0), 1.0);
    }

    #[test]
    fn test_radial_attenuation_non_positive_denominator() {
        let radial = RadialAttenuation::new(1.0, -1.0, 0.0);
        assert_eq!(radial_attenuation(&radial, 0.5), 2.0);
        assert_eq!(radial_attenuation(&radial, 1.0), 1.0);
        assert_eq!(radial_attenuation(&radial, 2.0), 1.0);
        assert_eq!(radial_attenuation(&radial, 10.0), 1.0);
    }

    #[test]
    fn test_angular_attenuation() {
        let point = Light::point(Vec3::ZERO, Color::ONE);
        assert_eq!(angular_attenuation(&point, Vec3::X), 1.0);

        // Spot pointing down with a 30 degree half-angle
        let spot = Light::spot(Vec3::new(0.0, 10.0, 0.0), Color::ONE, Vec3::NEG_Y, 30.0, 2.0);

        // Directly below: full strength
        assert!((angular_attenuation(&spot, Vec3::Y) - 1.0).abs() < 1e-6);

        // 20 degrees off axis: cos(20)^2
        let off_axis = Vec3::new(20.0_f32.to_radians().sin(), 20.0_f32.to_radians().cos(), 0.0);
        let expected = 20.0_f32.to_radians().cos().powf(2.0);
        assert!((angular_attenuation(&spot, off_axis) - expected).abs() < 1e-5);

        // 45 degrees off axis: outside the cone
        let outside = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_eq!(angular_attenuation(&spot, outside), 0.0);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let scene = mirror_scene(0.0);
        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 0);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_diffuse_surface_skips_reflection() {
        // ambient 0.01 + N·L (1) * light (1) * diffuse (0.5); the red sphere
        // in the mirror direction must not leak in
        let scene = mirror_scene(0.0);
        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 5);
        assert_color(color, Color::splat(0.51));
    }

    #[test]
    fn test_reflective_surface_picks_up_reflection() {
        let scene = mirror_scene(0.5);
        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 5);

        // Local part: ambient + half of the 0.5 diffuse
        let local = 0.01 + 0.5 * 0.5;
        assert!(color.x > local + 0.01, "red channel {} shows no reflection", color.x);
        assert!((color.y - local - 0.5 * AMBIENT.y).abs() < 1e-5);
        assert!((color.z - local - 0.5 * AMBIENT.z).abs() < 1e-5);
    }

    #[test]
    fn test_occluded_light_leaves_ambient() {
        let mut scene = Scene::new();
        scene.add_surface(floor(0.0));
        scene.add_surface(Surface::sphere(Vec3::new(0.0, 5.0, 0.0), 1.0).with_diffuse(Color::ONE));
        scene.add_light(Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE));

        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 5);
        assert_color(color, AMBIENT);
    }

    #[test]
    fn test_blocker_past_light_does_not_shadow() {
        let mut scene = Scene::new();
        scene.add_surface(floor(0.0));
        scene.add_surface(Surface::sphere(Vec3::new(0.0, 20.0, 0.0), 1.0));
        scene.add_light(Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE));

        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 5);
        assert_color(color, Color::splat(0.51));
    }

    #[test]
    fn test_light_below_surface_contributes_nothing() {
        let mut scene = Scene::new();
        scene.add_surface(floor(0.0).with_specular(Color::ONE));
        scene.add_light(Light::point(Vec3::new(0.0, -10.0, 0.0), Color::ONE));

        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), 5);
        assert_color(color, AMBIENT);
    }

    #[test]
    fn test_specular_highlight_toward_viewer() {
        // Light and viewer mirrored about the normal: R·V = 1
        let mut scene = Scene::new();
        scene.add_surface(Surface::plane(Vec3::ZERO, Vec3::Y).with_specular(Color::ONE));
        scene.add_light(Light::point(Vec3::new(1.0, 1.0, 0.0), Color::splat(0.5)));

        let viewer = Vec3::new(-1.0, 1.0, 0.0);
        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, viewer, 5);
        assert_color(color, Color::splat(0.51));

        // Viewer on the light's side sees no highlight
        let viewer = Vec3::new(1.0, 1.0, 0.0);
        let color = illuminate(&scene, &RenderConfig::default(), 0, Vec3::ZERO, viewer, 5);
        assert_color(color, AMBIENT);
    }

    #[test]
    fn test_spot_cone_cutoff() {
        let mut scene = Scene::new();
        scene.add_surface(floor(0.0));
        scene.add_light(Light::spot(Vec3::new(0.0, 10.0, 0.0), Color::ONE, Vec3::NEG_Y, 10.0, 1.0));

        let config = RenderConfig::default();
        let viewer = Vec3::new(0.0, 1.0, 1.0);

        let inside = illuminate(&scene, &config, 0, Vec3::ZERO, viewer, 5);
        assert_color(inside, Color::splat(0.51));

        // 10 units to the side is 45 degrees off the spot axis
        let outside = illuminate(&scene, &config, 0, Vec3::new(10.0, 0.0, 0.0), viewer, 5);
        assert_color(outside, AMBIENT);
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let mut scene = Scene::new();
        scene.add_surface(Surface::plane(Vec3::new(0.0, 0.0, -1.0), Vec3::Z).with_reflectivity(1.0));
        scene.add_surface(Surface::plane(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z).with_reflectivity(1.0));
        scene.add_light(Light::point(Vec3::new(0.0, 0.5, 0.0), Color::ONE));

        let config = RenderConfig::default();
        let color = illuminate(&scene, &config, 0, Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO, config.max_depth);

        assert!(color.is_finite());
        assert!(color.cmple(Color::ONE).all());
        // Perfect mirrors only accumulate one ambient term per bounce
        assert_color(color, AMBIENT * config.max_depth as f32);
    }

    #[test]
    fn test_json_over_reflective_floor_stays_non_negative() {
        let json = r#"{
            "surfaces": [
                { "kind": "camera" },
                { "kind": "plane", "position": [0, -1, 0], "normal": [0, 1, 0],
                  "diffuse_color": [1, 1, 1], "reflectivity": 1.5 }
            ],
            "lights": [{ "position": [0, 3, -3], "color": [1, 1, 1], "radial_a0": 1 }]
        }"#;
        let scene = glint_core::parse_scene_json(json).unwrap();
        assert_eq!(scene.surfaces[1].reflectivity, 1.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0).normalize());
        let hit = find_nearest(&scene.surfaces, &ray, None).unwrap();
        let color = illuminate(&scene, &RenderConfig::default(), hit.index, ray.at(hit.t), ray.origin(), 5);

        // A perfect mirror reflecting empty sky keeps only the ambient term
        assert!(color.cmpge(Color::ZERO).all(), "negative channel in {}", color);
        assert_color(color, AMBIENT);
    }

    #[test]
    fn test_random_rays_stay_in_range() {
        let mut scene = Scene::new();
        scene.add_surface(
            Surface::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y)
                .with_diffuse(Color::new(0.9, 0.4, 0.1))
                .with_specular(Color::ONE),
        );
        scene.add_light(Light::point(Vec3::new(2.0, 3.0, -1.0), Color::splat(4.0)));
        scene.add_light(Light::point(Vec3::new(-2.0, 1.0, -4.0), Color::new(0.2, 0.8, 0.3)).with_radial(0.5, 0.1, 0.0));

        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..-0.05),
                rng.gen_range(-1.0..1.0),
            )
            .normalize();
            let ray = Ray::new(Vec3::ZERO, direction);
            let Some(hit) = find_nearest(&scene.surfaces, &ray, None) else {
                continue;
            };

            let color = illuminate(&scene, &config, hit.index, ray.at(hit.t), ray.origin(), 5);
            assert!(color.cmpge(Color::ZERO).all(), "negative channel in {}", color);
            assert!(color.cmple(Color::ONE).all(), "channel above 1 in {}", color);
        }
    }
}
