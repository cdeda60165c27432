//! Built-in shaders. S1: standard vertex stage, S2: Phong lighting,
//! S3: unlit flat color.
//!
//! Shading happens in camera space: the vertex stage rewrites position,
//! normal and tangent with the view-model matrix (inverse transpose for
//! the vectors, so non-uniform scale keeps normals correct), and the
//! pipeline hands the fragment stage lights already in camera space.
//!
//! Reserved uniform names written by the pipeline itself: `proj`,
//! `view_model`, `normal_matrix`, `lights`, `opaque`.

use corelib::LightKind;
use glam::Vec3;

use crate::color;
use crate::shader::{FragmentShader, VertexShader};
use crate::uniforms::Uniforms;
use crate::vertex::Vertex;

/// Default specular tint when no map or color is bound: neutral gray.
const SPECULAR_GRAY: u32 = 0xFF80_8080;

#[inline]
fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * i.dot(n) * n
}

/// Projects the vertex and moves its attribute slots into camera space.
///
/// Uniforms: `proj` (Mat4), `view_model` (Mat4), `normal_matrix` (Mat3,
/// inverse transpose of view_model's upper 3x3).
pub struct StandardVertexShader;

impl VertexShader for StandardVertexShader {
    fn shade(&self, uniforms: &Uniforms, vertex: &mut Vertex) {
        let view_model = uniforms.mat4("view_model");
        let normal_matrix = uniforms.mat3("normal_matrix");

        let view_pos = view_model * vertex.position.extend(1.0);
        vertex.clip = uniforms.mat4("proj") * view_pos;
        vertex.position = view_pos.truncate();
        vertex.normal = (normal_matrix * vertex.normal).normalize_or_zero();
        vertex.tangent = (normal_matrix * vertex.tangent).normalize_or_zero();
    }
}

/// Phong lighting model.
///
/// Required uniforms: `diffuse_color` (Color), `ambient_light` (Color),
/// `lights` (Lights, camera space), `shininess` (Float).
/// Optional: `diffuse_map`, `specular_map`, `specular_color`,
/// `normal_map` + `normal_strength`, `environment` (CubeMap) +
/// `reflection_map` + `reflectivity`, `transparency`.
pub struct PhongShader;

impl PhongShader {
    /// Geometric or normal-mapped shading normal.
    fn shading_normal(uniforms: &Uniforms, fragment: &Vertex) -> Vec3 {
        let n = fragment.normal.normalize_or_zero();
        let Some(map) = uniforms.try_texture("normal_map") else {
            return n;
        };

        let sample = map.sample(fragment.uv.x, fragment.uv.y);
        let ts = Vec3::new(
            color::red(sample) as f32 / 255.0 * 2.0 - 1.0,
            color::green(sample) as f32 / 255.0 * 2.0 - 1.0,
            color::blue(sample) as f32 / 255.0 * 2.0 - 1.0,
        );

        // Gram-Schmidt the interpolated tangent against the normal, then
        // take the sample out of tangent space.
        let t = (fragment.tangent - n * fragment.tangent.dot(n)).normalize_or_zero();
        let b = n.cross(t);
        let mapped = (t * ts.x + b * ts.y + n * ts.z).normalize_or_zero();

        let strength = uniforms
            .try_float("normal_strength")
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);
        n.lerp(mapped, strength).normalize_or_zero()
    }
}

impl FragmentShader for PhongShader {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> u32 {
        let diffuse_color = uniforms.color("diffuse_color");
        let base = match uniforms.try_texture("diffuse_map") {
            Some(map) => color::mul(map.sample(fragment.uv.x, fragment.uv.y), diffuse_color),
            None => diffuse_color,
        };

        let n = Self::shading_normal(uniforms, fragment);
        // Camera space: the eye sits at the origin.
        let view_dir = (-fragment.position).normalize_or_zero();

        let mut acc = color::mul(base, uniforms.color("ambient_light"));

        let shininess = uniforms.float("shininess");
        let spec_base = match uniforms.try_texture("specular_map") {
            Some(map) => map.sample(fragment.uv.x, fragment.uv.y),
            None => uniforms.try_color("specular_color").unwrap_or(SPECULAR_GRAY),
        };

        for light in uniforms.lights("lights").iter() {
            let (light_dir, attenuation) = match light.kind {
                LightKind::Directional { direction } => (-direction, 1.0),
                LightKind::Point { position } => {
                    ((position - fragment.position).normalize_or_zero(), 1.0)
                }
                LightKind::Spot {
                    position,
                    direction,
                    cutoff_rad,
                    exponent,
                } => {
                    let l = (position - fragment.position).normalize_or_zero();
                    let cos_axis = (-l).dot(direction);
                    if cos_axis < cutoff_rad.cos() {
                        continue; // outside the cone
                    }
                    (l, cos_axis.max(0.0).powf(exponent))
                }
            };

            let ndl = n.dot(light_dir);
            if ndl <= 0.0 {
                // Zero diffuse gates the specular term too.
                continue;
            }

            let lit = color::mul(base, light.color);
            acc = color::add(acc, color::scale(lit, ndl * attenuation));

            let r = reflect(-light_dir, n);
            let rv = r.dot(view_dir).max(0.0);
            if rv > 0.0 {
                let spec = color::mul(spec_base, light.color);
                acc = color::add(acc, color::scale(spec, rv.powf(shininess) * attenuation));
            }
        }

        if let Some(env) = uniforms.try_cubemap("environment") {
            let refl = reflect(fragment.position.normalize_or_zero(), n);
            let mut env_color = env.sample(refl);
            if let Some(mask) = uniforms.try_texture("reflection_map") {
                env_color = color::mul(env_color, mask.sample(fragment.uv.x, fragment.uv.y));
            }
            let reflectivity = uniforms
                .try_float("reflectivity")
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            acc = color::add(acc, color::scale(env_color, reflectivity));
        }

        let alpha = if uniforms.try_flag("opaque").unwrap_or(true) {
            0xFF
        } else {
            let t = uniforms
                .try_float("transparency")
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            (color::alpha(base) as f32 * t).round() as u32
        };
        color::argb(
            alpha,
            color::red(acc) as u32,
            color::green(acc) as u32,
            color::blue(acc) as u32,
        )
    }
}

/// Unlit: diffuse map times diffuse color, no lighting at all.
pub struct FlatShader;

impl FragmentShader for FlatShader {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> u32 {
        let diffuse_color = uniforms.color("diffuse_color");
        let base = match uniforms.try_texture("diffuse_map") {
            Some(map) => color::mul(map.sample(fragment.uv.x, fragment.uv.y), diffuse_color),
            None => diffuse_color,
        };
        if uniforms.try_flag("opaque").unwrap_or(true) {
            base | 0xFF00_0000
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::UniformValue;
    use corelib::{Light, normal_matrix};
    use glam::{Mat4, Vec2, vec3};
    use std::sync::Arc;

    fn frag(normal: Vec3, position: Vec3) -> Vertex {
        Vertex {
            normal,
            position,
            tangent: Vec3::X,
            uv: Vec2::ZERO,
            ..Vertex::default()
        }
    }

    fn base_uniforms(lights: Vec<Light>) -> Uniforms {
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(0xFF80_8080));
        u.set("ambient_light", UniformValue::Color(0xFF00_0000));
        u.set("specular_color", UniformValue::Color(0xFF00_0000));
        u.set("shininess", UniformValue::Float(16.0));
        u.set("lights", UniformValue::Lights(Arc::new(lights)));
        u
    }

    #[test]
    fn directional_light_head_on_gives_exact_diffuse() {
        // White light opposite the normal, mid-gray diffuse, zero ambient
        // and zero specular: output is exactly the diffuse color.
        let u = base_uniforms(vec![Light::directional(vec3(0.0, 0.0, -1.0), 0xFFFF_FFFF)]);
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        assert_eq!(PhongShader.shade(&u, &f), 0xFF80_8080);
    }

    #[test]
    fn light_behind_surface_adds_nothing() {
        let u = base_uniforms(vec![Light::directional(vec3(0.0, 0.0, 1.0), 0xFFFF_FFFF)]);
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        assert_eq!(PhongShader.shade(&u, &f), 0xFF00_0000);
    }

    #[test]
    fn ambient_term_modulates_diffuse() {
        let u = {
            let mut u = Uniforms::new();
            u.set("diffuse_color", UniformValue::Color(0xFF80_8080));
            u.set("ambient_light", UniformValue::Color(0xFFFF_FFFF));
            u.set("shininess", UniformValue::Float(1.0));
            u.set("lights", UniformValue::Lights(Arc::new(Vec::new())));
            u
        };
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        assert_eq!(PhongShader.shade(&u, &f), 0xFF80_8080);
    }

    #[test]
    fn spotlight_outside_cone_is_dark() {
        // Spot at the origin pointing -Z; fragment far off-axis.
        let spot = Light::spot(
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, -1.0),
            0.3,
            2.0,
            0xFFFF_FFFF,
        );
        let u = base_uniforms(vec![spot]);
        let off_axis = frag(Vec3::Z, vec3(10.0, 0.0, -1.0));
        assert_eq!(PhongShader.shade(&u, &off_axis), 0xFF00_0000);

        // On axis it lights up.
        let on_axis = frag(Vec3::Z, vec3(0.0, 0.0, -1.0));
        assert!(PhongShader.shade(&u, &on_axis) > 0xFF00_0000);
    }

    #[test]
    fn point_light_illuminates_facing_surface() {
        let u = base_uniforms(vec![Light::point(vec3(0.0, 0.0, 0.0), 0xFFFF_FFFF)]);
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -2.0));
        assert_eq!(PhongShader.shade(&u, &f), 0xFF80_8080);
    }

    #[test]
    fn normal_map_with_zero_strength_is_inert() {
        let mut u = base_uniforms(vec![Light::directional(
            vec3(0.0, 0.0, -1.0),
            0xFFFF_FFFF,
        )]);
        // A normal map pushing everything sideways, but strength 0.
        let bmp = asset::Bitmap::solid(color::pack(255, 255, 128, 128));
        u.set(
            "normal_map",
            UniformValue::Texture(Arc::new(crate::texture::Texture::new(Arc::new(bmp)))),
        );
        u.set("normal_strength", UniformValue::Float(0.0));
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        assert_eq!(PhongShader.shade(&u, &f), 0xFF80_8080);
    }

    #[test]
    fn environment_reflection_adds_sampled_color() {
        let mut u = base_uniforms(Vec::new());
        let face = crate::texture::Texture::new(Arc::new(asset::Bitmap::solid(0xFF10_2030)));
        u.set(
            "environment",
            UniformValue::CubeMap(Arc::new(crate::cubemap::CubeMap::splat(face))),
        );
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        // Ambient is black, no lights: result is exactly the reflection.
        assert_eq!(PhongShader.shade(&u, &f), 0xFF10_2030);
    }

    #[test]
    fn transparency_scales_sample_alpha() {
        let mut u = base_uniforms(Vec::new());
        u.set("opaque", UniformValue::Bool(false));
        u.set("transparency", UniformValue::Float(0.5));
        let f = frag(Vec3::Z, vec3(0.0, 0.0, -3.0));
        let out = PhongShader.shade(&u, &f);
        assert_eq!(color::alpha(out), 128);
    }

    #[test]
    fn standard_vertex_shader_sets_clip_and_camera_space() {
        let mut u = Uniforms::new();
        let view_model = Mat4::from_translation(vec3(0.0, 0.0, -5.0));
        u.set("proj", UniformValue::Mat4(Mat4::IDENTITY));
        u.set("view_model", UniformValue::Mat4(view_model));
        u.set(
            "normal_matrix",
            UniformValue::Mat3(normal_matrix(view_model)),
        );

        let mut v = Vertex {
            position: vec3(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            tangent: Vec3::X,
            ..Vertex::default()
        };
        StandardVertexShader.shade(&u, &mut v);

        assert_eq!(v.position, vec3(1.0, 2.0, -2.0));
        assert_eq!(v.clip, v.position.extend(1.0));
        assert_eq!(v.normal, Vec3::Y);
        assert_eq!(v.tangent, Vec3::X);
    }
}
