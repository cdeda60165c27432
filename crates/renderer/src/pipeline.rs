//! The per-frame pipeline: owns the framebuffer, runs draw calls through
//! every stage in order, applies post filters, hands the finished pixels
//! to the presentation layer.
//!
//! Triangles of one draw are rasterized strictly in sequence, so depth
//! resolution between overlapping triangles is well defined.

use std::sync::Arc;

use asset::MeshData;
use corelib::{Camera, CoreResult, Light, LightKind, Mat4, normal_matrix};

use crate::postfx::{self, PostFilter};
use crate::primitive;
use crate::raster::{self, RasterState};
use crate::shader::Material;
use crate::target::Framebuffer;
use crate::uniforms::{UniformValue, Uniforms};
use crate::vertex::assemble_vertices;

/// Per-frame constants: view/projection and lights already moved into
/// camera space. Built once per frame, shared by every draw call.
pub struct FrameContext {
    pub view: Mat4,
    pub proj: Mat4,
    pub lights: Arc<Vec<Light>>,
}

impl FrameContext {
    pub fn new(camera: &Camera, world_lights: &[Light]) -> Self {
        let view = camera.view();
        let lights = world_lights
            .iter()
            .map(|l| light_to_camera_space(view, l))
            .collect();
        Self {
            view,
            proj: camera.proj(),
            lights: Arc::new(lights),
        }
    }
}

fn light_to_camera_space(view: Mat4, light: &Light) -> Light {
    let kind = match light.kind {
        LightKind::Directional { direction } => LightKind::Directional {
            direction: view.transform_vector3(direction).normalize_or_zero(),
        },
        LightKind::Point { position } => LightKind::Point {
            position: view.transform_point3(position),
        },
        LightKind::Spot {
            position,
            direction,
            cutoff_rad,
            exponent,
        } => LightKind::Spot {
            position: view.transform_point3(position),
            direction: view.transform_vector3(direction).normalize_or_zero(),
            cutoff_rad,
            exponent,
        },
    };
    Light {
        kind,
        color: light.color,
    }
}

/// Software rendering pipeline bound to one framebuffer.
pub struct Pipeline {
    fb: Framebuffer,
}

impl Pipeline {
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.fb.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.fb.height()
    }

    pub fn resize(&mut self, width: u32, height: u32) -> CoreResult<()> {
        log::info!("Pipeline resize: {}x{}", width, height);
        self.fb.resize(width, height)
    }

    /// Reset color and depth for a new frame.
    pub fn clear(&mut self, argb: u32) {
        self.fb.clear(argb);
    }

    /// Draw one mesh with one material.
    ///
    /// `uniforms` carries the material's own bindings; the pipeline adds
    /// the reserved per-draw entries `proj`, `view_model`, `normal_matrix`
    /// and `opaque`, plus `lights` unless the caller bound its own list.
    pub fn draw(
        &mut self,
        mesh: &MeshData,
        material: &Material,
        frame: &FrameContext,
        model: Mat4,
        mut uniforms: Uniforms,
    ) {
        let view_model = frame.view * model;
        uniforms.set("proj", UniformValue::Mat4(frame.proj));
        uniforms.set("view_model", UniformValue::Mat4(view_model));
        uniforms.set("normal_matrix", UniformValue::Mat3(normal_matrix(view_model)));
        uniforms.set("opaque", UniformValue::Bool(material.opaque));
        if !uniforms.contains("lights") {
            uniforms.set("lights", UniformValue::Lights(frame.lights.clone()));
        }

        // Vertex assembly + vertex shader (in place).
        let mut vertices = assemble_vertices(mesh);
        for v in &mut vertices {
            material.vertex.shade(&uniforms, v);
        }

        // Primitive assembly, then the optional geometry stage.
        let mut triangles = primitive::assemble(material.topology, &vertices);
        if let Some(gs) = &material.geometry {
            triangles = triangles
                .iter()
                .flat_map(|t| gs.shade(&uniforms, t))
                .collect();
        }

        let state = RasterState {
            cull_backfaces: material.cull_backfaces,
            depth_compare: material.depth_compare,
            depth_write: material.depth_write,
            opaque: material.opaque,
            blend: material.blend,
            fragment: material.fragment.as_ref(),
            uniforms: &uniforms,
        };
        for tri in &triangles {
            raster::draw_triangle(&mut self.fb, tri, &state);
        }
        log::trace!(
            "draw: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );
    }

    /// Full-frame per-pixel filter, after all geometry.
    pub fn post_process(&mut self, filter: &dyn PostFilter) {
        postfx::run_filter(&mut self.fb, filter);
    }

    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Finished frame, ready for blit.
    #[inline]
    pub fn present(&self) -> &[u32] {
        self.fb.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::phong::{FlatShader, PhongShader, StandardVertexShader};
    use crate::primitive::Triangle;
    use crate::shader::GeometryShader;
    use asset::Face;
    use corelib::vec3;

    fn identity_frame() -> FrameContext {
        FrameContext {
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            lights: Arc::new(Vec::new()),
        }
    }

    /// One CCW triangle covering the whole NDC viewport, normal +Z.
    fn fullscreen_mesh(zndc: f32) -> MeshData {
        let mut mesh = MeshData::new(
            vec![[-1.0, -1.0, zndc], [3.0, -1.0, zndc], [-1.0, 3.0, zndc]],
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            vec![[0.0, 0.0, 1.0]],
            vec![Face {
                positions: [0, 1, 2],
                uvs: [0, 1, 2],
                normals: [0, 0, 0],
                tangents: [[1.0, 0.0, 0.0]; 3],
            }],
        );
        mesh.compute_tangents();
        mesh
    }

    fn flat_material() -> Material {
        Material::new(Arc::new(StandardVertexShader), Arc::new(FlatShader))
    }

    fn flat_uniforms(argb: u32) -> Uniforms {
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(argb));
        u
    }

    #[test]
    fn white_triangle_on_black_background() {
        let mut p = Pipeline::new(16, 16).unwrap();
        p.clear(color::BLACK);
        p.draw(
            &fullscreen_mesh(0.0),
            &flat_material(),
            &identity_frame(),
            Mat4::IDENTITY,
            flat_uniforms(color::WHITE),
        );
        assert!(p.present().iter().all(|&c| c == color::WHITE));
    }

    #[test]
    fn depth_orders_draws_regardless_of_submission_order() {
        let mut p = Pipeline::new(8, 8).unwrap();
        p.clear(color::BLACK);
        let near = fullscreen_mesh(-0.5);
        let far = fullscreen_mesh(0.5);
        let m = flat_material();
        let f = identity_frame();

        p.draw(&near, &m, &f, Mat4::IDENTITY, flat_uniforms(0xFFFF_0000));
        p.draw(&far, &m, &f, Mat4::IDENTITY, flat_uniforms(0xFF00_00FF));
        assert!(p.present().iter().all(|&c| c == 0xFFFF_0000));

        p.clear(color::BLACK);
        p.draw(&far, &m, &f, Mat4::IDENTITY, flat_uniforms(0xFF00_00FF));
        p.draw(&near, &m, &f, Mat4::IDENTITY, flat_uniforms(0xFFFF_0000));
        assert!(p.present().iter().all(|&c| c == 0xFFFF_0000));
    }

    #[test]
    fn transparent_material_blends_over_background() {
        let mut p = Pipeline::new(4, 4).unwrap();
        p.clear(color::pack(255, 0, 0, 0));
        let m = flat_material().transparent();
        // Half-transparent white over black: mid gray.
        p.draw(
            &fullscreen_mesh(0.0),
            &m,
            &identity_frame(),
            Mat4::IDENTITY,
            flat_uniforms(color::pack(128, 255, 255, 255)),
        );
        let c = p.present()[0];
        assert_eq!(color::red(c), 128);
        assert_eq!(color::alpha(c), 255);
    }

    #[test]
    fn geometry_shader_can_discard_everything() {
        struct DiscardAll;
        impl GeometryShader for DiscardAll {
            fn shade(&self, _u: &Uniforms, _t: &Triangle) -> Vec<Triangle> {
                Vec::new()
            }
        }

        let mut p = Pipeline::new(4, 4).unwrap();
        p.clear(color::BLACK);
        let m = flat_material().with_geometry(Arc::new(DiscardAll));
        p.draw(
            &fullscreen_mesh(0.0),
            &m,
            &identity_frame(),
            Mat4::IDENTITY,
            flat_uniforms(color::WHITE),
        );
        assert!(p.present().iter().all(|&c| c == color::BLACK));
    }

    #[test]
    fn phong_directional_scenario_exact_diffuse() {
        // White directional light head-on, mid-gray diffuse, zero ambient
        // and specular: every covered pixel is exactly the diffuse color.
        let mut p = Pipeline::new(8, 8).unwrap();
        p.clear(color::BLACK);

        let m = Material::new(Arc::new(StandardVertexShader), Arc::new(PhongShader));
        let frame = FrameContext {
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            lights: Arc::new(vec![Light::directional(
                vec3(0.0, 0.0, -1.0),
                0xFFFF_FFFF,
            )]),
        };
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(0xFF80_8080));
        u.set("ambient_light", UniformValue::Color(0xFF00_0000));
        u.set("specular_color", UniformValue::Color(0xFF00_0000));
        u.set("shininess", UniformValue::Float(8.0));

        p.draw(&fullscreen_mesh(0.0), &m, &frame, Mat4::IDENTITY, u);
        assert!(p.present().iter().all(|&c| c == 0xFF80_8080));
    }

    #[test]
    fn frame_context_moves_lights_into_camera_space() {
        let camera = Camera::new_perspective(
            vec3(0.0, 0.0, 5.0),
            vec3(0.0, 0.0, 0.0),
            corelib::Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            1.0,
        );
        let frame = FrameContext::new(&camera, &[Light::point(vec3(0.0, 0.0, 0.0), 0xFFFF_FFFF)]);
        match frame.lights[0].kind {
            LightKind::Point { position } => {
                assert!((position - vec3(0.0, 0.0, -5.0)).length() < 1e-5);
            }
            _ => panic!("expected point light"),
        }
    }

    #[test]
    fn post_process_runs_after_geometry() {
        let mut p = Pipeline::new(4, 4).unwrap();
        p.clear(color::WHITE);
        p.post_process(&postfx::Invert);
        assert!(p.present().iter().all(|&c| c == color::BLACK));
    }
}
