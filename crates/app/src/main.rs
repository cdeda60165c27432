//! Entry point for Perun3D.
//! Demo scene: rotating textured cube over a checkered floor, three light
//! kinds, one transparent cube, optional full-frame filter.

use std::sync::Arc;

use anyhow::{Context, Result};
use asset::{AssetStore, Bitmap, MeshHandle};
use corelib::{
    Camera, Light, LightKind, Transform, Vec3,
    ecs::{LightSource, MaterialId, MeshId, Renderable, World},
    vec3,
};
use renderer::{
    CubeMap, FrameContext, Framebuffer, Material, PhongShader, Pipeline, SampleFilter,
    StandardVertexShader, Texture, UniformValue, Uniforms, postfx,
};

// ---------- CLI ----------

/// `--size=WxH`, overridable per axis with `--width=`/`--height=`.
/// Unparsable values keep the previous setting; zero is clamped to 1.
fn parse_size(args: impl Iterator<Item = String>) -> (u32, u32) {
    let (mut w, mut h) = (960u32, 540u32);
    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once(['x', 'X']) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    (w, h) = (pw, ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            w = v.parse().unwrap_or(w);
        } else if let Some(v) = arg.strip_prefix("--height=") {
            h = v.parse().unwrap_or(h);
        }
    }
    (w.max(1), h.max(1))
}

/// `--show-fps` or `--show-fps=on|off`; off unless asked for.
fn parse_show_fps(args: impl Iterator<Item = String>) -> bool {
    let mut show = false;
    for arg in args {
        if arg == "--show-fps" {
            show = true;
        } else if let Some(v) = arg.strip_prefix("--show-fps=") {
            show = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes");
        }
    }
    show
}

/// `--scene=demo` (default) or `--scene=<path.obj>`.
fn parse_scene(args: impl Iterator<Item = String>) -> Option<String> {
    for arg in args {
        if let Some(val) = arg.strip_prefix("--scene=") {
            if val != "demo" {
                return Some(val.to_owned());
            }
        }
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterKind {
    None,
    Invert,
    Grayscale,
    Vignette,
}

fn parse_filter(args: impl Iterator<Item = String>) -> FilterKind {
    // --filter=none|invert|grayscale|vignette
    for arg in args {
        if let Some(val) = arg.strip_prefix("--filter=") {
            return match val.to_ascii_lowercase().as_str() {
                "none" => FilterKind::None,
                "invert" => FilterKind::Invert,
                "grayscale" | "gray" => FilterKind::Grayscale,
                "vignette" => FilterKind::Vignette,
                other => {
                    eprintln!("[warn] Unknown filter '{}', using none.", other);
                    FilterKind::None
                }
            };
        }
    }
    FilterKind::None
}

// ---------- Scene ----------

struct MaterialEntry {
    material: Material,
    /// Template cloned into every draw of this material.
    uniforms: Uniforms,
}

struct Scene {
    store: AssetStore,
    world: World,
    materials: Vec<MaterialEntry>,
    camera: Camera,
    pipeline: Pipeline,
    filter: FilterKind,
    /// Entity animated each frame.
    spinner: corelib::ecs::Entity,
    /// Scratch reused across frames.
    lights: Vec<Light>,
    draws: Vec<(Transform, Renderable)>,
}

/// Six solid-color faces standing in for a real sky probe.
fn debug_environment() -> CubeMap {
    let tints = [
        0xFF30_4868, // +X
        0xFF28_3C58, // -X
        0xFF48_6088, // +Y: brighter above
        0xFF20_2830, // -Y
        0xFF38_5070, // +Z
        0xFF28_3C58, // -Z
    ];
    let faces = tints.map(|c| Texture::new(Arc::new(Bitmap::solid(c))));
    CubeMap::new(faces)
}

impl Scene {
    fn build(
        obj_path: Option<&str>,
        filter: FilterKind,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let mut store = AssetStore::new();
        let mut world = World::new();
        let mut materials = Vec::new();

        let checker = Arc::new(Texture::new(Arc::new(Bitmap::checkerboard(64)))
            .with_filter(SampleFilter::Bilinear));
        let environment = Arc::new(debug_environment());

        // Hero mesh: OBJ from disk, or the built-in cube.
        let hero_mesh = match obj_path {
            Some(path) => {
                let mesh = asset::obj::load_obj_from_path(path)
                    .with_context(|| format!("loading scene mesh '{path}'"))?;
                log::info!("Loaded '{}': {} faces", path, mesh.faces.len());
                store.add_mesh(mesh)
            }
            None => store.add_mesh(asset::primitives::cube()),
        };
        let floor_mesh = store.add_mesh(asset::primitives::plane(6.0, 6.0));
        let cube_mesh = store.add_mesh(asset::primitives::cube());

        // 0: hero (checkered, slightly reflective)
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(0xFFFF_FFFF));
        u.set("diffuse_map", UniformValue::Texture(checker.clone()));
        u.set("ambient_light", UniformValue::Color(0xFF20_2020));
        u.set("shininess", UniformValue::Float(32.0));
        u.set("environment", UniformValue::CubeMap(environment));
        u.set("reflectivity", UniformValue::Float(0.2));
        materials.push(MaterialEntry {
            material: Material::new(Arc::new(StandardVertexShader), Arc::new(PhongShader)),
            uniforms: u,
        });

        // 1: floor
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(0xFF60_7090));
        u.set("diffuse_map", UniformValue::Texture(checker));
        u.set("ambient_light", UniformValue::Color(0xFF28_2828));
        u.set("shininess", UniformValue::Float(8.0));
        u.set("specular_color", UniformValue::Color(0xFF20_2020));
        materials.push(MaterialEntry {
            material: Material::new(Arc::new(StandardVertexShader), Arc::new(PhongShader)),
            uniforms: u,
        });

        // 2: tinted glass
        let mut u = Uniforms::new();
        u.set("diffuse_color", UniformValue::Color(0xFF70_B0E0));
        u.set("ambient_light", UniformValue::Color(0xFF40_4040));
        u.set("shininess", UniformValue::Float(64.0));
        u.set("transparency", UniformValue::Float(0.45));
        materials.push(MaterialEntry {
            material: Material::new(Arc::new(StandardVertexShader), Arc::new(PhongShader))
                .transparent(),
            uniforms: u,
        });

        let spinner = world.spawn(
            Transform::identity(),
            Some(Renderable {
                mesh: MeshId(hero_mesh.0),
                material: MaterialId(0),
            }),
            None,
        );
        world.spawn(
            Transform::at(vec3(0.0, -1.5, 0.0)),
            Some(Renderable {
                mesh: MeshId(floor_mesh.0),
                material: MaterialId(1),
            }),
            None,
        );
        world.spawn(
            Transform::at(vec3(2.2, -0.5, 1.0)).with_scale(Vec3::splat(0.6)),
            Some(Renderable {
                mesh: MeshId(cube_mesh.0),
                material: MaterialId(2),
            }),
            None,
        );

        // Key light + warm point fill + a spot from above.
        world.spawn(
            Transform::identity(),
            None,
            Some(LightSource {
                light: Light::directional(vec3(-0.4, -1.0, -0.6), 0xFFB0_B0B0),
            }),
        );
        world.spawn(
            Transform::at(vec3(-2.5, 1.5, 2.0)),
            None,
            Some(LightSource {
                light: Light::point(Vec3::ZERO, 0xFF80_5020),
            }),
        );
        world.spawn(
            Transform::at(vec3(0.0, 4.0, 0.0)),
            None,
            Some(LightSource {
                light: Light::spot(Vec3::ZERO, vec3(0.0, -1.0, 0.0), 0.5, 4.0, 0xFF60_60FF),
            }),
        );

        let camera = Camera::new_perspective(
            vec3(3.0, 2.0, 4.5),
            vec3(0.0, -0.2, 0.0),
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            width as f32 / height as f32,
        )
        .with_clear_color(0xFF0D_0D14);

        Ok(Self {
            store,
            world,
            materials,
            camera,
            pipeline: Pipeline::new(width, height)?,
            filter,
            spinner,
            lights: Vec::new(),
            draws: Vec::new(),
        })
    }
}

/// Point/spot geometry follows the owning entity's translation.
fn light_in_world(t: &Transform, source: &LightSource) -> Light {
    let mut light = source.light;
    match &mut light.kind {
        LightKind::Directional { .. } => {}
        LightKind::Point { position } => *position += t.translation,
        LightKind::Spot { position, .. } => *position += t.translation,
    }
    light
}

impl platform::FrameHook for Scene {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pipeline.resize(width, height)?;
        self.camera = self.camera.with_aspect(width as f32 / height as f32);
        Ok(())
    }

    fn render(&mut self, dt: f32) -> Result<&Framebuffer> {
        if let Some(t) = self.world.transform_mut(self.spinner) {
            t.rotation_euler.y += 0.7 * dt;
            t.rotation_euler.x += 0.3 * dt;
        }

        self.lights.clear();
        self.lights
            .extend(self.world.iter_lights().map(|(t, l)| light_in_world(t, l)));
        let frame = FrameContext::new(&self.camera, &self.lights);

        // Opaque first, then transparent back-to-front.
        self.draws.clear();
        self.draws
            .extend(self.world.iter_renderables().map(|(t, r)| (*t, *r)));
        let eye = self.camera.eye;
        self.draws.sort_by(|(ta, ra), (tb, rb)| {
            let oa = self.materials[ra.material.0 as usize].material.opaque;
            let ob = self.materials[rb.material.0 as usize].material.opaque;
            ob.cmp(&oa).then_with(|| {
                let da = (ta.translation - eye).length_squared();
                let db = (tb.translation - eye).length_squared();
                db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        self.pipeline.clear(self.camera.clear_color);
        for (t, r) in &self.draws {
            let mesh = self
                .store
                .mesh(MeshHandle(r.mesh.0))
                .with_context(|| format!("unknown mesh handle {}", r.mesh.0))?
                .clone();
            let entry = self
                .materials
                .get(r.material.0 as usize)
                .with_context(|| format!("unknown material {}", r.material.0))?;
            self.pipeline
                .draw(&mesh, &entry.material, &frame, t.matrix(), entry.uniforms.clone());
        }

        match self.filter {
            FilterKind::None => {}
            FilterKind::Invert => self.pipeline.post_process(&postfx::Invert),
            FilterKind::Grayscale => self.pipeline.post_process(&postfx::Grayscale),
            FilterKind::Vignette => {
                let v = postfx::Vignette {
                    width: self.pipeline.width(),
                    height: self.pipeline.height(),
                    strength: 0.6,
                };
                self.pipeline.post_process(&v);
            }
        }

        Ok(self.pipeline.framebuffer())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (width, height) = parse_size(std::env::args());
    let show_fps = parse_show_fps(std::env::args());
    let filter = parse_filter(std::env::args());
    let obj_path = parse_scene(std::env::args());
    log::info!(
        "Starting Perun3D. size={}x{}, show_fps={}, filter={:?}, scene={}",
        width,
        height,
        show_fps,
        filter,
        obj_path.as_deref().unwrap_or("demo")
    );

    let scene = Scene::build(obj_path.as_deref(), filter, width, height)?;
    platform::run("Perun3D", width, height, show_fps, Box::new(scene))?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn size_flag_parses_and_clamps() {
        assert_eq!(parse_size(args(&["--size=800x600"]).into_iter()), (800, 600));
        assert_eq!(parse_size(args(&["--size=0x600"]).into_iter()), (1, 600));
        assert_eq!(
            parse_size(args(&["--width=320", "--height=200"]).into_iter()),
            (320, 200)
        );
        assert_eq!(parse_size(args(&["--size=garbage"]).into_iter()), (960, 540));
    }

    #[test]
    fn show_fps_flag_forms() {
        assert!(parse_show_fps(args(&["--show-fps"]).into_iter()));
        assert!(parse_show_fps(args(&["--show-fps=on"]).into_iter()));
        assert!(!parse_show_fps(args(&["--show-fps=off"]).into_iter()));
        assert!(!parse_show_fps(args(&[]).into_iter()));
    }

    #[test]
    fn filter_flag_falls_back_to_none() {
        assert_eq!(
            parse_filter(args(&["--filter=vignette"]).into_iter()),
            FilterKind::Vignette
        );
        assert_eq!(
            parse_filter(args(&["--filter=sepia"]).into_iter()),
            FilterKind::None
        );
    }

    #[test]
    fn scene_flag_demo_means_builtin() {
        assert_eq!(parse_scene(args(&["--scene=demo"]).into_iter()), None);
        assert_eq!(
            parse_scene(args(&["--scene=models/teapot.obj"]).into_iter()),
            Some("models/teapot.obj".to_owned())
        );
    }
}
