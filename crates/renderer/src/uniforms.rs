//! Per-draw shader uniforms.
//!
//! A write-once-then-read mapping from uniform name to a tagged value.
//! Lifetime is exactly one draw call. A shader asking for a required
//! uniform that was never set is a programming error in the material, so
//! the typed getters fail fast with the uniform's name; `try_*` getters
//! exist for genuinely optional bindings (normal maps etc).

use std::collections::HashMap;
use std::sync::Arc;

use corelib::Light;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::cubemap::CubeMap;
use crate::texture::Texture;

/// Tagged uniform value.
#[derive(Clone, Debug)]
pub enum UniformValue {
    Float(f32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
    /// Packed 0xAARRGGBB.
    Color(u32),
    Texture(Arc<Texture>),
    CubeMap(Arc<CubeMap>),
    Lights(Arc<Vec<Light>>),
}

#[derive(Clone, Debug, Default)]
pub struct Uniforms {
    values: HashMap<&'static str, UniformValue>,
}

macro_rules! getter {
    ($get:ident, $try_get:ident, $variant:ident, $ty:ty, copy) => {
        #[inline]
        pub fn $get(&self, name: &'static str) -> $ty {
            match self.values.get(name) {
                Some(UniformValue::$variant(v)) => *v,
                _ => missing(name, stringify!($variant)),
            }
        }

        #[inline]
        pub fn $try_get(&self, name: &'static str) -> Option<$ty> {
            match self.values.get(name) {
                Some(UniformValue::$variant(v)) => Some(*v),
                _ => None,
            }
        }
    };
    ($get:ident, $try_get:ident, $variant:ident, $ty:ty, ref) => {
        #[inline]
        pub fn $get(&self, name: &'static str) -> &$ty {
            match self.values.get(name) {
                Some(UniformValue::$variant(v)) => v,
                _ => missing(name, stringify!($variant)),
            }
        }

        #[inline]
        pub fn $try_get(&self, name: &'static str) -> Option<&$ty> {
            match self.values.get(name) {
                Some(UniformValue::$variant(v)) => Some(v),
                _ => None,
            }
        }
    };
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value. Rebinding a name within one draw is a programming
    /// error (the contract is write-once, read-many).
    #[inline]
    pub fn set(&mut self, name: &'static str, value: UniformValue) -> &mut Self {
        let prev = self.values.insert(name, value);
        debug_assert!(prev.is_none(), "uniform '{name}' bound twice in one draw");
        self
    }

    #[inline]
    pub fn contains(&self, name: &'static str) -> bool {
        self.values.contains_key(name)
    }

    getter!(float, try_float, Float, f32, copy);
    getter!(flag, try_flag, Bool, bool, copy);
    getter!(vec2, try_vec2, Vec2, Vec2, copy);
    getter!(vec3, try_vec3, Vec3, Vec3, copy);
    getter!(vec4, try_vec4, Vec4, Vec4, copy);
    getter!(mat3, try_mat3, Mat3, Mat3, copy);
    getter!(mat4, try_mat4, Mat4, Mat4, copy);
    getter!(color, try_color, Color, u32, copy);
    getter!(texture, try_texture, Texture, Arc<Texture>, ref);
    getter!(cubemap, try_cubemap, CubeMap, Arc<CubeMap>, ref);
    getter!(lights, try_lights, Lights, Arc<Vec<Light>>, ref);
}

#[cold]
fn missing(name: &str, expected: &str) -> ! {
    panic!("required uniform '{name}' is missing or is not a {expected}");
}
