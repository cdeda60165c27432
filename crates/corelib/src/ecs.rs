//! Tiny ECS: World, Entity, components: Transform + Renderable + LightSource.

use crate::light::Light;
use crate::transform::Transform;

/// Entity id (dense, index into component arrays).
pub type Entity = u32;

/// Index into the mesh table owned by the asset layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshId(pub u32);

/// Index into the material table owned by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialId(pub u32);

/// Marker component: renderable with given mesh and material.
#[derive(Clone, Copy, Debug)]
pub struct Renderable {
    pub mesh: MeshId,
    pub material: MaterialId,
}

/// Marker component: the entity emits light. The light's world-space
/// geometry follows the entity's transform translation for point/spot.
#[derive(Clone, Copy, Debug)]
pub struct LightSource {
    pub light: Light,
}

/// Very small ECS world with dense parallel arrays.
/// No allocations per-frame; spawn may allocate to grow capacity.
#[derive(Default)]
pub struct World {
    transforms: Vec<Transform>,
    renderables: Vec<Option<Renderable>>,
    lights: Vec<Option<LightSource>>,
    alive: Vec<bool>,
    len: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn entity with Transform and optional components.
    pub fn spawn(
        &mut self,
        t: Transform,
        r: Option<Renderable>,
        l: Option<LightSource>,
    ) -> Entity {
        let id = self.len;
        let idx = id as usize;
        self.len += 1;

        if idx >= self.transforms.len() {
            // grow all arrays equally
            let new_len = (idx + 1).next_power_of_two().max(8);
            self.transforms.resize(new_len, Transform::identity());
            self.renderables.resize(new_len, None);
            self.lights.resize(new_len, None);
            self.alive.resize(new_len, false);
        }

        self.transforms[idx] = t;
        self.renderables[idx] = r;
        self.lights[idx] = l;
        self.alive[idx] = true;
        id
    }

    #[inline]
    pub fn is_alive(&self, e: Entity) -> bool {
        let i = e as usize;
        i < self.alive.len() && self.alive[i]
    }

    /// Mutable access to a transform (for animation).
    #[inline]
    pub fn transform_mut(&mut self, e: Entity) -> Option<&mut Transform> {
        let i = e as usize;
        if self.is_alive(e) {
            Some(&mut self.transforms[i])
        } else {
            None
        }
    }

    /// Iterate over (Transform, Renderable) pairs.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (&Transform, &Renderable)> {
        (0..self.len as usize).filter_map(move |i| {
            if self.alive.get(i).copied().unwrap_or(false) {
                if let Some(r) = self.renderables[i].as_ref() {
                    return Some((&self.transforms[i], r));
                }
            }
            None
        })
    }

    /// Iterate over (Transform, LightSource) pairs.
    pub fn iter_lights(&self) -> impl Iterator<Item = (&Transform, &LightSource)> {
        (0..self.len as usize).filter_map(move |i| {
            if self.alive.get(i).copied().unwrap_or(false) {
                if let Some(l) = self.lights[i].as_ref() {
                    return Some((&self.transforms[i], l));
                }
            }
            None
        })
    }

    /// System example: rotate all renderable transforms by given Euler speed * dt.
    pub fn system_rotate_renderables(&mut self, dt: f32, speed_xyz: [f32; 3]) {
        let [sx, sy, sz] = speed_xyz;
        for i in 0..(self.len as usize) {
            if self.alive[i] && self.renderables[i].is_some() {
                let t = &mut self.transforms[i];
                t.rotation_euler.x += sx * dt;
                t.rotation_euler.y += sy * dt;
                t.rotation_euler.z += sz * dt;
            }
        }
    }
}
