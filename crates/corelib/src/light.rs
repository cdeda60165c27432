//! Light descriptions the scene hands to the renderer.
//!
//! Geometry is stored in world space; the pipeline transforms it into the
//! shading space (camera space) once per draw call.

use crate::Vec3;

/// Geometric part of a light.
#[derive(Clone, Copy, Debug)]
pub enum LightKind {
    /// Parallel rays; `direction` points from the light toward the scene.
    Directional { direction: Vec3 },
    /// Omnidirectional emitter at `position`.
    Point { position: Vec3 },
    /// Cone emitter: fragments outside the cutoff cone receive nothing,
    /// inside it intensity falls off as cos(angle)^exponent.
    Spot {
        position: Vec3,
        direction: Vec3,
        cutoff_rad: f32,
        exponent: f32,
    },
}

/// A light source: geometry + packed 0xAARRGGBB color.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub kind: LightKind,
    pub color: u32,
}

impl Light {
    #[inline]
    pub fn directional(direction: Vec3, color: u32) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize(),
            },
            color,
        }
    }

    #[inline]
    pub fn point(position: Vec3, color: u32) -> Self {
        Self {
            kind: LightKind::Point { position },
            color,
        }
    }

    #[inline]
    pub fn spot(position: Vec3, direction: Vec3, cutoff_rad: f32, exponent: f32, color: u32) -> Self {
        Self {
            kind: LightKind::Spot {
                position,
                direction: direction.normalize(),
                cutoff_rad,
                exponent,
            },
            color,
        }
    }
}
