//! Cube maps: six textures indexed by the dominant axis of a direction.
//!
//! Face selection and sign conventions follow the usual +X,-X,+Y,-Y,+Z,-Z
//! layout: the axis with the largest absolute component picks the face, the
//! two remaining components are perspective-projected onto it.

use glam::Vec3;

use crate::texture::Texture;

/// Face index, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Six textures, one per cube face. Immutable after construction except
/// for per-face replacement via [`CubeMap::set_face`].
#[derive(Clone, Debug)]
pub struct CubeMap {
    faces: [Texture; 6],
}

impl CubeMap {
    pub fn new(faces: [Texture; 6]) -> Self {
        Self { faces }
    }

    /// All six faces share one texture (useful for uniform environments).
    pub fn splat(face: Texture) -> Self {
        Self {
            faces: std::array::from_fn(|_| face.clone()),
        }
    }

    #[inline]
    pub fn face(&self, face: CubeFace) -> &Texture {
        &self.faces[face as usize]
    }

    pub fn set_face(&mut self, face: CubeFace, texture: Texture) {
        self.faces[face as usize] = texture;
    }

    /// Sample along `dir` (need not be normalized).
    pub fn sample(&self, dir: Vec3) -> u32 {
        let ax = dir.x.abs();
        let ay = dir.y.abs();
        let az = dir.z.abs();
        let ma = ax.max(ay).max(az);
        if ma < 1e-12 {
            return crate::color::BLACK;
        }

        // (face, sc, tc) per the standard cube map convention.
        let (face, sc, tc) = if ax >= ay && ax >= az {
            if dir.x > 0.0 {
                (CubeFace::PosX, -dir.z, -dir.y)
            } else {
                (CubeFace::NegX, dir.z, -dir.y)
            }
        } else if ay >= az {
            if dir.y > 0.0 {
                (CubeFace::PosY, dir.x, dir.z)
            } else {
                (CubeFace::NegY, dir.x, -dir.z)
            }
        } else if dir.z > 0.0 {
            (CubeFace::PosZ, dir.x, -dir.y)
        } else {
            (CubeFace::NegZ, -dir.x, -dir.y)
        };

        let u = 0.5 * (sc / ma + 1.0);
        let v = 0.5 * (tc / ma + 1.0);
        self.faces[face as usize].sample(u, v)
    }
}
