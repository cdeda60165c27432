//! Object placement: translation, Euler rotation, per-axis scale.
//!
//! The channels stay separate so animation systems can step them
//! individually; matrices are derived per draw. Normals need the
//! inverse-transpose companion matrix once scale is non-uniform.

use crate::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Inverse-transpose of the upper 3x3 of `m`: transforms normals when `m`
/// transforms positions.
#[inline]
pub fn normal_matrix(m: Mat4) -> Mat3 {
    Mat3::from_mat4(m).inverse().transpose()
}

#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    /// Radians, applied in XYZ order.
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Placement only: no rotation, unit scale.
    #[inline]
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    #[inline]
    pub fn from_trs(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation_euler,
            scale,
        }
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        )
    }

    /// Model matrix: scale, then rotation, then translation.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.translation)
    }

    /// Normal-transform companion of [`matrix`](Self::matrix).
    #[inline]
    pub fn normal_matrix(&self) -> Mat3 {
        normal_matrix(self.matrix())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn scale_applies_before_rotation() {
        let t = Transform::from_trs(
            Vec3::ZERO,
            vec3(0.0, 0.0, FRAC_PI_2),
            vec3(2.0, 1.0, 1.0),
        );
        // X axis stretched to length 2, then rotated onto +Y.
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - vec3(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn at_translates_only() {
        let t = Transform::at(vec3(1.0, -2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!((p - vec3(1.0, -2.0, 3.0)).length() < 1e-6);
        assert_eq!(t.matrix().transform_vector3(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn normal_matrix_corrects_non_uniform_scale() {
        let t = Transform::identity().with_scale(vec3(2.0, 1.0, 1.0));
        // Positions stretch along X, so slanted normals must compress there.
        let n = t.normal_matrix() * vec3(1.0, 1.0, 0.0);
        assert!((n - vec3(0.5, 1.0, 0.0)).length() < 1e-5);
    }
}
