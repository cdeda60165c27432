//! Core shared types: math re-exports, Transform, Camera, lights, tiny ECS.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4, vec2, vec3, vec4};

use thiserror::Error;

pub mod camera;
pub mod ecs;
pub mod light;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use transform::{Transform, normal_matrix};

/// Errors shared across the workspace (renderer-agnostic).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid framebuffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("unknown asset handle {0}")]
    UnknownHandle(u32),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_messages_name_the_culprit() {
        let e = CoreError::InvalidDimensions {
            width: 0,
            height: 7,
        };
        assert_eq!(e.to_string(), "invalid framebuffer dimensions 0x7");
        assert_eq!(
            CoreError::UnknownHandle(3).to_string(),
            "unknown asset handle 3"
        );
    }

    #[test]
    fn camera_view_moves_eye_to_origin() {
        let cam = Camera::new_perspective(
            vec3(1.0, 2.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            16.0 / 9.0,
        );
        let eye_in_view = cam.view().transform_point3(cam.eye);
        assert!(eye_in_view.length() < 1e-5);
    }

    #[test]
    fn normal_matrix_of_rigid_motion_is_its_rotation() {
        let t = Transform::from_trs(vec3(5.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), Vec3::ONE);
        let n = normal_matrix(t.matrix()) * Vec3::Z;
        let r = t.rotation() * Vec3::Z;
        assert!((n - r).length() < 1e-5);
    }
}
