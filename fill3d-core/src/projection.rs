/// Camera and projection utilities
use crate::error::ConfigError;
use crate::math::{Matrix4x4, Vector3};
use crate::transform::Transform;

pub const DEFAULT_FOV: f32 = 90.0;
pub const DEFAULT_NEAR: f32 = 0.01;
pub const DEFAULT_FAR: f32 = 100.0;

/// Perspective projection parameters.
///
/// Built only through [`Projection::new`], so every instance is valid:
/// `0 < fov < 180`, `near > 0`, `far >= near`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    fov: f32,
    near: f32,
    far: f32,
}

impl Projection {
    /// `fov` is the vertical field of view in degrees. `far` is raised to
    /// `near` when it comes in below it.
    pub fn new(fov: f32, near: f32, far: f32) -> Result<Self, ConfigError> {
        if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
            return Err(ConfigError::FieldOfView(fov));
        }
        if !near.is_finite() || near <= 0.0 {
            return Err(ConfigError::NearPlane(near));
        }
        if !far.is_finite() || far <= 0.0 {
            return Err(ConfigError::FarPlane(far));
        }
        let far = far.max(near);
        Ok(Self { fov, near, far })
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Perspective matrix mapping view-space z in `[near, far]` to `[0, 1]`.
    ///
    /// The last row copies view z into w, so dividing by w applies the
    /// perspective. `aspect` is width / height and must be positive.
    pub fn matrix(&self, aspect: f32) -> Matrix4x4 {
        let focal = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let range = self.far - self.near;
        let (depth_scale, depth_offset) = if range > 0.0 {
            (self.far / range, -self.near * self.far / range)
        } else {
            (1.0, -self.near)
        };

        Matrix4x4::from_rows([
            [focal / aspect, 0.0, 0.0, 0.0],
            [0.0, focal, 0.0, 0.0],
            [0.0, 0.0, depth_scale, depth_offset],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Keep a view-space depth inside the near/far range
    pub fn clamp_depth(&self, z: f32) -> f32 {
        z.clamp(self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

/// Inverse of the camera's world transform: `R⁻¹ · T(-position)`.
///
/// The rotation is inverted by transposing it, which undoes the combined
/// Euler rotation exactly. Camera scale is ignored.
pub fn view_matrix(camera: &Transform) -> Matrix4x4 {
    let inverse_rotation = camera.rotation_matrix().transpose();
    let inverse_translation = Matrix4x4::translation(camera.position.reversed());
    inverse_rotation * inverse_translation
}

/// Direction the camera looks along (+z rotated by the camera's rotation)
pub fn forward(camera: &Transform) -> Vector3 {
    camera.rotation_matrix().transform_point(Vector3::FORWARD)
}
