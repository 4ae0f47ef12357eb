/// Position / rotation / scale transforms
use crate::math::{wrap_degrees, Matrix4x4, Vector3};

/// Position, Euler rotation (degrees) and scale of an object or camera.
///
/// Every rotation component is kept in (-180, 180]. The field is private so
/// the wrap can't be bypassed; position and scale are plain data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3,
    rotation: Vector3,
    pub scale: Vector3,
}

fn wrap_rotation(rotation: Vector3) -> Vector3 {
    Vector3::new(
        wrap_degrees(rotation.x),
        wrap_degrees(rotation.y),
        wrap_degrees(rotation.z),
    )
}

impl Transform {
    pub fn new(position: Vector3, rotation: Vector3, scale: Vector3) -> Self {
        Self {
            position,
            rotation: wrap_rotation(rotation),
            scale,
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Euler angles in degrees, each in (-180, 180]
    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.rotation = wrap_rotation(rotation);
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, delta: Vector3) {
        self.rotation = wrap_rotation(self.rotation + delta);
    }

    pub fn translate(&mut self, delta: Vector3) {
        self.position = self.position + delta;
    }

    /// World matrix `T·R·S`, recomputed on every call.
    pub fn to_matrix(&self) -> Matrix4x4 {
        Matrix4x4::build(self.position, self.rotation, self.scale)
    }

    /// Rotation only, at the origin with unit scale.
    pub fn rotation_matrix(&self) -> Matrix4x4 {
        Matrix4x4::build(Vector3::ZERO, self.rotation, Vector3::ONE)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            scale: Vector3::ONE,
        }
    }
}
