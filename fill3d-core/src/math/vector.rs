/// 2D and 3D vector value types
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D vector, used for screen-space positions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both components set to `value`
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Build a vector from a length and a direction in degrees.
    pub fn from_polar(length: f32, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos * length, sin * length)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Direction of the vector in degrees, measured counter-clockwise from +x.
    ///
    /// The zero vector reports 0.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Same length, pointing at `degrees`.
    pub fn with_angle(self, degrees: f32) -> Self {
        Self::from_polar(self.magnitude(), degrees)
    }

    /// Same direction, scaled to `length`. The zero vector stays zero.
    pub fn with_magnitude(self, length: f32) -> Self {
        self.normalized() * length
    }

    /// Unit-length copy, or the zero vector when the magnitude is zero.
    pub fn normalized(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::ZERO;
        }
        self / length
    }

    /// In-place [`normalized`](Self::normalized).
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn reversed(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    pub fn distance(a: Self, b: Self) -> f32 {
        (a - b).magnitude()
    }

    /// Angle in degrees of the vector pointing from `to` back at `from`.
    pub fn direction(from: Self, to: Self) -> f32 {
        (from - to).angle()
    }

    /// Copy with its length clamped to `[min, max]` (bounds may come in either order).
    pub fn clamp_length(self, min: f32, max: f32) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        let length = self.magnitude();
        if length == 0.0 {
            return Self::ZERO;
        }
        self * (length.clamp(lo, hi) / length)
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// A 3D vector, used for positions, Euler rotations and scales.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACKWARD: Self = Self::new(0.0, 0.0, -1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or the zero vector when the magnitude is zero.
    pub fn normalized(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::ZERO;
        }
        self / length
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn reversed(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    pub fn distance(a: Self, b: Self) -> f32 {
        (a - b).magnitude()
    }

    pub fn clamp_length(self, min: f32, max: f32) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        let length = self.magnitude();
        if length == 0.0 {
            return Self::ZERO;
        }
        self * (length.clamp(lo, hi) / length)
    }

    /// Homogeneous point `(x, y, z, 1)`
    pub fn to_homogeneous(self) -> [f32; 4] {
        [self.x, self.y, self.z, 1.0]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Add<f32> for $ty {
            type Output = Self;
            fn add(self, rhs: f32) -> Self {
                Self { $($field: self.$field + rhs),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Sub<f32> for $ty {
            type Output = Self;
            fn sub(self, rhs: f32) -> Self {
                Self { $($field: self.$field - rhs),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self {
                self.reversed()
            }
        }
    };
}

impl_vector_ops!(Vector2 { x, y });
impl_vector_ops!(Vector3 { x, y, z });

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<nalgebra::Vector2<f32>> for Vector2 {
    fn from(v: nalgebra::Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for nalgebra::Vector2<f32> {
    fn from(v: Vector2) -> Self {
        nalgebra::Vector2::new(v.x, v.y)
    }
}

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Point3<f32>> for Vector3 {
    fn from(p: nalgebra::Point3<f32>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Vector3> for nalgebra::Point3<f32> {
    fn from(v: Vector3) -> Self {
        nalgebra::Point3::new(v.x, v.y, v.z)
    }
}
