/// Vector and matrix algebra used by the projection pipeline

pub mod matrix;
pub mod vector;

pub use matrix::Matrix4x4;
pub use vector::{Vector2, Vector3};

/// Wrap an angle in degrees into the half-open range (-180, 180].
///
/// Uses a true modulo so negative inputs and inputs beyond ±360 land in the
/// same place as their positive equivalents.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(181.0), -179.0);
        assert_eq!(wrap_degrees(-181.0), 179.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
        assert!((wrap_degrees(-1000.0) - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_degrees_tiny_negative() {
        let w = wrap_degrees(-1e-7);
        assert!(w > -180.0 && w <= 180.0);
        assert!(w.abs() < 1e-3);
    }
}
