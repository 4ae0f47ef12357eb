/// 4x4 homogeneous transformation matrix
use std::ops::{Index, Mul};

use super::Vector3;

/// Row-major 4x4 matrix applied to column vectors (`M·v`).
///
/// Storage is a fixed `[[f32; 4]; 4]`; there is no way to resize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
    rows: [[f32; 4]; 4],
}

macro_rules! element_accessors {
    ($($name:ident => ($row:expr, $col:expr)),+ $(,)?) => {
        $(
            #[inline]
            pub fn $name(&self) -> f32 {
                self.rows[$row][$col]
            }
        )+
    };
}

impl Matrix4x4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Raw row-major grid
    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    element_accessors! {
        m11 => (0, 0), m12 => (0, 1), m13 => (0, 2), m14 => (0, 3),
        m21 => (1, 0), m22 => (1, 1), m23 => (1, 2), m24 => (1, 3),
        m31 => (2, 0), m32 => (2, 1), m33 => (2, 2), m34 => (2, 3),
        m41 => (3, 0), m42 => (3, 1), m43 => (3, 2), m44 => (3, 3),
    }

    /// Returns `a·b`. Order matters: `b` is applied to a vector first.
    pub fn multiply(a: &Self, b: &Self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a.rows[i][k] * b.rows[k][j]).sum();
            }
        }
        Self { rows }
    }

    /// Apply `m` to a homogeneous column vector. The result is not divided by w.
    pub fn multiply_to_column(m: &Self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (i, cell) in out.iter_mut().enumerate() {
            let r = &m.rows[i];
            *cell = r[0] * v[0] + r[1] * v[1] + r[2] * v[2] + r[3] * v[3];
        }
        out
    }

    pub fn transpose(&self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.rows[j][i];
            }
        }
        Self { rows }
    }

    pub fn translation(offset: Vector3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(scale: Vector3) -> Self {
        Self::from_rows([
            [scale.x, 0.0, 0.0, 0.0],
            [0.0, scale.y, 0.0, 0.0],
            [0.0, 0.0, scale.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined Euler rotation `Rz·Ry·Rx` from angles in degrees.
    ///
    /// Built as a single closed-form matrix rather than three multiplied
    /// axis matrices. x is applied first, then y, then z.
    pub fn rotation(degrees: Vector3) -> Self {
        let (sx, cx) = degrees.x.to_radians().sin_cos();
        let (sy, cy) = degrees.y.to_radians().sin_cos();
        let (sz, cz) = degrees.z.to_radians().sin_cos();

        Self::from_rows([
            [cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx, 0.0],
            [sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx, 0.0],
            [-sy, cy * sx, cy * cx, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `T·R·S`: scale first, then rotate, then translate.
    pub fn build(position: Vector3, rotation: Vector3, scale: Vector3) -> Self {
        let mut m = Self::rotation(rotation);
        let factors = [scale.x, scale.y, scale.z];
        for row in m.rows.iter_mut().take(3) {
            for (cell, factor) in row.iter_mut().zip(factors) {
                *cell *= factor;
            }
        }
        m.rows[0][3] = position.x;
        m.rows[1][3] = position.y;
        m.rows[2][3] = position.z;
        m
    }

    /// Transform a point, dropping w without dividing.
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        let [x, y, z, _] = Self::multiply_to_column(self, point.to_homogeneous());
        Vector3::new(x, y, z)
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::multiply(&self, &rhs)
    }
}

impl Index<(usize, usize)> for Matrix4x4 {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.rows[row][col]
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4x4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = m[(i, j)];
            }
        }
        Self { rows }
    }
}

impl From<Matrix4x4> for nalgebra::Matrix4<f32> {
    fn from(m: Matrix4x4) -> Self {
        nalgebra::Matrix4::from_fn(|i, j| m.rows[i][j])
    }
}
