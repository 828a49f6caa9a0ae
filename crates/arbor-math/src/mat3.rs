// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Mul, MulAssign};

use crate::vec3::Vec3;

/// Column-major 3×3 `f32` matrix.
///
/// Used for eigenvector bases (columns are vectors) and rotation matrices.
/// Element `(row, col)` lives at index `col * 3 + row`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3 {
    m: [f32; 9],
}

impl Mat3 {
    /// All elements zero.
    pub const ZERO: Self = Self { m: [0.0; 9] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Builds a matrix from nine column-major elements.
    pub const fn new(m: [f32; 9]) -> Self {
        Self { m }
    }

    /// Identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix from three columns.
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        let [a, b, c] = c0.to_array();
        let [d, e, f] = c1.to_array();
        let [g, h, i] = c2.to_array();
        Self::new([a, b, c, d, e, f, g, h, i])
    }

    /// Builds a matrix from row-major nested arrays (`rows[row][col]`).
    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self::from_cols(
            Vec3::new(rows[0][0], rows[1][0], rows[2][0]),
            Vec3::new(rows[0][1], rows[1][1], rows[2][1]),
            Vec3::new(rows[0][2], rows[1][2], rows[2][2]),
        )
    }

    /// Diagonal matrix.
    pub fn from_diagonal(d: Vec3) -> Self {
        let [x, y, z] = d.to_array();
        Self::new([x, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, z])
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    /// If either index is 3 or more.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.col(col).to_array()[row]
    }

    /// Column `index` (0..3).
    ///
    /// # Panics
    /// If `index >= 3`.
    pub fn col(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(self.m[base], self.m[base + 1], self.m[base + 2])
    }

    /// Row `index` (0..3).
    ///
    /// # Panics
    /// If `index >= 3`.
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::new(self.m[index], self.m[index + 3], self.m[index + 6])
    }

    /// Column-major elements.
    pub fn to_array(&self) -> [f32; 9] {
        self.m
    }

    /// Row-major nested arrays (`rows[row][col]`).
    pub fn to_rows(&self) -> [[f32; 3]; 3] {
        [
            self.row(0).to_array(),
            self.row(1).to_array(),
            self.row(2).to_array(),
        ]
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        Self::from_cols(
            self.transform(&rhs.col(0)),
            self.transform(&rhs.col(1)),
            self.transform(&rhs.col(2)),
        )
    }

    /// Matrix-vector product `self * v`.
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let [x, y, z] = v.to_array();
        self.col(0) * x + self.col(1) * y + self.col(2) * z
    }

    /// Determinant (scalar triple product of the columns).
    pub fn determinant(&self) -> f32 {
        self.col(0).dot(&self.col(1).cross(&self.col(2)))
    }

    /// Inverse via the adjugate; `None` when the determinant is zero or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let c0 = self.col(0);
        let c1 = self.col(1);
        let c2 = self.col(2);
        let r0 = c1.cross(&c2);
        let r1 = c2.cross(&c0);
        let r2 = c0.cross(&c1);
        let det = c0.dot(&r0);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        // Rows of the inverse are the cross products scaled by 1/det.
        Some(Self::from_cols(r0, r1, r2).transpose() * inv_det)
    }

    /// Largest absolute element difference against `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        self.m
            .iter()
            .zip(other.m.iter())
            .fold(0.0_f32, |acc, (a, b)| acc.max((a - b).abs()))
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 9]> for Mat3 {
    fn from(m: [f32; 9]) -> Self {
        Self::new(m)
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<&Mat3> for Mat3 {
    type Output = Self;
    fn mul(self, rhs: &Mat3) -> Self {
        self.multiply(rhs)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(&rhs)
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        let mut m = self.m;
        for e in &mut m {
            *e *= rhs;
        }
        Self::new(m)
    }
}

impl MulAssign for Mat3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}
