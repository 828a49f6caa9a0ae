// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bytemuck::{Pod, Zeroable};

use crate::eigen::{self, Eigen};
use crate::error::MathError;
use crate::mat3::Mat3;
use crate::vec3::Vec3;

/// Relative tolerance used by [`SymmetricMatrix3::try_from_mat3`].
pub const SYMMETRY_TOLERANCE: f32 = 1.0e-6;

/// Symmetric 3×3 matrix stored as its six independent entries.
///
/// Layout is the diagonal triple followed by the off-diagonal triple
/// (`m01`, `m02`, `m12`), the convention inertia tensors arrive in. No sign
/// or definiteness invariant is imposed.
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct SymmetricMatrix3 {
    /// Row 0, column 0.
    pub m00: f32,
    /// Row 1, column 1.
    pub m11: f32,
    /// Row 2, column 2.
    pub m22: f32,
    /// Rows/columns 0 and 1.
    pub m01: f32,
    /// Rows/columns 0 and 2.
    pub m02: f32,
    /// Rows/columns 1 and 2.
    pub m12: f32,
}

impl SymmetricMatrix3 {
    /// All entries zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// Identity matrix.
    pub const IDENTITY: Self = Self::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0);

    /// Creates a matrix from its diagonal (`m00, m11, m22`) and off-diagonal
    /// (`m01, m02, m12`) entries, in that order.
    pub const fn new(m00: f32, m11: f32, m22: f32, m01: f32, m02: f32, m12: f32) -> Self {
        Self {
            m00,
            m11,
            m22,
            m01,
            m02,
            m12,
        }
    }

    /// Creates a matrix from a diagonal triple and an off-diagonal triple
    /// `(m01, m02, m12)`.
    pub fn from_parts(diagonal: Vec3, off_diagonal: Vec3) -> Self {
        let [m00, m11, m22] = diagonal.to_array();
        let [m01, m02, m12] = off_diagonal.to_array();
        Self::new(m00, m11, m22, m01, m02, m12)
    }

    /// Diagonal matrix.
    pub fn from_diagonal(diagonal: Vec3) -> Self {
        Self::from_parts(diagonal, Vec3::ZERO)
    }

    /// Checked conversion from a full matrix.
    ///
    /// Fails with [`MathError::NonFinite`] on NaN/∞ entries and with
    /// [`MathError::NotSymmetric`] when a mirrored pair differs by more than
    /// [`SYMMETRY_TOLERANCE`] relative to the largest entry. Mirrored pairs are
    /// averaged.
    pub fn try_from_mat3(m: &Mat3) -> Result<Self, MathError> {
        if m.to_array().iter().any(|v| !v.is_finite()) {
            return Err(MathError::NonFinite);
        }
        let scale = m.to_array().iter().fold(1.0_f32, |acc, v| acc.max(v.abs()));
        let tolerance = SYMMETRY_TOLERANCE * scale;
        for (row, col) in [(0, 1), (0, 2), (1, 2)] {
            let delta = (m.get(row, col) - m.get(col, row)).abs();
            if delta > tolerance {
                return Err(MathError::NotSymmetric { row, col, delta });
            }
        }
        let mirrored = |r: usize, c: usize| 0.5 * (m.get(r, c) + m.get(c, r));
        Ok(Self::new(
            m.get(0, 0),
            m.get(1, 1),
            m.get(2, 2),
            mirrored(0, 1),
            mirrored(0, 2),
            mirrored(1, 2),
        ))
    }

    /// Checked conversion from row-major nested arrays.
    pub fn try_from_rows(rows: [[f32; 3]; 3]) -> Result<Self, MathError> {
        Self::try_from_mat3(&Mat3::from_rows(rows))
    }

    /// Diagonal entries `(m00, m11, m22)`.
    pub fn diagonal(&self) -> Vec3 {
        Vec3::new(self.m00, self.m11, self.m22)
    }

    /// Off-diagonal entries `(m01, m02, m12)`.
    pub fn off_diagonal(&self) -> Vec3 {
        Vec3::new(self.m01, self.m02, self.m12)
    }

    /// Entry at `(row, col)`; indices outside `0..3` read as zero.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        match (row.min(col), row.max(col)) {
            (0, 0) => self.m00,
            (1, 1) => self.m11,
            (2, 2) => self.m22,
            (0, 1) => self.m01,
            (0, 2) => self.m02,
            (1, 2) => self.m12,
            _ => 0.0,
        }
    }

    /// Expands to a full matrix.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(self.m00, self.m01, self.m02),
            Vec3::new(self.m01, self.m11, self.m12),
            Vec3::new(self.m02, self.m12, self.m22),
        )
    }

    /// Matrix-vector product.
    pub fn mul_vec3(&self, v: &Vec3) -> Vec3 {
        let [x, y, z] = v.to_array();
        Vec3::new(
            self.m00 * x + self.m01 * y + self.m02 * z,
            self.m01 * x + self.m11 * y + self.m12 * z,
            self.m02 * x + self.m12 * y + self.m22 * z,
        )
    }

    /// Every entry multiplied by `s`.
    pub fn scale(&self, s: f32) -> Self {
        Self::from_parts(self.diagonal() * s, self.off_diagonal() * s)
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> f32 {
        self.m00 + self.m11 + self.m22
    }

    /// Determinant.
    pub fn determinant(&self) -> f32 {
        self.m00 * (self.m11 * self.m22 - self.m12 * self.m12)
            - self.m01 * (self.m01 * self.m22 - self.m12 * self.m02)
            + self.m02 * (self.m01 * self.m12 - self.m11 * self.m02)
    }

    /// Largest absolute value among the six entries.
    pub fn max_abs_element(&self) -> f32 {
        self.diagonal()
            .abs()
            .max_element()
            .max(self.off_diagonal().abs().max_element())
    }

    /// `m01² + m02² + m12²` (each off-diagonal pair counted once).
    pub fn off_diagonal_norm_squared(&self) -> f32 {
        self.off_diagonal().length_squared()
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.diagonal().is_finite() && self.off_diagonal().is_finite()
    }

    /// `rᵀ · self · r`, symmetrized.
    pub fn conjugate(&self, r: &Mat3) -> Self {
        let full = r.transpose() * self.to_mat3() * *r;
        let mirrored = |i: usize, j: usize| 0.5 * (full.get(i, j) + full.get(j, i));
        Self::new(
            full.get(0, 0),
            full.get(1, 1),
            full.get(2, 2),
            mirrored(0, 1),
            mirrored(0, 2),
            mirrored(1, 2),
        )
    }

    /// Closed-form eigendecomposition; see [`eigen::closed_form`].
    pub fn eigen(&self) -> Eigen {
        eigen::closed_form(self)
    }

    /// Lower-triangular Cholesky factor `L` with `L · Lᵀ = self`.
    ///
    /// Fails with [`MathError::NotPositiveDefinite`] at the first pivot that
    /// is not strictly positive (or not finite).
    pub fn cholesky(&self) -> Result<Mat3, MathError> {
        let pivot = |value: f32, index: usize| {
            if value > 0.0 && value.is_finite() {
                Ok(value.sqrt())
            } else {
                Err(MathError::NotPositiveDefinite { pivot: index })
            }
        };
        let l00 = pivot(self.m00, 0)?;
        let l10 = self.m01 / l00;
        let l20 = self.m02 / l00;
        let l11 = pivot(self.m11 - l10 * l10, 1)?;
        let l21 = (self.m12 - l20 * l10) / l11;
        let l22 = pivot(self.m22 - l20 * l20 - l21 * l21, 2)?;
        Ok(Mat3::from_cols(
            Vec3::new(l00, l10, l20),
            Vec3::new(0.0, l11, l21),
            Vec3::new(0.0, 0.0, l22),
        ))
    }
}

impl From<SymmetricMatrix3> for Mat3 {
    fn from(m: SymmetricMatrix3) -> Self {
        m.to_mat3()
    }
}

impl TryFrom<Mat3> for SymmetricMatrix3 {
    type Error = MathError;

    fn try_from(m: Mat3) -> Result<Self, Self::Error> {
        Self::try_from_mat3(&m)
    }
}
