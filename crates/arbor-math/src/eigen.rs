// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Non-iterative eigendecomposition of a symmetric 3×3 matrix.
//!
//! Strategy:
//! - rescale by the largest absolute entry so the cubic stays in range
//! - solve the characteristic cubic with the trigonometric method
//! - take the eigenvector of the *extreme* root from the best-conditioned
//!   cross product of the rows of the shifted matrix
//! - solve the remaining 2×2 problem in the orthogonal complement of that
//!   vector, and close the basis with a cross product
//!
//! The eigenvector work runs on the normalized deviatoric matrix
//! `B = (A − q·I) / p` and its roots `β`, i.e. on `(A − λI) / p`. The spans are
//! identical; the normalized form keeps the rows well-scaled when the
//! off-diagonal terms are tiny next to the diagonal.
//!
//! Determinism: every branch is an ordinary comparison with a fixed tie
//! direction, and the transcendentals go through `libm`, so identical input
//! yields bit-identical output on every platform.

use crate::mat3::Mat3;
use crate::quat::Quat;
use crate::sym3::SymmetricMatrix3;
use crate::vec3::Vec3;

/// `2π/3` in `f32`.
const TWO_THIRDS_PI: f32 = 2.094_395_1;

/// Eigenvalues paired index-wise with the columns of an orthonormal,
/// right-handed basis.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eigen {
    /// Eigenvalues; `values[i]` belongs to column `i` of `vectors`.
    pub values: Vec3,
    /// Eigenvectors as columns (determinant +1).
    pub vectors: Mat3,
}

impl Eigen {
    /// Eigenvalues as `[λ0, λ1, λ2]`.
    pub fn values_array(&self) -> [f32; 3] {
        self.values.to_array()
    }

    /// `(λi, vi)` pairs in index order.
    pub fn pairs(&self) -> [(f32, Vec3); 3] {
        let [l0, l1, l2] = self.values.to_array();
        [
            (l0, self.vectors.col(0)),
            (l1, self.vectors.col(1)),
            (l2, self.vectors.col(2)),
        ]
    }

    /// `V · diag(λ) · Vᵀ`.
    pub fn reconstruct(&self) -> Mat3 {
        self.vectors * Mat3::from_diagonal(self.values) * self.vectors.transpose()
    }

    /// Largest absolute element difference between the reconstruction and `m`.
    pub fn residual(&self, m: &SymmetricMatrix3) -> f32 {
        self.reconstruct().max_abs_diff(&m.to_mat3())
    }

    /// Largest absolute deviation of `Vᵀ·V` from the identity.
    pub fn orthonormality_error(&self) -> f32 {
        (self.vectors.transpose() * self.vectors).max_abs_diff(&Mat3::IDENTITY)
    }

    /// The eigenvector basis as a rotation (principal-axis frame).
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&self.vectors)
    }
}

/// Closed-form eigendecomposition of `m`.
///
/// Total over finite input. On the cubic path the triple is ordered
/// (smallest, middle, largest); when `m` is already diagonal the diagonal is
/// returned as-is with the identity basis.
pub fn closed_form(m: &SymmetricMatrix3) -> Eigen {
    let max_abs = m.max_abs_element();
    if max_abs == 0.0 {
        return Eigen {
            values: Vec3::ZERO,
            vectors: Mat3::IDENTITY,
        };
    }

    // 1 / max_abs overflows when max_abs is subnormal.
    let diag = m.diagonal() / max_abs;
    let off = m.off_diagonal() / max_abs;

    let norm = off.length_squared();
    if norm > 0.0 {
        let q = diag.element_sum() / 3.0;
        let b = diag - Vec3::splat(q);
        let p = ((b.dot(&b) + norm * 2.0) / 6.0).sqrt();

        // B = (A - qI) / p, stored as its own diagonal/off-diagonal triples.
        let inv_p = 1.0 / p;
        let bd = b * inv_p;
        let bo = off * inv_p;
        let half_det = (0.5 * deviatoric_det(bd, bo)).clamp(-1.0, 1.0);

        let angle = libm::acosf(half_det) / 3.0;
        let beta2 = libm::cosf(angle) * 2.0;
        let beta0 = libm::cosf(angle + TWO_THIRDS_PI) * 2.0;
        let beta1 = -(beta0 + beta2);
        let beta = Vec3::new(beta0, beta1, beta2);
        let values = Vec3::splat(q) + beta * p;

        let (e0, e1, e2) = if half_det >= 0.0 {
            let e2 = extreme_eigenvector(bd, bo, beta2);
            let e1 = second_eigenvector(bd, bo, &e2, beta1);
            (e1.cross(&e2), e1, e2)
        } else {
            let e0 = extreme_eigenvector(bd, bo, beta0);
            let e1 = second_eigenvector(bd, bo, &e0, beta1);
            (e0, e1, e0.cross(&e1))
        };

        Eigen {
            values: values * max_abs,
            vectors: Mat3::from_cols(e0, e1, e2),
        }
    } else {
        Eigen {
            values: m.diagonal(),
            vectors: Mat3::IDENTITY,
        }
    }
}

/// Determinant of the symmetric matrix with diagonal `d` and off-diagonal
/// `(o01, o02, o12)`.
fn deviatoric_det(d: Vec3, o: Vec3) -> f32 {
    let [d0, d1, d2] = d.to_array();
    let [o01, o02, o12] = o.to_array();
    let c00 = d1 * d2 - o12 * o12;
    let c01 = o01 * d2 - o12 * o02;
    let c02 = o01 * o12 - d1 * o02;
    d0 * c00 - o01 * c01 + o02 * c02
}

/// Unit eigenvector of a simple root `lambda`.
///
/// `M = S − λI` has rank 2, so the cross product of any two independent rows
/// spans its null space. Of the three row pairs, the one with the largest
/// squared norm wins; ties keep the earlier pair.
fn extreme_eigenvector(d: Vec3, o: Vec3, lambda: f32) -> Vec3 {
    let [d0, d1, d2] = d.to_array();
    let [o01, o02, o12] = o.to_array();
    let row0 = Vec3::new(d0 - lambda, o01, o02);
    let row1 = Vec3::new(o01, d1 - lambda, o12);
    let row2 = Vec3::new(o02, o12, d2 - lambda);

    let r0xr1 = row0.cross(&row1);
    let r0xr2 = row0.cross(&row2);
    let r1xr2 = row1.cross(&row2);
    let d01 = r0xr1.length_squared();
    let d02 = r0xr2.length_squared();
    let d12 = r1xr2.length_squared();

    let (mut best, mut best_norm) = (r0xr1, d01);
    if d02 > best_norm {
        best = r0xr2;
        best_norm = d02;
    }
    if d12 > best_norm {
        best = r1xr2;
        best_norm = d12;
    }
    best * (1.0 / best_norm.sqrt())
}

/// Orthonormal `(u, v)` spanning the plane perpendicular to unit `w`, with
/// `v = w × u`.
fn orthogonal_complement(w: &Vec3) -> (Vec3, Vec3) {
    let [x, y, z] = w.to_array();
    // Pivot on whichever of x/y is larger so the normalizer never vanishes.
    let u = if x.abs() > y.abs() {
        let inv_length = 1.0 / (x * x + z * z).sqrt();
        Vec3::new(-z * inv_length, 0.0, x * inv_length)
    } else {
        let inv_length = 1.0 / (y * y + z * z).sqrt();
        Vec3::new(0.0, z * inv_length, -y * inv_length)
    };
    (u, w.cross(&u))
}

/// Unit eigenvector for the middle root, orthogonal to `first`.
///
/// Restricts `S − λI` to the complement of `first`, giving the 2×2 system
/// `[[m00, m01], [m01, m11]]`, and returns its null vector mapped back to 3-D.
fn second_eigenvector(d: Vec3, o: Vec3, first: &Vec3, lambda: f32) -> Vec3 {
    let s = SymmetricMatrix3::from_parts(d, o);
    let (u, v) = orthogonal_complement(first);
    let su = s.mul_vec3(&u);
    let sv = s.mul_vec3(&v);

    let mut m00 = u.dot(&su) - lambda;
    let mut m01 = u.dot(&sv);
    let mut m11 = v.dot(&sv) - lambda;
    let abs_m00 = m00.abs();
    let abs_m01 = m01.abs();
    let abs_m11 = m11.abs();

    if abs_m00 >= abs_m11 {
        if abs_m00.max(abs_m01) > 0.0 {
            if abs_m00 >= abs_m01 {
                m01 /= m00;
                m00 = 1.0 / (1.0 + m01 * m01).sqrt();
                m01 *= m00;
            } else {
                m00 /= m01;
                m01 = 1.0 / (1.0 + m00 * m00).sqrt();
                m00 *= m01;
            }
            u * m01 - v * m00
        } else {
            // The restricted matrix is zero: every direction in the plane works.
            u
        }
    } else if abs_m11.max(abs_m01) > 0.0 {
        if abs_m11 >= abs_m01 {
            m01 /= m11;
            m11 = 1.0 / (1.0 + m01 * m01).sqrt();
            m01 *= m11;
        } else {
            m11 /= m01;
            m01 = 1.0 / (1.0 + m11 * m11).sqrt();
            m11 *= m01;
        }
        u * m11 - v * m01
    } else {
        u
    }
}
