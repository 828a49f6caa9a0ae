// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Iterative reference solver: Householder reduction to tridiagonal form,
//! then QL with implicit shifts.
//!
//! Slower than [`crate::eigen::closed_form`] but insensitive to the
//! cancellation that can affect closed-form roots, so it is useful as an
//! oracle and for offline checks. Runs in `f64` internally.

use crate::eigen::Eigen;
use crate::error::MathError;
use crate::mat3::Mat3;
use crate::sym3::SymmetricMatrix3;
use crate::vec3::Vec3;

/// Iteration cap per eigenvalue.
pub const MAX_ITERATIONS: u32 = 30;

type Col = [f64; 3];

/// `A = Q · T · Qᵀ` with `T` tridiagonal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tridiagonal {
    /// Orthogonal factor, stored as columns.
    pub q: [Col; 3],
    /// Diagonal of `T`.
    pub d: [f64; 3],
    /// Sub-diagonal of `T` (`T[0][1]`, `T[1][2]`).
    pub e: [f64; 2],
}

impl Tridiagonal {
    /// `Q` narrowed to `f32`.
    pub fn q_mat3(&self) -> Mat3 {
        Mat3::from_cols(narrow(self.q[0]), narrow(self.q[1]), narrow(self.q[2]))
    }
}

/// Householder reduction of `m` to tridiagonal form.
///
/// Only the first row needs annihilating in 3×3, so this is a single
/// reflection; when `m02` and `m01` already vanish `Q` is the identity.
pub fn tridiagonalize(m: &SymmetricMatrix3) -> Tridiagonal {
    let a00 = f64::from(m.m00);
    let a11 = f64::from(m.m11);
    let a22 = f64::from(m.m22);
    let a01 = f64::from(m.m01);
    let a02 = f64::from(m.m02);
    let a12 = f64::from(m.m12);

    let mut q = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let h = a01 * a01 + a02 * a02;
    let g = if a01 > 0.0 { -h.sqrt() } else { h.sqrt() };
    let f = g * a01;
    let u = [0.0, a01 - g, a02];
    let omega = h - f;

    if omega > 0.0 {
        let omega = 1.0 / omega;

        let f1 = a11 * u[1] + a12 * u[2];
        let f2 = a12 * u[1] + a22 * u[2];
        let k = 0.5 * omega * omega * (u[1] * f1 + u[2] * f2);
        let p1 = omega * f1 - k * u[1];
        let p2 = omega * f2 - k * u[2];

        for (col, &ui) in q.iter_mut().zip(u.iter()).skip(1) {
            for (qj, &uj) in col.iter_mut().zip(u.iter()) {
                *qj -= omega * ui * uj;
            }
        }

        Tridiagonal {
            q,
            d: [a00, a11 - 2.0 * p1 * u[1], a22 - 2.0 * p2 * u[2]],
            e: [g, a12 - p1 * u[2] - u[1] * p2],
        }
    } else {
        Tridiagonal {
            q,
            d: [a00, a11, a22],
            e: [g, a12],
        }
    }
}

/// Eigendecomposition via tridiagonal QL.
///
/// Eigenvalues come back in the order the iteration settles them (not
/// sorted). The basis is flipped if needed so it is right-handed.
#[allow(clippy::float_cmp, clippy::many_single_char_names)]
pub fn eigen(m: &SymmetricMatrix3) -> Result<Eigen, MathError> {
    let Tridiagonal { mut q, d, e } = tridiagonalize(m);
    let mut w = d;
    let mut e = [e[0], e[1], 0.0];

    for l in 0..2 {
        let mut iterations = 0;
        loop {
            // Find a negligible sub-diagonal entry to split at.
            let mut split = l;
            while split <= 1 {
                let g = w[split].abs() + w[split + 1].abs();
                if e[split].abs() + g == g {
                    break;
                }
                split += 1;
            }
            if split == l {
                break;
            }

            if iterations >= MAX_ITERATIONS {
                return Err(MathError::NoConvergence { iterations });
            }
            iterations += 1;

            // Wilkinson-style shift.
            let mut g = (w[l + 1] - w[l]) / (e[l] + e[l]);
            let mut r = g.hypot(1.0);
            g = if g > 0.0 {
                w[split] - w[l] + e[l] / (g + r)
            } else {
                w[split] - w[l] + e[l] / (g - r)
            };

            let mut c = 1.0;
            let mut s = 1.0;
            let mut p = 0.0;
            for i in (l..split).rev() {
                let f = s * e[i];
                let b = c * e[i];
                if f.abs() > g.abs() {
                    c = g / f;
                    r = c.hypot(1.0);
                    e[i + 1] = f * r;
                    s = 1.0 / r;
                    c *= s;
                } else {
                    s = f / g;
                    r = s.hypot(1.0);
                    e[i + 1] = g * r;
                    c = 1.0 / r;
                    s *= c;
                }

                g = w[i + 1] - p;
                r = (w[i] - g) * s + 2.0 * c * b;
                p = s * r;
                w[i + 1] = g + p;
                g = c * r - b;

                let t = q[i + 1];
                for j in 0..3 {
                    q[i + 1][j] = s * q[i][j] + c * t[j];
                    q[i][j] = c * q[i][j] - s * t[j];
                }
            }
            w[l] -= p;
            e[l] = g;
            e[split] = 0.0;
        }
    }

    let mut vectors = Mat3::from_cols(narrow(q[0]), narrow(q[1]), narrow(q[2]));
    if vectors.determinant() < 0.0 {
        vectors = Mat3::from_cols(vectors.col(0), vectors.col(1), -vectors.col(2));
    }
    Ok(Eigen {
        values: narrow(w),
        vectors,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tridiagonal_reassembles_input() {
        let m = SymmetricMatrix3::new(2.0, 2.0, 2.0, 1.0, 0.5, 1.0);
        let t = tridiagonalize(&m);
        let tri = Mat3::from_rows([
            [t.d[0] as f32, t.e[0] as f32, 0.0],
            [t.e[0] as f32, t.d[1] as f32, t.e[1] as f32],
            [0.0, t.e[1] as f32, t.d[2] as f32],
        ]);
        let q = t.q_mat3();
        let back = q * tri * q.transpose();
        assert!(back.max_abs_diff(&m.to_mat3()) < 1e-5, "{back:?}");
    }

    #[test]
    fn already_tridiagonal_keeps_identity_q() {
        let m = SymmetricMatrix3::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.5);
        let t = tridiagonalize(&m);
        assert_eq!(t.q_mat3(), Mat3::IDENTITY);
        assert_eq!(t.d, [1.0, 2.0, 3.0]);
        assert_eq!(t.e, [0.0, 0.5]);
    }
}
