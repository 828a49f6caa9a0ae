// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Generalized symmetric eigenproblem `K x = λ I x`.
//!
//! `I` (an inertia tensor) must be positive definite. With `I = L·Lᵀ` the
//! problem reduces to the ordinary symmetric one `A = L⁻¹ K L⁻ᵀ`, whose
//! eigenvectors `X` map back as `U = L⁻ᵀ X`. The resulting modes decouple
//! `I θ'' + K θ = τ` into three scalar equations.

use crate::eigen;
use crate::error::MathError;
use crate::mat3::Mat3;
use crate::sym3::SymmetricMatrix3;
use crate::vec3::Vec3;

/// Modal decomposition of a stiffness/inertia pair.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneralizedEigen {
    /// `Λ`; `values[i]` belongs to column `i` of `modes`.
    pub values: Vec3,
    /// `U` (columns are modes). `Uᵀ I U = 1` and `Uᵀ K U = diag(Λ)`.
    pub modes: Mat3,
}

impl GeneralizedEigen {
    /// `Uᵀ · m · U`; the identity for the inertia and `diag(Λ)` for the
    /// stiffness, up to rounding.
    pub fn project(&self, m: &SymmetricMatrix3) -> Mat3 {
        self.modes.transpose() * m.to_mat3() * self.modes
    }
}

/// Solves `stiffness · x = λ · inertia · x`.
///
/// # Errors
/// [`MathError::NonFinite`] for NaN/∞ input (or an unrepresentable factor
/// inverse); [`MathError::NotPositiveDefinite`] when `inertia` has no
/// Cholesky factor.
pub fn solve(
    inertia: &SymmetricMatrix3,
    stiffness: &SymmetricMatrix3,
) -> Result<GeneralizedEigen, MathError> {
    if !inertia.is_finite() || !stiffness.is_finite() {
        return Err(MathError::NonFinite);
    }
    let l = inertia.cholesky()?;
    let l_inv_t = l.inverse().ok_or(MathError::NonFinite)?.transpose();

    // (L⁻ᵀ)ᵀ K L⁻ᵀ = L⁻¹ K L⁻ᵀ; `conjugate` re-symmetrizes the rounding.
    let reduced = stiffness.conjugate(&l_inv_t);
    let eigen = eigen::closed_form(&reduced);

    Ok(GeneralizedEigen {
        values: eigen.values,
        modes: l_inv_t * eigen.vectors,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn identity_inertia_reduces_to_ordinary_problem() {
        let k = SymmetricMatrix3::new(2.0, 2.0, 2.0, 1.0, 0.0, 1.0);
        let g = solve(&SymmetricMatrix3::IDENTITY, &k).unwrap();
        let e = eigen::closed_form(&k);
        assert!((g.values - e.values).length() < 1e-5);
        assert!(g.modes.max_abs_diff(&e.vectors) < 1e-5);
    }

    #[test]
    fn rejects_non_finite() {
        let bad = SymmetricMatrix3::new(f32::NAN, 1.0, 1.0, 0.0, 0.0, 0.0);
        assert_eq!(
            solve(&bad, &SymmetricMatrix3::IDENTITY),
            Err(MathError::NonFinite)
        );
    }
}
