// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

/// Failures of the checked constructors and the auxiliary solvers.
///
/// The two diagonalization kernels themselves are total and never return this.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    /// A full 3×3 matrix was not symmetric within tolerance.
    #[error("matrix is not symmetric: |a[{row}][{col}] - a[{col}][{row}]| = {delta}")]
    NotSymmetric {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Absolute difference between the mirrored entries.
        delta: f32,
    },
    /// An input entry was NaN or infinite.
    #[error("matrix contains a non-finite entry")]
    NonFinite,
    /// The QL iteration did not settle within its iteration budget.
    #[error("ql iteration did not converge after {iterations} iterations")]
    NoConvergence {
        /// Iterations spent on the eigenvalue that failed to settle.
        iterations: u32,
    },
    /// Cholesky factorization hit a non-positive pivot.
    #[error("matrix is not positive definite (pivot {pivot})")]
    NotPositiveDefinite {
        /// Diagonal index at which the factorization failed.
        pivot: usize,
    },
}
