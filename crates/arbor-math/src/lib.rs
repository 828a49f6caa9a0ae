// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! arbor-math: diagonalization kernels for symmetric 3×3 matrices.
//!
//! Two independent strategies are provided over the same input type
//! ([`SymmetricMatrix3`]):
//!
//! - [`eigen::closed_form`]: one-shot, non-iterative eigendecomposition.
//! - [`jacobi::rotate`]: a single Givens rotation step that moves a matrix
//!   toward diagonal form and accumulates the rotation in a [`Quat`]. Callers
//!   drive it across simulation steps; the crate never loops to convergence.
//!
//! Every kernel is a pure function over `Copy` values: no I/O, no allocation,
//! no shared state. Independent matrices can be processed in parallel freely.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::float_cmp
)]
// Single-letter names (`p`, `q`, `c`, `s`, ...) follow the notation of the
// numeric derivations they implement.

/// Closed-form eigensolver for symmetric 3×3 matrices.
pub mod eigen;
/// Generalized eigenproblem `K x = λ I x` via Cholesky reduction.
pub mod generalized;
/// Incremental Givens rotation step with quaternion accumulation.
pub mod jacobi;
/// Householder + QL iterative reference solver (double precision).
pub mod ql;

mod error;
mod mat3;
mod quat;
mod sym3;
mod vec3;

pub use eigen::Eigen;
pub use error::MathError;
pub use generalized::GeneralizedEigen;
pub use jacobi::{GivensPair, JacobiState};
pub use mat3::Mat3;
pub use quat::Quat;
pub use sym3::{SymmetricMatrix3, SYMMETRY_TOLERANCE};
pub use vec3::Vec3;
