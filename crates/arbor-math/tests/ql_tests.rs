// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use core::f32::consts::SQRT_2;

use arbor_math::ql::{self, MAX_ITERATIONS};
use arbor_math::{Mat3, SymmetricMatrix3, Vec3};

fn sorted(mut v: [f32; 3]) -> [f32; 3] {
    v.sort_by(f32::total_cmp);
    v
}

#[test]
fn tridiagonal_example_matches_analytic_values() {
    let m = SymmetricMatrix3::new(2.0, 2.0, 2.0, 1.0, 0.0, 1.0);
    let e = ql::eigen(&m).unwrap();
    let got = sorted(e.values_array());
    let want = [2.0 - SQRT_2, 2.0, 2.0 + SQRT_2];
    for (g, w) in got.iter().zip(want) {
        assert!((g - w).abs() < 1e-5, "{got:?} vs {want:?}");
    }
    assert!(e.residual(&m) < 1e-5, "{e:?}");
}

#[test]
fn basis_is_orthonormal_and_right_handed() {
    for m in [
        SymmetricMatrix3::new(4.0, 2.0, 3.0, 1.0, -2.0, 0.5),
        SymmetricMatrix3::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.5),
        SymmetricMatrix3::new(-0.3, 0.8, 0.1, 0.9, -0.6, 0.45),
    ] {
        let e = ql::eigen(&m).unwrap();
        assert!(e.orthonormality_error() < 1e-5, "{e:?}");
        assert!((e.vectors.determinant() - 1.0).abs() < 1e-5, "{e:?}");
        assert!(e.residual(&m) < 1e-5, "{m:?} -> {e:?}");
    }
}

#[test]
fn diagonal_input_needs_no_iterations() {
    let m = SymmetricMatrix3::from_diagonal(Vec3::new(3.0, 2.0, 1.0));
    let e = ql::eigen(&m).unwrap();
    assert_eq!(e.values_array(), [3.0, 2.0, 1.0]);
    assert_eq!(e.vectors, Mat3::IDENTITY);
}

#[test]
fn zero_matrix() {
    let e = ql::eigen(&SymmetricMatrix3::ZERO).unwrap();
    assert_eq!(e.values, Vec3::ZERO);
    assert!(e.orthonormality_error() < 1e-7);
}

#[test]
fn agrees_with_closed_form() {
    let m = SymmetricMatrix3::new(1.5, -0.5, 2.5, 0.25, 0.75, -1.25);
    let iterative = sorted(ql::eigen(&m).unwrap().values_array());
    let closed = sorted(m.eigen().values_array());
    for (a, b) in iterative.iter().zip(closed) {
        assert!((a - b).abs() < 1e-5, "{iterative:?} vs {closed:?}");
    }
}

#[test]
fn iteration_cap_is_thirty() {
    assert_eq!(MAX_ITERATIONS, 30);
}
