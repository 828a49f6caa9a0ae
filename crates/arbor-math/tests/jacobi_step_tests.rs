// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use arbor_math::jacobi::{self, COSINE_PI_OVER_EIGHT, SINE_PI_OVER_EIGHT};
use arbor_math::{GivensPair, JacobiState, Quat, SymmetricMatrix3, Vec3};

fn sweep(state: &mut JacobiState) {
    for pair in GivensPair::CYCLE {
        state.rotate(pair);
    }
}

fn samples() -> [SymmetricMatrix3; 3] {
    [
        SymmetricMatrix3::new(2.0, 2.0, 2.0, 1.0, 0.0, 1.0),
        SymmetricMatrix3::new(4.0, 2.0, 3.0, 1.0, -2.0, 0.5),
        SymmetricMatrix3::new(-0.3, 0.8, 0.1, 0.9, -0.6, 0.45),
    ]
}

/// `Rᵀ · A0 · R` against the state's matrix.
fn conjugation_error(a0: &SymmetricMatrix3, state: &JacobiState) -> f32 {
    let r = state.rotation.to_mat3();
    a0.conjugate(&r).to_mat3().max_abs_diff(&state.matrix.to_mat3())
}

#[test]
fn converges_within_ten_sweeps() {
    for a0 in samples() {
        let mut state = JacobiState::new(a0);
        let mut sweeps = 0;
        while state.off_diagonal_energy() >= 1e-6 && sweeps < 10 {
            sweep(&mut state);
            sweeps += 1;
        }
        assert!(
            state.off_diagonal_energy() < 1e-6,
            "{a0:?}: energy {} after {sweeps} sweeps",
            state.off_diagonal_energy()
        );
    }
}

#[test]
fn energy_decreases_every_sweep() {
    for a0 in samples() {
        let mut state = JacobiState::new(a0);
        let mut previous = state.off_diagonal_energy();
        // Past 1e-10 the energy sits at the f32 noise floor.
        while previous > 1e-10 {
            sweep(&mut state);
            let energy = state.off_diagonal_energy();
            assert!(energy < previous, "{a0:?}: {energy} !< {previous}");
            previous = energy;
        }
    }
}

#[test]
fn quaternion_stays_unit_length() {
    for a0 in samples() {
        let mut state = JacobiState::new(a0);
        for _ in 0..30 {
            sweep(&mut state);
            let len = state.rotation.length();
            assert!((len - 1.0).abs() < 1e-4, "{a0:?}: |q| = {len}");
        }
    }
}

#[test]
fn matrix_is_conjugated_by_accumulated_rotation() {
    for a0 in samples() {
        let mut state = JacobiState::new(a0);
        for (i, pair) in GivensPair::CYCLE.iter().cycle().take(15).enumerate() {
            state.rotate(*pair);
            let err = conjugation_error(&a0, &state);
            assert!(err < 1e-4, "{a0:?} step {i} ({pair:?}): {err}");
        }
    }
}

#[test]
fn converged_diagonal_matches_closed_form_values() {
    let a0 = samples()[1];
    let mut state = JacobiState::new(a0);
    for _ in 0..10 {
        sweep(&mut state);
    }
    let mut got = state.matrix.diagonal().to_array();
    got.sort_by(f32::total_cmp);
    let want = a0.eigen().values_array();
    for (g, w) in got.iter().zip(want) {
        assert!((g - w).abs() < 1e-4, "{got:?} vs {want:?}");
    }
}

#[test]
fn diagonal_matrix_is_a_fixed_point() {
    let m = SymmetricMatrix3::from_diagonal(Vec3::new(3.0, -1.0, 0.5));
    let q = Quat::from_axis_angle(Vec3::UNIT_Y, 0.3);
    for pair in GivensPair::CYCLE {
        assert_eq!(jacobi::step(m, q, pair), (m, q), "{pair:?}");
    }
}

#[test]
fn equal_diagonal_takes_fixed_angle() {
    // [[1,1],[1,1]] block: the fixed π/8 half-angle diagonalizes it exactly.
    let m = SymmetricMatrix3::new(1.0, 1.0, 2.0, 1.0, 0.0, 0.0);
    let (out, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert!((out.m00 - 2.0).abs() < 1e-6, "{out:?}");
    assert!(out.m11.abs() < 1e-6, "{out:?}");
    assert!(out.m01.abs() < 1e-6, "{out:?}");
    assert!((out.m22 - 2.0).abs() < 1e-6, "{out:?}");
    assert_eq!(q, Quat::new(0.0, 0.0, SINE_PI_OVER_EIGHT, COSINE_PI_OVER_EIGHT));
}

const FIXED_ANGLE: Quat = Quat::new(0.0, 0.0, SINE_PI_OVER_EIGHT, COSINE_PI_OVER_EIGHT);

#[test]
fn off_diagonal_just_above_tiny_threshold_still_rotates() {
    // sh = 1.1e-10, sh² = 1.21e-20 >= TINY_NUMBER; equal diagonal -> fixed angle.
    let m = SymmetricMatrix3::new(1.0, 1.0, 3.0, 2.2e-10, 0.0, 0.0);
    let (_, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert_eq!(q, FIXED_ANGLE);
}

#[test]
fn off_diagonal_just_below_tiny_threshold_is_left_alone() {
    // sh = 9e-11, sh² = 8.1e-21 < TINY_NUMBER.
    let m = SymmetricMatrix3::new(1.0, 1.0, 3.0, 1.8e-10, 0.0, 0.0);
    let (out, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert_eq!(q, Quat::IDENTITY);
    assert_eq!(out, m);
}

#[test]
fn fixed_angle_applies_up_to_four_gamma_squared() {
    // sh = 1; ch² = 2.41² = 5.8081 <= FOUR_GAMMA_SQUARED.
    let m = SymmetricMatrix3::new(2.41, 0.0, 1.0, 2.0, 0.0, 0.0);
    let (_, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert_eq!(q, FIXED_ANGLE);
}

#[test]
fn exact_angle_applies_past_four_gamma_squared() {
    // sh = 1; ch² = 2.42² = 5.8564 > FOUR_GAMMA_SQUARED.
    let m = SymmetricMatrix3::new(2.42, 0.0, 1.0, 2.0, 0.0, 0.0);
    let (_, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert_ne!(q, FIXED_ANGLE);
    let w = 1.0 / (1.0_f32 + 2.42 * 2.42).sqrt();
    assert!((q.z() - w).abs() < 1e-6, "{q:?}");
    assert!((q.w() - 2.42 * w).abs() < 1e-6, "{q:?}");
}

#[test]
fn huge_diagonal_gap_keeps_state_finite() {
    // (m00 - m11)² overflows f32.
    let m = SymmetricMatrix3::new(4e19, 0.0, 1.0, 1.0, 0.0, 0.0);
    let (out, q) = jacobi::step(m, Quat::IDENTITY, GivensPair::P01);
    assert!((q.length() - 1.0).abs() < 1e-6, "|q| = {}: {q:?}", q.length());
    assert!(out.is_finite(), "{out:?}");
    assert!((out.m00 / 4e19 - 1.0).abs() < 1e-6, "{out:?}");
    assert_eq!(out.m22, 1.0);
    assert!(out.m01.abs() < 1e-3, "{out:?}");
}

#[test]
fn each_pair_rotates_about_its_axis() {
    let m = SymmetricMatrix3::new(4.0, 2.0, 3.0, 1.0, -2.0, 0.5);
    for pair in GivensPair::CYCLE {
        let (_, q) = jacobi::step(m, Quat::IDENTITY, pair);
        let along = q.vector().dot(&pair.axis()).abs();
        assert!((along - q.vector().length()).abs() < 1e-7, "{pair:?}: {q:?}");
    }
}

#[test]
fn targeted_entry_shrinks() {
    let m = SymmetricMatrix3::new(4.0, 2.0, 3.0, 1.0, -2.0, 0.5);
    for pair in GivensPair::CYCLE {
        let (p, q, _) = pair.indices();
        let (out, _) = jacobi::step(m, Quat::IDENTITY, pair);
        assert!(
            out.get(p, q).abs() < m.get(p, q).abs(),
            "{pair:?}: {} -> {}",
            m.get(p, q),
            out.get(p, q)
        );
    }
}

#[test]
fn states_cast_to_flat_buffers() {
    let states = [
        JacobiState::new(SymmetricMatrix3::IDENTITY),
        JacobiState::new(SymmetricMatrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)),
    ];
    assert_eq!(core::mem::size_of::<JacobiState>(), 10 * 4);
    let flat: &[f32] = bytemuck::cast_slice(&states);
    assert_eq!(flat.len(), 20);
    assert_eq!(&flat[10..16], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(&flat[16..20], &[0.0, 0.0, 0.0, 1.0]);

    let mut buffer = flat.to_vec();
    let slots: &mut [JacobiState] = bytemuck::cast_slice_mut(&mut buffer);
    slots[1].rotate(GivensPair::P01);
    assert!(slots[1].matrix.m01.abs() < 4.0);
}
