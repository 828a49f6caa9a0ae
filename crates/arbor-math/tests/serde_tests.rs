// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use arbor_math::{GivensPair, JacobiState, SymmetricMatrix3};

#[test]
fn symmetric_matrix_uses_named_entries() {
    let m = SymmetricMatrix3::new(1.0, 2.0, 3.0, 0.5, -0.25, 0.125);
    let json = serde_json::to_value(m).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "m00": 1.0, "m11": 2.0, "m22": 3.0,
            "m01": 0.5, "m02": -0.25, "m12": 0.125
        })
    );
    let back: SymmetricMatrix3 = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn jacobi_state_survives_a_checkpoint() {
    let mut state = JacobiState::new(SymmetricMatrix3::new(4.0, 2.0, 3.0, 1.0, -2.0, 0.5));
    state.rotate(GivensPair::P01);
    let text = serde_json::to_string(&state).unwrap();
    let mut resumed: JacobiState = serde_json::from_str(&text).unwrap();
    assert_eq!(resumed, state);

    resumed.rotate(GivensPair::P12);
    state.rotate(GivensPair::P12);
    assert_eq!(resumed, state);
}
