// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! One Givens rotation step toward diagonal form, with the rotation
//! accumulated as a quaternion.
//!
//! Each call conjugates the matrix by a rotation in a single coordinate plane
//! chosen to shrink one off-diagonal entry, and composes that rotation into
//! the caller's quaternion. Repeating the step over the three planes (a
//! sweep) drives the off-diagonal energy toward zero; how many sweeps to run,
//! and when, is up to the caller.
//!
//! The half-angle is an approximation (`tan(θ/2) ≈ a_pq / 2(a_pp − a_qq)`)
//! guarded by a quality check that falls back to a fixed π/8 half-angle
//! when the approximation would be poor. The constants below define those
//! branch boundaries and are part of the algorithm, not tuning knobs.
//!
//! Invariant: starting from the identity quaternion, after any number of
//! steps `A_k = R(q_k)ᵀ · A_0 · R(q_k)`.

use bytemuck::{Pod, Zeroable};

use crate::quat::Quat;
use crate::sym3::SymmetricMatrix3;
use crate::vec3::Vec3;

/// Below this, `sh²` is treated as an exactly zero angle.
pub const TINY_NUMBER: f32 = 1.0e-20;
/// `3 + 2√2`; `ch² ≤ FOUR_GAMMA_SQUARED · sh²` selects the fixed angle.
pub const FOUR_GAMMA_SQUARED: f32 = 5.828_427_124_746_19;
/// `sin(π/8)`.
pub const SINE_PI_OVER_EIGHT: f32 = 0.382_683_432_365_089_7;
/// `cos(π/8)`.
pub const COSINE_PI_OVER_EIGHT: f32 = 0.923_879_532_511_286_7;

/// The off-diagonal entry a step targets, named by its index pair.
///
/// The rotation happens about the remaining axis: `P01` about z, `P12` about
/// x, `P20` about y. Index pairs are cyclic so every plane uses the same
/// right-handed formulas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GivensPair {
    /// Zero `m01`, rotating about z.
    P01,
    /// Zero `m12`, rotating about x.
    P12,
    /// Zero `m02`, rotating about y.
    P20,
}

impl GivensPair {
    /// Canonical per-sweep order.
    pub const CYCLE: [Self; 3] = [Self::P01, Self::P12, Self::P20];

    /// `(p, q, r)`: the rotated plane `(p, q)` and the rotation axis `r`.
    pub const fn indices(self) -> (usize, usize, usize) {
        match self {
            Self::P01 => (0, 1, 2),
            Self::P12 => (1, 2, 0),
            Self::P20 => (2, 0, 1),
        }
    }

    /// Unit rotation axis.
    pub const fn axis(self) -> Vec3 {
        match self {
            Self::P01 => Vec3::UNIT_Z,
            Self::P12 => Vec3::UNIT_X,
            Self::P20 => Vec3::UNIT_Y,
        }
    }
}

/// Caller-owned in/out slot for [`rotate`]: the partially diagonalized
/// matrix and the rotation accumulated so far.
///
/// `#[repr(C)]` and `Pod`, so per-body states can live in flat buffers.
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct JacobiState {
    /// Current (conjugated) matrix.
    pub matrix: SymmetricMatrix3,
    /// Accumulated rotation.
    pub rotation: Quat,
}

impl JacobiState {
    /// Fresh state: `matrix` untouched, identity rotation.
    pub fn new(matrix: SymmetricMatrix3) -> Self {
        Self {
            matrix,
            rotation: Quat::IDENTITY,
        }
    }

    /// Applies one step in place; see [`rotate`].
    pub fn rotate(&mut self, pair: GivensPair) {
        rotate(self, pair);
    }

    /// Remaining off-diagonal energy `m01² + m02² + m12²`.
    pub fn off_diagonal_energy(&self) -> f32 {
        self.matrix.off_diagonal_norm_squared()
    }
}

/// Applies one Givens step to `state` in place.
pub fn rotate(state: &mut JacobiState, pair: GivensPair) {
    let (matrix, rotation) = step(state.matrix, state.rotation, pair);
    state.matrix = matrix;
    state.rotation = rotation;
}

/// One Givens step by value: returns the conjugated matrix and the composed
/// quaternion `rotation ⊗ g`, where `g` is this step's rotation.
pub fn step(matrix: SymmetricMatrix3, rotation: Quat, pair: GivensPair) -> (SymmetricMatrix3, Quat) {
    let a = Plane::load(&matrix, pair);
    let (sh, ch) = half_angle(&a);

    let sh2 = sh * sh;
    let ch2 = ch * ch;
    let c = ch2 - sh2;
    let s = 2.0 * (ch * sh);

    // Restores unit scale if (sh, ch) is not exactly normalized.
    let n = sh2 + ch2;
    let rr = a.rr * n * n;
    let pr = a.pr * n;
    let qr = a.qr * n;

    let cc = c * c;
    let ss = s * s;
    let cs = c * s;
    let two_pq = a.pq + a.pq;
    let diff = a.pp - a.qq;

    let out = Plane {
        pp: a.pp * cc + a.qq * ss + two_pq * cs,
        qq: a.qq * cc + a.pp * ss - two_pq * cs,
        rr,
        pq: a.pq * (cc - ss) - diff * cs,
        pr: s * qr + c * pr,
        qr: c * qr - s * pr,
    };

    (out.store(pair), compose(&rotation, sh, ch, pair))
}

/// Half-angle sine/cosine for the plane's Givens rotation.
fn half_angle(a: &Plane) -> (f32, f32) {
    let sh = a.pq * 0.5;
    let live = sh * sh >= TINY_NUMBER;
    let sh = if live { sh } else { 0.0 };
    let ch = if live { a.pp - a.qq } else { 1.0 };

    if (sh * sh + ch * ch).is_finite() {
        normalized_half_angle(sh, ch)
    } else {
        // Squares overflow: redo the difference on halved entries and
        // bring the larger of the pair to unit size.
        let sh = sh * 0.5;
        let ch = a.pp * 0.5 - a.qq * 0.5;
        let scale = sh.abs().max(ch.abs());
        normalized_half_angle(sh / scale, ch / scale)
    }
}

/// Fixed π/8 angle when `ch² <= 4γ²·sh²`, otherwise `(sh, ch)` scaled to unit
/// length.
fn normalized_half_angle(sh: f32, ch: f32) -> (f32, f32) {
    let sh2 = sh * sh;
    let ch2 = ch * ch;
    if ch2 <= FOUR_GAMMA_SQUARED * sh2 {
        (SINE_PI_OVER_EIGHT, COSINE_PI_OVER_EIGHT)
    } else {
        let w = 1.0 / (sh2 + ch2).sqrt();
        (w * sh, w * ch)
    }
}

/// `q ⊗ (sh·axis, ch)`, expanded for the pair's axis.
fn compose(q: &Quat, sh: f32, ch: f32, pair: GivensPair) -> Quat {
    let [tx, ty, tz, tw] = [q.x() * sh, q.y() * sh, q.z() * sh, q.w() * sh];
    let [x, y, z, w] = [q.x() * ch, q.y() * ch, q.z() * ch, q.w() * ch];
    match pair {
        GivensPair::P01 => Quat::new(x + ty, y - tx, z + tw, w - tz),
        GivensPair::P12 => Quat::new(x + tw, y + tz, z - ty, w - tx),
        GivensPair::P20 => Quat::new(x - tz, y + tw, z + tx, w - ty),
    }
}

/// The six entries viewed from a rotation plane `(p, q)` with axis `r`.
#[derive(Debug, Copy, Clone)]
struct Plane {
    pp: f32,
    qq: f32,
    rr: f32,
    pq: f32,
    pr: f32,
    qr: f32,
}

impl Plane {
    fn load(m: &SymmetricMatrix3, pair: GivensPair) -> Self {
        match pair {
            GivensPair::P01 => Self {
                pp: m.m00,
                qq: m.m11,
                rr: m.m22,
                pq: m.m01,
                pr: m.m02,
                qr: m.m12,
            },
            GivensPair::P12 => Self {
                pp: m.m11,
                qq: m.m22,
                rr: m.m00,
                pq: m.m12,
                pr: m.m01,
                qr: m.m02,
            },
            GivensPair::P20 => Self {
                pp: m.m22,
                qq: m.m00,
                rr: m.m11,
                pq: m.m02,
                pr: m.m12,
                qr: m.m01,
            },
        }
    }

    fn store(self, pair: GivensPair) -> SymmetricMatrix3 {
        match pair {
            GivensPair::P01 => {
                SymmetricMatrix3::new(self.pp, self.qq, self.rr, self.pq, self.pr, self.qr)
            }
            GivensPair::P12 => {
                SymmetricMatrix3::new(self.rr, self.pp, self.qq, self.pr, self.qr, self.pq)
            }
            GivensPair::P20 => {
                SymmetricMatrix3::new(self.qq, self.rr, self.pp, self.qr, self.pq, self.pr)
            }
        }
    }
}
