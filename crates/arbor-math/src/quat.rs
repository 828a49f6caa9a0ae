// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

use crate::mat3::Mat3;
use crate::vec3::Vec3;

/// Rotation quaternion stored as `(x, y, z, w)`.
///
/// The rotation helpers assume unit length; nothing here renormalizes
/// implicitly. Call [`Quat::normalize`] at boundaries if drift matters.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quat {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components (vector part first).
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// The identity rotation.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Rotation of `angle` radians about `axis` (normalized internally).
    ///
    /// A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let half = 0.5 * angle;
        let s = libm::sinf(half);
        let c = libm::cosf(half);
        let v = axis * s;
        Self::new(v.x(), v.y(), v.z(), c)
    }

    /// Converts an orthonormal, right-handed rotation matrix.
    pub fn from_mat3(m: &Mat3) -> Self {
        let (m00, m01, m02) = (m.get(0, 0), m.get(0, 1), m.get(0, 2));
        let (m10, m11, m12) = (m.get(1, 0), m.get(1, 1), m.get(1, 2));
        let (m20, m21, m22) = (m.get(2, 0), m.get(2, 1), m.get(2, 2));
        let trace = m00 + m11 + m22;
        // Pick the largest of (w, x, y, z) as the divisor.
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        }
    }

    /// X component of the vector part.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Y component of the vector part.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Z component of the vector part.
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Scalar part.
    pub fn w(&self) -> f32 {
        self.w
    }

    /// Vector part `(x, y, z)`.
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Components as `[x, y, z, w]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Hamilton product `self ⊗ rhs` (apply `rhs` first, then `self`).
    pub fn multiply(&self, rhs: &Self) -> Self {
        let (ax, ay, az, aw) = (self.x, self.y, self.z, self.w);
        let (bx, by, bz, bw) = (rhs.x, rhs.y, rhs.z, rhs.w);
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Conjugate (inverse rotation for unit quaternions).
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Squared norm.
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Norm.
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy; the identity if the norm is zero or not finite.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        let inv = 1.0 / len;
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }

    /// Rotates `v` by this (unit) quaternion.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        // v' = v + 2w(u × v) + 2u × (u × v)
        let u = self.vector();
        let t = u.cross(v) * 2.0;
        *v + t * self.w + u.cross(&t)
    }

    /// Rotation matrix `R` such that `R * v == self.rotate(v)`.
    pub fn to_mat3(&self) -> Mat3 {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);
        Mat3::from_cols(
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
        )
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 4]> for Quat {
    fn from(q: [f32; 4]) -> Self {
        Self::new(q[0], q[1], q[2], q[3])
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}
