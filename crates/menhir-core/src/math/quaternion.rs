// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for representing 3D rotations.

use serde::{Deserialize, Serialize};

use super::{degrees_to_radians, radians_to_degrees, Mat4, Vec3, EPSILON};
use std::ops::{Add, Mul, MulAssign, Neg};

/// Represents a quaternion for efficient 3D rotations.
///
/// Quaternions avoid the gimbal lock and ill-defined composition of raw
/// Euler angles, which is why they are the canonical rotation representation
/// in this crate; Euler angles exist only as a lossy convenience view
/// ([`Quaternion::from_euler_degrees`] / [`Quaternion::to_euler_degrees`]).
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the
/// "vector" part and `w` is the "scalar" part. For representing rotations it
/// should be a "unit quaternion" where `x² + y² + z² + w² = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating
    /// rotations, prefer `from_axis_angle` or the other rotation-specific
    /// constructors.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion representing a rotation around a given axis.
    ///
    /// The axis is normalized internally, so non-unit axes are accepted.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let normalized_axis = axis.normalize();
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self {
            x: normalized_axis.x * s,
            y: normalized_axis.y * s,
            z: normalized_axis.z * s,
            w: c,
        }
    }

    /// Creates a quaternion from combined pitch/yaw/roll Euler angles in
    /// degrees.
    ///
    /// `euler_degrees` is `(pitch, yaw, roll)`: rotation around the X, Y,
    /// and Z axes respectively. The component formulas follow the GLM
    /// convention so that [`Quaternion::to_euler_degrees`] is its inverse
    /// over the principal range.
    pub fn from_euler_degrees(euler_degrees: Vec3) -> Self {
        let half = Vec3::new(
            degrees_to_radians(euler_degrees.x) * 0.5,
            degrees_to_radians(euler_degrees.y) * 0.5,
            degrees_to_radians(euler_degrees.z) * 0.5,
        );
        let (sx, cx) = half.x.sin_cos();
        let (sy, cy) = half.y.sin_cos();
        let (sz, cz) = half.z.sin_cos();

        Self {
            x: sx * cy * cz - cx * sy * sz,
            y: cx * sy * cz + sx * cy * sz,
            z: cx * cy * sz - sx * sy * cz,
            w: cx * cy * cz + sx * sy * sz,
        }
    }

    /// Extracts pitch/yaw/roll Euler angles in degrees.
    ///
    /// This is a lossy view: distinct quaternions can map to the same Euler
    /// triple and the yaw term is clamped to ±90°.
    pub fn to_euler_degrees(&self) -> Vec3 {
        let pitch = (2.0 * (self.y * self.z + self.w * self.x)).atan2(
            self.w * self.w - self.x * self.x - self.y * self.y + self.z * self.z,
        );
        let yaw = (-2.0 * (self.x * self.z - self.w * self.y))
            .clamp(-1.0, 1.0)
            .asin();
        let roll = (2.0 * (self.x * self.y + self.w * self.z)).atan2(
            self.w * self.w + self.x * self.x - self.y * self.y - self.z * self.z,
        );
        Vec3::new(
            radians_to_degrees(pitch),
            radians_to_degrees(yaw),
            radians_to_degrees(roll),
        )
    }

    /// Creates a rotation that orients the local forward axis (−Z) along
    /// `direction`, with `up` as the approximate up reference.
    ///
    /// `direction` does not need to be normalized. A zero-length direction
    /// or an `up` parallel to `direction` is degenerate: the result is
    /// undefined and it is the caller's responsibility to avoid it.
    pub fn look_rotation(direction: Vec3, up: Vec3) -> Self {
        let z_axis = -direction.normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        Self::from_rotation_matrix(&Mat4::from_cols(
            x_axis.extend(0.0),
            y_axis.extend(0.0),
            z_axis.extend(0.0),
            super::Vec4::W,
        ))
    }

    /// Creates a quaternion from a 4x4 rotation matrix.
    ///
    /// This method only considers the upper 3x3 part of the matrix for the
    /// conversion.
    pub fn from_rotation_matrix(m: &Mat4) -> Self {
        let m00 = m.cols[0].x;
        let m10 = m.cols[0].y;
        let m20 = m.cols[0].z;
        let m01 = m.cols[1].x;
        let m11 = m.cols[1].y;
        let m21 = m.cols[1].z;
        let m02 = m.cols[2].x;
        let m12 = m.cols[2].y;
        let m22 = m.cols[2].z;

        // Algorithm from http://www.euclideanspace.com/maths/geometry/rotations/conversions/matrixToQuaternion/index.htm
        let trace = m00 + m11 + m22;
        let mut q = Self::IDENTITY;

        if trace > 0.0 {
            let s = 2.0 * (trace + 1.0).sqrt();
            q.w = 0.25 * s;
            q.x = (m21 - m12) / s;
            q.y = (m02 - m20) / s;
            q.z = (m10 - m01) / s;
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            q.w = (m21 - m12) / s;
            q.x = 0.25 * s;
            q.y = (m01 + m10) / s;
            q.z = (m02 + m20) / s;
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            q.w = (m02 - m20) / s;
            q.x = (m01 + m10) / s;
            q.y = 0.25 * s;
            q.z = (m12 + m21) / s;
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            q.w = (m10 - m01) / s;
            q.x = (m02 + m20) / s;
            q.y = (m12 + m21) / s;
            q.z = 0.25 * s;
        }
        q.normalize()
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the quaternion has a near-zero magnitude, it returns the identity
    /// quaternion.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            let inv_mag = 1.0 / mag_sq.sqrt();
            Self {
                x: self.x * inv_mag,
                y: self.y * inv_mag,
                z: self.z * inv_mag,
                w: self.w * inv_mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the conjugate of the quaternion, which negates the vector
    /// part. For a unit quaternion this is also the inverse rotation.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates a 3D vector by this quaternion.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s: f32 = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Performs a Spherical Linear Interpolation (Slerp) between two
    /// quaternions.
    ///
    /// Slerp follows the shortest path on the rotation sphere, falling back
    /// to a normalized linear interpolation when the inputs are nearly
    /// parallel. `t` is **not** clamped: values outside `[0, 1]`
    /// extrapolate past the endpoints. The result is renormalized in every
    /// branch, so it is always unit length.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let mut cos_theta = start.dot(end);
        let mut end_adjusted = end;

        // If the dot product is negative, the quaternions are more than 90
        // degrees apart; negate one to take the shorter arc.
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end_adjusted = -end;
        }

        if cos_theta > 1.0 - EPSILON {
            ((start * (1.0 - t)) + (end_adjusted * t)).normalize()
        } else {
            let angle = cos_theta.acos();
            let sin_theta_inv = 1.0 / angle.sin();
            let scale_start = ((1.0 - t) * angle).sin() * sin_theta_inv;
            let scale_end = (t * angle).sin() * sin_theta_inv;
            ((start * scale_start) + (end_adjusted * scale_end)).normalize()
        }
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// Note that quaternion multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    /// Combines this rotation with another.
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vec3(rhs)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a rotation operation; it is used by slerp.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
            w: self.w * scalar,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components of the quaternion. The negation represents
    /// the same rotation.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_relative_eq;

    fn quat_approx_eq(q1: Quaternion, q2: Quaternion) -> bool {
        // Same rotation up to sign.
        approx::relative_eq!(q1.dot(q2).abs(), 1.0, epsilon = EPSILON * 10.0)
    }

    #[test]
    fn test_identity_and_default() {
        let q = Quaternion::default();
        assert_eq!(q, Quaternion::IDENTITY);
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_from_axis_angle_normalizes_axis() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 5.0, 0.0), FRAC_PI_2);
        let expected = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(quat_approx_eq(q, expected));
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_vec3_quarter_turn_y() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let v = q * Vec3::X;
        assert_relative_eq!(v.x, 0.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(v.y, 0.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(v.z, -1.0, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_euler_pure_axis_matches_axis_angle() {
        let yaw = Quaternion::from_euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let expected = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(quat_approx_eq(yaw, expected));

        let pitch = Quaternion::from_euler_degrees(Vec3::new(45.0, 0.0, 0.0));
        let expected = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2 / 2.0);
        assert!(quat_approx_eq(pitch, expected));
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vec3::new(20.0, 40.0, -30.0);
        let q = Quaternion::from_euler_degrees(euler);
        let back = q.to_euler_degrees();
        assert_relative_eq!(back.x, euler.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, euler.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, euler.z, epsilon = 1e-3);
    }

    #[test]
    fn test_look_rotation_forward() {
        // Looking down -Z from the origin is the identity orientation.
        let q = Quaternion::look_rotation(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        assert!(quat_approx_eq(q, Quaternion::IDENTITY));

        // Looking along +X: forward axis must map onto +X.
        let q = Quaternion::look_rotation(Vec3::X, Vec3::Y);
        let fwd = q * Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(fwd.x, 1.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(fwd.y, 0.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(fwd.z, 0.0, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(quat_approx_eq(Quaternion::slerp(a, b, 0.0), a));
        assert!(quat_approx_eq(Quaternion::slerp(a, b, 1.0), b));
    }

    #[test]
    fn test_slerp_halfway() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let mid = Quaternion::slerp(a, b, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2 / 2.0);
        assert!(quat_approx_eq(mid, expected));
    }

    #[test]
    fn test_slerp_extrapolates_and_stays_unit() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2 / 2.0);
        // t outside [0, 1] is allowed; the result must remain unit length.
        let q = Quaternion::slerp(a, b, 1.5);
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON * 10.0);
        let expected = Quaternion::from_axis_angle(Vec3::Y, 1.5 * FRAC_PI_2 / 2.0);
        assert!(quat_approx_eq(q, expected));
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let a = Quaternion::from_axis_angle(Vec3::Y, 0.1);
        let b = -Quaternion::from_axis_angle(Vec3::Y, 0.3);
        let mid = Quaternion::slerp(a, b, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Y, 0.2);
        assert!(quat_approx_eq(mid, expected));
    }

    #[test]
    fn test_hamilton_product_composes() {
        let q1 = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2 / 2.0);
        let q2 = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2 / 2.0);
        let combined = q1 * q2;
        let expected = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(quat_approx_eq(combined, expected));
    }
}
