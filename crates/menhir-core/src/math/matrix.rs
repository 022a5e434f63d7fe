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

//! Provides a column-major 4x4 matrix type for 3D transformations.

use serde::{Deserialize, Serialize};

use super::{Quaternion, Vec3, Vec4};
use std::ops::Mul;

/// A 4x4 column-major matrix with `f32` components.
///
/// Columns are stored as [`Vec4`]s, so the memory layout matches what the
/// renderer uploads as a shader uniform (64 bytes, column-major); see
/// [`Mat4::to_cols_array`].
///
/// There is no error reporting anywhere in this type: operations on
/// degenerate input (a singular [`Mat4::inverse`], a collapsed
/// [`Mat4::look_at_rh`] basis) produce non-finite components that propagate
/// through subsequent arithmetic.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The four columns of the matrix.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    /// A matrix with all components set to `0.0`.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO],
    };

    /// Creates a matrix from its four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a matrix from a flat column-major array of 16 components.
    #[inline]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self::from_cols(
            Vec4::new(m[0], m[1], m[2], m[3]),
            Vec4::new(m[4], m[5], m[6], m[7]),
            Vec4::new(m[8], m[9], m[10], m[11]),
            Vec4::new(m[12], m[13], m[14], m[15]),
        )
    }

    /// Returns the matrix as a flat column-major array of 16 components,
    /// ready for uniform upload.
    #[inline]
    pub const fn to_cols_array(&self) -> [f32; 16] {
        [
            self.cols[0].x,
            self.cols[0].y,
            self.cols[0].z,
            self.cols[0].w,
            self.cols[1].x,
            self.cols[1].y,
            self.cols[1].z,
            self.cols[1].w,
            self.cols[2].x,
            self.cols[2].y,
            self.cols[2].z,
            self.cols[2].w,
            self.cols[3].x,
            self.cols[3].y,
            self.cols[3].z,
            self.cols[3].w,
        ]
    }

    /// Returns a row of the matrix as a `Vec4`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        match index {
            0 => Vec4::new(self.cols[0].x, self.cols[1].x, self.cols[2].x, self.cols[3].x),
            1 => Vec4::new(self.cols[0].y, self.cols[1].y, self.cols[2].y, self.cols[3].y),
            2 => Vec4::new(self.cols[0].z, self.cols[1].z, self.cols[2].z, self.cols[3].z),
            3 => Vec4::new(self.cols[0].w, self.cols[1].w, self.cols[2].w, self.cols[3].w),
            _ => panic!("Mat4 row index out of bounds: {index}"),
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(v.x, v.y, v.z, 1.0),
        )
    }

    /// Creates a non-uniform scale matrix.
    ///
    /// A zero component is accepted and produces a singular matrix; callers
    /// that later invert it get non-finite values back.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation matrix from a unit quaternion.
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        let x = q.x;
        let y = q.y;
        let z = q.z;
        let w = q.w;
        let x2 = x + x;
        let y2 = y + y;
        let z2 = z + z;
        let xx = x * x2;
        let xy = x * y2;
        let xz = x * z2;
        let yy = y * y2;
        let yz = y * z2;
        let zz = z * z2;
        let wx = w * x2;
        let wy = w * y2;
        let wz = w * z2;

        Self::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// Creates a right-handed perspective projection matrix with a
    /// [-1, 1] clip-space depth range (the OpenGL convention).
    ///
    /// # Arguments
    ///
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`: Distance to the near clipping plane (must be positive).
    /// * `z_far`: Distance to the far clipping plane (must be > `z_near`).
    #[inline]
    pub fn perspective_rh_gl(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        debug_assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let nmf = z_near - z_far;

        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (z_far + z_near) / nmf, -1.0),
            Vec4::new(0.0, 0.0, (2.0 * z_far * z_near) / nmf, 0.0),
        )
    }

    /// Creates a right-handed orthographic projection matrix with a
    /// [-1, 1] clip-space depth range (the OpenGL convention).
    #[inline]
    pub fn orthographic_rh_gl(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = z_far - z_near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / fmn, 0.0),
            Vec4::new(
                -(right + left) / rml,
                -(top + bottom) / tmb,
                -(z_far + z_near) / fmn,
                1.0,
            ),
        )
    }

    /// Creates a right-handed view matrix for a camera at `eye` looking
    /// towards `target`.
    ///
    /// `up` is the approximate world-up direction (commonly `Vec3::Y`).
    /// Degenerate input (`eye == target`, or `up` parallel to the view
    /// direction) collapses the basis and yields a matrix with non-finite
    /// or zero rotation components; it is the caller's responsibility to
    /// avoid it.
    #[inline]
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        )
    }

    /// Returns the transpose of the matrix, where rows and columns are
    /// swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.get_row(0), self.get_row(1), self.get_row(2), self.get_row(3))
    }

    /// Computes the determinant of the matrix.
    pub fn determinant(&self) -> f32 {
        let [a, b, c, d] = self.cols;

        // 2x2 minors built from the lower two rows.
        let m_cd = c.z * d.w - d.z * c.w;
        let m_bd = b.z * d.w - d.z * b.w;
        let m_bc = b.z * c.w - c.z * b.w;
        let m_ad = a.z * d.w - d.z * a.w;
        let m_ac = a.z * c.w - c.z * a.w;
        let m_ab = a.z * b.w - b.z * a.w;

        a.x * (b.y * m_cd - c.y * m_bd + d.y * m_bc)
            - b.x * (a.y * m_cd - c.y * m_ad + d.y * m_ac)
            + c.x * (a.y * m_bd - b.y * m_ad + d.y * m_ab)
            - d.x * (a.y * m_bc - b.y * m_ac + c.y * m_ab)
    }

    /// Computes the general inverse of the matrix via cofactor expansion.
    ///
    /// There is deliberately no singularity check: inverting a singular
    /// matrix (determinant zero, e.g. from a zero scale component) divides
    /// by zero and returns a matrix full of non-finite values, which
    /// propagate through any further math. This is the documented failure
    /// mode of the whole subsystem rather than an error condition.
    pub fn inverse(&self) -> Self {
        let m = self.to_cols_array();
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        let inv_det = 1.0 / det;

        for value in inv.iter_mut() {
            *value *= inv_det;
        }
        Self::from_cols_array(inv)
    }
}

// --- Operator Overloads ---

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. Note that matrix
    /// multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let r0 = self.get_row(0);
        let r1 = self.get_row(1);
        let r2 = self.get_row(2);
        let r3 = self.get_row(3);

        let col = |c: Vec4| Vec4::new(r0.dot(c), r1.dot(c), r2.dot(c), r3.dot(c));
        Self::from_cols(
            col(rhs.cols[0]),
            col(rhs.cols[1]),
            col(rhs.cols[2]),
            col(rhs.cols[3]),
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{degrees_to_radians, EPSILON, FRAC_PI_2};
    use approx::assert_relative_eq;

    fn mat4_approx_eq(a: Mat4, b: Mat4, epsilon: f32) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() <= epsilon)
    }

    #[test]
    fn test_identity_is_multiplicative_neutral() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(mat4_approx_eq(Mat4::IDENTITY * m, m, EPSILON));
        assert!(mat4_approx_eq(m * Mat4::IDENTITY, m, EPSILON));
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p.truncate(), Vec3::new(1.0, 2.0, 3.0));

        let d = m * Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(d.truncate(), Vec3::Z);
    }

    #[test]
    fn test_from_quat_rotates_like_quaternion() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let m = Mat4::from_quat(q);
        let rotated = (m * Vec4::new(1.0, 0.0, 0.0, 0.0)).truncate();
        let expected = q * Vec3::X;
        assert_relative_eq!(rotated.x, expected.x, epsilon = EPSILON * 10.0);
        assert_relative_eq!(rotated.y, expected.y, epsilon = EPSILON * 10.0);
        assert_relative_eq!(rotated.z, expected.z, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::from_quat(Quaternion::from_axis_angle(Vec3::Y, 0.7))
            * Mat4::from_scale(Vec3::new(2.0, 3.0, 0.5));
        let product = m * m.inverse();
        assert!(mat4_approx_eq(product, Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_inverse_of_singular_is_non_finite() {
        let m = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let inv = m.inverse();
        assert!(inv.to_cols_array().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_transpose_involution() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn test_determinant_of_scale() {
        let m = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(m.determinant(), 24.0, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_maps_forward_axis_to_center() {
        let proj = Mat4::perspective_rh_gl(degrees_to_radians(60.0), 16.0 / 9.0, 0.1, 100.0);
        let clip = proj * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(clip.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(clip.y, 0.0, epsilon = EPSILON);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn test_orthographic_maps_extents_to_unit_cube() {
        let proj = Mat4::orthographic_rh_gl(-8.0, 8.0, -4.0, 4.0, 0.1, 100.0);
        let clip = proj * Vec4::new(8.0, 4.0, -0.1, 1.0);
        assert_relative_eq!(clip.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(clip.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(clip.z, -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_look_at_places_eye_at_origin() {
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let eye_in_view = view * eye.extend(1.0);
        assert_relative_eq!(eye_in_view.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(eye_in_view.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(eye_in_view.z, 0.0, epsilon = EPSILON);

        // The target sits on the negative Z axis in view space.
        let target_in_view = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target_in_view.z, -3.0, epsilon = EPSILON);
    }
}
