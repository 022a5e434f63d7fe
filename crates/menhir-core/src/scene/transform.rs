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

//! An object's position, rotation, and scale with cached matrix generation.

use std::cell::Cell;

use crate::math::{Mat4, Quaternion, Vec3};

/// Describes an entity's position, rotation, and scale and produces the
/// corresponding model matrix on demand.
///
/// Rotation is stored canonically as a unit [`Quaternion`]; the Euler-angle
/// accessors are lossy convenience views. The model matrix is composed in
/// `Translation * Rotation * Scale` order and cached behind a dirty flag:
/// every mutator invalidates the cache and [`Transform::model_matrix`]
/// recomputes at most once per mutation, however often it is called.
///
/// The cache lives in [`Cell`]s so reads take `&self`, mirroring the fact
/// that callers treat matrix access as a pure query. That also makes the
/// type `!Sync`: a `Transform` belongs to one owner per frame and is not
/// meant to be shared across threads.
///
/// Scale components are not validated; a zero component is accepted and
/// produces a singular model matrix whose inverse is non-finite.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Quaternion,
    scale: Vec3,
    cached_model: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for Transform {
    /// Returns the identity transform: origin position, identity rotation,
    /// unit scale.
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
            cached_model: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform from explicit position, rotation, and scale.
    pub fn from_parts(position: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            cached_model: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }

    // --- Matrix access ---

    /// Returns the local-to-world model matrix.
    ///
    /// Recomputes `T * R * S` only when a mutator ran since the last call;
    /// otherwise this is a plain copy out of the cache.
    pub fn model_matrix(&self) -> Mat4 {
        if self.dirty.get() {
            let model = Mat4::from_translation(self.position)
                * Mat4::from_quat(self.rotation)
                * Mat4::from_scale(self.scale);
            self.cached_model.set(model);
            self.dirty.set(false);
        }
        self.cached_model.get()
    }

    /// Returns the inverse of the model matrix.
    ///
    /// Recomputed on every call; this is not a hot path. A singular model
    /// matrix (e.g. a zero scale component) yields non-finite components,
    /// which is the accepted degenerate-input behavior of this crate.
    pub fn inverse_model_matrix(&self) -> Mat4 {
        self.model_matrix().inverse()
    }

    // --- Property accessors ---

    /// Returns the current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the current rotation as a quaternion.
    #[inline]
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// Returns the current rotation as pitch/yaw/roll Euler angles in
    /// degrees. This is a lossy view of the canonical quaternion.
    #[inline]
    pub fn rotation_euler_degrees(&self) -> Vec3 {
        self.rotation.to_euler_degrees()
    }

    /// Returns the current per-axis scale factors.
    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    // --- Setters ---

    /// Sets the position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty.set(true);
    }

    /// Sets the rotation from a quaternion.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.dirty.set(true);
    }

    /// Sets the rotation from pitch/yaw/roll Euler angles in degrees.
    pub fn set_rotation_euler_degrees(&mut self, euler_degrees: Vec3) {
        self.rotation = Quaternion::from_euler_degrees(euler_degrees);
        self.dirty.set(true);
    }

    /// Sets the per-axis scale factors. Zero or negative components are
    /// accepted; see the type-level documentation.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty.set(true);
    }

    /// Orients the transform to look at `target` with the given up
    /// reference.
    ///
    /// Degenerate when `target` equals the current position (the look
    /// direction is undefined); the caller must avoid that case.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let direction = (target - self.position).normalize();
        self.rotation = Quaternion::look_rotation(direction, up);
        self.dirty.set(true);
    }

    // --- Relative transformations ---

    /// Moves the transform by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty.set(true);
    }

    /// Applies a relative rotation given as pitch/yaw/roll deltas in
    /// degrees.
    pub fn rotate_euler_degrees(&mut self, euler_delta_degrees: Vec3) {
        self.rotate(Quaternion::from_euler_degrees(euler_delta_degrees));
    }

    /// Applies a relative rotation.
    ///
    /// The delta is right-multiplied (`rotation = rotation * delta`), i.e.
    /// applied in local/object space. Left-multiplying would apply the
    /// delta in world space instead; the ordering here is load-bearing.
    pub fn rotate(&mut self, delta: Quaternion) {
        self.rotation = self.rotation * delta;
        self.dirty.set(true);
    }

    /// Applies a relative rotation of `angle_degrees` around `axis`.
    /// The axis is normalized internally.
    pub fn rotate_around_axis(&mut self, axis: Vec3, angle_degrees: f32) {
        self.rotate(Quaternion::from_axis_angle(
            axis,
            crate::math::degrees_to_radians(angle_degrees),
        ));
    }

    /// Spherically interpolates the rotation towards `target`.
    ///
    /// `t` is not clamped: values outside `[0, 1]` extrapolate past the
    /// endpoints. The interpolated rotation is renormalized by the slerp
    /// itself, so the stored rotation stays unit length.
    pub fn slerp_rotation(&mut self, target: Quaternion, t: f32) {
        self.rotation = Quaternion::slerp(self.rotation, target, t);
        self.dirty.set(true);
    }

    /// Multiplies the scale component-wise by `factor`.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.dirty.set(true);
    }

    /// Multiplies all scale components by a uniform `factor`.
    pub fn scale_by_uniform(&mut self, factor: f32) {
        self.scale_by(Vec3::new(factor, factor, factor));
    }

    // --- Directional vectors ---

    /// Returns the world-space forward direction (local −Z rotated by the
    /// current rotation). Always unit length.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Returns the world-space right direction (local +X). Always unit
    /// length.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the world-space up direction (local +Y). Always unit length.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
