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

//! A camera combining a [`Transform`] with projection parameters.

use std::cell::Cell;

use log::trace;

use crate::math::{degrees_to_radians, Mat4, Quaternion, Vec2, Vec3, Vec4};
use crate::scene::Transform;

/// Defines how the camera projects eye space into clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// Perspective projection with a vertical field of view.
    Perspective,
    /// Orthographic projection sized by [`Camera::set_orthographic_size`].
    Orthographic,
}

/// A camera producing cached view and projection matrices plus screen-space
/// utilities.
///
/// The camera exclusively owns its [`Transform`] (composition, never
/// shared). View and projection carry independent dirty flags because they
/// change at different rates: the view on every transform mutation, the
/// projection only when a parameter changes. Reading either matrix always
/// returns a value consistent with the current state; staleness is never
/// observable.
///
/// Like [`Transform`], the matrix caches live in [`Cell`]s, so the type is
/// `!Sync` and expects a single owner per frame.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,

    projection_type: ProjectionType,
    /// Vertical field of view in degrees (perspective only).
    fov_degrees: f32,
    near_plane: f32,
    far_plane: f32,
    aspect_ratio: f32,
    /// Half-height of the orthographic view volume.
    orthographic_size: f32,

    cached_view: Cell<Mat4>,
    view_dirty: Cell<bool>,
    cached_projection: Cell<Mat4>,
    projection_dirty: Cell<bool>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Creates a camera with default settings: perspective projection,
    /// 45° vertical FOV, 16:9 aspect ratio, near plane 0.1, far plane 100.
    pub fn new() -> Self {
        let camera = Self::build(45.0, 16.0 / 9.0, 0.1, 100.0);
        trace!(
            "Camera created with default settings (FOV: {}, Aspect: {:.2})",
            camera.fov_degrees,
            camera.aspect_ratio
        );
        camera
    }

    /// Creates a perspective camera with explicit parameters.
    ///
    /// `fov_degrees` is the vertical field of view.
    pub fn with_perspective(
        fov_degrees: f32,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Self {
        let camera = Self::build(fov_degrees, aspect_ratio, near_plane, far_plane);
        trace!(
            "Camera created with custom settings (FOV: {}, Aspect: {:.2}, Near: {}, Far: {})",
            fov_degrees,
            aspect_ratio,
            near_plane,
            far_plane
        );
        camera
    }

    fn build(fov_degrees: f32, aspect_ratio: f32, near_plane: f32, far_plane: f32) -> Self {
        Self {
            transform: Transform::new(),
            projection_type: ProjectionType::Perspective,
            fov_degrees,
            near_plane,
            far_plane,
            aspect_ratio,
            orthographic_size: 10.0,
            cached_view: Cell::new(Mat4::IDENTITY),
            view_dirty: Cell::new(true),
            cached_projection: Cell::new(Mat4::IDENTITY),
            projection_dirty: Cell::new(true),
        }
    }

    // --- Transform access ---

    /// Returns the camera's transform.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns a mutable reference to the camera's transform.
    ///
    /// The view cache is invalidated at borrow time since any mutation
    /// through the returned reference would stale it.
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.view_dirty.set(true);
        &mut self.transform
    }

    // --- Position controls ---

    /// Sets the camera position.
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
        self.view_dirty.set(true);
    }

    /// Returns the camera position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    /// Moves the camera by `offset`.
    pub fn move_by(&mut self, offset: Vec3) {
        self.transform.translate(offset);
        self.view_dirty.set(true);
    }

    // --- Rotation controls ---

    /// Sets the camera rotation from a quaternion.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.set_rotation(rotation);
        self.view_dirty.set(true);
    }

    /// Sets the camera rotation from pitch/yaw/roll Euler angles in
    /// degrees.
    pub fn set_rotation_euler_degrees(&mut self, euler_degrees: Vec3) {
        self.transform.set_rotation_euler_degrees(euler_degrees);
        self.view_dirty.set(true);
    }

    /// Returns the camera rotation as a quaternion.
    #[inline]
    pub fn rotation(&self) -> Quaternion {
        self.transform.rotation()
    }

    /// Returns the camera rotation as pitch/yaw/roll Euler angles in
    /// degrees.
    #[inline]
    pub fn rotation_euler_degrees(&self) -> Vec3 {
        self.transform.rotation_euler_degrees()
    }

    /// Rotates the camera by pitch/yaw/roll deltas in degrees, applied in
    /// local space through the transform's composition rule.
    pub fn rotate_euler_degrees(&mut self, euler_delta_degrees: Vec3) {
        self.transform.rotate_euler_degrees(euler_delta_degrees);
        self.view_dirty.set(true);
    }

    /// Orients the camera to look at `target` with the given up reference.
    /// Degenerate when `target` equals the camera position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.transform.look_at(target, up);
        self.view_dirty.set(true);
    }

    // --- Direction vectors ---

    /// Returns the camera's forward direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Returns the camera's right direction.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    /// Returns the camera's up direction.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    // --- Projection settings ---

    /// Sets the projection type. Marks the projection dirty only on an
    /// actual change.
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        if self.projection_type != projection_type {
            self.projection_type = projection_type;
            self.projection_dirty.set(true);
            trace!("Camera projection type changed to {projection_type:?}");
        }
    }

    /// Returns the projection type.
    #[inline]
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Sets the vertical field of view in degrees (perspective only).
    pub fn set_field_of_view(&mut self, fov_degrees: f32) {
        if self.fov_degrees != fov_degrees {
            self.fov_degrees = fov_degrees;
            self.projection_dirty.set(true);
            trace!("Camera FOV changed to {fov_degrees}");
        }
    }

    /// Returns the vertical field of view in degrees.
    #[inline]
    pub fn field_of_view(&self) -> f32 {
        self.fov_degrees
    }

    /// Sets the aspect ratio (width / height).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if self.aspect_ratio != aspect_ratio {
            self.aspect_ratio = aspect_ratio;
            self.projection_dirty.set(true);
            trace!("Camera aspect ratio changed to {aspect_ratio:.2}");
        }
    }

    /// Returns the aspect ratio.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Sets the near and far clipping plane distances.
    pub fn set_clipping_planes(&mut self, near_plane: f32, far_plane: f32) {
        if self.near_plane != near_plane || self.far_plane != far_plane {
            self.near_plane = near_plane;
            self.far_plane = far_plane;
            self.projection_dirty.set(true);
            trace!("Camera clipping planes changed (Near: {near_plane}, Far: {far_plane})");
        }
    }

    /// Returns the near clipping plane distance.
    #[inline]
    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    /// Returns the far clipping plane distance.
    #[inline]
    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Sets the orthographic half-height.
    ///
    /// The value is always stored, but the projection cache is only marked
    /// dirty while the camera is in orthographic mode: a perspective
    /// projection is served from cache and does not depend on this value.
    /// Switching to orthographic later still recomputes, because
    /// [`Camera::set_projection_type`] dirties on any type change.
    pub fn set_orthographic_size(&mut self, size: f32) {
        if self.orthographic_size != size {
            self.orthographic_size = size;
            if self.projection_type == ProjectionType::Orthographic {
                self.projection_dirty.set(true);
                trace!("Camera orthographic size changed to {size}");
            }
        }
    }

    /// Returns the orthographic half-height.
    #[inline]
    pub fn orthographic_size(&self) -> f32 {
        self.orthographic_size
    }

    // --- Matrix access ---

    /// Returns the view matrix (world to eye space), recomputing it from
    /// the transform only if a mutation happened since the last read.
    pub fn view_matrix(&self) -> Mat4 {
        if self.view_dirty.get() {
            let position = self.transform.position();
            let view = Mat4::look_at_rh(position, position + self.transform.forward(), self.transform.up());
            self.cached_view.set(view);
            self.view_dirty.set(false);
        }
        self.cached_view.get()
    }

    /// Returns the projection matrix (eye to clip space), recomputing it
    /// only if a projection parameter changed since the last read.
    pub fn projection_matrix(&self) -> Mat4 {
        if self.projection_dirty.get() {
            let projection = match self.projection_type {
                ProjectionType::Perspective => Mat4::perspective_rh_gl(
                    degrees_to_radians(self.fov_degrees),
                    self.aspect_ratio,
                    self.near_plane,
                    self.far_plane,
                ),
                ProjectionType::Orthographic => {
                    let half_width = self.orthographic_size * self.aspect_ratio;
                    let half_height = self.orthographic_size;
                    Mat4::orthographic_rh_gl(
                        -half_width,
                        half_width,
                        -half_height,
                        half_height,
                        self.near_plane,
                        self.far_plane,
                    )
                }
            };
            self.cached_projection.set(projection);
            self.projection_dirty.set(false);
        }
        self.cached_projection.get()
    }

    /// Returns the combined view-projection matrix.
    ///
    /// Always recombined from the two cached factors; both are refreshed by
    /// their own accessors first, so no third cache is needed.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // --- Screen-space utilities ---

    /// Unprojects a point in normalized device coordinates into a
    /// world-space ray direction through the camera.
    ///
    /// The NDC point is placed on the near plane (clip z = −1), pulled back
    /// to eye space through the inverse projection, turned into a direction
    /// (z = −1, w = 0), and carried to world space through the inverse
    /// view. The result is unit length; a singular projection matrix makes
    /// it NaN.
    pub fn screen_to_world_ray(&self, screen_pos: Vec2) -> Vec3 {
        let clip = Vec4::new(screen_pos.x, screen_pos.y, -1.0, 1.0);

        let eye = self.projection_matrix().inverse() * clip;
        let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);

        let world = self.view_matrix().inverse() * eye;
        world.truncate().normalize()
    }

    /// Projects a world-space position into normalized device coordinates.
    ///
    /// Performs the perspective divide unless `w == 0`, the one numeric
    /// guard in this subsystem (a point on the camera plane has no defined
    /// screen position; skipping the divide avoids poisoning the result
    /// with a division by zero). The clip-space z/w are discarded.
    pub fn world_to_screen(&self, world_pos: Vec3) -> Vec2 {
        let mut clip = self.view_projection_matrix() * world_pos.extend(1.0);

        if clip.w != 0.0 {
            clip = clip * (1.0 / clip.w);
        }

        Vec2::new(clip.x, clip.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use approx::assert_relative_eq;

    fn mat4_approx_eq(a: Mat4, b: Mat4, epsilon: f32) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() <= epsilon)
    }

    #[test]
    fn test_default_parameters() {
        let camera = Camera::new();
        assert_eq!(camera.projection_type(), ProjectionType::Perspective);
        assert_eq!(camera.field_of_view(), 45.0);
        assert_eq!(camera.near_plane(), 0.1);
        assert_eq!(camera.far_plane(), 100.0);
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
    }

    #[test]
    fn test_view_matrix_identity_at_origin() {
        let camera = Camera::new();
        // At the origin looking down -Z, the view transform is the identity.
        assert!(mat4_approx_eq(camera.view_matrix(), Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn test_view_cache_tracks_transform_mutations() {
        let mut camera = Camera::new();
        let before = camera.view_matrix();

        camera.set_position(Vec3::new(0.0, 1.0, 5.0));
        let after_move = camera.view_matrix();
        assert_ne!(before, after_move);

        let expected = Mat4::look_at_rh(
            camera.position(),
            camera.position() + camera.forward(),
            camera.up(),
        );
        assert!(mat4_approx_eq(after_move, expected, EPSILON));

        camera.rotate_euler_degrees(Vec3::new(0.0, 30.0, 0.0));
        let expected = Mat4::look_at_rh(
            camera.position(),
            camera.position() + camera.forward(),
            camera.up(),
        );
        assert!(mat4_approx_eq(camera.view_matrix(), expected, EPSILON));
    }

    #[test]
    fn test_transform_mut_invalidates_view() {
        let mut camera = Camera::new();
        let before = camera.view_matrix();
        camera.transform_mut().set_position(Vec3::new(3.0, 0.0, 0.0));
        assert_ne!(camera.view_matrix(), before);
    }

    #[test]
    fn test_projection_cache_only_dirtied_on_change() {
        let mut camera = Camera::new();
        let before = camera.projection_matrix();

        // Setting identical values must not change the served matrix.
        camera.set_field_of_view(45.0);
        camera.set_aspect_ratio(16.0 / 9.0);
        camera.set_clipping_planes(0.1, 100.0);
        assert_eq!(camera.projection_matrix(), before);

        camera.set_field_of_view(60.0);
        let after = camera.projection_matrix();
        assert_ne!(after, before);
        let expected =
            Mat4::perspective_rh_gl(degrees_to_radians(60.0), 16.0 / 9.0, 0.1, 100.0);
        assert!(mat4_approx_eq(after, expected, EPSILON));
    }

    #[test]
    fn test_orthographic_size_deferred_until_mode_switch() {
        let mut camera = Camera::new();
        let perspective = camera.projection_matrix();

        // In perspective mode the orthographic size is stored but the
        // served projection stays untouched.
        camera.set_orthographic_size(5.0);
        assert_eq!(camera.projection_matrix(), perspective);
        assert_eq!(camera.orthographic_size(), 5.0);

        camera.set_projection_type(ProjectionType::Orthographic);
        let ortho = camera.projection_matrix();
        let half_width = 5.0 * camera.aspect_ratio();
        let expected =
            Mat4::orthographic_rh_gl(-half_width, half_width, -5.0, 5.0, 0.1, 100.0);
        assert!(mat4_approx_eq(ortho, expected, EPSILON));
    }

    #[test]
    fn test_orthographic_size_dirties_in_ortho_mode() {
        let mut camera = Camera::new();
        camera.set_projection_type(ProjectionType::Orthographic);
        let before = camera.projection_matrix();

        camera.set_orthographic_size(2.5);
        let after = camera.projection_matrix();
        assert_ne!(after, before);
    }

    #[test]
    fn test_world_to_screen_center() {
        let camera = Camera::with_perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
        // A point one unit straight ahead projects to the screen center.
        let ndc = camera.world_to_screen(Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(ndc.x, 0.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(ndc.y, 0.0, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_world_to_screen_skips_divide_at_w_zero() {
        let camera = Camera::new();
        // A direction-like point that lands on w == 0 must not produce NaN
        // from the divide; the raw clip x/y are returned instead.
        let ndc = camera.world_to_screen(camera.position());
        assert!(ndc.x.is_finite() && ndc.y.is_finite());
    }

    #[test]
    fn test_screen_center_ray_is_forward() {
        let camera = Camera::new();
        let ray = camera.screen_to_world_ray(Vec2::ZERO);
        let fwd = camera.forward();
        assert_relative_eq!(ray.length(), 1.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(ray.x, fwd.x, epsilon = 1e-4);
        assert_relative_eq!(ray.y, fwd.y, epsilon = 1e-4);
        assert_relative_eq!(ray.z, fwd.z, epsilon = 1e-4);
    }

    #[test]
    fn test_view_projection_recombines_fresh_factors() {
        let mut camera = Camera::new();
        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        camera.set_field_of_view(70.0);
        let vp = camera.view_projection_matrix();
        let expected = camera.projection_matrix() * camera.view_matrix();
        assert!(mat4_approx_eq(vp, expected, EPSILON));
    }
}
