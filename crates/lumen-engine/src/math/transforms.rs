//! Free functions building 4x4 transform and projection matrices.
//!
//! All results are column-major. Projections are left-handed (the camera looks down
//! `+z`). `ortho2d` maps depth to `[-1, 1]`; the `_oc` variants and `perspective_fov`
//! map depth to `[0, 1]`, which is what wgpu, Metal, D3D and Vulkan expect.

use super::mat4::{Mat4, Vec4};
use super::{MathError, Quaternion, Vec3};

pub const IDENTITY: Mat4 = Mat4::IDENTITY;

/// Exact degrees→radians factor.
pub const RADIANS_PER_DEGREE: f32 = std::f32::consts::PI / 180.0;

#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * RADIANS_PER_DEGREE
}

// ── affine ────────────────────────────────────────────────────────────────

pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, sz, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

#[inline]
pub fn scale_vec(s: Vec3) -> Mat4 {
    scale(s.x, s.y, s.z)
}

#[inline]
pub fn scale_uniform(s: f32) -> Mat4 {
    scale(s, s, s)
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(x, y, z, 1.0),
    )
}

#[inline]
pub fn translation_vec(t: Vec3) -> Mat4 {
    translation(t.x, t.y, t.z)
}

/// Rotation of `angle_degrees` around `axis`, built through [`Quaternion::rotation`].
pub fn rotation(angle_degrees: f32, axis: Vec3) -> Result<Mat4, MathError> {
    Ok(Quaternion::rotation(angle_degrees, axis)?.to_mat4())
}

#[inline]
pub fn rotation_xyz(angle_degrees: f32, x: f32, y: f32, z: f32) -> Result<Mat4, MathError> {
    rotation(angle_degrees, Vec3::new(x, y, z))
}

// ── projections ───────────────────────────────────────────────────────────

/// Orthographic projection with depth mapped to `[-1, 1]` (near → -1, far → 1).
pub fn ortho2d(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(right != left && top != bottom && far != near, "degenerate ortho volume");
    let sx = 1.0 / (right - left);
    let sy = 1.0 / (top - bottom);
    let sz = 1.0 / (far - near);

    Mat4::from_cols(
        Vec4::new(2.0 * sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 2.0 * sz, 0.0),
        Vec4::new(-(right + left) * sx, -(top + bottom) * sy, -(far + near) * sz, 1.0),
    )
}

/// [`ortho2d`] over the box spanning `origin..origin + size`.
#[inline]
pub fn ortho2d_from(origin: Vec3, size: Vec3) -> Mat4 {
    let far = origin + size;
    ortho2d(origin.x, far.x, origin.y, far.y, origin.z, far.z)
}

/// Orthographic projection with depth mapped to `[0, 1]` (near → 0, far → 1).
pub fn ortho2d_oc(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(right != left && top != bottom && far != near, "degenerate ortho volume");
    let sx = 1.0 / (right - left);
    let sy = 1.0 / (top - bottom);
    let sz = 1.0 / (far - near);

    Mat4::from_cols(
        Vec4::new(2.0 * sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, sz, 0.0),
        Vec4::new(-(right + left) * sx, -(top + bottom) * sy, -near * sz, 1.0),
    )
}

/// [`ortho2d_oc`] over the box spanning `origin..origin + size`.
#[inline]
pub fn ortho2d_oc_from(origin: Vec3, size: Vec3) -> Mat4 {
    let far = origin + size;
    ortho2d_oc(origin.x, far.x, origin.y, far.y, origin.z, far.z)
}

/// Off-axis perspective frustum with depth mapped to `[0, 1]`.
///
/// `left`/`right`/`bottom`/`top` are measured on the near plane.
pub fn frustum_oc(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(right != left && top != bottom, "degenerate frustum");
    debug_assert!(near > 0.0 && far > near, "frustum needs 0 < near < far");
    let sx = 1.0 / (right - left);
    let sy = 1.0 / (top - bottom);
    let sz = far / (far - near);
    let near2 = 2.0 * near;

    Mat4::from_cols(
        Vec4::new(near2 * sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, near2 * sy, 0.0, 0.0),
        Vec4::new(-(right + left) * sx, -(top + bottom) * sy, sz, 1.0),
        Vec4::new(0.0, 0.0, -near * sz, 0.0),
    )
}

/// Symmetric perspective projection with depth mapped to `[0, 1]`.
pub fn perspective_fov(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(aspect > 0.0, "aspect must be positive");
    debug_assert!(near > 0.0 && far > near, "perspective needs 0 < near < far");
    let y_scale = 1.0 / radians(0.5 * fov_y_degrees).tan();
    let x_scale = y_scale / aspect;
    let z_scale = far / (far - near);

    Mat4::from_cols(
        Vec4::new(x_scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y_scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z_scale, 1.0),
        Vec4::new(0.0, 0.0, -near * z_scale, 0.0),
    )
}

// ── view ──────────────────────────────────────────────────────────────────

/// Left-handed view matrix placing `eye` at the origin looking towards `target`.
///
/// Fails with `ZeroAxis` when `eye == target` or `up` is parallel to the view
/// direction, and with `NonFinite` when any input is NaN or infinite.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4, MathError> {
    if !(eye.is_finite() && target.is_finite() && up.is_finite()) {
        return Err(MathError::NonFinite);
    }
    let forward = (target - eye).try_direction()?;
    let right = up.cross(forward).try_direction()?;
    let up = forward.cross(right);

    Ok(Mat4::from_cols(
        Vec4::new(right.x, up.x, forward.x, 0.0),
        Vec4::new(right.y, up.y, forward.y, 0.0),
        Vec4::new(right.z, up.z, forward.z, 0.0),
        Vec4::new(-right.dot(eye), -up.dot(eye), -forward.dot(eye), 1.0),
    ))
}
