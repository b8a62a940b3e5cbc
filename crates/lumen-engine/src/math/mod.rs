//! Math types for the scene graph.
//!
//! Conventions:
//! - matrices are column-major (`cols[c][r]`), vectors are columns, `M * v`
//! - angles are degrees at every public boundary; trig runs in radians internally
//! - clip space is left-handed; the `_oc` projections map depth to `[0, 1]`

mod error;
mod mat4;
mod quaternion;
mod transforms;
mod vec3;

pub use error::MathError;
pub use mat4::{Mat4, Vec4};
pub use quaternion::{ParseQuaternionError, Quaternion};
pub use transforms::{
    frustum_oc, look_at, ortho2d, ortho2d_from, ortho2d_oc, ortho2d_oc_from, perspective_fov,
    radians, rotation, rotation_xyz, scale, scale_uniform, scale_vec, translation,
    translation_vec, IDENTITY, RADIANS_PER_DEGREE,
};
pub use vec3::{Vec3, X_AXIS, Y_AXIS, Z_AXIS};

/// Tolerance used by the approximate comparisons in this module.
pub const EPSILON: f32 = 1e-5;
