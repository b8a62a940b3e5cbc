//! Unit-quaternion rotations.
//!
//! A quaternion `(x, y, z, w)` stands for `w + xi + yj + zk`. Rotation quaternions are
//! unit length; [`Quaternion::rotation`] enforces this by normalizing the axis.

use std::fmt;
use std::ops::{Mul, MulAssign};
use std::str::FromStr;

use super::mat4::{Mat4, Vec4};
use super::transforms::radians;
use super::{MathError, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Scalar part.
    pub w: f32,
}

impl Quaternion {
    /// `1 + 0i + 0j + 0k`: no rotation.
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_degrees` around `axis`: `(axis * sin(θ/2), cos(θ/2))`.
    ///
    /// The axis is normalized first, so the result is unit length for any axis
    /// magnitude. A zero-length axis is `ZeroAxis`; a NaN or infinite angle or axis is
    /// `NonFinite`.
    pub fn rotation(angle_degrees: f32, axis: Vec3) -> Result<Self, MathError> {
        if !angle_degrees.is_finite() {
            return Err(MathError::NonFinite);
        }
        let axis = axis.try_direction()?;
        let (s, c) = (radians(angle_degrees) * 0.5).sin_cos();
        let q = Self::new(axis.x * s, axis.y * s, axis.z * s, c);
        if !q.is_finite() {
            return Err(MathError::NonFinite);
        }
        Ok(q)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    #[inline]
    pub fn norm_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn norm(self) -> f32 {
        self.norm_squared().sqrt()
    }

    /// Scales to unit length. Only an exactly zero quaternion falls back to identity.
    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            return Self::IDENTITY;
        }
        self * (1.0 / n)
    }

    /// Hamilton product `self * rhs`. Applied to a vector, `rhs` acts first.
    pub fn product(self, rhs: Quaternion) -> Self {
        let (p, q) = (self, rhs);
        Self {
            x: p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            y: p.w * q.y - p.x * q.z + p.y * q.w + p.z * q.x,
            z: p.w * q.z + p.x * q.y - p.y * q.x + p.z * q.w,
            w: p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
        }
    }

    /// Rotation matrix of a unit quaternion, embedded in the upper 3x3 of a 4x4.
    pub fn to_mat4(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        Mat4::from_cols(
            Vec4::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy), 0.0),
            Vec4::new(2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx), 0.0),
            Vec4::new(2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy), 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;
    #[inline]
    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.product(rhs)
    }
}

impl MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Quaternion) {
        *self = self.product(rhs);
    }
}

impl Mul<f32> for Quaternion {
    type Output = Quaternion;
    #[inline]
    fn mul(self, s: f32) -> Quaternion {
        Quaternion::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;
    #[inline]
    fn mul(self, q: Quaternion) -> Quaternion {
        q * self
    }
}

/// Writes `(x, y, z, w)`. Components use the shortest representation that parses
/// back to the same `f32`, so the output round-trips through [`FromStr`].
impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

/// Failure to parse the `(x, y, z, w)` text form.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseQuaternionError(pub String);

impl fmt::Display for ParseQuaternionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quaternion: {}", self.0)
    }
}

impl std::error::Error for ParseQuaternionError {}

impl FromStr for Quaternion {
    type Err = ParseQuaternionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseQuaternionError(format!("expected parentheses in {s:?}")))?;

        let mut parts = [0.0f32; 4];
        let mut count = 0;
        for token in inner.split(',') {
            if count == parts.len() {
                return Err(ParseQuaternionError(format!("too many components in {s:?}")));
            }
            parts[count] = token
                .trim()
                .parse()
                .map_err(|e| ParseQuaternionError(format!("{token:?}: {e}")))?;
            count += 1;
        }
        if count != parts.len() {
            return Err(ParseQuaternionError(format!("expected 4 components in {s:?}")));
        }

        let [x, y, z, w] = parts;
        Ok(Quaternion::new(x, y, z, w))
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        super::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
            && (self.w - other.w).abs() <= epsilon
    }
}

#[cfg(test)]
impl approx::RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        <f32 as approx::RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        let eq = |a: f32, b: f32| approx::RelativeEq::relative_eq(&a, &b, epsilon, max_relative);
        eq(self.x, other.x) && eq(self.y, other.y) && eq(self.z, other.z) && eq(self.w, other.w)
    }
}
