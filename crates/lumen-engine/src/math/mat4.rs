use std::ops::{Mul, MulAssign};

use super::Vec3;

/// Homogeneous 4D vector; also the column type of [`Mat4`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Point in homogeneous coordinates (`w = 1`).
    #[inline]
    pub const fn point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    #[inline]
    pub fn dot(self, rhs: Vec4) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

/// Column-major 4x4 matrix.
///
/// `cols[3]` holds the translation of an affine transform. The memory layout matches
/// WGSL `mat4x4<f32>`, so [`Mat4::to_cols_array_2d`] can be uploaded as is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    /// Returns row `r` as a vector.
    #[inline]
    pub fn row(&self, r: usize) -> Vec4 {
        let [c0, c1, c2, c3] = self.cols.map(|c| c.to_array()[r]);
        Vec4::new(c0, c1, c2, c3)
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec4 {
        *self * Vec4::point(p)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().all(|c| c.is_finite())
    }

    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols.map(Vec4::to_array)
    }

    #[inline]
    pub fn from_cols_array_2d(cols: [[f32; 4]; 4]) -> Self {
        Self {
            cols: cols.map(|[x, y, z, w]| Vec4::new(x, y, z, w)),
        }
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4 {
            cols: rhs.cols.map(|c| self * c),
        }
    }
}

impl MulAssign for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        super::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .flat_map(|(a, b)| a.to_array().into_iter().zip(b.to_array()))
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

#[cfg(test)]
impl approx::RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        <f32 as approx::RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .flat_map(|(a, b)| a.to_array().into_iter().zip(b.to_array()))
            .all(|(a, b)| approx::RelativeEq::relative_eq(&a, &b, epsilon, max_relative))
    }
}
