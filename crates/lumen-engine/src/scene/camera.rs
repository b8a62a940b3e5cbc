use crate::math::{self, Mat4, MathError, Vec3};

/// Supplies the view matrix for one frame.
pub trait ViewSource {
    fn view_matrix(&self) -> Mat4;
}

/// A bare matrix is its own view.
impl ViewSource for Mat4 {
    fn view_matrix(&self) -> Mat4 {
        *self
    }
}

/// Look-at camera. The view matrix is rebuilt on every change and degenerate
/// placements are refused, leaving the camera as it was.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    view: Mat4,
}

impl Camera {
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        Ok(Self {
            eye,
            target,
            up,
            view: math::look_at(eye, target, up)?,
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn set_eye(&mut self, eye: Vec3) -> Result<(), MathError> {
        *self = Self::look_at(eye, self.target, self.up)?;
        Ok(())
    }

    pub fn set_target(&mut self, target: Vec3) -> Result<(), MathError> {
        *self = Self::look_at(self.eye, target, self.up)?;
        Ok(())
    }
}

impl Default for Camera {
    /// At the origin looking down +z.
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: math::Z_AXIS,
            up: math::Y_AXIS,
            view: Mat4::IDENTITY,
        }
    }
}

impl ViewSource for Camera {
    fn view_matrix(&self) -> Mat4 {
        self.view
    }
}
