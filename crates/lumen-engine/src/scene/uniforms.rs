use bytemuck::{Pod, Zeroable};

use crate::math::Mat4;

/// Stride each node's uniform record is padded to.
///
/// Matches the common `min_uniform_buffer_offset_alignment`, so records can also be
/// packed back to back in one allocation.
pub const UNIFORM_ALIGNMENT: usize = 256;

/// Per-node, per-slot shader constants.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    /// `view_projection * world`, column-major.
    pub modelview_projection: [[f32; 4]; 4],
    _pad: [f32; 48],
}

const _: () = assert!(std::mem::size_of::<Uniforms>() == UNIFORM_ALIGNMENT);

impl Uniforms {
    pub const SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;

    pub fn new(modelview_projection: Mat4) -> Self {
        Self {
            modelview_projection: modelview_projection.to_cols_array_2d(),
            _pad: [0.0; 48],
        }
    }

    pub fn modelview_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(self.modelview_projection)
    }
}
