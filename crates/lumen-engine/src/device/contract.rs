use crate::scene::{Uniforms, Vertex};

use super::DeviceError;

/// Bind point of a node's vertex buffer.
pub const VERTEX_BUFFER_INDEX: u32 = 0;

/// Bind point of a node's per-frame uniform buffer.
pub const UNIFORM_BUFFER_INDEX: u32 = 0;

/// Resource handle the scene graph allocates its buffers from.
///
/// Buffers are opaque to the scene; it only hands them back to the same device for
/// writes and to a [`RenderEncoder`] for binding.
pub trait GraphicsDevice {
    type Buffer;

    /// Allocates an immutable GPU-visible buffer holding `vertices`.
    fn create_vertex_buffer(
        &self,
        label: &str,
        vertices: &[Vertex],
    ) -> Result<Self::Buffer, DeviceError>;

    /// Allocates a CPU-writable uniform buffer of `size` bytes.
    fn create_uniform_buffer(&self, label: &str, size: u64) -> Result<Self::Buffer, DeviceError>;

    /// Copies `uniforms` into `buffer`.
    ///
    /// Callers must have retired the GPU's previous use of `buffer` (see `frame`).
    fn write_uniforms(&self, buffer: &Self::Buffer, uniforms: &Uniforms);

    /// Returns `true` once the device can no longer allocate.
    fn is_lost(&self) -> bool {
        false
    }
}

/// Draw-call recording capability used by `Scene::render`.
pub trait RenderEncoder<B> {
    fn set_vertex_buffer(&mut self, index: u32, buffer: &B);
    fn set_uniform_buffer(&mut self, index: u32, buffer: &B);
    fn draw(&mut self, vertex_count: u32);
}
