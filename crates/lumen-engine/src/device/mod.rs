//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the narrow contracts the scene graph renders through (`GraphicsDevice`, `RenderEncoder`)
//! - creating the wgpu Instance/Adapter/Device/Queue and configuring the Surface
//! - acquiring frames and submitting them, returning the submission index that the
//!   frame coordinator waits on before a slot is reused

mod context;
mod contract;
mod error;
mod init;
mod surface;
mod wgpu_backend;

pub use context::{Gpu, GpuFrame};
pub use contract::{GraphicsDevice, RenderEncoder, UNIFORM_BUFFER_INDEX, VERTEX_BUFFER_INDEX};
pub use error::{DeviceError, SurfaceErrorAction};
pub use init::GpuInit;
pub use wgpu_backend::{GpuBuffer, WgpuDevice, WgpuFence};
