//! In-flight frame pacing.
//!
//! Every node owns [`IN_FLIGHT_FRAMES`] uniform buffers. While the GPU reads the
//! buffers of frames `i-1` and `i-2`, the CPU writes those of frame `i`. The
//! [`FrameCoordinator`] hands out a [`FrameSlot`] only after the previous use of that
//! slot has completed, and the scene refuses to write or draw without one.

mod coordinator;
mod error;

pub use coordinator::{FrameCoordinator, FrameFence, FrameSlot};
pub use error::FrameError;

/// Number of frames that may be in flight on the GPU at once.
pub const IN_FLIGHT_FRAMES: usize = 3;
