use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Buffer allocation failures reported by a [`GraphicsDevice`](super::GraphicsDevice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device was lost; nothing further can be allocated.
    Lost,
    /// The requested buffer exceeds what the device can allocate.
    AllocationFailed { label: String, size: u64, max: u64 },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Lost => write!(f, "graphics device lost"),
            DeviceError::AllocationFailed { label, size, max } => write!(
                f,
                "failed to allocate buffer {label:?}: {size} bytes exceeds device limit of {max}"
            ),
        }
    }
}

impl std::error::Error for DeviceError {}
