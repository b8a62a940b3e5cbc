use std::fmt;

/// Failures of the frame pacing loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// `begin_frame` was called while a slot was still checked out.
    FrameInProgress { slot: usize },
    /// A slot was handed back that this coordinator is not currently waiting for.
    ForeignSlot { slot: usize, frame: u64 },
    /// The completion signal for a slot can never arrive. Not retried.
    DeviceLost(String),
}

impl FrameError {
    /// `true` when the render loop cannot make further progress.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FrameError::DeviceLost(_))
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::FrameInProgress { slot } => {
                write!(f, "frame slot {slot} is still being recorded")
            }
            FrameError::ForeignSlot { slot, frame } => {
                write!(f, "frame slot {slot} (frame {frame}) was not issued for the current frame")
            }
            FrameError::DeviceLost(msg) => write!(f, "device lost while waiting for frame: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}
