//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per drawn frame yields the
//! time since the previous draw.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
