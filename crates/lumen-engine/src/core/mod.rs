//! Contract between the runtime loop and the application.
//!
//! The runtime owns the window and GPU; the application implements [`App`] and gets a
//! [`FrameCtx`] for every redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
