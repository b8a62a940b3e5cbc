//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the window, drives redraws, and reports drawable
//! size changes and pause/resume transitions to the [`App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
