//! Lumen engine crate.
//!
//! A small 3-D scene graph rendered with wgpu: quaternion/matrix math, a node tree with
//! per-frame uniform rings, the in-flight frame pacing that keeps CPU writes off
//! buffers the GPU is still reading, and the winit runtime that drives it.

pub mod core;
pub mod device;
pub mod frame;
pub mod logging;
pub mod math;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;
