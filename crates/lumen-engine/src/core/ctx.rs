use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Current drawable size in physical pixels.
    pub fn drawable_size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    /// Seconds since the previous frame was drawn.
    pub fn time_since_last_draw(&self) -> f32 {
        self.time.time_since_last_draw
    }
}
