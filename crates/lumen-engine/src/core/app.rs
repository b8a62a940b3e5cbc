use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives.
///
/// The runtime redraws continuously while the window is visible and calls
/// [`App::on_frame`] once per redraw. Everything here runs on the event-loop thread.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// The drawable changed size. The surface has already been reconfigured.
    fn drawable_size_will_change(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let _ = (gpu, size);
    }

    /// Draw now.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// `true` when frames stop (window occluded or app suspended), `false` when they resume.
    fn will_pause(&mut self, paused: bool) {
        let _ = paused;
    }
}
