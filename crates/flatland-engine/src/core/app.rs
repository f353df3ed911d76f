use anyhow::Result;
use winit::event::WindowEvent;

use crate::render::Renderer;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by scene authors.
pub trait App {
    /// Called once after the renderer is initialized, before the first frame.
    ///
    /// An error here ends the run and is returned from `Runtime::run`.
    fn on_start(&mut self, renderer: &mut Renderer<'_>) -> Result<()> {
        let _ = renderer;
        Ok(())
    }

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per tick, before the frame is drawn.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
