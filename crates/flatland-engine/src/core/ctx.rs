use winit::window::Window;

use crate::coords::{LetterboxFit, Viewport};
use crate::render::Renderer;
use crate::time::FrameTime;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Renderer<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub renderer: &'a mut Renderer<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Drawable size this frame will be presented at.
    pub fn viewport(&self) -> Viewport {
        Viewport::from(self.window.inner_size())
    }

    /// How the World fits the current viewport.
    pub fn letterbox(&self) -> LetterboxFit {
        self.renderer.world().fit_scale(self.viewport())
    }
}
