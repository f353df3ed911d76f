//! Contract between the windowed runtime and the application.
//!
//! The application authors the scene; the runtime owns the window and the
//! renderer and calls back into the application around every frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
