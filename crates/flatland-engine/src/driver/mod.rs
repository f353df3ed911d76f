//! Frame driver: the per-refresh tick schedule and its lifecycle.
//!
//! The driver itself is GPU-free; `render::Renderer` owns one and consults it
//! at the start and end of every tick.

mod state;
mod stats;

pub use state::{DriverState, FrameDriver, StopHandle};
pub use stats::{FrameStats, SkipReason, TickOutcome};
