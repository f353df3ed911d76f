/// What one tick drew.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub draw_calls: usize,
    /// Sum of instance counts over all draws.
    pub instances: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// The window is minimized or has zero area.
    ZeroSize,
    /// The surface was lost or outdated and has been reconfigured.
    SurfaceReconfigured,
    /// The target image was not available in time.
    SurfaceUnavailable,
}

/// Result of `Renderer::tick`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    Presented(FrameStats),
    /// Nothing was drawn; the next tick retries.
    Skipped(SkipReason),
    /// The driver is stopped; the host should stop scheduling ticks.
    Stopped,
}

impl TickOutcome {
    #[inline]
    pub fn is_stopped(self) -> bool {
        matches!(self, TickOutcome::Stopped)
    }

    pub fn stats(self) -> Option<FrameStats> {
        match self {
            TickOutcome::Presented(stats) => Some(stats),
            _ => None,
        }
    }
}
