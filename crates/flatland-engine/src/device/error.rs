/// What the frame driver should do after failing to acquire a target image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; skip this tick and draw again on the next.
    Reconfigured,
    /// Transient error; skip this tick.
    SkipFrame,
    /// Unrecoverable (commonly OOM); stop driving frames.
    Fatal,
}
