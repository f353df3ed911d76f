use std::time::{Duration, Instant};

/// Timing snapshot for one tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Sum of clamped `dt` since the clock started. Stalls do not jump it.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Index of this tick, starting at 0.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce a huge step for scene animation.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Number of ticks taken so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Resets the delta baseline (e.g. after the loop was suspended).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let ft = clock.tick_at(start + Duration::from_secs(10));
        assert!((ft.dt - 0.05).abs() < 1e-6);
        assert!((ft.elapsed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn elapsed_accumulates() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let start = clock.last;
        clock.tick_at(start + Duration::from_millis(100));
        let ft = clock.tick_at(start + Duration::from_millis(300));
        assert!((ft.dt - 0.2).abs() < 1e-6);
        assert!((ft.elapsed - 0.3).abs() < 1e-6);
    }
}
