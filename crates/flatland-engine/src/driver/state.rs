use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::FrameStats;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    /// Setup has not completed.
    Idle,
    /// Ticking once per display refresh.
    Running,
    /// Terminal. No further ticks run.
    Stopped,
}

/// Cloneable request to stop a [`FrameDriver`].
///
/// The request is observed at the start of the next tick; an in-flight tick
/// always completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    stop: StopHandle,
    frames: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            stop: StopHandle::new(),
            frames: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Completed ticks so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Idle → Running. Happens at most once; returns whether it did.
    pub fn start(&mut self) -> bool {
        if self.state != DriverState::Idle {
            return false;
        }
        self.state = DriverState::Running;
        log::info!("frame driver running");
        self.poll();
        true
    }

    /// Moves to Stopped from any state.
    pub fn stop(&mut self) {
        self.stop.request_stop();
        self.poll();
        if self.state == DriverState::Idle {
            self.state = DriverState::Stopped;
            log::info!("frame driver stopped before start");
        }
    }

    /// Applies a pending stop request. Returns the resulting state.
    pub fn poll(&mut self) -> DriverState {
        if self.state == DriverState::Running && self.stop.is_stop_requested() {
            self.state = DriverState::Stopped;
            log::info!("frame driver stopped after {} frames", self.frames);
        }
        self.state
    }

    /// Records one completed tick and returns its statistics.
    pub fn finish_tick(&mut self, draw_calls: usize, instances: u32) -> FrameStats {
        let stats = FrameStats {
            frame_index: self.frames,
            draw_calls,
            instances,
        };
        self.frames += 1;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_runs_once() {
        let mut d = FrameDriver::new();
        assert_eq!(d.state(), DriverState::Idle);
        assert!(!d.is_running());

        assert!(d.start());
        assert!(d.is_running());
        assert!(!d.start());
    }

    #[test]
    fn stop_request_is_observed_on_poll() {
        let mut d = FrameDriver::new();
        d.start();

        let handle = d.stop_handle();
        handle.clone().request_stop();
        assert!(handle.is_stop_requested());
        assert!(d.is_running());

        assert_eq!(d.poll(), DriverState::Stopped);
        assert!(!d.start());
    }

    #[test]
    fn stop_before_start_is_terminal() {
        let mut d = FrameDriver::new();
        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
        assert!(!d.start());
    }

    #[test]
    fn request_while_idle_stops_right_after_start() {
        let mut d = FrameDriver::new();
        d.stop_handle().request_stop();
        assert_eq!(d.poll(), DriverState::Idle);

        assert!(d.start());
        assert_eq!(d.state(), DriverState::Stopped);
    }

    #[test]
    fn frame_indices_are_sequential() {
        let mut d = FrameDriver::new();
        d.start();

        let a = d.finish_tick(0, 0);
        let b = d.finish_tick(3, 7);
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert_eq!(b.draw_calls, 3);
        assert_eq!(d.frames(), 2);
    }
}
