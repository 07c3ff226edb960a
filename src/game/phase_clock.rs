//! Countdown for the current phase or turn.
//!
//! One tick is one second. The clock floors at zero and never resets itself: whoever
//! drives it must call `reset` after acting on expiry.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Running,
    Expired,
}

#[derive(Debug, Clone)]
pub struct PhaseClock {
    duration: u32,
    time_left: u32,
}

impl PhaseClock {
    pub fn new(duration: u32) -> Self {
        Self { duration, time_left: duration }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn state(&self) -> ClockState {
        if self.time_left == 0 { ClockState::Expired } else { ClockState::Running }
    }

    /// Decrement by one second. Ticking an expired clock leaves it at zero.
    pub fn tick(&mut self) -> ClockState {
        self.time_left = self.time_left.saturating_sub(1);
        self.state()
    }

    pub fn reset(&mut self) {
        self.time_left = self.duration;
    }
}

/// Format seconds as `m:ss` for the header timer.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
