#![forbid(unsafe_code)]

//! Fixed-interval schedules driven by host timestamps.
//!
//! [`Every`] is a recurring timer for a step-based loop: the host calls
//! [`Every::poll`] with the current monotonic time on each step and the timer
//! reports whether the interval has elapsed. There is no background thread
//! and no busy wait; a step that arrives late fires once and reschedules from
//! that step, so a stalled host never sees a burst of catch-up firings.

use std::time::Duration;

/// Recurring timer with a fixed interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Every {
    interval: Duration,
    next_due: Duration,
    fired: u64,
}

impl Every {
    /// Schedule the first firing one `interval` after `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            next_due: now.saturating_add(interval),
            fired: 0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timestamp at which the next poll will fire.
    #[must_use]
    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Number of times the timer has fired.
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Fire at most once if the interval has elapsed.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        self.fired += 1;
        self.next_due = now.saturating_add(self.interval);
        true
    }

    /// Restart the interval from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.next_due = now.saturating_add(self.interval);
    }
}
