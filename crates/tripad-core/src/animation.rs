#![forbid(unsafe_code)]

//! Time-bounded, cancelable value interpolation.
//!
//! Animations here are sampled, not driven: the host calls
//! [`Animator::value_at`] (or a wrapper such as the scroll coordinator's
//! `tick`) with a monotonic timestamp from its own clock. Nothing spawns
//! threads or timers, so replaying the same timestamps produces the same
//! values.
//!
//! # Invariants
//! 1. `Easing::apply(0) == 0` and `Easing::apply(1) == 1` for every curve, and
//!    the result stays within `[0, 1]` for inputs in `[0, 1]`.
//! 2. A running [`Tween`] never yields a value outside `[min(from, to), max(from, to)]`.
//! 3. Once `now >= started_at + duration`, the tween reports `to` and stops.

use std::time::Duration;

/// Easing curve applied to normalized progress `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    OutCubic,
}

impl Easing {
    /// Map linear progress to eased progress. Input is clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Animation handle contract consumed by the scroll coordinator.
///
/// Implementations interpolate a single `f32` from `from` to `to`.
pub trait Animator {
    /// Start a new animation, replacing any in flight.
    fn start(&mut self, from: f32, to: f32, duration: Duration, now: Duration);

    /// Stop the animation where it is.
    fn stop(&mut self);

    /// Value at `now`, or `None` if nothing is running.
    fn value_at(&self, now: Duration) -> Option<f32>;

    /// Destination of the running animation.
    fn target(&self) -> Option<f32>;

    fn is_running(&self) -> bool;

    /// Whether a running animation has reached its end at `now`.
    fn is_finished_at(&self, now: Duration) -> bool;
}

/// Eased interpolation between two values over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    easing: Easing,
    from: f32,
    to: f32,
    started_at: Duration,
    duration: Duration,
    running: bool,
}

impl Tween {
    #[must_use]
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            from: 0.0,
            to: 0.0,
            started_at: Duration::ZERO,
            duration: Duration::ZERO,
            running: false,
        }
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Normalized linear progress at `now` (clamped to `[0, 1]`).
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

impl Animator for Tween {
    fn start(&mut self, from: f32, to: f32, duration: Duration, now: Duration) {
        self.from = from;
        self.to = to;
        self.started_at = now;
        self.duration = duration;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn value_at(&self, now: Duration) -> Option<f32> {
        if !self.running {
            return None;
        }
        let eased = self.easing.apply(self.progress(now));
        Some(self.from + (self.to - self.from) * eased)
    }

    fn target(&self) -> Option<f32> {
        self.running.then_some(self.to)
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_finished_at(&self, now: Duration) -> bool {
        self.running && self.progress(now) >= 1.0
    }
}
