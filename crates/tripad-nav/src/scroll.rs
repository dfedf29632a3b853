#![forbid(unsafe_code)]

//! Scroll coordination between focus traversal and a scrollable viewport.
//!
//! The coordinator never owns content. It reads the viewport's offset and
//! extents through [`ScrollViewport`], computes the smallest scroll that
//! reveals an item (or a fixed boundary step), and animates the offset toward
//! that target with an [`Animator`].
//!
//! # Design
//!
//! - **Effective offset**: new targets are computed from where the viewport
//!   is *heading* (the running animation's target), not where it is drawn
//!   right now. Two quick presses therefore compound instead of both
//!   computing from the same stale offset.
//! - **Cancel-and-replace**: a new command samples the in-flight animation at
//!   `now`, writes that value to the viewport, and starts the next animation
//!   from it. Motion never jumps back and never queues.
//!
//! # Invariants
//!
//! 1. Every offset written to the viewport lies in
//!    `[0, max(0, content_extent - viewport_extent)]`.
//! 2. At most one animation is in flight per coordinator.
//!
//! # Failure Modes
//!
//! - **Degenerate viewport** (content shorter than the window): every target
//!   clamps to `0`, so commands become no-ops.
//! - **Non-finite geometry**: offsets collapse to `0` via
//!   [`clamp_offset`].

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tripad_core::animation::{Animator, Easing, Tween};
use tripad_core::geometry::{Extent, clamp_offset, max_offset};
use tripad_core::signal::Direction;
use tripad_core::trace;

/// Length of every scroll animation.
pub const SCROLL_ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// Curve used by the default animator.
pub const SCROLL_EASING: Easing = Easing::OutCubic;

/// Distance of one boundary scroll step, in content units.
pub const BOUNDARY_SCROLL_STEP: f32 = 40.0;

/// Offsets closer than this are considered equal.
const OFFSET_EPSILON: f32 = 0.01;

/// A scrollable window onto taller content.
///
/// Viewports are shared between the screen that draws them and the
/// coordinator that moves them, so the setter takes `&self`.
pub trait ScrollViewport {
    fn content_offset(&self) -> f32;
    fn set_content_offset(&self, offset: f32);
    fn content_extent(&self) -> f32;
    fn viewport_extent(&self) -> f32;
}

/// Animates one viewport's offset toward focus targets.
pub struct ScrollCoordinator {
    viewport: Rc<dyn ScrollViewport>,
    animator: Box<dyn Animator>,
}

impl fmt::Debug for ScrollCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("offset", &self.viewport.content_offset())
            .field("target", &self.animator.target())
            .finish()
    }
}

impl ScrollCoordinator {
    /// Coordinator with the default out-cubic [`Tween`].
    #[must_use]
    pub fn new(viewport: Rc<dyn ScrollViewport>) -> Self {
        Self::with_animator(viewport, Box::new(Tween::new(SCROLL_EASING)))
    }

    #[must_use]
    pub fn with_animator(viewport: Rc<dyn ScrollViewport>, animator: Box<dyn Animator>) -> Self {
        Self { viewport, animator }
    }

    #[must_use]
    pub fn viewport(&self) -> &Rc<dyn ScrollViewport> {
        &self.viewport
    }

    /// Largest legal offset for the current geometry.
    #[must_use]
    pub fn max_offset(&self) -> f32 {
        max_offset(
            self.viewport.content_extent(),
            self.viewport.viewport_extent(),
        )
    }

    /// Where the viewport is heading: the animation target, else its offset.
    #[must_use]
    pub fn effective_offset(&self) -> f32 {
        self.animator
            .target()
            .unwrap_or_else(|| self.viewport.content_offset())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Whether the effective offset already sits at the limit in `direction`.
    #[must_use]
    pub fn at_extreme(&self, direction: Direction) -> bool {
        let offset = self.effective_offset();
        match direction {
            Direction::Up => offset <= OFFSET_EPSILON,
            Direction::Down => offset >= self.max_offset() - OFFSET_EPSILON,
        }
    }

    /// Target offset that reveals `extent`, if any scroll is needed.
    #[must_use]
    pub fn visible_target(&self, extent: Extent) -> Option<f32> {
        let offset = self.effective_offset();
        let window = self.viewport.viewport_extent();
        let target = if extent.start < offset {
            extent.start
        } else if extent.end() > offset + window {
            extent.end() - window
        } else {
            return None;
        };
        let target = self.clamp(target);
        ((target - offset).abs() > OFFSET_EPSILON).then_some(target)
    }

    /// Scroll the minimum distance that brings `extent` into view.
    ///
    /// Returns the new target, or `None` when the item is already visible.
    pub fn ensure_visible(&mut self, extent: Extent, now: Duration) -> Option<f32> {
        let target = self.visible_target(extent)?;
        trace!(start = extent.start, len = extent.len, target, "ensure_visible");
        self.animate_to(target, now);
        Some(target)
    }

    /// Scroll one [`BOUNDARY_SCROLL_STEP`] toward `direction`.
    ///
    /// Returns the new target, or `None` at the extreme.
    pub fn step_scroll(&mut self, direction: Direction, now: Duration) -> Option<f32> {
        let offset = self.effective_offset();
        let raw = match direction {
            Direction::Up => offset - BOUNDARY_SCROLL_STEP,
            Direction::Down => offset + BOUNDARY_SCROLL_STEP,
        };
        let target = self.clamp(raw);
        if (target - offset).abs() <= OFFSET_EPSILON {
            return None;
        }
        trace!(%direction, from = offset, target, "step_scroll");
        self.animate_to(target, now);
        Some(target)
    }

    /// Advance the animation. Returns whether it is still running.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(value) = self.animator.value_at(now) else {
            return false;
        };
        self.viewport.set_content_offset(self.clamp(value));
        if self.animator.is_finished_at(now) {
            self.animator.stop();
            return false;
        }
        true
    }

    /// Freeze any running animation at its value at `now`.
    pub fn stop(&mut self, now: Duration) {
        if let Some(value) = self.animator.value_at(now) {
            self.viewport.set_content_offset(self.clamp(value));
        }
        self.animator.stop();
    }

    fn animate_to(&mut self, target: f32, now: Duration) {
        // Cancel-and-replace from the sampled mid-flight offset.
        self.stop(now);
        let from = self.viewport.content_offset();
        self.animator
            .start(from, target, SCROLL_ANIMATION_DURATION, now);
    }

    fn clamp(&self, offset: f32) -> f32 {
        clamp_offset(
            offset,
            self.viewport.content_extent(),
            self.viewport.viewport_extent(),
        )
    }
}
