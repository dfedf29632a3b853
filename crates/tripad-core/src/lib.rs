#![forbid(unsafe_code)]

//! Core: input events, navigation signals, timing primitives, and configuration.
//!
//! # Role in tripad
//! `tripad-core` is the input layer. It owns the raw event types a host feeds
//! into the shell, the three logical [`NavSignal`](signal::NavSignal)s the
//! router normalizes them into, and the small timing primitives (easing,
//! tweens, periodic timers) that the navigation engine drives with
//! host-supplied timestamps.
//!
//! # Primary responsibilities
//! - **Event**: raw key and platform-focus events.
//! - **NavSignal**: `MoveUp`, `MoveDown`, `Activate`.
//! - **Geometry**: one-dimensional extents and scroll bounds.
//! - **Animation**: easing curves and a cancelable [`Tween`](animation::Tween).
//! - **Timer**: fixed-interval [`Every`](timer::Every) schedule.
//! - **Reactive**: [`Signal`](reactive::Signal) broadcasts with RAII subscriptions.
//! - **Config / logging**: environment-driven configuration and `tracing` setup.
//!
//! # How it fits in the system
//! `tripad-nav` consumes these types to implement focus traversal, and
//! `tripad-runtime` feeds host events and timestamps through it.

pub mod animation;
pub mod config;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod reactive;
pub mod signal;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{debug, debug_span, error, info, trace, warn};
