#![forbid(unsafe_code)]

//! Focus navigation and scroll coordination for a three-button device.
//!
//! # Role in tripad
//! `tripad-nav` turns two directional signals and one activation signal into
//! deterministic traversal of an on-screen control set. It keeps exactly one
//! control focused, scrolls it into view, and switches input semantics for
//! controls that consume Up/Down themselves (sliders) or all input (text
//! fields).
//!
//! # Primary responsibilities
//! - **FocusableItem**: the capability contract controls implement.
//! - **ScrollCoordinator**: minimal animated scroll that reveals an item.
//! - **FocusRegistry**: ordered navigable set plus the single active index.
//! - **Navigator**: Normal / SliderAdjust / TextEdit state machine.
//! - **InputRouter**: raw key → signal mapping and platform focus ownership.
//! - **NavEngine**: the context object screens receive by `&mut`.
//!
//! # How it fits in the system
//! `tripad-core` supplies events, signals, geometry and timing primitives.
//! `tripad-runtime` owns a [`NavEngine`] and feeds it host events with
//! timestamps; screens rebuild the registry through it.
//!
//! ```
//! use std::time::Duration;
//! use tripad_core::config::KeyMap;
//! use tripad_core::event::KeyCode;
//! use tripad_nav::{FocusHost, NavEngine};
//!
//! struct Always;
//! impl FocusHost for Always {
//!     fn has_input_focus(&self) -> bool { true }
//!     fn claim_input_focus(&mut self) {}
//! }
//!
//! let mut engine = NavEngine::new(KeyMap::default(), Always, Duration::ZERO);
//! engine.rebuild(&[], None, Duration::ZERO);
//! let dispatch = engine.handle_event(&KeyCode::Down.into(), Duration::ZERO);
//! assert!(matches!(dispatch, tripad_nav::Dispatch::Navigated(o) if o.is_ignored()));
//! ```

pub mod engine;
pub mod error;
mod guard;
pub mod item;
pub mod machine;
pub mod registry;
pub mod router;
pub mod scroll;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use engine::{Dispatch, NavEngine, TickReport};
pub use error::{FocusError, ItemError};
pub use item::{ActivateEffect, Activation, Capabilities, FocusableItem, ItemId};
pub use machine::{IgnoreReason, NavMode, NavOutcome, Navigator};
pub use registry::{FocusEvent, FocusRegistry, FocusedItem};
pub use router::{FOCUS_RECLAIM_INTERVAL, FocusHost, InputRouter, Route};
pub use scroll::{
    BOUNDARY_SCROLL_STEP, SCROLL_ANIMATION_DURATION, SCROLL_EASING, ScrollCoordinator,
    ScrollViewport,
};
