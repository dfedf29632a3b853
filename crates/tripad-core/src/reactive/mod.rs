#![forbid(unsafe_code)]

//! Change notification for the navigation engine.
//!
//! - [`Signal`]: a single-threaded broadcaster of events to subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next emission.
//! 3. A callback never observes an emission that started before it subscribed.

pub mod signal;

pub use signal::{Signal, Subscription};
