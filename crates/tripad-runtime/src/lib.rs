#![forbid(unsafe_code)]

//! Host-side runtime for tripad shells.
//!
//! The runtime owns the [`NavEngine`](tripad_nav::NavEngine), queues host
//! input, and hands navigation outcomes and unclaimed input to the active
//! [`Screen`]. It has no I/O of its own: a host (terminal, device firmware,
//! test harness) supplies events and monotonic timestamps.

pub mod runner;

pub use runner::{Screen, ScreenCmd, ShellRunner, StepResult};
