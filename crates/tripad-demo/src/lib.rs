#![forbid(unsafe_code)]

//! Terminal demo for tripad.
//!
//! A device settings page (toggles, sliders, a text field, buttons) driven
//! only by Up, Down, and Enter. The page is taller than its window, so
//! boundary scrolling and wrap-around are visible.

pub mod cli;
pub mod controls;
pub mod settings;
pub mod term;
