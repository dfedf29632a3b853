#![forbid(unsafe_code)]

//! Error types for the navigation engine.
//!
//! No error here is fatal. Callers log and continue; the engine's index and
//! mode are left exactly as they were before the failing operation.

use std::fmt;

use crate::item::ItemId;

/// Invalid focus reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusError {
    /// The id is not in the current registry.
    UnknownItem(ItemId),
    /// The id is registered but the owning screen dropped the item.
    ItemDropped(ItemId),
    /// A position outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for FocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "item {id} is not registered"),
            Self::ItemDropped(id) => write!(f, "item {id} was dropped by its owner"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "focus index {index} out of range for {len} items")
            }
        }
    }
}

impl std::error::Error for FocusError {}

/// Failure inside a control's capability callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The control does not implement this capability.
    Unsupported(&'static str),
    /// The control reported a failure.
    Failed(String),
    /// The callback panicked; the payload message is preserved.
    Panicked(String),
}

impl ItemError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(cap) => write!(f, "capability {cap} not supported"),
            Self::Failed(msg) => write!(f, "callback failed: {msg}"),
            Self::Panicked(msg) => write!(f, "callback panicked: {msg}"),
        }
    }
}

impl std::error::Error for ItemError {}
