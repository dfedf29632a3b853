#![forbid(unsafe_code)]

//! Logical navigation signals derived from raw key input.
//!
//! [`NavSignal`] represents the user's *intention* on a three-button device
//! rather than the physical key pressed. The router produces exactly these
//! three values; everything else stays a raw [`Event`](crate::event::Event).
//!
//! # Invariants
//! 1. Only `MoveUp` and `MoveDown` carry a [`Direction`].
//! 2. `Direction::Up.delta() == -1` and `Direction::Down.delta() == 1`, so
//!    adding the delta to a list index moves toward the top or bottom.

use std::fmt;

/// Vertical traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Signed index delta for this direction.
    #[must_use]
    pub const fn delta(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// One of the three logical inputs of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavSignal {
    MoveUp,
    MoveDown,
    Activate,
}

impl NavSignal {
    pub const ALL: [NavSignal; 3] = [NavSignal::MoveUp, NavSignal::MoveDown, NavSignal::Activate];

    /// Direction for the two movement signals, `None` for `Activate`.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveUp => Some(Direction::Up),
            Self::MoveDown => Some(Direction::Down),
            Self::Activate => None,
        }
    }

    /// Parse a signal name as used in keymap configuration.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" | "moveup" | "move_up" => Some(Self::MoveUp),
            "down" | "movedown" | "move_down" => Some(Self::MoveDown),
            "activate" | "enter" | "select" => Some(Self::Activate),
            _ => None,
        }
    }
}

impl From<Direction> for NavSignal {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::MoveUp,
            Direction::Down => Self::MoveDown,
        }
    }
}

impl fmt::Display for NavSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveUp => f.write_str("move-up"),
            Self::MoveDown => f.write_str("move-down"),
            Self::Activate => f.write_str("activate"),
        }
    }
}
