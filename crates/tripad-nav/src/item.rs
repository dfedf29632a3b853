#![forbid(unsafe_code)]

//! The capability surface every on-screen control exposes to the engine.
//!
//! Controls are owned by their screen as `Rc<dyn FocusableItem>`; the
//! registry only keeps `Weak` handles. All trait methods take `&self`, so
//! controls keep their mutable state (active flag, value, text) in `Cell` or
//! `RefCell`.
//!
//! # Capabilities
//!
//! Optional callbacks are advertised through [`Capabilities`] and resolved
//! once, at registration, into an [`Activation`]. The engine never calls a
//! callback whose bit is not set; the default bodies return
//! [`ItemError::Unsupported`] for controls that forget to override one.

use bitflags::bitflags;
use tripad_core::geometry::Extent;

use crate::error::ItemError;

/// Stable identity of a control within a screen.
pub type ItemId = u64;

bitflags! {
    /// Optional callbacks a control implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const ACTIVATE        = 0b0000_0001;
        const TOGGLE          = 0b0000_0010;
        const CUSTOM_ACTIVATE = 0b0000_0100;
        const INCREASE        = 0b0000_1000;
        const DECREASE        = 0b0001_0000;

        /// Both value-adjust callbacks, as a slider has.
        const ADJUST = Self::INCREASE.bits() | Self::DECREASE.bits();
    }
}

/// How Activate is dispatched to a control, resolved at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Activatable,
    Toggleable,
    CustomAction,
    PlainNavigable,
}

impl Activation {
    /// First present of `activate`, `toggle`, `custom_activate`.
    #[must_use]
    pub fn resolve(caps: Capabilities) -> Self {
        if caps.contains(Capabilities::ACTIVATE) {
            Self::Activatable
        } else if caps.contains(Capabilities::TOGGLE) {
            Self::Toggleable
        } else if caps.contains(Capabilities::CUSTOM_ACTIVATE) {
            Self::CustomAction
        } else {
            Self::PlainNavigable
        }
    }

    /// Callback name, for logs.
    #[must_use]
    pub const fn callback_name(self) -> &'static str {
        match self {
            Self::Activatable => "activate",
            Self::Toggleable => "toggle",
            Self::CustomAction => "custom_activate",
            Self::PlainNavigable => "none",
        }
    }
}

/// What an activation asks the engine to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivateEffect {
    #[default]
    None,
    /// Route Up/Down to this control's value callbacks until the next Activate.
    EnterSliderMode,
    /// Hand raw input to this control until it relinquishes it.
    EnterTextInput,
}

/// Contract between the navigation engine and a control.
pub trait FocusableItem {
    fn id(&self) -> ItemId;

    /// Eligibility for traversal. Read at rebuild time only.
    fn navigable(&self) -> bool {
        true
    }

    fn is_active_item(&self) -> bool;

    /// Only the registry calls this.
    fn set_active_item(&self, active: bool);

    /// Vertical extent in the viewport's content coordinates.
    fn extent(&self) -> Extent;

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn activate(&self) -> Result<ActivateEffect, ItemError> {
        Err(ItemError::Unsupported("activate"))
    }

    fn toggle(&self) -> Result<ActivateEffect, ItemError> {
        Err(ItemError::Unsupported("toggle"))
    }

    fn custom_activate(&self) -> Result<ActivateEffect, ItemError> {
        Err(ItemError::Unsupported("custom_activate"))
    }

    fn increase_value(&self) -> Result<(), ItemError> {
        Err(ItemError::Unsupported("increase_value"))
    }

    fn decrease_value(&self) -> Result<(), ItemError> {
        Err(ItemError::Unsupported("decrease_value"))
    }

    /// Acquire platform input focus for this control.
    fn force_active_focus(&self) {}
}
