#![forbid(unsafe_code)]

//! Navigation state machine: what Up, Down and Enter mean right now.
//!
//! ```text
//!            enter_slider_mode            Activate / exit_special_mode
//!   Normal ─────────────────────▶ SliderAdjust ─────────────────────▶ Normal
//!     │
//!     │ enter_text_input_mode                exit_special_mode
//!     └─────────────────────────▶ TextEdit ─────────────────────────▶ Normal
//! ```
//!
//! Transitions only start from `Normal`; a request to enter a special mode
//! from another special mode is logged and ignored.
//!
//! # Movement in Normal mode
//!
//! For direction `D` (−1 up, +1 down) over `n` items:
//!
//! 1. Empty registry: boundary scroll step if a viewport exists.
//! 2. `current + D` in range: focus it.
//! 3. At the boundary with a viewport not yet at its extreme: scroll one
//!    step, keep focus.
//! 4. Otherwise wrap to the opposite end.
//!
//! Wrapping is the last resort, so scrolling never strands focus off-screen.
//!
//! # Invariants
//!
//! 1. A failed or panicking callback leaves index and mode unchanged.
//! 2. `SliderAdjust` never moves focus or scrolls.
//! 3. Mode subscribers are notified once per actual transition.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tripad_core::reactive::{Signal, Subscription};
use tripad_core::signal::{Direction, NavSignal};
use tripad_core::{debug, debug_span, info};

use crate::error::FocusError;
use crate::guard;
use crate::item::{ActivateEffect, Activation, Capabilities, FocusableItem, ItemId};
use crate::registry::{FocusEvent, FocusRegistry};
use crate::scroll::ScrollViewport;

/// Input interpretation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavMode {
    #[default]
    Normal,
    SliderAdjust,
    TextEdit,
}

impl fmt::Display for NavMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::SliderAdjust => f.write_str("slider"),
            Self::TextEdit => f.write_str("text"),
        }
    }
}

/// Why a signal had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing registered and no viewport to scroll.
    EmptyRegistry,
    /// Registry populated but nothing focused.
    NoFocus,
    /// The focused control lacks the needed callback.
    MissingCapability(ItemId),
    /// The control's callback returned an error or panicked.
    CallbackFailed(ItemId),
    /// Focus could not be moved to the target item.
    InvalidReference(FocusError),
    /// Empty registry and the viewport is already at its limit.
    ScrollLimit,
    /// Directional and activation input belongs to the text control.
    TextEditActive,
    /// A special mode was requested while another one is active.
    ModeBusy(NavMode),
    /// `exit_special_mode` while already in Normal.
    AlreadyNormal,
}

/// What a navigation call did.
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// Focus moved to a neighbour.
    Moved { from: Option<usize>, to: usize },
    /// Focus wrapped to the opposite end.
    Wrapped { from: Option<usize>, to: usize },
    /// A boundary scroll step was issued instead of moving focus.
    Scrolled { direction: Direction, target: f32 },
    /// A slider value changed.
    Adjusted { id: ItemId, direction: Direction },
    /// An activation callback ran.
    Activated {
        id: ItemId,
        activation: Activation,
        effect: ActivateEffect,
    },
    ModeChanged { from: NavMode, to: NavMode },
    Ignored(IgnoreReason),
}

impl NavOutcome {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Interprets navigation signals against the focus registry.
#[derive(Debug, Default)]
pub struct Navigator {
    registry: FocusRegistry,
    mode: NavMode,
    mode_changes: Signal<NavMode>,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.mode
    }

    #[must_use]
    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FocusRegistry {
        &mut self.registry
    }

    /// Replace the registry contents. Any special mode ends first, since
    /// the control that owned it may be gone.
    pub fn rebuild(
        &mut self,
        items: &[Rc<dyn FocusableItem>],
        viewport: Option<Rc<dyn ScrollViewport>>,
        now: Duration,
    ) {
        if self.mode != NavMode::Normal {
            self.exit_special_mode();
        }
        self.registry.rebuild(items, viewport, now);
    }

    /// Dispatch one normalized signal.
    pub fn handle(&mut self, signal: NavSignal, now: Duration) -> NavOutcome {
        let _span = debug_span!("nav", %signal, mode = %self.mode).entered();
        let outcome = match (self.mode, signal) {
            (NavMode::TextEdit, _) => NavOutcome::Ignored(IgnoreReason::TextEditActive),
            (NavMode::SliderAdjust, NavSignal::Activate) => self.exit_special_mode(),
            (NavMode::SliderAdjust, NavSignal::MoveUp) => self.adjust(Direction::Up),
            (NavMode::SliderAdjust, NavSignal::MoveDown) => self.adjust(Direction::Down),
            (NavMode::Normal, NavSignal::Activate) => self.activate(),
            (NavMode::Normal, NavSignal::MoveUp) => self.move_focus(Direction::Up, now),
            (NavMode::Normal, NavSignal::MoveDown) => self.move_focus(Direction::Down, now),
        };
        debug!(?outcome, "handled");
        outcome
    }

    /// Apply the four-step movement rule in `direction`.
    pub fn move_focus(&mut self, direction: Direction, now: Duration) -> NavOutcome {
        let len = self.registry.len();
        if len == 0 {
            return match self.registry.scroll_mut() {
                Some(scroll) => match scroll.step_scroll(direction, now) {
                    Some(target) => NavOutcome::Scrolled { direction, target },
                    None => NavOutcome::Ignored(IgnoreReason::ScrollLimit),
                },
                None => NavOutcome::Ignored(IgnoreReason::EmptyRegistry),
            };
        }

        let from = self.registry.current_index();
        let next = from
            .map_or(-1, |i| i as isize)
            .saturating_add(direction.delta());
        if (0..len as isize).contains(&next) {
            let to = next as usize;
            return match self.registry.focus_at(to, now) {
                Ok(()) => NavOutcome::Moved { from, to },
                Err(err) => NavOutcome::Ignored(IgnoreReason::InvalidReference(err)),
            };
        }

        if let Some(scroll) = self.registry.scroll_mut() {
            if !scroll.at_extreme(direction) {
                if let Some(target) = scroll.step_scroll(direction, now) {
                    return NavOutcome::Scrolled { direction, target };
                }
            }
        }

        let to = match direction {
            Direction::Up => len - 1,
            Direction::Down => 0,
        };
        match self.registry.focus_at(to, now) {
            Ok(()) => NavOutcome::Wrapped { from, to },
            Err(err) => NavOutcome::Ignored(IgnoreReason::InvalidReference(err)),
        }
    }

    /// Normal-mode Activate on the focused control.
    fn activate(&mut self) -> NavOutcome {
        let Some(focused) = self.registry.focused() else {
            debug!("activate with nothing focused");
            return NavOutcome::Ignored(self.no_focus_reason());
        };
        let id = focused.id;
        let activation = focused.activation;
        let item = &focused.item;
        let result = match activation {
            Activation::Activatable => guard::invoke(id, "activate", || item.activate()),
            Activation::Toggleable => guard::invoke(id, "toggle", || item.toggle()),
            Activation::CustomAction => {
                guard::invoke(id, "custom_activate", || item.custom_activate())
            }
            Activation::PlainNavigable => {
                debug!(item = id, "item has no activation callback");
                return NavOutcome::Ignored(IgnoreReason::MissingCapability(id));
            }
        };
        let Ok(effect) = result else {
            return NavOutcome::Ignored(IgnoreReason::CallbackFailed(id));
        };

        match effect {
            ActivateEffect::None => {}
            ActivateEffect::EnterSliderMode => {
                self.enter_slider_mode();
            }
            ActivateEffect::EnterTextInput => {
                self.enter_text_input_mode();
            }
        }
        NavOutcome::Activated {
            id,
            activation,
            effect,
        }
    }

    /// SliderAdjust-mode Up/Down on the focused control.
    fn adjust(&mut self, direction: Direction) -> NavOutcome {
        let Some(focused) = self.registry.focused() else {
            debug!("slider adjust with nothing focused");
            return NavOutcome::Ignored(self.no_focus_reason());
        };
        let id = focused.id;
        let (needed, name) = match direction {
            Direction::Up => (Capabilities::INCREASE, "increase_value"),
            Direction::Down => (Capabilities::DECREASE, "decrease_value"),
        };
        if !focused.capabilities.contains(needed) {
            debug!(item = id, callback = name, "item cannot adjust its value");
            return NavOutcome::Ignored(IgnoreReason::MissingCapability(id));
        }
        let item = &focused.item;
        let result = guard::invoke(id, name, || match direction {
            Direction::Up => item.increase_value(),
            Direction::Down => item.decrease_value(),
        });
        match result {
            Ok(()) => NavOutcome::Adjusted { id, direction },
            Err(_) => NavOutcome::Ignored(IgnoreReason::CallbackFailed(id)),
        }
    }

    fn no_focus_reason(&self) -> IgnoreReason {
        if self.registry.is_empty() {
            IgnoreReason::EmptyRegistry
        } else {
            IgnoreReason::NoFocus
        }
    }

    pub fn enter_slider_mode(&mut self) -> NavOutcome {
        self.enter(NavMode::SliderAdjust)
    }

    pub fn enter_text_input_mode(&mut self) -> NavOutcome {
        self.enter(NavMode::TextEdit)
    }

    /// Return to Normal from any special mode.
    pub fn exit_special_mode(&mut self) -> NavOutcome {
        if self.mode == NavMode::Normal {
            debug!("exit_special_mode while already normal");
            return NavOutcome::Ignored(IgnoreReason::AlreadyNormal);
        }
        self.set_mode(NavMode::Normal)
    }

    fn enter(&mut self, to: NavMode) -> NavOutcome {
        if self.mode != NavMode::Normal {
            info!(current = %self.mode, requested = %to, "mode change refused");
            return NavOutcome::Ignored(IgnoreReason::ModeBusy(self.mode));
        }
        self.set_mode(to)
    }

    fn set_mode(&mut self, to: NavMode) -> NavOutcome {
        let from = self.mode;
        self.mode = to;
        debug!(%from, %to, "mode changed");
        self.mode_changes.emit(&to);
        NavOutcome::ModeChanged { from, to }
    }

    /// Register a mode-change callback.
    pub fn subscribe_mode(&self, callback: impl Fn(&NavMode) + 'static) -> Subscription {
        self.mode_changes.subscribe(callback)
    }

    /// Register a focus-change callback.
    pub fn subscribe_focus(&self, callback: impl Fn(&FocusEvent) + 'static) -> Subscription {
        self.registry.subscribe(callback)
    }

    /// Advance the scroll animation.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.registry.tick(now)
    }
}
