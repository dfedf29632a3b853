#![forbid(unsafe_code)]

//! Raw input → navigation signals, plus platform focus ownership.
//!
//! The router is the only place that knows about physical keys. It maps key
//! presses through a [`KeyMap`] into the three [`NavSignal`]s and lets every
//! other event through untouched.
//!
//! While active, the router must hold the platform's input focus. It
//! re-claims focus as soon as it sees a `FocusLost` event or notices the host
//! no longer has focus while routing, and a low-frequency [`Every`] check in
//! [`InputRouter::tick`] covers focus that goes missing silently.
//!
//! # Invariants
//!
//! 1. Press and repeat of a mapped key yield exactly one signal.
//! 2. Release of a mapped key is swallowed, never passed through.
//! 3. An inactive router never claims focus.

use std::time::Duration;

use tripad_core::config::KeyMap;
use tripad_core::event::Event;
use tripad_core::signal::NavSignal;
use tripad_core::timer::Every;
use tripad_core::{debug, info};

/// Interval of the periodic focus re-assertion.
pub const FOCUS_RECLAIM_INTERVAL: Duration = Duration::from_secs(1);

/// Platform input focus, as seen by the router.
pub trait FocusHost {
    fn has_input_focus(&self) -> bool;
    fn claim_input_focus(&mut self);
}

/// Routing decision for one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Signal(NavSignal),
    /// Not navigation input; hand it to the focused control or screen.
    PassThrough,
    /// Consumed by the router.
    Swallowed,
}

/// Normalizes raw events and keeps platform focus.
#[derive(Debug)]
pub struct InputRouter<H> {
    keymap: KeyMap,
    host: H,
    reclaim: Option<Every>,
    reclaims: u64,
}

impl<H: FocusHost> InputRouter<H> {
    /// A stopped router. Call [`start`](Self::start) to begin owning focus.
    #[must_use]
    pub fn new(keymap: KeyMap, host: H) -> Self {
        Self {
            keymap,
            host,
            reclaim: None,
            reclaims: 0,
        }
    }

    /// Claim focus and arm the periodic check.
    pub fn start(&mut self, now: Duration) {
        self.reclaim = Some(Every::new(FOCUS_RECLAIM_INTERVAL, now));
        self.host.claim_input_focus();
        debug!("input router started");
    }

    /// Stop owning focus.
    pub fn stop(&mut self) {
        if self.reclaim.take().is_some() {
            debug!("input router stopped");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.reclaim.is_some()
    }

    /// Classify one raw event.
    pub fn route(&mut self, event: &Event) -> Route {
        let observed_loss = self.is_active() && !self.host.has_input_focus();
        if observed_loss {
            self.reclaim_focus("observed while routing");
        }
        match event {
            Event::Key(key) => match self.keymap.signal_for(key) {
                Some(signal) if key.is_press() => Route::Signal(signal),
                Some(_) => Route::Swallowed,
                None => Route::PassThrough,
            },
            Event::FocusLost => {
                // A loss already re-claimed above counts once.
                if self.is_active() && !observed_loss {
                    self.reclaim_focus("focus lost event");
                }
                Route::Swallowed
            }
            Event::FocusGained => Route::Swallowed,
            Event::Text(_) => Route::PassThrough,
        }
    }

    /// Run the periodic focus check. Returns whether focus was re-claimed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let due = self.reclaim.as_mut().is_some_and(|timer| timer.poll(now));
        if due && !self.host.has_input_focus() {
            self.reclaim_focus("periodic check");
            return true;
        }
        false
    }

    fn reclaim_focus(&mut self, reason: &'static str) {
        self.host.claim_input_focus();
        self.reclaims += 1;
        info!(reason, total = self.reclaims, "re-claimed input focus");
    }

    /// Times focus was re-claimed after `start`.
    #[must_use]
    pub fn reclaim_count(&self) -> u64 {
        self.reclaims
    }

    /// When the next periodic check fires, if active.
    #[must_use]
    pub fn next_check(&self) -> Option<Duration> {
        self.reclaim.as_ref().map(Every::next_due)
    }

    #[must_use]
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn set_keymap(&mut self, keymap: KeyMap) {
        self.keymap = keymap;
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
