#![forbid(unsafe_code)]

//! Step-based shell runner.
//!
//! [`ShellRunner`] drives a [`NavEngine`] and the active [`Screen`] without
//! threads or blocking. The host delivers events with
//! [`push_event`](ShellRunner::push_event) and calls
//! [`step`](ShellRunner::step) from its own loop:
//!
//! ```text
//! host loop
//!   → push_event(Event)     // key presses, platform focus changes, text
//!   → step(now)             // route each event, let the screen react,
//!                           // apply its command, then tick timers
//!   → draw                  // host reads screen + viewport state
//! ```
//!
//! # Invariants
//!
//! 1. Events are processed one at a time in arrival order.
//! 2. A [`ScreenCmd`] returned for an event is applied before the next event
//!    is dequeued, so a rebuild is always complete before new input.
//! 3. After `ScreenCmd::Quit`, queued events are left unprocessed.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tripad_core::event::Event;
use tripad_core::{debug, debug_span, info};
use tripad_nav::{Dispatch, FocusHost, FocusableItem, NavEngine, NavOutcome, ScrollViewport};

/// What the runner should do after a screen reacts to an event.
pub enum ScreenCmd<H> {
    None,
    /// Re-read the screen's items and viewport.
    Rebuild,
    /// Switch to another screen and build its registry.
    Replace(Box<dyn Screen<H>>),
    Quit,
}

impl<H> fmt::Debug for ScreenCmd<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Rebuild => f.write_str("Rebuild"),
            Self::Replace(screen) => f.debug_tuple("Replace").field(&screen.name()).finish(),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// A page of controls.
///
/// Screens own their controls and viewport. They receive the engine by
/// `&mut` so controls can request mode changes.
pub trait Screen<H> {
    fn name(&self) -> &str;

    /// Controls in traversal order.
    fn items(&self) -> Vec<Rc<dyn FocusableItem>>;

    fn viewport(&self) -> Option<Rc<dyn ScrollViewport>> {
        None
    }

    /// React to a navigation outcome.
    fn on_outcome(&mut self, _outcome: &NavOutcome, _engine: &mut NavEngine<H>) -> ScreenCmd<H> {
        ScreenCmd::None
    }

    /// Offer a non-navigation event. `None` leaves it for the host.
    fn on_passthrough(
        &mut self,
        _event: &Event,
        _engine: &mut NavEngine<H>,
    ) -> Option<ScreenCmd<H>> {
        None
    }
}

/// Outcome of a single [`ShellRunner::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    pub events_processed: u32,
    /// Events that produced a navigation outcome.
    pub navigations: u32,
    /// Registry rebuilds, including screen replacements.
    pub rebuilds: u32,
    /// Platform focus was re-claimed by the periodic check.
    pub reclaimed: bool,
    /// A scroll animation is still running; step again soon.
    pub animating: bool,
    pub quit: bool,
}

/// Drives one engine and the active screen.
pub struct ShellRunner<H> {
    engine: NavEngine<H>,
    screen: Box<dyn Screen<H>>,
    queue: VecDeque<Event>,
    unhandled: Vec<Event>,
    running: bool,
}

impl<H: FocusHost> fmt::Debug for ShellRunner<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellRunner")
            .field("screen", &self.screen.name())
            .field("queued", &self.queue.len())
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl<H: FocusHost> ShellRunner<H> {
    /// Take ownership of `engine` and build `screen`'s registry at `now`.
    pub fn new(engine: NavEngine<H>, screen: Box<dyn Screen<H>>, now: Duration) -> Self {
        let mut runner = Self {
            engine,
            screen,
            queue: VecDeque::new(),
            unhandled: Vec::new(),
            running: true,
        };
        runner.rebuild(now);
        runner
    }

    /// Buffer an event for the next `step`.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.queue.extend(events);
    }

    /// Events waiting for the next `step`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process buffered events, then tick timers and animations.
    pub fn step(&mut self, now: Duration) -> StepResult {
        let mut result = StepResult::default();
        if !self.running {
            result.quit = true;
            return result;
        }
        let _span = debug_span!("step", queued = self.queue.len()).entered();

        while self.running {
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            self.process(event, now, &mut result);
            result.events_processed += 1;
        }

        if self.running {
            let report = self.engine.tick(now);
            result.reclaimed = report.reclaimed;
            result.animating = report.animating;
        }
        result.quit = !self.running;
        result
    }

    fn process(&mut self, event: Event, now: Duration, result: &mut StepResult) {
        let cmd = match self.engine.handle_event(&event, now) {
            Dispatch::Navigated(outcome) => {
                result.navigations += 1;
                self.screen.on_outcome(&outcome, &mut self.engine)
            }
            Dispatch::PassThrough(event) => {
                match self.screen.on_passthrough(&event, &mut self.engine) {
                    Some(cmd) => cmd,
                    None => {
                        self.unhandled.push(event);
                        ScreenCmd::None
                    }
                }
            }
            Dispatch::Swallowed => ScreenCmd::None,
        };
        self.apply(cmd, now, result);
    }

    fn apply(&mut self, cmd: ScreenCmd<H>, now: Duration, result: &mut StepResult) {
        match cmd {
            ScreenCmd::None => {}
            ScreenCmd::Rebuild => {
                self.rebuild(now);
                result.rebuilds += 1;
            }
            ScreenCmd::Replace(screen) => {
                info!(from = self.screen.name(), to = screen.name(), "screen replaced");
                self.screen = screen;
                self.rebuild(now);
                result.rebuilds += 1;
            }
            ScreenCmd::Quit => {
                info!(screen = self.screen.name(), dropped = self.queue.len(), "quit requested");
                self.running = false;
            }
        }
    }

    /// Rebuild the registry from the active screen.
    pub fn rebuild(&mut self, now: Duration) {
        let items = self.screen.items();
        let viewport = self.screen.viewport();
        debug!(screen = self.screen.name(), items = items.len(), "rebuilding");
        self.engine.rebuild(&items, viewport, now);
    }

    /// Take the events no screen consumed.
    pub fn drain_passthrough(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.unhandled)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn screen_name(&self) -> &str {
        self.screen.name()
    }

    #[must_use]
    pub fn screen(&self) -> &dyn Screen<H> {
        self.screen.as_ref()
    }

    #[must_use]
    pub fn engine(&self) -> &NavEngine<H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut NavEngine<H> {
        &mut self.engine
    }
}
