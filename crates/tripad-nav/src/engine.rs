#![forbid(unsafe_code)]

//! The navigation context object handed to screens.
//!
//! [`NavEngine`] bundles the [`InputRouter`] and the [`Navigator`]. The
//! application controller builds one, and screens receive it by `&mut`
//! whenever they need to rebuild the registry or switch input modes. There
//! is no global instance.

use std::rc::Rc;
use std::time::Duration;

use tripad_core::config::KeyMap;
use tripad_core::event::Event;
use tripad_core::reactive::Subscription;
use tripad_core::trace;

use crate::item::FocusableItem;
use crate::machine::{NavMode, NavOutcome, Navigator};
use crate::registry::{FocusEvent, FocusRegistry};
use crate::router::{FocusHost, InputRouter, Route};
use crate::scroll::ScrollViewport;

/// Result of feeding one raw event to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Navigated(NavOutcome),
    /// Not navigation input (or TextEdit is active); deliver to the screen.
    PassThrough(Event),
    Swallowed,
}

/// What a [`NavEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Platform focus was re-claimed by the periodic check.
    pub reclaimed: bool,
    /// A scroll animation is still running.
    pub animating: bool,
}

/// Router plus state machine.
#[derive(Debug)]
pub struct NavEngine<H> {
    router: InputRouter<H>,
    navigator: Navigator,
}

impl<H: FocusHost> NavEngine<H> {
    /// Build an engine and start routing at `now`.
    pub fn new(keymap: KeyMap, host: H, now: Duration) -> Self {
        let mut router = InputRouter::new(keymap, host);
        router.start(now);
        Self {
            router,
            navigator: Navigator::new(),
        }
    }

    /// Route one raw event and act on any navigation signal.
    pub fn handle_event(&mut self, event: &Event, now: Duration) -> Dispatch {
        match self.router.route(event) {
            Route::Signal(_) if self.navigator.mode() == NavMode::TextEdit => {
                trace!("text edit active, passing key through");
                Dispatch::PassThrough(event.clone())
            }
            Route::Signal(signal) => Dispatch::Navigated(self.navigator.handle(signal, now)),
            Route::PassThrough => Dispatch::PassThrough(event.clone()),
            Route::Swallowed => Dispatch::Swallowed,
        }
    }

    /// Advance timers and the scroll animation.
    pub fn tick(&mut self, now: Duration) -> TickReport {
        TickReport {
            reclaimed: self.router.tick(now),
            animating: self.navigator.tick(now),
        }
    }

    pub fn rebuild(
        &mut self,
        items: &[Rc<dyn FocusableItem>],
        viewport: Option<Rc<dyn ScrollViewport>>,
        now: Duration,
    ) {
        self.navigator.rebuild(items, viewport, now);
    }

    pub fn enter_slider_mode(&mut self) -> NavOutcome {
        self.navigator.enter_slider_mode()
    }

    pub fn enter_text_input_mode(&mut self) -> NavOutcome {
        self.navigator.enter_text_input_mode()
    }

    pub fn exit_special_mode(&mut self) -> NavOutcome {
        self.navigator.exit_special_mode()
    }

    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.navigator.mode()
    }

    pub fn subscribe_focus(&self, callback: impl Fn(&FocusEvent) + 'static) -> Subscription {
        self.navigator.subscribe_focus(callback)
    }

    pub fn subscribe_mode(&self, callback: impl Fn(&NavMode) + 'static) -> Subscription {
        self.navigator.subscribe_mode(callback)
    }

    #[must_use]
    pub fn registry(&self) -> &FocusRegistry {
        self.navigator.registry()
    }

    pub fn registry_mut(&mut self) -> &mut FocusRegistry {
        self.navigator.registry_mut()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    #[must_use]
    pub fn router(&self) -> &InputRouter<H> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut InputRouter<H> {
        &mut self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ActivateEffect, Capabilities};
    use crate::machine::IgnoreReason;
    use crate::router::FOCUS_RECLAIM_INTERVAL;
    use crate::testing::{ProbeHost, ProbeItem, ProbeViewport, dyn_items, stacked};
    use pretty_assertions::assert_eq;
    use tripad_core::event::{KeyCode, KeyEvent, KeyEventKind};

    const T0: Duration = Duration::ZERO;

    fn engine() -> (ProbeHost, NavEngine<ProbeHost>) {
        let host = ProbeHost::default();
        let engine = NavEngine::new(KeyMap::default(), host.clone(), T0);
        (host, engine)
    }

    #[test]
    fn arrow_keys_navigate() {
        let (_host, mut engine) = engine();
        let items = stacked(&[1, 2, 3]);
        engine.rebuild(&dyn_items(&items), None, T0);

        let d = engine.handle_event(&KeyCode::Down.into(), T0);
        assert_eq!(d, Dispatch::Navigated(NavOutcome::Moved { from: Some(0), to: 1 }));
        assert_eq!(engine.registry().current_id(), Some(2));
    }

    #[test]
    fn text_edit_passes_nav_keys_through() {
        let (_host, mut engine) = engine();
        let field = ProbeItem::new(1)
            .caps(Capabilities::ACTIVATE)
            .effect(ActivateEffect::EnterTextInput)
            .build();
        let other = ProbeItem::new(2).at(60.0, 50.0).build();
        engine.rebuild(&dyn_items(&[field.clone(), other.clone()]), None, T0);

        engine.handle_event(&KeyCode::Enter.into(), T0);
        assert_eq!(engine.mode(), NavMode::TextEdit);

        let down: Event = KeyCode::Down.into();
        assert_eq!(engine.handle_event(&down, T0), Dispatch::PassThrough(down.clone()));
        let enter: Event = KeyCode::Enter.into();
        assert_eq!(engine.handle_event(&enter, T0), Dispatch::PassThrough(enter.clone()));
        assert_eq!(engine.registry().current_index(), Some(0));
        assert_eq!(field.activations(), 1);
        assert!(field.is_active_item());
        assert!(!other.is_active_item());

        engine.exit_special_mode();
        assert!(matches!(
            engine.handle_event(&down, T0),
            Dispatch::Navigated(NavOutcome::Moved { to: 1, .. })
        ));
    }

    #[test]
    fn releases_are_swallowed() {
        let (_host, mut engine) = engine();
        let release = KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Release);
        assert_eq!(engine.handle_event(&release.into(), T0), Dispatch::Swallowed);
    }

    #[test]
    fn empty_engine_reports_ignored() {
        let (_host, mut engine) = engine();
        assert_eq!(
            engine.handle_event(&KeyCode::Up.into(), T0),
            Dispatch::Navigated(NavOutcome::Ignored(IgnoreReason::EmptyRegistry))
        );
    }

    #[test]
    fn tick_reports_reclaim_and_animation() {
        let (host, mut engine) = engine();
        let items = stacked(&[1, 2, 3, 4, 5]);
        let vp = ProbeViewport::at(250.0, 100.0, 0.0);
        engine.rebuild(&dyn_items(&items), Some(vp.clone()), T0);

        engine.handle_event(&KeyCode::Up.into(), T0);
        host.steal();
        let report = engine.tick(Duration::from_millis(100));
        assert_eq!(report, TickReport { reclaimed: false, animating: true });

        let report = engine.tick(FOCUS_RECLAIM_INTERVAL);
        assert_eq!(report, TickReport { reclaimed: true, animating: false });
        assert_eq!(vp.offset(), 150.0);
    }
}
