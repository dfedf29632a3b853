//! End-to-end navigation scenarios through [`ShellRunner`].
//!
//! Each test builds a screen from probe controls, feeds raw key events the
//! way a host would, and checks focus, mode, scroll offset, and which
//! callbacks ran.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;
use tripad_core::config::KeyMap;
use tripad_core::event::{Event, KeyCode};
use tripad_nav::testing::{ProbeHost, ProbeItem, ProbeViewport, dyn_items, stacked};
use tripad_nav::{
    ActivateEffect, BOUNDARY_SCROLL_STEP, Capabilities, Dispatch, FOCUS_RECLAIM_INTERVAL,
    FocusError, FocusEvent, FocusHost, FocusableItem, IgnoreReason, NavEngine, NavMode,
    NavOutcome, SCROLL_ANIMATION_DURATION, ScrollViewport,
};
use tripad_runtime::{Screen, ScreenCmd, ShellRunner};

// ── Fixtures ──────────────────────────────────────────────────────────────

type Hook = Box<dyn FnMut(&NavOutcome, &mut NavEngine<ProbeHost>) -> ScreenCmd<ProbeHost>>;

struct ListScreen {
    name: &'static str,
    items: Vec<Rc<ProbeItem>>,
    viewport: Option<Rc<ProbeViewport>>,
    outcomes: Rc<RefCell<Vec<NavOutcome>>>,
    typed: Rc<RefCell<Vec<Event>>>,
    hook: Option<Hook>,
}

impl ListScreen {
    fn new(name: &'static str, items: Vec<Rc<ProbeItem>>) -> Self {
        Self {
            name,
            items,
            viewport: None,
            outcomes: Rc::default(),
            typed: Rc::default(),
            hook: None,
        }
    }

    fn with_viewport(mut self, viewport: Rc<ProbeViewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    fn with_hook(
        mut self,
        hook: impl FnMut(&NavOutcome, &mut NavEngine<ProbeHost>) -> ScreenCmd<ProbeHost> + 'static,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }
}

impl Screen<ProbeHost> for ListScreen {
    fn name(&self) -> &str {
        self.name
    }

    fn items(&self) -> Vec<Rc<dyn FocusableItem>> {
        dyn_items(&self.items)
    }

    fn viewport(&self) -> Option<Rc<dyn ScrollViewport>> {
        self.viewport
            .clone()
            .map(|vp| vp as Rc<dyn ScrollViewport>)
    }

    fn on_outcome(
        &mut self,
        outcome: &NavOutcome,
        engine: &mut NavEngine<ProbeHost>,
    ) -> ScreenCmd<ProbeHost> {
        self.outcomes.borrow_mut().push(outcome.clone());
        match self.hook.as_mut() {
            Some(hook) => hook(outcome, engine),
            None => ScreenCmd::None,
        }
    }

    /// Behaves like a focused text field: keeps raw input while TextEdit
    /// is active and relinquishes it on Escape.
    fn on_passthrough(
        &mut self,
        event: &Event,
        engine: &mut NavEngine<ProbeHost>,
    ) -> Option<ScreenCmd<ProbeHost>> {
        if engine.mode() != NavMode::TextEdit {
            return None;
        }
        self.typed.borrow_mut().push(event.clone());
        if *event == Event::from(KeyCode::Escape) {
            engine.exit_special_mode();
        }
        Some(ScreenCmd::None)
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn key(code: KeyCode) -> Event {
    Event::from(code)
}

fn runner(screen: ListScreen) -> (ProbeHost, ShellRunner<ProbeHost>) {
    let host = ProbeHost::default();
    let engine = NavEngine::new(KeyMap::default(), host.clone(), Duration::ZERO);
    (host, ShellRunner::new(engine, Box::new(screen), Duration::ZERO))
}

fn press(runner: &mut ShellRunner<ProbeHost>, codes: &[KeyCode], now: Duration) {
    runner.push_events(codes.iter().copied().map(key));
    runner.step(now);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level fmt subscriber and return what it logged.
fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}

// ── Traversal ─────────────────────────────────────────────────────────────

#[test]
fn wrap_down_from_last_item() {
    let items = stacked(&[1, 2, 3]);
    let (_host, mut r) = runner(ListScreen::new("list", items.clone()));
    press(&mut r, &[KeyCode::Down, KeyCode::Down], ms(0));
    assert_eq!(r.engine().registry().current_index(), Some(2));

    press(&mut r, &[KeyCode::Down], ms(10));
    assert_eq!(r.engine().registry().current_index(), Some(0));
    assert!(items[0].is_active_item());
    assert!(!items[2].is_active_item());
}

#[test]
fn wrap_up_from_first_item() {
    let items = stacked(&[1, 2, 3]);
    let (_host, mut r) = runner(ListScreen::new("list", items.clone()));
    press(&mut r, &[KeyCode::Up], ms(0));
    assert_eq!(r.engine().registry().current_index(), Some(2));
    assert!(items[2].is_active_item());
}

#[test]
fn boundary_scroll_then_wrap() {
    let items: Vec<_> = (0..3)
        .map(|i| ProbeItem::new(i + 1).at(60.0 + 40.0 * i as f32, 40.0).build())
        .collect();
    let vp = ProbeViewport::at(1000.0, 200.0, 50.0);
    let screen = ListScreen::new("scrolling", items.clone()).with_viewport(vp.clone());
    let outcomes = Rc::clone(&screen.outcomes);
    let (_host, mut r) = runner(screen);

    press(&mut r, &[KeyCode::Up], ms(0));
    let result = r.step(SCROLL_ANIMATION_DURATION);
    assert!(!result.animating);
    assert_eq!(vp.offset(), 50.0 - BOUNDARY_SCROLL_STEP);
    assert_eq!(r.engine().registry().current_index(), Some(0));

    // Two more presses: one scrolls to the top, the next wraps.
    press(&mut r, &[KeyCode::Up], ms(300));
    r.step(ms(600));
    assert_eq!(vp.offset(), 0.0);
    press(&mut r, &[KeyCode::Up], ms(700));
    assert_eq!(r.engine().registry().current_index(), Some(2));

    let kinds: Vec<&'static str> = outcomes
        .borrow()
        .iter()
        .map(|o| match o {
            NavOutcome::Scrolled { .. } => "scrolled",
            NavOutcome::Wrapped { .. } => "wrapped",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["scrolled", "scrolled", "wrapped"]);
}

#[test]
fn moving_down_brings_items_into_view() {
    let items = stacked(&[1, 2, 3, 4, 5, 6]);
    let vp = ProbeViewport::at(300.0, 100.0, 0.0);
    let (_host, mut r) = runner(ListScreen::new("tall", items).with_viewport(vp.clone()));

    press(&mut r, &[KeyCode::Down, KeyCode::Down, KeyCode::Down], ms(0));
    r.step(ms(1000));
    // Item 4 spans 150..200; its trailing edge aligns with the window.
    assert_eq!(vp.offset(), 100.0);
}

#[test]
fn rapid_presses_retarget_mid_animation() {
    let items = stacked(&[1, 2, 3, 4, 5, 6]);
    let vp = ProbeViewport::at(300.0, 100.0, 0.0);
    let (_host, mut r) = runner(ListScreen::new("tall", items).with_viewport(vp.clone()));

    press(&mut r, &[KeyCode::Down, KeyCode::Down], ms(0));
    r.step(ms(100));
    let mid = vp.offset();
    assert!(mid > 0.0 && mid < 50.0);

    press(&mut r, &[KeyCode::Down], ms(120));
    let sampled = vp.offset();
    assert!(sampled >= mid, "never jumps backwards");
    r.step(ms(120) + SCROLL_ANIMATION_DURATION);
    assert_eq!(vp.offset(), 100.0);
}

// ── Modes ─────────────────────────────────────────────────────────────────

#[test]
fn slider_isolation_through_runner() {
    let slider = ProbeItem::new(1)
        .caps(Capabilities::ACTIVATE | Capabilities::ADJUST)
        .effect(ActivateEffect::EnterSliderMode)
        .build();
    let below = ProbeItem::new(2).at(500.0, 50.0).build();
    let vp = ProbeViewport::at(1000.0, 200.0, 0.0);
    let (_host, mut r) = runner(
        ListScreen::new("slider", vec![slider.clone(), below]).with_viewport(vp.clone()),
    );

    press(&mut r, &[KeyCode::Enter], ms(0));
    assert_eq!(r.engine().mode(), NavMode::SliderAdjust);

    let writes = vp.writes();
    press(&mut r, &[KeyCode::Up; 5], ms(10));
    assert_eq!(slider.increases(), 5);
    assert_eq!(r.engine().registry().current_index(), Some(0));
    assert_eq!(vp.writes(), writes);

    press(&mut r, &[KeyCode::Down, KeyCode::Enter], ms(20));
    assert_eq!(slider.decreases(), 1);
    assert_eq!(r.engine().mode(), NavMode::Normal);
    assert_eq!(slider.activations(), 1);
}

#[test]
fn text_edit_passes_navigation_keys_to_the_field() {
    let field = ProbeItem::new(1)
        .caps(Capabilities::ACTIVATE)
        .effect(ActivateEffect::EnterTextInput)
        .build();
    let next = ProbeItem::new(2).at(60.0, 40.0).build();
    let screen = ListScreen::new("form", vec![field, next]);
    let typed = Rc::clone(&screen.typed);
    let (_host, mut r) = runner(screen);

    press(&mut r, &[KeyCode::Enter], ms(0));
    assert_eq!(r.engine().mode(), NavMode::TextEdit);

    r.push_events([
        key(KeyCode::Char('h')),
        key(KeyCode::Down),
        key(KeyCode::Enter),
        key(KeyCode::Escape),
    ]);
    r.step(ms(10));
    assert_eq!(
        *typed.borrow(),
        vec![
            key(KeyCode::Char('h')),
            key(KeyCode::Down),
            key(KeyCode::Enter),
            key(KeyCode::Escape),
        ]
    );
    assert_eq!(r.engine().mode(), NavMode::Normal);
    assert_eq!(r.engine().registry().current_index(), Some(0));
    assert!(r.drain_passthrough().is_empty());

    press(&mut r, &[KeyCode::Down], ms(20));
    assert_eq!(r.engine().registry().current_id(), Some(2));
}

#[test]
fn unclaimed_input_reaches_the_host() {
    let (_host, mut r) = runner(ListScreen::new("list", stacked(&[1])));
    press(&mut r, &[KeyCode::Char('q'), KeyCode::F(2)], ms(0));
    assert_eq!(
        r.drain_passthrough(),
        vec![key(KeyCode::Char('q')), key(KeyCode::F(2))]
    );
}

// ── Screens and rebuilds ──────────────────────────────────────────────────

#[test]
fn replacement_screen_is_built_before_the_next_event() {
    let door = ProbeItem::new(1).caps(Capabilities::ACTIVATE).build();
    let next_items = stacked(&[10, 20, 30]);
    let for_hook = next_items.clone();
    let screen = ListScreen::new("home", vec![door]).with_hook(move |outcome, _engine| {
        match outcome {
            NavOutcome::Activated { id: 1, .. } => {
                ScreenCmd::Replace(Box::new(ListScreen::new("settings", for_hook.clone())))
            }
            _ => ScreenCmd::None,
        }
    });
    let (_host, mut r) = runner(screen);

    // Both events in one step: Down must act on the new screen.
    r.push_events([key(KeyCode::Enter), key(KeyCode::Down)]);
    let result = r.step(ms(0));
    assert_eq!(result.rebuilds, 1);
    assert_eq!(r.screen_name(), "settings");
    assert_eq!(r.engine().registry().ids(), vec![10, 20, 30]);
    assert_eq!(r.engine().registry().current_id(), Some(20));
    assert!(next_items[1].is_active_item());
}

#[test]
fn rebuild_to_empty_screen_clears_focus() {
    let items = stacked(&[1, 2]);
    let held = items.clone();
    let vp = ProbeViewport::at(400.0, 100.0, 0.0);
    let screen = ListScreen::new("list", items)
        .with_viewport(vp)
        .with_hook(|outcome, _engine| match outcome {
            NavOutcome::Ignored(IgnoreReason::MissingCapability(_)) => {
                ScreenCmd::Replace(Box::new(ListScreen::new("empty", Vec::new())))
            }
            _ => ScreenCmd::None,
        });
    let (_host, mut r) = runner(screen);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _sub = r
        .engine()
        .subscribe_focus(move |e| sink.borrow_mut().push(*e));

    press(&mut r, &[KeyCode::Enter], ms(0));
    assert_eq!(r.screen_name(), "empty");
    assert_eq!(r.engine().registry().current_index(), None);
    assert_eq!(r.engine().registry().active_count(), 0);
    assert!(held.iter().all(|i| !i.is_active_item()));
    assert_eq!(*events.borrow(), vec![FocusEvent::FocusLost { id: 1 }]);

    // No viewport on the empty screen: movement is a plain no-op.
    press(&mut r, &[KeyCode::Down], ms(10));
    assert_eq!(r.engine().registry().current_index(), None);
}

#[test]
fn dropped_control_is_an_invalid_reference() {
    let keep = ProbeItem::new(8).build();
    let mut engine = NavEngine::new(KeyMap::default(), ProbeHost::default(), ms(0));
    {
        let gone = ProbeItem::new(7).at(50.0, 50.0).build();
        engine.rebuild(&dyn_items(&[keep.clone(), gone]), None, ms(0));
    }

    assert_eq!(
        engine.handle_event(&key(KeyCode::Down), ms(0)),
        Dispatch::Navigated(NavOutcome::Ignored(IgnoreReason::InvalidReference(
            FocusError::ItemDropped(7)
        )))
    );
    assert_eq!(engine.registry().current_id(), Some(8));
    assert!(keep.is_active_item());
    assert_eq!(
        engine.registry_mut().focus(7, ms(0)),
        Err(FocusError::ItemDropped(7))
    );
}

// ── Errors and logging ────────────────────────────────────────────────────

#[test]
fn panicking_control_leaves_state_and_logs() {
    let bad = ProbeItem::new(1)
        .caps(Capabilities::TOGGLE)
        .effect(ActivateEffect::EnterSliderMode)
        .panicking()
        .build();
    let (_host, mut r) = runner(ListScreen::new("list", vec![bad.clone()]));

    let (_, logs) = capture_logs(|| press(&mut r, &[KeyCode::Enter], ms(0)));
    assert_eq!(bad.toggles(), 1);
    assert_eq!(r.engine().mode(), NavMode::Normal);
    assert_eq!(r.engine().registry().current_index(), Some(0));
    assert!(bad.is_active_item());
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(logs.contains("callback panicked: probe 1 exploded"), "logs: {logs}");
}

#[test]
fn failing_control_is_logged_with_item_field() {
    let bad = ProbeItem::new(42).caps(Capabilities::ACTIVATE).failing().build();
    let (_host, mut r) = runner(ListScreen::new("list", vec![bad]));
    let (_, logs) = capture_logs(|| press(&mut r, &[KeyCode::Enter], ms(0)));
    assert!(logs.contains("item=42"), "logs: {logs}");
    assert!(logs.contains("probe 42 refused"), "logs: {logs}");
}

#[test]
fn screen_replacement_is_logged() {
    let door = ProbeItem::new(1).caps(Capabilities::ACTIVATE).build();
    let screen = ListScreen::new("home", vec![door]).with_hook(|outcome, _engine| match outcome {
        NavOutcome::Activated { .. } => {
            ScreenCmd::Replace(Box::new(ListScreen::new("about", stacked(&[5]))))
        }
        _ => ScreenCmd::None,
    });
    let (_host, mut r) = runner(screen);
    let (_, logs) = capture_logs(|| press(&mut r, &[KeyCode::Enter], ms(0)));
    assert!(logs.contains("screen replaced"), "logs: {logs}");
    assert!(logs.contains("from=\"home\"") || logs.contains("from=home"), "logs: {logs}");
}

// ── Platform focus ────────────────────────────────────────────────────────

#[test]
fn focus_lost_event_is_reclaimed_immediately() {
    let (host, mut r) = runner(ListScreen::new("list", stacked(&[1])));
    assert_eq!(host.claims(), 1);
    host.steal();
    r.push_event(Event::FocusLost);
    r.step(ms(5));
    assert!(host.has_input_focus());
    assert_eq!(host.claims(), 2);
    assert!(r.drain_passthrough().is_empty());
}

#[test]
fn periodic_check_reclaims_silent_loss() {
    let (host, mut r) = runner(ListScreen::new("list", stacked(&[1])));
    host.steal();
    assert!(!r.step(ms(500)).reclaimed);
    assert!(!host.has_input_focus());
    assert!(r.step(FOCUS_RECLAIM_INTERVAL).reclaimed);
    assert!(host.has_input_focus());
}
