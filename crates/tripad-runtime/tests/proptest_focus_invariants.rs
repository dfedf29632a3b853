//! Property-based invariants for navigation driven through the runner.
//!
//! 1. At most one control is flagged active, and one is iff focus is set.
//! 2. The active control is the registry's current item.
//! 3. The viewport offset always stays within `[0, content - window]`.
//! 4. Slider mode never moves focus.
//! 5. Arbitrary key streams never panic, even with misbehaving controls.

use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use tripad_core::config::KeyMap;
use tripad_core::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use tripad_nav::testing::{ProbeHost, ProbeItem, ProbeViewport, dyn_items};
use tripad_nav::{
    ActivateEffect, Capabilities, FocusableItem, NavEngine, NavMode, ScrollViewport,
};
use tripad_runtime::{Screen, ShellRunner};

struct PoolScreen {
    items: Vec<Rc<ProbeItem>>,
    viewport: Rc<ProbeViewport>,
}

impl Screen<ProbeHost> for PoolScreen {
    fn name(&self) -> &str {
        "pool"
    }

    fn items(&self) -> Vec<Rc<dyn FocusableItem>> {
        dyn_items(&self.items)
    }

    fn viewport(&self) -> Option<Rc<dyn ScrollViewport>> {
        Some(self.viewport.clone() as Rc<dyn ScrollViewport>)
    }
}

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Input {
    Key(KeyCode, KeyEventKind),
    FocusLost,
    Step(u64),
}

fn input() -> impl Strategy<Value = Input> {
    let code = prop::sample::select(vec![
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Enter,
        KeyCode::Escape,
        KeyCode::Char('a'),
    ]);
    let kind = prop::sample::select(vec![
        KeyEventKind::Press,
        KeyEventKind::Repeat,
        KeyEventKind::Release,
    ]);
    prop_oneof![
        6 => (code, kind).prop_map(|(c, k)| Input::Key(c, k)),
        1 => Just(Input::FocusLost),
        2 => (0u64..300).prop_map(Input::Step),
    ]
}

/// One control of each flavour, some of them failing or panicking.
fn control(id: u64, flavour: u8) -> Rc<ProbeItem> {
    let base = ProbeItem::new(id).at(id as f32 * 80.0, 60.0);
    match flavour % 6 {
        0 => base.build(),
        1 => base.caps(Capabilities::ACTIVATE).build(),
        2 => base
            .caps(Capabilities::ACTIVATE | Capabilities::ADJUST)
            .effect(ActivateEffect::EnterSliderMode)
            .build(),
        3 => base.caps(Capabilities::TOGGLE).failing().build(),
        4 => base
            .caps(Capabilities::CUSTOM_ACTIVATE)
            .effect(ActivateEffect::EnterTextInput)
            .build(),
        _ => base.caps(Capabilities::ACTIVATE | Capabilities::ADJUST).panicking().build(),
    }
}

fn screen_strategy() -> impl Strategy<Value = (Vec<u8>, f32, f32)> {
    (
        prop::collection::vec(any::<u8>(), 0..8),
        100.0f32..900.0,
        50.0f32..300.0,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn single_active_focus_under_any_input(
        (flavours, content, window) in screen_strategy(),
        inputs in prop::collection::vec(input(), 1..80),
    ) {
        let items: Vec<_> = flavours
            .iter()
            .enumerate()
            .map(|(i, f)| control(i as u64, *f))
            .collect();
        let viewport = ProbeViewport::at(content, window, 0.0);
        let engine = NavEngine::new(KeyMap::default(), ProbeHost::default(), Duration::ZERO);
        let screen = PoolScreen { items: items.clone(), viewport: viewport.clone() };
        let mut runner = ShellRunner::new(engine, Box::new(screen), Duration::ZERO);
        let max = (content - window).max(0.0);
        let mut now = Duration::ZERO;

        for input in inputs {
            let index_before = runner.engine().registry().current_index();
            let mode_before = runner.engine().mode();
            match input {
                Input::Key(code, kind) => {
                    runner.push_event(Event::Key(KeyEvent::new(code).with_kind(kind)));
                }
                Input::FocusLost => runner.push_event(Event::FocusLost),
                Input::Step(ms) => now += Duration::from_millis(ms),
            }
            runner.step(now);
            runner.drain_passthrough();

            let registry = runner.engine().registry();
            let active: Vec<_> = items.iter().filter(|i| i.is_active_item()).collect();
            prop_assert!(active.len() <= 1);
            prop_assert_eq!(active.len() == 1, registry.current_index().is_some());
            prop_assert_eq!(registry.current_index().is_none(), items.is_empty());
            if let Some(item) = active.first() {
                prop_assert_eq!(Some(item.id()), registry.current_id());
            }
            prop_assert!(viewport.offset() >= 0.0);
            prop_assert!(viewport.offset() <= max + 0.001);
            if mode_before == NavMode::SliderAdjust {
                prop_assert_eq!(registry.current_index(), index_before);
            }
        }
    }
}
