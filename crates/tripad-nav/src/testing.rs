#![forbid(unsafe_code)]

//! Test doubles for the engine's collaborator traits.
//!
//! Available to this crate's unit tests and, with the `test-helpers`
//! feature, to downstream integration tests.

use std::cell::Cell;
use std::rc::Rc;

use tripad_core::geometry::Extent;

use crate::error::ItemError;
use crate::item::{ActivateEffect, Capabilities, FocusableItem, ItemId};
use crate::router::FocusHost;
use crate::scroll::ScrollViewport;

/// How a probe's capability callbacks behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Behavior {
    #[default]
    Succeed,
    Fail,
    Panic,
}

/// Configurable control that counts every callback.
#[derive(Debug)]
pub struct ProbeItem {
    id: ItemId,
    extent: Extent,
    navigable: bool,
    caps: Capabilities,
    effect: ActivateEffect,
    behavior: Behavior,
    panic_on_focus: bool,
    active: Cell<bool>,
    activations: Cell<u32>,
    toggles: Cell<u32>,
    customs: Cell<u32>,
    increases: Cell<u32>,
    decreases: Cell<u32>,
    focus_calls: Cell<u32>,
}

impl ProbeItem {
    /// Builder for a navigable, capability-less probe at `0..50`.
    #[must_use]
    pub fn new(id: ItemId) -> ProbeBuilder {
        ProbeBuilder {
            item: Self {
                id,
                extent: Extent::new(0.0, 50.0),
                navigable: true,
                caps: Capabilities::empty(),
                effect: ActivateEffect::None,
                behavior: Behavior::Succeed,
                panic_on_focus: false,
                active: Cell::new(false),
                activations: Cell::new(0),
                toggles: Cell::new(0),
                customs: Cell::new(0),
                increases: Cell::new(0),
                decreases: Cell::new(0),
                focus_calls: Cell::new(0),
            },
        }
    }

    pub fn activations(&self) -> u32 {
        self.activations.get()
    }

    pub fn toggles(&self) -> u32 {
        self.toggles.get()
    }

    pub fn customs(&self) -> u32 {
        self.customs.get()
    }

    pub fn increases(&self) -> u32 {
        self.increases.get()
    }

    pub fn decreases(&self) -> u32 {
        self.decreases.get()
    }

    /// Calls to `force_active_focus`.
    pub fn focus_calls(&self) -> u32 {
        self.focus_calls.get()
    }

    fn run<T>(&self, counter: &Cell<u32>, ok: T) -> Result<T, ItemError> {
        counter.set(counter.get() + 1);
        match self.behavior {
            Behavior::Succeed => Ok(ok),
            Behavior::Fail => Err(ItemError::failed(format!("probe {} refused", self.id))),
            Behavior::Panic => panic!("probe {} exploded", self.id),
        }
    }
}

impl FocusableItem for ProbeItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn navigable(&self) -> bool {
        self.navigable
    }

    fn is_active_item(&self) -> bool {
        self.active.get()
    }

    fn set_active_item(&self, active: bool) {
        self.active.set(active);
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn activate(&self) -> Result<ActivateEffect, ItemError> {
        self.run(&self.activations, self.effect)
    }

    fn toggle(&self) -> Result<ActivateEffect, ItemError> {
        self.run(&self.toggles, self.effect)
    }

    fn custom_activate(&self) -> Result<ActivateEffect, ItemError> {
        self.run(&self.customs, self.effect)
    }

    fn increase_value(&self) -> Result<(), ItemError> {
        self.run(&self.increases, ())
    }

    fn decrease_value(&self) -> Result<(), ItemError> {
        self.run(&self.decreases, ())
    }

    fn force_active_focus(&self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
        if self.panic_on_focus {
            panic!("probe {} cannot take focus", self.id);
        }
    }
}

/// Builder returned by [`ProbeItem::new`].
#[derive(Debug)]
pub struct ProbeBuilder {
    item: ProbeItem,
}

impl ProbeBuilder {
    #[must_use]
    pub fn at(mut self, start: f32, len: f32) -> Self {
        self.item.extent = Extent::new(start, len);
        self
    }

    #[must_use]
    pub fn caps(mut self, caps: Capabilities) -> Self {
        self.item.caps = caps;
        self
    }

    /// Effect returned by successful activation callbacks.
    #[must_use]
    pub fn effect(mut self, effect: ActivateEffect) -> Self {
        self.item.effect = effect;
        self
    }

    #[must_use]
    pub fn not_navigable(mut self) -> Self {
        self.item.navigable = false;
        self
    }

    /// Capability callbacks return `ItemError::Failed`.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.item.behavior = Behavior::Fail;
        self
    }

    /// Capability callbacks panic.
    #[must_use]
    pub fn panicking(mut self) -> Self {
        self.item.behavior = Behavior::Panic;
        self
    }

    #[must_use]
    pub fn panic_on_focus(mut self) -> Self {
        self.item.panic_on_focus = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Rc<ProbeItem> {
        Rc::new(self.item)
    }
}

/// Plain probes with the given ids, stacked 50 units apart.
#[must_use]
pub fn stacked(ids: &[ItemId]) -> Vec<Rc<ProbeItem>> {
    ids.iter()
        .enumerate()
        .map(|(i, &id)| ProbeItem::new(id).at(i as f32 * 50.0, 50.0).build())
        .collect()
}

/// Upcast probes for `rebuild`.
#[must_use]
pub fn dyn_items(items: &[Rc<ProbeItem>]) -> Vec<Rc<dyn FocusableItem>> {
    items
        .iter()
        .map(|item| Rc::clone(item) as Rc<dyn FocusableItem>)
        .collect()
}

/// Viewport that records offset writes.
#[derive(Debug, Default)]
pub struct ProbeViewport {
    offset: Cell<f32>,
    content: Cell<f32>,
    window: Cell<f32>,
    writes: Cell<u32>,
}

impl ProbeViewport {
    #[must_use]
    pub fn at(content: f32, window: f32, offset: f32) -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(offset),
            content: Cell::new(content),
            window: Cell::new(window),
            writes: Cell::new(0),
        })
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    /// Number of `set_content_offset` calls.
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    pub fn resize(&self, content: f32, window: f32) {
        self.content.set(content);
        self.window.set(window);
    }
}

impl ScrollViewport for ProbeViewport {
    fn content_offset(&self) -> f32 {
        self.offset.get()
    }

    fn set_content_offset(&self, offset: f32) {
        self.offset.set(offset);
        self.writes.set(self.writes.get() + 1);
    }

    fn content_extent(&self) -> f32 {
        self.content.get()
    }

    fn viewport_extent(&self) -> f32 {
        self.window.get()
    }
}

/// Shared platform-focus state. Clones observe the same host.
#[derive(Debug, Clone, Default)]
pub struct ProbeHost {
    focused: Rc<Cell<bool>>,
    claims: Rc<Cell<u32>>,
}

impl ProbeHost {
    /// Simulate another surface taking focus.
    pub fn steal(&self) {
        self.focused.set(false);
    }

    pub fn claims(&self) -> u32 {
        self.claims.get()
    }
}

impl FocusHost for ProbeHost {
    fn has_input_focus(&self) -> bool {
        self.focused.get()
    }

    fn claim_input_focus(&mut self) {
        self.focused.set(true);
        self.claims.set(self.claims.get() + 1);
    }
}
