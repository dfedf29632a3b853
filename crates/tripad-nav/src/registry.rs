#![forbid(unsafe_code)]

//! Ordered set of navigable controls for the active screen.
//!
//! # Invariants
//!
//! 1. At most one live item reports `is_active_item() == true`, and when
//!    `current_index()` is `Some(i)` it is exactly the item at `i`.
//! 2. `current_index()` is `None` iff the registry is empty, or every focus
//!    attempt since the last rebuild hit a dropped item.
//! 3. Entries are replaced wholesale by [`FocusRegistry::rebuild`]; nothing
//!    mutates the sequence piecemeal.
//! 4. A [`FocusEvent`] is emitted only when the focused id actually changes.
//!
//! # Failure Modes
//!
//! - **Unknown id / dropped item**: `focus` logs at `warn` and returns a
//!   [`FocusError`]; index, flags, and scroll are unchanged.
//! - **Panicking `force_active_focus`**: caught and logged; focus still moves.

use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tripad_core::reactive::{Signal, Subscription};
use tripad_core::{debug, debug_span, warn};

use crate::error::FocusError;
use crate::guard;
use crate::item::{Activation, Capabilities, FocusableItem, ItemId};
use crate::scroll::{ScrollCoordinator, ScrollViewport};

/// Focus change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    FocusGained { id: ItemId },
    FocusMoved { from: ItemId, to: ItemId },
    /// A rebuild left nothing focusable.
    FocusLost { id: ItemId },
}

/// Registration record for one control.
#[derive(Clone)]
struct Entry {
    id: ItemId,
    item: Weak<dyn FocusableItem>,
    capabilities: Capabilities,
    activation: Activation,
}

impl Entry {
    fn new(item: &Rc<dyn FocusableItem>) -> Self {
        let capabilities = item.capabilities();
        Self {
            id: item.id(),
            item: Rc::downgrade(item),
            capabilities,
            activation: Activation::resolve(capabilities),
        }
    }
}

/// Resolved view of the focused entry.
#[derive(Clone)]
pub struct FocusedItem {
    pub index: usize,
    pub id: ItemId,
    pub item: Rc<dyn FocusableItem>,
    pub capabilities: Capabilities,
    pub activation: Activation,
}

impl fmt::Debug for FocusedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusedItem")
            .field("index", &self.index)
            .field("id", &self.id)
            .field("activation", &self.activation)
            .finish_non_exhaustive()
    }
}

/// The traversal sequence plus the single focused index.
#[derive(Default)]
pub struct FocusRegistry {
    entries: Vec<Entry>,
    current: Option<usize>,
    scroll: Option<ScrollCoordinator>,
    events: Signal<FocusEvent>,
    last_event: Option<FocusEvent>,
}

impl fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRegistry")
            .field("ids", &self.ids())
            .field("current", &self.current)
            .field("scroll", &self.scroll)
            .finish()
    }
}

impl FocusRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence with the navigable subset of `items`.
    ///
    /// Duplicates by id keep the first occurrence. The previous entries lose
    /// their active flag, any running scroll animation is frozen, and the
    /// first new item (if any) receives focus.
    pub fn rebuild(
        &mut self,
        items: &[Rc<dyn FocusableItem>],
        viewport: Option<Rc<dyn ScrollViewport>>,
        now: Duration,
    ) {
        let _span = debug_span!("rebuild", offered = items.len()).entered();
        let previous = self.current_id();

        for entry in &self.entries {
            if let Some(item) = entry.item.upgrade() {
                item.set_active_item(false);
            }
        }
        if let Some(scroll) = self.scroll.as_mut() {
            scroll.stop(now);
        }

        let mut seen = HashSet::with_capacity(items.len());
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id();
            if !item.navigable() {
                debug!(item = id, "skipping non-navigable item");
                continue;
            }
            if !seen.insert(id) {
                warn!(item = id, "duplicate item id, keeping first");
                continue;
            }
            if item.is_active_item() {
                item.set_active_item(false);
            }
            entries.push(Entry::new(item));
        }

        self.entries = entries;
        self.current = None;
        self.scroll = viewport.map(ScrollCoordinator::new);
        debug!(
            count = self.entries.len(),
            viewport = self.scroll.is_some(),
            "registry rebuilt"
        );

        if !self.entries.is_empty() {
            // Entries were built from live `Rc`s, so this only fails if a
            // control drops itself inside `capabilities()`.
            let _ = self.apply_focus(0, now);
        }

        match (previous, self.current_id()) {
            (Some(id), None) => self.publish(FocusEvent::FocusLost { id }),
            (from, Some(to)) => self.notify_change(from, to),
            (None, None) => {}
        }
    }

    /// Focus the item with `id`.
    pub fn focus(&mut self, id: ItemId, now: Duration) -> Result<(), FocusError> {
        let Some(index) = self.index_of(id) else {
            warn!(item = id, "focus requested for unregistered item");
            return Err(FocusError::UnknownItem(id));
        };
        self.focus_at(index, now)
    }

    /// Focus the item at `index` in traversal order.
    pub fn focus_at(&mut self, index: usize, now: Duration) -> Result<(), FocusError> {
        let from = self.current_id();
        let to = self.apply_focus(index, now)?;
        self.notify_change(from, to);
        Ok(())
    }

    fn apply_focus(&mut self, index: usize, now: Duration) -> Result<ItemId, FocusError> {
        let Some(entry) = self.entries.get(index) else {
            let len = self.entries.len();
            warn!(index, len, "focus index out of range");
            return Err(FocusError::IndexOutOfRange { index, len });
        };
        let id = entry.id;
        let Some(item) = entry.item.upgrade() else {
            warn!(item = id, index, "focus requested for dropped item");
            return Err(FocusError::ItemDropped(id));
        };

        if let Some(prev) = self.current.filter(|&i| i != index) {
            if let Some(old) = self.entries[prev].item.upgrade() {
                old.set_active_item(false);
            }
        }
        item.set_active_item(true);
        self.current = Some(index);

        if let Some(scroll) = self.scroll.as_mut() {
            scroll.ensure_visible(item.extent(), now);
        }
        let _ = guard::invoke(id, "force_active_focus", || {
            item.force_active_focus();
            Ok(())
        });
        debug!(item = id, index, "focused");
        Ok(id)
    }

    fn notify_change(&mut self, from: Option<ItemId>, to: ItemId) {
        match from {
            None => self.publish(FocusEvent::FocusGained { id: to }),
            Some(from) if from != to => self.publish(FocusEvent::FocusMoved { from, to }),
            Some(_) => {}
        }
    }

    fn publish(&mut self, event: FocusEvent) {
        self.last_event = Some(event);
        self.events.emit(&event);
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Register a focus-change callback; it lives as long as the guard.
    pub fn subscribe(&self, callback: impl Fn(&FocusEvent) + 'static) -> Subscription {
        self.events.subscribe(callback)
    }

    /// The most recent focus event, cleared on read.
    pub fn take_focus_event(&mut self) -> Option<FocusEvent> {
        self.last_event.take()
    }

    /// Advance the scroll animation. Returns whether it is still running.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.scroll.as_mut().is_some_and(|s| s.tick(now))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_id(&self) -> Option<ItemId> {
        self.current.map(|i| self.entries[i].id)
    }

    /// The focused control, if it is still alive.
    #[must_use]
    pub fn current_item(&self) -> Option<Rc<dyn FocusableItem>> {
        self.current.and_then(|i| self.entries[i].item.upgrade())
    }

    /// The focused entry with its resolved capabilities.
    #[must_use]
    pub fn focused(&self) -> Option<FocusedItem> {
        let index = self.current?;
        let entry = &self.entries[index];
        Some(FocusedItem {
            index,
            id: entry.id,
            item: entry.item.upgrade()?,
            capabilities: entry.capabilities,
            activation: entry.activation,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in traversal order.
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Live items currently flagged active. Always 0 or 1.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.item.upgrade())
            .filter(|item| item.is_active_item())
            .count()
    }

    #[must_use]
    pub fn scroll(&self) -> Option<&ScrollCoordinator> {
        self.scroll.as_ref()
    }

    pub fn scroll_mut(&mut self) -> Option<&mut ScrollCoordinator> {
        self.scroll.as_mut()
    }

    #[must_use]
    pub fn has_viewport(&self) -> bool {
        self.scroll.is_some()
    }
}
