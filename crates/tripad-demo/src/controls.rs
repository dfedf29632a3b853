#![forbid(unsafe_code)]

//! Concrete controls for the demo settings page.
//!
//! Every control occupies whole rows of [`ROW_HEIGHT`] content units. State
//! lives in `Cell`/`RefCell` because the engine calls the
//! [`FocusableItem`] callbacks through shared `Rc` handles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tripad_core::geometry::{Extent, clamp_offset};
use tripad_nav::{
    ActivateEffect, Capabilities, FocusableItem, ItemError, ItemId, ScrollViewport,
};

/// Content units per terminal row.
pub const ROW_HEIGHT: f32 = 20.0;

/// Identity, placement, and focus flag shared by all controls.
#[derive(Debug)]
struct Slot {
    id: ItemId,
    label: String,
    row: usize,
    rows: usize,
    active: Cell<bool>,
}

impl Slot {
    fn new(id: ItemId, label: impl Into<String>, row: usize, rows: usize) -> Self {
        Self {
            id,
            label: label.into(),
            row,
            rows: rows.max(1),
            active: Cell::new(false),
        }
    }

    fn extent(&self) -> Extent {
        Extent::new(self.row as f32 * ROW_HEIGHT, self.rows as f32 * ROW_HEIGHT)
    }

    fn marker(&self) -> &'static str {
        if self.active.get() { ">" } else { " " }
    }
}

macro_rules! slot_accessors {
    () => {
        fn id(&self) -> ItemId {
            self.slot.id
        }

        fn is_active_item(&self) -> bool {
            self.slot.active.get()
        }

        fn set_active_item(&self, active: bool) {
            self.slot.active.set(active);
        }

        fn extent(&self) -> Extent {
            self.slot.extent()
        }
    };
}

/// A push button. Counts presses.
#[derive(Debug)]
pub struct Button {
    slot: Slot,
    presses: Cell<u32>,
}

impl Button {
    pub fn new(id: ItemId, label: impl Into<String>, row: usize) -> Rc<Self> {
        Rc::new(Self {
            slot: Slot::new(id, label, row, 1),
            presses: Cell::new(0),
        })
    }

    pub fn presses(&self) -> u32 {
        self.presses.get()
    }

    pub fn reset(&self) {
        self.presses.set(0);
    }
}

impl FocusableItem for Button {
    slot_accessors!();

    fn capabilities(&self) -> Capabilities {
        Capabilities::ACTIVATE
    }

    fn activate(&self) -> Result<ActivateEffect, ItemError> {
        self.presses.set(self.presses.get().saturating_add(1));
        Ok(ActivateEffect::None)
    }
}

/// An on/off switch.
#[derive(Debug)]
pub struct Toggle {
    slot: Slot,
    on: Cell<bool>,
}

impl Toggle {
    pub fn new(id: ItemId, label: impl Into<String>, row: usize, on: bool) -> Rc<Self> {
        Rc::new(Self {
            slot: Slot::new(id, label, row, 1),
            on: Cell::new(on),
        })
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    pub fn set(&self, on: bool) {
        self.on.set(on);
    }
}

impl FocusableItem for Toggle {
    slot_accessors!();

    fn capabilities(&self) -> Capabilities {
        Capabilities::TOGGLE
    }

    fn toggle(&self) -> Result<ActivateEffect, ItemError> {
        self.on.set(!self.on.get());
        Ok(ActivateEffect::None)
    }
}

/// An integer slider. Activate enters adjust mode; Up/Down then step the value.
#[derive(Debug)]
pub struct Slider {
    slot: Slot,
    value: Cell<i32>,
    min: i32,
    max: i32,
    step: i32,
}

impl Slider {
    pub fn new(
        id: ItemId,
        label: impl Into<String>,
        row: usize,
        range: (i32, i32),
        step: i32,
        value: i32,
    ) -> Rc<Self> {
        let (min, max) = if range.0 <= range.1 { range } else { (range.1, range.0) };
        Rc::new(Self {
            slot: Slot::new(id, label, row, 2),
            value: Cell::new(value.clamp(min, max)),
            min,
            max,
            step: step.max(1),
        })
    }

    pub fn value(&self) -> i32 {
        self.value.get()
    }

    pub fn set(&self, value: i32) {
        self.value.set(value.clamp(self.min, self.max));
    }

    fn bar(&self, width: usize) -> String {
        let span = (self.max - self.min).max(1) as f32;
        let filled = (((self.value.get() - self.min) as f32 / span) * width as f32).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

impl FocusableItem for Slider {
    slot_accessors!();

    fn capabilities(&self) -> Capabilities {
        Capabilities::ACTIVATE | Capabilities::ADJUST
    }

    fn activate(&self) -> Result<ActivateEffect, ItemError> {
        Ok(ActivateEffect::EnterSliderMode)
    }

    fn increase_value(&self) -> Result<(), ItemError> {
        self.set(self.value.get().saturating_add(self.step));
        Ok(())
    }

    fn decrease_value(&self) -> Result<(), ItemError> {
        self.set(self.value.get().saturating_sub(self.step));
        Ok(())
    }
}

/// A single-line text field. Activate hands raw input to it.
#[derive(Debug)]
pub struct TextField {
    slot: Slot,
    text: RefCell<String>,
    max_len: usize,
}

impl TextField {
    pub fn new(id: ItemId, label: impl Into<String>, row: usize, max_len: usize) -> Rc<Self> {
        Rc::new(Self {
            slot: Slot::new(id, label, row, 1),
            text: RefCell::new(String::new()),
            max_len,
        })
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Append `s`, truncating at the field's limit. Returns whether anything fit.
    pub fn insert(&self, s: &str) -> bool {
        let mut text = self.text.borrow_mut();
        let room = self.max_len.saturating_sub(text.chars().count());
        let before = text.len();
        text.extend(s.chars().filter(|c| !c.is_control()).take(room));
        text.len() != before
    }

    pub fn backspace(&self) {
        self.text.borrow_mut().pop();
    }

    pub fn clear(&self) {
        self.text.borrow_mut().clear();
    }
}

impl FocusableItem for TextField {
    slot_accessors!();

    fn capabilities(&self) -> Capabilities {
        Capabilities::CUSTOM_ACTIVATE
    }

    fn custom_activate(&self) -> Result<ActivateEffect, ItemError> {
        Ok(ActivateEffect::EnterTextInput)
    }
}

/// A control on the page, kept concrete for drawing.
#[derive(Debug, Clone)]
pub enum Control {
    Button(Rc<Button>),
    Toggle(Rc<Toggle>),
    Slider(Rc<Slider>),
    Text(Rc<TextField>),
}

impl Control {
    pub fn item(&self) -> Rc<dyn FocusableItem> {
        match self {
            Self::Button(c) => c.clone(),
            Self::Toggle(c) => c.clone(),
            Self::Slider(c) => c.clone(),
            Self::Text(c) => c.clone(),
        }
    }

    fn slot(&self) -> &Slot {
        match self {
            Self::Button(c) => &c.slot,
            Self::Toggle(c) => &c.slot,
            Self::Slider(c) => &c.slot,
            Self::Text(c) => &c.slot,
        }
    }

    pub fn id(&self) -> ItemId {
        self.slot().id
    }

    /// First content row.
    pub fn row(&self) -> usize {
        self.slot().row
    }

    /// Rows this control occupies, one string per row.
    pub fn lines(&self) -> Vec<String> {
        let slot = self.slot();
        let mark = slot.marker();
        match self {
            Self::Button(b) => vec![format!("{mark} [ {} ]  x{}", slot.label, b.presses())],
            Self::Toggle(t) => {
                let state = if t.is_on() { "on " } else { "off" };
                vec![format!("{mark} {:<16} <{state}>", slot.label)]
            }
            Self::Slider(s) => vec![
                format!("{mark} {:<16} {:>4}", slot.label, s.value()),
                format!("  {}", s.bar(24)),
            ],
            Self::Text(t) => vec![format!("{mark} {:<16} \"{}\"", slot.label, t.text())],
        }
    }
}

/// Scrollable page model. Offsets are in content units.
#[derive(Debug)]
pub struct PageViewport {
    offset: Cell<f32>,
    rows: Cell<usize>,
    window_rows: Cell<usize>,
}

impl PageViewport {
    pub fn new(rows: usize, window_rows: usize) -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(0.0),
            rows: Cell::new(rows),
            window_rows: Cell::new(window_rows.max(1)),
        })
    }

    /// First fully or partially visible row.
    pub fn first_row(&self) -> usize {
        (self.offset.get() / ROW_HEIGHT).floor().max(0.0) as usize
    }

    pub fn window_rows(&self) -> usize {
        self.window_rows.get()
    }

    /// Terminal resized: keep the offset legal for the new window.
    pub fn resize(&self, window_rows: usize) {
        self.window_rows.set(window_rows.max(1));
        let clamped = clamp_offset(
            self.offset.get(),
            self.content_extent(),
            self.viewport_extent(),
        );
        self.offset.set(clamped);
    }
}

impl ScrollViewport for PageViewport {
    fn content_offset(&self) -> f32 {
        self.offset.get()
    }

    fn set_content_offset(&self, offset: f32) {
        self.offset.set(offset);
    }

    fn content_extent(&self) -> f32 {
        self.rows.get() as f32 * ROW_HEIGHT
    }

    fn viewport_extent(&self) -> f32 {
        self.window_rows.get() as f32 * ROW_HEIGHT
    }
}
