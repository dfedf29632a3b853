#![forbid(unsafe_code)]

//! The demo's single screen: a device settings page taller than the terminal.
//!
//! [`Page`] holds the controls and viewport and is shared between the
//! [`SettingsScreen`] (owned by the runner) and the drawing loop.
//!
//! Row layout, top to bottom: two toggles, two sliders (two rows each), a
//! text field, Apply and Reset buttons, `extra` filler buttons, Quit.

use std::cell::RefCell;
use std::rc::Rc;

use tripad_core::event::{Event, KeyCode};
use tripad_core::{debug, info};
use tripad_nav::{
    FocusHost, FocusableItem, ItemId, NavEngine, NavMode, NavOutcome, ScrollViewport,
};
use tripad_runtime::{Screen, ScreenCmd};

use crate::controls::{Button, Control, PageViewport, Slider, TextField, Toggle};

pub const WIFI: ItemId = 1;
pub const BLUETOOTH: ItemId = 2;
pub const BRIGHTNESS: ItemId = 3;
pub const VOLUME: ItemId = 4;
pub const DEVICE_NAME: ItemId = 5;
pub const APPLY: ItemId = 6;
pub const RESET: ItemId = 7;
pub const QUIT: ItemId = 8;
/// Filler buttons are numbered from here.
pub const FIRST_EXTRA: ItemId = 100;

const NAME_LIMIT: usize = 24;

/// Controls, viewport, and status line of the settings page.
#[derive(Debug)]
pub struct Page {
    wifi: Rc<Toggle>,
    bluetooth: Rc<Toggle>,
    brightness: Rc<Slider>,
    volume: Rc<Slider>,
    name: Rc<TextField>,
    apply: Rc<Button>,
    controls: Vec<Control>,
    viewport: Rc<PageViewport>,
    status: RefCell<String>,
}

impl Page {
    pub fn new(extra: usize, window_rows: usize) -> Rc<Self> {
        let wifi = Toggle::new(WIFI, "Wi-Fi", 0, true);
        let bluetooth = Toggle::new(BLUETOOTH, "Bluetooth", 1, false);
        let brightness = Slider::new(BRIGHTNESS, "Brightness", 2, (0, 100), 10, 70);
        let volume = Slider::new(VOLUME, "Volume", 4, (0, 100), 5, 40);
        let name = TextField::new(DEVICE_NAME, "Device name", 6, NAME_LIMIT);
        let apply = Button::new(APPLY, "Apply", 7);

        let mut controls = vec![
            Control::Toggle(wifi.clone()),
            Control::Toggle(bluetooth.clone()),
            Control::Slider(brightness.clone()),
            Control::Slider(volume.clone()),
            Control::Text(name.clone()),
            Control::Button(apply.clone()),
            Control::Button(Button::new(RESET, "Reset", 8)),
        ];
        let mut row = 9;
        for n in 0..extra {
            controls.push(Control::Button(Button::new(
                FIRST_EXTRA + n as ItemId,
                format!("Extra {}", n + 1),
                row,
            )));
            row += 1;
        }
        controls.push(Control::Button(Button::new(QUIT, "Quit", row)));
        let rows = row + 1;

        Rc::new(Self {
            wifi,
            bluetooth,
            brightness,
            volume,
            name,
            apply,
            controls,
            viewport: PageViewport::new(rows, window_rows),
            status: RefCell::new(String::from("ready")),
        })
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn viewport(&self) -> &Rc<PageViewport> {
        &self.viewport
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    fn set_status(&self, status: impl Into<String>) {
        *self.status.borrow_mut() = status.into();
    }

    pub fn name_field(&self) -> &Rc<TextField> {
        &self.name
    }

    /// Summary of the current settings.
    pub fn summary(&self) -> String {
        format!(
            "wifi={} bt={} brightness={} volume={} name={:?}",
            self.wifi.is_on(),
            self.bluetooth.is_on(),
            self.brightness.value(),
            self.volume.value(),
            self.name.text(),
        )
    }

    fn reset(&self) {
        self.wifi.set(true);
        self.bluetooth.set(false);
        self.brightness.set(70);
        self.volume.set(40);
        self.name.clear();
        for control in &self.controls {
            if let Control::Button(b) = control {
                b.reset();
            }
        }
    }

    /// Draw the page: header, visible rows, footer.
    pub fn render(&self, mode: NavMode) -> Vec<String> {
        let first = self.viewport.first_row();
        let window = self.viewport.window_rows();

        let mut rows: Vec<Option<String>> = vec![None; first + window];
        for control in &self.controls {
            for (i, line) in control.lines().into_iter().enumerate() {
                if let Some(slot) = rows.get_mut(control.row() + i) {
                    *slot = Some(line);
                }
            }
        }

        let mut out = Vec::with_capacity(window + 3);
        out.push(format!(
            "tripad demo | mode: {mode} | offset: {:.1}",
            self.viewport.content_offset()
        ));
        out.extend(
            rows.into_iter()
                .skip(first)
                .take(window)
                .map(Option::unwrap_or_default),
        );
        out.push(format!("status: {}", self.status.borrow()));
        out.push(hint(mode).to_string());
        out
    }
}

fn hint(mode: NavMode) -> &'static str {
    match mode {
        NavMode::Normal => "up/down move | enter activate | q quit",
        NavMode::SliderAdjust => "up/down adjust | enter or esc done",
        NavMode::TextEdit => "type to edit | enter or esc done",
    }
}

/// Screen adapter over a shared [`Page`].
#[derive(Debug)]
pub struct SettingsScreen {
    page: Rc<Page>,
}

impl SettingsScreen {
    pub fn new(page: Rc<Page>) -> Self {
        Self { page }
    }

    fn edit_text<H: FocusHost>(&self, event: &Event, engine: &mut NavEngine<H>) {
        let field = &self.page.name;
        match event {
            Event::Text(text) => {
                field.insert(text);
            }
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Char(c) => {
                    field.insert(c.encode_utf8(&mut [0; 4]));
                }
                KeyCode::Backspace => field.backspace(),
                KeyCode::Enter | KeyCode::Escape => {
                    engine.exit_special_mode();
                    debug!(text = %field.text(), "text edit committed");
                    self.page.set_status(format!("name set to {:?}", field.text()));
                }
                _ => {}
            },
            _ => {}
        }
    }
}

impl<H: FocusHost> Screen<H> for SettingsScreen {
    fn name(&self) -> &str {
        "settings"
    }

    fn items(&self) -> Vec<Rc<dyn FocusableItem>> {
        self.page.controls.iter().map(Control::item).collect()
    }

    fn viewport(&self) -> Option<Rc<dyn ScrollViewport>> {
        Some(self.page.viewport.clone() as Rc<dyn ScrollViewport>)
    }

    fn on_outcome(&mut self, outcome: &NavOutcome, _engine: &mut NavEngine<H>) -> ScreenCmd<H> {
        match outcome {
            NavOutcome::Activated { id: QUIT, .. } => ScreenCmd::Quit,
            NavOutcome::Activated { id: RESET, .. } => {
                self.page.reset();
                self.page.set_status("defaults restored");
                ScreenCmd::Rebuild
            }
            NavOutcome::Activated { id: APPLY, .. } => {
                let summary = self.page.summary();
                info!(presses = self.page.apply.presses(), %summary, "settings applied");
                self.page.set_status(format!("applied: {summary}"));
                ScreenCmd::None
            }
            NavOutcome::ModeChanged { to, .. } => {
                self.page.set_status(format!("{to} mode"));
                ScreenCmd::None
            }
            NavOutcome::Ignored(reason) => {
                debug!(?reason, "input ignored");
                ScreenCmd::None
            }
            _ => ScreenCmd::None,
        }
    }

    fn on_passthrough(&mut self, event: &Event, engine: &mut NavEngine<H>) -> Option<ScreenCmd<H>> {
        match engine.mode() {
            NavMode::TextEdit => {
                self.edit_text(event, engine);
                Some(ScreenCmd::None)
            }
            NavMode::SliderAdjust => match event {
                Event::Key(key) if key.is_press() && key.code == KeyCode::Escape => {
                    engine.exit_special_mode();
                    self.page.set_status(format!("{} mode", NavMode::Normal));
                    Some(ScreenCmd::None)
                }
                _ => None,
            },
            NavMode::Normal => match event {
                Event::Key(key) if key.is_press() && key.code == KeyCode::Char('q') => {
                    Some(ScreenCmd::Quit)
                }
                _ => None,
            },
        }
    }
}
