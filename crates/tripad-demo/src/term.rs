#![forbid(unsafe_code)]

//! Crossterm bridge: event conversion, focus ownership, and the draw loop.
//!
//! # Failure Modes
//!
//! - Terminal I/O errors end the loop and are returned to `main`.
//! - [`TerminalGuard`] restores cooked mode on drop, including early returns.
//!   With the release profile's `panic = "abort"` a panic skips the restore.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self as ct, DisableFocusChange, EnableFocusChange, Event as CtEvent, KeyCode as CtKeyCode,
    KeyEvent as CtKeyEvent, KeyEventKind as CtKeyEventKind, KeyModifiers,
};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, info, trace, warn};
use tripad_core::config::KeyMap;
use tripad_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use tripad_nav::{FocusHost, NavEngine};
use tripad_runtime::ShellRunner;
use web_time::Instant;

use crate::cli::Opts;
use crate::settings::{Page, SettingsScreen};

/// Rows taken by the header and the two footer lines.
const CHROME_ROWS: u16 = 3;
/// Keep the page window short so scrolling is always visible.
pub const MAX_WINDOW_ROWS: usize = 6;

/// A crossterm event after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    Shell(Event),
    Resize { cols: u16, rows: u16 },
    /// Ctrl-C: raw mode delivers it as a key, not a signal.
    Interrupt,
    Ignored,
}

/// Map a crossterm event onto the shell's event model.
pub fn convert(event: CtEvent) -> Converted {
    match event {
        CtEvent::Key(key) => convert_key(key),
        CtEvent::FocusGained => Converted::Shell(Event::FocusGained),
        CtEvent::FocusLost => Converted::Shell(Event::FocusLost),
        CtEvent::Paste(text) => Converted::Shell(Event::Text(text)),
        CtEvent::Resize(cols, rows) => Converted::Resize { cols, rows },
        _ => Converted::Ignored,
    }
}

fn convert_key(key: CtKeyEvent) -> Converted {
    if key.code == CtKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Converted::Interrupt;
    }
    let Some(code) = convert_code(key.code) else {
        trace!(code = ?key.code, "unmapped terminal key");
        return Converted::Ignored;
    };
    let kind = match key.kind {
        CtKeyEventKind::Press => KeyEventKind::Press,
        CtKeyEventKind::Repeat => KeyEventKind::Repeat,
        CtKeyEventKind::Release => KeyEventKind::Release,
    };
    let event = KeyEvent::new(code)
        .with_kind(kind)
        .with_modifiers(convert_modifiers(key.modifiers));
    Converted::Shell(Event::Key(event))
}

fn convert_code(code: CtKeyCode) -> Option<KeyCode> {
    let code = match code {
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(code)
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(Modifiers::SUPER, mods.contains(KeyModifiers::SUPER));
    out
}

/// Terminal focus as seen through focus-change reporting.
///
/// A terminal program cannot take OS focus back. Claiming re-enables focus
/// reporting so the next `FocusGained` is observed, and records the claim.
#[derive(Debug)]
pub struct TermHost<W: Write> {
    out: W,
    focused: bool,
    claims: u32,
}

impl<W: Write> TermHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            focused: true,
            claims: 0,
        }
    }

    /// Track focus reports before the router sees them.
    pub fn observe(&mut self, event: &Event) {
        match event {
            Event::FocusGained => self.focused = true,
            Event::FocusLost => self.focused = false,
            _ => {}
        }
    }

    pub fn claims(&self) -> u32 {
        self.claims
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> FocusHost for TermHost<W> {
    fn has_input_focus(&self) -> bool {
        self.focused
    }

    fn claim_input_focus(&mut self) {
        self.claims += 1;
        if let Err(err) = execute!(self.out, EnableFocusChange) {
            warn!(error = %err, "cannot re-enable focus reporting");
        }
        self.focused = true;
    }
}

/// Page window height for a terminal of `term_rows` rows.
#[must_use]
pub fn window_rows(term_rows: u16) -> usize {
    usize::from(term_rows.saturating_sub(CHROME_ROWS)).clamp(1, MAX_WINDOW_ROWS)
}

/// Raw mode, alternate screen, and focus reporting for the guard's lifetime.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, EnableFocusChange, Clear(ClearType::All))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), DisableFocusChange, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

fn draw(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row), Print(line))?;
    }
    out.flush()
}

/// Run the demo until Quit, `q`, or Ctrl-C.
pub fn run(opts: &Opts, keymap: KeyMap) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (_, term_rows) = terminal::size()?;
    let page = Page::new(opts.items, window_rows(term_rows));

    let _guard = TerminalGuard::enter(&mut stdout)?;
    let start = Instant::now();
    let engine = NavEngine::new(keymap, TermHost::new(io::stdout()), Duration::ZERO);
    let screen = SettingsScreen::new(page.clone());
    let mut runner = ShellRunner::new(engine, Box::new(screen), Duration::ZERO);
    let tick = Duration::from_millis(opts.tick_ms);
    info!(items = page.controls().len(), tick_ms = opts.tick_ms, "demo started");

    let mut last: Vec<String> = Vec::new();
    while runner.is_running() {
        if ct::poll(tick)? {
            loop {
                match convert(ct::read()?) {
                    Converted::Shell(event) => {
                        runner.engine_mut().router_mut().host_mut().observe(&event);
                        runner.push_event(event);
                    }
                    Converted::Resize { rows, .. } => {
                        page.viewport().resize(window_rows(rows));
                        last.clear();
                    }
                    Converted::Interrupt => {
                        info!("interrupted");
                        return Ok(());
                    }
                    Converted::Ignored => {}
                }
                if !ct::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let result = runner.step(start.elapsed());
        for event in runner.drain_passthrough() {
            trace!(?event, "unhandled input");
        }
        if result.reclaimed {
            debug!(claims = runner.engine().router().host().claims(), "focus re-claimed");
        }

        let lines = page.render(runner.engine().mode());
        if lines != last {
            draw(&mut stdout, &lines)?;
            last = lines;
        }
    }

    info!(summary = %page.summary(), "demo finished");
    Ok(())
}
