#![forbid(unsafe_code)]

//! Raw input events delivered by the host platform.
//!
//! These are the values a host pushes into the shell before any
//! normalization. The router maps a small subset of key presses onto
//! [`NavSignal`](crate::signal::NavSignal)s and passes everything else
//! through unchanged.

use bitflags::bitflags;

/// A key identifier, independent of any terminal or windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    /// A printable character.
    Char(char),
    /// Function key `F1`..`F24`.
    F(u8),
}

impl KeyCode {
    /// Parse a key name as used in keymap configuration.
    ///
    /// Accepts named keys (`up`, `down`, `enter`, `space`, `esc`, ...), a
    /// single character, or `f1`..`f24`. Matching is case-insensitive for
    /// named keys.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self::Char(c));
        }
        let lower = trimmed.to_ascii_lowercase();
        let code = match lower.as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" => Self::Tab,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            "space" => Self::Char(' '),
            other => {
                let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
                if (1..=24).contains(&n) {
                    Self::F(n)
                } else {
                    return None;
                }
            }
        };
        Some(code)
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    /// Auto-repeat while the key is held.
    Repeat,
    Release,
}

/// A single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Press or auto-repeat.
    #[must_use]
    pub fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Canonical input event fed to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The shell window gained platform input focus.
    FocusGained,
    /// The shell window lost platform input focus.
    FocusLost,
    /// Text committed by an input method (passed through to text controls).
    Text(String),
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Event::Key(key)
    }
}

impl From<KeyCode> for Event {
    fn from(code: KeyCode) -> Self {
        Event::Key(KeyEvent::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_keys() {
        assert_eq!(KeyCode::parse("Up"), Some(KeyCode::Up));
        assert_eq!(KeyCode::parse("ENTER"), Some(KeyCode::Enter));
        assert_eq!(KeyCode::parse("space"), Some(KeyCode::Char(' ')));
        assert_eq!(KeyCode::parse("esc"), Some(KeyCode::Escape));
    }

    #[test]
    fn parse_single_char_is_case_sensitive() {
        assert_eq!(KeyCode::parse("k"), Some(KeyCode::Char('k')));
        assert_eq!(KeyCode::parse("K"), Some(KeyCode::Char('K')));
    }

    #[test]
    fn parse_function_keys() {
        assert_eq!(KeyCode::parse("f5"), Some(KeyCode::F(5)));
        assert_eq!(KeyCode::parse("F24"), Some(KeyCode::F(24)));
        assert_eq!(KeyCode::parse("f0"), None);
        assert_eq!(KeyCode::parse("f25"), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(KeyCode::parse("banana"), None);
        assert_eq!(KeyCode::parse(""), None);
    }

    #[test]
    fn repeat_counts_as_press() {
        let key = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Repeat);
        assert!(key.is_press());
        let key = key.with_kind(KeyEventKind::Release);
        assert!(!key.is_press());
    }

    #[test]
    fn key_code_into_event() {
        let event: Event = KeyCode::Enter.into();
        assert_eq!(event, Event::Key(KeyEvent::new(KeyCode::Enter)));
    }
}
