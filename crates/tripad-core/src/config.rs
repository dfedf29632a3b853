#![forbid(unsafe_code)]

//! Shell configuration from environment variables.
//!
//! Only ambient concerns are configurable: logging and which physical keys
//! map onto the three navigation signals. Navigation timing (scroll step,
//! animation duration, focus reclaim interval) is fixed by the engine.
//!
//! | Variable            | Meaning                                    | Default |
//! |---------------------|--------------------------------------------|---------|
//! | `TRIPAD_LOG`        | `tracing` env-filter directive             | `info`  |
//! | `TRIPAD_LOG_FORMAT` | `pretty` or `json`                         | `pretty`|
//! | `TRIPAD_LOG_FILE`   | write logs to this file instead of stderr  | unset   |
//! | `TRIPAD_KEYMAP`     | `up=k,down=j,activate=space` (extends defaults) | arrows + Enter |

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::event::{KeyCode, KeyEvent};
use crate::signal::NavSignal;

pub const ENV_LOG: &str = "TRIPAD_LOG";
pub const ENV_LOG_FORMAT: &str = "TRIPAD_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "TRIPAD_LOG_FILE";
pub const ENV_KEYMAP: &str = "TRIPAD_KEYMAP";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable had a value that could not be interpreted.
    InvalidValue { key: &'static str, value: String },
    /// A keymap entry was not of the form `signal=key`.
    MalformedBinding(String),
    UnknownKey(String),
    UnknownSignal(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
            Self::MalformedBinding(entry) => {
                write!(f, "malformed key binding {entry:?} (expected signal=key)")
            }
            Self::UnknownKey(name) => write!(f, "unknown key name: {name:?}"),
            Self::UnknownSignal(name) => write!(f, "unknown navigation signal: {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "compact" => Some(Self::Pretty),
            "json" | "jsonl" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    #[default]
    Stderr,
    File(PathBuf),
}

/// Logging configuration consumed by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info,tripad_nav=debug`.
    pub filter: String,
    pub format: LogFormat,
    pub target: LogTarget,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            format: LogFormat::Pretty,
            target: LogTarget::Stderr,
        }
    }
}

// ---------------------------------------------------------------------------
// Key map
// ---------------------------------------------------------------------------

/// Physical key → navigation signal table.
///
/// Several keys may map to the same signal. Modifiers are ignored: a shifted
/// arrow is still an arrow on a three-button pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, NavSignal>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyCode::Up, NavSignal::MoveUp);
        map.bind(KeyCode::Down, NavSignal::MoveDown);
        map.bind(KeyCode::Enter, NavSignal::Activate);
        map
    }
}

impl KeyMap {
    /// A map with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `code` to `signal`, replacing any previous binding for `code`.
    pub fn bind(&mut self, code: KeyCode, signal: NavSignal) -> &mut Self {
        self.bindings.insert(code, signal);
        self
    }

    #[must_use]
    pub fn with_binding(mut self, code: KeyCode, signal: NavSignal) -> Self {
        self.bind(code, signal);
        self
    }

    #[must_use]
    pub fn lookup(&self, code: KeyCode) -> Option<NavSignal> {
        self.bindings.get(&code).copied()
    }

    /// Signal for a key event, ignoring its phase and modifiers.
    #[must_use]
    pub fn signal_for(&self, key: &KeyEvent) -> Option<NavSignal> {
        self.lookup(key.code)
    }

    /// Keys bound to `signal`.
    pub fn keys_for(&self, signal: NavSignal) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, s)| **s == signal)
            .map(|(k, _)| *k)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Add bindings from a spec like `up=k,down=j,activate=space`.
    pub fn extend_from_spec(&mut self, spec: &str) -> Result<(), ConfigError> {
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (signal, key) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedBinding(entry.to_string()))?;
            let signal = NavSignal::parse(signal)
                .ok_or_else(|| ConfigError::UnknownSignal(signal.trim().to_string()))?;
            let key =
                KeyCode::parse(key).ok_or_else(|| ConfigError::UnknownKey(key.trim().to_string()))?;
            self.bind(key, signal);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shell config
// ---------------------------------------------------------------------------

/// Everything the shell reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellConfig {
    pub log: LogConfig,
    pub keymap: KeyMap,
}

impl ShellConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read configuration through a custom lookup (for tests and embedding).
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = get_env(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log.filter = filter.trim().to_string();
        }
        if let Some(format) = get_env(ENV_LOG_FORMAT) {
            config.log.format = LogFormat::parse(&format).ok_or(ConfigError::InvalidValue {
                key: ENV_LOG_FORMAT,
                value: format,
            })?;
        }
        if let Some(path) = get_env(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            config.log.target = LogTarget::File(PathBuf::from(path));
        }
        if let Some(spec) = get_env(ENV_KEYMAP) {
            config.keymap.extend_from_spec(&spec)?;
        }

        Ok(config)
    }
}
