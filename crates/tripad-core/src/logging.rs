#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! Engine code logs through the `tracing` macros re-exported here. Binaries
//! call [`init`] once at startup to install a `tracing-subscriber` fmt
//! subscriber; libraries and tests never install one implicitly.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat, LogTarget};

pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Failure to install the global subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directive did not parse.
    Filter(String),
    /// The log file could not be opened.
    File(std::io::Error),
    /// A global subscriber is already installed.
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::File(err) => write!(f, "cannot open log file: {err}"),
            Self::AlreadyInitialized(msg) => write!(f, "logging already initialized: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::File(err) => Some(err),
            _ => None,
        }
    }
}

/// Build the env filter for `config`.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(&config.filter).map_err(|e| LoggingError::Filter(e.to_string()))
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match (&config.target, config.format) {
        (LogTarget::Stderr, LogFormat::Pretty) => {
            builder.with_writer(std::io::stderr).compact().try_init()
        }
        (LogTarget::Stderr, LogFormat::Json) => {
            builder.with_writer(std::io::stderr).json().try_init()
        }
        (LogTarget::File(path), format) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(LoggingError::File)?;
            let writer = Mutex::new(file);
            match format {
                LogFormat::Pretty => builder.with_writer(writer).with_ansi(false).try_init(),
                LogFormat::Json => builder.with_writer(writer).json().try_init(),
            }
        }
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
