#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo shell.
//!
//! Flags override `TRIPAD_DEMO_*` environment variables, which in turn
//! override the shell-wide `TRIPAD_*` logging configuration.

use std::env;
use std::path::PathBuf;
use std::process;

use tripad_core::config::{LogConfig, LogFormat, LogTarget};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
tripad demo: three-button navigation in a terminal

USAGE:
    tripad-demo [OPTIONS]

OPTIONS:
    --log-file=PATH      Append logs to PATH (stderr is taken by the UI)
    --log-format=FMT     Log format: 'pretty' or 'json' (default: pretty)
    --log-level=FILTER   tracing filter directive, e.g. 'debug,tripad_nav=trace'
    --tick-ms=N          Input poll / animation tick in ms (default: 16)
    --items=N            Extra filler buttons below the settings (default: 6)
    --help, -h           Show this help message
    --version, -V        Show version

KEYS:
    Up / Down            Move focus (wraps, scrolls at the edges)
    Enter                Activate the focused control
    q                    Quit (outside text editing)

ENVIRONMENT:
    TRIPAD_DEMO_LOG_FILE, TRIPAD_DEMO_LOG_FORMAT, TRIPAD_DEMO_LOG_LEVEL,
    TRIPAD_DEMO_TICK_MS, TRIPAD_DEMO_ITEMS, and TRIPAD_KEYMAP for bindings.";

/// Upper bound for `--items`; more would only test the terminal.
pub const MAX_ITEMS: usize = 200;

/// Parsed demo options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub log_file: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    pub log_level: Option<String>,
    pub tick_ms: u64,
    pub items: usize,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            log_file: None,
            log_format: None,
            log_level: None,
            tick_ms: 16,
            items: 6,
        }
    }
}

#[derive(Debug)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or bad input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("tripad-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; bad env values are ignored rather than fatal.
        if let Some(val) = get_env("TRIPAD_DEMO_LOG_FILE")
            && !val.trim().is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = get_env("TRIPAD_DEMO_LOG_FORMAT") {
            opts.log_format = LogFormat::parse(&val);
        }
        if let Some(val) = get_env("TRIPAD_DEMO_LOG_LEVEL")
            && !val.trim().is_empty()
        {
            opts.log_level = Some(val.trim().to_string());
        }
        if let Some(val) = get_env("TRIPAD_DEMO_TICK_MS")
            && let Ok(n) = val.parse::<u64>()
            && n > 0
        {
            opts.tick_ms = n;
        }
        if let Some(val) = get_env("TRIPAD_DEMO_ITEMS")
            && let Ok(n) = val.parse::<usize>()
        {
            opts.items = n.min(MAX_ITEMS);
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--log-file=") {
                        if val.trim().is_empty() {
                            return Err(ParseError::InvalidValue {
                                flag: "--log-file",
                                value: val.to_string(),
                            });
                        }
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-format=") {
                        match LogFormat::parse(val) {
                            Some(format) => opts.log_format = Some(format),
                            None => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--log-format",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log-level=") {
                        if !val.trim().is_empty() {
                            opts.log_level = Some(val.trim().to_string());
                        }
                    } else if let Some(val) = other.strip_prefix("--tick-ms=") {
                        match val.parse::<u64>() {
                            Ok(n) if n > 0 => opts.tick_ms = n,
                            _ => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--tick-ms",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--items=") {
                        match val.parse::<usize>() {
                            Ok(n) if n <= MAX_ITEMS => opts.items = n,
                            _ => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--items",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }

    /// Layer these options over the environment-derived log config.
    ///
    /// Logs default to a file when none is configured: the terminal belongs
    /// to the UI while raw mode is on.
    #[must_use]
    pub fn apply_to(&self, mut log: LogConfig) -> LogConfig {
        if let Some(path) = &self.log_file {
            log.target = LogTarget::File(path.clone());
        }
        if let Some(format) = self.log_format {
            log.format = format;
        }
        if let Some(level) = &self.log_level {
            log.filter = level.clone();
        }
        if log.target == LogTarget::Stderr {
            log.target = LogTarget::File(PathBuf::from("tripad-demo.log"));
        }
        log
    }
}
