#![forbid(unsafe_code)]

//! tripad demo binary entry point.

use tripad_core::config::ShellConfig;
use tripad_core::logging;
use tripad_demo::{cli, term};

fn main() {
    let opts = cli::Opts::parse();

    let shell = match ShellConfig::from_env() {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let log = opts.apply_to(shell.log.clone());
    if let Err(e) = logging::init(&log) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = term::run(&opts, shell.keymap) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
