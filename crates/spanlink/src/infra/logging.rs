//! Tracing subscriber setup for the command line shell.

use std::env;

use tracing::Level;

/// Environment variable overriding the verbosity flags, e.g. `SPANLINK_LOG=debug`.
pub const LOG_ENV: &str = "SPANLINK_LOG";

/// Map `-v` occurrences to a maximum level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn level_from_env() -> Option<Level> {
    env::var(LOG_ENV).ok()?.trim().parse().ok()
}

/// Install a stderr subscriber. Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let level = level_from_env().unwrap_or_else(|| level_for(verbosity));
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
