//! Logger set-up for the binary and tests.

use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages (state transitions, planned
/// routes) are printed. Otherwise only info level and above are shown.
/// `RUST_LOG` overrides either default.
///
/// # Errors
/// Returns [`SetLoggerError`] if a logger was already installed. Tests that
/// initialise logging more than once can discard it.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init()
}
