//! Logging setup. Everything goes to stderr so a wrapped binary's stdout is
//! passed through untouched.

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AppError, AppResult};

/// Overrides the verbosity flags with an `EnvFilter` directive, e.g. `wrapper=debug`.
pub const LOG_ENV: &str = "WRAPPER_LOG";

pub fn init_tracing(verbose: u8) -> AppResult<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AppError::Config(format!("failed to initialize logging: {err}")))
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
