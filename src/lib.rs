pub mod app;
pub mod binary;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod profile;
pub mod services;
pub mod telemetry;

use std::ffi::OsString;

use error::AppResult;

/// Runs the wrapper for a full argv (including argv[0]) and returns the exit code.
pub fn run(args: Vec<OsString>) -> AppResult<i32> {
    app::run(args)
}
