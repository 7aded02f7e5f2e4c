use std::ffi::OsString;

use crate::binary::PathBinaryResolver;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::services::ExecutorService;

/// Runs the real `binary` under its active profile and returns its exit code.
pub fn run(ctx: &AppContext, binary: &str, args: Vec<OsString>) -> AppResult<i32> {
    let resolver = PathBinaryResolver::new()?;
    ExecutorService::new(&ctx.repository, &resolver).execute(binary, args)
}
