use std::io::{self, Write};

use serde::Serialize;

use crate::error::{AppError, AppResult};

pub fn print<T: Serialize>(value: &T) -> AppResult<()> {
    let payload = serde_json::to_string_pretty(value)?;
    writeln!(io::stdout().lock(), "{payload}").map_err(|source| AppError::Io {
        action: "write",
        path: "stdout".into(),
        source,
    })
}
