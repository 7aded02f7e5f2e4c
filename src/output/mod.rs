pub mod json;
pub mod text;

use std::io::{self, IsTerminal};

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        if mode == OutputMode::Text && !io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        Self { mode }
    }

    /// Prints `lines` in text mode or `json_value` in JSON mode.
    pub fn emit<T: Serialize>(&self, lines: &[String], json_value: &T) -> AppResult<()> {
        match self.mode {
            OutputMode::Text => text::print_lines(lines),
            OutputMode::Json => json::print(json_value),
        }
    }
}
