use colored::Colorize;

use crate::error::AppResult;
use crate::services::{BinarySummary, ProfileSummary};

pub fn print_lines(lines: &[String]) -> AppResult<()> {
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub fn profile_line(summary: &ProfileSummary) -> String {
    let count = format!("({} env vars)", summary.variables);
    match (summary.current, summary.default) {
        (true, true) => format!(
            "  {} {} {count} {}",
            "✓".green(),
            summary.name.green(),
            "[current, default]".yellow()
        ),
        (true, false) => format!(
            "  {} {} {count} {}",
            "✓".green(),
            summary.name.green(),
            "[current]".yellow()
        ),
        (false, true) => format!(
            "  {} {} {count} {}",
            "●".yellow(),
            summary.name,
            "[default]".yellow()
        ),
        (false, false) => format!("  - {} {count}", summary.name),
    }
}

pub fn binary_line(summary: &BinarySummary) -> String {
    match (summary.profiles, summary.current.as_deref()) {
        (0, _) => format!("  - {} (no profiles)", summary.binary),
        (1, Some(current)) => format!("  - {} (1 profile, current: {current})", summary.binary),
        (1, None) => format!("  - {} (1 profile)", summary.binary),
        (count, Some(current)) => {
            format!("  - {} ({count} profiles, current: {current})", summary.binary)
        }
        (count, None) => format!("  - {} ({count} profiles)", summary.binary),
    }
}
