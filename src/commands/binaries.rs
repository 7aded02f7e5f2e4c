use crate::cli::WRAPPER_NAME;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::text;

pub fn run(ctx: &AppContext) -> AppResult<()> {
    let summaries = ctx.profiles().binary_summaries()?;

    let lines = if summaries.is_empty() {
        vec![
            "No binaries configured yet".to_string(),
            format!("Create a profile with: {WRAPPER_NAME} <binary> profile create <name>"),
        ]
    } else {
        std::iter::once("Configured binaries:".to_string())
            .chain(summaries.iter().map(text::binary_line))
            .collect()
    };

    ctx.output.emit(&lines, &summaries)
}
