use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::cli::ProfileCommand;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::text;

#[derive(Debug, Serialize)]
struct ProfileChange<'a> {
    binary: &'a str,
    profile: &'a str,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CurrentProfile<'a> {
    binary: &'a str,
    profile: &'a str,
}

pub fn run(ctx: &AppContext, binary: &str, command: Option<ProfileCommand>) -> AppResult<()> {
    let service = ctx.profiles();

    match command.unwrap_or(ProfileCommand::List) {
        ProfileCommand::List => list(ctx, binary),
        ProfileCommand::Create(args) => {
            let profile = service.create_profile(&args.name, binary)?;
            let path = ctx.paths.profile_file(binary, profile.name());
            let lines = [
                format!("✓ Profile '{}' created for {binary}", profile.name()),
                format!("  Edit at: {}", path.display()),
                format!("  Set as current: {binary} profile set {}", profile.name()),
            ];
            let created = ProfileChange {
                binary,
                profile: profile.name(),
                action: "created",
                path: Some(path),
            };
            ctx.output.emit(&lines, &created)
        }
        ProfileCommand::Set(args) => {
            service.set_current_profile(&args.name, binary)?;
            let lines = [format!(
                "✓ Current profile set to '{}' for {binary}",
                args.name
            )];
            ctx.output
                .emit(&lines, &change(binary, &args.name, "set-current"))
        }
        ProfileCommand::Get(args) => {
            let name = if args.default {
                service.get_default_profile(binary)?
            } else if args.active {
                service.get_active_profile(binary)?.name().to_string()
            } else {
                service.get_current_profile(binary)?
            };
            let current = CurrentProfile {
                binary,
                profile: &name,
            };
            ctx.output.emit(&[name.clone()], &current)
        }
        ProfileCommand::Default(args) => {
            service.set_default_profile(&args.name, binary)?;
            let lines = [format!(
                "✓ Default profile set to '{}' for {binary}",
                args.name
            )];
            ctx.output
                .emit(&lines, &change(binary, &args.name, "set-default"))
        }
        ProfileCommand::Delete(args) => {
            service.delete_profile(&args.name, binary)?;
            let lines = [format!("✓ Profile '{}' deleted for {binary}", args.name)];
            ctx.output
                .emit(&lines, &change(binary, &args.name, "deleted"))
        }
    }
}

fn list(ctx: &AppContext, binary: &str) -> AppResult<()> {
    let summaries = ctx.profiles().profile_summaries(binary)?;

    let lines = if summaries.is_empty() {
        vec![
            format!("No profiles found for {binary}"),
            format!("Create one with: {binary} profile create <name>"),
        ]
    } else {
        std::iter::once(format!("Profiles for {binary}:").cyan().to_string())
            .chain(summaries.iter().map(text::profile_line))
            .collect()
    };

    ctx.output.emit(&lines, &summaries)
}

fn change<'a>(binary: &'a str, profile: &'a str, action: &'static str) -> ProfileChange<'a> {
    ProfileChange {
        binary,
        profile,
        action,
        path: None,
    }
}
