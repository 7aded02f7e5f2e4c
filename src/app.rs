use std::ffi::OsString;

use crate::cli::{self, BinaryAction, Cli, Command, Invocation, ProfileCommand};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::telemetry;

enum Target {
    Binaries,
    Profile {
        binary: String,
        command: Option<ProfileCommand>,
    },
    Execute {
        binary: String,
        args: Vec<OsString>,
    },
}

/// Runs one invocation and returns the process exit code.
pub fn run(args: Vec<OsString>) -> AppResult<i32> {
    let (target, json, verbose) = match cli::parse_invocation(args).unwrap_or_else(|err| err.exit())
    {
        Invocation::Wrapper(Cli {
            json,
            verbose,
            command: Command::List,
        }) => (Target::Binaries, json, verbose),
        Invocation::Wrapper(Cli {
            json,
            verbose,
            command: Command::Binary(raw),
        }) => {
            let (binary, args) = cli::split_binary(raw)?;
            let action = cli::parse_binary_args(&binary, args).unwrap_or_else(|err| err.exit());
            binary_target(binary, action, json, verbose)
        }
        Invocation::Binary { binary, action } => binary_target(binary, action, false, 0),
    };

    telemetry::init_tracing(verbose)?;
    let ctx = AppContext::bootstrap(json)?;

    match target {
        Target::Binaries => commands::binaries::run(&ctx).map(|()| 0),
        Target::Profile { binary, command } => {
            commands::profile::run(&ctx, &binary, command).map(|()| 0)
        }
        Target::Execute { binary, args } => commands::exec::run(&ctx, &binary, args),
    }
}

fn binary_target(
    binary: String,
    action: BinaryAction,
    json: bool,
    verbose: u8,
) -> (Target, bool, u8) {
    match action {
        BinaryAction::Profile(profile) => (
            Target::Profile {
                binary,
                command: profile.command,
            },
            json || profile.json,
            verbose.saturating_add(profile.verbose),
        ),
        BinaryAction::Execute(args) => (Target::Execute { binary, args }, json, verbose),
    }
}
