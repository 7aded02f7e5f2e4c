use std::env::consts::EXE_SUFFIX;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::{AppError, AppResult};

/// Program name under which the wrapper exposes its own commands.
pub const WRAPPER_NAME: &str = "wrapper";

const PROFILE_COMMAND: &str = "profile";
const PASS_THROUGH: &str = "--";

#[derive(Debug, Parser)]
#[command(
    name = "wrapper",
    version,
    about = "Environment profile manager for any binary",
    long_about = "Keeps named sets of environment variables per binary and runs the real \
binary with the active set injected.\n\n\
Example:\n  vault() { wrapper vault \"$@\"; }\n  vault profile create prod\n  \
vault profile set prod\n  vault status"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List binaries that have profiles
    List,
    /// `<binary> [args...]`: manage profiles of, or run, a wrapped binary
    #[command(external_subcommand)]
    Binary(Vec<OsString>),
}

/// `<binary> profile ...` commands.
#[derive(Debug, Parser)]
#[command(about = "Manage environment profiles")]
pub struct ProfileCli {
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<ProfileCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// List profiles, marking the current and default ones
    List,
    /// Create an empty profile
    Create(ProfileNameArgs),
    /// Set the current profile
    Set(ProfileNameArgs),
    /// Print the current profile
    Get(GetArgs),
    /// Set the default profile, used when no current profile is set
    Default(ProfileNameArgs),
    /// Delete a profile
    Delete(ProfileNameArgs),
}

#[derive(Debug, Args)]
pub struct ProfileNameArgs {
    #[arg(help = "Profile name")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    #[arg(long, conflicts_with = "active", help = "Print the default profile instead")]
    pub default: bool,
    #[arg(long, help = "Print the profile a run would use (current, else default)")]
    pub active: bool,
}

/// What a `<binary> args...` invocation asks for.
#[derive(Debug)]
pub enum BinaryAction {
    Profile(ProfileCli),
    Execute(Vec<OsString>),
}

/// Entry point selected from argv.
#[derive(Debug)]
pub enum Invocation {
    Wrapper(Cli),
    Binary {
        binary: String,
        action: BinaryAction,
    },
}

/// Name the process was started as: the file name of argv[0] without the
/// platform executable suffix. Other dots are part of the name.
pub fn invoked_name(argv0: &OsStr) -> Option<String> {
    let name = Path::new(argv0).file_name()?.to_str()?;
    let name = match name.strip_suffix(EXE_SUFFIX) {
        Some(stem) if !EXE_SUFFIX.is_empty() && !stem.is_empty() => stem,
        _ => name,
    };
    Some(name.to_string())
}

/// Splits argv into wrapper commands and wrapped-binary invocations.
///
/// Started as `wrapper`, argv goes through [`Cli`]; any other program name
/// (a symlink to the wrapper) is the wrapped binary itself.
pub fn parse_invocation(args: Vec<OsString>) -> Result<Invocation, clap::Error> {
    let mut args = args.into_iter();
    let Some(argv0) = args.next() else {
        return Cli::try_parse_from([WRAPPER_NAME]).map(Invocation::Wrapper);
    };

    match invoked_name(&argv0) {
        Some(name) if name != WRAPPER_NAME => {
            let action = parse_binary_args(&name, args.collect())?;
            Ok(Invocation::Binary {
                binary: name,
                action,
            })
        }
        _ => Cli::try_parse_from(std::iter::once(argv0).chain(args)).map(Invocation::Wrapper),
    }
}

/// Routes `<binary>` arguments: `profile ...` is ours, a leading `--` is
/// dropped, everything else goes to the wrapped binary untouched.
pub fn parse_binary_args(binary: &str, args: Vec<OsString>) -> Result<BinaryAction, clap::Error> {
    match args.first().and_then(|arg| arg.to_str()) {
        Some(PROFILE_COMMAND) => {
            let bin_name = format!("{binary} {PROFILE_COMMAND}");
            let argv = std::iter::once(OsString::from(bin_name)).chain(args.into_iter().skip(1));
            ProfileCli::try_parse_from(argv).map(BinaryAction::Profile)
        }
        Some(PASS_THROUGH) => Ok(BinaryAction::Execute(args.into_iter().skip(1).collect())),
        _ => Ok(BinaryAction::Execute(args)),
    }
}

/// Splits the external subcommand of [`Cli`] into binary name and arguments.
pub fn split_binary(raw: Vec<OsString>) -> AppResult<(String, Vec<OsString>)> {
    let mut raw = raw.into_iter();
    let binary = raw
        .next()
        .ok_or_else(|| AppError::InvalidInput("binary name not specified".to_string()))?;
    let binary = binary.into_string().map_err(|name| {
        AppError::InvalidInput(format!(
            "binary name {} is not valid UTF-8",
            Path::new(&name).display()
        ))
    })?;

    Ok((binary, raw.collect()))
}
