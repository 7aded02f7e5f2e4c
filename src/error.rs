use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("profile '{profile}' not found for binary '{binary}'")]
    ProfileNotFound { profile: String, binary: String },
    #[error("profile '{profile}' for binary '{binary}' already exists")]
    ProfileAlreadyExists { profile: String, binary: String },
    #[error("no current profile set for binary '{binary}'")]
    NoCurrentProfile { binary: String },
    #[error("no default profile set for binary '{binary}'")]
    NoDefaultProfile { binary: String },
    #[error(
        "no active profile for binary '{binary}': create one with `{binary} profile create <name>` and activate it with `{binary} profile set <name>`"
    )]
    NoActiveProfile { binary: String },
    #[error("binary '{binary}' not found in PATH")]
    BinaryNotFound { binary: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to execute {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn profile_not_found(profile: &str, binary: &str) -> Self {
        Self::ProfileNotFound {
            profile: profile.to_string(),
            binary: binary.to_string(),
        }
    }

    pub fn no_current_profile(binary: &str) -> Self {
        Self::NoCurrentProfile {
            binary: binary.to_string(),
        }
    }

    pub fn no_default_profile(binary: &str) -> Self {
        Self::NoDefaultProfile {
            binary: binary.to_string(),
        }
    }

    /// True for the "marker not set" sentinels that active-profile resolution
    /// falls back on.
    pub fn is_unset_marker(&self) -> bool {
        matches!(
            self,
            Self::NoCurrentProfile { .. } | Self::NoDefaultProfile { .. }
        )
    }
}

/// Builds a `map_err` adapter that wraps an I/O failure with the operation and
/// path it concerned.
pub fn io_error<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> AppError + 'a {
    move |source| AppError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
