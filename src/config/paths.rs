use std::env;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "wrapper";
pub const CONFIG_DIR_ENV: &str = "WRAPPER_CONFIG_DIR";

pub const PROFILE_EXTENSION: &str = "env";
pub const CURRENT_MARKER: &str = "current.env";
pub const DEFAULT_MARKER: &str = ".default";
#[cfg(not(unix))]
pub const CURRENT_NAME_MARKER: &str = ".current";

/// Filesystem layout of the profile store: one directory per wrapped binary
/// under a single root.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        if let Some(root) = env::var_os(CONFIG_DIR_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::new(root));
        }

        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;

        Ok(Self::new(config_root.join(APP_DIR)))
    }

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn binary_dir(&self, binary: &str) -> PathBuf {
        self.root.join(binary)
    }

    pub fn profile_file(&self, binary: &str, profile: &str) -> PathBuf {
        self.binary_dir(binary)
            .join(format!("{profile}.{PROFILE_EXTENSION}"))
    }

    pub fn current_marker(&self, binary: &str) -> PathBuf {
        self.binary_dir(binary).join(CURRENT_MARKER)
    }

    pub fn default_marker(&self, binary: &str) -> PathBuf {
        self.binary_dir(binary).join(DEFAULT_MARKER)
    }
}

/// Profile name encoded in a `<profile>.env` file name, if it is one.
pub fn profile_name_from_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(PROFILE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_binary_namespace() {
        let paths = AppPaths::new("/cfg/wrapper");
        assert_eq!(
            paths.profile_file("vault", "prod"),
            PathBuf::from("/cfg/wrapper/vault/prod.env")
        );
        assert_eq!(
            paths.current_marker("vault"),
            PathBuf::from("/cfg/wrapper/vault/current.env")
        );
        assert_eq!(
            paths.default_marker("vault"),
            PathBuf::from("/cfg/wrapper/vault/.default")
        );
    }

    #[test]
    fn extracts_profile_name_from_file() {
        assert_eq!(profile_name_from_file("prod.env"), Some("prod"));
        assert_eq!(profile_name_from_file("a.b.env"), Some("a.b"));
        assert_eq!(profile_name_from_file(".env"), None);
        assert_eq!(profile_name_from_file("prodenv"), None);
        assert_eq!(profile_name_from_file("notes.txt"), None);
    }
}
