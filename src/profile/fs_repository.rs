use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::AppPaths;
use crate::config::paths::{self, CURRENT_MARKER};
use crate::error::{AppError, AppResult, io_error};

use super::envfile;
use super::model::{Profile, validate_binary_name, validate_profile_name};
use super::repository::ProfileRepository;

/// Profiles stored as `<root>/<binary>/<profile>.env`.
///
/// The current selection is a `current.env` symlink to the profile file and
/// the default selection is a `.default` file holding the profile name. Both
/// markers are swapped in with a rename so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct FileProfileRepository {
    paths: AppPaths,
}

impl FileProfileRepository {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    fn ensure_exists(&self, name: &str, binary: &str) -> AppResult<()> {
        if self.exists(name, binary)? {
            Ok(())
        } else {
            Err(AppError::profile_not_found(name, binary))
        }
    }

    #[cfg(unix)]
    fn current_name(&self, binary: &str) -> AppResult<Option<String>> {
        let marker = self.paths.current_marker(binary);
        let target = match fs::read_link(&marker) {
            Ok(target) => target,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error("read current marker", &marker)(err)),
        };

        let name = target
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(paths::profile_name_from_file)
            .map(str::to_string);

        if name.is_none() {
            warn!(binary, target = %target.display(), "current marker does not point at a profile file");
        }

        Ok(name)
    }

    #[cfg(not(unix))]
    fn current_name(&self, binary: &str) -> AppResult<Option<String>> {
        let marker = self.paths.binary_dir(binary).join(paths::CURRENT_NAME_MARKER);
        read_name_marker(&marker)
    }

    #[cfg(unix)]
    fn write_current_marker(&self, name: &str, binary: &str) -> AppResult<()> {
        use std::os::unix::fs::symlink;

        let marker = self.paths.current_marker(binary);
        let staging = self
            .paths
            .binary_dir(binary)
            .join(format!(".{CURRENT_MARKER}.{}.tmp", std::process::id()));

        match fs::remove_file(&staging) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(io_error("remove stale marker", &staging)(err)),
        }

        // Relative target keeps the link valid if the config root moves.
        let target = format!("{name}.{}", paths::PROFILE_EXTENSION);
        symlink(&target, &staging).map_err(io_error("create current marker", &staging))?;
        if let Err(err) = fs::rename(&staging, &marker) {
            let _ = fs::remove_file(&staging);
            return Err(io_error("replace current marker", &marker)(err));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn write_current_marker(&self, name: &str, binary: &str) -> AppResult<()> {
        let marker = self.paths.binary_dir(binary).join(paths::CURRENT_NAME_MARKER);
        write_atomic(&marker, &format!("{name}\n"))
    }

    #[cfg(unix)]
    fn clear_current_marker(&self, binary: &str) -> AppResult<()> {
        remove_if_present(&self.paths.current_marker(binary))
    }

    #[cfg(not(unix))]
    fn clear_current_marker(&self, binary: &str) -> AppResult<()> {
        remove_if_present(&self.paths.binary_dir(binary).join(paths::CURRENT_NAME_MARKER))
    }

    fn default_name(&self, binary: &str) -> AppResult<Option<String>> {
        read_name_marker(&self.paths.default_marker(binary))
    }

    /// Resolves a marker's profile name, treating a stale or malformed name as unset.
    fn resolve_marker(
        &self,
        name: Option<String>,
        binary: &str,
        unset: fn(&str) -> AppError,
    ) -> AppResult<Profile> {
        let Some(name) = name else {
            return Err(unset(binary));
        };

        if let Err(err) = validate_profile_name(&name) {
            warn!(binary, profile = %name, "ignoring marker: {err}");
            return Err(unset(binary));
        }

        match self.find_by_name(&name, binary) {
            Err(AppError::ProfileNotFound { .. }) => {
                debug!(binary, profile = %name, "marker references a missing profile");
                Err(unset(binary))
            }
            result => result,
        }
    }
}

impl ProfileRepository for FileProfileRepository {
    fn save(&self, profile: &Profile) -> AppResult<()> {
        let dir = self.paths.binary_dir(profile.binary());
        fs::create_dir_all(&dir).map_err(io_error("create directory", &dir))?;

        let path = self.paths.profile_file(profile.binary(), profile.name());
        let header = format!(
            "{} profile '{}'\nOne KEY=VALUE assignment per line; lines starting with # are ignored.",
            profile.binary(),
            profile.name()
        );
        write_atomic(&path, &envfile::render(&header, profile.environment()))?;

        debug!(binary = profile.binary(), profile = profile.name(), path = %path.display(), "saved profile");
        Ok(())
    }

    fn find_by_name(&self, name: &str, binary: &str) -> AppResult<Profile> {
        validate_binary_name(binary)?;
        validate_profile_name(name)?;

        let path = self.paths.profile_file(binary, name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::profile_not_found(name, binary));
            }
            Err(err) => return Err(io_error("read profile", &path)(err)),
        };

        Profile::new(name, binary, envfile::parse(&raw))
    }

    fn list(&self, binary: &str) -> AppResult<Vec<Profile>> {
        validate_binary_name(binary)?;

        let dir = self.paths.binary_dir(binary);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error("read directory", &dir)(err)),
        };

        let mut profiles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error("read directory", &dir))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if file_name == CURRENT_MARKER || file_name.starts_with('.') {
                continue;
            }

            let Some(name) = paths::profile_name_from_file(file_name) else {
                continue;
            };

            if !entry.path().is_file() {
                continue;
            }

            if let Err(err) = validate_profile_name(name) {
                warn!(binary, file = file_name, "skipping profile file: {err}");
                continue;
            }

            match self.find_by_name(name, binary) {
                Ok(profile) => profiles.push(profile),
                Err(err @ (AppError::InvalidInput(_) | AppError::Io { .. })) => {
                    warn!(binary, file = file_name, "skipping unreadable profile: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        profiles.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(profiles)
    }

    fn list_binaries(&self) -> AppResult<Vec<String>> {
        let root = self.paths.root();
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error("read directory", root)(err)),
        };

        let mut binaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error("read directory", root))?;
            if !entry.path().is_dir() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if validate_binary_name(name).is_ok() {
                    binaries.push(name.to_string());
                }
            }
        }

        binaries.sort();
        Ok(binaries)
    }

    fn delete(&self, name: &str, binary: &str) -> AppResult<()> {
        validate_binary_name(binary)?;
        validate_profile_name(name)?;

        let path = self.paths.profile_file(binary, name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::profile_not_found(name, binary));
            }
            Err(err) => return Err(io_error("delete profile", &path)(err)),
        }

        if self.current_name(binary)?.as_deref() == Some(name) {
            debug!(binary, profile = name, "clearing current marker of deleted profile");
            self.clear_current_marker(binary)?;
        }

        if self.default_name(binary)?.as_deref() == Some(name) {
            debug!(binary, profile = name, "clearing default marker of deleted profile");
            remove_if_present(&self.paths.default_marker(binary))?;
        }

        Ok(())
    }

    fn set_current(&self, name: &str, binary: &str) -> AppResult<()> {
        self.ensure_exists(name, binary)?;
        self.write_current_marker(name, binary)?;
        debug!(binary, profile = name, "current profile updated");
        Ok(())
    }

    fn get_current(&self, binary: &str) -> AppResult<Profile> {
        validate_binary_name(binary)?;
        let name = self.current_name(binary)?;
        self.resolve_marker(name, binary, AppError::no_current_profile)
    }

    fn set_default(&self, name: &str, binary: &str) -> AppResult<()> {
        self.ensure_exists(name, binary)?;
        write_atomic(&self.paths.default_marker(binary), &format!("{name}\n"))?;
        debug!(binary, profile = name, "default profile updated");
        Ok(())
    }

    fn get_default(&self, binary: &str) -> AppResult<Profile> {
        validate_binary_name(binary)?;
        let name = self.default_name(binary)?;
        self.resolve_marker(name, binary, AppError::no_default_profile)
    }
}

fn read_name_marker(path: &Path) -> AppResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let name = raw.trim();
            Ok((!name.is_empty()).then(|| name.to_string()))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error("read marker", path)(err)),
    }
}

/// Writes through a temporary file in the same directory, then renames it over
/// `path`. The result is readable only by the owner.
fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file =
        NamedTempFile::new_in(dir).map_err(io_error("create temporary file in", dir))?;
    file.write_all(contents.as_bytes())
        .map_err(io_error("write", file.path()))?;
    file.persist(path)
        .map_err(|err| io_error("write", path)(err.error))?;
    Ok(())
}

fn remove_if_present(path: &Path) -> AppResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_error("remove", path)(err)),
    }
}
