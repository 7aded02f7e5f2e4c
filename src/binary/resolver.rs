use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult, io_error};

/// Locates the real executable behind a wrapped binary name.
pub trait BinaryResolver {
    /// Fails with [`AppError::BinaryNotFound`] when nothing other than the
    /// wrapper itself answers to `binary`.
    fn resolve(&self, binary: &str) -> AppResult<PathBuf>;
}

/// Searches `PATH` in order, skipping any candidate that is the wrapper.
#[derive(Debug, Clone)]
pub struct PathBinaryResolver {
    wrapper_path: PathBuf,
    search_path: Option<OsString>,
}

impl PathBinaryResolver {
    pub fn new() -> AppResult<Self> {
        let exe = env::current_exe().map_err(|source| AppError::Io {
            action: "locate",
            path: PathBuf::from("wrapper executable"),
            source,
        })?;
        let wrapper_path = fs::canonicalize(&exe).map_err(io_error("resolve", &exe))?;

        Ok(Self {
            wrapper_path,
            search_path: env::var_os("PATH"),
        })
    }

    /// Resolver with an explicit wrapper location and search path.
    pub fn with_search_path(wrapper_path: impl AsRef<Path>, search_path: Option<OsString>) -> Self {
        let wrapper_path = wrapper_path.as_ref();
        Self {
            wrapper_path: fs::canonicalize(wrapper_path)
                .unwrap_or_else(|_| wrapper_path.to_path_buf()),
            search_path,
        }
    }

    pub fn wrapper_path(&self) -> &Path {
        &self.wrapper_path
    }

    fn is_wrapper(&self, candidate: &Path) -> bool {
        match fs::canonicalize(candidate) {
            Ok(real) => real == self.wrapper_path,
            Err(_) => true,
        }
    }

    fn search(&self, binary: &str, search_path: &OsString) -> Option<PathBuf> {
        for dir in env::split_paths(search_path) {
            if dir.as_os_str().is_empty() {
                continue;
            }

            let candidate = dir.join(binary);
            if !is_executable_file(&candidate) {
                continue;
            }

            if self.is_wrapper(&candidate) {
                debug!(candidate = %candidate.display(), "skipping wrapper in search path");
                continue;
            }

            return Some(candidate);
        }

        None
    }

    fn lookup(&self, binary: &str, search_path: &OsString) -> Option<PathBuf> {
        let cwd = env::current_dir().ok()?;
        let found = which::which_in(binary, Some(search_path), cwd).ok()?;
        if self.is_wrapper(&found) {
            debug!(candidate = %found.display(), "lookup only found the wrapper");
            return None;
        }

        Some(found)
    }
}

impl BinaryResolver for PathBinaryResolver {
    fn resolve(&self, binary: &str) -> AppResult<PathBuf> {
        let not_found = || AppError::BinaryNotFound {
            binary: binary.to_string(),
        };

        let Some(search_path) = self.search_path.as_ref().filter(|path| !path.is_empty()) else {
            return Err(not_found());
        };

        let resolved = self
            .search(binary, search_path)
            .or_else(|| self.lookup(binary, search_path))
            .ok_or_else(not_found)?;

        debug!(binary, path = %resolved.display(), "resolved real binary");
        Ok(resolved)
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::{PermissionsExt, symlink};

    use tempfile::{TempDir, tempdir};

    use super::*;

    fn executable(dir: &Path, name: &str) -> PathBuf {
        fs::create_dir_all(dir).expect("mkdir");
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    fn search_path<P: AsRef<Path>>(dirs: &[P]) -> Option<OsString> {
        Some(env::join_paths(dirs.iter().map(|dir| dir.as_ref())).expect("join paths"))
    }

    struct Layout {
        _temp: TempDir,
        wrapper: PathBuf,
        shims: PathBuf,
        first: PathBuf,
        second: PathBuf,
    }

    fn layout() -> Layout {
        let temp = tempdir().expect("tempdir");
        let wrapper = executable(&temp.path().join("install"), "wrapper");
        let shims = temp.path().join("shims");
        fs::create_dir_all(&shims).expect("mkdir");
        symlink(&wrapper, shims.join("demo")).expect("symlink");

        Layout {
            wrapper,
            shims,
            first: temp.path().join("first"),
            second: temp.path().join("second"),
            _temp: temp,
        }
    }

    #[test]
    fn returns_first_match_in_search_order() {
        let layout = layout();
        let first = executable(&layout.first, "demo");
        executable(&layout.second, "demo");

        let resolver = PathBinaryResolver::with_search_path(
            &layout.wrapper,
            search_path(&[&layout.first, &layout.second]),
        );
        assert_eq!(resolver.resolve("demo").expect("resolve"), first);
    }

    #[test]
    fn skips_the_wrapper_symlink() {
        let layout = layout();
        let real = executable(&layout.second, "demo");

        let resolver = PathBinaryResolver::with_search_path(
            &layout.wrapper,
            search_path(&[&layout.shims, &layout.second]),
        );
        assert_eq!(resolver.resolve("demo").expect("resolve"), real);
    }

    #[test]
    fn wrapper_alone_is_not_found() {
        let layout = layout();

        let resolver =
            PathBinaryResolver::with_search_path(&layout.wrapper, search_path(&[&layout.shims]));
        let err = resolver.resolve("demo").expect_err("only the wrapper is on PATH");
        assert!(matches!(err, AppError::BinaryNotFound { .. }));
    }

    #[test]
    fn skips_non_executable_files_and_directories() {
        let layout = layout();
        fs::create_dir_all(layout.first.join("demo")).expect("mkdir");
        let plain = layout.second.join("demo");
        fs::create_dir_all(&layout.second).expect("mkdir");
        fs::write(&plain, "data").expect("write");
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).expect("chmod");

        let resolver = PathBinaryResolver::with_search_path(
            &layout.wrapper,
            search_path(&[&layout.first, &layout.second]),
        );
        assert!(matches!(
            resolver.resolve("demo"),
            Err(AppError::BinaryNotFound { .. })
        ));
    }

    #[test]
    fn empty_search_path_is_not_found() {
        let layout = layout();
        let resolver = PathBinaryResolver::with_search_path(&layout.wrapper, None);
        assert!(matches!(
            resolver.resolve("demo"),
            Err(AppError::BinaryNotFound { .. })
        ));

        let resolver = PathBinaryResolver::with_search_path(&layout.wrapper, Some(OsString::new()));
        assert!(matches!(
            resolver.resolve("demo"),
            Err(AppError::BinaryNotFound { .. })
        ));
    }
}
