use crate::error::{AppError, AppResult};

use super::model::Profile;

/// Storage for profiles and the per-binary current/default selection.
///
/// Every call is keyed by the wrapped binary's name; implementations keep one
/// namespace per binary.
pub trait ProfileRepository {
    /// Inserts or fully replaces a profile, creating the binary namespace if needed.
    fn save(&self, profile: &Profile) -> AppResult<()>;

    /// Fails with [`AppError::ProfileNotFound`] when absent.
    fn find_by_name(&self, name: &str, binary: &str) -> AppResult<Profile>;

    /// Profiles of a binary sorted by name. A binary without a namespace has none.
    fn list(&self, binary: &str) -> AppResult<Vec<Profile>>;

    /// Binaries that have a namespace, sorted by name.
    fn list_binaries(&self) -> AppResult<Vec<String>>;

    /// Removes a profile along with any current/default marker pointing at it.
    fn delete(&self, name: &str, binary: &str) -> AppResult<()>;

    /// Replaces the current marker. A missing profile leaves the marker untouched.
    fn set_current(&self, name: &str, binary: &str) -> AppResult<()>;

    /// Fails with [`AppError::NoCurrentProfile`] when the marker is unset or
    /// names a profile that no longer exists.
    fn get_current(&self, binary: &str) -> AppResult<Profile>;

    fn set_default(&self, name: &str, binary: &str) -> AppResult<()>;

    /// Fails with [`AppError::NoDefaultProfile`] when the marker is unset or
    /// names a profile that no longer exists.
    fn get_default(&self, binary: &str) -> AppResult<Profile>;

    fn exists(&self, name: &str, binary: &str) -> AppResult<bool> {
        match self.find_by_name(name, binary) {
            Ok(_) => Ok(true),
            Err(AppError::ProfileNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Current profile if resolvable, otherwise the default one.
    ///
    /// Only unset markers fall through; any other failure is returned as is.
    fn get_active_profile(&self, binary: &str) -> AppResult<Profile> {
        match self.get_current(binary) {
            Ok(profile) => return Ok(profile),
            Err(err) if err.is_unset_marker() => {
                tracing::debug!(binary, "no current profile, trying default");
            }
            Err(err) => return Err(err),
        }

        match self.get_default(binary) {
            Ok(profile) => Ok(profile),
            Err(err) if err.is_unset_marker() => Err(AppError::no_current_profile(binary)),
            Err(err) => Err(err),
        }
    }
}
