use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::profile::{Profile, ProfileRepository};

/// One row of a binary's profile listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub variables: usize,
    pub current: bool,
    pub default: bool,
}

/// One row of the configured-binaries listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinarySummary {
    pub binary: String,
    pub profiles: usize,
    pub current: Option<String>,
    pub default: Option<String>,
}

/// Profile management use cases for wrapped binaries.
#[derive(Debug)]
pub struct ProfileService<'a, R> {
    repository: &'a R,
}

impl<'a, R: ProfileRepository> ProfileService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    pub fn create_profile(&self, name: &str, binary: &str) -> AppResult<Profile> {
        if self.repository.exists(name, binary)? {
            return Err(AppError::ProfileAlreadyExists {
                profile: name.to_string(),
                binary: binary.to_string(),
            });
        }

        let profile = Profile::empty(name, binary)?;
        self.repository.save(&profile)?;
        info!(binary, profile = name, "created profile");
        Ok(profile)
    }

    pub fn list_profiles(&self, binary: &str) -> AppResult<Vec<Profile>> {
        self.repository.list(binary)
    }

    pub fn delete_profile(&self, name: &str, binary: &str) -> AppResult<()> {
        self.repository.delete(name, binary)?;
        info!(binary, profile = name, "deleted profile");
        Ok(())
    }

    pub fn set_current_profile(&self, name: &str, binary: &str) -> AppResult<()> {
        self.require(name, binary)?;
        self.repository.set_current(name, binary)
    }

    pub fn set_default_profile(&self, name: &str, binary: &str) -> AppResult<()> {
        self.require(name, binary)?;
        self.repository.set_default(name, binary)
    }

    pub fn get_current_profile(&self, binary: &str) -> AppResult<String> {
        Ok(self.repository.get_current(binary)?.name().to_string())
    }

    pub fn get_default_profile(&self, binary: &str) -> AppResult<String> {
        Ok(self.repository.get_default(binary)?.name().to_string())
    }

    pub fn get_active_profile(&self, binary: &str) -> AppResult<Profile> {
        active_profile(self.repository, binary)
    }

    pub fn profile_summaries(&self, binary: &str) -> AppResult<Vec<ProfileSummary>> {
        let profiles = self.repository.list(binary)?;
        if profiles.is_empty() {
            return Ok(Vec::new());
        }

        let current = optional(self.repository.get_current(binary))?;
        let default = optional(self.repository.get_default(binary))?;

        Ok(profiles
            .iter()
            .map(|profile| ProfileSummary {
                name: profile.name().to_string(),
                variables: profile.len(),
                current: current.as_deref() == Some(profile.name()),
                default: default.as_deref() == Some(profile.name()),
            })
            .collect())
    }

    pub fn binary_summaries(&self) -> AppResult<Vec<BinarySummary>> {
        self.repository
            .list_binaries()?
            .into_iter()
            .map(|binary| {
                let profiles = self.repository.list(&binary)?.len();
                let current = optional(self.repository.get_current(&binary))?;
                let default = optional(self.repository.get_default(&binary))?;
                Ok(BinarySummary {
                    binary,
                    profiles,
                    current,
                    default,
                })
            })
            .collect()
    }

    fn require(&self, name: &str, binary: &str) -> AppResult<()> {
        self.repository.find_by_name(name, binary).map(|_| ())
    }
}

/// Active profile of `binary`, with "nothing selected" turned into guidance.
pub(crate) fn active_profile<R: ProfileRepository>(
    repository: &R,
    binary: &str,
) -> AppResult<Profile> {
    repository.get_active_profile(binary).map_err(|err| {
        if err.is_unset_marker() {
            AppError::NoActiveProfile {
                binary: binary.to_string(),
            }
        } else {
            err
        }
    })
}

fn optional(result: AppResult<Profile>) -> AppResult<Option<String>> {
    match result {
        Ok(profile) => Ok(Some(profile.name().to_string())),
        Err(err) if err.is_unset_marker() => Ok(None),
        Err(err) => Err(err),
    }
}
