use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

use super::model::Profile;
use super::repository::ProfileRepository;

#[derive(Debug, Default)]
struct Namespace {
    profiles: BTreeMap<String, Profile>,
    current: Option<String>,
    default: Option<String>,
}

/// Process-local repository, used to exercise the services without touching disk.
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    namespaces: RefCell<BTreeMap<String, Namespace>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve_marker(
        &self,
        binary: &str,
        marker: impl Fn(&Namespace) -> Option<&String>,
        unset: fn(&str) -> AppError,
    ) -> AppResult<Profile> {
        let namespaces = self.namespaces.borrow();
        namespaces
            .get(binary)
            .and_then(|ns| marker(ns).and_then(|name| ns.profiles.get(name)))
            .cloned()
            .ok_or_else(|| unset(binary))
    }

    fn ensure_exists(&self, name: &str, binary: &str) -> AppResult<()> {
        if self.exists(name, binary)? {
            Ok(())
        } else {
            Err(AppError::profile_not_found(name, binary))
        }
    }
}

impl ProfileRepository for MemoryProfileRepository {
    fn save(&self, profile: &Profile) -> AppResult<()> {
        self.namespaces
            .borrow_mut()
            .entry(profile.binary().to_string())
            .or_default()
            .profiles
            .insert(profile.name().to_string(), profile.clone());
        Ok(())
    }

    fn find_by_name(&self, name: &str, binary: &str) -> AppResult<Profile> {
        self.namespaces
            .borrow()
            .get(binary)
            .and_then(|ns| ns.profiles.get(name))
            .cloned()
            .ok_or_else(|| AppError::profile_not_found(name, binary))
    }

    fn list(&self, binary: &str) -> AppResult<Vec<Profile>> {
        Ok(self
            .namespaces
            .borrow()
            .get(binary)
            .map(|ns| ns.profiles.values().cloned().collect())
            .unwrap_or_default())
    }

    fn list_binaries(&self) -> AppResult<Vec<String>> {
        Ok(self.namespaces.borrow().keys().cloned().collect())
    }

    fn delete(&self, name: &str, binary: &str) -> AppResult<()> {
        let mut namespaces = self.namespaces.borrow_mut();
        let ns = namespaces
            .get_mut(binary)
            .filter(|ns| ns.profiles.contains_key(name))
            .ok_or_else(|| AppError::profile_not_found(name, binary))?;

        ns.profiles.remove(name);
        if ns.current.as_deref() == Some(name) {
            ns.current = None;
        }
        if ns.default.as_deref() == Some(name) {
            ns.default = None;
        }
        Ok(())
    }

    fn set_current(&self, name: &str, binary: &str) -> AppResult<()> {
        self.ensure_exists(name, binary)?;
        if let Some(ns) = self.namespaces.borrow_mut().get_mut(binary) {
            ns.current = Some(name.to_string());
        }
        Ok(())
    }

    fn get_current(&self, binary: &str) -> AppResult<Profile> {
        self.resolve_marker(binary, |ns| ns.current.as_ref(), AppError::no_current_profile)
    }

    fn set_default(&self, name: &str, binary: &str) -> AppResult<()> {
        self.ensure_exists(name, binary)?;
        if let Some(ns) = self.namespaces.borrow_mut().get_mut(binary) {
            ns.default = Some(name.to_string());
        }
        Ok(())
    }

    fn get_default(&self, binary: &str) -> AppResult<Profile> {
        self.resolve_marker(binary, |ns| ns.default.as_ref(), AppError::no_default_profile)
    }
}
