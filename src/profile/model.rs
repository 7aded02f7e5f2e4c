use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Name reserved by the current-profile marker file.
const RESERVED_PROFILE_NAME: &str = "current";

/// A named set of environment variables scoped to one wrapped binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    binary: String,
    environment: BTreeMap<String, String>,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        binary: impl Into<String>,
        environment: BTreeMap<String, String>,
    ) -> AppResult<Self> {
        let name = name.into();
        let binary = binary.into();
        validate_profile_name(&name)?;
        validate_binary_name(&binary)?;
        for (key, value) in &environment {
            validate_variable(key, value)?;
        }

        Ok(Self {
            name,
            binary,
            environment,
        })
    }

    pub fn empty(name: impl Into<String>, binary: impl Into<String>) -> AppResult<Self> {
        Self::new(name, binary, BTreeMap::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn into_environment(self) -> BTreeMap<String, String> {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.environment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environment.is_empty()
    }

    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> AppResult<()> {
        let key = key.into();
        let value = value.into();
        validate_variable(&key, &value)?;
        self.environment.insert(key, value);
        Ok(())
    }
}

pub fn validate_profile_name(name: &str) -> AppResult<()> {
    validate_component("profile", name)?;
    if name == RESERVED_PROFILE_NAME {
        return Err(AppError::InvalidInput(format!(
            "profile name '{name}' is reserved"
        )));
    }

    Ok(())
}

pub fn validate_binary_name(name: &str) -> AppResult<()> {
    validate_component("binary", name)
}

// Names become file and directory names under the config root.
fn validate_component(kind: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{kind} name cannot be empty")));
    }

    if name.starts_with('.') {
        return Err(AppError::InvalidInput(format!(
            "{kind} name '{name}' cannot start with '.'"
        )));
    }

    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(AppError::InvalidInput(format!(
            "{kind} name '{name}' must not contain path separators or control characters"
        )));
    }

    Ok(())
}

fn validate_variable(key: &str, value: &str) -> AppResult<()> {
    if key.is_empty() {
        return Err(AppError::InvalidInput(
            "environment variable name cannot be empty".to_string(),
        ));
    }

    if key.contains('=') || key.chars().any(char::is_whitespace) {
        return Err(AppError::InvalidInput(format!(
            "environment variable name '{key}' must not contain '=' or whitespace"
        )));
    }

    if key.starts_with('#') {
        return Err(AppError::InvalidInput(format!(
            "environment variable name '{key}' cannot start with '#'"
        )));
    }

    if value.contains(['\n', '\r']) {
        return Err(AppError::InvalidInput(format!(
            "value of '{key}' must not contain newlines"
        )));
    }

    if value.trim() != value {
        return Err(AppError::InvalidInput(format!(
            "value of '{key}' must not start or end with whitespace"
        )));
    }

    Ok(())
}
