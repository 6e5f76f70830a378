//! Store configuration.
//!
//! # Invariants
//! - `storage_key` is trimmed and non-empty after `validate()`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key the task list is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Options controlling how a task store loads and persists its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key used with the persistence adapter.
    pub storage_key: String,
    /// Seed the sample tasks when nothing usable is persisted.
    pub seed_when_empty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_when_empty: true,
        }
    }
}

impl StoreConfig {
    /// Normalizes and checks the configuration.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let key = self.storage_key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.storage_key = key.to_string();
        Ok(self)
    }
}
