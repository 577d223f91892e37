//! Migrator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::history::DEFAULT_HISTORY_TABLE;

/// Tunables for a [`crate::Migrator`].
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```rust
/// use dbm_migrate::MigratorConfig;
///
/// let config: MigratorConfig = serde_json::from_str(r#"{"transactional": false}"#).unwrap();
/// assert_eq!(config.history_table, "dbm_schema_versions");
/// assert!(!config.transactional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigratorConfig {
    /// Name of the history table.
    pub history_table: String,
    /// Run each version step inside a transaction when the backend supports it.
    pub transactional: bool,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            history_table: DEFAULT_HISTORY_TABLE.to_string(),
            transactional: true,
        }
    }
}

impl MigratorConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or names an
    /// empty history table.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the engine cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Config`] for an empty history table name.
    pub fn validate(&self) -> Result<()> {
        if self.history_table.trim().is_empty() {
            return Err(MigrateError::Config(
                "history_table must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
