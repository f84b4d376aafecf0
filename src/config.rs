use serde::Deserialize;

use crate::domain::errors::StorageError;
use crate::domain::logging::LogLevel;
use crate::domain::storage::keys::NAMESPACE;

/// Runtime settings for the storage layer.
///
/// Every field has a default, so partial JSON such as `{"min_log_level":"warn"}`
/// is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix owned by this application; `clear()` only touches keys under it.
    pub namespace: String,
    pub min_log_level: LogLevel,
    pub log_buffer_capacity: usize,
    pub error_history: usize,
    /// Maximum length of recent-items lists.
    pub recent_limit: usize,
    pub purge_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: NAMESPACE.to_string(),
            min_log_level: LogLevel::Info,
            log_buffer_capacity: 100,
            error_history: 50,
            recent_limit: 10,
            purge_on_startup: true,
        }
    }
}

impl StorageConfig {
    pub fn production() -> Self {
        Self::default()
    }

    pub fn development() -> Self {
        Self {
            min_log_level: LogLevel::Debug,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, StorageError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| StorageError::Config(e.to_string()))?;
        if config.namespace.is_empty() {
            return Err(StorageError::Config("namespace cannot be empty".to_string()));
        }
        Ok(config)
    }

    /// `"<namespace>:"`, the prefix every owned key starts with.
    pub fn key_prefix(&self) -> String {
        format!("{}:", self.namespace)
    }
}
