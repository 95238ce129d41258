use std::path::PathBuf;

use crate::domain::{AppConfig, DomainError};

/// Configuration store port for persisting and loading app settings.
pub trait ConfigStore: Send + Sync {
    /// Load settings from persistent storage.
    /// Creates default settings if none exist.
    fn load(&self) -> Result<AppConfig, DomainError>;

    /// Save settings to persistent storage.
    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    /// Get the path to the settings file.
    fn config_path(&self) -> PathBuf;

    /// Get the path to the application data directory.
    fn data_dir(&self) -> PathBuf;

    /// Get the path to the logs directory.
    fn logs_dir(&self) -> PathBuf;
}
