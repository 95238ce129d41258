use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

/// Directory name of the resource manager's own settings.
const APP_DIR_NAME: &str = "clash-resources";

/// TOML-based settings store with OS-specific paths.
///
/// These are the resource manager's settings, kept apart from the managed
/// Clash config directory.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a new TomlConfigStore.
    /// Uses OS-specific application config directories.
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = Self::get_data_dir()?;
        Self::at(data_dir)
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;

        info!(data_dir = ?data_dir, "ConfigStore initialized");

        Ok(Self { data_dir })
    }

    /// Get the OS-specific settings directory.
    /// - macOS: ~/Library/Application Support/clash-resources/
    /// - Windows: %APPDATA%\clash-resources\
    /// - Linux: ~/.config/clash-resources/
    fn get_data_dir() -> Result<PathBuf, DomainError> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| {
                DomainError::Config("Could not find application config directory".to_string())
            })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading settings");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            info!(path = ?config_path, "Settings loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Settings file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Settings saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("settings.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_store_paths() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(temp.path().to_path_buf()).unwrap();

        assert!(store.config_path().ends_with("settings.toml"));
        assert!(store.logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_missing_settings_written_with_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(temp.path().to_path_buf()).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(temp.path().to_path_buf()).unwrap();

        let mut config = AppConfig::new();
        config.paths.config_dir = Some(temp.path().join("clash"));
        config.logging.level = "debug".to_string();
        config.geoip.timeout_secs = 30;

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.paths.config_dir, Some(temp.path().join("clash")));
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.geoip.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_settings_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(temp.path().to_path_buf()).unwrap();
        fs::write(store.config_path(), "[logging\nlevel = ").unwrap();

        assert!(matches!(store.load(), Err(DomainError::Config(_))));
    }
}
