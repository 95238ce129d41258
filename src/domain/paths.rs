use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Database asset file name inside the config directory.
pub const MMDB_FILE_NAME: &str = "Country.mmdb";
/// Default proxy configuration file name.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.yaml";
/// Config directory relative to the user's home.
const CONFIG_DIR_RELATIVE: &str = ".config/clash";

/// Well-known locations of every file the resource manager touches.
///
/// Built once and handed to each component, so tests can point the whole
/// pipeline at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    config_dir: PathBuf,
    scan_dir: PathBuf,
}

impl ResolvedPaths {
    /// Paths rooted at an explicit config directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let config_dir = root.into();
        Self {
            scan_dir: config_dir.clone(),
            config_dir,
        }
    }

    /// Paths for the standard `~/.config/clash` layout under `home`.
    pub fn from_home(home: &Path) -> Self {
        Self::with_root(home.join(CONFIG_DIR_RELATIVE))
    }

    /// Resolve from an optional override, falling back to the user's home.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, DomainError> {
        if let Some(dir) = override_dir {
            return Ok(Self::with_root(dir));
        }
        dirs::home_dir()
            .map(|home| Self::from_home(&home))
            .ok_or_else(|| DomainError::Config("Could not find home directory".to_string()))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn mmdb_path(&self) -> PathBuf {
        self.config_dir.join(MMDB_FILE_NAME)
    }

    pub fn default_config_path(&self) -> PathBuf {
        self.config_dir.join(DEFAULT_CONFIG_FILE_NAME)
    }

    /// Directory scanned for legacy `.yml` files.
    pub fn scan_dir(&self) -> &Path {
        &self.scan_dir
    }
}
