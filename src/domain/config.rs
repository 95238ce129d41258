use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default source for the GeoIP country database.
pub const DEFAULT_GEOIP_URL: &str = "https://static.clash.to/GeoIP2/GeoIP2-Country.mmdb";

/// Filesystem overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Managed config directory. `None` means `~/.config/clash`.
    pub config_dir: Option<PathBuf>,
    /// Bundled `Country.mmdb`. `None` means `resources/Country.mmdb`
    /// next to the executable.
    pub bundled_mmdb: Option<PathBuf>,
}

/// GeoIP database download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoIpConfig {
    /// Remote URL the database is replaced from.
    pub url: String,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GEOIP_URL.to_string(),
            timeout_secs: 600,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub geoip: GeoIpConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
