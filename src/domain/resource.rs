use std::fmt;

use serde::Serialize;

use crate::domain::DomainError;

/// Title used for every GeoIP update notification.
pub const GEOIP_UPDATE_TITLE: &str = "Update GEOIP Database";

/// Version-tracking signals consumed by the asset synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaunchSignals {
    /// The installed application version differs from the last run.
    pub version_changed: bool,
    /// No previous run was recorded.
    pub first_launch: bool,
}

impl LaunchSignals {
    /// Whether a bundled asset left by an earlier version should be discarded.
    pub fn invalidates_assets(&self) -> bool {
        self.version_changed || self.first_launch
    }
}

/// What `ensure_bundled_asset` did to the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetSyncReport {
    /// Existing copy was left alone.
    Kept,
    /// Bundled copy was installed.
    Installed,
    /// No copy exists after the pass (bundled source missing or copy failed).
    Missing,
}

/// How the fetcher treats an existing file at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Remove whatever is at the destination before moving the download in.
    pub remove_previous: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            remove_previous: true,
        }
    }
}

/// User-facing notification emitted after a remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub success: bool,
}

impl Notification {
    /// Build the notification reported after a GeoIP replacement attempt.
    pub fn geoip_update(outcome: &Result<(), DomainError>) -> Self {
        match outcome {
            Ok(()) => Self {
                title: GEOIP_UPDATE_TITLE.to_string(),
                body: "Success!".to_string(),
                success: true,
            },
            Err(e) => Self {
                title: GEOIP_UPDATE_TITLE.to_string(),
                body: format!("Fail:{}", e),
                success: false,
            },
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}
