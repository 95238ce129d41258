use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{DomainError, LaunchSignals};
use crate::ports::LaunchTracker;

/// Tracks the last launched version in a one-line stamp file.
pub struct VersionStampTracker {
    stamp_path: PathBuf,
    current_version: String,
}

impl VersionStampTracker {
    pub fn new(stamp_path: PathBuf, current_version: impl Into<String>) -> Self {
        Self {
            stamp_path,
            current_version: current_version.into(),
        }
    }

    fn previous_version(&self) -> Option<String> {
        match fs::read_to_string(&self.stamp_path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = ?self.stamp_path, error = %e, "Failed to read version stamp");
                None
            }
        }
    }
}

impl LaunchTracker for VersionStampTracker {
    fn signals(&self) -> LaunchSignals {
        let signals = match self.previous_version() {
            None => LaunchSignals {
                version_changed: false,
                first_launch: true,
            },
            Some(previous) => LaunchSignals {
                version_changed: previous != self.current_version,
                first_launch: false,
            },
        };
        debug!(
            current = %self.current_version,
            version_changed = signals.version_changed,
            first_launch = signals.first_launch,
            "Launch signals"
        );
        signals
    }

    fn record(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.stamp_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.stamp_path, &self.current_version)?;
        info!(path = ?self.stamp_path, version = %self.current_version, "Version stamp recorded");
        Ok(())
    }
}
