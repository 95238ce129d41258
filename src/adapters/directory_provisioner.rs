use std::fs;

use tracing::{debug, error, info};

use crate::domain::{DomainError, ResolvedPaths};

/// Makes sure the config directory exists before anything else touches it.
pub struct DirectoryProvisioner<'a> {
    paths: &'a ResolvedPaths,
}

impl<'a> DirectoryProvisioner<'a> {
    pub fn new(paths: &'a ResolvedPaths) -> Self {
        Self { paths }
    }

    /// Create the config directory (and any missing parents) if absent.
    ///
    /// Fails with `DomainError::Provisioning` when the directory cannot be
    /// created, including when a non-directory already occupies the path.
    pub fn ensure(&self) -> Result<(), DomainError> {
        let dir = self.paths.config_dir();

        if dir.is_dir() {
            debug!(dir = ?dir, "Config directory present");
            return Ok(());
        }

        if let Err(e) = fs::create_dir_all(dir) {
            error!(dir = ?dir, error = %e, "Failed to create config directory");
            return Err(DomainError::Provisioning {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
        }

        info!(dir = ?dir, "Config directory created");
        Ok(())
    }
}
