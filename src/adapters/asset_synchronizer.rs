use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::domain::{AssetSyncReport, DomainError, FetchOptions, LaunchSignals, ResolvedPaths};
use crate::ports::AssetFetcher;

/// Keeps `Country.mmdb` installed and replaceable.
pub struct AssetSynchronizer {
    paths: ResolvedPaths,
    bundled: Option<PathBuf>,
    remote_url: String,
    replacing: AtomicBool,
}

/// Clears the in-flight flag even if the replacement future is dropped.
struct ReplaceGuard<'a>(&'a AtomicBool);

impl Drop for ReplaceGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AssetSynchronizer {
    pub fn new(
        paths: ResolvedPaths,
        bundled: Option<PathBuf>,
        remote_url: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            bundled,
            remote_url: remote_url.into(),
            replacing: AtomicBool::new(false),
        }
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Install the bundled database if it is missing, discarding an existing
    /// copy first when this launch invalidates it.
    ///
    /// An existing copy is never discarded when there is no bundled copy to
    /// reinstall from. Failures are logged and absorbed; the report says what
    /// is on disk.
    pub fn ensure_bundled_asset(&self, signals: LaunchSignals) -> AssetSyncReport {
        let dest = self.paths.mmdb_path();
        let source = self.bundled.as_deref().filter(|p| p.is_file());

        if dest.exists() && signals.invalidates_assets() {
            if source.is_none() {
                warn!(
                    path = ?dest,
                    bundled = ?self.bundled,
                    "Bundled GeoIP database not found, keeping existing copy"
                );
            } else {
                match fs::remove_file(&dest) {
                    Ok(()) => info!(
                        path = ?dest,
                        version_changed = signals.version_changed,
                        first_launch = signals.first_launch,
                        "Removed stale GeoIP database"
                    ),
                    Err(e) => {
                        warn!(path = ?dest, error = %e, "Failed to remove stale GeoIP database");
                    }
                }
            }
        }

        if dest.exists() {
            debug!(path = ?dest, "GeoIP database present");
            return AssetSyncReport::Kept;
        }

        let Some(source) = source else {
            warn!(bundled = ?self.bundled, "Bundled GeoIP database not found");
            return AssetSyncReport::Missing;
        };

        match fs::copy(source, &dest) {
            Ok(bytes) => {
                info!(
                    from = ?source,
                    to = ?dest,
                    bytes = bytes,
                    "Installed bundled GeoIP database"
                );
                AssetSyncReport::Installed
            }
            Err(e) => {
                warn!(
                    from = ?source,
                    to = ?dest,
                    error = %e,
                    "Failed to install bundled GeoIP database"
                );
                AssetSyncReport::Missing
            }
        }
    }

    /// Download the database from the remote URL over the current copy.
    ///
    /// Only one replacement runs at a time; a concurrent call fails with
    /// `DomainError::ReplaceInProgress` without touching the file.
    pub async fn replace_from_remote(
        &self,
        fetcher: &dyn AssetFetcher,
    ) -> Result<(), DomainError> {
        if self
            .replacing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("GeoIP database update already running");
            return Err(DomainError::ReplaceInProgress);
        }
        let _guard = ReplaceGuard(&self.replacing);

        let dest = self.paths.mmdb_path();
        info!(url = %self.remote_url, target = ?dest, "Starting GeoIP database update");

        let result = fetcher
            .fetch(&self.remote_url, &dest, FetchOptions { remove_previous: true })
            .await;

        match &result {
            Ok(()) => info!(target = ?dest, "GeoIP database updated"),
            Err(e) => warn!(url = %self.remote_url, error = %e, "GeoIP database update failed"),
        }
        result
    }
}
