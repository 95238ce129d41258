use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    AssetSynchronizer, ConfigIntegrityChecker, DirectoryProvisioner, HttpFetcher, LegacyMigrator,
    LogNotifier, TomlConfigStore, VersionStampTracker,
};
use crate::domain::{AppConfig, DomainError, LaunchSignals, Notification, ResolvedPaths};
use crate::infrastructure::init_logging;
use crate::ports::{AssetFetcher, ConfigStore, LaunchTracker, Notifier};

/// Notification posted for a GeoIP update plus the result it describes.
pub type GeoipUpdate = (Notification, Result<(), DomainError>);

/// Runs the startup readiness pass over the Clash config directory and
/// owns the on-demand GeoIP update.
pub struct ResourceManager {
    paths: ResolvedPaths,
    checker: ConfigIntegrityChecker,
    assets: AssetSynchronizer,
    notifier: Arc<dyn Notifier>,
}

impl ResourceManager {
    pub fn new(
        paths: ResolvedPaths,
        bundled_mmdb: Option<PathBuf>,
        geoip_url: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let assets = AssetSynchronizer::new(paths.clone(), bundled_mmdb, geoip_url);
        Self {
            paths,
            checker: ConfigIntegrityChecker::new(),
            assets,
            notifier,
        }
    }

    /// Build from settings, resolving the config root and bundled database.
    pub fn from_config(
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DomainError> {
        let paths = ResolvedPaths::resolve(config.paths.config_dir.as_deref())?;
        let bundled = config
            .paths
            .bundled_mmdb
            .clone()
            .or_else(default_bundled_mmdb);
        Ok(Self::new(paths, bundled, config.geoip.url.clone(), notifier))
    }

    /// Replace the fingerprint checker used for the default config purge.
    pub fn with_integrity_checker(mut self, checker: ConfigIntegrityChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Bring the config directory into a consistent state.
    ///
    /// Stages run in a fixed order and each absorbs its own failures, except
    /// directory provisioning: if that fails the user is notified, no other
    /// stage runs, and the error is returned so the host can exit.
    pub fn check(&self, signals: LaunchSignals) -> Result<bool, DomainError> {
        if let Err(e) = DirectoryProvisioner::new(&self.paths).ensure() {
            self.notifier.fatal(&e);
            return Err(e);
        }

        let asset = self.assets.ensure_bundled_asset(signals);

        let migrator = LegacyMigrator::new(&self.paths, &self.checker);
        let migrated = migrator.upgrade_extensions();
        let purged = migrator.purge_known_bad_default_config();

        info!(
            config_dir = ?self.paths.config_dir(),
            asset = ?asset,
            migrated = migrated,
            purged_default_config = purged,
            "Resource check complete"
        );
        Ok(true)
    }

    /// Replace the GeoIP database from the remote source and post the outcome.
    ///
    /// The notification is returned together with the unmodified outcome.
    pub async fn update_geoip(&self, fetcher: &dyn AssetFetcher) -> GeoipUpdate {
        let outcome = self.assets.replace_from_remote(fetcher).await;
        self.report_geoip(outcome)
    }

    fn report_geoip(&self, outcome: Result<(), DomainError>) -> GeoipUpdate {
        let notification = Notification::geoip_update(&outcome);
        self.notifier.notify(&notification);
        (notification, outcome)
    }
}

/// `resources/Country.mmdb` next to the running executable.
fn default_bundled_mmdb() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent()
        .map(|dir| dir.join("resources").join(crate::domain::paths::MMDB_FILE_NAME))
}

/// Application controller that wires settings, logging and adapters
/// around the resource manager.
pub struct AppController {
    config: AppConfig,
    config_store: TomlConfigStore,
    manager: ResourceManager,
    tracker: VersionStampTracker,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize the application controller.
    /// `config_dir` overrides the managed Clash directory for this run.
    pub fn new(config_dir: Option<&Path>) -> Result<Self, DomainError> {
        // Step 1: Initialize settings store
        let config_store = TomlConfigStore::new()?;

        // Step 2: Load settings
        let mut config = config_store.load()?;
        if let Some(dir) = config_dir {
            config.paths.config_dir = Some(dir.to_path_buf());
        }

        // Step 3: Initialize logging
        let log_guard = init_logging(&config_store.logs_dir(), &config.logging)?;

        info!("clash-resources starting up");

        // Step 4: Resource manager and version tracking
        let manager = ResourceManager::from_config(&config, Arc::new(LogNotifier::new()))?;
        let tracker = VersionStampTracker::new(
            config_store.data_dir().join("last_version"),
            env!("CARGO_PKG_VERSION"),
        );

        info!(config_dir = ?manager.paths().config_dir(), "AppController initialized");

        Ok(Self {
            config,
            config_store,
            manager,
            tracker,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn manager(&self) -> &ResourceManager {
        &self.manager
    }

    /// Run the startup pass and remember this version on success.
    pub fn check(&self) -> Result<bool, DomainError> {
        let ready = self.manager.check(self.tracker.signals())?;
        if let Err(e) = self.tracker.record() {
            warn!(error = %e, "Failed to record version stamp");
        }
        Ok(ready)
    }

    /// Download a fresh GeoIP database.
    ///
    /// A client that cannot be built is reported like any other failed update.
    pub async fn update_geoip(&self) -> GeoipUpdate {
        match HttpFetcher::new(Duration::from_secs(self.config.geoip.timeout_secs)) {
            Ok(fetcher) => self.manager.update_geoip(&fetcher).await,
            Err(e) => self.manager.report_geoip(Err(e)),
        }
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> PathBuf {
        self.config_store.config_path()
    }

    /// Get the logs directory path.
    pub fn logs_dir(&self) -> PathBuf {
        self.config_store.logs_dir()
    }
}
