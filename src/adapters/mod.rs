pub mod asset_synchronizer;
pub mod config_store;
pub mod directory_provisioner;
pub mod http_fetcher;
pub mod integrity_checker;
pub mod legacy_migrator;
pub mod log_notifier;
pub mod version_stamp;

pub use asset_synchronizer::AssetSynchronizer;
pub use config_store::TomlConfigStore;
pub use directory_provisioner::DirectoryProvisioner;
pub use http_fetcher::HttpFetcher;
pub use integrity_checker::ConfigIntegrityChecker;
pub use legacy_migrator::LegacyMigrator;
pub use log_notifier::LogNotifier;
pub use version_stamp::VersionStampTracker;
