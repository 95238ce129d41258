pub mod config;
pub mod fetcher;
pub mod launch;
pub mod notifier;

pub use config::ConfigStore;
pub use fetcher::AssetFetcher;
pub use launch::LaunchTracker;
pub use notifier::Notifier;
