pub mod config;
pub mod error;
pub mod paths;
pub mod remote_config;
pub mod resource;

pub use config::AppConfig;
pub use error::DomainError;
pub use paths::ResolvedPaths;
pub use remote_config::RemoteConfigModel;
pub use resource::{AssetSyncReport, FetchOptions, LaunchSignals, Notification};
