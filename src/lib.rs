#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod commands;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use std::path::Path;

use app::AppController;
use commands::Command;
use domain::DomainError;

pub use app::ResourceManager;
pub use domain::{LaunchSignals, Notification, RemoteConfigModel, ResolvedPaths};

/// Initialize the controller and run one command.
pub async fn run(config_dir: Option<&Path>, command: Command) -> Result<(), DomainError> {
    let controller = AppController::new(config_dir)?;
    commands::execute(&controller, command).await
}
