use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use crate::app::AppController;
use crate::domain::DomainError;

/// Subcommands of the `clash-resources` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the startup readiness pass over the config directory
    Check,

    /// Download a fresh GeoIP database over the current one
    UpdateGeoip,

    /// Print the resolved paths as JSON
    Paths,
}

/// Resolved locations reported by `paths`.
#[derive(Debug, Serialize)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub mmdb: PathBuf,
    pub default_config: PathBuf,
    pub settings: PathBuf,
    pub logs_dir: PathBuf,
}

/// Run a subcommand against an initialized controller.
pub async fn execute(controller: &AppController, command: Command) -> Result<(), DomainError> {
    match command {
        Command::Check => {
            controller.check()?;
            let config_dir = controller.manager().paths().config_dir();
            println!("Config directory ready: {}", config_dir.display());
            Ok(())
        }
        Command::UpdateGeoip => {
            let (notification, outcome) = controller.update_geoip().await;
            println!("{}", notification);
            outcome
        }
        Command::Paths => {
            println!("{}", serde_json::to_string_pretty(&get_paths(controller))?);
            Ok(())
        }
    }
}

/// Get application paths information.
pub fn get_paths(controller: &AppController) -> AppPaths {
    let paths = controller.manager().paths();
    AppPaths {
        config_dir: paths.config_dir().to_path_buf(),
        mmdb: paths.mmdb_path(),
        default_config: paths.default_config_path(),
        settings: controller.settings_path(),
        logs_dir: controller.logs_dir(),
    }
}
