//! clash-resources
//!
//! Keeps the Clash config directory and GeoIP database in a usable state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use clash_resources::commands::Command;

#[derive(Parser)]
#[command(name = "clash-resources")]
#[command(version, about = "Maintain the Clash config directory and GeoIP database")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Managed config directory (default: ~/.config/clash)
    #[arg(long, global = true, env = "CLASH_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    clash_resources::run(cli.config_dir.as_deref(), cli.command)
        .await
        .context("clash-resources failed")
}
