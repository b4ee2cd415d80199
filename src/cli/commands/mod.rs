//! CLI command implementations

pub mod boards;
pub mod build;
pub mod clean;
pub mod devices;

use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;

/// Execute a CLI command
pub async fn execute_command(command: Commands, cli: &Cli, config: AppConfig) -> Result<()> {
    match command {
        Commands::Build => build::execute_build_command(cli, config).await,
        Commands::Clean => clean::execute_clean_command(cli, config).await,
        Commands::Devices => devices::execute_devices_command(cli, config).await,
        Commands::Boards => boards::execute_boards_command(cli, config).await,
    }
}

/// Project folder from the command line; exits with a usage error when absent
pub(crate) fn project_dir(cli: &Cli) -> Result<PathBuf> {
    let project_dir = cli.require_project().unwrap_or_else(|e| e.exit());

    if !project_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Project directory does not exist: {}",
            project_dir.display()
        ));
    }
    Ok(project_dir.to_path_buf())
}
