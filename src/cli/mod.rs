//! Command Line Interface module
//!
//! Argument parsing and the command implementations behind `teensybrew`.

pub mod args;
pub mod commands;

pub use args::*;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::utils::logging::init_cli_logging;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_cli_logging(cli.verbose, cli.quiet, cli.json_logs)?;

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let command = cli.command.clone().unwrap_or(Commands::Build);

    commands::execute_command(command, &cli, config).await
}
