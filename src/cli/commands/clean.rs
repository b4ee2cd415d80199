//! Clean command implementation
//!
//! Removes earlier arduino-builder output directories, or the MicroPython
//! port's build directory, without building anything.

use anyhow::Result;
use std::sync::Arc;

use crate::cli::args::Cli;
use crate::config::AppConfig;
use crate::services::BuildOrchestrator;
use crate::utils::process::SystemToolRunner;

pub async fn execute_clean_command(cli: &Cli, config: AppConfig) -> Result<()> {
    let project_dir = super::project_dir(cli)?;

    log::info!("🧹 TeensyBrew Clean Command");
    log::info!("📁 Project directory: {}", project_dir.display());

    let orchestrator = BuildOrchestrator::new(config, Arc::new(SystemToolRunner::new()));
    let removed = orchestrator.clear_only(&project_dir)?;

    if removed == 0 {
        log::info!("✨ Nothing to clean");
    }
    Ok(())
}
