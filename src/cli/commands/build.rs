//! Build command implementation

use crate::cli::args::Cli;
use crate::config::AppConfig;
use crate::models::AppEvent;
use crate::services::{BuildOptions, BuildOrchestrator};
use crate::utils::logging::spawn_event_logger;
use crate::utils::process::SystemToolRunner;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn execute_build_command(cli: &Cli, config: AppConfig) -> Result<()> {
    let project_dir = super::project_dir(cli)?;
    let board = cli
        .device
        .clone()
        .unwrap_or_else(|| config.board.default_board.clone());

    log::info!("🔨 TeensyBrew Build Command");
    log::info!("📁 Project directory: {}", project_dir.display());
    log::info!("🎯 Board: {}", board);

    let options = BuildOptions {
        project_dir,
        board,
        upload: cli.upload,
        clear: cli.clear,
        exclude: cli.exclude_set(),
    };

    // Create a channel for build events
    let (tx, rx) = mpsc::unbounded_channel::<AppEvent>();
    let log_handler = spawn_event_logger(rx);

    let orchestrator =
        BuildOrchestrator::new(config, Arc::new(SystemToolRunner::new())).with_events(tx);
    let result = orchestrator.run(&options).await;

    // Close the channel and wait for log handler to finish
    drop(orchestrator);
    log_handler.await?;

    let report = result?;
    match (&report.device, &report.artifact) {
        (Some(device), Some(artifact)) => log::info!(
            "🎉 {} project built and flashed to {} ({})",
            report.source,
            device,
            artifact.path.display()
        ),
        _ => log::info!("🎉 {} project built successfully", report.source),
    }

    Ok(())
}
