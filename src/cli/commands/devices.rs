use crate::cli::args::Cli;
use crate::config::AppConfig;
use crate::services::BuildOrchestrator;
use crate::utils::process::SystemToolRunner;
use anyhow::Result;
use std::sync::Arc;

/// List attached Teensy boards as reported by the device tool
pub async fn execute_devices_command(cli: &Cli, config: AppConfig) -> Result<()> {
    let orchestrator = BuildOrchestrator::new(config, Arc::new(SystemToolRunner::new()));
    let devices = orchestrator.device_selector().list_devices().await?;
    let exclude = cli.exclude_set();

    if devices.is_empty() {
        println!("⚠️  No Teensy devices attached");
        return Ok(());
    }

    println!("🔌 Attached devices:");
    for serial in &devices {
        if exclude.contains(serial) {
            println!("  {} (excluded)", serial);
        } else {
            println!("  {}", serial);
        }
    }
    println!("\nTotal devices: {}", devices.len());
    Ok(())
}
