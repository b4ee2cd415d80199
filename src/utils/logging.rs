//! Logging utilities and initialization for TeensyBrew

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;
use tokio::sync::mpsc;

use crate::models::AppEvent;

/// Log level for the `-v` / `-q` flags
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Initialize logging for the TeensyBrew CLI
pub fn init_cli_logging(verbose: u8, quiet: bool, json: bool) -> Result<()> {
    let level = level_for(verbose, quiet);

    if json {
        init_json_logger(level)?;
    } else {
        Builder::from_default_env()
            .target(Target::Stderr)
            .filter_level(level)
            .format_timestamp_secs()
            .format_module_path(false)
            .try_init()?;
    }

    log_panics::init();

    log::debug!("TeensyBrew logging initialized with level: {:?}", level);
    Ok(())
}

/// One JSON object per record on stderr
fn init_json_logger(level: LevelFilter) -> Result<()> {
    use chrono::Utc;

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format(|buf, record| {
            let json = serde_json::json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": record.level().to_string(),
                "module": record.module_path().unwrap_or("unknown"),
                "message": record.args().to_string(),
                "target": record.target(),
            });
            writeln!(buf, "{}", json)
        })
        .try_init()?;

    Ok(())
}

/// Write one orchestration event to the log
pub fn log_event(event: &AppEvent) {
    match event {
        AppEvent::StateChanged(state) => log::debug!("{} {}", state.symbol(), state),
        AppEvent::Info(message) => log::info!("{}", message),
        AppEvent::Warning(message) => log::warn!("⚠️  {}", message),
        // The error itself is returned to the caller, which reports it
        AppEvent::Failed(message) => log::debug!("Run failed: {}", message),
    }
}

/// Drain orchestration events into the log until every sender is dropped
pub fn spawn_event_logger(
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            log_event(&event);
        }
    })
}
