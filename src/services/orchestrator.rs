//! Build-and-upload pipeline
//!
//! One run walks `Idle -> Classified -> [DeviceSelected] -> ConfigReady ->
//! Built -> [ArtifactLocated -> Flashed]`. Any step may end the run in
//! `Failed`. When uploading, the target device is chosen before anything is
//! written or compiled so an ambiguous or missing board costs nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::{AppConfig, BoardTypeRegistry};
use crate::errors::{Result, TeensyBrewError};
use crate::models::{AppEvent, ArtifactReference, BuildState, DeviceHandle, ExcludeSet, ProjectSource};
use crate::projects::{BuildContext, ProjectClassifier, ProjectHandler, ProjectRegistry};
use crate::services::device_selector::DeviceSelector;
use crate::toolchain::{ToolchainProbe, ToolchainRoots};
use crate::utils::logging::log_event;
use crate::utils::process::ToolRunner;

/// What a single run should do
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub project_dir: PathBuf,
    /// Board identifier, e.g. `teensyLC`
    pub board: String,
    pub upload: bool,
    pub clear: bool,
    pub exclude: ExcludeSet,
}

impl BuildOptions {
    pub fn new(project_dir: impl Into<PathBuf>, board: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            board: board.into(),
            upload: false,
            clear: false,
            exclude: ExcludeSet::new(),
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub source: ProjectSource,
    pub cleared_dirs: usize,
    pub config_lines_added: Vec<String>,
    pub device: Option<DeviceHandle>,
    pub artifact: Option<ArtifactReference>,
    pub states: Vec<BuildState>,
}

/// Per-run memoized state, discarded when the run ends
#[derive(Default)]
struct RunContext {
    source: Option<ProjectSource>,
    toolchains: ToolchainRoots,
    states: Vec<BuildState>,
}

pub struct BuildOrchestrator {
    config: AppConfig,
    runner: Arc<dyn ToolRunner>,
    probe: ToolchainProbe,
    registry: ProjectRegistry,
    boards: BoardTypeRegistry,
    events: Option<mpsc::UnboundedSender<AppEvent>>,
}

impl BuildOrchestrator {
    pub fn new(config: AppConfig, runner: Arc<dyn ToolRunner>) -> Self {
        let probe = ToolchainProbe::from_config(&config.toolchain);
        let boards = BoardTypeRegistry::from_config(&config.board);
        Self {
            config,
            runner,
            probe,
            registry: ProjectRegistry::new(),
            boards,
            events: None,
        }
    }

    pub fn with_probe(mut self, probe: ToolchainProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn device_selector(&self) -> DeviceSelector {
        DeviceSelector::new(self.runner.clone(), &self.config.tools.device_tool)
    }

    /// Classify, optionally clear and select a device, then build and optionally flash
    pub async fn run(&self, options: &BuildOptions) -> Result<RunReport> {
        let mut ctx = RunContext::default();
        let mut report = RunReport::default();

        match self.run_pipeline(&mut ctx, &mut report, options).await {
            Ok(()) => {
                report.states = ctx.states;
                Ok(report)
            }
            Err(e) => {
                self.transition(&mut ctx.states, BuildState::Failed(e.to_string()));
                self.emit(AppEvent::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Classify the project and remove every earlier build output directory
    pub fn clear_only(&self, project_dir: &Path) -> Result<usize> {
        let mut ctx = RunContext::default();
        let source = self.ensure_source(&mut ctx, project_dir)?;
        let handler = self.registry.require_handler(source, project_dir)?;
        self.clear_artifacts(&mut ctx, handler)
    }

    async fn run_pipeline(
        &self,
        ctx: &mut RunContext,
        report: &mut RunReport,
        options: &BuildOptions,
    ) -> Result<()> {
        self.transition(&mut ctx.states, BuildState::Idle);

        let source = self.ensure_source(ctx, &options.project_dir)?;
        report.source = source;
        self.transition(&mut ctx.states, BuildState::Classified(source));
        let handler = self.registry.require_handler(source, &options.project_dir)?;

        if options.clear {
            report.cleared_dirs = self.clear_artifacts(ctx, handler)?;
        }

        let device = if options.upload {
            let device = self.device_selector().select_target(&options.exclude).await?;
            self.transition(&mut ctx.states, BuildState::DeviceSelected(device.serial.clone()));
            Some(device)
        } else {
            None
        };

        for toolchain in handler.build_toolchains() {
            ctx.toolchains.ensure(&self.probe, *toolchain)?;
        }

        let target = self.boards.resolve(&options.board);
        let build_ctx = BuildContext {
            project_dir: &options.project_dir,
            target: &target,
            toolchains: &ctx.toolchains,
            config: &self.config,
        };

        let outcome = handler.prepare(&build_ctx)?;
        report.config_lines_added = outcome.appended;
        self.transition(&mut ctx.states, BuildState::ConfigReady);

        let invocation = handler.build_invocation(&build_ctx)?;
        log::info!("🔨 Executing: {}", invocation);
        let output = self.runner.run(&invocation).await.map_err(|e| {
            TeensyBrewError::BuildFailed(format!("could not run {}: {}", invocation.tool_name(), e))
        })?;
        if !output.is_success() {
            return Err(TeensyBrewError::BuildFailed(format!(
                "{} {}",
                invocation.tool_name(),
                output.failure_reason()
            )));
        }
        self.transition(&mut ctx.states, BuildState::Built);

        let Some(device) = device else {
            return Ok(());
        };

        for toolchain in handler.output_toolchains() {
            ctx.toolchains.ensure(&self.probe, *toolchain)?;
        }
        let locator = handler.artifact_locator(&self.config, &ctx.toolchains)?;
        let artifact = locator
            .find_latest_artifact()?
            .ok_or_else(|| TeensyBrewError::ArtifactNotFound(locator.describe()))?;
        log::info!(
            "📦 Firmware image: {} ({})",
            artifact.path.display(),
            artifact.modified_display()
        );
        self.transition(&mut ctx.states, BuildState::ArtifactLocated);

        self.device_selector().flash(&device, &artifact).await?;
        self.transition(&mut ctx.states, BuildState::Flashed);

        report.device = Some(device);
        report.artifact = Some(artifact);
        Ok(())
    }

    /// Classify once per run
    fn ensure_source(&self, ctx: &mut RunContext, project_dir: &Path) -> Result<ProjectSource> {
        if let Some(source) = ctx.source {
            return Ok(source);
        }
        let source = ProjectClassifier::classify(project_dir)?;
        log::info!("🔍 Detected project type: {}", source.name());
        log::debug!("📝 {}", source.description());
        ctx.source = Some(source);
        Ok(source)
    }

    /// Remove the newest output directory until none remain, re-probing after
    /// each removal and stopping after the configured number of iterations
    fn clear_artifacts(&self, ctx: &mut RunContext, handler: &dyn ProjectHandler) -> Result<usize> {
        for toolchain in handler.output_toolchains() {
            ctx.toolchains.ensure(&self.probe, *toolchain)?;
        }
        let locator = handler.artifact_locator(&self.config, &ctx.toolchains)?;
        let max_iterations = self.config.artifacts.max_clear_iterations;

        let mut removed = 0;
        while let Some(dir) = locator.latest_output_dir()? {
            if removed >= max_iterations {
                let message = format!(
                    "Stopped clearing after {} removals, {} still present",
                    removed,
                    dir.display()
                );
                self.emit(AppEvent::Warning(message));
                break;
            }
            log::info!("🧹 Removing {}", dir.display());
            std::fs::remove_dir_all(&dir)?;
            removed += 1;
        }

        if removed > 0 {
            self.emit(AppEvent::Info(format!(
                "Removed {} old build output director{}",
                removed,
                if removed == 1 { "y" } else { "ies" }
            )));
        }
        Ok(removed)
    }

    fn transition(&self, states: &mut Vec<BuildState>, state: BuildState) {
        states.push(state.clone());
        self.emit(AppEvent::StateChanged(state));
    }

    /// Send to the attached channel, or log directly when none is attached
    fn emit(&self, event: AppEvent) {
        match &self.events {
            Some(tx) => {
                let _ = tx.send(event);
            }
            None => log_event(&event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolchainConfig;
    use crate::utils::process::{ToolInvocation, ToolOutput};
    use async_trait::async_trait;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<ToolInvocation>>,
    }

    #[async_trait]
    impl ToolRunner for RecordingRunner {
        async fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(ToolOutput::success(""))
        }
    }

    fn orchestrator(config: AppConfig, runner: Arc<RecordingRunner>) -> BuildOrchestrator {
        let probe = ToolchainProbe::from_config_with_env(
            &config.toolchain,
            Arc::new(|_: &str| -> Option<OsString> { None }),
        );
        BuildOrchestrator::new(config, runner).with_probe(probe)
    }

    #[test]
    fn test_clear_is_capped() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("blink");
        let tmp = temp_dir.path().join("tmp");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("main.ino"), "void setup() {}\nvoid loop() {}\n").unwrap();
        for i in 0..3 {
            fs::create_dir_all(tmp.join(format!("arduino_build_{}", i))).unwrap();
        }

        let mut config = AppConfig::default();
        config.artifacts.temp_dir = Some(tmp.clone());
        config.artifacts.max_clear_iterations = 2;
        config.toolchain = ToolchainConfig {
            search_root: Some(temp_dir.path().join("empty")),
            ..ToolchainConfig::default()
        };

        let runner = Arc::new(RecordingRunner::default());
        let removed = orchestrator(config, runner.clone()).clear_only(&project).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(fs::read_dir(&tmp).unwrap().count(), 1);
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clear_cap_reported_through_channel_once() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("blink");
        let tmp = temp_dir.path().join("tmp");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("main.ino"), "").unwrap();
        for i in 0..2 {
            fs::create_dir_all(tmp.join(format!("arduino_build_{}", i))).unwrap();
        }

        let mut config = AppConfig::default();
        config.artifacts.temp_dir = Some(tmp);
        config.artifacts.max_clear_iterations = 1;
        config.toolchain.search_root = Some(temp_dir.path().join("empty"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let removed = orchestrator(config, Arc::new(RecordingRunner::default()))
            .with_events(tx)
            .clear_only(&project)
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(removed, 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, AppEvent::Warning(_)))
                .count(),
            1
        );
        assert!(matches!(events.last(), Some(AppEvent::Info(_))));
    }

    #[tokio::test]
    async fn test_missing_toolchain_fails_before_build() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("blink");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("main.ino"), "").unwrap();

        let mut config = AppConfig::default();
        config.toolchain.search_root = Some(temp_dir.path().join("empty"));

        let runner = Arc::new(RecordingRunner::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = orchestrator(config, runner.clone())
            .with_events(tx)
            .run(&BuildOptions::new(&project, "teensyLC"))
            .await;

        assert!(matches!(result, Err(TeensyBrewError::ToolchainNotFound(_))));
        assert!(runner.calls.lock().unwrap().is_empty());

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(AppEvent::Failed(_))));
    }
}
