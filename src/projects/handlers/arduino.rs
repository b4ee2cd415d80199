use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ProjectSource, Toolchain};
use crate::projects::registry::{BuildContext, ProjectHandler};
use crate::services::artifact_locator::ArtifactLocator;
use crate::toolchain::{BoardConfigReconciler, ReconcileOutcome, ToolchainRoots};
use crate::utils::process::ToolInvocation;
use std::path::{Path, PathBuf};

/// Sketch compiled by arduino-builder
pub const SKETCH_FILE: &str = "main.ino";

/// Handler for Arduino sketches built against the Teensyduino core
pub struct ArduinoHandler;

impl ArduinoHandler {
    /// arduino-builder bundled with the IDE, falling back to the configured program
    fn builder_program(arduino_root: &Path, config: &AppConfig) -> PathBuf {
        let bundled = arduino_root.join(format!(
            "{}{}",
            config.tools.arduino_builder,
            std::env::consts::EXE_SUFFIX
        ));
        if bundled.is_file() {
            bundled
        } else {
            PathBuf::from(&config.tools.arduino_builder)
        }
    }

    pub fn boards_file(arduino_root: &Path, config: &AppConfig) -> PathBuf {
        arduino_root.join(&config.toolchain.boards_file)
    }
}

impl ProjectHandler for ArduinoHandler {
    fn project_source(&self) -> ProjectSource {
        ProjectSource::Arduino
    }

    fn build_toolchains(&self) -> &'static [Toolchain] {
        &[Toolchain::Arduino]
    }

    fn output_toolchains(&self) -> &'static [Toolchain] {
        &[]
    }

    fn prepare(&self, ctx: &BuildContext<'_>) -> Result<ReconcileOutcome> {
        let arduino_root = ctx.toolchains.get(Toolchain::Arduino)?;
        let reconciler = BoardConfigReconciler::new(Self::boards_file(arduino_root, ctx.config));
        let outcome = reconciler.reconcile_target(ctx.target)?;
        if outcome.changed() {
            log::info!(
                "📝 Added {} build variable(s) for {} to {}",
                outcome.appended.len(),
                ctx.target.id,
                reconciler.path().display()
            );
        }
        Ok(outcome)
    }

    fn build_invocation(&self, ctx: &BuildContext<'_>) -> Result<ToolInvocation> {
        let root = ctx.toolchains.get(Toolchain::Arduino)?;
        let fqbn = format!("{}:{}", ctx.config.tools.fqbn_prefix, ctx.target.id);

        Ok(ToolInvocation::new(Self::builder_program(root, ctx.config))
            .args(["-fqbn", fqbn.as_str()])
            .arg("-hardware")
            .arg(root.join("hardware"))
            .arg("-tools")
            .arg(root.join("hardware").join("tools"))
            .arg("-tools")
            .arg(root.join("tools-builder"))
            .arg("-libraries")
            .arg(root.join("hardware").join("teensy").join("avr").join("libraries"))
            .arg("-libraries")
            .arg(ctx.project_dir)
            .arg(ctx.project_dir.join(SKETCH_FILE)))
    }

    fn artifact_locator(
        &self,
        config: &AppConfig,
        _toolchains: &ToolchainRoots,
    ) -> Result<ArtifactLocator> {
        Ok(ArtifactLocator::prefixed_subdirs(
            config.temp_dir(),
            &config.artifacts.build_dir_prefix,
            &config.artifacts.extension,
        ))
    }
}
