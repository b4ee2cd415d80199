use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ProjectSource, Toolchain};
use crate::projects::registry::{BuildContext, ProjectHandler};
use crate::services::artifact_locator::ArtifactLocator;
use crate::toolchain::{ReconcileOutcome, ToolchainRoots};
use crate::utils::process::ToolInvocation;
use std::path::{Path, PathBuf};

/// Port directory inside the MicroPython checkout
pub const TEENSY_PORT_DIR: &str = "teensy";
/// Where the port's Makefile writes firmware images
pub const BUILD_DIR: &str = "build";

/// Handler for MicroPython scripts frozen into the Teensy port
pub struct MicroPythonHandler;

impl MicroPythonHandler {
    pub fn port_dir(micropython_root: &Path) -> PathBuf {
        micropython_root.join(TEENSY_PORT_DIR)
    }

    pub fn build_dir(micropython_root: &Path) -> PathBuf {
        Self::port_dir(micropython_root).join(BUILD_DIR)
    }
}

impl ProjectHandler for MicroPythonHandler {
    fn project_source(&self) -> ProjectSource {
        ProjectSource::MicroPython
    }

    // The port links against the Teensyduino core shipped with the Arduino IDE
    fn build_toolchains(&self) -> &'static [Toolchain] {
        &[Toolchain::Arduino, Toolchain::MicroPython]
    }

    fn output_toolchains(&self) -> &'static [Toolchain] {
        &[Toolchain::MicroPython]
    }

    fn prepare(&self, ctx: &BuildContext<'_>) -> Result<ReconcileOutcome> {
        log::debug!(
            "No board configuration needed for MicroPython project {}",
            ctx.project_dir.display()
        );
        Ok(ReconcileOutcome::default())
    }

    fn build_invocation(&self, ctx: &BuildContext<'_>) -> Result<ToolInvocation> {
        let arduino_root = ctx.toolchains.get(Toolchain::Arduino)?;
        let micropython_root = ctx.toolchains.get(Toolchain::MicroPython)?;

        Ok(ToolInvocation::new(&ctx.config.tools.make)
            .current_dir(Self::port_dir(micropython_root))
            .env("ARDUINO_TOP", arduino_root)
            .env("FROZEN_DIR", ctx.project_dir))
    }

    fn artifact_locator(
        &self,
        config: &AppConfig,
        toolchains: &ToolchainRoots,
    ) -> Result<ArtifactLocator> {
        let micropython_root = toolchains.get(Toolchain::MicroPython)?;
        Ok(ArtifactLocator::output_dir(
            Self::build_dir(micropython_root),
            &config.artifacts.extension,
        ))
    }
}
