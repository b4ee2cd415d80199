//! Project handler registry and trait definitions

use std::path::Path;

use crate::config::AppConfig;
use crate::errors::{Result, TeensyBrewError};
use crate::models::{BuildTarget, ProjectSource, Toolchain};
use crate::services::artifact_locator::ArtifactLocator;
use crate::toolchain::{ReconcileOutcome, ToolchainRoots};
use crate::utils::process::ToolInvocation;

/// Everything a handler needs to prepare and describe a build
pub struct BuildContext<'a> {
    pub project_dir: &'a Path,
    pub target: &'a BuildTarget,
    pub toolchains: &'a ToolchainRoots,
    pub config: &'a AppConfig,
}

/// Ecosystem-specific build behaviour
pub trait ProjectHandler: Send + Sync {
    fn project_source(&self) -> ProjectSource;

    /// Toolchains that must be located before building
    fn build_toolchains(&self) -> &'static [Toolchain];

    /// Toolchains that must be located to find build output
    fn output_toolchains(&self) -> &'static [Toolchain];

    /// Bring shared toolchain configuration up to date before a build
    fn prepare(&self, ctx: &BuildContext<'_>) -> Result<ReconcileOutcome>;

    /// The external build command
    fn build_invocation(&self, ctx: &BuildContext<'_>) -> Result<ToolInvocation>;

    /// Where this ecosystem's firmware images end up
    fn artifact_locator(&self, config: &AppConfig, toolchains: &ToolchainRoots)
    -> Result<ArtifactLocator>;
}

/// Registry for managing project handlers
pub struct ProjectRegistry {
    handlers: Vec<Box<dyn ProjectHandler>>,
}

impl ProjectRegistry {
    /// Create a new registry with all supported project handlers
    pub fn new() -> Self {
        let handlers: Vec<Box<dyn ProjectHandler>> = vec![
            Box::new(crate::projects::handlers::arduino::ArduinoHandler),
            Box::new(crate::projects::handlers::micropython::MicroPythonHandler),
        ];

        Self { handlers }
    }

    pub fn handler_for(&self, source: ProjectSource) -> Option<&dyn ProjectHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.project_source() == source)
            .map(|handler| handler.as_ref())
    }

    /// Like [`handler_for`](Self::handler_for), failing for unsupported sources
    pub fn require_handler(
        &self,
        source: ProjectSource,
        project_dir: &Path,
    ) -> Result<&dyn ProjectHandler> {
        self.handler_for(source)
            .ok_or_else(|| TeensyBrewError::UnrecognizedSourceType(project_dir.to_path_buf()))
    }

    /// Get all registered handlers
    pub fn get_all_handlers(&self) -> &[Box<dyn ProjectHandler>] {
        &self.handlers
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_source_has_a_handler() {
        let registry = ProjectRegistry::new();
        assert!(registry.handler_for(ProjectSource::Arduino).is_some());
        assert!(registry.handler_for(ProjectSource::MicroPython).is_some());
        assert!(registry.handler_for(ProjectSource::Unknown).is_none());
        assert_eq!(registry.get_all_handlers().len(), 2);
    }

    #[test]
    fn test_unknown_source_is_unrecognized() {
        let registry = ProjectRegistry::new();
        assert!(matches!(
            registry.require_handler(ProjectSource::Unknown, Path::new("blink")),
            Err(TeensyBrewError::UnrecognizedSourceType(_))
        ));
    }
}
