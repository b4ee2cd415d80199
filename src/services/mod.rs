//! Core services: artifact discovery, device selection and build orchestration

pub mod artifact_locator;
pub mod device_selector;
pub mod orchestrator;

pub use artifact_locator::{ArtifactLayout, ArtifactLocator};
pub use device_selector::{DeviceSelector, choose_device, parse_device_list};
pub use orchestrator::{BuildOptions, BuildOrchestrator, RunReport};
