//! Project classification and build system integrations
//!
//! This module decides whether a project is an Arduino sketch or a set of
//! MicroPython scripts and provides the matching build handler.

pub mod classifier;
pub mod handlers;
pub mod registry;

pub use crate::models::ProjectSource;
pub use classifier::ProjectClassifier;
pub use registry::{BuildContext, ProjectHandler, ProjectRegistry};
