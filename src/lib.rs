//! TeensyBrew - Teensy build and upload orchestrator
//!
//! TeensyBrew detects whether a project is an Arduino sketch or a set of
//! MicroPython scripts, keeps the Teensyduino board definitions carrying the
//! variables a command-line build needs, runs the matching external builder,
//! and flashes the newest firmware image to exactly one attached Teensy.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod projects;
pub mod services;
pub mod toolchain;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;
pub use projects::{ProjectClassifier, ProjectHandler, ProjectRegistry};
pub use services::{BuildOptions, BuildOrchestrator, RunReport};

/// TeensyBrew version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// TeensyBrew application name
pub const APP_NAME: &str = "teensybrew";
