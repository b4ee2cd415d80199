//! Error types shared across TeensyBrew

pub mod types;

pub use types::*;
