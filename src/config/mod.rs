//! Configuration management for TeensyBrew

pub mod app_config;
pub mod board_types;

pub use app_config::*;
pub use board_types::*;
