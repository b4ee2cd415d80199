//! Utility functions and helpers used throughout TeensyBrew

pub mod logging;
pub mod process;

pub use process::{SystemToolRunner, ToolInvocation, ToolOutput, ToolRunner};
