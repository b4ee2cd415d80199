//! Data models and types used throughout TeensyBrew

pub mod artifact;
pub mod board;
pub mod device;
pub mod events;
pub mod project;

// Re-export commonly used types
pub use artifact::*;
pub use board::*;
pub use device::*;
pub use events::*;
pub use project::*;
