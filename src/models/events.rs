//! Application events emitted while orchestrating a run

use crate::models::project::BuildState;

/// Application events for communication between components
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    StateChanged(BuildState),
    Info(String),
    Warning(String),
    Failed(String),
}
