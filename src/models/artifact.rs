//! Build artifact models

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::SystemTime;

/// A compiled firmware image and when it was last written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl ArtifactReference {
    pub fn new(path: PathBuf, modified: SystemTime) -> Self {
        Self { path, modified }
    }

    /// Modification time formatted for log output
    pub fn modified_display(&self) -> String {
        let local: DateTime<Local> = self.modified.into();
        local.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
