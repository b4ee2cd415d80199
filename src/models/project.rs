//! Project-related data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which firmware ecosystem a project directory belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectSource {
    /// Not yet classified
    #[default]
    Unknown,
    /// Scripted firmware built into the MicroPython Teensy port (`main.py` / `boot.py`)
    MicroPython,
    /// Compiled Arduino sketch built with arduino-builder (`main.ino`)
    Arduino,
}

impl ProjectSource {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectSource::Unknown => "Unknown",
            ProjectSource::MicroPython => "MicroPython",
            ProjectSource::Arduino => "Arduino",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProjectSource::Unknown => "Unrecognized project layout",
            ProjectSource::MicroPython => "MicroPython scripts frozen into the Teensy port",
            ProjectSource::Arduino => "Arduino sketch compiled with the Teensyduino core",
        }
    }
}

impl fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Installed toolchains the orchestrator may need to locate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toolchain {
    /// Arduino IDE installation carrying the Teensyduino hardware package
    Arduino,
    /// MicroPython source checkout with the Teensy port
    MicroPython,
}

impl Toolchain {
    pub fn name(&self) -> &'static str {
        match self {
            Toolchain::Arduino => "Arduino",
            Toolchain::MicroPython => "MicroPython",
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orchestration progress for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Classified(ProjectSource),
    ConfigReady,
    DeviceSelected(String),
    Built,
    ArtifactLocated,
    Flashed,
    Failed(String),
}

impl BuildState {
    pub fn symbol(&self) -> &'static str {
        match self {
            BuildState::Idle => "⏳",
            BuildState::Classified(_) => "🔍",
            BuildState::ConfigReady => "📝",
            BuildState::DeviceSelected(_) => "🎯",
            BuildState::Built => "✅",
            BuildState::ArtifactLocated => "📦",
            BuildState::Flashed => "🔥",
            BuildState::Failed(_) => "❌",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Idle => write!(f, "idle"),
            BuildState::Classified(source) => write!(f, "classified as {}", source),
            BuildState::ConfigReady => write!(f, "configuration ready"),
            BuildState::DeviceSelected(serial) => write!(f, "device {} selected", serial),
            BuildState::Built => write!(f, "built"),
            BuildState::ArtifactLocated => write!(f, "artifact located"),
            BuildState::Flashed => write!(f, "flashed"),
            BuildState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
