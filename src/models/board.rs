//! Board-related data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `key=value` entry the Teensyduino board definition must carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVariable {
    /// Key suffix appended to the board id, e.g. `.build.fcpu`
    pub key: String,
    pub value: String,
}

impl BuildVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Render the board-namespaced line, e.g. `teensyLC.build.fcpu=48000000`
    pub fn render(&self, board_id: &str) -> String {
        format!("{}{}={}", board_id, self.key, self.value)
    }
}

/// A board variant and the build variables it requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Board identifier used in the FQBN and as the variable namespace
    pub id: String,
    pub name: String,
    pub variables: Vec<BuildVariable>,
}

impl BuildTarget {
    pub fn new(id: impl Into<String>, name: impl Into<String>, variables: Vec<BuildVariable>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variables,
        }
    }

    /// All lines this target needs in the board definition file
    pub fn required_lines(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.render(&self.id)).collect()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.name)
    }
}
