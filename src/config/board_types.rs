//! Board type configuration and management

use crate::config::BoardConfig;
use crate::models::{BuildTarget, BuildVariable};
use std::collections::BTreeMap;

/// Variables Teensyduino's boards.txt needs for a command-line build
pub fn default_build_variables() -> Vec<BuildVariable> {
    vec![
        BuildVariable::new(".build.fcpu", "48000000"),
        BuildVariable::new(".build.flags.optimize", "-Os"),
        BuildVariable::new(".build.flags.ldspecs", "--specs=nano.specs"),
        BuildVariable::new(".build.keylayout", "US_ENGLISH"),
        BuildVariable::new(".build.usbtype", "USB_SERIAL"),
    ]
}

const KNOWN_BOARDS: &[(&str, &str)] = &[
    ("teensyLC", "Teensy LC"),
    ("teensy30", "Teensy 3.0"),
    ("teensy31", "Teensy 3.1"),
    ("teensy32", "Teensy 3.2"),
    ("teensy35", "Teensy 3.5"),
    ("teensy36", "Teensy 3.6"),
];

/// Board type registry for managing available build targets
pub struct BoardTypeRegistry {
    variables: Vec<BuildVariable>,
    board_types: BTreeMap<String, BuildTarget>,
}

impl BoardTypeRegistry {
    pub fn new() -> Self {
        Self::with_variables(default_build_variables())
    }

    /// Registry of the known Teensy boards, all requiring `variables`
    pub fn with_variables(variables: Vec<BuildVariable>) -> Self {
        let mut registry = Self {
            variables,
            board_types: BTreeMap::new(),
        };
        for (id, name) in KNOWN_BOARDS {
            let target = BuildTarget::new(*id, *name, registry.variables.clone());
            registry.add_board_type(target);
        }
        registry
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        match &config.variables {
            Some(variables) => Self::with_variables(variables.clone()),
            None => Self::new(),
        }
    }

    pub fn add_board_type(&mut self, board_type: BuildTarget) {
        self.board_types.insert(board_type.id.clone(), board_type);
    }

    pub fn get_board_type(&self, id: &str) -> Option<&BuildTarget> {
        self.board_types.get(id)
    }

    /// Known target, or an ad-hoc one carrying the registry's variable set
    pub fn resolve(&self, id: &str) -> BuildTarget {
        match self.get_board_type(id) {
            Some(target) => target.clone(),
            None => {
                log::warn!("Unknown board '{}', using the default build variables", id);
                BuildTarget::new(id, id, self.variables.clone())
            }
        }
    }

    pub fn list_board_types(&self) -> Vec<&BuildTarget> {
        self.board_types.values().collect()
    }
}

impl Default for BoardTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
