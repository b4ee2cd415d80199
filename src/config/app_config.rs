//! Application configuration management

use crate::errors::{Result, TeensyBrewError};
use crate::models::BuildVariable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Toolchain location settings
    pub toolchain: ToolchainConfig,
    /// External tool names
    pub tools: ToolsConfig,
    /// Build output discovery
    pub artifacts: ArtifactConfig,
    /// Board selection and required build variables
    pub board: BoardConfig,
}

/// Where the Arduino and MicroPython toolchains live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Explicit Arduino installation root
    pub arduino_root: Option<PathBuf>,
    /// Explicit MicroPython checkout root
    pub micropython_root: Option<PathBuf>,
    /// Environment variable overriding the Arduino root
    pub arduino_env_var: String,
    /// Environment variable overriding the MicroPython root
    pub micropython_env_var: String,
    /// Where the recursive toolchain search starts (home directory if unset)
    pub search_root: Option<PathBuf>,
    /// Board definition file, relative to the Arduino root
    pub boards_file: PathBuf,
}

/// External programs invoked by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub arduino_builder: String,
    pub make: String,
    /// TyTools command line client used for listing and uploading
    pub device_tool: String,
    /// Vendor and architecture part of the FQBN
    pub fqbn_prefix: String,
}

/// Build output discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Shared temporary directory arduino-builder writes into (OS temp dir if unset)
    pub temp_dir: Option<PathBuf>,
    /// Prefix of arduino-builder output directories
    pub build_dir_prefix: String,
    /// Firmware image extension without the dot
    pub extension: String,
    /// Upper bound on removals performed by a single clear
    pub max_clear_iterations: usize,
}

/// Board selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board used when none is given on the command line
    pub default_board: String,
    /// Replaces the built-in variable set when present
    pub variables: Option<Vec<BuildVariable>>,
}

impl AppConfig {
    /// Load configuration from an explicit file, the user config file, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TeensyBrewError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/teensybrew/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Temporary directory arduino-builder output is searched in
    pub fn temp_dir(&self) -> PathBuf {
        self.artifacts
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            arduino_root: None,
            micropython_root: None,
            arduino_env_var: "ARDUINO_FOLDER".to_string(),
            micropython_env_var: "MICROPYTHON_FOLDER".to_string(),
            search_root: None,
            boards_file: PathBuf::from("hardware/teensy/avr/boards.txt"),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            arduino_builder: "arduino-builder".to_string(),
            make: "make".to_string(),
            device_tool: "tyc".to_string(),
            fqbn_prefix: "teensy:avr".to_string(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            build_dir_prefix: "arduino".to_string(),
            extension: "hex".to_string(),
            max_clear_iterations: 64,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_board: "teensyLC".to_string(),
            variables: None,
        }
    }
}
