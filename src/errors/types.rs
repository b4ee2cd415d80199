//! Custom error types for TeensyBrew

use std::fmt;
use std::path::PathBuf;

/// Main error type for TeensyBrew operations
#[derive(Debug)]
pub enum TeensyBrewError {
    /// The project directory has neither `main.py`/`boot.py` nor `main.ino`
    UnrecognizedSourceType(PathBuf),
    /// No override and no filesystem match for a toolchain root
    ToolchainNotFound(String),
    /// The board configuration file could not be opened for reading
    ConfigNotFound(PathBuf, std::io::Error),
    /// Every attached device was excluded, or none were listed
    NoDeviceFound,
    /// More than one device remained after exclusion
    AmbiguousDeviceSelection(Vec<String>),
    /// The device listing tool could not be run or reported failure
    DeviceListFailed(String),
    /// The external build tool failed to start or exited non-zero
    BuildFailed(String),
    /// No firmware image was produced where one was expected
    ArtifactNotFound(String),
    /// The external flashing tool failed to start or exited non-zero
    FlashFailed(String),
    /// Invalid or unreadable application configuration
    Config(String),
    /// General I/O errors
    Io(std::io::Error),
}

impl fmt::Display for TeensyBrewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeensyBrewError::UnrecognizedSourceType(dir) => write!(
                f,
                "Unrecognized source type in {}: expected main.py, boot.py or main.ino",
                dir.display()
            ),
            TeensyBrewError::ToolchainNotFound(name) => {
                write!(f, "Toolchain not found: {}", name)
            }
            TeensyBrewError::ConfigNotFound(path, err) => write!(
                f,
                "Board configuration file not found: {} ({})",
                path.display(),
                err
            ),
            TeensyBrewError::NoDeviceFound => write!(f, "Could not find a device to program"),
            TeensyBrewError::AmbiguousDeviceSelection(devices) => write!(
                f,
                "More than one device attached ({}), refusing to guess. Use --exclude",
                devices.join(", ")
            ),
            TeensyBrewError::DeviceListFailed(msg) => write!(f, "Device listing failed: {}", msg),
            TeensyBrewError::BuildFailed(msg) => write!(f, "Build failed: {}", msg),
            TeensyBrewError::ArtifactNotFound(msg) => write!(f, "Artifact not found: {}", msg),
            TeensyBrewError::FlashFailed(msg) => write!(f, "Flash failed: {}", msg),
            TeensyBrewError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TeensyBrewError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for TeensyBrewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TeensyBrewError::ConfigNotFound(_, err) => Some(err),
            TeensyBrewError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TeensyBrewError {
    fn from(err: std::io::Error) -> Self {
        TeensyBrewError::Io(err)
    }
}

impl From<toml::de::Error> for TeensyBrewError {
    fn from(err: toml::de::Error) -> Self {
        TeensyBrewError::Config(err.to_string())
    }
}

/// Result type alias for TeensyBrew operations
pub type Result<T> = std::result::Result<T, TeensyBrewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_selection_lists_devices() {
        let err = TeensyBrewError::AmbiguousDeviceSelection(vec![
            "1743330".to_string(),
            "2097150".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("1743330"));
        assert!(msg.contains("2097150"));
    }

    #[test]
    fn test_config_not_found_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TeensyBrewError::ConfigNotFound(PathBuf::from("/nope/boards.txt"), io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/nope/boards.txt"));
    }
}
