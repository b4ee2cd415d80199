//! Project source type detection

use crate::errors::{Result, TeensyBrewError};
use crate::models::ProjectSource;
use std::fs;
use std::path::Path;

/// File name prefixes marking a MicroPython project
pub const MICROPYTHON_MARKERS: &[&str] = &["main.py", "boot.py"];
/// File name prefix marking an Arduino sketch
pub const ARDUINO_MARKER: &str = "main.ino";

/// Decides which ecosystem a project directory belongs to
pub struct ProjectClassifier;

impl ProjectClassifier {
    /// Inspect the regular files (or links to them) directly inside `project_dir`.
    ///
    /// MicroPython markers take precedence over the sketch marker, so a
    /// directory holding both `main.py` and `main.ino` is a MicroPython
    /// project whatever order the filesystem lists them in.
    pub fn classify(project_dir: &Path) -> Result<ProjectSource> {
        let mut found_sketch = false;

        for entry in fs::read_dir(project_dir)? {
            let entry = entry?;
            // Follows symlinks, so a linked main.ino still counts
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if MICROPYTHON_MARKERS.iter().any(|m| name.starts_with(m)) {
                log::debug!("Found MicroPython marker {}", name);
                return Ok(ProjectSource::MicroPython);
            }
            if name.starts_with(ARDUINO_MARKER) {
                log::debug!("Found Arduino marker {}", name);
                found_sketch = true;
            }
        }

        if found_sketch {
            Ok(ProjectSource::Arduino)
        } else {
            Err(TeensyBrewError::UnrecognizedSourceType(
                project_dir.to_path_buf(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            fs::write(temp_dir.path().join(file), "").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_sketch_is_arduino() {
        let project = project_with(&["main.ino", "README.md", "helpers.h"]);
        assert_eq!(
            ProjectClassifier::classify(project.path()).unwrap(),
            ProjectSource::Arduino
        );
    }

    #[test]
    fn test_boot_py_is_micropython() {
        let project = project_with(&["boot.py", "lib.py"]);
        assert_eq!(
            ProjectClassifier::classify(project.path()).unwrap(),
            ProjectSource::MicroPython
        );
    }

    #[test]
    fn test_main_py_wins_over_sketch() {
        let project = project_with(&["main.ino", "main.py"]);
        assert_eq!(
            ProjectClassifier::classify(project.path()).unwrap(),
            ProjectSource::MicroPython
        );
    }

    #[test]
    fn test_prefix_match() {
        let project = project_with(&["main.ino.bak"]);
        assert_eq!(
            ProjectClassifier::classify(project.path()).unwrap(),
            ProjectSource::Arduino
        );
    }

    #[test]
    fn test_marker_directories_are_ignored() {
        let project = project_with(&["notes.txt"]);
        fs::create_dir(project.path().join("main.py")).unwrap();

        assert!(matches!(
            ProjectClassifier::classify(project.path()),
            Err(TeensyBrewError::UnrecognizedSourceType(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_sketch_is_recognized() {
        let project = project_with(&["real_main.ino"]);
        std::os::unix::fs::symlink(
            project.path().join("real_main.ino"),
            project.path().join("main.ino"),
        )
        .unwrap();

        assert_eq!(
            ProjectClassifier::classify(project.path()).unwrap(),
            ProjectSource::Arduino
        );
    }

    #[test]
    fn test_unrecognized() {
        let project = project_with(&["sketch.ino", "app.py"]);
        assert!(matches!(
            ProjectClassifier::classify(project.path()),
            Err(TeensyBrewError::UnrecognizedSourceType(_))
        ));
    }
}
