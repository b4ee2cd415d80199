//! Firmware image discovery

use crate::errors::{Result, TeensyBrewError};
use crate::models::ArtifactReference;
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// How build output is laid out below the search roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLayout {
    /// One output directory per build, named `<prefix>...` (arduino-builder in the temp dir)
    PrefixedSubdirs { prefix: String },
    /// Each root is itself the output directory (MicroPython `teensy/build`)
    OutputDir,
}

/// Finds the most recently written firmware image
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    roots: Vec<PathBuf>,
    layout: ArtifactLayout,
    extension: String,
}

impl ArtifactLocator {
    pub fn new(roots: Vec<PathBuf>, layout: ArtifactLayout, extension: impl Into<String>) -> Self {
        Self {
            roots,
            layout,
            extension: extension.into(),
        }
    }

    pub fn prefixed_subdirs(root: impl Into<PathBuf>, prefix: &str, extension: &str) -> Self {
        Self::new(
            vec![root.into()],
            ArtifactLayout::PrefixedSubdirs {
                prefix: prefix.to_string(),
            },
            extension,
        )
    }

    pub fn output_dir(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self::new(vec![dir.into()], ArtifactLayout::OutputDir, extension)
    }

    /// Human readable description of where images are looked for
    pub fn describe(&self) -> String {
        let roots: Vec<String> = self.roots.iter().map(|r| r.display().to_string()).collect();
        match &self.layout {
            ArtifactLayout::PrefixedSubdirs { prefix } => format!(
                "*.{} in {}* directories under {}",
                self.extension,
                prefix,
                roots.join(", ")
            ),
            ArtifactLayout::OutputDir => format!("*.{} in {}", self.extension, roots.join(", ")),
        }
    }

    /// Latest image by modification time; `None` when no image exists or an
    /// output directory is missing. Equal timestamps go to the greater path.
    pub fn find_latest_artifact(&self) -> Result<Option<ArtifactReference>> {
        let mut candidates = Vec::new();
        for dir in self.output_dirs()? {
            let pattern = format!("{}/*.{}", escape(&dir.path), self.extension);
            for (path, modified) in glob_with_mtime(&pattern, |p| p.is_file())? {
                candidates.push(ArtifactReference::new(path, modified));
            }
        }

        let latest = candidates
            .into_iter()
            .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
        if let Some(artifact) = &latest {
            log::debug!(
                "Latest artifact {} (modified {})",
                artifact.path.display(),
                artifact.modified_display()
            );
        }
        Ok(latest)
    }

    /// Most recently modified output directory, whether or not it holds an image
    pub fn latest_output_dir(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .output_dirs()?
            .into_iter()
            .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)))
            .map(|dir| dir.path))
    }

    fn output_dirs(&self) -> Result<Vec<OutputDir>> {
        let mut dirs = Vec::new();
        for root in &self.roots {
            match &self.layout {
                ArtifactLayout::PrefixedSubdirs { prefix } => {
                    let pattern = format!("{}/{}*", escape(root), Pattern::escape(prefix));
                    for (path, modified) in glob_with_mtime(&pattern, |p| p.is_dir())? {
                        dirs.push(OutputDir { path, modified });
                    }
                }
                ArtifactLayout::OutputDir => {
                    if !root.is_dir() {
                        log::debug!("Output directory {} does not exist", root.display());
                        continue;
                    }
                    let modified = root.metadata()?.modified()?;
                    dirs.push(OutputDir {
                        path: root.clone(),
                        modified,
                    });
                }
            }
        }
        Ok(dirs)
    }
}

struct OutputDir {
    path: PathBuf,
    modified: SystemTime,
}

fn escape(path: &Path) -> String {
    Pattern::escape(&path.to_string_lossy())
}

/// Paths matching `pattern` that pass `keep`, with their modification times.
/// Entries that vanish or cannot be read are skipped.
fn glob_with_mtime(
    pattern: &str,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<(PathBuf, SystemTime)>> {
    let entries = glob(pattern).map_err(|e| {
        TeensyBrewError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid search pattern {}: {}", pattern, e),
        ))
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::debug!("Skipping unreadable path: {}", e);
                continue;
            }
        };
        if !keep(&path) {
            continue;
        }
        match path.metadata().and_then(|m| m.modified()) {
            Ok(modified) => found.push((path, modified)),
            Err(e) => log::debug!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(found)
}
