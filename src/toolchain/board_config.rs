//! Keeps Teensyduino's `boards.txt` carrying the variables a command-line build needs
//!
//! Lines are only ever appended. A required line counts as present when any
//! existing line contains it as a substring, so trailing comments or
//! whitespace after a value are tolerated.

use crate::errors::{Result, TeensyBrewError};
use crate::models::{BuildTarget, BuildVariable};
use std::fs;
use std::path::{Path, PathBuf};

/// Lines appended by one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub appended: Vec<String>,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Reconciles one board definition file
#[derive(Debug, Clone)]
pub struct BoardConfigReconciler {
    path: PathBuf,
}

impl BoardConfigReconciler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reconcile_target(&self, target: &BuildTarget) -> Result<ReconcileOutcome> {
        self.reconcile(&target.id, &target.variables)
    }

    /// Append every `<board_id><key>=<value>` line not already present.
    /// The file is left untouched when nothing is missing. Existing bytes are
    /// kept as they are, whatever their encoding.
    pub fn reconcile(&self, board_id: &str, required: &[BuildVariable]) -> Result<ReconcileOutcome> {
        let content = fs::read(&self.path)
            .map_err(|e| TeensyBrewError::ConfigNotFound(self.path.clone(), e))?;

        let mut appended: Vec<String> = Vec::new();
        for variable in required {
            let line = variable.render(board_id);
            let present = content
                .split(|b| *b == b'\n')
                .any(|existing| contains_bytes(existing, line.as_bytes()));
            if !present && !appended.contains(&line) {
                appended.push(line);
            }
        }

        if appended.is_empty() {
            log::debug!("{} already has all {} variables", self.path.display(), board_id);
            return Ok(ReconcileOutcome::default());
        }

        let terminator: &[u8] = if contains_bytes(&content, b"\r\n") { b"\r\n" } else { b"\n" };
        let mut updated = content;
        if !updated.is_empty() && !updated.ends_with(b"\n") {
            updated.extend_from_slice(terminator);
        }
        for line in &appended {
            log::info!("📝 Adding {} to {}", line, self.path.display());
            updated.extend_from_slice(line.as_bytes());
            updated.extend_from_slice(terminator);
        }

        self.replace_contents(&updated)?;
        Ok(ReconcileOutcome { appended })
    }

    /// Write the whole file to a sibling and rename it into place.
    /// A symlinked file is replaced at its target and keeps its permissions.
    fn replace_contents(&self, contents: &[u8]) -> Result<()> {
        let target = fs::canonicalize(&self.path)?;
        let permissions = fs::metadata(&target)?.permissions();
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "boards.txt".to_string());
        let staging = target.with_file_name(format!(".{}.teensybrew", file_name));

        let staged = fs::write(&staging, contents)
            .and_then(|()| fs::set_permissions(&staging, permissions))
            .and_then(|()| fs::rename(&staging, &target));
        if let Err(e) = staged {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
