//! Toolchain root discovery
//!
//! Roots are resolved through a chain of [`ToolchainResolver`]s: environment
//! override, then the path from the configuration file, then a recursive walk
//! looking for a `tools` directory below a prefix-named parent
//! (e.g. `~/arduino-1.6.7/tools`).

use crate::config::ToolchainConfig;
use crate::errors::{Result, TeensyBrewError};
use crate::models::Toolchain;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads one environment variable
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<OsString> + Send + Sync>;

/// Directory name prefix identifying an installation root during the walk
pub fn search_prefix(toolchain: Toolchain) -> &'static str {
    match toolchain {
        Toolchain::Arduino => "arduino",
        Toolchain::MicroPython => "micropython",
    }
}

/// One link in the resolution chain
pub trait ToolchainResolver: Send + Sync {
    /// Short label for log output
    fn name(&self) -> &'static str;

    fn resolve(&self, toolchain: Toolchain) -> Option<PathBuf>;
}

fn existing_dir(source: &str, toolchain: Toolchain, path: PathBuf) -> Option<PathBuf> {
    if path.is_dir() {
        Some(path)
    } else {
        log::warn!(
            "Ignoring {} {} root {}: not a directory",
            source,
            toolchain,
            path.display()
        );
        None
    }
}

/// Explicit per-toolchain environment variable
pub struct EnvOverrideResolver {
    vars: HashMap<Toolchain, String>,
    lookup: EnvLookup,
}

impl EnvOverrideResolver {
    pub fn new(vars: HashMap<Toolchain, String>, lookup: EnvLookup) -> Self {
        Self { vars, lookup }
    }
}

impl ToolchainResolver for EnvOverrideResolver {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn resolve(&self, toolchain: Toolchain) -> Option<PathBuf> {
        let var = self.vars.get(&toolchain)?;
        let value = (self.lookup)(var).filter(|v| !v.is_empty())?;
        existing_dir(var, toolchain, PathBuf::from(value))
    }
}

/// Roots written in the configuration file
pub struct ConfiguredPathResolver {
    paths: HashMap<Toolchain, PathBuf>,
}

impl ConfiguredPathResolver {
    pub fn new(paths: HashMap<Toolchain, PathBuf>) -> Self {
        Self { paths }
    }
}

impl ToolchainResolver for ConfiguredPathResolver {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn resolve(&self, toolchain: Toolchain) -> Option<PathBuf> {
        let path = self.paths.get(&toolchain)?.clone();
        existing_dir("configured", toolchain, path)
    }
}

/// Recursive walk below `root`
pub struct FilesystemSearchResolver {
    root: PathBuf,
}

impl FilesystemSearchResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ToolchainResolver for FilesystemSearchResolver {
    fn name(&self) -> &'static str {
        "filesystem search"
    }

    fn resolve(&self, toolchain: Toolchain) -> Option<PathBuf> {
        log::debug!(
            "Searching {} for a {} installation",
            self.root.display(),
            toolchain
        );
        find_toolchain_root(&self.root, search_prefix(toolchain))
    }
}

/// Depth-first walk for a directory whose name starts with `prefix` and which
/// contains a `tools` directory. The prefix is case-sensitive, so the Arduino
/// sketchbook (`~/Arduino`) is never mistaken for an installation. Symlinks
/// are not followed, unreadable directories are skipped and the first match wins.
pub fn find_toolchain_root(root: &Path, prefix: &str) -> Option<PathBuf> {
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();
        children.sort();

        let name_matches = dir
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(prefix))
            .unwrap_or(false);
        if name_matches && children.iter().any(|c| c.file_name() == Some(OsStr::new("tools"))) {
            return Some(dir);
        }

        stack.extend(children.into_iter().rev());
    }

    None
}

/// Resolves toolchain roots through an ordered resolver chain
pub struct ToolchainProbe {
    resolvers: Vec<Box<dyn ToolchainResolver>>,
}

impl ToolchainProbe {
    pub fn new(resolvers: Vec<Box<dyn ToolchainResolver>>) -> Self {
        Self { resolvers }
    }

    /// Standard chain reading the process environment
    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self::from_config_with_env(config, Arc::new(|var: &str| std::env::var_os(var)))
    }

    /// Standard chain with a substitute environment
    pub fn from_config_with_env(config: &ToolchainConfig, lookup: EnvLookup) -> Self {
        let vars = HashMap::from([
            (Toolchain::Arduino, config.arduino_env_var.clone()),
            (Toolchain::MicroPython, config.micropython_env_var.clone()),
        ]);

        let mut paths = HashMap::new();
        if let Some(path) = &config.arduino_root {
            paths.insert(Toolchain::Arduino, path.clone());
        }
        if let Some(path) = &config.micropython_root {
            paths.insert(Toolchain::MicroPython, path.clone());
        }

        let mut resolvers: Vec<Box<dyn ToolchainResolver>> = vec![
            Box::new(EnvOverrideResolver::new(vars, lookup)),
            Box::new(ConfiguredPathResolver::new(paths)),
        ];
        match config.search_root.clone().or_else(dirs::home_dir) {
            Some(root) => resolvers.push(Box::new(FilesystemSearchResolver::new(root))),
            None => log::debug!("No search root available, skipping filesystem search"),
        }

        Self::new(resolvers)
    }

    /// First root any resolver in the chain produces
    pub fn resolve_toolchain_root(&self, toolchain: Toolchain) -> Result<PathBuf> {
        for resolver in &self.resolvers {
            if let Some(root) = resolver.resolve(toolchain) {
                log::info!(
                    "📁 {} toolchain: {} (via {})",
                    toolchain,
                    root.display(),
                    resolver.name()
                );
                return Ok(root);
            }
        }

        Err(TeensyBrewError::ToolchainNotFound(format!(
            "{} (tried {})",
            toolchain,
            self.resolvers
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Toolchain roots resolved during one orchestration run
#[derive(Debug, Clone, Default)]
pub struct ToolchainRoots {
    roots: HashMap<Toolchain, PathBuf>,
}

impl ToolchainRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `toolchain` through `probe` unless this run already has it
    pub fn ensure(&mut self, probe: &ToolchainProbe, toolchain: Toolchain) -> Result<&Path> {
        if !self.roots.contains_key(&toolchain) {
            let root = probe.resolve_toolchain_root(toolchain)?;
            self.roots.insert(toolchain, root);
        }
        self.get(toolchain)
    }

    pub fn insert(&mut self, toolchain: Toolchain, root: PathBuf) {
        self.roots.insert(toolchain, root);
    }

    pub fn get(&self, toolchain: Toolchain) -> Result<&Path> {
        self.roots
            .get(&toolchain)
            .map(PathBuf::as_path)
            .ok_or_else(|| TeensyBrewError::ToolchainNotFound(toolchain.to_string()))
    }
}
