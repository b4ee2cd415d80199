//! Toolchain discovery and board definition maintenance

pub mod board_config;
pub mod probe;

pub use board_config::{BoardConfigReconciler, ReconcileOutcome};
pub use probe::{
    ConfiguredPathResolver, EnvLookup, EnvOverrideResolver, FilesystemSearchResolver,
    ToolchainProbe, ToolchainResolver, ToolchainRoots, find_toolchain_root,
};
