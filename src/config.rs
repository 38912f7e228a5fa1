use std::path::{Path, PathBuf};

/// Extension (without the dot) of files whose changes trigger a restart.
pub const SOURCE_EXTENSION: &str = "go";

/// Directory names never registered with the watcher, subtree included.
pub const SKIPPED_DIRS: &[&str] = &[".git", "vendor"];

/// Toolchain program and sub-command used to execute the target file.
const TOOLCHAIN_PROGRAM: &str = "go";
const TOOLCHAIN_RUN: &str = "run";

/// Resolved settings for one `gomon run` session.
///
/// There is no config file: everything is derived from the single CLI argument,
/// with the Go toolchain conventions as fixed defaults.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory tree to watch.
    pub root: PathBuf,
    /// Entry-point source file handed to the toolchain.
    pub target: PathBuf,
    pub extension: String,
    pub skip_dirs: Vec<String>,
    pub program: String,
    pub run_args: Vec<String>,
}

impl WatchConfig {
    /// Build the configuration for watching the current directory and running `target`.
    pub fn for_target(target: &Path) -> Self {
        Self {
            root: PathBuf::from("."),
            target: target.to_path_buf(),
            extension: SOURCE_EXTENSION.to_string(),
            skip_dirs: SKIPPED_DIRS.iter().map(|s| s.to_string()).collect(),
            program: TOOLCHAIN_PROGRAM.to_string(),
            run_args: vec![TOOLCHAIN_RUN.to_string()],
        }
    }
}
