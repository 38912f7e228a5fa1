use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A simple Go dev tool that auto-restarts your program on file change.
///
/// gomon watches the current directory tree and keeps exactly one instance of
/// `go run <file>` alive, killing and relaunching it whenever a `.go` file changes.
#[derive(Parser, Debug)]
#[command(
    name = "gomon",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run and watch your Go app.
    ///
    /// Registers every directory under the current one (skipping .git and vendor),
    /// starts `go run <target>`, and restarts it on every `.go` change.
    Run {
        /// Entry-point source file passed to `go run`.
        target: PathBuf,
    },
}
