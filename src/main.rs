mod cli;
mod config;
mod run_loop;
mod supervisor;
mod walker;
mod watcher;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use cli::{Cli, Commands};
use config::WatchConfig;
use run_loop::run_and_watch;

#[tokio::main]
async fn main() -> Result<()> {
    // Status lines go to stderr so the child's stdout stays untouched.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { target } => {
            let config = WatchConfig::for_target(&target);
            let exit = run_and_watch(&config).await?;
            tracing::debug!(?exit, "run loop finished");
        }
    }

    Ok(())
}
