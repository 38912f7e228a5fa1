use anyhow::Context;
use tokio::sync::mpsc;

use crate::config::WatchConfig;
use crate::supervisor::{Launcher, Supervisor, Terminate, ToolchainRun};
use crate::walker::register_tree;
use crate::watcher::event::{LoopEvent, is_restart_trigger};
use crate::watcher::start_watcher;

/// Why the run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The notification source shut down and closed its channel.
    SourceClosed,
}

/// Watch `config.root` and keep `go run <target>` alive until the watcher goes away.
///
/// Only notification-source initialization is fatal. Any child still running
/// when this returns is left running.
pub async fn run_and_watch(config: &WatchConfig) -> anyhow::Result<LoopExit> {
    let (mut watcher, mut events) = start_watcher().context("failed to initialize file watcher")?;

    let registration = register_tree(&config.root, &config.skip_dirs, &mut watcher);
    for err in &registration.errors {
        tracing::warn!("{err}");
    }
    tracing::debug!(dirs = registration.targets.len(), "watching directories");

    let supervisor = Supervisor::new(ToolchainRun::from_config(config));
    supervisor.start().await;

    // `watcher` stays alive until the loop exits; dropping it closes `events`.
    let exit = run_loop(&mut events, &supervisor, &config.extension).await;
    tracing::debug!(pid = ?supervisor.current_pid().await, "watcher closed; child left running");
    drop(watcher);
    Ok(exit)
}

/// Service the event stream one message at a time.
///
/// A qualifying change is fully handled (kill + spawn) before the next event
/// is read, so restarts never overlap and are never merged: K matching events
/// produce exactly K restarts.
pub async fn run_loop<L, T>(
    events: &mut mpsc::Receiver<LoopEvent>,
    supervisor: &Supervisor<L, T>,
    extension: &str,
) -> LoopExit
where
    L: Launcher,
    T: Terminate,
{
    loop {
        match events.recv().await.unwrap_or(LoopEvent::Shutdown) {
            LoopEvent::Change(change) => {
                if !is_restart_trigger(&change, extension) {
                    continue;
                }
                tracing::info!("change detected: {change}");
                supervisor.restart().await;
            }
            LoopEvent::Error(err) => {
                tracing::error!("watcher error: {err}");
            }
            LoopEvent::Shutdown => return LoopExit::SourceClosed,
        }
    }
}
