use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::config::WatchConfig;

/// Builds the command for a fresh instance of the target program.
pub trait Launcher: Send + Sync {
    fn command(&self) -> Command;

    /// Human-readable name of what is being launched, for status messages.
    fn describe(&self) -> String;
}

/// How the previous child is disposed of before a new one is spawned.
pub trait Terminate: Send + Sync {
    fn terminate(&self, child: &mut Child);
}

/// `<program> <run_args..> <target>`, e.g. `go run main.go`.
#[derive(Debug, Clone)]
pub struct ToolchainRun {
    program: String,
    run_args: Vec<String>,
    target: PathBuf,
}

impl ToolchainRun {
    pub fn new(program: impl Into<String>, run_args: Vec<String>, target: &Path) -> Self {
        Self {
            program: program.into(),
            run_args,
            target: target.to_path_buf(),
        }
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(config.program.clone(), config.run_args.clone(), &config.target)
    }
}

impl Launcher for ToolchainRun {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.run_args).arg(&self.target);
        cmd
    }

    fn describe(&self) -> String {
        self.target.display().to_string()
    }
}

/// Fire-and-forget SIGKILL. Does not wait for the process to exit and
/// ignores failures (a child that already exited is not an error).
#[derive(Debug, Clone, Copy, Default)]
pub struct KillNow;

impl Terminate for KillNow {
    fn terminate(&self, child: &mut Child) {
        let _ = child.start_kill();
    }
}

/// Owns the single child process slot.
///
/// `start` and `restart` are the only operations that touch the slot and both
/// hold the lock for their whole duration, so no caller can ever observe two
/// children spawned by this supervisor at once. There is no stop:
/// the child outlives the supervisor when the run loop returns.
pub struct Supervisor<L, T = KillNow> {
    launcher: L,
    terminator: T,
    child: Mutex<Option<Child>>,
}

impl<L: Launcher> Supervisor<L, KillNow> {
    pub fn new(launcher: L) -> Self {
        Self::with_terminator(launcher, KillNow)
    }
}

impl<L: Launcher, T: Terminate> Supervisor<L, T> {
    pub fn with_terminator(launcher: L, terminator: T) -> Self {
        Self {
            launcher,
            terminator,
            child: Mutex::new(None),
        }
    }

    /// Spawn a new child and record it in the slot.
    ///
    /// Spawn failures are logged and leave the slot empty; they never
    /// propagate, so the next restart simply tries again.
    pub async fn start(&self) {
        let mut slot = self.child.lock().await;
        self.spawn_into(&mut slot);
    }

    /// Kill the current child (if any) without waiting, then spawn a new one.
    pub async fn restart(&self) {
        let mut slot = self.child.lock().await;
        if let Some(child) = slot.as_mut() {
            self.terminator.terminate(child);
        }
        tracing::info!("restarting...");
        self.spawn_into(&mut slot);
    }

    /// Pid of the child currently held in the slot.
    pub async fn current_pid(&self) -> Option<u32> {
        self.child.lock().await.as_ref().and_then(Child::id)
    }

    fn spawn_into(&self, slot: &mut Option<Child>) {
        tracing::info!("starting {}", self.launcher.describe());

        let mut cmd = self.launcher.command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);

        // The previous handle, if any, is replaced even when the spawn fails.
        *slot = match cmd.spawn() {
            Ok(child) => {
                tracing::info!(pid = child.id(), "child spawned");
                Some(child)
            }
            Err(err) => {
                tracing::error!("error starting process: {err}");
                None
            }
        };
    }
}
