use std::fmt;
use std::path::{Path, PathBuf};

use notify::event::{EventKind, ModifyKind, RenameMode};

/// What happened to a path, in the coarse vocabulary the run loop logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
}

impl Operation {
    /// Map a raw notify kind. Access and `Other` notifications are not changes.
    ///
    /// A rename arrives as `From` (old path), `To` (new path) and `Both`
    /// (both paths). `Both` repeats the other two and is dropped, so each path
    /// is reported once: the old name as a rename, the new name as a create.
    fn from_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(Self::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(Self::Chmod),
            EventKind::Modify(_) | EventKind::Any => Some(Self::Write),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "CREATE",
            Self::Write => "WRITE",
            Self::Remove => "REMOVE",
            Self::Rename => "RENAME",
            Self::Chmod => "CHMOD",
        };
        f.write_str(name)
    }
}

/// A single change to a single path inside a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub operation: Operation,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self {
            path: path.into(),
            operation,
        }
    }

    /// Split a raw notify event into one change per affected path.
    pub fn from_notify(event: notify::Event) -> Vec<Self> {
        let Some(operation) = Operation::from_kind(&event.kind) else {
            return Vec::new();
        };
        event
            .paths
            .into_iter()
            .map(|path| Self::new(path, operation))
            .collect()
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.path.display().to_string(), self.operation)
    }
}

/// Everything the run loop can receive from the notification source.
#[derive(Debug)]
pub enum LoopEvent {
    Change(ChangeEvent),
    /// Delivery error reported by the backend; never terminates the loop.
    Error(notify::Error),
    /// The source has shut down; no further events will arrive.
    Shutdown,
}

/// Whether `event` should restart the target program.
///
/// Only the extension matters; the operation is ignored, so creates,
/// removes and chmods of a source file all qualify.
pub fn is_restart_trigger(event: &ChangeEvent, extension: &str) -> bool {
    has_extension(&event.path, extension)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}
