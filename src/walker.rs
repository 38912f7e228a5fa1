use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Something directories can be registered with for change delivery.
///
/// Implemented for notify's `RecommendedWatcher`; each directory is watched
/// non-recursively because the walk already visits every subdirectory.
pub trait WatchSink {
    fn add(&mut self, dir: &Path) -> notify::Result<()>;
}

impl WatchSink for RecommendedWatcher {
    fn add(&mut self, dir: &Path) -> notify::Result<()> {
        self.watch(dir, RecursiveMode::NonRecursive)
    }
}

/// A directory the notification source refused to watch.
#[derive(Debug, thiserror::Error)]
#[error("failed to watch {}: {}", .path.display(), .source)]
pub struct RegistrationError {
    pub path: PathBuf,
    #[source]
    pub source: notify::Error,
}

/// Outcome of the startup walk.
#[derive(Debug, Default)]
pub struct Registration {
    /// Directories successfully registered, in walk order.
    pub targets: Vec<PathBuf>,
    pub errors: Vec<RegistrationError>,
}

/// Walk `root` depth-first and register every directory with `sink`.
///
/// Directories whose name appears in `skip_dirs` are pruned together with
/// their whole subtree. Files are never registered individually. Unreadable
/// entries are passed over without being reported in the result; sink
/// failures are collected and the walk carries on.
pub fn register_tree<S: WatchSink>(root: &Path, skip_dirs: &[String], sink: &mut S) -> Registration {
    let skip = skip_dirs.to_vec();
    let walker = ignore::WalkBuilder::new(root)
        // Plain walk: hidden directories and .gitignore'd paths are still watched.
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| !is_skipped_dir(entry, &skip))
        .build();

    let mut registration = Registration::default();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!("skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        match sink.add(path) {
            Ok(()) => registration.targets.push(path.to_path_buf()),
            Err(source) => registration.errors.push(RegistrationError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    registration
}

fn is_skipped_dir(entry: &ignore::DirEntry, skip_dirs: &[String]) -> bool {
    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
    is_dir
        && entry
            .file_name()
            .to_str()
            .map(|name| skip_dirs.iter().any(|s| s == name))
            .unwrap_or(false)
}
