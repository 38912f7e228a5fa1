pub mod event;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use event::{ChangeEvent, LoopEvent};

/// Capacity of the channel between the notify backend thread and the run loop.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Create the OS notification source.
///
/// The returned watcher has no directories registered yet; hand it to
/// `walker::register_tree`. It must be kept alive: dropping it closes the
/// channel, which the run loop observes as shutdown.
///
/// Every raw notify event is split into per-path `LoopEvent::Change`s and
/// delivery failures become `LoopEvent::Error`. No filtering or debouncing
/// happens here.
pub fn start_watcher() -> anyhow::Result<(RecommendedWatcher, mpsc::Receiver<LoopEvent>)> {
    let (tx, rx) = mpsc::channel::<LoopEvent>(EVENT_CHANNEL_CAPACITY);

    // The handler runs on notify's own thread, outside the runtime, so the
    // blocking send is allowed and applies backpressure instead of dropping.
    let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
        Ok(raw) => {
            for change in ChangeEvent::from_notify(raw) {
                if tx.blocking_send(LoopEvent::Change(change)).is_err() {
                    return; // run loop gone
                }
            }
        }
        Err(err) => {
            let _ = tx.blocking_send(LoopEvent::Error(err));
        }
    })?;

    Ok((watcher, rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::register_tree;
    use std::fs;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watcher_delivers_changes_in_registered_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut watcher, mut rx) = start_watcher().expect("watcher");
        let reg = register_tree(dir.path(), &[], &mut watcher);
        assert!(reg.errors.is_empty());

        fs::write(dir.path().join("main.go"), "package main").unwrap();

        let received = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(event) = rx.recv().await {
                if let LoopEvent::Change(change) = event
                    && change.path.ends_with("main.go")
                {
                    return Some(change);
                }
            }
            None
        })
        .await
        .expect("no event within 5s");

        assert!(received.is_some());
    }

    #[tokio::test]
    async fn test_dropping_watcher_closes_the_stream() {
        let (watcher, mut rx) = start_watcher().expect("watcher");
        drop(watcher);

        let next = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("channel should close once the watcher is gone");
        assert!(next.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_atomic_save_yields_one_trigger() {
        use crate::watcher::event::is_restart_trigger;

        let dir = tempfile::tempdir().expect("tempdir");
        let (mut watcher, mut rx) = start_watcher().expect("watcher");
        register_tree(dir.path(), &[], &mut watcher);

        // Editors often write a temp file and rename it over the original.
        let tmp = dir.path().join(".main.tmp");
        fs::write(&tmp, "package main").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        while rx.try_recv().is_ok() {}

        fs::rename(&tmp, dir.path().join("main.go")).unwrap();

        let mut triggers = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
            if let LoopEvent::Change(change) = event
                && is_restart_trigger(&change, "go")
            {
                triggers.push(change);
            }
        }

        assert_eq!(triggers.len(), 1, "expected a single trigger, got {triggers:?}");
        assert!(triggers[0].path.ends_with("main.go"));
    }
}
