//! Store file watcher.
//!
//! Pages and the popup run in separate processes that share one store file.
//! The watcher reloads the file whenever another process rewrites it, which
//! turns foreign writes into ordinary [`StoreChange`](crate::StoreChange)
//! notifications. Changes are debounced with a 500ms window.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lumen_common::StoreError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::FileStore;

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches a store file for changes and sends notifications.
pub struct StoreWatcher {
    path: PathBuf,
}

impl StoreWatcher {
    pub fn new(path: PathBuf) -> Self {
        if !path.exists() {
            warn!(
                "store file {} does not exist yet, will watch for creation",
                path.display()
            );
        }
        Self { path }
    }

    /// Watch the store file, sending `()` on `tx` after each debounced burst
    /// of writes. Runs until `tx` is closed.
    pub async fn watch(&self, tx: mpsc::Sender<()>) -> Result<(), StoreError> {
        let watch_path = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();

        info!("starting store file watcher for {}", self.path.display());

        // Bridge the sync notify callback into async.
        let (notify_tx, mut notify_rx) = mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    let is_store_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n == file_name).unwrap_or(false));
                    if is_store_file {
                        let _ = notify_tx.try_send(());
                    }
                }
                Err(e) => error!("store watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| StoreError::Watch(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&watch_path, RecursiveMode::NonRecursive)
            .map_err(|e| {
                StoreError::Watch(format!("failed to watch {}: {e}", watch_path.display()))
            })?;

        // Keep the watcher alive for the duration of the loop.
        let _watcher = Arc::new(watcher);

        while notify_rx.recv().await.is_some() {
            let debounce = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(debounce);

            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            debug!("store file changed on disk");
            if tx.send(()).await.is_err() {
                debug!("store reload receiver dropped, stopping watcher");
                break;
            }
        }

        Ok(())
    }
}

/// Spawn a watcher that calls [`FileStore::reload`] after every external write.
pub fn spawn_store_watcher(store: Arc<FileStore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (tx, mut rx) = mpsc::channel::<()>(4);
        let watcher = StoreWatcher::new(store.path().to_path_buf());

        tokio::spawn(async move {
            if let Err(e) = watcher.watch(tx).await {
                error!("store watcher stopped: {e}");
            }
        });

        while rx.recv().await.is_some() {
            if let Err(e) = store.reload().await {
                warn!("store reload failed: {e}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_new_with_nonexistent_path() {
        let watcher = StoreWatcher::new(PathBuf::from("/tmp/nonexistent_lumen_store.json"));
        assert_eq!(watcher.path, PathBuf::from("/tmp/nonexistent_lumen_store.json"));
    }

    #[tokio::test]
    async fn watch_fails_for_missing_directory() {
        let watcher = StoreWatcher::new(PathBuf::from("/nonexistent_lumen_dir/store.json"));
        let (tx, _rx) = mpsc::channel(1);
        let result = watcher.watch(tx).await;
        assert!(matches!(result, Err(StoreError::Watch(_))));
    }
}
