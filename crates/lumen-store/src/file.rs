//! JSON file store backend.
//!
//! The whole store is one JSON object on disk, shared by every process that
//! opens the same path. Each mutation re-reads the file, applies itself to
//! what is on disk, and rewrites the file atomically (write to `.tmp`, then
//! rename). Keys written by other processes survive, and a bulk set is
//! either fully on disk or not at all. An advisory lock on a sibling
//! `.lock` file serializes the read-modify-write across processes.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs4::FileExt;
use lumen_common::StoreError;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::change::{apply_remove, apply_set, diff, StoreChange};
use crate::{AssetStore, CHANGE_CHANNEL_CAPACITY};

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file is missing.
    ///
    /// A file that exists but cannot be parsed is reported as
    /// [`StoreError::Corrupt`] rather than silently replaced.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_entries(&path).await?;
        info!(path = %path.display(), keys = entries.len(), "opened theme store");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            entries: RwLock::new(entries),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and broadcast whatever differs from memory.
    ///
    /// Used when another process has written the store. Returns the number
    /// of keys that changed.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        let count = self.commit(|_| Vec::new()).await?;
        if count > 0 {
            debug!(path = %self.path.display(), changed = count, "store reloaded from disk");
        }
        Ok(count)
    }

    /// Read-modify-write against the file under the write lock.
    ///
    /// `mutate` runs on the current disk contents and reports what it
    /// touched; the file is only rewritten when that is non-empty. Memory
    /// then moves to the result, and every difference from the old memory
    /// is broadcast, including keys other processes wrote in the meantime.
    async fn commit<F>(&self, mutate: F) -> Result<usize, StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Vec<StoreChange> + Send,
    {
        let mut map = self.entries.write().await;
        let _lock = lock_store_file(&self.path).await?;
        let mut next = read_entries(&self.path).await?;
        if !mutate(&mut next).is_empty() {
            write_entries(&self.path, &next).await?;
        }

        let changes = diff(&map, &next);
        *map = next;
        let count = changes.len();
        for change in changes {
            let _ = self.changes.send(change);
        }
        Ok(count)
    }
}

#[async_trait]
impl AssetStore for FileStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        self.commit(|map| apply_set(map, entries)).await?;
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        self.commit(|map| apply_remove(map, keys)).await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

/// Take an exclusive advisory lock on `{path}.lock`, held until the file drops.
async fn lock_store_file(path: &Path) -> Result<std::fs::File, StoreError> {
    let lock_path = path.with_extension("json.lock");
    tokio::task::spawn_blocking(move || {
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        Ok::<_, std::io::Error>(file)
    })
    .await
    .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    .map_err(StoreError::from)
}

async fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

async fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json).await?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        // Rename can fail across some filesystems; fall back to a direct write.
        warn!("atomic rename failed ({e}), falling back to direct write");
        tokio::fs::write(path, &json).await?;
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }

    debug!(path = %path.display(), keys = entries.len(), "store written to disk");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store
            .set_many(vec![
                ("theme".into(), "forest-mist".into()),
                ("forest-mist-home".into(), "body { background: #1b2b1b; }".into()),
            ])
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("forest-mist-home").await.unwrap().as_deref(),
            Some("body { background: #1b2b1b; }")
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn reload_broadcasts_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("theme", "default").await.unwrap();
        let mut rx = store.subscribe();

        // Another process switches the theme.
        let other = FileStore::open(&path).await.unwrap();
        other.set("theme", "nord").await.unwrap();

        assert_eq!(store.reload().await.unwrap(), 1);
        let change = rx.recv().await.unwrap();
        assert!(change.is_active_theme_change());
        assert_eq!(change.new_value.as_deref(), Some("nord"));

        // Nothing new on disk: nothing to broadcast.
        assert_eq!(store.reload().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn removal_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("nord_downloaded", "2026-01-01T00:00:00Z").await.unwrap();
        store.remove("nord_downloaded").await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        assert!(reopened.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_keep_keys_from_other_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let page = FileStore::open(&path).await.unwrap();
        let popup = FileStore::open(&path).await.unwrap();
        let mut rx = page.subscribe();

        popup
            .set_many(vec![
                ("nord-home".into(), "body { color: #d8dee9; }".into()),
                ("nord_downloaded".into(), "2026-01-01T00:00:00Z".into()),
            ])
            .await
            .unwrap();
        page.set("theme", "default").await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        let mut keys = reopened.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["nord-home", "nord_downloaded", "theme"]);

        // The page handle picked up the popup's keys along with its own write.
        assert_eq!(
            page.get("nord_downloaded").await.unwrap().as_deref(),
            Some("2026-01-01T00:00:00Z")
        );
        let mut announced = Vec::new();
        while let Ok(change) = rx.try_recv() {
            announced.push(change.key);
        }
        assert_eq!(announced, vec!["nord-home", "nord_downloaded", "theme"]);
    }

    #[tokio::test]
    async fn removal_keeps_other_handles_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let evictor = FileStore::open(&path).await.unwrap();
        evictor.set("dracula-home", "body {}").await.unwrap();
        let popup = FileStore::open(&path).await.unwrap();
        popup.set("nord-home", "body { color: #d8dee9; }").await.unwrap();

        evictor.remove("dracula-home").await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.keys().await.unwrap(), vec!["nord-home"]);
    }
}
