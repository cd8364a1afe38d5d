//! In-memory store backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use lumen_common::StoreError;
use tokio::sync::{broadcast, RwLock};

use crate::change::{apply_remove, apply_set, StoreChange};
use crate::{AssetStore, CHANGE_CHANNEL_CAPACITY};

/// Ephemeral store, used for tests and sessions without persistence.
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        let mut map = self.entries.write().await;
        for change in apply_set(&mut map, entries) {
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut map = self.entries.write().await;
        for change in apply_remove(&mut map, keys) {
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::ActiveTheme;

    #[tokio::test]
    async fn bulk_set_get_remove() {
        let store = MemoryStore::new();
        store
            .set_many(vec![
                ("nord-home".into(), "body { color: #eceff4; }".into()),
                ("nord-extras".into(), "main { margin: 0; }".into()),
            ])
            .await
            .unwrap();

        let values = store
            .get_many(&["nord-home".into(), "nord-extras".into(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["nord-home"], "body { color: #eceff4; }");

        store.remove_many(&["nord-home".into()]).await.unwrap();
        assert_eq!(store.get("nord-home").await.unwrap(), None);
        assert_eq!(store.keys().await.unwrap(), vec!["nord-extras".to_string()]);
    }

    #[tokio::test]
    async fn changes_are_delivered_in_order() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        store.set("theme", "nord").await.unwrap();
        store.set("theme", "nord").await.unwrap();
        store.set("theme", "default").await.unwrap();
        store.remove("theme").await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.new_value.as_deref(), Some("nord"));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.old_value.as_deref(), Some("nord"));
        assert_eq!(second.new_value.as_deref(), Some("default"));
        let third = rx.recv().await.unwrap();
        assert_eq!(third.new_value, None);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn active_theme_defaults_when_unset() {
        let store = MemoryStore::new();
        assert_eq!(store.active_theme().await.unwrap(), ActiveTheme::Default);

        store
            .set_active_theme(&ActiveTheme::Custom("dracula".into()))
            .await
            .unwrap();
        assert_eq!(
            store.active_theme().await.unwrap(),
            ActiveTheme::Custom("dracula".into())
        );
    }
}
