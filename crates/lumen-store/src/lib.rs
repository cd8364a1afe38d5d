//! Persistent key-value store for theme state.
//!
//! Every component talks to storage through [`AssetStore`]:
//! - Bulk get/set/remove, where a bulk set is applied as one unit
//! - Ordered change notifications ([`StoreChange`]) for subscribers
//! - In-memory ([`MemoryStore`]) and JSON file ([`FileStore`]) backends
//! - A file watcher that picks up writes from other processes

pub mod change;
pub mod file;
pub mod memory;
pub mod watcher;

use std::collections::HashMap;

use async_trait::async_trait;
use lumen_common::keys::ACTIVE_THEME_KEY;
use lumen_common::{ActiveTheme, StoreError};
use tokio::sync::broadcast;

pub use change::StoreChange;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use watcher::{spawn_store_watcher, StoreWatcher};

/// Capacity of the change broadcast channel of each backend.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Values for the requested keys. Missing keys are absent from the map.
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, StoreError>;

    /// Write all entries as one unit: either every entry is stored or none.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StoreError>;

    /// Remove all listed keys as one unit. Unknown keys are ignored.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError>;

    /// Every key currently stored, sorted.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Receive every change made after this call, in mutation order.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut values = self.get_many(&[key.to_string()]).await?;
        Ok(values.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many(vec![(key.to_string(), value.to_string())])
            .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_many(&[key.to_string()]).await
    }

    async fn active_theme(&self) -> Result<ActiveTheme, StoreError> {
        let stored = self.get(ACTIVE_THEME_KEY).await?;
        Ok(ActiveTheme::from_stored(stored.as_deref()))
    }

    async fn set_active_theme(&self, theme: &ActiveTheme) -> Result<(), StoreError> {
        self.set(ACTIVE_THEME_KEY, theme.as_str()).await
    }
}
