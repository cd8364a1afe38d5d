//! Remote theme discovery and download.
//!
//! - [`RemoteSource`]: the network seam (directory listings and raw files)
//! - [`HttpSource`]: `reqwest` implementation against a repository-contents API
//! - [`CatalogFetcher`]: builds the theme catalog, falling back to the cached one
//! - [`ThemeDownloader`]: fetches every category of a theme, all-or-nothing

pub mod catalog;
pub mod download;
pub mod http;
pub mod source;

pub use catalog::{display_name, Catalog, CatalogEntry, CatalogFetcher};
pub use download::{is_theme_downloaded, DownloadError, DownloadReport, ThemeDownloader};
pub use http::HttpSource;
pub use source::{DirEntry, EntryKind, RemoteSource, StaticSource};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use lumen_common::StoreError;
    use lumen_store::{AssetStore, MemoryStore, StoreChange};
    use tokio::sync::broadcast;

    /// A [`MemoryStore`] whose bulk sets fail when they touch a key ending
    /// in `reject_suffix`.
    pub struct RejectingStore {
        pub inner: MemoryStore,
        reject_suffix: &'static str,
    }

    impl RejectingStore {
        pub fn new(reject_suffix: &'static str) -> Self {
            Self {
                inner: MemoryStore::new(),
                reject_suffix,
            }
        }
    }

    #[async_trait]
    impl AssetStore for RejectingStore {
        async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, StoreError> {
            self.inner.get_many(keys).await
        }

        async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
            if entries.iter().any(|(key, _)| key.ends_with(self.reject_suffix)) {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set_many(entries).await
        }

        async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
            self.inner.remove_many(keys).await
        }

        async fn keys(&self) -> Result<Vec<String>, StoreError> {
            self.inner.keys().await
        }

        fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
            self.inner.subscribe()
        }
    }
}
