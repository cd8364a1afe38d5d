//! Two-tier CSS lookup: downloaded asset first, then the packaged bundle.

use std::fmt;
use std::sync::Arc;

use lumen_common::keys::asset_key;
use lumen_common::StoreError;
use lumen_store::AssetStore;
use tracing::debug;

use crate::packaged::PackagedAssets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssSource {
    /// Downloaded asset in the store.
    Cache,
    /// CSS bundled with the application.
    Packaged,
}

impl fmt::Display for CssSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssSource::Cache => f.write_str("cache"),
            CssSource::Packaged => f.write_str("packaged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCss {
    pub source: CssSource,
    pub css: String,
}

const SOURCE_ORDER: [CssSource; 2] = [CssSource::Cache, CssSource::Packaged];

/// Tries each source in order and returns the first hit.
pub struct CssResolver {
    store: Arc<dyn AssetStore>,
    packaged: Arc<dyn PackagedAssets>,
}

impl CssResolver {
    pub fn new(store: Arc<dyn AssetStore>, packaged: Arc<dyn PackagedAssets>) -> Self {
        Self { store, packaged }
    }

    /// CSS for `(theme_id, category)`, or `None` when no source has it.
    ///
    /// A store read failure aborts the lookup instead of falling through.
    pub async fn resolve(
        &self,
        theme_id: &str,
        category: &str,
    ) -> Result<Option<ResolvedCss>, StoreError> {
        for source in SOURCE_ORDER {
            let css = match source {
                CssSource::Cache => self
                    .store
                    .get(&asset_key(theme_id, category))
                    .await?
                    .filter(|css| !css.is_empty()),
                CssSource::Packaged => self.packaged.load(theme_id, category).await,
            };
            if let Some(css) = css {
                return Ok(Some(ResolvedCss { source, css }));
            }
            debug!(theme = theme_id, category, %source, "css source missed");
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packaged::{packaged_path, DirectoryAssets};
    use lumen_store::MemoryStore;

    fn bundle(entries: &[(&str, &str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (theme, category, css) in entries {
            let file = dir.path().join(packaged_path(theme, category));
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, css).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn cache_wins_over_packaged() {
        let dir = bundle(&[("nord", "home", "/* packaged */ body {}")]);
        let store = Arc::new(MemoryStore::new());
        store.set("nord-home", "/* cached */ body {}").await.unwrap();
        let resolver = CssResolver::new(store, Arc::new(DirectoryAssets::new(dir.path())));

        let resolved = resolver.resolve("nord", "home").await.unwrap().unwrap();
        assert_eq!(resolved.source, CssSource::Cache);
        assert_eq!(resolved.css, "/* cached */ body {}");
    }

    #[tokio::test]
    async fn cache_miss_falls_back_to_packaged() {
        let dir = bundle(&[("nord", "home", "/* packaged */ body {}")]);
        let resolver = CssResolver::new(
            Arc::new(MemoryStore::new()),
            Arc::new(DirectoryAssets::new(dir.path())),
        );

        let resolved = resolver.resolve("nord", "home").await.unwrap().unwrap();
        assert_eq!(resolved.source, CssSource::Packaged);
        assert_eq!(resolved.css, "/* packaged */ body {}");
    }

    #[tokio::test]
    async fn empty_cached_value_is_a_miss() {
        let dir = bundle(&[]);
        let store = Arc::new(MemoryStore::new());
        store.set("nord-home", "").await.unwrap();
        let resolver = CssResolver::new(store, Arc::new(DirectoryAssets::new(dir.path())));

        assert!(resolver.resolve("nord", "home").await.unwrap().is_none());
    }
}
