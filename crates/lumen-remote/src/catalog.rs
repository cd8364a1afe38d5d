//! Theme catalog discovery.
//!
//! The catalog is rebuilt from scratch on every refresh: the themes
//! directory is listed, each theme directory is listed in turn, and a
//! theme is admitted only if it ships a stylesheet for every required
//! category. A failed refresh never surfaces as an error; the last
//! persisted catalog is returned instead.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::future::join_all;
use lumen_common::keys::{CATALOG_KEY, CATALOG_UPDATED_KEY};
use lumen_common::{FetchError, StoreError};
use lumen_config::{LumenConfig, RemoteConfig};
use lumen_store::AssetStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::source::{DirEntry, EntryKind, RemoteSource};

/// One installable theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Remote directory name; also the storage-key prefix.
    pub id: String,
    pub display_name: String,
    /// Category tag -> remote file name.
    pub category_files: BTreeMap<String, String>,
    /// Repository path of the theme directory.
    pub remote_path: String,
}

/// Theme id -> entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, theme_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(theme_id)
    }

    pub fn contains(&self, theme_id: &str) -> bool {
        self.entries.contains_key(theme_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

/// Title-case the hyphen-separated words of a theme id.
///
/// `"forest-mist"` becomes `"Forest Mist"`.
pub fn display_name(theme_id: &str) -> String {
    theme_id
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First CSS file whose name contains `category`, case-insensitively.
pub fn match_category_file<'a>(files: &'a [DirEntry], category: &str) -> Option<&'a DirEntry> {
    let category = category.to_lowercase();
    files.iter().find(|entry| {
        let name = entry.name.to_lowercase();
        entry.kind == EntryKind::File && name.ends_with(".css") && name.contains(&category)
    })
}

/// Build a catalog entry, or `None` if any required category has no file.
pub fn build_entry(
    dir: &DirEntry,
    files: &[DirEntry],
    remote: &RemoteConfig,
    categories: &[String],
) -> Option<CatalogEntry> {
    let mut category_files = BTreeMap::new();
    for category in categories {
        match match_category_file(files, category) {
            Some(file) => {
                category_files.insert(category.clone(), file.name.clone());
            }
            None => {
                debug!(theme = %dir.name, category = %category, "theme skipped: no stylesheet");
                return None;
            }
        }
    }

    Some(CatalogEntry {
        id: dir.name.clone(),
        display_name: display_name(&dir.name),
        category_files,
        remote_path: remote.theme_path(&dir.name),
    })
}

pub struct CatalogFetcher {
    source: Arc<dyn RemoteSource>,
    store: Arc<dyn AssetStore>,
    remote: RemoteConfig,
    categories: Vec<String>,
}

impl CatalogFetcher {
    pub fn new(
        source: Arc<dyn RemoteSource>,
        store: Arc<dyn AssetStore>,
        config: &LumenConfig,
    ) -> Self {
        Self {
            source,
            store,
            remote: config.remote.clone(),
            categories: config.themes.required_categories.clone(),
        }
    }

    /// Rebuild the catalog from the remote source and persist it.
    ///
    /// Any listing failure falls back to [`CatalogFetcher::cached`].
    pub async fn refresh(&self) -> Catalog {
        let catalog = match self.fetch().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "catalog refresh failed, using cached catalog");
                return self.cached().await;
            }
        };

        if let Err(e) = self.persist(&catalog).await {
            warn!(error = %e, "failed to cache refreshed catalog");
        }
        info!(themes = catalog.len(), "theme catalog refreshed");
        catalog
    }

    /// The last persisted catalog, or an empty one.
    pub async fn cached(&self) -> Catalog {
        let stored = match self.store.get(CATALOG_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "failed to read cached catalog");
                return Catalog::default();
            }
        };

        match stored {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(error = %e, "cached catalog is unreadable, ignoring it");
                Catalog::default()
            }),
            None => Catalog::default(),
        }
    }

    /// When the catalog was last refreshed successfully.
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let stored = self.store.get(CATALOG_UPDATED_KEY).await.ok()??;
        DateTime::parse_from_rfc3339(&stored)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    async fn fetch(&self) -> Result<Catalog, FetchError> {
        let root = self.source.list_dir(&self.remote.listing_url()).await?;
        let dirs: Vec<&DirEntry> = root
            .iter()
            .filter(|entry| entry.kind == EntryKind::Dir)
            .collect();

        let listings = join_all(dirs.iter().map(|dir| self.source.list_dir(&dir.url))).await;

        let mut entries = Vec::with_capacity(dirs.len());
        for (dir, listing) in dirs.into_iter().zip(listings) {
            let files = listing?;
            if let Some(entry) = build_entry(dir, &files, &self.remote, &self.categories) {
                entries.push(entry);
            }
        }
        Ok(Catalog::from_entries(entries))
    }

    async fn persist(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let json = serde_json::to_string(catalog)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.store
            .set_many(vec![
                (CATALOG_KEY.to_string(), json),
                (CATALOG_UPDATED_KEY.to_string(), now),
            ])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use crate::testing::RejectingStore;
    use lumen_store::MemoryStore;

    const DIR_URL: &str = "https://api.test/contents/themes";

    fn config() -> LumenConfig {
        let mut config = LumenConfig::default();
        config.remote.api_base = "https://api.test".into();
        config
    }

    fn theme_dir(name: &str) -> DirEntry {
        DirEntry::dir(name, format!("{DIR_URL}/{name}"))
    }

    fn css(name: &str) -> DirEntry {
        DirEntry::file(name, format!("https://api.test/file/{name}"))
    }

    fn source_with(themes: &[(&str, Vec<DirEntry>)]) -> StaticSource {
        let config = config();
        let mut root: Vec<DirEntry> = themes.iter().map(|(name, _)| theme_dir(name)).collect();
        root.push(DirEntry::file("README.md", "https://api.test/readme"));
        let mut source = StaticSource::new().with_listing(config.remote.listing_url(), root);
        for (name, files) in themes {
            source = source.with_listing(format!("{DIR_URL}/{name}"), files.clone());
        }
        source
    }

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(display_name("forest-mist"), "Forest Mist");
        assert_eq!(display_name("dark"), "Dark");
        assert_eq!(display_name("neo--tokyo-night"), "Neo Tokyo Night");
    }

    #[test]
    fn category_match_is_case_insensitive_and_first_wins() {
        let files = vec![
            css("README-home.md"),
            css("Forest-Mist-Theme-HOME.CSS"),
            css("forest-mist-home-alt.css"),
        ];
        let matched = match_category_file(&files, "home").unwrap();
        assert_eq!(matched.name, "Forest-Mist-Theme-HOME.CSS");
        assert!(match_category_file(&files, "extras").is_none());
    }

    #[tokio::test]
    async fn refresh_admits_only_complete_themes() {
        let source = source_with(&[
            (
                "forest-mist",
                vec![
                    css("forest-mist-theme-home.css"),
                    css("forest-mist-theme-assignments.css"),
                    css("forest-mist-theme-extras.css"),
                ],
            ),
            (
                "half-done",
                vec![css("half-done-home.css"), css("half-done-assignments.css")],
            ),
        ]);
        let store = Arc::new(MemoryStore::new());
        let fetcher = CatalogFetcher::new(Arc::new(source), store.clone(), &config());

        let catalog = fetcher.refresh().await;
        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("forest-mist").unwrap();
        assert_eq!(entry.display_name, "Forest Mist");
        assert_eq!(entry.remote_path, "themes/forest-mist");
        assert_eq!(entry.category_files["extras"], "forest-mist-theme-extras.css");
        assert!(!catalog.contains("half-done"));

        // Persisted with a refresh timestamp.
        assert!(store.get(CATALOG_KEY).await.unwrap().is_some());
        assert!(fetcher.last_refreshed().await.is_some());
        assert_eq!(fetcher.cached().await, catalog);
    }

    #[tokio::test]
    async fn refresh_failure_returns_cached_catalog() {
        let store = Arc::new(MemoryStore::new());
        let cached = Catalog::from_entries(vec![CatalogEntry {
            id: "nord".into(),
            display_name: "Nord".into(),
            category_files: BTreeMap::new(),
            remote_path: "themes/nord".into(),
        }]);
        store
            .set(CATALOG_KEY, &serde_json::to_string(&cached).unwrap())
            .await
            .unwrap();

        let source = StaticSource::new().with_offline(config().remote.listing_url());
        let fetcher = CatalogFetcher::new(Arc::new(source), store.clone(), &config());

        assert_eq!(fetcher.refresh().await, cached);
        // The failed refresh does not touch the timestamp.
        assert!(fetcher.last_refreshed().await.is_none());
    }

    #[tokio::test]
    async fn refresh_returns_fetched_catalog_when_it_cannot_be_cached() {
        let source = source_with(&[(
            "nord",
            vec![
                css("nord-home.css"),
                css("nord-assignments.css"),
                css("nord-extras.css"),
            ],
        )]);
        let store = Arc::new(RejectingStore::new(CATALOG_UPDATED_KEY));
        let fetcher = CatalogFetcher::new(Arc::new(source), store.clone(), &config());

        let catalog = fetcher.refresh().await;
        assert!(catalog.contains("nord"));

        // Nothing was persisted.
        assert!(store.inner.is_empty().await);
        assert!(fetcher.cached().await.is_empty());
        assert!(fetcher.last_refreshed().await.is_none());
    }

    #[tokio::test]
    async fn failing_theme_listing_fails_whole_refresh() {
        let mut source = source_with(&[(
            "nord",
            vec![
                css("nord-home.css"),
                css("nord-assignments.css"),
                css("nord-extras.css"),
            ],
        )]);
        source = source.with_status(format!("{DIR_URL}/nord"), 403);
        let fetcher =
            CatalogFetcher::new(Arc::new(source), Arc::new(MemoryStore::new()), &config());

        assert!(fetcher.refresh().await.is_empty());
    }

    #[tokio::test]
    async fn refresh_without_cache_or_network_is_empty() {
        let fetcher = CatalogFetcher::new(
            Arc::new(StaticSource::new()),
            Arc::new(MemoryStore::new()),
            &config(),
        );
        assert!(fetcher.refresh().await.is_empty());
    }

    #[tokio::test]
    async fn unreadable_cache_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(CATALOG_KEY, "not json").await.unwrap();
        let fetcher = CatalogFetcher::new(Arc::new(StaticSource::new()), store, &config());
        assert!(fetcher.cached().await.is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_previous_catalog() {
        let store = Arc::new(MemoryStore::new());
        let old = Catalog::from_entries(vec![CatalogEntry {
            id: "retired".into(),
            display_name: "Retired".into(),
            category_files: BTreeMap::new(),
            remote_path: "themes/retired".into(),
        }]);
        store
            .set(CATALOG_KEY, &serde_json::to_string(&old).unwrap())
            .await
            .unwrap();

        let source = source_with(&[(
            "nord",
            vec![
                css("nord-home.css"),
                css("nord-assignments.css"),
                css("nord-extras.css"),
            ],
        )]);
        let fetcher = CatalogFetcher::new(Arc::new(source), store, &config());
        let catalog = fetcher.refresh().await;
        assert!(catalog.contains("nord"));
        assert!(!catalog.contains("retired"));
    }
}
