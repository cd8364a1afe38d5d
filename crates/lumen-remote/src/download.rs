//! Theme downloads.
//!
//! A theme is either fully downloaded or not at all: every category is
//! fetched concurrently, and nothing is written unless all of them pass.
//! Assets are written first and the download marker last, so readers that
//! check the marker never see a half-written theme.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::future::join_all;
use lumen_common::keys::{asset_key, download_marker_key, theme_keys};
use lumen_common::{FetchError, StoreError};
use lumen_config::{LumenConfig, RemoteConfig};
use lumen_store::AssetStore;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::source::RemoteSource;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("theme '{0}' is not in the catalog")]
    UnknownTheme(String),

    #[error("theme '{theme}' lists no file for category '{category}'")]
    MissingCategory { theme: String, category: String },

    #[error("category '{category}' failed: {source}")]
    Category {
        category: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Summary of a successful download.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub theme: String,
    pub categories: usize,
    pub bytes: usize,
    pub downloaded_at: DateTime<Utc>,
}

pub struct ThemeDownloader {
    source: Arc<dyn RemoteSource>,
    store: Arc<dyn AssetStore>,
    remote: RemoteConfig,
    categories: Vec<String>,
    min_css_len: usize,
}

impl ThemeDownloader {
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
            min_css_len: config.themes.min_css_len,
        }
    }

    /// Download every category of `theme_id` as listed in `catalog`.
    pub async fn download(
        &self,
        catalog: &Catalog,
        theme_id: &str,
    ) -> Result<DownloadReport, DownloadError> {
        let entry = catalog
            .get(theme_id)
            .ok_or_else(|| DownloadError::UnknownTheme(theme_id.to_string()))?;

        let mut urls = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let file = entry.category_files.get(category).ok_or_else(|| {
                DownloadError::MissingCategory {
                    theme: theme_id.to_string(),
                    category: category.clone(),
                }
            })?;
            urls.push(self.remote.asset_url(&entry.remote_path, file));
        }

        // Every fetch is in flight before any is awaited.
        let results = join_all(urls.iter().map(|url| self.fetch_css(url))).await;

        let mut assets = Vec::with_capacity(results.len());
        let mut first_failure = None;
        for (category, result) in self.categories.iter().zip(results) {
            match result {
                Ok(css) => assets.push((asset_key(theme_id, category), css)),
                Err(e) => {
                    warn!(
                        theme = theme_id,
                        category = %category,
                        error = %e,
                        "category fetch failed"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(DownloadError::Category {
                            category: category.clone(),
                            source: e,
                        });
                    }
                }
            }
        }
        if let Some(failure) = first_failure {
            return Err(failure);
        }

        let bytes: usize = assets.iter().map(|(_, css)| css.len()).sum();
        let asset_keys: Vec<String> = assets.iter().map(|(key, _)| key.clone()).collect();
        self.store.set_many(assets).await?;

        let downloaded_at = Utc::now();
        let marker = downloaded_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        if let Err(e) = self
            .store
            .set(&download_marker_key(theme_id), &marker)
            .await
        {
            // Without the marker the assets are orphans; take them back out.
            if let Err(cleanup) = self.store.remove_many(&asset_keys).await {
                warn!(theme = theme_id, error = %cleanup, "failed to remove orphaned assets");
            }
            return Err(e.into());
        }

        info!(theme = theme_id, bytes, "theme downloaded");
        Ok(DownloadReport {
            theme: theme_id.to_string(),
            categories: asset_keys.len(),
            bytes,
            downloaded_at,
        })
    }

    async fn fetch_css(&self, url: &str) -> Result<String, FetchError> {
        let css = self.source.fetch_text(url).await?;
        let len = css.chars().count();
        if len < self.min_css_len {
            return Err(FetchError::TooShort {
                len,
                min: self.min_css_len,
            });
        }
        Ok(css)
    }
}

/// Whether `theme_id` has its marker and a non-empty asset for every category.
pub async fn is_theme_downloaded(
    store: &dyn AssetStore,
    theme_id: &str,
    categories: &[String],
) -> Result<bool, StoreError> {
    let keys = theme_keys(theme_id, categories);
    let values = store.get_many(&keys).await?;
    Ok(keys
        .iter()
        .all(|key| values.get(key).is_some_and(|value| !value.is_empty())))
}
