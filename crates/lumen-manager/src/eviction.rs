//! Storage-bounding eviction.
//!
//! Keeps the active theme plus the `retain_recent` most recently downloaded
//! other themes; every other theme's assets and marker are removed. Themes
//! without a readable download timestamp rank behind all timestamped ones,
//! except the active theme, which is never evicted.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lumen_common::keys::{
    download_marker_key, theme_from_asset_key, theme_from_marker_key, theme_keys,
};
use lumen_common::{ActiveTheme, StoreError};
use lumen_config::ThemesConfig;
use lumen_store::AssetStore;
use tracing::{debug, info, warn};

/// A theme with at least one stored asset or a download marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedTheme {
    pub id: String,
    pub downloaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    pub retained: Vec<String>,
    pub evicted: Vec<String>,
}

/// Every theme occupying storage, in id order.
pub async fn downloaded_themes(
    store: &dyn AssetStore,
    categories: &[String],
) -> Result<Vec<DownloadedTheme>, StoreError> {
    let mut ids = BTreeSet::new();
    for key in store.keys().await? {
        let id = theme_from_marker_key(&key).or_else(|| theme_from_asset_key(&key, categories));
        if let Some(id) = id {
            ids.insert(id.to_string());
        }
    }

    let marker_keys: Vec<String> = ids.iter().map(|id| download_marker_key(id)).collect();
    let markers = store.get_many(&marker_keys).await?;

    Ok(ids
        .into_iter()
        .map(|id| {
            let downloaded_at = markers
                .get(&download_marker_key(&id))
                .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
                .map(|t| t.with_timezone(&Utc));
            DownloadedTheme { id, downloaded_at }
        })
        .collect())
}

/// Decide which themes to keep. Pure; performs no I/O.
pub fn plan_eviction(
    active: &ActiveTheme,
    themes: &[DownloadedTheme],
    retain_recent: usize,
) -> EvictionReport {
    let active_id = active.theme_id();

    let mut others: Vec<&DownloadedTheme> = themes
        .iter()
        .filter(|theme| Some(theme.id.as_str()) != active_id)
        .collect();
    // Newest first; `None` sorts below every timestamp.
    others.sort_by(|a, b| {
        b.downloaded_at
            .cmp(&a.downloaded_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut retained: Vec<String> = active_id
        .filter(|id| themes.iter().any(|theme| theme.id == *id))
        .map(|id| vec![id.to_string()])
        .unwrap_or_default();
    retained.extend(others.iter().take(retain_recent).map(|t| t.id.clone()));

    let evicted = others
        .iter()
        .skip(retain_recent)
        .map(|t| t.id.clone())
        .collect();

    EvictionReport { retained, evicted }
}

/// Remove every downloaded theme outside the retain set.
pub async fn evict(
    store: &dyn AssetStore,
    categories: &[String],
    retain_recent: usize,
) -> Result<EvictionReport, StoreError> {
    let active = store.active_theme().await?;
    let themes = downloaded_themes(store, categories).await?;
    let report = plan_eviction(&active, &themes, retain_recent);

    if report.evicted.is_empty() {
        debug!(themes = themes.len(), "nothing to evict");
        return Ok(report);
    }

    let keys: Vec<String> = report
        .evicted
        .iter()
        .flat_map(|id| theme_keys(id, categories))
        .collect();
    store.remove_many(&keys).await?;

    info!(
        evicted = ?report.evicted,
        retained = ?report.retained,
        "evicted unused themes"
    );
    Ok(report)
}

/// Wait `delay`, then evict. Failures are logged, never returned.
pub async fn evict_after(
    delay: Duration,
    store: Arc<dyn AssetStore>,
    themes: ThemesConfig,
) -> Option<EvictionReport> {
    tokio::time::sleep(delay).await;
    match evict(store.as_ref(), &themes.required_categories, themes.retain_recent).await {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(error = %e, "background eviction failed");
            None
        }
    }
}
