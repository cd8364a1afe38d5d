use std::sync::Arc;

use chrono::{DateTime, Utc};
use lumen_common::{ActiveTheme, Event, EventBus, StoreError};
use lumen_config::LumenConfig;
use lumen_remote::{
    is_theme_downloaded, Catalog, CatalogEntry, CatalogFetcher, DownloadError, DownloadReport,
    RemoteSource, ThemeDownloader,
};
use lumen_store::AssetStore;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::eviction::{self, EvictionReport};

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("theme '{0}' is not downloaded")]
    NotDownloaded(String),
}

/// One catalog row as a theme picker shows it.
#[derive(Debug, Clone)]
pub struct ThemeListing {
    pub entry: CatalogEntry,
    pub downloaded: bool,
    pub active: bool,
}

/// State owned by a single session of the theme picker.
///
/// The catalog lives here rather than in a global; every operation reads and
/// writes theme state through the shared [`AssetStore`].
pub struct ThemeManager {
    config: LumenConfig,
    store: Arc<dyn AssetStore>,
    fetcher: CatalogFetcher,
    downloader: ThemeDownloader,
    catalog: Catalog,
    events: EventBus,
}

impl ThemeManager {
    /// Start a session from the cached catalog.
    ///
    /// An active theme whose assets have since been evicted or damaged is
    /// reset to the default so pages never reference missing CSS.
    pub async fn open(
        store: Arc<dyn AssetStore>,
        source: Arc<dyn RemoteSource>,
        config: LumenConfig,
    ) -> Result<Self, ManagerError> {
        let fetcher = CatalogFetcher::new(source.clone(), store.clone(), &config);
        let downloader = ThemeDownloader::new(source, store.clone(), &config);
        let catalog = fetcher.cached().await;

        let manager = Self {
            config,
            store,
            fetcher,
            downloader,
            catalog,
            events: EventBus::default(),
        };

        let active = manager.store.active_theme().await?;
        if let Some(id) = active.theme_id() {
            if !manager.is_theme_downloaded(id).await? {
                warn!(theme = id, "active theme is no longer downloaded, reverting to default");
                manager.store.set_active_theme(&ActiveTheme::Default).await?;
            }
        }

        Ok(manager)
    }

    pub async fn refresh_catalog(&mut self) -> &Catalog {
        self.catalog = self.fetcher.refresh().await;
        self.events.publish(Event::CatalogRefreshed {
            themes: self.catalog.len(),
        });
        &self.catalog
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// When the catalog was last refreshed from the remote, if ever.
    pub async fn catalog_updated(&self) -> Option<DateTime<Utc>> {
        self.fetcher.last_refreshed().await
    }

    /// Every catalog theme with its downloaded and active state, by display name.
    pub async fn themes(&self) -> Result<Vec<ThemeListing>, ManagerError> {
        let active = self.store.active_theme().await?;
        let mut listings = Vec::with_capacity(self.catalog.len());
        for entry in self.catalog.iter() {
            listings.push(ThemeListing {
                downloaded: self.is_theme_downloaded(&entry.id).await?,
                active: active.theme_id() == Some(entry.id.as_str()),
                entry: entry.clone(),
            });
        }
        listings.sort_by(|a, b| {
            a.entry
                .display_name
                .cmp(&b.entry.display_name)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        Ok(listings)
    }

    pub async fn download(&self, theme_id: &str) -> Result<DownloadReport, ManagerError> {
        match self.downloader.download(&self.catalog, theme_id).await {
            Ok(report) => {
                self.events.publish(Event::ThemeDownloaded {
                    theme: theme_id.to_string(),
                });
                Ok(report)
            }
            Err(e) => {
                self.events.publish(Event::DownloadFailed {
                    theme: theme_id.to_string(),
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    pub async fn is_theme_downloaded(&self, theme_id: &str) -> Result<bool, ManagerError> {
        Ok(is_theme_downloaded(
            self.store.as_ref(),
            theme_id,
            &self.config.themes.required_categories,
        )
        .await?)
    }

    pub async fn active_theme(&self) -> Result<ActiveTheme, ManagerError> {
        Ok(self.store.active_theme().await?)
    }

    /// Make `theme` the active theme. Custom themes must be downloaded first.
    pub async fn set_active_theme(&self, theme: ActiveTheme) -> Result<(), ManagerError> {
        if let Some(id) = theme.theme_id() {
            if !self.is_theme_downloaded(id).await? {
                return Err(ManagerError::NotDownloaded(id.to_string()));
            }
        }

        self.store.set_active_theme(&theme).await?;
        info!(theme = %theme, "active theme changed");
        self.events.publish(Event::ActiveThemeChanged {
            theme: theme.to_string(),
        });
        Ok(())
    }

    /// Deactivate `theme_id` if it is active, otherwise activate it.
    pub async fn toggle(&self, theme_id: &str) -> Result<ActiveTheme, ManagerError> {
        let next = if self.active_theme().await?.theme_id() == Some(theme_id) {
            ActiveTheme::Default
        } else {
            ActiveTheme::Custom(theme_id.to_string())
        };
        self.set_active_theme(next.clone()).await?;
        Ok(next)
    }

    pub async fn evict(&self) -> Result<EvictionReport, ManagerError> {
        let report = eviction::evict(
            self.store.as_ref(),
            &self.config.themes.required_categories,
            self.config.themes.retain_recent,
        )
        .await?;
        if !report.evicted.is_empty() {
            self.events.publish(Event::ThemesEvicted {
                themes: report.evicted.clone(),
            });
        }
        Ok(report)
    }

    /// Evict in the background once the configured delay has passed.
    pub fn schedule_eviction(&self) -> JoinHandle<Option<EvictionReport>> {
        let store = self.store.clone();
        let themes = self.config.themes.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let report = eviction::evict_after(themes.eviction_delay(), store, themes).await;
            if let Some(report) = &report {
                if !report.evicted.is_empty() {
                    events.publish(Event::ThemesEvicted {
                        themes: report.evicted.clone(),
                    });
                }
            }
            report
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    pub fn config(&self) -> &LumenConfig {
        &self.config
    }
}
