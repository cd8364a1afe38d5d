//! Per-page theme application state machine.
//!
//! Each apply walks `Uninitialized -> Classifying -> Styled | Unstyled`.
//! Whatever the outcome, the page ends with either exactly one managed style
//! holding the resolved CSS or no managed style at all.

use std::sync::Arc;

use lumen_common::ActiveTheme;
use lumen_store::{AssetStore, StoreChange};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::classifier::PageClassifier;
use crate::document::StyleHost;
use crate::resolve::{CssResolver, CssSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnstyledReason {
    /// The active theme is `default`.
    DefaultTheme,
    /// The URL matches no page rule.
    Unrecognized,
    /// Neither the store nor the bundle has CSS for the page.
    NoAsset,
    /// Reading the store failed.
    StoreUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyState {
    Uninitialized,
    Classifying,
    Styled {
        theme: String,
        category: String,
        source: CssSource,
    },
    Unstyled(UnstyledReason),
}

pub struct ThemeApplicator<H: StyleHost> {
    url: String,
    classifier: Arc<PageClassifier>,
    resolver: CssResolver,
    store: Arc<dyn AssetStore>,
    host: H,
    state: ApplyState,
}

impl<H: StyleHost> ThemeApplicator<H> {
    pub fn new(
        url: impl Into<String>,
        classifier: Arc<PageClassifier>,
        resolver: CssResolver,
        store: Arc<dyn AssetStore>,
        host: H,
    ) -> Self {
        Self {
            url: url.into(),
            classifier,
            resolver,
            store,
            host,
            state: ApplyState::Uninitialized,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &ApplyState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Apply whatever theme the store currently names as active.
    pub async fn apply(&mut self) -> &ApplyState {
        match self.store.active_theme().await {
            Ok(active) => self.apply_theme(&active).await,
            Err(e) => {
                warn!(url = %self.url, error = %e, "failed to read active theme");
                self.unstyle(UnstyledReason::StoreUnavailable)
            }
        }
    }

    /// Apply `active` without consulting the store for the theme id.
    pub async fn apply_theme(&mut self, active: &ActiveTheme) -> &ApplyState {
        let Some(theme) = active.theme_id() else {
            return self.unstyle(UnstyledReason::DefaultTheme);
        };

        self.state = ApplyState::Classifying;
        let Some(category) = self.classifier.classify(&self.url).map(str::to_string) else {
            debug!(url = %self.url, "page not recognized, leaving unstyled");
            return self.unstyle(UnstyledReason::Unrecognized);
        };

        match self.resolver.resolve(theme, &category).await {
            Ok(Some(resolved)) => {
                self.host.replace_theme_style(theme, &resolved.css);
                info!(theme, category = %category, source = %resolved.source, "theme applied");
                self.state = ApplyState::Styled {
                    theme: theme.to_string(),
                    category,
                    source: resolved.source,
                };
                &self.state
            }
            Ok(None) => {
                debug!(theme, category = %category, "no css for page");
                self.unstyle(UnstyledReason::NoAsset)
            }
            Err(e) => {
                warn!(theme, category = %category, error = %e, "failed to resolve theme css");
                self.unstyle(UnstyledReason::StoreUnavailable)
            }
        }
    }

    /// Subscribe to the store, apply once, then follow active-theme changes.
    pub async fn attach(&mut self) {
        let changes = self.store.subscribe();
        self.apply().await;
        self.run(changes).await;
    }

    /// Re-apply on every active-theme change until `changes` closes.
    ///
    /// After falling behind, the current store value is applied once.
    pub async fn run(&mut self, mut changes: broadcast::Receiver<StoreChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    if let Some(active) = change.active_theme() {
                        self.apply_theme(&active).await;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "store changes lagged, re-applying");
                    self.apply().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn unstyle(&mut self, reason: UnstyledReason) -> &ApplyState {
        self.host.remove_theme_style();
        self.state = ApplyState::Unstyled(reason);
        &self.state
    }
}
