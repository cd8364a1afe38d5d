//! Command execution against one theme-manager session.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::SecondsFormat;
use lumen_common::{Event, LumenError, StoreError};
use lumen_config::LumenConfig;
use lumen_manager::{ManagerError, ThemeManager};
use lumen_page::{
    style_injection_js, style_removal_js, CssResolver, DirectoryAssets, PageClassifier,
    ScriptRecorder, StyleHost, ThemeApplicator,
};
use lumen_remote::HttpSource;
use lumen_store::{spawn_store_watcher, FileStore};
use tracing::{info, warn};

use crate::cli::Command;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Lumen(#[from] LumenError),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("no store location: set storage.path in the config or pass --store")]
    NoStorePath,
}

/// Open the store and a manager session, then run `command`.
pub async fn run(
    command: Command,
    config: LumenConfig,
    store_override: Option<PathBuf>,
) -> Result<(), AppError> {
    // Needs no store or network.
    if let Command::InitConfig { path, force } = command {
        return init_config(path.as_deref(), force, &mut std::io::stdout());
    }

    let store_path = store_override
        .or_else(|| config.storage.resolve_path())
        .ok_or(AppError::NoStorePath)?;
    let store = Arc::new(
        FileStore::open(&store_path)
            .await
            .map_err(LumenError::from)?,
    );
    let source = Arc::new(HttpSource::new(&config.remote).map_err(LumenError::from)?);
    let watch_file = config.storage.watch && matches!(command, Command::Watch { .. });
    let mut manager = ThemeManager::open(store.clone(), source, config).await?;

    if watch_file {
        // The watcher observes the parent directory, which must exist.
        if let Some(parent) = store.path().parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LumenError::from(StoreError::from(e)))?;
        }
        spawn_store_watcher(store);
    }

    execute(command, &mut manager, &mut std::io::stdout()).await
}

/// Run a one-shot command, writing its result to `out`.
///
/// Manager events raised while the command runs are written after its
/// output as status lines, including on failure.
pub async fn execute(
    command: Command,
    manager: &mut ThemeManager,
    out: &mut (impl Write + Send),
) -> Result<(), AppError> {
    let mut events = manager.subscribe();
    let result = dispatch(command, manager, out).await;
    while let Ok(event) = events.try_recv() {
        if let Some(status) = status_line(&event) {
            writeln!(out, "{status}")?;
        }
    }
    result
}

async fn dispatch(
    command: Command,
    manager: &mut ThemeManager,
    out: &mut (impl Write + Send),
) -> Result<(), AppError> {
    match command {
        Command::Refresh => {
            manager.refresh_catalog().await;
        }
        Command::List => {
            let listings = manager.themes().await?;
            if listings.is_empty() {
                writeln!(out, "catalog is empty; run `lumen refresh`")?;
            }
            for listing in listings {
                let marker = if listing.active { '*' } else { ' ' };
                let state = if listing.downloaded {
                    "downloaded"
                } else {
                    "not downloaded"
                };
                writeln!(
                    out,
                    "{marker} {:<24} {:<24} {state}",
                    listing.entry.id, listing.entry.display_name
                )?;
            }
            if let Some(updated) = manager.catalog_updated().await {
                writeln!(
                    out,
                    "(catalog refreshed {})",
                    updated.to_rfc3339_opts(SecondsFormat::Secs, true)
                )?;
            }
        }
        Command::Download { id } => {
            if !manager.catalog().contains(&id) {
                manager.refresh_catalog().await;
            }
            let report = manager.download(&id).await?;
            writeln!(
                out,
                "fetched {} categories ({} bytes)",
                report.categories, report.bytes
            )?;
        }
        Command::Toggle { id } => {
            manager.toggle(&id).await?;
        }
        Command::Active => {
            writeln!(out, "{}", manager.active_theme().await?)?;
        }
        Command::Evict => {
            if manager.evict().await?.evicted.is_empty() {
                writeln!(out, "nothing to evict")?;
            }
        }
        Command::Apply { url, packaged } => {
            let mut applicator = page_applicator(manager, &url, packaged, ScriptRecorder::new())?;
            let state = applicator.apply().await.clone();
            info!(url = %url, state = ?state, "page applied");
            if let Some(script) = applicator.host().last() {
                writeln!(out, "{script}")?;
            }
        }
        Command::Watch { url, packaged } => {
            manager.schedule_eviction();
            let mut applicator = page_applicator(manager, &url, packaged, ScriptWriter { out })?;
            info!(url = %url, "watching active theme");
            tokio::select! {
                _ = applicator.attach() => {}
                _ = tokio::signal::ctrl_c() => info!("interrupted"),
            }
        }
        Command::InitConfig { path, force } => init_config(path.as_deref(), force, out)?,
    }
    Ok(())
}

/// The user-facing status line for a manager event.
fn status_line(event: &Event) -> Option<String> {
    match event {
        Event::CatalogRefreshed { themes } => Some(format!("catalog: {themes} theme(s)")),
        Event::ThemeDownloaded { theme } => Some(format!("downloaded {theme}")),
        Event::DownloadFailed { theme, reason } => {
            Some(format!("download of {theme} failed: {reason}"))
        }
        Event::ActiveThemeChanged { theme } => Some(format!("active theme: {theme}")),
        Event::ThemesEvicted { themes } => Some(format!("evicted: {}", themes.join(", "))),
        Event::Unknown => None,
    }
}

fn init_config(path: Option<&Path>, force: bool, out: &mut impl Write) -> Result<(), AppError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => lumen_config::toml_loader::default_config_path().map_err(LumenError::from)?,
    };
    lumen_config::toml_loader::create_default_config(&path, force).map_err(LumenError::from)?;
    writeln!(out, "wrote {}", path.display())?;
    Ok(())
}

fn page_applicator<H: StyleHost>(
    manager: &ThemeManager,
    url: &str,
    packaged: Option<PathBuf>,
    host: H,
) -> Result<ThemeApplicator<H>, AppError> {
    let pages = &manager.config().pages;
    let classifier = PageClassifier::from_config(pages).map_err(LumenError::from)?;
    let packaged_dir = packaged.unwrap_or_else(|| pages.packaged_dir.clone());
    let resolver = CssResolver::new(
        manager.store().clone(),
        Arc::new(DirectoryAssets::new(packaged_dir)),
    );
    Ok(ThemeApplicator::new(
        url,
        Arc::new(classifier),
        resolver,
        manager.store().clone(),
        host,
    ))
}

/// Writes each page script to `out` as soon as it is produced.
struct ScriptWriter<'a, W> {
    out: &'a mut W,
}

impl<W: Write> ScriptWriter<'_, W> {
    fn emit(&mut self, script: &str) {
        if let Err(e) = writeln!(self.out, "{script}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write page script");
        }
    }
}

impl<W: Write + Send> StyleHost for ScriptWriter<'_, W> {
    fn replace_theme_style(&mut self, theme: &str, css: &str) {
        self.emit(&style_injection_js(theme, css));
    }

    fn remove_theme_style(&mut self) {
        self.emit(&style_removal_js());
    }
}
