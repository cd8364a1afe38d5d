mod cli;
mod commands;

use std::process::ExitCode;

use lumen_config::LumenConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Loaded before logging so `logging.level` can set the default filter.
    let loaded = match &args.config {
        Some(path) => lumen_config::load_config_from(path),
        None => lumen_config::load_config(),
    };

    let config_directive = loaded
        .as_ref()
        .map(|config| config.logging.level)
        .unwrap_or_default()
        .directive();
    let log_directive = args.log_level.as_deref().unwrap_or(config_directive);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::debug!("lumen v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        LumenConfig::default()
    });

    match commands::run(args.command, config, args.store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
