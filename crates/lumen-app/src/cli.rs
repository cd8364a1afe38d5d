use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lumen: download, activate and apply portal themes.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file path override.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rebuild the theme catalog from the remote repository.
    Refresh,
    /// List catalog themes with their download and active state.
    List,
    /// Download every category of a theme.
    Download { id: String },
    /// Activate a theme, or deactivate it if it is already active.
    Toggle { id: String },
    /// Print the active theme.
    Active,
    /// Remove themes beyond the retention bound now.
    Evict,
    /// Print the script that styles the page at `url`.
    Apply {
        url: String,
        /// Directory holding packaged `themes/{id}/{id}-{category}.css` files.
        #[arg(long)]
        packaged: Option<PathBuf>,
    },
    /// Keep a page styled, printing a script on every active-theme change.
    Watch {
        url: String,
        #[arg(long)]
        packaged: Option<PathBuf>,
    },
    /// Write a commented starter config file.
    InitConfig {
        /// Destination; defaults to the platform config path.
        path: Option<PathBuf>,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
