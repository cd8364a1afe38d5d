//! Theme lifecycle management.
//!
//! [`ThemeManager`] owns one session's state (the in-memory catalog and
//! the components that act on it). [`eviction`] bounds how many downloaded
//! themes stay in the store.

pub mod eviction;
pub mod manager;

pub use eviction::{
    downloaded_themes, evict, evict_after, plan_eviction, DownloadedTheme, EvictionReport,
};
pub use manager::{ManagerError, ThemeListing, ThemeManager};
