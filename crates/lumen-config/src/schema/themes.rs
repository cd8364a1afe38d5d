//! Theme asset and storage-bound configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Page categories every theme must provide a stylesheet for.
pub const DEFAULT_CATEGORIES: &[&str] = &["home", "assignments", "extras"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    pub required_categories: Vec<String>,
    /// Shortest CSS body, in characters, accepted as a real stylesheet
    /// (valid range: 1-65536).
    pub min_css_len: usize,
    /// Downloaded themes kept besides the active one (valid range: 0-16).
    pub retain_recent: usize,
    /// Delay before background eviction runs, in milliseconds (valid range: 0-600000).
    pub eviction_delay_ms: u64,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            required_categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            min_css_len: 10,
            retain_recent: 2,
            eviction_delay_ms: 5000,
        }
    }
}

impl ThemesConfig {
    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }
}
