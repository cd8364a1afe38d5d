//! Page classification and packaged asset configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maps portal URLs matching `pattern` (a regex) to `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRule {
    pub pattern: String,
    pub category: String,
}

impl PageRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Checked in order; the first matching rule wins.
    pub rules: Vec<PageRule>,
    /// Root of the bundled `themes/{id}/{id}-{category}.css` tree.
    pub packaged_dir: PathBuf,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                PageRule::new(r"student_dashboard|/dashboard", "home"),
                PageRule::new(r"assignment", "assignments"),
                PageRule::new(r"extras|activities|clubs", "extras"),
            ],
            packaged_dir: PathBuf::from("resources"),
        }
    }
}
