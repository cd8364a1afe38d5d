//! URL to page-category mapping.

use lumen_common::ConfigError;
use lumen_config::{PageRule, PagesConfig};
use regex::Regex;

/// Ordered `(pattern, category)` rules; the first match wins.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    rules: Vec<(Regex, String)>,
}

impl PageClassifier {
    pub fn new(rules: &[PageRule]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.category.clone()))
                    .map_err(|e| {
                        ConfigError::ValidationError(format!("pages.rules[{i}].pattern: {e}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn from_config(pages: &PagesConfig) -> Result<Self, ConfigError> {
        Self::new(&pages.rules)
    }

    /// The category of `url`, or `None` for pages no theme applies to.
    pub fn classify(&self, url: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(url))
            .map(|(_, category)| category.as_str())
    }
}
