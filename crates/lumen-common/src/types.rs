use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored value meaning "no custom styling".
pub const DEFAULT_THEME: &str = "default";

/// The single theme applied to matching pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActiveTheme {
    #[default]
    Default,
    Custom(String),
}

impl ActiveTheme {
    /// Interpret the raw value of the active theme key. Missing or empty
    /// values read as [`ActiveTheme::Default`].
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(DEFAULT_THEME) => Self::Default,
            Some(id) => Self::Custom(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => DEFAULT_THEME,
            Self::Custom(id) => id,
        }
    }

    /// The custom theme id, if any.
    pub fn theme_id(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Custom(id) => Some(id),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl From<String> for ActiveTheme {
    fn from(value: String) -> Self {
        Self::from_stored(Some(&value))
    }
}

impl From<ActiveTheme> for String {
    fn from(value: ActiveTheme) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ActiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
