//! The page side of theme application.
//!
//! [`StyleHost`] is the only thing the applicator knows about a page. A host
//! keeps at most one theme-managed `<style>` element, identified by the
//! [`THEME_MARKER_ATTR`] attribute, and leaves every other style alone.

/// Attribute marking the single theme-managed `<style>` element.
pub const THEME_MARKER_ATTR: &str = "data-lumen-theme";

pub trait StyleHost: Send {
    /// Insert a managed style for `theme` with `css` as its exact content,
    /// replacing any managed style already present.
    fn replace_theme_style(&mut self, theme: &str, css: &str);

    /// Remove the managed style, if any.
    fn remove_theme_style(&mut self);
}

/// A `<style>` element. `theme` is the marker attribute's value, if set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub theme: Option<String>,
    pub css: String,
}

impl StyleElement {
    pub fn is_managed(&self) -> bool {
        self.theme.is_some()
    }
}

/// In-memory stand-in for a page's `<head>` styles.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    styles: Vec<StyleElement>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style the page itself owns.
    pub fn with_page_style(mut self, css: impl Into<String>) -> Self {
        self.styles.push(StyleElement {
            theme: None,
            css: css.into(),
        });
        self
    }

    pub fn styles(&self) -> &[StyleElement] {
        &self.styles
    }

    pub fn managed_styles(&self) -> impl Iterator<Item = &StyleElement> {
        self.styles.iter().filter(|style| style.is_managed())
    }

    pub fn managed_style(&self) -> Option<&StyleElement> {
        self.managed_styles().next()
    }
}

impl StyleHost for MemoryDocument {
    fn replace_theme_style(&mut self, theme: &str, css: &str) {
        self.remove_theme_style();
        self.styles.push(StyleElement {
            theme: Some(theme.to_string()),
            css: css.to_string(),
        });
    }

    fn remove_theme_style(&mut self) {
        self.styles.retain(|style| !style.is_managed());
    }
}

/// Collects the scripts a webview host would evaluate, in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptRecorder {
    scripts: Vec<String>,
}

impl ScriptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn last(&self) -> Option<&str> {
        self.scripts.last().map(String::as_str)
    }
}

impl StyleHost for ScriptRecorder {
    fn replace_theme_style(&mut self, theme: &str, css: &str) {
        self.scripts.push(style_injection_js(theme, css));
    }

    fn remove_theme_style(&mut self) {
        self.scripts.push(style_removal_js());
    }
}

/// Escape for a single-quoted JS string literal.
fn escape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

/// JavaScript that replaces the page's managed style with `css`.
///
/// The CSS is assigned through `textContent`, so the browser stores it
/// byte-for-byte.
pub fn style_injection_js(theme: &str, css: &str) -> String {
    let theme = escape_js(theme);
    let css = escape_js(css);
    format!(
        "(function() {{\n\
        \x20 var d = document;\n\
        \x20 d.querySelectorAll('style[{THEME_MARKER_ATTR}]').forEach(function(e) {{ e.remove(); }});\n\
        \x20 var s = d.createElement('style');\n\
        \x20 s.setAttribute('{THEME_MARKER_ATTR}', '{theme}');\n\
        \x20 s.textContent = '{css}';\n\
        \x20 (d.head || d.documentElement).appendChild(s);\n\
        }})();"
    )
}

/// JavaScript that removes the page's managed style.
pub fn style_removal_js() -> String {
    format!(
        "(function() {{\n\
        \x20 document.querySelectorAll('style[{THEME_MARKER_ATTR}]').forEach(function(e) {{ e.remove(); }});\n\
        }})();"
    )
}
