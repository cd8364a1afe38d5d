//! Per-page theme application.
//!
//! Runs once for every open portal page:
//! - Classify the page URL into a category ([`PageClassifier`])
//! - Resolve the active theme's CSS for that category ([`CssResolver`])
//! - Keep exactly one theme-managed `<style>` element in the page ([`StyleHost`])
//! - Re-apply whenever the active theme changes ([`ThemeApplicator::run`])

pub mod applicator;
pub mod classifier;
pub mod document;
pub mod packaged;
pub mod resolve;

pub use applicator::{ApplyState, ThemeApplicator, UnstyledReason};
pub use classifier::PageClassifier;
pub use document::{
    style_injection_js, style_removal_js, MemoryDocument, ScriptRecorder, StyleElement, StyleHost,
    THEME_MARKER_ATTR,
};
pub use packaged::{packaged_path, DirectoryAssets, PackagedAssets};
pub use resolve::{CssResolver, CssSource, ResolvedCss};
