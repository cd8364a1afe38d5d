//! CSS bundled with the application, used when the store has no copy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait PackagedAssets: Send + Sync {
    /// The bundled CSS for `(theme_id, category)`, if it exists and is non-empty.
    async fn load(&self, theme_id: &str, category: &str) -> Option<String>;
}

/// Bundle-relative path of a packaged asset: `themes/{id}/{id}-{category}.css`.
pub fn packaged_path(theme_id: &str, category: &str) -> PathBuf {
    Path::new("themes")
        .join(theme_id)
        .join(format!("{theme_id}-{category}.css"))
}

/// Serves packaged assets from a directory on disk.
pub struct DirectoryAssets {
    base_dir: PathBuf,
}

impl DirectoryAssets {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl PackagedAssets for DirectoryAssets {
    async fn load(&self, theme_id: &str, category: &str) -> Option<String> {
        let file_path = self.base_dir.join(packaged_path(theme_id, category));

        // Canonicalize both sides so `..` and symlinks cannot escape the bundle.
        let canonical_base = tokio::fs::canonicalize(&self.base_dir).await.ok()?;
        let canonical_file = match tokio::fs::canonicalize(&file_path).await {
            Ok(path) => path,
            Err(e) => {
                debug!(path = %file_path.display(), error = %e, "no packaged asset");
                return None;
            }
        };
        if !canonical_file.starts_with(&canonical_base) {
            warn!(theme = theme_id, category, "packaged asset path escapes bundle directory");
            return None;
        }

        match tokio::fs::read_to_string(&canonical_file).await {
            Ok(css) if !css.is_empty() => Some(css),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    path = %canonical_file.display(),
                    error = %e,
                    "failed to read packaged asset"
                );
                None
            }
        }
    }
}
