//! The network seam used by the catalog fetcher and the downloader.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lumen_common::FetchError;
use serde::{Deserialize, Serialize};

/// Kind of a repository-contents entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One descriptor of a repository-contents listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// API URL listing this entry's own contents.
    pub url: String,
}

impl DirEntry {
    pub fn dir(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
            url: url.into(),
        }
    }

    pub fn file(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            url: url.into(),
        }
    }
}

#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch and parse a contents listing.
    async fn list_dir(&self, url: &str) -> Result<Vec<DirEntry>, FetchError>;

    /// Fetch a raw file body. Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
enum StaticResponse {
    Listing(Vec<DirEntry>),
    Body(String),
    Status(u16),
    Offline,
}

/// A fixed set of responses keyed by URL.
///
/// Serves offline mirrors and tests. Unknown URLs answer HTTP 404. Every
/// request is recorded in order.
#[derive(Default)]
pub struct StaticSource {
    responses: HashMap<String, StaticResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, url: impl Into<String>, entries: Vec<DirEntry>) -> Self {
        self.responses
            .insert(url.into(), StaticResponse::Listing(entries));
        self
    }

    pub fn with_file(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), StaticResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(url.into(), StaticResponse::Status(status));
        self
    }

    /// Make `url` fail as if the host were unreachable.
    pub fn with_offline(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), StaticResponse::Offline);
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn respond(&self, url: &str) -> Result<StaticResponse, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.responses.get(url) {
            Some(StaticResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(StaticResponse::Offline) => {
                Err(FetchError::Network(format!("{url}: host unreachable")))
            }
            Some(response) => Ok(response.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl RemoteSource for StaticSource {
    async fn list_dir(&self, url: &str) -> Result<Vec<DirEntry>, FetchError> {
        match self.respond(url)? {
            StaticResponse::Listing(entries) => Ok(entries),
            StaticResponse::Body(body) => serde_json::from_str(&body)
                .map_err(|e| FetchError::Parse(format!("{url}: {e}"))),
            _ => Err(FetchError::Parse(format!("{url}: not a listing"))),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        match self.respond(url)? {
            StaticResponse::Body(body) => Ok(body),
            StaticResponse::Listing(entries) => serde_json::to_string(&entries)
                .map_err(|e| FetchError::Parse(e.to_string())),
            _ => Err(FetchError::Parse(format!("{url}: no body"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_entry_parses_contents_api_json() {
        let json = r#"[
            {"name": "forest-mist", "path": "themes/forest-mist", "type": "dir",
             "url": "https://api.example.com/contents/themes/forest-mist"},
            {"name": "README.md", "type": "file", "url": "https://api.example.com/readme"},
            {"name": "link", "type": "symlink", "url": "https://api.example.com/link"}
        ]"#;
        let entries: Vec<DirEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[tokio::test]
    async fn static_source_serves_and_records() {
        let source = StaticSource::new()
            .with_file("https://raw/a.css", "body { margin: 0; }")
            .with_status("https://raw/b.css", 500)
            .with_offline("https://raw/c.css");

        assert_eq!(
            source.fetch_text("https://raw/a.css").await.unwrap(),
            "body { margin: 0; }"
        );
        assert!(matches!(
            source.fetch_text("https://raw/b.css").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            source.fetch_text("https://raw/c.css").await,
            Err(FetchError::Network(_))
        ));
        assert!(matches!(
            source.fetch_text("https://raw/missing.css").await,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(source.requests().len(), 4);
    }
}
