//! `reqwest`-backed remote source.

use std::time::Duration;

use async_trait::async_trait;
use lumen_common::FetchError;
use lumen_config::RemoteConfig;
use tracing::debug;

use crate::source::{DirEntry, RemoteSource};

/// Talks to a GitHub-style contents API and raw file host.
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: &RemoteConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, FetchError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn list_dir(&self, url: &str) -> Result<Vec<DirEntry>, FetchError> {
        let response = self.get(url, "application/vnd.github+json").await?;
        response
            .json::<Vec<DirEntry>>()
            .await
            .map_err(|e| FetchError::Parse(format!("{url}: {e}")))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, "text/css,*/*;q=0.1").await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("{url}: {e}")))
    }
}
