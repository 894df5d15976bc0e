//! GitHub-backed snapshot source.
//!
//! Directory listings come from the contents API, file bodies from the raw
//! content host.

use super::SnapshotSource;
use crate::config::SourceConfig;
use crate::error::{Result, SyncError};
use crate::models::RemoteEntry;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::debug;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Reads a repository through the GitHub HTTP endpoints.
pub struct GithubSource {
    http_client: reqwest::Client,
    api_base: String,
    raw_base: String,
    repository: String,
    branch: String,
}

impl GithubSource {
    /// Build a client from the source settings.
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("API token contains invalid header characters")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            raw_base: config.raw_base.trim_end_matches('/').to_string(),
            repository: config.repository.trim_matches('/').to_string(),
            branch: config.branch.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base,
            self.repository,
            path.trim_matches('/')
        )
    }

    async fn get(&self, url: &str, accept: Option<&'static str>) -> Result<reqwest::Response> {
        let mut request = self.http_client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await.map_err(|e| SyncError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteAccess {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl SnapshotSource for GithubSource {
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let url = self.contents_url(path);
        debug!("Listing {}", url);

        let response = self.get(&url, Some(GITHUB_JSON)).await?;
        let entries: Vec<RemoteEntry> =
            response.json().await.map_err(|e| SyncError::Decode {
                url: url.clone(),
                source: e,
            })?;

        debug!("{} entries under {}", entries.len(), path);
        Ok(entries)
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.raw_base,
            self.repository,
            self.branch,
            path.trim_matches('/')
        )
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.get(url, None).await?;
        response.text().await.map_err(|e| SyncError::Transport {
            url: url.to_string(),
            source: e,
        })
    }
}
