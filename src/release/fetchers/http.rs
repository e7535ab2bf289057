//! reqwest-based page fetcher

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT_MS, USER_AGENT};
use crate::release::error::FetchError;
use crate::release::fetcher::PageFetcher;

/// Fetches pages over HTTP with a per-request deadline
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher whose uncancellable fetches give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            timeout,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            warn!("Upstream returned status {}: {}", status, url);
            return Err(FetchError::Unknown(format!("Unexpected status: {}", status)));
        }

        response.text().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", url, e);
            FetchError::Transport(e.to_string())
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(FETCH_TIMEOUT_MS))
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        cancel: Option<CancellationToken>,
    ) -> Result<String, FetchError> {
        debug!("Fetching {}", url);

        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(FetchError::Cancelled),
                    result = self.get_text(url) => result,
                }
            }
            None => tokio::time::timeout(self.timeout, self.get_text(url))
                .await
                .map_err(|_| FetchError::Timeout(self.timeout))?,
        }
    }
}
