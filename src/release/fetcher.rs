//! Page fetcher trait for retrieving upstream pages

#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::release::error::FetchError;

/// Trait for fetching the raw text of an upstream page
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the body of `url` as text
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the page
    /// * `cancel` - Aborts the fetch when triggered; without one the
    ///   implementation applies its own deadline
    ///
    /// # Returns
    /// * `Ok(String)` - Body of a successful response
    /// * `Err(FetchError)` - Classified failure (not found, transport, unknown)
    async fn fetch(
        &self,
        url: &str,
        cancel: Option<CancellationToken>,
    ) -> Result<String, FetchError>;
}
