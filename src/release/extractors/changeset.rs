//! Changeset extraction from release detail pages

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::release::error::ReleaseError;
use crate::release::fetcher::PageFetcher;
use crate::release::upstream::UpstreamUrls;
use crate::release::version::UnityVersion;

/// Fetches the detail page of `version` and extracts its changeset
pub async fn fetch_changeset(
    fetcher: &dyn PageFetcher,
    urls: &UpstreamUrls,
    pattern: &Regex,
    version: &UnityVersion,
    cancel: Option<CancellationToken>,
) -> Result<String, ReleaseError> {
    let url = urls.detail_url(version);
    let page = fetcher.fetch(&url, cancel).await?;

    let Some(changeset) = pattern.captures(&page).and_then(|caps| caps.get(1)) else {
        warn!("No changeset found on {}", url);
        return Err(ReleaseError::RegexNoValue(format!(
            "no changeset on detail page of {}",
            version
        )));
    };

    debug!("Changeset of {} is {}", version, changeset.as_str());
    Ok(changeset.as_str().to_string())
}
