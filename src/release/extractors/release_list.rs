//! Release listing extraction
//!
//! Turns one channel listing page into release records. Titles and dates are
//! matched independently and paired by position, so both patterns must match
//! the same number of times.

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::release::error::ReleaseError;
use crate::release::fetcher::PageFetcher;
use crate::release::patterns::ListingPattern;
use crate::release::types::ReleaseRecord;
use crate::release::version::UnityVersion;

/// Accepted date layouts, tried in order
const DATE_FORMATS: [&str; 2] = ["%B %d, %Y", "%B %-d, %Y"];

/// Extracts every release record from a listing page
///
/// Fails with `RegexNoValue` when either pattern finds nothing, when the
/// counts differ, or when any single title or date does not parse.
pub fn extract_releases(
    page: &str,
    pattern: &ListingPattern,
) -> Result<Vec<ReleaseRecord>, ReleaseError> {
    let titles: Vec<&str> = capture_all(&pattern.title, page);
    let dates: Vec<&str> = capture_all(&pattern.date, page);

    if titles.is_empty() || dates.is_empty() || titles.len() != dates.len() {
        warn!(
            "Listing page matched {} titles and {} dates",
            titles.len(),
            dates.len()
        );
        return Err(ReleaseError::RegexNoValue(format!(
            "matched {} titles and {} dates",
            titles.len(),
            dates.len()
        )));
    }

    titles
        .into_iter()
        .zip(dates)
        .map(|(title, date)| -> Result<ReleaseRecord, ReleaseError> {
            let version_text = (pattern.title_to_version)(title);
            let version: UnityVersion = version_text.parse().map_err(|e| {
                ReleaseError::RegexNoValue(format!("title '{}': {}", title, e))
            })?;
            Ok(ReleaseRecord::new(version, parse_release_date(date)?))
        })
        .collect()
}

/// Fetches a listing page and extracts its records
pub async fn fetch_release_list(
    fetcher: &dyn PageFetcher,
    url: &str,
    pattern: &ListingPattern,
    cancel: Option<CancellationToken>,
) -> Result<Vec<ReleaseRecord>, ReleaseError> {
    let page = fetcher.fetch(url, cancel).await?;
    let records = extract_releases(&page, pattern)?;
    debug!("Extracted {} releases from {}", records.len(), url);
    Ok(records)
}

fn capture_all<'a>(regex: &regex::Regex, page: &'a str) -> Vec<&'a str> {
    regex
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn parse_release_date(text: &str) -> Result<NaiveDate, ReleaseError> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
        .ok_or_else(|| ReleaseError::RegexNoValue(format!("unparseable date '{}'", text)))
}
