//! Extraction patterns for the upstream markup
//!
//! Every regex the extractors use lives here, so a change in the upstream
//! page layout means swapping a [`PatternTable`] rather than touching the
//! registry or the extractors.

use regex::Regex;

use crate::release::version::Channel;

/// Manifest lines containing one of these keys mark an installable module
pub const INSTALLER_KEYS: &[&str] = &[
    "WindowsEditorTargetInstaller",
    "MacEditorTargetInstaller",
    "LinuxEditorTargetInstaller",
];

/// Patterns for one channel listing page
#[derive(Debug, Clone)]
pub struct ListingPattern {
    /// First capture group is the release title
    pub title: Regex,
    /// First capture group is the release date, e.g. `April 20, 2022`
    pub date: Regex,
    /// Turns a captured title into version text
    pub title_to_version: fn(&str) -> String,
}

/// Full set of patterns for one upstream format
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub alpha: ListingPattern,
    pub beta: ListingPattern,
    pub release: ListingPattern,
    /// First capture group is the changeset on a detail page
    pub changeset: Regex,
    pub installer_keys: &'static [&'static str],
}

impl PatternTable {
    pub fn listing(&self, channel: Channel) -> &ListingPattern {
        match channel {
            Channel::Alpha => &self.alpha,
            Channel::Beta => &self.beta,
            Channel::Release => &self.release,
        }
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        // Alpha and beta pages share one layout
        let prerelease = ListingPattern {
            title: Regex::new(r#"<h4 class="release-title">\s*([^<]+?)\s*</h4>"#).unwrap(),
            date: Regex::new(r"Released:\s*([A-Z][a-z]+ \d{1,2}, \d{4})").unwrap(),
            title_to_version: |title| title.trim().to_string(),
        };

        Self {
            alpha: prerelease.clone(),
            beta: prerelease,
            release: ListingPattern {
                title: Regex::new(r#"<a href="[^"]*/whats-new/[^"]*">\s*(Unity [^<]+?)\s*</a>"#)
                    .unwrap(),
                date: Regex::new(
                    r#"<span class="release-date">\s*([A-Z][a-z]+ \d{1,2}, \d{4})\s*</span>"#,
                )
                .unwrap(),
                title_to_version: |title| {
                    title.trim().trim_start_matches("Unity").trim().to_string()
                },
            },
            changeset: Regex::new(r"unityhub://[0-9a-z.]+/([0-9a-f]{12})").unwrap(),
            installer_keys: INSTALLER_KEYS,
        }
    }
}
