//! Upstream page locations

use crate::release::types::Platform;
use crate::release::version::{Channel, UnityVersion};

const DEFAULT_SITE_URL: &str = "https://unity.com";
const DEFAULT_DOWNLOAD_URL: &str = "https://download.unity3d.com";

/// URLs of every upstream page the scraper reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub release_list: String,
    pub alpha_list: String,
    pub beta_list: String,
    pub release_detail: String,
    pub alpha_detail: String,
    pub beta_detail: String,
    pub download_base: String,
}

impl UpstreamUrls {
    /// Creates the upstream layout rooted at custom site and download hosts
    pub fn new(site_url: &str, download_url: &str) -> Self {
        let site = site_url.trim_end_matches('/');
        let download = download_url.trim_end_matches('/');
        Self {
            release_list: format!("{}/releases/editor/archive", site),
            alpha_list: format!("{}/releases/editor/alpha", site),
            beta_list: format!("{}/releases/editor/beta", site),
            release_detail: format!("{}/releases/editor/whats-new", site),
            alpha_detail: format!("{}/releases/editor/alpha", site),
            beta_detail: format!("{}/releases/editor/beta", site),
            download_base: format!("{}/download_unity", download),
        }
    }

    /// Serves every page from a single host
    pub fn with_base(base_url: &str) -> Self {
        Self::new(base_url, base_url)
    }

    /// Listing page of a channel
    pub fn list_url(&self, channel: Channel) -> &str {
        match channel {
            Channel::Alpha => &self.alpha_list,
            Channel::Beta => &self.beta_list,
            Channel::Release => &self.release_list,
        }
    }

    /// Detail page of a version, chosen by its channel
    pub fn detail_url(&self, version: &UnityVersion) -> String {
        let prefix = match version.channel() {
            Channel::Alpha => &self.alpha_detail,
            Channel::Beta => &self.beta_detail,
            Channel::Release => &self.release_detail,
        };
        format!("{}/{}", prefix, version)
    }

    /// Module manifest of a build for a platform
    pub fn manifest_url(&self, changeset: &str, platform: Platform) -> String {
        format!(
            "{}/{}/unity-{}.ini",
            self.download_base,
            changeset,
            platform.code()
        )
    }
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL, DEFAULT_DOWNLOAD_URL)
    }
}
