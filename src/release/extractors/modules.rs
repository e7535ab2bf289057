//! Module manifest extraction
//!
//! Manifests are INI-like files with one section per component:
//!
//! ```text
//! [Android]
//! title=Android Build Support
//! url=MacEditorTargetInstaller/UnitySetup-Android-Support-for-Editor-2020.3.34f1.pkg
//! ```

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::release::error::ReleaseError;
use crate::release::fetcher::PageFetcher;
use crate::release::types::{ModuleDescriptor, Platform};
use crate::release::upstream::UpstreamUrls;

/// Extracts installable modules from manifest text
///
/// Every line containing an installer key yields a module named after the
/// most recent section header.
pub fn parse_manifest(manifest: &str, installer_keys: &[&str]) -> Vec<ModuleDescriptor> {
    let mut modules = Vec::new();
    let mut section: Option<&str> = None;

    for line in manifest.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            section = Some(header.split(']').next().unwrap_or(header));
            continue;
        }

        if let Some(current) = section
            && installer_keys.iter().any(|key| trimmed.contains(key))
        {
            modules.push(ModuleDescriptor::from_section(current));
        }
    }

    modules
}

/// Fetches the manifest of a build for a platform and extracts its modules
pub async fn fetch_modules(
    fetcher: &dyn PageFetcher,
    urls: &UpstreamUrls,
    installer_keys: &[&str],
    changeset: &str,
    platform: Platform,
    cancel: Option<CancellationToken>,
) -> Result<Vec<ModuleDescriptor>, ReleaseError> {
    let url = urls.manifest_url(changeset, platform);
    let manifest = fetcher.fetch(&url, cancel).await?;
    let modules = parse_manifest(&manifest, installer_keys);
    debug!("Found {} modules in {}", modules.len(), url);
    Ok(modules)
}
