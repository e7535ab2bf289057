//! Process-lifetime cache of Unity releases
//!
//! The registry is filled from the three channel listings on first use and
//! fills each record's changeset and module lists only when they are asked
//! for. Failures are never cached: a failed enumeration leaves the map empty
//! and a failed lazy fill leaves the field empty, so the next call retries.
//!
//! # Locking
//!
//! One `RwLock` guards the whole map. It is never held across a fetch: a
//! lookup takes the lock, releases it, fetches, then takes the write lock to
//! store the result. The enumeration merge and every field fill happen in a
//! single write-locked step, so readers never see a partial map or record.
//! Concurrent fills of the same field are last-write-wins.

use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::release::error::ReleaseError;
use crate::release::extractors::{fetch_changeset, fetch_modules, fetch_release_list};
use crate::release::fetcher::PageFetcher;
use crate::release::fetchers::HttpFetcher;
use crate::release::patterns::PatternTable;
use crate::release::types::{ModuleDescriptor, Platform, ReleaseRecord};
use crate::release::upstream::UpstreamUrls;
use crate::release::version::{Channel, IntoVersion, UnityVersion};

type ReleaseMap = IndexMap<UnityVersion, ReleaseRecord>;

pub struct VersionRegistry {
    fetcher: Arc<dyn PageFetcher>,
    urls: UpstreamUrls,
    patterns: PatternTable,
    releases: RwLock<ReleaseMap>,
}

impl VersionRegistry {
    /// Creates an empty registry reading the default upstream pages
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_urls(fetcher, UpstreamUrls::default())
    }

    /// Creates an empty registry reading pages from custom locations
    pub fn with_urls(fetcher: Arc<dyn PageFetcher>, urls: UpstreamUrls) -> Self {
        Self {
            fetcher,
            urls,
            patterns: PatternTable::default(),
            releases: RwLock::new(IndexMap::new()),
        }
    }

    /// Replaces the extraction patterns, e.g. after an upstream redesign
    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    /// Shared default registry backed by [`HttpFetcher`]
    pub fn global() -> &'static VersionRegistry {
        static GLOBAL: OnceLock<VersionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| VersionRegistry::new(Arc::new(HttpFetcher::default())))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ReleaseMap>, ReleaseError> {
        self.releases.read().map_err(|_| ReleaseError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ReleaseMap>, ReleaseError> {
        self.releases.write().map_err(|_| ReleaseError::LockPoisoned)
    }

    /// Returns every known release, enumerating the listings if the cache is empty
    ///
    /// The records are copies: changesets and modules filled in later are not
    /// visible in a list already returned.
    ///
    /// Channels are fetched one after another in alpha, beta, release order;
    /// the first failure aborts the call and nothing is stored.
    pub async fn get_all_versions(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ReleaseRecord>, ReleaseError> {
        self.ensure_populated(cancel).await?;
        Ok(self.read()?.values().cloned().collect())
    }

    /// Returns the releases of one channel, newest first
    pub async fn get_versions_by_channel(
        &self,
        channel: Channel,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ReleaseRecord>, ReleaseError> {
        let mut records: Vec<ReleaseRecord> = self
            .get_all_versions(cancel)
            .await?
            .into_iter()
            .filter(|record| record.version.channel() == channel)
            .collect();
        records.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(records)
    }

    /// Returns the highest release of a channel
    pub async fn get_latest(
        &self,
        channel: Channel,
        cancel: Option<&CancellationToken>,
    ) -> Result<ReleaseRecord, ReleaseError> {
        self.get_versions_by_channel(channel, cancel)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReleaseError::NotFound(format!("no {} releases", channel)))
    }

    /// Returns one release with its changeset filled in
    pub async fn get_version(
        &self,
        version: impl IntoVersion,
        cancel: Option<&CancellationToken>,
    ) -> Result<ReleaseRecord, ReleaseError> {
        let version = version.into_version()?;
        self.ensure_populated(cancel).await?;
        self.get_change_set(version, cancel).await?;

        self.read()?
            .get(&version)
            .cloned()
            .ok_or_else(|| ReleaseError::NotFound(version.to_string()))
    }

    /// Returns the changeset of a release, fetching it only on first request
    pub async fn get_change_set(
        &self,
        version: impl IntoVersion,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, ReleaseError> {
        let version = version.into_version()?;
        self.ensure_populated(cancel).await?;

        let cached = {
            let releases = self.read()?;
            let record = releases
                .get(&version)
                .ok_or_else(|| ReleaseError::NotFound(version.to_string()))?;
            record.changeset.clone()
        };
        if let Some(changeset) = cached {
            debug!("Changeset of {} served from cache", version);
            return Ok(changeset);
        }

        let changeset = fetch_changeset(
            self.fetcher.as_ref(),
            &self.urls,
            &self.patterns.changeset,
            &version,
            cancel.cloned(),
        )
        .await?;

        if let Some(record) = self.write()?.get_mut(&version) {
            record.changeset = Some(changeset.clone());
        }
        Ok(changeset)
    }

    /// Returns the installable modules of a release for a platform
    ///
    /// Module lists are cached per platform; the changeset is fetched first
    /// when it is not cached yet.
    pub async fn get_modules(
        &self,
        version: impl IntoVersion,
        platform: Platform,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ModuleDescriptor>, ReleaseError> {
        let version = version.into_version()?;
        self.ensure_populated(cancel).await?;

        let cached = {
            let releases = self.read()?;
            let record = releases
                .get(&version)
                .ok_or_else(|| ReleaseError::NotFound(version.to_string()))?;
            record.modules(platform).map(<[ModuleDescriptor]>::to_vec)
        };
        if let Some(modules) = cached {
            debug!("Modules of {} ({}) served from cache", version, platform);
            return Ok(modules);
        }

        let changeset = self.get_change_set(version, cancel).await?;
        let modules = fetch_modules(
            self.fetcher.as_ref(),
            &self.urls,
            self.patterns.installer_keys,
            &changeset,
            platform,
            cancel.cloned(),
        )
        .await?;

        if let Some(record) = self.write()?.get_mut(&version) {
            record.modules.insert(platform, modules.clone());
        }
        Ok(modules)
    }

    /// Drops every cached release, changeset and module list
    pub fn flush(&self) -> Result<(), ReleaseError> {
        let mut releases = self.write()?;
        info!("Flushing {} cached releases", releases.len());
        releases.clear();
        Ok(())
    }

    async fn ensure_populated(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), ReleaseError> {
        let populated = !self.read()?.is_empty();
        if populated {
            return Ok(());
        }

        let mut fetched = Vec::new();
        for channel in Channel::LISTING_ORDER {
            let records = fetch_release_list(
                self.fetcher.as_ref(),
                self.urls.list_url(channel),
                self.patterns.listing(channel),
                cancel.cloned(),
            )
            .await?;
            fetched.extend(records);
        }

        let mut releases = self.write()?;
        for record in fetched {
            releases.entry(record.version).or_insert(record);
        }
        info!("Release cache populated with {} versions", releases.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::error::{FetchError, ResultStatus, VersionParseError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SITE: &str = "http://upstream.test";

    const RELEASE_PAGE: &str = r#"
        <a href="/releases/editor/whats-new/2020.3.34">Unity 2020.3.34</a>
        <span class="release-date">April 20, 2022</span>
        <a href="/releases/editor/whats-new/2021.3.1">Unity 2021.3.1</a>
        <span class="release-date">May 5, 2022</span>
    "#;

    const ALPHA_PAGE: &str = r#"
        <h4 class="release-title">2023.1.0a14</h4>
        <p>Released: October 5, 2022</p>
    "#;

    const BETA_PAGE: &str = r#"
        <h4 class="release-title">2022.2.0b9</h4>
        <p>Released: September 21, 2022</p>
        <h4 class="release-title">2022.2.0b10</h4>
        <p>Released: September 28, 2022</p>
    "#;

    const MANIFEST: &str = "[Mac-Mono]\nurl=MacEditorTargetInstaller/mono.pkg\n[Android]\nurl=MacEditorTargetInstaller/android.pkg\n";

    /// Serves canned pages and counts requests per URL
    struct FakeFetcher {
        pages: Mutex<HashMap<String, Result<String, ()>>>,
        hits: Mutex<HashMap<String, usize>>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            let fetcher = Self {
                pages: Mutex::new(HashMap::new()),
                hits: Mutex::new(HashMap::new()),
            };
            fetcher.serve("/releases/editor/archive", RELEASE_PAGE);
            fetcher.serve("/releases/editor/alpha", ALPHA_PAGE);
            fetcher.serve("/releases/editor/beta", BETA_PAGE);
            fetcher.serve(
                "/releases/editor/whats-new/2020.3.34",
                r#"<a href="unityhub://2020.3.34f1/9a4c9c70452b">Hub</a>"#,
            );
            fetcher.serve(
                "/releases/editor/beta/2022.2.0b9",
                r#"<a href="unityhub://2022.2.0b9/3b2ed4bd4f0b">Hub</a>"#,
            );
            fetcher.serve("/download_unity/9a4c9c70452b/unity-osx.ini", MANIFEST);
            fetcher
        }

        fn serve(&self, path: &str, body: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(format!("{}{}", SITE, path), Ok(body.to_string()));
        }

        fn fail(&self, path: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(format!("{}{}", SITE, path), Err(()));
        }

        fn hits(&self, path: &str) -> usize {
            let url = format!("{}{}", SITE, path);
            self.hits.lock().unwrap().get(&url).copied().unwrap_or(0)
        }
    }

    #[async_trait::async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(
            &self,
            url: &str,
            _cancel: Option<CancellationToken>,
        ) -> Result<String, FetchError> {
            *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
            match self.pages.lock().unwrap().get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(())) => Err(FetchError::Transport("connection reset".to_string())),
                None => Err(FetchError::NotFound(url.to_string())),
            }
        }
    }

    fn registry() -> (Arc<FakeFetcher>, VersionRegistry) {
        let fetcher = Arc::new(FakeFetcher::new());
        let registry = VersionRegistry::with_urls(fetcher.clone(), UpstreamUrls::with_base(SITE));
        (fetcher, registry)
    }

    #[tokio::test]
    async fn get_all_versions_merges_all_channels() {
        let (fetcher, registry) = registry();

        let records = registry.get_all_versions(None).await.unwrap();

        let mut versions: Vec<String> = records.iter().map(|r| r.version.to_string()).collect();
        versions.sort();
        assert_eq!(
            versions,
            vec!["2020.3.34", "2021.3.1", "2022.2.0b10", "2022.2.0b9", "2023.1.0a14"]
        );
        assert_eq!(fetcher.hits("/releases/editor/alpha"), 1);
        assert_eq!(fetcher.hits("/releases/editor/beta"), 1);
        assert_eq!(fetcher.hits("/releases/editor/archive"), 1);
    }

    #[test]
    fn global_returns_one_shared_empty_registry() {
        let first = VersionRegistry::global();
        let second = VersionRegistry::global();

        assert!(std::ptr::eq(first, second));
        assert!(first.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_all_versions_returns_records_unaffected_by_later_fills() {
        let (_fetcher, registry) = registry();

        let snapshot = registry.get_all_versions(None).await.unwrap();
        registry.get_change_set("2020.3.34", None).await.unwrap();

        let before = snapshot
            .iter()
            .find(|r| r.version.to_string() == "2020.3.34")
            .unwrap();
        assert_eq!(before.changeset, None);
        let after = registry.get_version("2020.3.34", None).await.unwrap();
        assert_eq!(after.changeset.as_deref(), Some("9a4c9c70452b"));
    }

    #[tokio::test]
    async fn get_all_versions_enumerates_only_once() {
        let (fetcher, registry) = registry();

        registry.get_all_versions(None).await.unwrap();
        registry.get_all_versions(None).await.unwrap();

        assert_eq!(fetcher.hits("/releases/editor/archive"), 1);
    }

    #[tokio::test]
    async fn get_all_versions_leaves_cache_empty_when_a_channel_fails() {
        let (fetcher, registry) = registry();
        fetcher.serve("/releases/editor/archive", "<html>redesigned</html>");

        let result = registry.get_all_versions(None).await;

        assert_eq!(ResultStatus::of(&result), Some(ResultStatus::RegexNoValue));
        assert!(registry.read().unwrap().is_empty());

        // Next call retries every channel
        fetcher.serve("/releases/editor/archive", RELEASE_PAGE);
        let records = registry.get_all_versions(None).await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(fetcher.hits("/releases/editor/alpha"), 2);
    }

    #[tokio::test]
    async fn get_all_versions_stops_at_first_failing_channel() {
        let (fetcher, registry) = registry();
        fetcher.fail("/releases/editor/alpha");

        let result = registry.get_all_versions(None).await;

        assert!(matches!(result, Err(ReleaseError::Http(_))));
        assert_eq!(fetcher.hits("/releases/editor/beta"), 0);
        assert_eq!(fetcher.hits("/releases/editor/archive"), 0);
    }

    #[tokio::test]
    async fn get_change_set_is_fetched_once() {
        let (fetcher, registry) = registry();

        let first = registry.get_change_set("2020.3.34", None).await.unwrap();
        let second = registry.get_change_set("2020.3.34", None).await.unwrap();

        assert_eq!(first, "9a4c9c70452b");
        assert_eq!(second, first);
        assert_eq!(fetcher.hits("/releases/editor/whats-new/2020.3.34"), 1);
    }

    #[tokio::test]
    async fn get_change_set_returns_not_found_for_unlisted_version() {
        let (fetcher, registry) = registry();

        let result = registry.get_change_set("2019.4.40", None).await;

        assert!(matches!(result, Err(ReleaseError::NotFound(_))));
        assert_eq!(fetcher.hits("/releases/editor/whats-new/2019.4.40"), 0);
    }

    #[tokio::test]
    async fn get_change_set_does_not_cache_failures() {
        let (fetcher, registry) = registry();
        fetcher.fail("/releases/editor/whats-new/2021.3.1");

        let result = registry.get_change_set("2021.3.1", None).await;
        assert!(matches!(result, Err(ReleaseError::Http(_))));

        fetcher.serve(
            "/releases/editor/whats-new/2021.3.1",
            r#"<a href="unityhub://2021.3.1f1/fb119bb0b476">Hub</a>"#,
        );
        let changeset = registry.get_change_set("2021.3.1", None).await.unwrap();

        assert_eq!(changeset, "fb119bb0b476");
        assert_eq!(fetcher.hits("/releases/editor/whats-new/2021.3.1"), 2);
    }

    #[tokio::test]
    async fn get_change_set_rejects_malformed_version_text() {
        let (fetcher, registry) = registry();

        let result = registry.get_change_set("1.2", None).await;

        assert!(matches!(
            result,
            Err(ReleaseError::InvalidVersion(VersionParseError::Format(_)))
        ));
        assert_eq!(fetcher.hits("/releases/editor/archive"), 0);
    }

    #[tokio::test]
    async fn get_version_fills_changeset() {
        let (_fetcher, registry) = registry();

        let record = registry.get_version("2022.2.0b9", None).await.unwrap();

        assert_eq!(record.version.to_string(), "2022.2.0b9");
        assert_eq!(record.changeset.as_deref(), Some("3b2ed4bd4f0b"));
    }

    #[tokio::test]
    async fn get_version_accepts_prebuilt_identifier() {
        let (_fetcher, registry) = registry();

        let record = registry
            .get_version(UnityVersion::release(2020, 3, 34), None)
            .await
            .unwrap();

        assert_eq!(record.changeset.as_deref(), Some("9a4c9c70452b"));
    }

    #[tokio::test]
    async fn get_version_propagates_changeset_failure() {
        let (_fetcher, registry) = registry();

        // 2023.1.0a14 has no detail page in the fake
        let result = registry.get_version("2023.1.0a14", None).await;

        assert_eq!(ResultStatus::of(&result), Some(ResultStatus::NotFound));
    }

    #[tokio::test]
    async fn get_modules_after_cached_changeset_fetches_only_manifest() {
        let (fetcher, registry) = registry();
        registry.get_change_set("2020.3.34", None).await.unwrap();

        let modules = registry
            .get_modules("2020.3.34", Platform::MacOs, None)
            .await
            .unwrap();

        assert_eq!(
            modules,
            vec![
                ModuleDescriptor::from_section("Mac-Mono"),
                ModuleDescriptor::from_section("Android"),
            ]
        );
        assert_eq!(fetcher.hits("/releases/editor/whats-new/2020.3.34"), 1);
        assert_eq!(fetcher.hits("/download_unity/9a4c9c70452b/unity-osx.ini"), 1);
    }

    #[tokio::test]
    async fn get_modules_is_cached_per_platform() {
        let (fetcher, registry) = registry();

        registry
            .get_modules("2020.3.34", Platform::MacOs, None)
            .await
            .unwrap();
        registry
            .get_modules("2020.3.34", Platform::MacOs, None)
            .await
            .unwrap();
        let linux = registry
            .get_modules("2020.3.34", Platform::Linux, None)
            .await;

        assert_eq!(fetcher.hits("/download_unity/9a4c9c70452b/unity-osx.ini"), 1);
        assert!(matches!(linux, Err(ReleaseError::NotFound(_))));
        assert_eq!(fetcher.hits("/download_unity/9a4c9c70452b/unity-linux.ini"), 1);
    }

    #[tokio::test]
    async fn flush_forces_full_refetch() {
        let (fetcher, registry) = registry();
        registry.get_change_set("2020.3.34", None).await.unwrap();

        registry.flush().unwrap();
        registry.get_change_set("2020.3.34", None).await.unwrap();

        assert_eq!(fetcher.hits("/releases/editor/alpha"), 2);
        assert_eq!(fetcher.hits("/releases/editor/beta"), 2);
        assert_eq!(fetcher.hits("/releases/editor/archive"), 2);
        assert_eq!(fetcher.hits("/releases/editor/whats-new/2020.3.34"), 2);
    }

    #[tokio::test]
    async fn get_versions_by_channel_sorts_newest_first() {
        let (_fetcher, registry) = registry();

        let betas = registry
            .get_versions_by_channel(Channel::Beta, None)
            .await
            .unwrap();

        let versions: Vec<String> = betas.iter().map(|r| r.version.to_string()).collect();
        assert_eq!(versions, vec!["2022.2.0b10", "2022.2.0b9"]);
    }

    #[tokio::test]
    async fn get_latest_returns_highest_release() {
        let (_fetcher, registry) = registry();

        let latest = registry.get_latest(Channel::Release, None).await.unwrap();

        assert_eq!(latest.version, UnityVersion::release(2021, 3, 1));
    }

    #[tokio::test]
    async fn concurrent_lookups_observe_complete_records() {
        let (_fetcher, registry) = registry();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.get_version("2020.3.34", None).await })
            })
            .collect();

        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            assert_eq!(record.changeset.as_deref(), Some("9a4c9c70452b"));
        }
        assert_eq!(registry.get_all_versions(None).await.unwrap().len(), 5);
    }
}
