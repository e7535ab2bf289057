//! Blocking wrapper around [`VersionRegistry`]
//!
//! Each call drives the async operation to completion on a private
//! current-thread runtime. Do not call these methods from inside another
//! tokio runtime; use the async registry there instead.

use std::io;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;

use crate::release::error::ReleaseError;
use crate::release::registry::VersionRegistry;
use crate::release::types::{ModuleDescriptor, Platform, ReleaseRecord};
use crate::release::version::{Channel, IntoVersion};

pub struct BlockingVersionRegistry {
    registry: Arc<VersionRegistry>,
    runtime: Runtime,
}

impl BlockingVersionRegistry {
    pub fn new(registry: Arc<VersionRegistry>) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { registry, runtime })
    }

    /// The async registry this wrapper drives
    pub fn registry(&self) -> &Arc<VersionRegistry> {
        &self.registry
    }

    pub fn get_all_versions(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ReleaseRecord>, ReleaseError> {
        self.runtime.block_on(self.registry.get_all_versions(cancel))
    }

    pub fn get_versions_by_channel(
        &self,
        channel: Channel,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ReleaseRecord>, ReleaseError> {
        self.runtime.block_on(self.registry.get_versions_by_channel(channel, cancel))
    }

    pub fn get_latest(
        &self,
        channel: Channel,
        cancel: Option<&CancellationToken>,
    ) -> Result<ReleaseRecord, ReleaseError> {
        self.runtime.block_on(self.registry.get_latest(channel, cancel))
    }

    pub fn get_version(
        &self,
        version: impl IntoVersion,
        cancel: Option<&CancellationToken>,
    ) -> Result<ReleaseRecord, ReleaseError> {
        self.runtime.block_on(self.registry.get_version(version, cancel))
    }

    pub fn get_change_set(
        &self,
        version: impl IntoVersion,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, ReleaseError> {
        self.runtime.block_on(self.registry.get_change_set(version, cancel))
    }

    pub fn get_modules(
        &self,
        version: impl IntoVersion,
        platform: Platform,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ModuleDescriptor>, ReleaseError> {
        self.runtime.block_on(self.registry.get_modules(version, platform, cancel))
    }

    pub fn flush(&self) -> Result<(), ReleaseError> {
        self.registry.flush()
    }
}
