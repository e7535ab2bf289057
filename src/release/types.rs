//! Common types for release records

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::release::version::UnityVersion;

/// Target platform of a module manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Code used in manifest file names (`unity-{code}.ini`)
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Linux => "linux",
            Platform::MacOs => "osx",
        }
    }

    /// Platform of the running host, falling back to Linux
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win" | "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "osx" | "mac" | "macos" => Ok(Platform::MacOs),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// An installable optional component of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
}

impl ModuleDescriptor {
    /// Builds a descriptor from a manifest section header such as `Mac-Mono`
    pub fn from_section(section: &str) -> Self {
        Self {
            id: section.to_lowercase(),
            name: section.replace('-', " "),
        }
    }
}

/// Cached metadata for one release
///
/// `changeset` and `modules` stay empty until they are requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    pub version: UnityVersion,
    pub release_date: NaiveDate,
    pub changeset: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: BTreeMap<Platform, Vec<ModuleDescriptor>>,
}

impl ReleaseRecord {
    pub fn new(version: UnityVersion, release_date: NaiveDate) -> Self {
        Self {
            version,
            release_date,
            changeset: None,
            modules: BTreeMap::new(),
        }
    }

    /// Module list fetched for `platform`, if any
    pub fn modules(&self, platform: Platform) -> Option<&[ModuleDescriptor]> {
        self.modules.get(&platform).map(Vec::as_slice)
    }
}
