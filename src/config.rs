use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::release::types::Platform;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Deadline for a single page fetch in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// User agent sent with every upstream request
pub const USER_AGENT: &str = concat!("unity-versions/", env!("CARGO_PKG_VERSION"));

/// Default log filter when neither config nor RUST_LOG set one
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Command-line tool configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Per-fetch deadline in milliseconds
    pub fetch_timeout_ms: u64,
    /// Platform used by `modules` when `--platform` is omitted
    pub default_platform: Option<String>,
    /// tracing filter directive, e.g. `unity_versions=debug`
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            default_platform: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CliConfig {
    /// Loads the config from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the default config file, or defaults when it does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Platform configured for `modules`, falling back to the host platform
    pub fn platform(&self) -> Platform {
        self.default_platform
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(Platform::current)
    }
}

/// Returns the path to the config file.
/// Uses $XDG_CONFIG_HOME/unity-versions/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/unity-versions/config.json.
pub fn config_path() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
    .join("config.json")
}

/// Returns the path to the log file.
/// Uses $XDG_DATA_HOME/unity-versions if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/unity-versions.
pub fn log_path() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
    .join("unity-versions.log")
}

fn app_dir_with_env(
    xdg_dir: Option<String>,
    home_dir: Option<PathBuf>,
    home_relative: &str,
) -> PathBuf {
    let base = xdg_dir
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("unity-versions")
}
