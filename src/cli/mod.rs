//! Command-line front-end
//!
//! Presentation only: every command goes through the blocking registry and
//! renders the result as a table or JSON.

pub mod table;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::CliConfig;
use crate::release::fetchers::HttpFetcher;
use crate::release::{
    BlockingVersionRegistry, Channel, ModuleDescriptor, Platform, ReleaseError, VersionRegistry,
};

#[derive(Parser)]
#[command(name = "unity-versions")]
#[command(version, about = "Look up Unity editor releases, changesets and modules")]
pub struct Cli {
    /// Config file (defaults to ~/.config/unity-versions/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write logs to the default log file
    #[arg(long, global = true, conflicts_with = "log_file")]
    pub log: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List known releases, newest first
    List {
        /// Only show one channel (alpha, beta, release)
        #[arg(long)]
        channel: Option<Channel>,
        #[arg(long)]
        json: bool,
    },
    /// Show one release with its changeset
    Show {
        version: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the changeset of a release
    Changeset { version: String },
    /// List installable modules of a release
    Modules {
        version: String,
        /// Target platform (win, linux, osx); defaults to config or host
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        json: bool,
    },
    /// Show the latest release of a channel
    Latest {
        #[arg(long, default_value = "release")]
        channel: Channel,
    },
}

/// Error raised when a registry call fails; carries the status for the exit message
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {source}")]
pub struct CommandError {
    kind: String,
    #[source]
    source: ReleaseError,
}

impl From<ReleaseError> for CommandError {
    fn from(source: ReleaseError) -> Self {
        let kind = source
            .status()
            .map(|status| status.to_string())
            .unwrap_or_else(|| "InvalidVersion".to_string());
        Self { kind, source }
    }
}

/// Builds the registry the commands run against
pub fn build_registry(config: &CliConfig) -> Result<BlockingVersionRegistry> {
    let fetcher = HttpFetcher::new(Duration::from_millis(config.fetch_timeout_ms));
    let registry = Arc::new(VersionRegistry::new(Arc::new(fetcher)));
    BlockingVersionRegistry::new(registry).context("Failed to create async runtime")
}

/// Runs one command and returns its stdout text
pub fn run(
    command: Command,
    registry: &BlockingVersionRegistry,
    config: &CliConfig,
) -> Result<String> {
    match command {
        Command::List { channel, json } => {
            let records = match channel {
                Some(channel) => registry
                    .get_versions_by_channel(channel, None)
                    .map_err(CommandError::from)?,
                None => {
                    let mut records = registry.get_all_versions(None).map_err(CommandError::from)?;
                    records.sort_by(|a, b| b.version.cmp(&a.version));
                    records
                }
            };
            if json {
                return to_json(&records);
            }
            Ok(format!(
                "{}\n{} release(s)",
                table::releases_table(&records),
                records.len()
            ))
        }
        Command::Show { version, json } => {
            let record = registry
                .get_version(&version, None)
                .map_err(CommandError::from)?;
            if json {
                return to_json(&record);
            }
            Ok(table::releases_table(std::slice::from_ref(&record)))
        }
        Command::Changeset { version } => Ok(registry
            .get_change_set(&version, None)
            .map_err(CommandError::from)?),
        Command::Modules {
            version,
            platform,
            json,
        } => {
            let platform = platform.unwrap_or_else(|| config.platform());
            let modules: Vec<ModuleDescriptor> = registry
                .get_modules(&version, platform, None)
                .map_err(CommandError::from)?;
            if json {
                return to_json(&modules);
            }
            if modules.is_empty() {
                return Ok(format!("No modules for {} on {}", version, platform));
            }
            Ok(table::modules_table(&modules))
        }
        Command::Latest { channel } => {
            let record = registry
                .get_latest(channel, None)
                .map_err(CommandError::from)?;
            Ok(record.version.to_string())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
