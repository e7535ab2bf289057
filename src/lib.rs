//! Scraper and process-lifetime cache for Unity editor release metadata
//!
//! - [`release`]: version parsing, page extraction and the caching registry
//! - [`cli`]: command-line front-end
//! - [`config`]: constants and CLI configuration
//! - [`logging`]: tracing subscriber setup

pub mod cli;
pub mod config;
pub mod logging;
pub mod release;
