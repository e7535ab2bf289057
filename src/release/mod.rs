//! Release metadata layer for Unity editor versions
//!
//! This module scrapes the public release pages, parses them into typed
//! records and caches the results for the lifetime of the process.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│ Extractors  │────▶│   Fetcher   │
//! │  (cache)    │     │ (patterns)  │     │   (HTTP)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Version   │
//! │ (parse/ord) │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Process-lifetime cache with lazy changeset/module fill
//! - [`blocking`]: Blocking wrapper over the async registry
//! - [`extractors`]: Listing, changeset and module manifest extraction
//! - [`patterns`]: Declarative extraction patterns for the upstream markup
//! - [`fetcher`]: Page fetcher trait
//! - [`fetchers`]: HTTP page fetcher
//! - [`upstream`]: Upstream page URLs
//! - [`version`]: Version identifier parsing, formatting and ordering
//! - [`types`]: Release records, modules and platforms
//! - [`error`]: Error types and the result status envelope

pub mod blocking;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod fetchers;
pub mod patterns;
pub mod registry;
pub mod types;
pub mod upstream;
pub mod version;

pub use blocking::BlockingVersionRegistry;
pub use error::{FetchError, ReleaseError, ResultStatus, VersionParseError};
pub use registry::VersionRegistry;
pub use types::{ModuleDescriptor, Platform, ReleaseRecord};
pub use version::{Channel, IntoVersion, UnityVersion};
