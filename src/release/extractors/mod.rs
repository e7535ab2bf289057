//! Extractors turning upstream pages into typed release data

pub mod changeset;
pub mod modules;
pub mod release_list;

pub use changeset::fetch_changeset;
pub use modules::{fetch_modules, parse_manifest};
pub use release_list::{extract_releases, fetch_release_list};
