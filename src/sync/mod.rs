//! The update pipeline: release check, download, transform.

mod fetch;
mod release;
pub mod transform;

pub use fetch::{DATABASE_ASSET_NAME, FetchRun, Fetcher, decode_database, progress_percent};
pub use release::{ReleaseChecker, ReleaseFeed};
pub use transform::{TransformedDatabase, sort_groups, transform};

use crate::error::{Error, Result};
use crate::types::TagDatabase;

/// Snapshot shipped with the binary so lookups work before the first download.
pub const FALLBACK_DATABASE: &str = include_str!("../../assets/fallback-db.json");

pub fn fallback_database() -> Result<TagDatabase> {
    serde_json::from_str(FALLBACK_DATABASE)
        .map_err(|e| Error::Parse(format!("bundled snapshot: {e}")))
}
