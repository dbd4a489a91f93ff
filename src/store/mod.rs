mod schema;
mod snapshot;
mod sqlite;

pub use snapshot::{
    PersistedSnapshot, SnapshotMeta, keys, load_database, load_lookup, load_meta, load_sha,
    load_tag_list,
};
pub use sqlite::SqliteStore;

use crate::error::Result;

/// Store defines the durable key-value interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes every entry or none of them.
    fn put_all(&self, entries: &[(&str, String)]) -> Result<()>;
}
