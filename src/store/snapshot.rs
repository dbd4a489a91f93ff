use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Store;
use crate::error::Result;
use crate::types::{NameLookupTable, TagDatabase, TagListEntry};

/// Storage keys shared with the other extension surfaces.
pub mod keys {
    pub const TAG_DB: &str = "tagDB";
    pub const TAG_LIST: &str = "tagList";
    pub const TAG_REPLACE_DATA: &str = "tagReplaceData";
    pub const UPDATE_TIME: &str = "updateTime";
    pub const RELEASE_LINK: &str = "releaseLink";
    pub const SHA: &str = "sha";
    pub const DATA_STRUCTURE_VERSION: &str = "dataStructureVersion";
}

/// Everything written by one successful update.
pub struct PersistedSnapshot<'a> {
    pub database: &'a TagDatabase,
    pub tag_list: &'a [TagListEntry],
    pub lookup: &'a NameLookupTable,
    pub update_time: DateTime<Utc>,
    pub release_link: &'a str,
    pub sha: &'a str,
    pub schema_version: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub update_time: Option<DateTime<Utc>>,
    pub release_link: Option<String>,
    pub sha: Option<String>,
    pub data_structure_version: Option<i64>,
}

impl PersistedSnapshot<'_> {
    /// Serializes all seven keys and hands them to the store in one call.
    pub fn save(&self, store: &dyn Store) -> Result<()> {
        let entries = [
            (keys::TAG_DB, serde_json::to_string(self.database)?),
            (keys::TAG_LIST, serde_json::to_string(self.tag_list)?),
            (keys::TAG_REPLACE_DATA, serde_json::to_string(self.lookup)?),
            (keys::UPDATE_TIME, serde_json::to_string(&self.update_time)?),
            (keys::RELEASE_LINK, serde_json::to_string(self.release_link)?),
            (keys::SHA, serde_json::to_string(self.sha)?),
            (
                keys::DATA_STRUCTURE_VERSION,
                serde_json::to_string(&self.schema_version)?,
            ),
        ];
        store.put_all(&entries)
    }
}

fn read_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn load_tag_list(store: &dyn Store) -> Result<Option<Vec<TagListEntry>>> {
    read_json(store, keys::TAG_LIST)
}

pub fn load_lookup(store: &dyn Store) -> Result<Option<NameLookupTable>> {
    read_json(store, keys::TAG_REPLACE_DATA)
}

pub fn load_database(store: &dyn Store) -> Result<Option<TagDatabase>> {
    read_json(store, keys::TAG_DB)
}

pub fn load_sha(store: &dyn Store) -> Result<Option<String>> {
    read_json(store, keys::SHA)
}

pub fn load_meta(store: &dyn Store) -> Result<SnapshotMeta> {
    Ok(SnapshotMeta {
        update_time: read_json(store, keys::UPDATE_TIME)?,
        release_link: read_json(store, keys::RELEASE_LINK)?,
        sha: load_sha(store)?,
        data_structure_version: read_json(store, keys::DATA_STRUCTURE_VERSION)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::DatabaseHead;
    use serde_json::Map;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();

        let database = TagDatabase {
            head: DatabaseHead {
                sha: "abc".to_string(),
                extra: Map::new(),
            },
            data: Vec::new(),
            extra: Map::new(),
        };
        let tag_list = vec![TagListEntry {
            key: "foo".to_string(),
            namespace: "misc".to_string(),
            name: "Bar".to_string(),
            search: "foo$".to_string(),
            extra: Map::new(),
        }];
        let mut lookup = NameLookupTable::new();
        lookup.insert("misc:foo", "Bar");

        let snapshot = PersistedSnapshot {
            database: &database,
            tag_list: &tag_list,
            lookup: &lookup,
            update_time: Utc::now(),
            release_link: "https://example.invalid/release",
            sha: "abc",
            schema_version: 3,
        };
        snapshot.save(&store).unwrap();

        assert_eq!(load_tag_list(&store).unwrap().unwrap(), tag_list);
        assert_eq!(load_lookup(&store).unwrap().unwrap(), lookup);
        assert_eq!(load_database(&store).unwrap().unwrap(), database);

        let meta = load_meta(&store).unwrap();
        assert_eq!(meta.sha.as_deref(), Some("abc"));
        assert_eq!(meta.release_link.as_deref(), Some("https://example.invalid/release"));
        assert_eq!(meta.data_structure_version, Some(3));
        assert!(meta.update_time.is_some());
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();

        assert!(load_tag_list(&store).unwrap().is_none());
        assert!(load_lookup(&store).unwrap().is_none());
        let meta = load_meta(&store).unwrap();
        assert!(meta.sha.is_none());
        assert!(meta.data_structure_version.is_none());
    }
}
