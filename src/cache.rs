use crate::types::{NameLookupTable, TagListEntry};

/// Read-side copy of the persisted list and lookup table.
#[derive(Debug, Default)]
pub struct TagCache {
    pub tag_list: Vec<TagListEntry>,
    pub lookup: NameLookupTable,
}

impl TagCache {
    #[must_use]
    pub fn new(tag_list: Vec<TagListEntry>, lookup: NameLookupTable) -> Self {
        Self { tag_list, lookup }
    }

    /// Accepts `namespace:key`, or a bare key for misc tags.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.lookup.get(name.trim())
    }

    /// Case-insensitive suggestions for address-bar style input. Prefix hits
    /// on the search string come first, then substring hits, then matches on
    /// the translated name.
    #[must_use]
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<TagListEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &TagListEntry)> = self
            .tag_list
            .iter()
            .filter_map(|entry| match_rank(entry, &query).map(|rank| (rank, entry)))
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);

        ranked
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry.clone())
            .collect()
    }
}

fn match_rank(entry: &TagListEntry, query: &str) -> Option<u8> {
    let search = entry.search.to_lowercase();
    let unquoted = search.replace('"', "");

    if unquoted.starts_with(query) || entry.key.to_lowercase().starts_with(query) {
        Some(0)
    } else if unquoted.contains(query) {
        Some(1)
    } else if entry.name.to_lowercase().contains(query) {
        Some(2)
    } else {
        None
    }
}
