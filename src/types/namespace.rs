/// Display order of namespace groups. Anything not listed sorts after these.
pub const NAMESPACE_PRIORITY: [&str; 9] = [
    "female",
    "language",
    "misc",
    "male",
    "artist",
    "group",
    "parody",
    "character",
    "reclass",
];

/// Metadata group that never contributes tags.
pub const ROWS_NAMESPACE: &str = "rows";

/// Entries in this namespace are searched and looked up without a prefix.
pub const MISC_NAMESPACE: &str = "misc";

/// Sort key for a namespace; unknown namespaces share the last rank.
#[must_use]
pub fn namespace_rank(namespace: &str) -> usize {
    NAMESPACE_PRIORITY
        .iter()
        .position(|ns| *ns == namespace)
        .unwrap_or(NAMESPACE_PRIORITY.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_namespaces_follow_priority() {
        assert_eq!(namespace_rank("female"), 0);
        assert_eq!(namespace_rank("misc"), 2);
        assert_eq!(namespace_rank("reclass"), 8);
    }

    #[test]
    fn test_unknown_namespaces_rank_last() {
        assert_eq!(namespace_rank("cosplayer"), NAMESPACE_PRIORITY.len());
        assert_eq!(namespace_rank("rows"), NAMESPACE_PRIORITY.len());
        assert!(namespace_rank("reclass") < namespace_rank("temp"));
    }
}
