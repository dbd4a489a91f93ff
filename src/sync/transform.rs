//! Turns a raw [`TagDatabase`] into the flattened tag list and lookup table.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{
    MISC_NAMESPACE, NameLookupTable, ROWS_NAMESPACE, TagDatabase, TagListEntry, namespace_rank,
};

/// One emoji grapheme: flags, keycaps, and pictographs with optional
/// presentation selector, skin tone, tag sequence and ZWJ continuations.
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\p{Regional_Indicator}\p{Regional_Indicator}",
        r"|[\x{23}\x{2A}0-9]\x{FE0F}?\x{20E3}",
        r"|\p{Extended_Pictographic}(?:\x{FE0F}|\p{Emoji_Modifier})?",
        r"(?:[\x{E0020}-\x{E007E}]+\x{E007F})?",
        r"(?:\x{200D}\p{Extended_Pictographic}(?:\x{FE0F}|\p{Emoji_Modifier})?)*",
    ))
    .expect("emoji pattern is valid")
});

const EMOJI_SPAN_OPEN: &str = r#"<span class="ehs-emoji">"#;
const EMOJI_SPAN_CLOSE: &str = "</span>";

pub struct TransformedDatabase {
    pub tag_list: Vec<TagListEntry>,
    pub lookup: NameLookupTable,
}

/// Stable sort of the groups by display priority.
pub fn sort_groups(database: &mut TagDatabase) {
    database.data.sort_by_key(|group| namespace_rank(&group.namespace));
}

/// Builds the list and lookup table in the database's current group order.
#[must_use]
pub fn transform(database: &TagDatabase) -> TransformedDatabase {
    let mut tag_list = Vec::new();
    let mut lookup = NameLookupTable::new();

    for group in &database.data {
        let namespace = group.namespace.as_str();
        if namespace == ROWS_NAMESPACE {
            continue;
        }

        for (key, record) in &group.data {
            let name = wrap_emoji(strip_paragraph(&record.name));

            lookup.insert(format!("{namespace}:{key}"), name.clone());
            if namespace == MISC_NAMESPACE {
                lookup.insert(key.clone(), name.clone());
            }

            tag_list.push(TagListEntry {
                key: key.clone(),
                namespace: namespace.to_string(),
                search: search_string(namespace, key),
                name,
                extra: record.extra.clone(),
            });
        }
    }

    TransformedDatabase { tag_list, lookup }
}

/// `namespace:key$`, unprefixed for misc, quoted when the key has whitespace.
#[must_use]
pub fn search_string(namespace: &str, key: &str) -> String {
    let prefix = if namespace == MISC_NAMESPACE {
        String::new()
    } else {
        format!("{namespace}:")
    };

    if key.chars().any(char::is_whitespace) {
        format!("{prefix}\"{key}$\"")
    } else {
        format!("{prefix}{key}$")
    }
}

/// Removes one `<p>…</p>` wrapper around the whole name.
#[must_use]
pub fn strip_paragraph(name: &str) -> &str {
    match name.strip_prefix("<p>").and_then(|s| s.strip_suffix("</p>")) {
        Some(inner) if !inner.is_empty() => inner,
        _ => name,
    }
}

#[must_use]
pub fn wrap_emoji(name: &str) -> String {
    EMOJI
        .replace_all(name, |caps: &regex::Captures<'_>| {
            format!("{EMOJI_SPAN_OPEN}{}{EMOJI_SPAN_CLOSE}", &caps[0])
        })
        .into_owned()
}
