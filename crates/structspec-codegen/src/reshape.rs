//! Tag reshaping: struct fields regrouped by tag key

use indexmap::IndexMap;
use std::collections::HashSet;
use structspec_foundation::{StructRecord, StructSpec, TagEntry, TagGroup};

/// Build one [`StructSpec`] per input struct, in input order.
///
/// `requested_tags` restricts the emitted groups to those tag keys; an empty
/// slice keeps every key found. Structs left without groups are still emitted.
pub fn reshape<S: AsRef<str>>(structs: &[StructRecord], requested_tags: &[S]) -> Vec<StructSpec> {
    let requested: HashSet<&str> = requested_tags.iter().map(AsRef::as_ref).collect();

    structs
        .iter()
        .map(|s| reshape_struct(s, &requested))
        .collect()
}

/// Group the fields of one struct by tag key.
///
/// An empty `requested` set means "all keys".
pub fn reshape_struct(record: &StructRecord, requested: &HashSet<&str>) -> StructSpec {
    // Collect all fields under all tags, keys in first-seen order
    let mut fields_by_tag: IndexMap<&str, Vec<TagEntry>> = IndexMap::new();
    for field in &record.fields {
        for (key, value) in &field.tags {
            fields_by_tag
                .entry(key.as_str())
                .or_default()
                .push(TagEntry {
                    field_name: field.name.clone(),
                    tag_value: value.name.clone(),
                });
        }
    }

    if !requested.is_empty() {
        fields_by_tag.retain(|key, _| requested.contains(key));
    }

    let mut tag_groups: Vec<TagGroup> = fields_by_tag
        .into_iter()
        .map(|(key, entries)| TagGroup {
            display_name: display_name(key),
            entries,
        })
        .collect();

    // Stable: keys that map to the same display name keep encounter order
    tag_groups.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    StructSpec {
        name: record.name.clone(),
        tag_groups,
    }
}

/// Tag key with its first character upper-cased: `json` -> `Json`, `x` -> `X`.
///
/// ASCII only. A key starting with a non-ASCII character is returned unchanged.
pub fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(key.len());
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
            name
        }
        None => String::new(),
    }
}
