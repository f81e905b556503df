//! Declaration and render models
//!
//! [`StructRecord`], [`FieldRecord`] and [`TagValue`] describe what an extractor
//! found in source. [`TagGroup`], [`StructSpec`] and [`RenderModel`] are the
//! output-facing shapes produced by the reshape stage and consumed by renderers.

use indexmap::IndexMap;

/// Value of one struct tag key, e.g. `pg:"user_id,pk"` -> name `user_id`, options `[pk]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagValue {
    /// Name associated with the tag key (column name, JSON name, ...)
    pub name: String,
    /// Flags following the name, in declaration order
    pub options: Vec<String>,
}

impl TagValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// One named field of a struct together with its parsed tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub name: String,
    /// Tag key -> value. Keys are unique; iteration follows first appearance.
    pub tags: IndexMap<String, TagValue>,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: IndexMap::new(),
        }
    }

    /// Add a tag. A repeated key replaces the earlier value (last write wins).
    pub fn with_tag(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.tags.insert(key.into(), value);
        self
    }
}

/// A struct declaration discovered in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructRecord {
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldRecord>,
}

impl StructRecord {
    pub fn new(name: impl Into<String>, fields: Vec<FieldRecord>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One (field name, tag name) pair inside a [`TagGroup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Name of the field in the source struct, ex: `UserID`
    pub field_name: String,
    /// Name taken from the tag, ex: `user_id`
    pub tag_value: String,
}

/// Fields of one struct that carry a given tag key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    /// Tag key with an upper-cased first character, ex: `Json`, `Pg`
    pub display_name: String,
    /// Entries in field declaration order
    pub entries: Vec<TagEntry>,
}

/// Render-ready description of one struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSpec {
    pub name: String,
    /// Groups sorted by display name
    pub tag_groups: Vec<TagGroup>,
}

/// Everything a renderer needs to produce one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub package_name: String,
    pub structs: Vec<StructSpec>,
}
