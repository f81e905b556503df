//! Go source rendering
//!
//! [`GoSpecRenderer`] emits one variable per struct. For a struct `MyEntity`
//! whose fields carry `pg` tags the output reads:
//!
//! ```go
//! // MyEntitySpec lists struct tag names of MyEntity fields.
//! var MyEntitySpec = struct {
//! 	Pg struct {
//! 		ID   string
//! 		Name string
//! 	}
//! }{
//! 	Pg: struct {
//! 		ID   string
//! 		Name string
//! 	}{
//! 		ID:   "id",
//! 		Name: "name",
//! 	},
//! }
//! ```
//!
//! Callers then write `MyEntitySpec.Pg.Name` instead of the `"name"` literal.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use structspec_foundation::{
    RenderModel, StructSpec, StructSpecError, StructSpecResult, TagEntry, TagGroup,
};
use tracing::debug;

/// Turns a [`RenderModel`] into the text of one generated file
pub trait Renderer {
    fn render(&self, model: &RenderModel) -> StructSpecResult<String>;
}

pub const GENERATED_HEADER: &str = "// Code generated by structspec. DO NOT EDIT.";

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Letters are any `\p{L}` or `_`, digits after the first char are `\p{Nd}`
static GO_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").expect("valid identifier pattern"));

/// Go's blank identifier; such fields cannot be referenced
const BLANK_IDENTIFIER: &str = "_";

/// Renders gofmt-style Go source with one `<Struct>Spec` variable per struct
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSpecRenderer;

impl Renderer for GoSpecRenderer {
    fn render(&self, model: &RenderModel) -> StructSpecResult<String> {
        ensure_identifier(&model.package_name, "package name")?;

        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push_str("\n\n");
        out.push_str(&format!("package {}\n", model.package_name));

        for spec in &model.structs {
            out.push('\n');
            render_struct(&mut out, spec)?;
        }

        Ok(out)
    }
}

fn render_struct(out: &mut String, spec: &StructSpec) -> StructSpecResult<()> {
    ensure_identifier(&spec.name, "struct name")?;
    let groups = renderable_groups(spec)?;

    out.push_str(&format!(
        "// {name}Spec lists struct tag names of {name} fields.\n",
        name = spec.name
    ));

    if groups.is_empty() {
        out.push_str(&format!("var {}Spec = struct{{}}{{}}\n", spec.name));
        return Ok(());
    }

    // Type
    out.push_str(&format!("var {}Spec = struct {{\n", spec.name));
    for (group, entries) in &groups {
        out.push_str(&format!("\t{} struct {{\n", group.display_name));
        push_field_types(out, entries, 2);
        out.push_str("\t}\n");
    }
    out.push_str("}{\n");

    // Value
    for (group, entries) in &groups {
        out.push_str(&format!("\t{}: struct {{\n", group.display_name));
        push_field_types(out, entries, 2);
        out.push_str("\t}{\n");
        push_field_values(out, entries, 2);
        out.push_str("\t},\n");
    }
    out.push_str("}\n");

    Ok(())
}

/// Groups with their addressable entries, checked to form a compilable struct type.
///
/// Blank `_` fields are dropped, and so is a group left without entries.
/// Repeated group or field names are an error.
fn renderable_groups(spec: &StructSpec) -> StructSpecResult<Vec<(&TagGroup, Vec<&TagEntry>)>> {
    let mut group_names = HashSet::new();
    let mut groups = Vec::with_capacity(spec.tag_groups.len());

    for group in &spec.tag_groups {
        ensure_identifier(&group.display_name, &format!("tag group of struct '{}'", spec.name))?;
        if !group_names.insert(group.display_name.as_str()) {
            return Err(StructSpecError::render(format!(
                "struct '{}' has several tag keys named '{}' once capitalized",
                spec.name, group.display_name
            )));
        }

        let mut field_names = HashSet::new();
        let mut entries = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            if entry.field_name == BLANK_IDENTIFIER {
                debug!(struct_name = %spec.name, group = %group.display_name, "Skipping blank field");
                continue;
            }
            ensure_identifier(&entry.field_name, &format!("field of struct '{}'", spec.name))?;
            if !field_names.insert(entry.field_name.as_str()) {
                return Err(StructSpecError::render(format!(
                    "field '{}' appears twice in tag group '{}' of struct '{}'",
                    entry.field_name, group.display_name, spec.name
                )));
            }
            entries.push(entry);
        }

        if !entries.is_empty() {
            groups.push((group, entries));
        }
    }

    Ok(groups)
}

fn push_field_types(out: &mut String, entries: &[&TagEntry], depth: usize) {
    let indent = "\t".repeat(depth);
    let width = entries
        .iter()
        .map(|e| e.field_name.chars().count())
        .max()
        .unwrap_or(0);

    for entry in entries {
        out.push_str(&format!(
            "{indent}{name:<width$} string\n",
            name = entry.field_name
        ));
    }
}

fn push_field_values(out: &mut String, entries: &[&TagEntry], depth: usize) {
    let indent = "\t".repeat(depth);
    // Key plus colon
    let width = entries
        .iter()
        .map(|e| e.field_name.chars().count() + 1)
        .max()
        .unwrap_or(0);

    for entry in entries {
        let key = format!("{}:", entry.field_name);
        out.push_str(&format!(
            "{indent}{key:<width$} {value},\n",
            value = go_quote(&entry.tag_value)
        ));
    }
}

/// Fail when `name` cannot be used as a Go identifier
fn ensure_identifier(name: &str, what: &str) -> StructSpecResult<()> {
    if is_go_identifier(name) {
        Ok(())
    } else {
        Err(StructSpecError::render(format!(
            "{} '{}' is not a valid Go identifier",
            what, name
        )))
    }
}

pub fn is_go_identifier(name: &str) -> bool {
    GO_IDENTIFIER.is_match(name) && !GO_KEYWORDS.contains(&name)
}

/// Interpreted Go string literal for `value`, quotes included
pub fn go_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() && (c as u32) < 0x100 => {
                quoted.push_str(&format!("\\x{:02x}", c as u32))
            }
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
