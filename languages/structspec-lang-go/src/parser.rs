//! Struct declaration extraction from Go source using tree-sitter-go
//!
//! Every `type_spec` whose type is a struct becomes a [`StructRecord`], wherever
//! it is declared (top level, inside a function body, generic or not). Aliases
//! and non-struct types are skipped.

use crate::tags::parse_tag_literal;
use std::path::Path;
use structspec_foundation::{FieldRecord, StructRecord, StructSpecError, StructSpecResult};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Parse `source` into a syntax tree, failing on any syntax error.
///
/// `path` is only used to locate errors.
pub fn parse_tree(source: &str, path: &Path) -> StructSpecResult<Tree> {
    let location = path.display().to_string();

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| {
            StructSpecError::parse(&location, format!("Failed to set Go language: {:?}", e))
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| StructSpecError::parse(&location, "Failed to parse Go source code"))?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error_node(root).unwrap_or(root);
        let position = bad.start_position();
        let message = if bad.is_missing() {
            format!("syntax error: missing {}", bad.kind())
        } else {
            format!("syntax error near '{}'", snippet(bad, source))
        };
        return Err(StructSpecError::parse_at(
            path,
            position.row + 1,
            position.column + 1,
            message,
        ));
    }

    Ok(tree)
}

/// A struct declaration with the 1-based position of its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedStruct {
    pub record: StructRecord,
    pub line: usize,
    pub column: usize,
}

/// Extract every struct declared in one Go file
pub fn parse_structs(source: &str, path: &Path) -> StructSpecResult<Vec<StructRecord>> {
    Ok(parse_located_structs(source, path)?
        .into_iter()
        .map(|located| located.record)
        .collect())
}

/// Like [`parse_structs`], keeping where each struct is declared
pub fn parse_located_structs(source: &str, path: &Path) -> StructSpecResult<Vec<LocatedStruct>> {
    let tree = parse_tree(source, path)?;

    let mut collector = StructCollector::new(source, path);
    let root = tree.root_node();
    let mut cursor = root.walk();
    collector.visit_node(root, &mut cursor);

    collector.into_structs()
}

/// Whether the file opts out of every build with `//go:build ignore`.
///
/// Only constraint lines above the package clause count, as for the go tool.
/// The legacy `// +build ignore` form is honoured too.
pub fn is_build_ignored(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };

        if let Some(expr) = comment.strip_prefix("go:build") {
            return expr.trim() == "ignore";
        }
        if let Some(expr) = comment.trim_start().strip_prefix("+build") {
            if expr.trim() == "ignore" {
                return true;
            }
        }
    }

    false
}

/// Package name from the file's `package` clause, if it has one
pub fn parse_package_name(source: &str, path: &Path) -> StructSpecResult<Option<String>> {
    let tree = parse_tree(source, path)?;
    let root = tree.root_node();

    let mut cursor = root.walk();
    let name = root
        .named_children(&mut cursor)
        .find(|node| node.kind() == "package_clause")
        .and_then(|clause| clause.named_child(0))
        .map(|ident| node_text(ident, source).to_string());

    Ok(name)
}

/// Visitor collecting struct declarations
struct StructCollector<'a> {
    source: &'a str,
    path: &'a Path,
    structs: Vec<LocatedStruct>,
    error: Option<StructSpecError>,
}

impl<'a> StructCollector<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            structs: Vec::new(),
            error: None,
        }
    }

    fn into_structs(self) -> StructSpecResult<Vec<LocatedStruct>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.structs),
        }
    }

    fn visit_node(&mut self, node: Node, cursor: &mut TreeCursor) {
        if self.error.is_some() {
            return;
        }

        if node.kind() == "type_spec" {
            match self.parse_type_spec(node) {
                Ok(Some(record)) => self.structs.push(record),
                Ok(None) => {}
                Err(err) => {
                    self.error = Some(err);
                    return;
                }
            }
        }

        // Recursively visit children
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                self.visit_node(child, cursor);

                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    /// `Ok(None)` when the declared type is not a struct
    fn parse_type_spec(&self, node: Node) -> StructSpecResult<Option<LocatedStruct>> {
        let (Some(name_node), Some(type_node)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("type"),
        ) else {
            return Ok(None);
        };

        if type_node.kind() != "struct_type" {
            return Ok(None);
        }

        let struct_name = node_text(name_node, self.source);
        let mut fields = Vec::new();

        let mut cursor = type_node.walk();
        let field_lists: Vec<Node> = type_node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "field_declaration_list")
            .collect();

        for list in field_lists {
            let mut list_cursor = list.walk();
            let declarations: Vec<Node> = list
                .named_children(&mut list_cursor)
                .filter(|child| child.kind() == "field_declaration")
                .collect();

            for declaration in declarations {
                fields.extend(self.parse_field_declaration(declaration, struct_name)?);
            }
        }

        let position = name_node.start_position();
        Ok(Some(LocatedStruct {
            record: StructRecord::new(struct_name, fields),
            line: position.row + 1,
            column: position.column + 1,
        }))
    }

    /// One record per declared name; embedded fields are named after their type
    fn parse_field_declaration(
        &self,
        node: Node,
        struct_name: &str,
    ) -> StructSpecResult<Vec<FieldRecord>> {
        let mut cursor = node.walk();
        let mut names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .map(|name| node_text(name, self.source).to_string())
            .collect();

        if names.is_empty() {
            if let Some(type_node) = node.child_by_field_name("type") {
                names.push(embedded_field_name(type_node, self.source));
            }
        }

        let tags = match node.child_by_field_name("tag") {
            Some(tag_node) => parse_tag_literal(node_text(tag_node, self.source)).map_err(|e| {
                let position = tag_node.start_position();
                StructSpecError::parse_at(
                    self.path,
                    position.row + 1,
                    position.column + 1,
                    format!(
                        "parse field '{}' of struct '{}': {}",
                        names.join(", "),
                        struct_name,
                        e
                    ),
                )
            })?,
            None => Default::default(),
        };

        Ok(names
            .into_iter()
            .map(|name| FieldRecord {
                name,
                tags: tags.clone(),
            })
            .collect())
    }
}

/// `Base`, `*Base`, `pkg.Base` and `Base[T]` all embed a field named `Base`
fn embedded_field_name(type_node: Node, source: &str) -> String {
    match type_node.kind() {
        "qualified_type" => type_node
            .child_by_field_name("name")
            .map(|name| node_text(name, source).to_string()),
        "generic_type" => type_node
            .child_by_field_name("type")
            .map(|inner| embedded_field_name(inner, source)),
        "pointer_type" => type_node
            .named_child(0)
            .map(|inner| embedded_field_name(inner, source)),
        _ => None,
    }
    .unwrap_or_else(|| node_text(type_node, source).trim_start_matches('*').to_string())
}

fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error_node)
}

fn snippet(node: Node, source: &str) -> String {
    let text = node_text(node, source);
    let line = text.lines().next().unwrap_or_default().trim();
    line.chars().take(40).collect()
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
