//! Directive extraction from struct declarations.
//!
//! A struct field opts into checking with a tag of the form
//! `require:"assignment,Init,Setup"`: the tag value must be
//! `assignment` and the options name the methods obliged to assign the
//! field. Fields without the tag, and fields whose tag does not decode,
//! are skipped without reporting.

use indexmap::{IndexMap, IndexSet};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::parser::{self, ParsedFile};
use crate::tags::{self, Tags};

/// Struct tag key reserved for initialization contracts.
const TAG_KEY_REQUIRE: &str = "require";

/// Tag value that marks an assignment obligation. Other values leave
/// the key free to carry unrelated semantics later.
const TAG_VALUE_ASSIGNMENT: &str = "assignment";

/// Tree-sitter query for struct type declarations.
const STRUCT_QUERY: &str = r#"
(type_spec
  name: (type_identifier) @type_name
  type: (struct_type) @struct_type
)
"#;

/// Initialization obligations declared by one struct type.
///
/// A contract exists only for types with at least one tagged field;
/// its obligation map is never empty.
#[derive(Debug, Clone)]
pub struct TypeContract {
    /// Identifier of the declared type.
    pub type_name: String,
    /// Field name to the methods required to assign it, in declaration
    /// order. Duplicate method options collapse into one entry.
    pub obligations: IndexMap<String, IndexSet<String>>,
}

/// Extract contracts from every annotated struct in the file.
///
/// Structs are visited in document order, at any nesting depth.
/// Contracts for the same type name merge into one entry.
pub fn extract_contracts(parsed: &ParsedFile) -> anyhow::Result<Vec<TypeContract>> {
    let query = Query::new(parser::language(), STRUCT_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, parsed.root(), &parsed.source[..]);

    let mut contracts: Vec<TypeContract> = Vec::new();

    while let Some(m) = matches.next() {
        let mut type_name = "";
        let mut struct_node = None;

        for capture in m.captures {
            match query.capture_names()[capture.index as usize] {
                "type_name" => type_name = parsed.node_text(capture.node),
                "struct_type" => struct_node = Some(capture.node),
                _ => {}
            }
        }

        let struct_node = match struct_node {
            Some(n) => n,
            None => continue,
        };
        if type_name.is_empty() {
            continue;
        }

        for (field, methods) in annotated_fields(parsed, struct_node) {
            if methods.is_empty() {
                continue;
            }

            // Contracts are created lazily, at the first obligation.
            let idx = match contracts.iter().position(|c| c.type_name == type_name) {
                Some(i) => i,
                None => {
                    contracts.push(TypeContract {
                        type_name: type_name.to_string(),
                        obligations: IndexMap::new(),
                    });
                    contracts.len() - 1
                }
            };
            contracts[idx]
                .obligations
                .entry(field)
                .or_default()
                .extend(methods);
        }
    }

    Ok(contracts)
}

/// Union of every method name referenced by any obligation, in
/// first-seen order.
pub fn required_methods(contracts: &[TypeContract]) -> IndexSet<String> {
    let mut names = IndexSet::new();
    for contract in contracts {
        for methods in contract.obligations.values() {
            for name in methods {
                names.insert(name.clone());
            }
        }
    }
    names
}

/// Directive-bearing fields of one struct node, paired with the methods
/// their directives list.
fn annotated_fields(parsed: &ParsedFile, struct_node: Node) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::new();

    let mut struct_cursor = struct_node.walk();
    let list = struct_node
        .children(&mut struct_cursor)
        .find(|n| n.kind() == "field_declaration_list");
    let list = match list {
        Some(l) => l,
        None => return out,
    };

    let mut cursor = list.walk();
    for field in list.children(&mut cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }

        let tag_node = match field.child_by_field_name("tag") {
            Some(t) => t,
            None => continue,
        };
        let tag_text = match tags::unquote_literal(parsed.node_text(tag_node)) {
            Some(t) => t,
            None => continue,
        };
        let parsed_tags = match Tags::parse(&tag_text) {
            Ok(t) => t,
            Err(_) => continue,
        };
        let tag = match parsed_tags.get(TAG_KEY_REQUIRE) {
            Some(t) => t,
            None => continue,
        };
        if tag.name != TAG_VALUE_ASSIGNMENT {
            continue;
        }

        let name = match field_name(parsed, field) {
            Some(n) => n,
            None => continue,
        };

        let methods: Vec<String> = tag
            .options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        out.push((name, methods));
    }

    out
}

/// Logical name of a field: its first declared name, or for embedded
/// fields the embedded type identifier (`*pkg.Foo` yields `Foo`).
fn field_name(parsed: &ParsedFile, field: Node) -> Option<String> {
    if let Some(name) = field.child_by_field_name("name") {
        return Some(parsed.node_text(name).to_string());
    }

    let ty = field.child_by_field_name("type")?;
    embedded_name(parsed, ty)
}

/// Identifier of an embedded field's type, one level of pointer and
/// one level of package qualification deep.
fn embedded_name(parsed: &ParsedFile, ty: Node) -> Option<String> {
    match ty.kind() {
        "type_identifier" => Some(parsed.node_text(ty).to_string()),
        "qualified_type" => {
            let name = ty.child_by_field_name("name")?;
            Some(parsed.node_text(name).to_string())
        }
        "pointer_type" => {
            let inner = ty.named_child(0)?;
            match inner.kind() {
                "type_identifier" => Some(parsed.node_text(inner).to_string()),
                "qualified_type" => {
                    let name = inner.child_by_field_name("name")?;
                    Some(parsed.node_text(name).to_string())
                }
                _ => None,
            }
        }
        _ => None,
    }
}
