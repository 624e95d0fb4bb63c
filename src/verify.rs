//! Structural verification of assignment obligations.
//!
//! The check is syntactic: a field counts as assigned only when the
//! required method's body contains a keyed composite literal of the
//! owning type naming that field. Positional literal elements and
//! assignments routed through helper constructors are not recognized.

use std::fmt;

use tree_sitter::Node;

use crate::contract::TypeContract;
use crate::methods::MethodBodies;
use crate::parser::ParsedFile;

/// Which way an obligation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The directive names a method that does not exist in the file.
    MethodNotFound,
    /// The method exists but never assigns the field via a keyed literal.
    FieldNotAssigned,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MethodNotFound => "method_not_found",
            ViolationKind::FieldNotAssigned => "field_not_assigned",
        }
    }
}

/// A single failed obligation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub file: String,
    pub type_name: String,
    pub field: String,
    pub method: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::FieldNotAssigned => write!(
                f,
                "{} uninitialized struct field {}.{} in {}",
                self.file, self.type_name, self.field, self.method
            ),
            ViolationKind::MethodNotFound => write!(
                f,
                "{} uninitialized struct field {}.{} in {}, method not found.",
                self.file, self.type_name, self.field, self.method
            ),
        }
    }
}

/// Check every obligation in the catalog against the captured bodies.
///
/// Violations come out in catalog order, then field order, then method
/// order, so output is deterministic across runs.
pub fn check_contracts(
    file: &str,
    contracts: &[TypeContract],
    bodies: &MethodBodies,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for contract in contracts {
        for (field, methods) in &contract.obligations {
            for method in methods {
                let kind = match bodies.get(method) {
                    None => Some(ViolationKind::MethodNotFound),
                    Some(body) => {
                        if assigns_field(bodies.parsed(), body, &contract.type_name, field) {
                            None
                        } else {
                            Some(ViolationKind::FieldNotAssigned)
                        }
                    }
                };

                if let Some(kind) = kind {
                    violations.push(Violation {
                        kind,
                        file: file.to_string(),
                        type_name: contract.type_name.clone(),
                        field: field.clone(),
                        method: method.clone(),
                    });
                }
            }
        }
    }

    violations
}

/// Depth-first search for a composite literal of `type_name` with a
/// keyed element assigning `field`. Stops at the first hit; a matching
/// literal without the key does not stop the search, and its nested
/// elements are still visited.
fn assigns_field(parsed: &ParsedFile, node: Node, type_name: &str, field: &str) -> bool {
    if node.kind() == "composite_literal" {
        let ty = node.child_by_field_name("type");
        let value = node.child_by_field_name("body");

        if let (Some(ty), Some(value)) = (ty, value) {
            // Exact simple-name match: qualified or aliased type
            // identifiers never match.
            if ty.kind() == "type_identifier"
                && parsed.node_text(ty) == type_name
                && literal_has_key(parsed, value, field)
            {
                return true;
            }
        }
    }

    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| assigns_field(parsed, child, type_name, field));
    found
}

/// Does this literal value carry `field` as a key, among its direct
/// elements? Positional elements are ignored.
fn literal_has_key(parsed: &ParsedFile, literal_value: Node, field: &str) -> bool {
    let mut cursor = literal_value.walk();
    for element in literal_value.children(&mut cursor) {
        if element.kind() != "keyed_element" {
            continue;
        }
        let key = match element.named_child(0) {
            Some(k) => k,
            None => continue,
        };
        if matches!(key.kind(), "field_identifier" | "identifier")
            && parsed.node_text(key) == field
        {
            return true;
        }
    }
    false
}
