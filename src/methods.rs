//! Locating the bodies of contract-referenced functions.

use indexmap::{IndexMap, IndexSet};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::parser::{self, ParsedFile};

/// Tree-sitter query for function and method declarations with bodies.
const FUNCTION_QUERY: &str = r#"
(function_declaration
  name: (identifier) @name
  body: (block) @body
)

(method_declaration
  name: (field_identifier) @name
  body: (block) @body
)
"#;

/// Captured bodies for a requested set of declaration names.
///
/// Resolution is by name alone: the receiver type is not consulted, and
/// when several declarations share a name the one appearing last in the
/// file wins. Declarations without a body (external/assembly stubs) are
/// never captured.
pub struct MethodBodies<'t> {
    parsed: &'t ParsedFile,
    bodies: IndexMap<String, Node<'t>>,
}

impl<'t> MethodBodies<'t> {
    /// Single pass over all declarations in the file, capturing the
    /// body of each whose name is in `requested`.
    pub fn collect(parsed: &'t ParsedFile, requested: &IndexSet<String>) -> anyhow::Result<Self> {
        let query = Query::new(parser::language(), FUNCTION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.root(), &parsed.source[..]);

        let mut bodies = IndexMap::new();

        while let Some(m) = matches.next() {
            let mut name = "";
            let mut body = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "name" => name = parsed.node_text(capture.node),
                    "body" => body = Some(capture.node),
                    _ => {}
                }
            }

            if let Some(body) = body {
                if requested.contains(name) {
                    bodies.insert(name.to_string(), body);
                }
            }
        }

        Ok(Self { parsed, bodies })
    }

    /// The file the bodies were captured from.
    pub fn parsed(&self) -> &'t ParsedFile {
        self.parsed
    }

    /// Body block for a declaration name, if one was captured.
    pub fn get(&self, name: &str) -> Option<Node<'t>> {
        self.bodies.get(name).copied()
    }

    /// Captured names, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }
}
