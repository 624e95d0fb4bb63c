//! Go source parsing via tree-sitter.
//!
//! One file is parsed per invocation. A tree whose root contains ERROR
//! nodes is rejected outright; the downstream passes assume a clean tree.

use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

/// Fatal errors from loading or parsing an input file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("incompatible Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("failed to parse {0}")]
    Parse(String),
    #[error("{0} contains syntax errors")]
    Syntax(String),
}

/// Static storage for the Go grammar.
static GO_LANGUAGE: OnceCell<Language> = OnceCell::new();

/// The Go grammar, initialized on first use.
pub fn language() -> &'static Language {
    GO_LANGUAGE.get_or_init(|| tree_sitter_go::LANGUAGE.into())
}

/// A parsed Go file: the tree-sitter tree plus the source it came from.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path as given on the command line (for diagnostics).
    pub path: String,
}

impl ParsedFile {
    /// Root node of the parse tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Read and parse a single Go source file.
pub fn parse_file(path: &Path) -> Result<ParsedFile, ParseError> {
    let source = fs::read(path).map_err(|e| ParseError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_source(&path.display().to_string(), source)
}

/// Parse Go source that is already in memory.
pub fn parse_source(path: &str, source: Vec<u8>) -> Result<ParsedFile, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(language())?;

    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| ParseError::Parse(path.to_string()))?;

    if tree.root_node().has_error() {
        return Err(ParseError::Syntax(path.to_string()));
    }

    Ok(ParsedFile {
        tree,
        source,
        path: path.to_string(),
    })
}
