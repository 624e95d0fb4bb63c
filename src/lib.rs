//! Gocontract - initialization contract checker for Go structs.
//!
//! Gocontract verifies that struct fields annotated with a `require`
//! tag are assigned by the methods the tag names. Given
//!
//! ```go
//! type User struct {
//!     Name string `require:"assignment,Init"`
//! }
//! ```
//!
//! the method `Init` must contain a keyed composite literal
//! `User{Name: ...}` somewhere in its body; otherwise a violation is
//! reported and the process exits non-zero.
//!
//! # Architecture
//!
//! One file is parsed with tree-sitter, then three passes run in strict
//! order with no shared mutable state:
//!
//! - `contract`: extracts per-field tag directives into an obligation
//!   catalog (`TypeContract`)
//! - `methods`: captures the bodies of the functions the catalog names
//! - `verify`: searches each body for the required keyed assignment
//!
//! `report` renders violations as text or JSON; `cli` wires the passes
//! together behind the command line. The check is single-file and
//! syntactic throughout: no cross-file resolution, no data-flow.

pub mod cli;
pub mod contract;
pub mod methods;
pub mod parser;
pub mod report;
pub mod tags;
pub mod verify;

pub use contract::{extract_contracts, required_methods, TypeContract};
pub use methods::MethodBodies;
pub use parser::{parse_file, parse_source, ParseError, ParsedFile};
pub use verify::{check_contracts, Violation, ViolationKind};
