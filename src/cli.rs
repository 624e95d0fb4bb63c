//! Command-line interface for gocontract.

use std::path::PathBuf;

use clap::Parser;
use colored::*;

use crate::contract::{self, TypeContract};
use crate::methods::MethodBodies;
use crate::parser;
use crate::report;
use crate::verify;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Presence of this variable (any value) enables dumps of intermediate
/// state on stderr.
const DEBUG_ENV: &str = "DEBUG";

/// Check that methods named in struct tag directives assign their fields.
///
/// A struct field tagged `require:"assignment,Init"` obliges the method
/// `Init` to assign that field through a keyed composite literal of the
/// owning type. Every unmet obligation in the file is reported, and the
/// process exits non-zero when any exists.
#[derive(Parser)]
#[command(name = "gocontract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Go source file to check
    pub file: PathBuf,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Run the check pipeline for one file.
pub fn run_check(cli: &Cli) -> anyhow::Result<i32> {
    if cli.format != "text" && cli.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'text' or 'json'",
            cli.format
        );
        return Ok(EXIT_ERROR);
    }

    let debug = std::env::var_os(DEBUG_ENV).is_some();

    let parsed = parser::parse_file(&cli.file)?;

    let contracts = contract::extract_contracts(&parsed)?;
    if debug {
        dump_contracts(&contracts);
    }

    let method_names = contract::required_methods(&contracts);
    if debug {
        eprintln!("{} {:?}", "required methods:".bold(), method_names);
    }

    let bodies = MethodBodies::collect(&parsed, &method_names)?;
    if debug {
        let located: Vec<&str> = bodies.names().collect();
        eprintln!("{} {:?}", "located bodies:".bold(), located);
    }

    let violations = verify::check_contracts(&parsed.path, &contracts, &bodies);

    match cli.format.as_str() {
        "json" => report::write_json(&parsed.path, &violations)?,
        _ => report::write_text(&violations),
    }

    if violations.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Dump the obligation catalog to stderr.
fn dump_contracts(contracts: &[TypeContract]) {
    eprintln!("{}", "contracts:".bold());
    for contract in contracts {
        for (field, methods) in &contract.obligations {
            eprintln!("  {}.{} requires {:?}", contract.type_name, field, methods);
        }
    }
}
