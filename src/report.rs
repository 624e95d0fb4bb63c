//! Output formatting for check results.
//!
//! Text output is one line per violation on stdout, stable enough for
//! scripts and editors to consume. JSON output carries the same
//! violations plus a pass flag.

use serde::{Deserialize, Serialize};

use crate::verify::Violation;

/// JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub file: String,
    pub passed: bool,
    pub violations: Vec<JsonViolation>,
}

/// One violation in the JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub file: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub field: String,
    pub method: String,
    pub message: String,
}

/// Print one line per violation.
pub fn write_text(violations: &[Violation]) {
    for v in violations {
        println!("{}", v);
    }
}

/// Print the JSON report.
pub fn write_json(file: &str, violations: &[Violation]) -> anyhow::Result<()> {
    let report = build_json(file, violations);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Build the JSON report structure.
pub fn build_json(file: &str, violations: &[Violation]) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        file: file.to_string(),
        passed: violations.is_empty(),
        violations: violations.iter().map(violation_to_json).collect(),
    }
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.kind.as_str().to_string(),
        file: v.file.clone(),
        type_name: v.type_name.clone(),
        field: v.field.clone(),
        method: v.method.clone(),
        message: v.to_string(),
    }
}
