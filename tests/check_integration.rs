//! End-to-end checks against the Go fixtures in testdata/.

use std::path::PathBuf;

use gocontract::{
    check_contracts, extract_contracts, parse_file, parse_source, required_methods, MethodBodies,
    ParseError, Violation, ViolationKind,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Run the full pipeline over one fixture file.
fn check_fixture(name: &str) -> Vec<Violation> {
    let path = testdata_path().join(name);
    let parsed = parse_file(&path).expect("fixture should parse");
    let contracts = extract_contracts(&parsed).expect("extraction should succeed");
    let names = required_methods(&contracts);
    let bodies = MethodBodies::collect(&parsed, &names).expect("body capture should succeed");
    check_contracts(&parsed.path, &contracts, &bodies)
}

#[test]
fn test_clean_file_passes() {
    let violations = check_fixture("clean.go");
    assert!(violations.is_empty(), "unexpected: {:?}", violations);
}

#[test]
fn test_unassigned_field_is_reported() {
    let violations = check_fixture("unassigned.go");

    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert_eq!(v.kind, ViolationKind::FieldNotAssigned);
    assert_eq!(v.type_name, "User");
    assert_eq!(v.field, "Name");
    assert_eq!(v.method, "Init");
    assert!(v.file.ends_with("unassigned.go"));
}

#[test]
fn test_missing_method_is_reported() {
    let violations = check_fixture("missing_method.go");

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::MethodNotFound);
    assert_eq!(violations[0].method, "Init");
}

#[test]
fn test_positional_assignment_is_rejected() {
    let violations = check_fixture("positional.go");

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::FieldNotAssigned);
    assert_eq!(violations[0].field, "X");
}

#[test]
fn test_embedded_fields_pass_when_assigned() {
    let violations = check_fixture("embedded.go");
    assert!(violations.is_empty(), "unexpected: {:?}", violations);
}

#[test]
fn test_only_unsatisfied_method_is_reported() {
    let violations = check_fixture("mixed.go");

    assert_eq!(violations.len(), 1);
    let v = &violations[0];
    assert_eq!(v.kind, ViolationKind::FieldNotAssigned);
    assert_eq!(v.type_name, "Config");
    assert_eq!(v.field, "Path");
    assert_eq!(v.method, "Reset");
}

#[test]
fn test_broken_file_fails_to_parse() {
    let path = testdata_path().join("broken.go");
    let err = parse_file(&path);
    assert!(matches!(err, Err(ParseError::Syntax(_))));
}

#[test]
fn test_violation_lines_match_expected_format() {
    let violations = check_fixture("unassigned.go");
    let line = violations[0].to_string();
    assert!(line.ends_with("uninitialized struct field User.Name in Init"));

    let violations = check_fixture("missing_method.go");
    let line = violations[0].to_string();
    assert!(line.ends_with("uninitialized struct field User.Name in Init, method not found."));
}

#[test]
fn test_idempotence() {
    let first = check_fixture("mixed.go");
    let second = check_fixture("mixed.go");
    assert_eq!(first, second);
}

#[test]
fn test_check_runs_on_generated_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("service.go");
    std::fs::write(
        &path,
        r#"
package service

type Service struct {
	Store  string `require:"assignment,New"`
	Cache  string `require:"assignment,New,warm"`
	Logger string
}

func New() *Service {
	return &Service{
		Store: "postgres",
		Cache: "redis",
	}
}
"#,
    )
    .unwrap();

    let parsed = parse_file(&path).unwrap();
    let contracts = extract_contracts(&parsed).unwrap();
    assert_eq!(contracts.len(), 1);

    let names = required_methods(&contracts);
    let bodies = MethodBodies::collect(&parsed, &names).unwrap();
    let violations = check_contracts(&parsed.path, &contracts, &bodies);

    // `warm` does not exist; everything else is satisfied.
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::MethodNotFound);
    assert_eq!(violations[0].method, "warm");
}

#[test]
fn test_violations_follow_document_order() {
    let parsed = parse_source(
        "order.go",
        br#"
package main

type First struct {
	A string `require:"assignment,MakeFirst"`
	B string `require:"assignment,MakeFirst"`
}

type Second struct {
	C string `require:"assignment,MakeSecond"`
}
"#
        .to_vec(),
    )
    .unwrap();

    let contracts = extract_contracts(&parsed).unwrap();
    let names = required_methods(&contracts);
    let bodies = MethodBodies::collect(&parsed, &names).unwrap();
    let violations = check_contracts(&parsed.path, &contracts, &bodies);

    let triples: Vec<(&str, &str)> = violations
        .iter()
        .map(|v| (v.type_name.as_str(), v.field.as_str()))
        .collect();
    assert_eq!(
        triples,
        vec![("First", "A"), ("First", "B"), ("Second", "C")]
    );
}
