//! Tests for parse failures and their reporting.

mod common;
use common::*;

#[test]
fn error_empty_input() {
    let failure = parse_err("");
    assert_eq!(failure.expected, "a SELECT, INSERT, UPDATE, or DELETE statement");
    assert_eq!(failure.offset, 0);
}

#[test]
fn error_unexpected_keyword() {
    let failure = parse_err("TRUNCATE users");
    assert_eq!(failure.expected, "a SELECT, INSERT, UPDATE, or DELETE statement");
    assert_eq!(failure.offset, 0);
}

#[test]
fn error_incomplete_select() {
    let failure = parse_err("SELECT");
    assert_eq!(failure.offset, 6);
    assert!(failure.scopes.contains(&"SELECT"));
}

#[test]
fn error_missing_from_table() {
    let failure = parse_err("SELECT 1 FROM");
    assert_eq!(failure.expected, "an identifier");
    assert!(failure.scopes.contains(&"FROM clause"));
    assert_eq!(failure.line_col("SELECT 1 FROM"), (1, 14));
}

#[test]
fn error_unclosed_paren() {
    let failure = parse_err("SELECT (1 + 2");
    assert_eq!(failure.expected, "\")\"");
}

#[test]
fn error_join_without_on_or_using() {
    let failure = parse_err("SELECT * FROM a INNER JOIN b WHERE a.id = 1");
    assert_eq!(failure.expected, "USING");
    assert!(failure.scopes.contains(&"FROM clause"));
}

#[test]
fn error_insert_without_into() {
    let failure = parse_err("INSERT users (id) VALUES (1)");
    assert_eq!(failure.expected, "INTO");
}

#[test]
fn error_update_without_set() {
    let failure = parse_err("UPDATE users WHERE id = 1");
    assert_eq!(failure.expected, "SET");
}

#[test]
fn error_recursive_ctes_are_rejected() {
    let failure = parse_err("WITH RECURSIVE t AS (SELECT 1) SELECT * FROM t");
    assert!(failure.scopes.contains(&"WITH clause"));
}

#[test]
fn error_only_select_subqueries_in_from() {
    let failure = parse_err("SELECT 1 FROM (UPDATE t SET n = 1) x");
    assert_eq!(failure.expected, "SELECT");
    assert!(failure.scopes.contains(&"subquery"));
}

#[test]
fn error_trailing_garbage() {
    let failure = parse_err("SELECT 1 2");
    assert_eq!(failure.expected, "end of input");
    assert_eq!(failure.offset, 9);
}

#[test]
fn explain_renders_the_offending_line() {
    let sql = "SELECT id\nFROM users\nWHERE";
    let failure = parse_err(sql);
    let rendered = failure.explain(sql);
    assert!(rendered.contains("line 3, column 6"), "got:\n{rendered}");
    assert!(rendered.contains("WHERE\n     ^"), "got:\n{rendered}");
    assert!(rendered.contains("while parsing WHERE clause"), "got:\n{rendered}");
    assert!(rendered.contains("while parsing SELECT"), "got:\n{rendered}");
}
