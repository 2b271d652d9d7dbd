#![allow(dead_code)]

use tusk_core::ast::{
    DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement,
};
use tusk_core::{parse, ParseFailure};

pub fn parse_ok(sql: &str) -> Statement {
    parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\n{}", e.explain(sql)))
}

pub fn parse_err(sql: &str) -> ParseFailure {
    parse(sql).expect_err(&format!("Expected parse failure for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse_ok(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse_ok(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse_ok(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse_ok(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Verifies that rendering is a fixed point: parsing the rendered text
/// yields an equal tree, and rendering that tree yields the same text.
pub fn round_trip(sql: &str) {
    let ast1 = parse_ok(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse_ok(&rendered1);
    assert_eq!(
        ast1, ast2,
        "Round-trip changed the tree.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
