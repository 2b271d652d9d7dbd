//! Tests for function calls: arguments, aggregates with DISTINCT and
//! FILTER, window specifications, and the special keyword-argument forms.

mod common;
use common::*;

use tusk_core::ast::{Expr, FrameBound, FrameUnit, SelectItem};

fn expr(fragment: &str) -> Expr {
    let s = parse_select(&format!("SELECT {fragment}"));
    match s.body.items.into_iter().next() {
        Some(SelectItem::Expr { expr, .. }) => expr,
        other => panic!("Expected an expression item, got {other:?}"),
    }
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::FunctionCall {
        schema: None,
        name: name.to_owned(),
        distinct: false,
        args,
        filter: None,
        window: None,
    }
}

#[test]
fn plain_calls() {
    assert_eq!(expr("now()"), call("now", vec![]));
    assert_eq!(
        expr("coalesce(a, b, 0)"),
        call(
            "coalesce",
            vec![Expr::column("a"), Expr::column("b"), Expr::number("0")],
        )
    );
    round_trip("SELECT coalesce(a, b, 0) FROM t");
}

#[test]
fn count_star() {
    assert_eq!(expr("count(*)"), call("count", vec![Expr::Star]));
    round_trip("SELECT count(*) FROM t");
}

#[test]
fn schema_qualified_call() {
    assert!(matches!(
        expr("pg_catalog.lower(name)"),
        Expr::FunctionCall { schema: Some(schema), name, .. }
            if schema == "pg_catalog" && name == "lower"
    ));
    round_trip("SELECT pg_catalog.lower(name) FROM t");
}

#[test]
fn distinct_argument_lists() {
    assert!(matches!(
        expr("count(DISTINCT dept)"),
        Expr::FunctionCall { distinct: true, .. }
    ));
    round_trip("SELECT count(DISTINCT dept) FROM employees");
}

#[test]
fn aggregate_filter() {
    let parsed = expr("count(*) FILTER (WHERE active)");
    assert!(matches!(
        parsed,
        Expr::FunctionCall { filter: Some(condition), .. }
            if *condition == Expr::column("active")
    ));
    round_trip("SELECT count(*) FILTER (WHERE active) FROM t");
}

#[test]
fn window_over_inline_spec() {
    let parsed = expr("sum(amount) OVER (PARTITION BY account ORDER BY posted_at)");
    let Expr::FunctionCall { window: Some(window), .. } = parsed else {
        panic!("Expected a windowed call");
    };
    assert!(window.existing.is_none());
    assert_eq!(window.partition_by, vec![Expr::column("account")]);
    assert_eq!(window.order_by.len(), 1);
    round_trip("SELECT sum(amount) OVER (PARTITION BY account ORDER BY posted_at) FROM ledger");
}

#[test]
fn window_over_named_reference() {
    let parsed = expr("rank() OVER w");
    assert!(matches!(
        parsed,
        Expr::FunctionCall { window: Some(window), .. }
            if window.existing.as_deref() == Some("w") && window.is_bare_reference()
    ));
}

#[test]
fn window_frames() {
    let parsed = expr("sum(x) OVER (ORDER BY y ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)");
    let Expr::FunctionCall { window: Some(window), .. } = parsed else {
        panic!("Expected a windowed call");
    };
    let frame = window.frame.expect("frame should parse");
    assert_eq!(frame.unit, FrameUnit::Rows);
    assert_eq!(frame.start, FrameBound::Preceding(Box::new(Expr::number("2"))));
    assert_eq!(frame.end, Some(FrameBound::CurrentRow));
    round_trip("SELECT sum(x) OVER (ORDER BY y ROWS BETWEEN 2 PRECEDING AND CURRENT ROW) FROM t");
}

#[test]
fn unbounded_frame_without_between() {
    let parsed = expr("sum(x) OVER (RANGE UNBOUNDED PRECEDING)");
    let Expr::FunctionCall { window: Some(window), .. } = parsed else {
        panic!("Expected a windowed call");
    };
    let frame = window.frame.expect("frame should parse");
    assert_eq!(frame.unit, FrameUnit::Range);
    assert_eq!(frame.start, FrameBound::UnboundedPreceding);
    assert_eq!(frame.end, None);
    round_trip("SELECT sum(x) OVER (RANGE UNBOUNDED PRECEDING) FROM t");
}

#[test]
fn substring_keyword_form() {
    assert_eq!(
        expr("substring(name FROM 2 FOR 3)"),
        call(
            "substring",
            vec![Expr::column("name"), Expr::number("2"), Expr::number("3")],
        )
    );
    round_trip("SELECT substring(name, 2, 3) FROM t");
}

#[test]
fn trim_keyword_form() {
    assert_eq!(
        expr("trim(BOTH 'x' FROM name)"),
        call("trim", vec![Expr::string("x"), Expr::column("name")])
    );
}

#[test]
fn position_keyword_form() {
    assert_eq!(
        expr("position('@' IN email)"),
        call("position", vec![Expr::string("@"), Expr::column("email")])
    );
}

#[test]
fn overlay_keyword_form() {
    assert_eq!(
        expr("overlay(code PLACING 'XX' FROM 3 FOR 2)"),
        call(
            "overlay",
            vec![
                Expr::column("code"),
                Expr::string("XX"),
                Expr::number("3"),
                Expr::number("2"),
            ],
        )
    );
}

#[test]
fn nested_calls() {
    assert_eq!(
        expr("coalesce(upper(name), 'N/A')"),
        call(
            "coalesce",
            vec![call("upper", vec![Expr::column("name")]), Expr::string("N/A")],
        )
    );
    round_trip("SELECT coalesce(upper(name), 'N/A') FROM t");
}
