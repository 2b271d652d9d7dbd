//! Tests for SELECT statements: select lists, FROM and joins, grouping,
//! window clauses, ordering, limits, set operations, and CTEs.

mod common;
use common::*;

use tusk_core::ast::{
    Distinct, Expr, JoinKind, JoinSpec, SelectItem, SetOperator, SetQuantifier, Statement,
    TableExpr,
};

#[test]
fn select_without_from() {
    let s = parse_select("SELECT 1");
    assert!(s.body.from.is_none());
    assert_eq!(
        s.body.items,
        vec![SelectItem::Expr {
            expr: Expr::number("1"),
            alias: None,
        }]
    );
    round_trip("SELECT 1");
}

#[test]
fn select_list_aliases() {
    let s = parse_select("SELECT id AS user_id, name username FROM users");
    assert!(matches!(
        &s.body.items[0],
        SelectItem::Expr { alias: Some(a), .. } if a == "user_id"
    ));
    assert!(matches!(
        &s.body.items[1],
        SelectItem::Expr { alias: Some(a), .. } if a == "username"
    ));
    round_trip("SELECT id AS user_id, name AS username FROM users");
}

#[test]
fn wildcard_and_table_wildcard() {
    let s = parse_select("SELECT *, u.* FROM users AS u");
    assert_eq!(s.body.items[0], SelectItem::Wildcard);
    assert_eq!(s.body.items[1], SelectItem::TableWildcard("u".to_owned()));
    round_trip("SELECT *, u.* FROM users AS u");
}

#[test]
fn select_distinct() {
    assert_eq!(parse_select("SELECT DISTINCT x FROM t").body.distinct, Distinct::Rows);
    assert_eq!(parse_select("SELECT ALL x FROM t").body.distinct, Distinct::All);
    round_trip("SELECT DISTINCT x FROM t");
}

#[test]
fn select_distinct_on() {
    let s = parse_select("SELECT DISTINCT ON (dept, grade) name FROM employees");
    assert_eq!(
        s.body.distinct,
        Distinct::On(vec![Expr::column("dept"), Expr::column("grade")])
    );
    round_trip("SELECT DISTINCT ON (dept, grade) name FROM employees");
}

#[test]
fn from_simple_table() {
    let s = parse_select("SELECT * FROM users");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::Table { name, schema: None, alias: None }) if name == "users"
    ));
    round_trip("SELECT * FROM users");
}

#[test]
fn from_table_with_bare_alias() {
    let s = parse_select("SELECT * FROM users u");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::Table { alias: Some(a), .. }) if a == "u"
    ));
    round_trip("SELECT * FROM users AS u");
}

#[test]
fn from_schema_qualified_table() {
    let s = parse_select("SELECT * FROM analytics.events");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::Table { schema: Some(sc), name, .. })
            if sc == "analytics" && name == "events"
    ));
    round_trip("SELECT * FROM analytics.events");
}

#[test]
fn from_subquery_requires_an_alias() {
    let s = parse_select("SELECT t.id FROM (SELECT id FROM users) AS t");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::SubQuery { alias, .. }) if alias == "t"
    ));
    let _ = parse_err("SELECT id FROM (SELECT id FROM users)");
    round_trip("SELECT t.id FROM (SELECT id FROM users) AS t");
}

#[test]
fn join_inner() {
    for sql in [
        "SELECT * FROM a JOIN b ON a.id = b.a_id",
        "SELECT * FROM a INNER JOIN b ON a.id = b.a_id",
    ] {
        let s = parse_select(sql);
        assert!(matches!(
            &s.body.from,
            Some(TableExpr::Join { kind: JoinKind::Inner, spec: JoinSpec::On(_), .. })
        ));
    }
    round_trip("SELECT * FROM a JOIN b ON a.id = b.a_id");
}

#[test]
fn join_outer_kinds() {
    let cases = [
        ("LEFT JOIN", JoinKind::Left),
        ("LEFT OUTER JOIN", JoinKind::Left),
        ("RIGHT JOIN", JoinKind::Right),
        ("FULL OUTER JOIN", JoinKind::Full),
    ];
    for (join, expected) in cases {
        let sql = format!("SELECT * FROM a {join} b ON a.id = b.a_id");
        let s = parse_select(&sql);
        assert!(
            matches!(&s.body.from, Some(TableExpr::Join { kind, .. }) if *kind == expected),
            "wrong kind for {join}"
        );
    }
    round_trip("SELECT * FROM a FULL JOIN b ON a.id = b.a_id");
}

#[test]
fn join_using() {
    let s = parse_select("SELECT * FROM a JOIN b USING (id, tenant_id)");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::Join { spec: JoinSpec::Using(cols), .. })
            if cols == &["id".to_owned(), "tenant_id".to_owned()]
    ));
    round_trip("SELECT * FROM a JOIN b USING (id, tenant_id)");
}

#[test]
fn join_natural() {
    let s = parse_select("SELECT * FROM a NATURAL LEFT JOIN b");
    assert!(matches!(
        &s.body.from,
        Some(TableExpr::Join { kind: JoinKind::Left, spec: JoinSpec::Natural, .. })
    ));
    round_trip("SELECT * FROM a NATURAL LEFT JOIN b");
}

#[test]
fn comma_folds_into_cross_join() {
    let comma = parse_select("SELECT * FROM a, b");
    let explicit = parse_select("SELECT * FROM a CROSS JOIN b");
    assert_eq!(comma.body.from, explicit.body.from);
    round_trip("SELECT * FROM a CROSS JOIN b");
}

#[test]
fn joins_are_left_associative() {
    let s = parse_select("SELECT * FROM a JOIN b ON a.id = b.a_id JOIN c ON b.id = c.b_id");
    let Some(TableExpr::Join { left, right, .. }) = &s.body.from else {
        panic!("Expected a join tree");
    };
    assert!(matches!(&**left, TableExpr::Join { .. }));
    assert!(matches!(&**right, TableExpr::Table { name, .. } if name == "c"));
    round_trip("SELECT * FROM a JOIN b ON a.id = b.a_id JOIN c ON b.id = c.b_id");
}

#[test]
fn group_by_and_having() {
    let s = parse_select("SELECT dept, count(*) FROM employees GROUP BY dept HAVING count(*) > 5");
    assert_eq!(s.body.group_by, vec![Expr::column("dept")]);
    assert!(s.body.having.is_some());
    round_trip("SELECT dept, count(*) FROM employees GROUP BY dept HAVING count(*) > 5");
}

#[test]
fn window_clause_declares_named_windows() {
    let s = parse_select(
        "SELECT rank() OVER w FROM scores WINDOW w AS (PARTITION BY game ORDER BY points DESC)",
    );
    assert_eq!(s.body.windows.len(), 1);
    assert_eq!(s.body.windows[0].name, "w");
    assert_eq!(s.body.windows[0].spec.partition_by, vec![Expr::column("game")]);
    round_trip(
        "SELECT rank() OVER w FROM scores WINDOW w AS (PARTITION BY game ORDER BY points DESC)",
    );
}

#[test]
fn order_by_directions_and_nulls() {
    let s = parse_select("SELECT * FROM t ORDER BY a ASC, b DESC NULLS LAST, c NULLS FIRST");
    assert_eq!(s.order_by.len(), 3);
    assert!(s.order_by[0].nulls.is_none());
    assert!(s.order_by[1].direction.is_some() && s.order_by[1].nulls.is_some());
    assert!(s.order_by[2].direction.is_none());
    round_trip("SELECT * FROM t ORDER BY a ASC, b DESC NULLS LAST, c NULLS FIRST");
}

#[test]
fn limit_and_offset_forms() {
    let s = parse_select("SELECT * FROM t LIMIT 10 OFFSET 20");
    let limit = s.limit.expect("limit should parse");
    assert_eq!(limit.count, Some(Expr::number("10")));
    assert_eq!(limit.offset, Some(Expr::number("20")));

    // PostgreSQL accepts the clauses in either order.
    let swapped = parse_select("SELECT * FROM t OFFSET 20 LIMIT 10");
    assert_eq!(swapped.limit, Some(limit));

    let all = parse_select("SELECT * FROM t LIMIT ALL");
    assert_eq!(all.limit.expect("limit should parse").count, None);

    let offset_only = parse_select("SELECT * FROM t OFFSET 5");
    assert_eq!(offset_only.limit.expect("limit should parse").count, None);

    round_trip("SELECT * FROM t LIMIT 10 OFFSET 20");
    round_trip("SELECT * FROM t LIMIT ALL");
    round_trip("SELECT * FROM t OFFSET 5");
}

#[test]
fn union_and_friends() {
    let s = parse_select("SELECT a FROM t UNION SELECT b FROM u UNION ALL SELECT c FROM v");
    assert_eq!(s.set_ops.len(), 2);
    assert_eq!(s.set_ops[0].op, SetOperator::Union);
    assert_eq!(s.set_ops[0].quantifier, SetQuantifier::Distinct);
    assert_eq!(s.set_ops[1].quantifier, SetQuantifier::All);
    round_trip("SELECT a FROM t UNION SELECT b FROM u UNION ALL SELECT c FROM v");
}

#[test]
fn intersect_and_except() {
    let s = parse_select("SELECT a FROM t INTERSECT SELECT a FROM u EXCEPT DISTINCT SELECT a FROM v");
    assert_eq!(s.set_ops[0].op, SetOperator::Intersect);
    assert_eq!(s.set_ops[1].op, SetOperator::Except);
    assert_eq!(s.set_ops[1].quantifier, SetQuantifier::Distinct);
    round_trip("SELECT a FROM t INTERSECT SELECT a FROM u EXCEPT SELECT a FROM v");
}

#[test]
fn order_by_and_limit_attach_after_set_ops() {
    let s = parse_select("SELECT a FROM t UNION SELECT a FROM u ORDER BY a LIMIT 1");
    assert_eq!(s.set_ops.len(), 1);
    assert_eq!(s.order_by.len(), 1);
    assert!(s.limit.is_some());
    round_trip("SELECT a FROM t UNION SELECT a FROM u ORDER BY a LIMIT 1");
}

#[test]
fn with_single_cte() {
    let s = parse_select("WITH active AS (SELECT id FROM users WHERE active) SELECT id FROM active");
    assert_eq!(s.ctes.len(), 1);
    assert_eq!(s.ctes[0].name, "active");
    assert!(s.ctes[0].columns.is_empty());
    round_trip("WITH active AS (SELECT id FROM users WHERE active) SELECT id FROM active");
}

#[test]
fn with_multiple_ctes_and_column_lists() {
    let s = parse_select(
        "WITH a (x) AS (SELECT 1), b AS (SELECT x FROM a) SELECT x FROM b",
    );
    assert_eq!(s.ctes.len(), 2);
    assert_eq!(s.ctes[0].columns, vec!["x".to_owned()]);
    round_trip("WITH a (x) AS (SELECT 1), b AS (SELECT x FROM a) SELECT x FROM b");
}

#[test]
fn writable_cte() {
    let s = parse_select(
        "WITH moved AS (DELETE FROM queue WHERE done RETURNING id) SELECT id FROM moved",
    );
    assert!(matches!(&s.ctes[0].query, Statement::Delete(_)));
    round_trip("WITH moved AS (DELETE FROM queue WHERE done RETURNING id) SELECT id FROM moved");
}

#[test]
fn subquery_carries_its_own_ctes() {
    let sql = "SELECT t.x FROM (WITH a AS (SELECT 1 AS x) SELECT x FROM a) AS t";
    let s = parse_select(sql);
    let Some(TableExpr::SubQuery { query, .. }) = &s.body.from else {
        panic!("Expected a subquery");
    };
    assert_eq!(query.ctes().len(), 1);
    round_trip(sql);
}

#[test]
fn trailing_semicolon_is_accepted() {
    let _ = parse_ok("SELECT 1;");
}
