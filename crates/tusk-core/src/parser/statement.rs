//! Statement grammar: SELECT with CTEs, joins, set operations, window
//! clauses, and LIMIT; INSERT with ON CONFLICT; UPDATE with FROM; DELETE.
//! All four accept a trailing RETURNING list where PostgreSQL does.

use super::combinators::{attempt, many, map, one_of, opt, scope, sep_by1, try_map, PResult, ParseState};
use super::expression::{expression, window_spec};
use super::lexer::{identifier, keyword, phrase, symbol};
use crate::ast::{
    ConflictAction, Cte, DeleteStatement, Distinct, InsertSource, InsertStatement, InsertValue,
    JoinKind, JoinSpec, Limit, NamedWindow, NullOrdering, OnConflict, OrderBy, OrderDirection,
    SelectBody, SelectItem, SelectStatement, SetOperation, SetOperator, SetQuantifier, Statement,
    TableExpr, TableName, UpdateAssignment, UpdateStatement,
};

/// Parses any supported statement, including its leading CTE list.
pub(crate) fn statement<'s>(st: &mut ParseState<'s>) -> PResult<Statement> {
    let ctes = opt(with_clause)(st)?.unwrap_or_default();
    if peek_keyword(st, "SELECT") {
        return select_statement(st, ctes).map(Statement::Select);
    }
    if peek_keyword(st, "INSERT") {
        return insert_statement(st, ctes).map(Statement::Insert);
    }
    if peek_keyword(st, "UPDATE") {
        return update_statement(st, ctes).map(Statement::Update);
    }
    if peek_keyword(st, "DELETE") {
        return delete_statement(st, ctes).map(Statement::Delete);
    }
    Err(st.error("a SELECT, INSERT, UPDATE, or DELETE statement"))
}

/// Parses a subquery: a SELECT, optionally preceded by its own CTEs.
pub(crate) fn subquery<'s>(st: &mut ParseState<'s>) -> PResult<Statement> {
    scope("subquery", |st: &mut ParseState<'s>| {
        let ctes = opt(with_clause)(st)?.unwrap_or_default();
        select_statement(st, ctes).map(Statement::Select)
    })(st)
}

fn peek_keyword(st: &mut ParseState<'_>, kw: &'static str) -> bool {
    let start = st.pos();
    let matched = keyword(kw)(st).is_ok();
    st.rewind(start);
    matched
}

fn with_clause<'s>(st: &mut ParseState<'s>) -> PResult<Vec<Cte>> {
    keyword("WITH")(st)?;
    scope("WITH clause", sep_by1(cte, symbol(",")))(st)
}

fn cte<'s>(st: &mut ParseState<'s>) -> PResult<Cte> {
    let name = identifier(st)?;
    let columns = opt(column_name_list)(st)?.unwrap_or_default();
    keyword("AS")(st)?;
    symbol("(")(st)?;
    let query = statement(st)?;
    symbol(")")(st)?;
    Ok(Cte { name, columns, query })
}

fn column_name_list<'s>(st: &mut ParseState<'s>) -> PResult<Vec<String>> {
    symbol("(")(st)?;
    let columns = sep_by1(identifier, symbol(","))(st)?;
    symbol(")")(st)?;
    Ok(columns)
}

fn select_statement<'s>(st: &mut ParseState<'s>, ctes: Vec<Cte>) -> PResult<SelectStatement> {
    let body = select_body(st)?;
    let set_ops = many(set_operation)(st)?;
    let order_by = opt(order_by_clause)(st)?.unwrap_or_default();
    let limit = opt(limit_clause)(st)?;
    Ok(SelectStatement {
        ctes,
        body,
        set_ops,
        order_by,
        limit,
    })
}

fn select_body<'s>(st: &mut ParseState<'s>) -> PResult<SelectBody> {
    keyword("SELECT")(st)?;
    scope("SELECT", |st: &mut ParseState<'s>| {
        let distinct = distinct_clause(st)?;
        let items = sep_by1(select_item, symbol(","))(st)?;
        let from = opt(from_clause)(st)?;
        let where_clause = opt(where_clause)(st)?;
        let group_by = if opt(phrase(&["GROUP", "BY"]))(st)?.is_some() {
            sep_by1(expression, symbol(","))(st)?
        } else {
            Vec::new()
        };
        let having = if opt(keyword("HAVING"))(st)?.is_some() {
            Some(expression(st)?)
        } else {
            None
        };
        let windows = if opt(keyword("WINDOW"))(st)?.is_some() {
            sep_by1(named_window, symbol(","))(st)?
        } else {
            Vec::new()
        };
        Ok(SelectBody {
            distinct,
            items,
            from,
            where_clause,
            group_by,
            having,
            windows,
        })
    })(st)
}

fn distinct_clause<'s>(st: &mut ParseState<'s>) -> PResult<Distinct> {
    if opt(keyword("ALL"))(st)?.is_some() {
        return Ok(Distinct::All);
    }
    if opt(keyword("DISTINCT"))(st)?.is_none() {
        return Ok(Distinct::All);
    }
    if opt(keyword("ON"))(st)?.is_some() {
        symbol("(")(st)?;
        let exprs = sep_by1(expression, symbol(","))(st)?;
        symbol(")")(st)?;
        return Ok(Distinct::On(exprs));
    }
    Ok(Distinct::Rows)
}

fn select_item<'s>(st: &mut ParseState<'s>) -> PResult<SelectItem> {
    one_of((
        map(symbol("*"), |()| SelectItem::Wildcard),
        attempt(table_wildcard),
        select_item_expr,
    ))(st)
}

/// `table.*` shares its prefix with a qualified column, so callers wrap it
/// in `attempt` to back out when the star is missing.
fn table_wildcard<'s>(st: &mut ParseState<'s>) -> PResult<SelectItem> {
    let table = identifier(st)?;
    symbol(".")(st)?;
    symbol("*")(st)?;
    Ok(SelectItem::TableWildcard(table))
}

fn select_item_expr<'s>(st: &mut ParseState<'s>) -> PResult<SelectItem> {
    let expr = expression(st)?;
    let alias = opt(alias_clause)(st)?;
    Ok(SelectItem::Expr { expr, alias })
}

fn alias_clause<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    if opt(keyword("AS"))(st)?.is_some() {
        return identifier(st);
    }
    identifier(st)
}

fn from_clause<'s>(st: &mut ParseState<'s>) -> PResult<TableExpr> {
    keyword("FROM")(st)?;
    scope("FROM clause", table_expression)(st)
}

/// Ways a table expression can continue after its first operand.
enum JoinTail {
    Cross(TableExpr),
    Qualified {
        kind: JoinKind,
        right: TableExpr,
        spec: JoinSpec,
    },
}

fn table_expression<'s>(st: &mut ParseState<'s>) -> PResult<TableExpr> {
    let mut left = table_primary(st)?;
    loop {
        let start = st.pos();
        match join_tail(st) {
            Ok(JoinTail::Cross(right)) => {
                left = TableExpr::CrossJoin {
                    left: Box::new(left),
                    right: Box::new(right),
                };
            }
            Ok(JoinTail::Qualified { kind, right, spec }) => {
                left = TableExpr::Join {
                    kind,
                    left: Box::new(left),
                    right: Box::new(right),
                    spec,
                };
            }
            Err(failure) => {
                if st.pos() == start {
                    return Ok(left);
                }
                return Err(failure);
            }
        }
    }
}

fn join_tail<'s>(st: &mut ParseState<'s>) -> PResult<JoinTail> {
    if opt(symbol(","))(st)?.is_some() || opt(phrase(&["CROSS", "JOIN"]))(st)?.is_some() {
        return Ok(JoinTail::Cross(table_primary(st)?));
    }
    let natural = opt(keyword("NATURAL"))(st)?.is_some();
    let kind = join_kind(st)?;
    let right = table_primary(st)?;
    if natural {
        return Ok(JoinTail::Qualified {
            kind,
            right,
            spec: JoinSpec::Natural,
        });
    }
    if opt(keyword("ON"))(st)?.is_some() {
        let condition = expression(st)?;
        return Ok(JoinTail::Qualified {
            kind,
            right,
            spec: JoinSpec::On(condition),
        });
    }
    keyword("USING")(st)?;
    let columns = column_name_list(st)?;
    Ok(JoinTail::Qualified {
        kind,
        right,
        spec: JoinSpec::Using(columns),
    })
}

fn join_kind<'s>(st: &mut ParseState<'s>) -> PResult<JoinKind> {
    if opt(keyword("JOIN"))(st)?.is_some() {
        return Ok(JoinKind::Inner);
    }
    let kind = one_of((
        map(keyword("INNER"), |()| JoinKind::Inner),
        map(keyword("LEFT"), |()| JoinKind::Left),
        map(keyword("RIGHT"), |()| JoinKind::Right),
        map(keyword("FULL"), |()| JoinKind::Full),
    ))(st)?;
    opt(keyword("OUTER"))(st)?;
    keyword("JOIN")(st)?;
    Ok(kind)
}

fn table_primary<'s>(st: &mut ParseState<'s>) -> PResult<TableExpr> {
    if opt(symbol("("))(st)?.is_some() {
        let query = subquery(st)?;
        symbol(")")(st)?;
        opt(keyword("AS"))(st)?;
        let alias = identifier(st)?;
        return Ok(TableExpr::SubQuery {
            query: Box::new(query),
            alias,
        });
    }
    let first = identifier(st)?;
    let (schema, name) = if opt(symbol("."))(st)?.is_some() {
        (Some(first), identifier(st)?)
    } else {
        (None, first)
    };
    let alias = opt(alias_clause)(st)?;
    Ok(TableExpr::Table { schema, name, alias })
}

fn where_clause<'s>(st: &mut ParseState<'s>) -> PResult<crate::ast::Expr> {
    keyword("WHERE")(st)?;
    scope("WHERE clause", expression)(st)
}

fn named_window<'s>(st: &mut ParseState<'s>) -> PResult<NamedWindow> {
    let name = identifier(st)?;
    keyword("AS")(st)?;
    symbol("(")(st)?;
    let spec = window_spec(st)?;
    symbol(")")(st)?;
    Ok(NamedWindow { name, spec })
}

fn set_operation<'s>(st: &mut ParseState<'s>) -> PResult<SetOperation> {
    let op = one_of((
        map(keyword("UNION"), |()| SetOperator::Union),
        map(keyword("INTERSECT"), |()| SetOperator::Intersect),
        map(keyword("EXCEPT"), |()| SetOperator::Except),
    ))(st)?;
    let quantifier = if opt(keyword("ALL"))(st)?.is_some() {
        SetQuantifier::All
    } else {
        opt(keyword("DISTINCT"))(st)?;
        SetQuantifier::Distinct
    };
    let body = select_body(st)?;
    Ok(SetOperation { op, quantifier, body })
}

/// `ORDER BY` item list. Also used inside window definitions.
pub(crate) fn order_by_clause<'s>(st: &mut ParseState<'s>) -> PResult<Vec<OrderBy>> {
    phrase(&["ORDER", "BY"])(st)?;
    scope("ORDER BY clause", sep_by1(order_by_item, symbol(",")))(st)
}

fn order_by_item<'s>(st: &mut ParseState<'s>) -> PResult<OrderBy> {
    let expr = expression(st)?;
    let direction = opt(one_of((
        map(keyword("ASC"), |()| OrderDirection::Asc),
        map(keyword("DESC"), |()| OrderDirection::Desc),
    )))(st)?;
    let nulls = if opt(keyword("NULLS"))(st)?.is_some() {
        Some(one_of((
            map(keyword("FIRST"), |()| NullOrdering::First),
            map(keyword("LAST"), |()| NullOrdering::Last),
        ))(st)?)
    } else {
        None
    };
    Ok(OrderBy {
        expr,
        direction,
        nulls,
    })
}

/// `LIMIT`/`OFFSET` in either order; `LIMIT ALL` leaves the count empty.
fn limit_clause<'s>(st: &mut ParseState<'s>) -> PResult<Limit> {
    if opt(keyword("LIMIT"))(st)?.is_some() {
        let count = limit_count(st)?;
        let offset = if opt(keyword("OFFSET"))(st)?.is_some() {
            Some(expression(st)?)
        } else {
            None
        };
        return Ok(Limit { count, offset });
    }
    keyword("OFFSET")(st)?;
    let offset = Some(expression(st)?);
    let count = if opt(keyword("LIMIT"))(st)?.is_some() {
        limit_count(st)?
    } else {
        None
    };
    Ok(Limit { count, offset })
}

fn limit_count<'s>(st: &mut ParseState<'s>) -> PResult<Option<crate::ast::Expr>> {
    if opt(keyword("ALL"))(st)?.is_some() {
        return Ok(None);
    }
    expression(st).map(Some)
}

fn table_name<'s>(st: &mut ParseState<'s>) -> PResult<TableName> {
    let first = identifier(st)?;
    if opt(symbol("."))(st)?.is_some() {
        let name = identifier(st)?;
        return Ok(TableName {
            schema: Some(first),
            name,
        });
    }
    Ok(TableName {
        schema: None,
        name: first,
    })
}

fn insert_statement<'s>(st: &mut ParseState<'s>, ctes: Vec<Cte>) -> PResult<InsertStatement> {
    keyword("INSERT")(st)?;
    keyword("INTO")(st)?;
    let table = table_name(st)?;
    let alias = if opt(keyword("AS"))(st)?.is_some() {
        Some(identifier(st)?)
    } else {
        None
    };
    let columns = opt(column_name_list)(st)?.unwrap_or_default();
    let source = insert_source(st)?;
    let on_conflict = opt(on_conflict_clause)(st)?;
    let returning = opt(returning_clause)(st)?.unwrap_or_default();
    Ok(InsertStatement {
        ctes,
        table,
        alias,
        columns,
        source,
        on_conflict,
        returning,
    })
}

fn insert_source<'s>(st: &mut ParseState<'s>) -> PResult<InsertSource> {
    if opt(phrase(&["DEFAULT", "VALUES"]))(st)?.is_some() {
        return Ok(InsertSource::DefaultValues);
    }
    if opt(keyword("VALUES"))(st)?.is_some() {
        let rows = scope("VALUES list", sep_by1(values_row, symbol(",")))(st)?;
        return Ok(InsertSource::Values(rows));
    }
    let ctes = opt(with_clause)(st)?.unwrap_or_default();
    select_statement(st, ctes).map(|query| InsertSource::Query(Box::new(query)))
}

fn values_row<'s>(st: &mut ParseState<'s>) -> PResult<Vec<InsertValue>> {
    symbol("(")(st)?;
    let row = sep_by1(insert_value, symbol(","))(st)?;
    symbol(")")(st)?;
    Ok(row)
}

fn insert_value<'s>(st: &mut ParseState<'s>) -> PResult<InsertValue> {
    if opt(keyword("DEFAULT"))(st)?.is_some() {
        return Ok(InsertValue::Default);
    }
    map(expression, InsertValue::Expr)(st)
}

fn on_conflict_clause<'s>(st: &mut ParseState<'s>) -> PResult<OnConflict> {
    phrase(&["ON", "CONFLICT"])(st)?;
    scope("ON CONFLICT clause", |st: &mut ParseState<'s>| {
        let target = opt(column_name_list)(st)?.unwrap_or_default();
        keyword("DO")(st)?;
        if opt(keyword("NOTHING"))(st)?.is_some() {
            return Ok(OnConflict {
                target,
                action: ConflictAction::DoNothing,
            });
        }
        keyword("UPDATE")(st)?;
        keyword("SET")(st)?;
        let assignments = sep_by1(update_assignment, symbol(","))(st)?;
        Ok(OnConflict {
            target,
            action: ConflictAction::DoUpdate(assignments),
        })
    })(st)
}

fn update_assignment<'s>(st: &mut ParseState<'s>) -> PResult<UpdateAssignment> {
    let column = identifier(st)?;
    symbol("=")(st)?;
    let value = insert_value(st)?;
    Ok(UpdateAssignment { column, value })
}

fn returning_clause<'s>(st: &mut ParseState<'s>) -> PResult<Vec<SelectItem>> {
    keyword("RETURNING")(st)?;
    scope("RETURNING clause", sep_by1(select_item, symbol(",")))(st)
}

fn update_statement<'s>(st: &mut ParseState<'s>, ctes: Vec<Cte>) -> PResult<UpdateStatement> {
    keyword("UPDATE")(st)?;
    let table = table_name(st)?;
    // SET is not a reserved word, so a bare alias must not swallow it.
    let alias = if opt(keyword("AS"))(st)?.is_some() {
        Some(identifier(st)?)
    } else {
        opt(try_map(identifier, |name| {
            if name == "set" {
                Err("an alias".to_owned())
            } else {
                Ok(name)
            }
        }))(st)?
    };
    keyword("SET")(st)?;
    let assignments = sep_by1(update_assignment, symbol(","))(st)?;
    let from = opt(from_clause)(st)?;
    let where_clause = opt(where_clause)(st)?;
    let returning = opt(returning_clause)(st)?.unwrap_or_default();
    Ok(UpdateStatement {
        ctes,
        table,
        alias,
        assignments,
        from,
        where_clause,
        returning,
    })
}

fn delete_statement<'s>(st: &mut ParseState<'s>, ctes: Vec<Cte>) -> PResult<DeleteStatement> {
    keyword("DELETE")(st)?;
    keyword("FROM")(st)?;
    let table = table_name(st)?;
    let alias = if opt(keyword("AS"))(st)?.is_some() {
        Some(identifier(st)?)
    } else {
        opt(identifier)(st)?
    };
    let where_clause = opt(where_clause)(st)?;
    let returning = opt(returning_clause)(st)?.unwrap_or_default();
    Ok(DeleteStatement {
        ctes,
        table,
        alias,
        where_clause,
        returning,
    })
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;
    use crate::ast::Expr;

    fn parse_ok(src: &str) -> Statement {
        parse(src).unwrap_or_else(|failure| panic!("{}", failure.explain(src)))
    }

    fn select_of(statement: Statement) -> SelectStatement {
        match statement {
            Statement::Select(select) => select,
            other => panic!("expected a SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_select() {
        let select = select_of(parse_ok("SELECT 1"));
        assert_eq!(select.body.items.len(), 1);
        assert!(select.body.from.is_none());
        assert!(select.limit.is_none());
    }

    #[test]
    fn test_select_list_aliases_and_wildcards() {
        let select = select_of(parse_ok("SELECT *, t.*, id AS key, id key2 FROM t"));
        assert_eq!(select.body.items[0], SelectItem::Wildcard);
        assert_eq!(select.body.items[1], SelectItem::TableWildcard("t".to_owned()));
        assert_eq!(
            select.body.items[2],
            SelectItem::Expr {
                expr: Expr::column("id"),
                alias: Some("key".to_owned()),
            }
        );
        assert_eq!(
            select.body.items[3],
            SelectItem::Expr {
                expr: Expr::column("id"),
                alias: Some("key2".to_owned()),
            }
        );
    }

    #[test]
    fn test_joins_fold_left_associatively() {
        let select = select_of(parse_ok(
            "SELECT 1 FROM a LEFT JOIN b ON a.id = b.id JOIN c USING (id)",
        ));
        match select.body.from.unwrap() {
            TableExpr::Join { kind, left, spec, .. } => {
                assert_eq!(kind, JoinKind::Inner);
                assert_eq!(spec, JoinSpec::Using(vec!["id".to_owned()]));
                match *left {
                    TableExpr::Join { kind, .. } => assert_eq!(kind, JoinKind::Left),
                    other => panic!("unexpected left side: {other:?}"),
                }
            }
            other => panic!("unexpected from: {other:?}"),
        }
    }

    #[test]
    fn test_comma_sources_and_cross_join_agree() {
        let comma = select_of(parse_ok("SELECT 1 FROM a, b"));
        let spelled = select_of(parse_ok("SELECT 1 FROM a CROSS JOIN b"));
        assert_eq!(comma.body.from, spelled.body.from);
    }

    #[test]
    fn test_natural_and_outer_spellings() {
        let select = select_of(parse_ok("SELECT 1 FROM a NATURAL LEFT OUTER JOIN b"));
        match select.body.from.unwrap() {
            TableExpr::Join { kind, spec, .. } => {
                assert_eq!(kind, JoinKind::Left);
                assert_eq!(spec, JoinSpec::Natural);
            }
            other => panic!("unexpected from: {other:?}"),
        }
    }

    #[test]
    fn test_derived_table_requires_alias() {
        let select = select_of(parse_ok("SELECT x FROM (SELECT 1 AS x) AS sub"));
        match select.body.from.unwrap() {
            TableExpr::SubQuery { alias, .. } => assert_eq!(alias, "sub"),
            other => panic!("unexpected from: {other:?}"),
        }
        assert!(parse("SELECT x FROM (SELECT 1)").is_err());
    }

    #[test]
    fn test_group_by_having_and_windows() {
        let select = select_of(parse_ok(
            "SELECT d, count(*) FROM t GROUP BY d HAVING count(*) > 1 WINDOW w AS (PARTITION BY d)",
        ));
        assert_eq!(select.body.group_by, vec![Expr::column("d")]);
        assert!(select.body.having.is_some());
        assert_eq!(select.body.windows.len(), 1);
        assert_eq!(select.body.windows[0].name, "w");
    }

    #[test]
    fn test_distinct_on_keeps_its_expressions() {
        let select = select_of(parse_ok("SELECT DISTINCT ON (id) id, v FROM t"));
        assert_eq!(select.body.distinct, Distinct::On(vec![Expr::column("id")]));

        let plain = select_of(parse_ok("SELECT DISTINCT id FROM t"));
        assert_eq!(plain.body.distinct, Distinct::Rows);
    }

    #[test]
    fn test_set_operations_chain_in_order() {
        let select = select_of(parse_ok("SELECT 1 UNION ALL SELECT 2 EXCEPT SELECT 3"));
        assert_eq!(select.set_ops.len(), 2);
        assert_eq!(select.set_ops[0].op, SetOperator::Union);
        assert_eq!(select.set_ops[0].quantifier, SetQuantifier::All);
        assert_eq!(select.set_ops[1].op, SetOperator::Except);
        assert_eq!(select.set_ops[1].quantifier, SetQuantifier::Distinct);
    }

    #[test]
    fn test_order_limit_offset_full_form() {
        let select = select_of(parse_ok(
            "SELECT id FROM t ORDER BY id DESC NULLS LAST LIMIT 10 OFFSET 5",
        ));
        assert_eq!(select.order_by.len(), 1);
        assert_eq!(select.order_by[0].direction, Some(OrderDirection::Desc));
        assert_eq!(select.order_by[0].nulls, Some(NullOrdering::Last));
        let limit = select.limit.unwrap();
        assert_eq!(limit.count, Some(Expr::number("10")));
        assert_eq!(limit.offset, Some(Expr::number("5")));
    }

    #[test]
    fn test_offset_before_limit_and_limit_all() {
        let select = select_of(parse_ok("SELECT id FROM t OFFSET 5 LIMIT 1"));
        let limit = select.limit.unwrap();
        assert_eq!(limit.count, Some(Expr::number("1")));
        assert_eq!(limit.offset, Some(Expr::number("5")));

        let select = select_of(parse_ok("SELECT id FROM t LIMIT ALL"));
        let limit = select.limit.unwrap();
        assert!(limit.count.is_none());
        assert!(limit.offset.is_none());
    }

    #[test]
    fn test_ctes_precede_any_statement_kind() {
        let select = select_of(parse_ok(
            "WITH active (id) AS (SELECT id FROM users), latest AS (SELECT max(id) FROM active) \
             SELECT * FROM latest",
        ));
        assert_eq!(select.ctes.len(), 2);
        assert_eq!(select.ctes[0].name, "active");
        assert_eq!(select.ctes[0].columns, vec!["id".to_owned()]);
        assert!(select.ctes[1].columns.is_empty());

        match parse_ok("WITH moved AS (DELETE FROM t RETURNING id) SELECT * FROM moved") {
            Statement::Select(select) => match &select.ctes[0].query {
                Statement::Delete(delete) => assert_eq!(delete.returning.len(), 1),
                other => panic!("unexpected CTE query: {other:?}"),
            },
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_insert_forms() {
        match parse_ok("INSERT INTO t DEFAULT VALUES") {
            Statement::Insert(insert) => {
                assert_eq!(insert.source, InsertSource::DefaultValues);
            }
            other => panic!("unexpected statement: {other:?}"),
        }

        match parse_ok("INSERT INTO s.t AS x (a, b) VALUES (1, DEFAULT), ($1, $2)") {
            Statement::Insert(insert) => {
                assert_eq!(insert.table.schema.as_deref(), Some("s"));
                assert_eq!(insert.alias.as_deref(), Some("x"));
                assert_eq!(insert.columns, vec!["a".to_owned(), "b".to_owned()]);
                match insert.source {
                    InsertSource::Values(rows) => {
                        assert_eq!(rows.len(), 2);
                        assert_eq!(rows[0][1], InsertValue::Default);
                        assert_eq!(rows[1][0], InsertValue::Expr(Expr::Param(1)));
                    }
                    other => panic!("unexpected source: {other:?}"),
                }
            }
            other => panic!("unexpected statement: {other:?}"),
        }

        match parse_ok("INSERT INTO t (a) SELECT id FROM u") {
            Statement::Insert(insert) => {
                assert!(matches!(insert.source, InsertSource::Query(_)));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_insert_on_conflict_actions() {
        match parse_ok("INSERT INTO t (a) VALUES (1) ON CONFLICT (a) DO NOTHING") {
            Statement::Insert(insert) => {
                let on_conflict = insert.on_conflict.unwrap();
                assert_eq!(on_conflict.target, vec!["a".to_owned()]);
                assert_eq!(on_conflict.action, ConflictAction::DoNothing);
            }
            other => panic!("unexpected statement: {other:?}"),
        }

        match parse_ok(
            "INSERT INTO t (a, b) VALUES (1, 2) ON CONFLICT (a) DO UPDATE SET b = $1 RETURNING a",
        ) {
            Statement::Insert(insert) => {
                match insert.on_conflict.unwrap().action {
                    ConflictAction::DoUpdate(assignments) => {
                        assert_eq!(assignments[0].column, "b");
                        assert_eq!(assignments[0].value, InsertValue::Expr(Expr::Param(1)));
                    }
                    ConflictAction::DoNothing => panic!("expected DO UPDATE"),
                }
                assert_eq!(insert.returning.len(), 1);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_update_with_from_and_returning() {
        match parse_ok(
            "UPDATE t SET a = 1, b = DEFAULT FROM u WHERE t.id = u.id RETURNING t.a",
        ) {
            Statement::Update(update) => {
                assert_eq!(update.assignments.len(), 2);
                assert_eq!(update.assignments[1].value, InsertValue::Default);
                assert!(update.from.is_some());
                assert!(update.where_clause.is_some());
                assert_eq!(update.returning.len(), 1);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_update_alias_does_not_swallow_set() {
        match parse_ok("UPDATE t x SET a = 1") {
            Statement::Update(update) => assert_eq!(update.alias.as_deref(), Some("x")),
            other => panic!("unexpected statement: {other:?}"),
        }
        match parse_ok("UPDATE t SET a = 1") {
            Statement::Update(update) => assert!(update.alias.is_none()),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_delete_with_alias_and_where() {
        match parse_ok("DELETE FROM t old WHERE old.id = $1 RETURNING id") {
            Statement::Delete(delete) => {
                assert_eq!(delete.alias.as_deref(), Some("old"));
                assert!(delete.where_clause.is_some());
                assert_eq!(delete.returning.len(), 1);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_semicolon_and_eof_are_enforced() {
        assert!(parse("SELECT 1;").is_ok());
        assert!(parse("SELECT 1; SELECT 2").is_err());
        assert!(parse("SELECT 1 garbage ~").is_err());
    }

    #[test]
    fn test_unsupported_statements_fail_with_a_message() {
        let failure = parse("CREATE TABLE t (id int)").unwrap_err();
        assert!(failure.to_string().contains("SELECT, INSERT, UPDATE, or DELETE"));
    }
}
