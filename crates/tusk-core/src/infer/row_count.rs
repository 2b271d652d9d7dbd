//! Row-count classification, purely from statement syntax.

use crate::ast::{Constant, Expr, InsertSource, InsertStatement, SelectStatement, Statement};
use crate::describe::RowCount;

/// Classifies how many result rows `statement` can produce.
#[must_use]
pub fn statement_row_count(statement: &Statement) -> RowCount {
    match statement {
        Statement::Select(select) => select_row_count(select),
        Statement::Insert(insert) => insert_row_count(insert),
        Statement::Update(update) if update.returning.is_empty() => RowCount::Zero,
        Statement::Delete(delete) if delete.returning.is_empty() => RowCount::Zero,
        Statement::Update(_) | Statement::Delete(_) => RowCount::Many,
    }
}

/// `ZeroOrOne` only when the limit is syntactically the constant `1`.
fn select_row_count(select: &SelectStatement) -> RowCount {
    let count = select.limit.as_ref().and_then(|limit| limit.count.as_ref());
    match count {
        Some(Expr::Constant(Constant::Number(n))) if n == "1" => RowCount::ZeroOrOne,
        _ => RowCount::Many,
    }
}

fn insert_row_count(insert: &InsertStatement) -> RowCount {
    match &insert.source {
        InsertSource::DefaultValues => RowCount::One,
        _ if insert.returning.is_empty() => RowCount::Zero,
        InsertSource::Values(rows) if rows.len() == 1 => RowCount::One,
        InsertSource::Values(_) | InsertSource::Query(_) => RowCount::Many,
    }
}
