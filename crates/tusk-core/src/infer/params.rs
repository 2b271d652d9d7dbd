//! Parameter nullability from write-statement shapes.
//!
//! Describe metadata cannot say whether a statement accepts NULL for `$n`,
//! so every parameter starts nullable. A parameter written directly as a
//! value for a NOT NULL target column (an INSERT VALUES cell, or an
//! UPDATE / ON CONFLICT `SET column = $n` assignment) would be rejected by
//! the database when NULL, so those tighten to non-nullable.

use crate::ast::{
    ConflictAction, Expr, InsertSource, InsertStatement, InsertValue, UpdateAssignment,
    UpdateStatement,
};
use crate::error::InferError;
use crate::schema::{Column, Table};

/// Parameter nullability for an INSERT against its resolved target table.
pub(crate) fn insert_params(
    count: usize,
    target: &Table,
    insert: &InsertStatement,
) -> Result<Vec<bool>, InferError> {
    let mut params = vec![true; count];

    if let InsertSource::Values(rows) = &insert.source {
        let cells: Vec<&Column> = if insert.columns.is_empty() {
            target.columns.iter().collect()
        } else {
            insert
                .columns
                .iter()
                .map(|name| named_column(target, name))
                .collect::<Result<_, _>>()?
        };
        for row in rows {
            for (value, column) in row.iter().zip(&cells) {
                mark(&mut params, value, column);
            }
        }
    }

    if let Some(on_conflict) = &insert.on_conflict {
        if let ConflictAction::DoUpdate(assignments) = &on_conflict.action {
            mark_assignments(&mut params, target, assignments)?;
        }
    }

    Ok(params)
}

/// Parameter nullability for an UPDATE against its resolved target table.
pub(crate) fn update_params(
    count: usize,
    target: &Table,
    update: &UpdateStatement,
) -> Result<Vec<bool>, InferError> {
    let mut params = vec![true; count];
    mark_assignments(&mut params, target, &update.assignments)?;
    Ok(params)
}

fn mark_assignments(
    params: &mut [bool],
    target: &Table,
    assignments: &[UpdateAssignment],
) -> Result<(), InferError> {
    for assignment in assignments {
        let column = named_column(target, &assignment.column)?;
        mark(params, &assignment.value, column);
    }
    Ok(())
}

fn mark(params: &mut [bool], value: &InsertValue, column: &Column) {
    if column.nullable {
        return;
    }
    if let InsertValue::Expr(Expr::Param(index)) = value {
        if let Some(slot) = params.get_mut(*index as usize - 1) {
            *slot = false;
        }
    }
}

fn named_column<'t>(target: &'t Table, name: &str) -> Result<&'t Column, InferError> {
    target
        .columns
        .iter()
        .find(|column| column.name == name)
        .ok_or_else(|| InferError::UnknownColumn {
            name: format!("{}.{name}", target.name),
        })
}
