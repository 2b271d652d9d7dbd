//! Source tables and column visibility for one statement level.

use crate::error::InferError;
use crate::schema::{Column, Table};

/// One output column derived for a statement, before it is matched against
/// describe metadata or turned into a derived table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputColumn {
    /// Output name.
    pub(crate) name: String,
    /// Whether the column can be NULL.
    pub(crate) nullable: bool,
}

/// A table bound to its usable alias inside one statement.
#[derive(Debug, Clone)]
pub(crate) struct SourceTable {
    /// The alias column references resolve against.
    pub(crate) alias: String,
    /// The underlying table, real or derived.
    pub(crate) table: Table,
}

impl SourceTable {
    /// Binds a schema table to an alias.
    pub(crate) fn new(alias: impl Into<String>, table: Table) -> Self {
        Self {
            alias: alias.into(),
            table,
        }
    }

    /// Builds a derived table (CTE or `FROM` subquery) from inferred output
    /// columns. Derived columns have no catalog type.
    pub(crate) fn derived(alias: impl Into<String>, columns: Vec<OutputColumn>) -> Self {
        let alias = alias.into();
        let columns = columns
            .into_iter()
            .map(|column| Column::new(column.name, column.nullable, 0))
            .collect();
        Self {
            table: Table {
                name: alias.clone(),
                columns,
            },
            alias,
        }
    }

    /// Rebinds the same table under a different alias.
    pub(crate) fn aliased(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            table: self.table.clone(),
        }
    }

    /// Forces every column nullable, for the absorbable side of an outer
    /// join.
    pub(crate) fn amplify(&mut self) {
        for column in &mut self.table.columns {
            column.nullable = true;
        }
    }
}

/// The tables visible to column references at one statement level, in
/// `FROM` order.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    tables: Vec<SourceTable>,
}

impl Scope {
    pub(crate) fn new(tables: Vec<SourceTable>) -> Self {
        Self { tables }
    }

    /// The visible tables in `FROM` order, for wildcard expansion.
    pub(crate) fn tables(&self) -> &[SourceTable] {
        &self.tables
    }

    /// The table bound to `alias`, if any.
    pub(crate) fn table(&self, alias: &str) -> Option<&SourceTable> {
        self.tables.iter().find(|table| table.alias == alias)
    }

    /// Resolves a column reference.
    ///
    /// Qualified references resolve against the named alias only. Bare
    /// references must match exactly one column across all visible tables.
    pub(crate) fn lookup(
        &self,
        qualifier: Option<&str>,
        column: &str,
    ) -> Result<&Column, InferError> {
        if let Some(alias) = qualifier {
            let table = self.table(alias).ok_or_else(|| InferError::UnknownTable {
                name: alias.to_owned(),
            })?;
            return table
                .table
                .columns
                .iter()
                .find(|c| c.name == column)
                .ok_or_else(|| InferError::UnknownColumn {
                    name: format!("{alias}.{column}"),
                });
        }

        let mut matches = self
            .tables
            .iter()
            .flat_map(|table| &table.table.columns)
            .filter(|c| c.name == column);
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(InferError::AmbiguousColumn {
                name: column.to_owned(),
            }),
            (None, _) => Err(InferError::UnknownColumn {
                name: column.to_owned(),
            }),
        }
    }
}

/// The CTEs visible while resolving table references, innermost statement
/// last. Inner names shadow outer ones; all shadow schema tables.
#[derive(Debug, Default)]
pub(crate) struct CteEnv<'a> {
    tables: Vec<SourceTable>,
    parent: Option<&'a CteEnv<'a>>,
}

impl<'a> CteEnv<'a> {
    /// The environment of a statement with no enclosing statement.
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// A child environment for a nested statement.
    pub(crate) fn child(parent: &'a CteEnv<'a>) -> Self {
        Self {
            tables: Vec::new(),
            parent: Some(parent),
        }
    }

    /// Makes a resolved CTE visible to later CTEs and the statement body.
    pub(crate) fn push(&mut self, table: SourceTable) {
        self.tables.push(table);
    }

    /// Finds a CTE by name, innermost binding first.
    pub(crate) fn lookup(&self, name: &str) -> Option<&SourceTable> {
        self.tables
            .iter()
            .rev()
            .find(|table| table.alias == name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }
}
