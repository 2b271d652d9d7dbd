//! Nullability, parameter, and row-count inference.
//!
//! The entry points take a [`StatementDescription`] produced by the
//! database's describe step, in which every column and parameter is
//! conservatively nullable, and sharpen it from the parsed statement plus
//! real schema metadata: NOT NULL constraints flow out of FROM clauses,
//! outer joins amplify the absent side back to nullable, and expression
//! rules propagate three-valued logic bottom-up through the select list.
//!
//! Schema lookups are the only asynchronous part. The tables of one FROM
//! clause are resolved concurrently; recursion into subqueries and CTE
//! bodies goes through boxed futures.

use futures::future::{try_join, FutureExt, LocalBoxFuture};

use crate::ast::{
    Cte, DeleteStatement, InsertStatement, JoinKind, SelectBody, SelectStatement, Statement,
    TableExpr, TableName, UpdateStatement,
};
use crate::describe::StatementDescription;
use crate::error::InferError;
use crate::schema::{SchemaResolver, Table};
use crate::warn::Warn;

mod nullability;
mod operators;
mod params;
mod row_count;
mod source;

pub use operators::{is_commutative, null_safety, NullSafety};
pub use row_count::statement_row_count;

use nullability::select_list_columns;
use source::{CteEnv, OutputColumn, Scope, SourceTable};

/// Parses `description.sql` and refines the description with inferred
/// column nullability, parameter nullability, and a row-count class.
///
/// A parse failure is not fatal: the description comes back unchanged,
/// still conservatively all-nullable, with a warning carrying the rendered
/// failure. Failures of inference itself propagate as errors.
///
/// # Errors
///
/// Returns an error when a referenced table or column cannot be resolved,
/// when a bare column reference is ambiguous, when the inferred output
/// width disagrees with the described one, or when a schema lookup fails.
pub async fn annotate_statement<R: SchemaResolver>(
    resolver: &R,
    description: StatementDescription,
) -> Result<Warn<StatementDescription>, InferError> {
    match crate::parser::parse(&description.sql) {
        Ok(statement) => infer_statement_nullability(resolver, description, &statement).await,
        Err(failure) => {
            let rendered = failure.explain(&description.sql);
            Ok(Warn::warn(
                description,
                "The SQL statement could not be parsed, so nullability stays conservative",
                rendered,
            ))
        }
    }
}

/// Refines an already-parsed statement's description in place: column
/// nullability from the select or `RETURNING` list, parameter nullability
/// from INSERT/UPDATE target constraints, and the row-count class from the
/// statement shape. Column names and types stay as described by the server.
///
/// # Errors
///
/// Returns an error when a referenced table or column cannot be resolved,
/// when a bare column reference is ambiguous, when the inferred output
/// width disagrees with the described one, or when a schema lookup fails.
pub async fn infer_statement_nullability<R: SchemaResolver>(
    resolver: &R,
    mut description: StatementDescription,
    statement: &Statement,
) -> Result<Warn<StatementDescription>, InferError> {
    let inferrer = Inferrer { resolver };

    let env = CteEnv::root();
    let columns = inferrer.statement_columns(&env, statement).await?;
    if columns.len() != description.columns.len() {
        return Err(InferError::ColumnCountMismatch {
            inferred: columns.len(),
            described: description.columns.len(),
        });
    }
    for (described, inferred) in description.columns.iter_mut().zip(&columns) {
        described.nullable = inferred.nullable;
    }

    let params = inferrer
        .param_nullability(description.params.len(), statement)
        .await?;
    for (described, inferred) in description.params.iter_mut().zip(params) {
        described.nullable = inferred;
    }

    description.row_count = statement_row_count(statement);
    Ok(Warn::new(description))
}

/// Carries the resolver through the recursive walk.
struct Inferrer<'a, R> {
    resolver: &'a R,
}

impl<R: SchemaResolver> Inferrer<'_, R> {
    /// Output columns of a whole statement. Boxed so subqueries and CTE
    /// bodies can recurse.
    fn statement_columns<'b>(
        &'b self,
        env: &'b CteEnv<'b>,
        statement: &'b Statement,
    ) -> LocalBoxFuture<'b, Result<Vec<OutputColumn>, InferError>> {
        async move {
            match statement {
                Statement::Select(select) => self.select_columns(env, select).await,
                Statement::Insert(insert) => self.insert_columns(insert).await,
                Statement::Update(update) => self.update_columns(env, update).await,
                Statement::Delete(delete) => self.delete_columns(delete).await,
            }
        }
        .boxed_local()
    }

    async fn select_columns(
        &self,
        parent: &CteEnv<'_>,
        select: &SelectStatement,
    ) -> Result<Vec<OutputColumn>, InferError> {
        let env = self.cte_env(parent, &select.ctes).await?;
        let mut columns = self.body_columns(&env, &select.body).await?;
        for arm in &select.set_ops {
            let arm_columns = self.body_columns(&env, &arm.body).await?;
            if arm_columns.len() != columns.len() {
                return Err(InferError::ColumnCountMismatch {
                    inferred: arm_columns.len(),
                    described: columns.len(),
                });
            }
            // Output names come from the first arm; a column of the union
            // is nullable as soon as any arm's is.
            for (column, arm_column) in columns.iter_mut().zip(arm_columns) {
                column.nullable = column.nullable || arm_column.nullable;
            }
        }
        Ok(columns)
    }

    async fn insert_columns(
        &self,
        insert: &InsertStatement,
    ) -> Result<Vec<OutputColumn>, InferError> {
        let target = self.resolve_target(&insert.table).await?;
        let alias = insert.alias.as_deref().unwrap_or(&insert.table.name);
        let scope = Scope::new(vec![SourceTable::new(alias, target)]);
        select_list_columns(&scope, &insert.returning)
    }

    async fn update_columns(
        &self,
        parent: &CteEnv<'_>,
        update: &UpdateStatement,
    ) -> Result<Vec<OutputColumn>, InferError> {
        let env = self.cte_env(parent, &update.ctes).await?;
        let target = self.resolve_target(&update.table).await?;
        let alias = update.alias.as_deref().unwrap_or(&update.table.name);
        let mut tables = vec![SourceTable::new(alias, target)];
        if let Some(from) = &update.from {
            tables.extend(self.table_expr_sources(&env, from).await?);
        }
        let scope = Scope::new(tables);
        select_list_columns(&scope, &update.returning)
    }

    async fn delete_columns(
        &self,
        delete: &DeleteStatement,
    ) -> Result<Vec<OutputColumn>, InferError> {
        let target = self.resolve_target(&delete.table).await?;
        let alias = delete.alias.as_deref().unwrap_or(&delete.table.name);
        let scope = Scope::new(vec![SourceTable::new(alias, target)]);
        select_list_columns(&scope, &delete.returning)
    }

    async fn body_columns(
        &self,
        env: &CteEnv<'_>,
        body: &SelectBody,
    ) -> Result<Vec<OutputColumn>, InferError> {
        let tables = match &body.from {
            Some(from) => self.table_expr_sources(env, from).await?,
            None => Vec::new(),
        };
        let scope = Scope::new(tables);
        select_list_columns(&scope, &body.items)
    }

    /// Resolves `WITH` bindings left to right into a child environment, so
    /// later bindings see earlier ones and inner bindings shadow outer.
    async fn cte_env<'p>(
        &self,
        parent: &'p CteEnv<'p>,
        ctes: &[Cte],
    ) -> Result<CteEnv<'p>, InferError> {
        let mut env = CteEnv::child(parent);
        for cte in ctes {
            let mut columns = self.statement_columns(&env, &cte.query).await?;
            for (column, name) in columns.iter_mut().zip(&cte.columns) {
                column.name.clone_from(name);
            }
            env.push(SourceTable::derived(cte.name.as_str(), columns));
        }
        Ok(env)
    }

    /// Source tables bound by a FROM clause, in FROM order. Both sides of a
    /// join are resolved concurrently; the side an outer join can leave
    /// unmatched is amplified to all-nullable.
    fn table_expr_sources<'b>(
        &'b self,
        env: &'b CteEnv<'b>,
        expr: &'b TableExpr,
    ) -> LocalBoxFuture<'b, Result<Vec<SourceTable>, InferError>> {
        async move {
            match expr {
                TableExpr::Table {
                    schema,
                    name,
                    alias,
                } => {
                    let bound = alias.as_deref().unwrap_or(name);
                    // CTEs shadow schema tables, but only for bare names.
                    if schema.is_none() {
                        if let Some(cte) = env.lookup(name) {
                            return Ok(vec![cte.aliased(bound)]);
                        }
                    }
                    let table = self
                        .resolver
                        .resolve_table(schema.as_deref(), name)
                        .await?
                        .ok_or_else(|| InferError::UnknownTable {
                            name: display_name(schema.as_deref(), name),
                        })?;
                    Ok(vec![SourceTable::new(bound, table)])
                }
                TableExpr::SubQuery { query, alias } => {
                    let columns = self.statement_columns(env, query).await?;
                    Ok(vec![SourceTable::derived(alias.as_str(), columns)])
                }
                TableExpr::CrossJoin { left, right } => {
                    let (mut tables, right) = try_join(
                        self.table_expr_sources(env, left),
                        self.table_expr_sources(env, right),
                    )
                    .await?;
                    tables.extend(right);
                    Ok(tables)
                }
                TableExpr::Join {
                    kind, left, right, ..
                } => {
                    let (mut tables, mut right) = try_join(
                        self.table_expr_sources(env, left),
                        self.table_expr_sources(env, right),
                    )
                    .await?;
                    if matches!(kind, JoinKind::Right | JoinKind::Full) {
                        for table in &mut tables {
                            table.amplify();
                        }
                    }
                    if matches!(kind, JoinKind::Left | JoinKind::Full) {
                        for table in &mut right {
                            table.amplify();
                        }
                    }
                    tables.extend(right);
                    Ok(tables)
                }
            }
        }
        .boxed_local()
    }

    /// Parameter nullability per statement kind. Only INSERT and UPDATE
    /// tighten anything; everything else keeps the conservative default.
    async fn param_nullability(
        &self,
        count: usize,
        statement: &Statement,
    ) -> Result<Vec<bool>, InferError> {
        match statement {
            Statement::Insert(insert) => {
                let target = self.resolve_target(&insert.table).await?;
                params::insert_params(count, &target, insert)
            }
            Statement::Update(update) => {
                let target = self.resolve_target(&update.table).await?;
                params::update_params(count, &target, update)
            }
            Statement::Select(_) | Statement::Delete(_) => Ok(vec![true; count]),
        }
    }

    async fn resolve_target(&self, table: &TableName) -> Result<Table, InferError> {
        self.resolver
            .resolve_table(table.schema.as_deref(), &table.name)
            .await?
            .ok_or_else(|| InferError::UnknownTable {
                name: table.to_string(),
            })
    }
}

fn display_name(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) => format!("{schema}.{name}"),
        None => name.to_owned(),
    }
}
