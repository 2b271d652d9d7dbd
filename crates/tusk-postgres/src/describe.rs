//! Prepared-statement describe: the server's view of a statement's shape.

use tokio_postgres::GenericClient;
use tusk_core::{ColumnDescription, ParamDescription, StatementDescription};

use crate::error::Result;

/// Prepares `sql` and captures the resulting column and parameter types.
///
/// The description is deliberately conservative: every column and parameter
/// is marked nullable and the row count is `Many`. Inference in `tusk-core`
/// sharpens it from there.
///
/// # Errors
///
/// Fails when the server rejects the statement, for a syntax error, an
/// unknown relation or column, or a closed connection.
pub async fn describe_statement<C: GenericClient>(
    client: &C,
    sql: &str,
) -> Result<StatementDescription> {
    let statement = client.prepare(sql).await?;

    let mut description = StatementDescription::new(sql);
    description.columns = statement
        .columns()
        .iter()
        .map(|column| ColumnDescription {
            name: column.name().to_owned(),
            type_oid: column.type_().oid(),
            nullable: true,
        })
        .collect();
    description.params = statement
        .params()
        .iter()
        .map(|ty| ParamDescription {
            type_oid: ty.oid(),
            nullable: true,
        })
        .collect();
    Ok(description)
}
