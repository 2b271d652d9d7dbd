//! # tusk-core
//!
//! A PostgreSQL statement parser and nullability/row-count inference engine.
//!
//! This crate provides:
//! - A hand-written backtracking parser combinator runtime with scoped,
//!   offset-tracking failures
//! - A grammar for a large PostgreSQL subset: SELECT with CTEs, joins, set
//!   operations, window functions, CASE and typecasts; INSERT, UPDATE and
//!   DELETE with RETURNING and ON CONFLICT
//! - Inference that sharpens prepared-statement describe metadata: column
//!   nullability through joins and expressions, parameter nullability from
//!   target-table constraints, and a row-count class per statement shape
//!
//! ## Parsing
//!
//! [`parse`] turns SQL text into a [`Statement`] or a structured failure
//! with a byte offset and grammar-scope breadcrumbs:
//!
//! ```rust
//! use tusk_core::parse;
//!
//! let statement = parse("SELECT id, name FROM users WHERE id = $1")?;
//! assert_eq!(
//!     statement.to_string(),
//!     "SELECT id, name FROM users WHERE id = $1",
//! );
//! # Ok::<(), tusk_core::ParseFailure>(())
//! ```
//!
//! ## Inference
//!
//! Inference starts from a [`StatementDescription`] (normally produced by
//! preparing the statement against a live database; the `tusk-postgres`
//! crate does this) and a [`SchemaResolver`] supplying real NOT NULL
//! constraints:
//!
//! ```rust
//! use tusk_core::{
//!     annotate_statement, Column, ColumnDescription, EnumType, SchemaError,
//!     SchemaResolver, StatementDescription, Table,
//! };
//!
//! struct OneTable;
//!
//! impl SchemaResolver for OneTable {
//!     async fn resolve_table(
//!         &self,
//!         _schema: Option<&str>,
//!         table: &str,
//!     ) -> Result<Option<Table>, SchemaError> {
//!         Ok((table == "users").then(|| Table {
//!             name: "users".to_owned(),
//!             columns: vec![Column::new("id", false, 23)],
//!         }))
//!     }
//!
//!     async fn resolve_enum(&self, _oid: u32) -> Result<Option<EnumType>, SchemaError> {
//!         Ok(None)
//!     }
//! }
//!
//! # fn main() -> Result<(), tusk_core::InferError> {
//! # futures::executor::block_on(async {
//! let mut description = StatementDescription::new("SELECT id FROM users");
//! description.columns.push(ColumnDescription {
//!     name: "id".to_owned(),
//!     type_oid: 23,
//!     nullable: true,
//! });
//!
//! let annotated = annotate_statement(&OneTable, description).await?;
//! assert!(!annotated.payload.columns[0].nullable);
//! # Ok(())
//! # })
//! # }
//! ```

pub mod ast;
pub mod describe;
pub mod error;
pub mod infer;
pub mod parser;
pub mod schema;
pub mod warn;

pub use ast::{Expr, Statement};
pub use describe::{ColumnDescription, ParamDescription, RowCount, StatementDescription};
pub use error::InferError;
pub use infer::{annotate_statement, infer_statement_nullability, statement_row_count};
pub use parser::{parse, ParseFailure};
pub use schema::{Column, EnumType, SchemaError, SchemaResolver, Table};
pub use warn::{Warn, Warning};
