//! # tusk-postgres
//!
//! The live-database backend for `tusk-core`'s inference engine.
//!
//! Two capabilities live here, both generic over
//! [`tokio_postgres::GenericClient`] so they work through a plain
//! connection or inside a transaction:
//!
//! - [`PgSchemaResolver`] answers `tusk_core`'s [`SchemaResolver`] lookups
//!   from `pg_catalog`, deferring name resolution (including `search_path`)
//!   to the server.
//! - [`describe_statement`] prepares a statement and captures the server's
//!   view of its columns and parameters as a conservative
//!   [`StatementDescription`] for inference to sharpen.
//!
//! [`SchemaResolver`]: tusk_core::SchemaResolver
//! [`StatementDescription`]: tusk_core::StatementDescription

pub mod describe;
pub mod error;
pub mod resolver;

pub use describe::describe_statement;
pub use error::PgError;
pub use resolver::PgSchemaResolver;
