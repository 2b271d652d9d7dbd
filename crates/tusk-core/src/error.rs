//! Fatal inference failures.
//!
//! Parse failures are not here: they are recoverable (see
//! [`crate::infer::annotate_statement`]'s degraded mode) and live in
//! [`crate::parser::ParseFailure`]. Everything below aborts the affected
//! statement's inference.

use crate::schema::SchemaError;

/// A failure that aborts inference for one statement.
#[derive(Debug, thiserror::Error)]
pub enum InferError {
    /// A referenced table exists neither in the schema nor among the
    /// statement's CTEs.
    #[error("unknown table: {name}")]
    UnknownTable {
        /// The name as written, including any schema qualifier.
        name: String,
    },

    /// A column reference matched no source table column.
    #[error("unknown column: {name}")]
    UnknownColumn {
        /// The reference as written, including any table qualifier.
        name: String,
    },

    /// A bare column name matched columns in more than one source table.
    #[error("ambiguous column: {name}")]
    AmbiguousColumn {
        /// The bare column name.
        name: String,
    },

    /// The inferred select-list width disagrees with the describe metadata.
    /// This indicates a bug in the inference engine, not bad input.
    #[error(
        "internal error: inferred {inferred} output columns but the statement \
         describes {described}; please file a bug report with the statement"
    )]
    ColumnCountMismatch {
        /// Columns the engine derived from the AST.
        inferred: usize,
        /// Columns the describe metadata reports.
        described: usize,
    },

    /// The backing catalog failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
