//! Error type for the code-generation pipeline.

use std::path::PathBuf;

/// Errors that abort processing of one SQL file.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading a source file or writing its output failed.
    #[error("{path}: {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The server rejected the statement during describe.
    #[error(transparent)]
    Database(#[from] tusk_postgres::PgError),

    /// Inference failed for the statement.
    #[error(transparent)]
    Infer(#[from] tusk_core::InferError),

    /// Type mapping could not query the catalog.
    #[error(transparent)]
    Schema(#[from] tusk_core::SchemaError),
}

impl CliError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CliError>;
