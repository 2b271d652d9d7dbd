//! Error type for the PostgreSQL backend.

use tusk_core::SchemaError;

/// Errors that can occur while talking to the database.
#[derive(Debug, thiserror::Error)]
pub enum PgError {
    /// The server rejected a statement or the connection failed.
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

impl From<PgError> for SchemaError {
    fn from(err: PgError) -> Self {
        Self::new(err.to_string())
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, PgError>;
