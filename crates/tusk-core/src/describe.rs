//! Statement descriptions: the shape a statement produces and consumes.
//!
//! A description starts out conservative (every column and parameter
//! nullable, row count [`RowCount::Many`]) as built by a describe backend,
//! and is then refined by inference.

/// How many result rows a statement can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowCount {
    /// No result rows, e.g. a write without `RETURNING`.
    Zero,
    /// Zero or one row, e.g. `SELECT … LIMIT 1`.
    ZeroOrOne,
    /// Exactly one row, e.g. `INSERT … DEFAULT VALUES`.
    One,
    /// Any number of rows.
    #[default]
    Many,
}

impl RowCount {
    /// Human-readable spelling for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::ZeroOrOne => "zero or one",
            Self::One => "one",
            Self::Many => "many",
        }
    }
}

/// One output column of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Output name as reported by the server.
    pub name: String,
    /// Type OID.
    pub type_oid: u32,
    /// Whether the column can be NULL in any result row.
    pub nullable: bool,
}

/// One positional parameter of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescription {
    /// Type OID.
    pub type_oid: u32,
    /// Whether the caller may pass NULL.
    pub nullable: bool,
}

/// A statement and everything known about its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDescription {
    /// The statement's SQL text.
    pub sql: String,
    /// Output columns in result order.
    pub columns: Vec<ColumnDescription>,
    /// Parameters in `$n` order.
    pub params: Vec<ParamDescription>,
    /// Row-count classification.
    pub row_count: RowCount,
}

impl StatementDescription {
    /// Creates an empty description for `sql` with the conservative
    /// defaults.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            columns: Vec::new(),
            params: Vec::new(),
            row_count: RowCount::Many,
        }
    }
}
