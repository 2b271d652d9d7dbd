//! Schema metadata and the resolver capability inference depends on.
//!
//! The engine itself never touches a database: anything that can answer
//! [`SchemaResolver`] lookups works, from a live `pg_catalog` session to an
//! in-memory fixture in tests.

/// One column of a schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Whether the column may hold NULL (no `NOT NULL` constraint).
    pub nullable: bool,
    /// The column type's OID in the source catalog. Zero for columns of
    /// derived tables, which have no catalog entry.
    pub type_oid: u32,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, nullable: bool, type_oid: u32) -> Self {
        Self {
            name: name.into(),
            nullable,
            type_oid,
        }
    }
}

/// A table with its ordered column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name, unqualified.
    pub name: String,
    /// Columns in attribute order.
    pub columns: Vec<Column>,
}

/// An enum type: its name and ordered labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Type name, unqualified.
    pub name: String,
    /// Labels in declared order.
    pub labels: Vec<String>,
}

/// The backing catalog failed to answer a lookup.
///
/// Distinct from "not found", which resolvers report as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
#[error("schema lookup failed: {0}")]
pub struct SchemaError(String);

impl SchemaError {
    /// Creates an error from a backend-specific message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Capability to resolve table and enum metadata by name.
///
/// `resolve_table` feeds nullability inference; `resolve_enum` feeds type
/// mapping in code generators and is never called by inference itself.
#[allow(async_fn_in_trait)]
pub trait SchemaResolver {
    /// Resolves a table, honouring the backend's name resolution rules
    /// (e.g. `search_path`) when `schema` is `None`.
    ///
    /// # Errors
    ///
    /// Fails only when the backing catalog cannot be queried; a missing
    /// table is `Ok(None)`.
    async fn resolve_table(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Option<Table>, SchemaError>;

    /// Resolves an enum type by OID. Non-enum OIDs resolve to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Fails only when the backing catalog cannot be queried.
    async fn resolve_enum(&self, oid: u32) -> Result<Option<EnumType>, SchemaError>;
}
