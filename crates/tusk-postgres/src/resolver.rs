//! Schema resolution against a live `pg_catalog`.
//!
//! Table names are resolved by the server itself through `to_regclass`, so
//! bare names follow the connection's `search_path` exactly as the statement
//! would at execution time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_postgres::GenericClient;
use tusk_core::{Column, EnumType, SchemaError, SchemaResolver, Table};

use crate::error::Result;

/// Live columns of a relation, in attribute order. System columns and
/// dropped columns carry non-positive or flagged attribute numbers and are
/// excluded.
const TABLE_COLUMNS_SQL: &str = "\
SELECT attname, attnotnull, atttypid
FROM pg_catalog.pg_attribute
WHERE attrelid = $1 AND attnum > 0 AND NOT attisdropped
ORDER BY attnum";

/// Labels of an enum type, in declared order. Yields no rows for OIDs that
/// are not enum types.
const ENUM_LABELS_SQL: &str = "\
SELECT t.typname, e.enumlabel
FROM pg_catalog.pg_type t
JOIN pg_catalog.pg_enum e ON e.enumtypid = t.oid
WHERE t.oid = $1
ORDER BY e.enumsortorder";

/// Resolves table and enum metadata from a live database.
///
/// Enum lookups are memoized, negative results included, since code
/// generation probes every output column's type OID. The cache belongs to
/// this resolver alone; [`clear_cache`](Self::clear_cache) drops it, for
/// callers that keep one resolver alive across DDL changes.
pub struct PgSchemaResolver<'a, C> {
    client: &'a C,
    enum_cache: Mutex<HashMap<u32, Option<EnumType>>>,
}

impl<'a, C: GenericClient> PgSchemaResolver<'a, C> {
    /// Creates a resolver backed by `client`.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            enum_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every memoized enum lookup.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<u32, Option<EnumType>>> {
        self.enum_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Asks the server for the relation's OID. `None` when no visible
    /// relation matches.
    async fn table_oid(&self, schema: Option<&str>, table: &str) -> Result<Option<u32>> {
        let regclass = match schema {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
            None => quote_ident(table),
        };
        let row = self
            .client
            .query_one("SELECT to_regclass($1)::oid", &[&regclass])
            .await?;
        Ok(row.get(0))
    }

    async fn table_columns(&self, oid: u32, table: &str) -> Result<Table> {
        let rows = self.client.query(TABLE_COLUMNS_SQL, &[&oid]).await?;
        let columns = rows
            .iter()
            .map(|row| Column {
                name: row.get("attname"),
                nullable: !row.get::<_, bool>("attnotnull"),
                type_oid: row.get("atttypid"),
            })
            .collect();
        Ok(Table {
            name: table.to_owned(),
            columns,
        })
    }

    async fn enum_labels(&self, oid: u32) -> Result<Option<EnumType>> {
        let rows = self.client.query(ENUM_LABELS_SQL, &[&oid]).await?;
        Ok(rows.first().map(|first| EnumType {
            name: first.get("typname"),
            labels: rows.iter().map(|row| row.get("enumlabel")).collect(),
        }))
    }
}

impl<C: GenericClient> SchemaResolver for PgSchemaResolver<'_, C> {
    async fn resolve_table(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> std::result::Result<Option<Table>, SchemaError> {
        let Some(oid) = self.table_oid(schema, table).await? else {
            return Ok(None);
        };
        Ok(Some(self.table_columns(oid, table).await?))
    }

    async fn resolve_enum(&self, oid: u32) -> std::result::Result<Option<EnumType>, SchemaError> {
        if let Some(cached) = self.cache().get(&oid) {
            return Ok(cached.clone());
        }
        let resolved = self.enum_labels(oid).await?;
        self.cache().insert(oid, resolved.clone());
        Ok(resolved)
    }
}

/// Quotes one identifier part for `to_regclass`.
///
/// The parser already folded unquoted names to lowercase, so quoting here
/// makes the lookup exact without changing which relation is meant.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn test_identifiers_are_quoted_for_regclass() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("UserEvents"), "\"UserEvents\"");
        assert_eq!(quote_ident("odd \" name"), "\"odd \"\" name\"");
    }
}
