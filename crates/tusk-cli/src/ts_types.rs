//! PostgreSQL OID to TypeScript type mapping.
//!
//! Covers the built-in scalar and array types a `node-postgres` client
//! deserializes out of the box. Enum OIDs become string literal unions via
//! the resolver; anything else falls back to `any` with a warning so the
//! generated module still compiles.

use tusk_core::{SchemaError, SchemaResolver, Warn};

/// TypeScript type for a built-in scalar OID, if `pg` has a parser for it.
///
/// `int8` and `numeric` map to `string` because `pg` returns them as
/// strings to avoid losing precision in a JavaScript number.
fn scalar(oid: u32) -> Option<&'static str> {
    let ts = match oid {
        16 => "boolean",
        17 => "Buffer",
        18 | 19 | 20 | 25 | 1042 | 1043 | 1083 | 1186 | 1266 | 1700 | 2950 => "string",
        21 | 23 | 26 | 700 | 701 => "number",
        114 | 3802 => "unknown",
        1082 | 1114 | 1184 => "Date",
        _ => return None,
    };
    Some(ts)
}

/// Element OID for a built-in array OID.
fn element_oid(oid: u32) -> Option<u32> {
    let element = match oid {
        199 => 114,
        1000 => 16,
        1001 => 17,
        1003 => 19,
        1005 => 21,
        1007 => 23,
        1009 => 25,
        1014 => 1042,
        1015 => 1043,
        1016 => 20,
        1021 => 700,
        1022 => 701,
        1028 => 26,
        1115 => 1114,
        1182 => 1082,
        1183 => 1083,
        1185 => 1184,
        1187 => 1186,
        1231 => 1700,
        2951 => 2950,
        3807 => 3802,
        _ => return None,
    };
    Some(element)
}

/// Quotes text as a single-quoted TypeScript string literal.
pub(crate) fn string_literal(label: &str) -> String {
    format!("'{}'", label.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Maps a type OID to the TypeScript type its values deserialize to.
///
/// Unknown OIDs map to `any` and attach a warning rather than failing, so
/// one exotic column does not block generation for the whole file.
///
/// # Errors
///
/// Fails only when the resolver cannot query its catalog.
pub async fn ts_type<R: SchemaResolver>(
    resolver: &R,
    oid: u32,
) -> Result<Warn<String>, SchemaError> {
    if let Some(ts) = scalar(oid) {
        return Ok(Warn::new(ts.to_owned()));
    }
    if let Some(element) = element_oid(oid) {
        if let Some(ts) = scalar(element) {
            return Ok(Warn::new(format!("{ts}[]")));
        }
    }
    if let Some(enum_type) = resolver.resolve_enum(oid).await? {
        let union = enum_type
            .labels
            .iter()
            .map(|label| string_literal(label))
            .collect::<Vec<_>>()
            .join(" | ");
        return Ok(Warn::new(union));
    }
    Ok(Warn::warn(
        "any".to_owned(),
        format!("Unsupported type (oid {oid})"),
        format!(
            "The type with oid {oid} has no TypeScript mapping, so `any` \
             was used. The query still runs, but values of this type are \
             unchecked."
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tusk_core::{EnumType, Table};

    struct FakeCatalog;

    impl SchemaResolver for FakeCatalog {
        async fn resolve_table(
            &self,
            _schema: Option<&str>,
            _table: &str,
        ) -> Result<Option<Table>, SchemaError> {
            Ok(None)
        }

        async fn resolve_enum(&self, oid: u32) -> Result<Option<EnumType>, SchemaError> {
            if oid == 16384 {
                Ok(Some(EnumType {
                    name: "mood".to_owned(),
                    labels: vec!["sad".to_owned(), "it's ok".to_owned(), "happy".to_owned()],
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn map(oid: u32) -> Warn<String> {
        tokio_test::block_on(ts_type(&FakeCatalog, oid)).unwrap()
    }

    #[test]
    fn test_builtin_scalars_map_cleanly() {
        for (oid, expected) in [
            (16, "boolean"),
            (20, "string"),
            (23, "number"),
            (25, "string"),
            (1114, "Date"),
            (1700, "string"),
            (2950, "string"),
            (3802, "unknown"),
        ] {
            let warn = map(oid);
            assert_eq!(warn.payload, expected, "oid {oid}");
            assert!(warn.warnings.is_empty(), "oid {oid}");
        }
    }

    #[test]
    fn test_builtin_arrays_map_to_element_arrays() {
        assert_eq!(map(1007).payload, "number[]");
        assert_eq!(map(1009).payload, "string[]");
        assert_eq!(map(1000).payload, "boolean[]");
        assert_eq!(map(1115).payload, "Date[]");
    }

    #[test]
    fn test_enums_become_literal_unions_with_escaping() {
        let warn = map(16384);
        assert_eq!(warn.payload, "'sad' | 'it\\'s ok' | 'happy'");
        assert!(warn.warnings.is_empty());
    }

    #[test]
    fn test_unknown_oids_fall_back_to_any_with_a_warning() {
        let warn = map(600);
        assert_eq!(warn.payload, "any");
        assert_eq!(warn.warnings.len(), 1);
        assert!(warn.warnings[0].summary.contains("600"));
    }
}
