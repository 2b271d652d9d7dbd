//! TypeScript module emission.
//!
//! One annotated statement becomes one module: a row interface shaped by
//! the inferred column nullability and an async wrapper whose return type
//! follows the row count classification.

use tusk_core::{RowCount, SchemaError, SchemaResolver, StatementDescription, Warn};

use crate::ts_types::{string_literal, ts_type};

/// Renders the TypeScript module for one statement.
///
/// `stem` is the SQL file name without extension; it drives the function
/// and row interface names. Type-mapping warnings are attached in emission
/// order, columns before parameters.
///
/// # Errors
///
/// Fails only when the resolver cannot query its catalog.
pub async fn generate_module<R: SchemaResolver>(
    resolver: &R,
    stem: &str,
    description: &StatementDescription,
) -> Result<Warn<String>, SchemaError> {
    let mut warnings = Vec::new();

    let function = camel_case(stem);
    let row_type = format!("{}Row", pascal_case(stem));

    let mut fields = Vec::with_capacity(description.columns.len());
    for column in &description.columns {
        let ts = ts_type(resolver, column.type_oid).await?;
        warnings.extend(ts.warnings);
        let ty = if column.nullable {
            format!("{} | null", ts.payload)
        } else {
            ts.payload
        };
        fields.push((property_name(&column.name), ty));
    }

    let mut args = Vec::with_capacity(description.params.len());
    for (index, param) in description.params.iter().enumerate() {
        let ts = ts_type(resolver, param.type_oid).await?;
        warnings.extend(ts.warnings);
        let ty = if param.nullable {
            format!("{} | null", ts.payload)
        } else {
            ts.payload
        };
        args.push(format!("param{}: {}", index + 1, ty));
    }

    // A statement with no output columns is a command; its wrapper
    // resolves to the affected row count whatever the classification says.
    let (return_type, body) = if description.columns.is_empty() {
        ("Promise<number>".to_owned(), "return result.rowCount ?? 0")
    } else {
        match description.row_count {
            RowCount::Zero => ("Promise<number>".to_owned(), "return result.rowCount ?? 0"),
            RowCount::ZeroOrOne => (
                format!("Promise<{row_type} | null>"),
                "return result.rows[0] ?? null",
            ),
            RowCount::One => (format!("Promise<{row_type}>"), "return result.rows[0]"),
            RowCount::Many => (format!("Promise<{row_type}[]>"), "return result.rows"),
        }
    };

    let literal = template_literal(&description.sql);
    let call = if args.is_empty() {
        format!("client.query({literal})")
    } else {
        let names = (1..=args.len())
            .map(|n| format!("param{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("client.query({literal}, [{names}])")
    };

    let mut module = String::new();
    module.push_str("// This file is generated by tusk. Do not edit directly.\n\n");
    module.push_str("import { ClientBase } from 'pg'\n\n");
    if !description.columns.is_empty() {
        module.push_str(&format!("export interface {row_type} {{\n"));
        for (name, ty) in &fields {
            module.push_str(&format!("  {name}: {ty}\n"));
        }
        module.push_str("}\n\n");
    }
    let arg_list = args.iter().map(|arg| format!(", {arg}")).collect::<String>();
    module.push_str(&format!(
        "export async function {function}(client: ClientBase{arg_list}): {return_type} {{\n"
    ));
    module.push_str(&format!("  const result = await {call}\n"));
    module.push_str(&format!("  {body}\n"));
    module.push_str("}\n");

    Ok(Warn::with_warnings(module, warnings))
}

/// Embeds SQL in a backtick template literal.
fn template_literal(sql: &str) -> String {
    let escaped = sql
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    format!("`{escaped}`")
}

/// Renders a column name as an interface property, quoting names that are
/// not plain TypeScript identifiers.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        name.to_owned()
    } else {
        string_literal(name)
    }
}

fn segments(stem: &str) -> Vec<&str> {
    stem.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn pascal_case(stem: &str) -> String {
    let name: String = segments(stem).into_iter().map(capitalize).collect();
    guard_identifier(name, "Query")
}

fn camel_case(stem: &str) -> String {
    let mut name = String::new();
    for (index, segment) in segments(stem).into_iter().enumerate() {
        if index == 0 {
            name.push_str(&lower_first(segment));
        } else {
            name.push_str(&capitalize(segment));
        }
    }
    guard_identifier(name, "query")
}

/// Keeps a derived name usable as a TypeScript identifier.
fn guard_identifier(name: String, fallback: &str) -> String {
    match name.chars().next() {
        None => fallback.to_owned(),
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        Some(_) => name,
    }
}

fn capitalize(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
    out
}

fn lower_first(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_lowercase());
        out.push_str(chars.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use tusk_core::{ColumnDescription, EnumType, ParamDescription, Table};

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
                    labels: vec!["sad".to_owned(), "happy".to_owned()],
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn column(name: &str, type_oid: u32, nullable: bool) -> ColumnDescription {
        ColumnDescription {
            name: name.to_owned(),
            type_oid,
            nullable,
        }
    }

    fn generate(stem: &str, description: &StatementDescription) -> Warn<String> {
        tokio_test::block_on(generate_module(&FakeCatalog, stem, description)).unwrap()
    }

    #[test]
    fn test_select_module_shape() {
        let mut description =
            StatementDescription::new("SELECT id, email FROM users WHERE org_id = $1");
        description.columns = vec![column("id", 23, false), column("email", 25, true)];
        description.params = vec![ParamDescription {
            type_oid: 23,
            nullable: false,
        }];
        description.row_count = RowCount::Many;

        let module = generate("get_active_users", &description);
        assert!(module.warnings.is_empty());
        assert_eq!(
            module.payload,
            "\
// This file is generated by tusk. Do not edit directly.

import { ClientBase } from 'pg'

export interface GetActiveUsersRow {
  id: number
  email: string | null
}

export async function getActiveUsers(client: ClientBase, param1: number): Promise<GetActiveUsersRow[]> {
  const result = await client.query(`SELECT id, email FROM users WHERE org_id = $1`, [param1])
  return result.rows
}
"
        );
    }

    #[test]
    fn test_single_row_lookup_returns_row_or_null() {
        let mut description = StatementDescription::new("SELECT id FROM users WHERE id = $1");
        description.columns = vec![column("id", 23, false)];
        description.params = vec![ParamDescription {
            type_oid: 23,
            nullable: false,
        }];
        description.row_count = RowCount::ZeroOrOne;

        let module = generate("user_by_id", &description);
        assert!(module
            .payload
            .contains("): Promise<UserByIdRow | null> {"));
        assert!(module.payload.contains("return result.rows[0] ?? null"));
    }

    #[test]
    fn test_command_without_returning_yields_row_count() {
        let mut description = StatementDescription::new("DELETE FROM users WHERE id = $1");
        description.params = vec![ParamDescription {
            type_oid: 23,
            nullable: false,
        }];
        description.row_count = RowCount::Zero;

        let module = generate("delete_user", &description);
        assert!(!module.payload.contains("export interface"));
        assert!(module.payload.contains("): Promise<number> {"));
        assert!(module.payload.contains("return result.rowCount ?? 0"));
    }

    #[test]
    fn test_nullable_params_widen_with_null() {
        let mut description = StatementDescription::new("SELECT $1::int AS n");
        description.columns = vec![column("n", 23, true)];
        description.params = vec![ParamDescription {
            type_oid: 23,
            nullable: true,
        }];

        let module = generate("echo", &description);
        assert!(module
            .payload
            .contains("echo(client: ClientBase, param1: number | null)"));
    }

    #[test]
    fn test_enum_columns_render_as_literal_unions() {
        let mut description = StatementDescription::new("SELECT mood FROM people");
        description.columns = vec![column("mood", 16384, true)];

        let module = generate("moods", &description);
        assert!(module.payload.contains("mood: 'sad' | 'happy' | null\n"));
    }

    #[test]
    fn test_sql_is_escaped_for_the_template_literal() {
        let mut description =
            StatementDescription::new("SELECT '`${x}`' AS quoted, E'\\\\' AS backslash");
        description.columns = vec![column("quoted", 25, true), column("backslash", 25, true)];

        let module = generate("tricky", &description);
        assert!(module
            .payload
            .contains("`SELECT '\\`\\${x}\\`' AS quoted, E'\\\\\\\\' AS backslash`"));
    }

    #[test]
    fn test_awkward_column_names_are_quoted() {
        let mut description = StatementDescription::new("SELECT count(*) FROM users");
        description.columns = vec![column("count", 20, false), column("max(age)", 23, true)];

        let module = generate("stats", &description);
        assert!(module.payload.contains("  count: string\n"));
        assert!(module.payload.contains("  'max(age)': number | null\n"));
    }

    #[test]
    fn test_names_derive_from_the_file_stem() {
        assert_eq!(camel_case("get_active_users"), "getActiveUsers");
        assert_eq!(camel_case("GetUsers"), "getUsers");
        assert_eq!(camel_case("2fa-codes"), "_2faCodes");
        assert_eq!(pascal_case("user.by.id"), "UserById");
        assert_eq!(camel_case("--"), "query");
    }

    #[test]
    fn test_type_warnings_surface_in_emission_order() {
        let mut description = StatementDescription::new("SELECT p FROM shapes WHERE c = $1");
        description.columns = vec![column("p", 600, true)];
        description.params = vec![ParamDescription {
            type_oid: 718,
            nullable: true,
        }];

        let module = generate("shapes", &description);
        assert_eq!(module.warnings.len(), 2);
        assert!(module.warnings[0].summary.contains("600"));
        assert!(module.warnings[1].summary.contains("718"));
        assert!(module.payload.contains("p: any | null\n"));
        assert!(module.payload.contains("param1: any | null"));
    }
}
