//! Expression and select-list nullability rules.
//!
//! Rules are bottom-up over the expression tree and conservative: a result
//! is reported non-null only when SQL guarantees it. Subqueries nested
//! inside expressions are opaque; their contents are not inspected, so a
//! scalar subquery is always nullable (zero rows produce NULL) and `EXISTS`
//! never is. Every subexpression is still walked so unknown or ambiguous
//! column references surface as fatal errors wherever they appear.

use crate::ast::{AnyAllOperand, Constant, Expr, SelectItem, WindowSpec};
use crate::error::InferError;

use super::operators::{null_safety, NullSafety};
use super::source::{OutputColumn, Scope};

/// Whether `expr` can evaluate to NULL under three-valued logic.
pub(crate) fn expression_nullability(scope: &Scope, expr: &Expr) -> Result<bool, InferError> {
    match expr {
        Expr::Column { table, name } => Ok(scope.lookup(table.as_deref(), name)?.nullable),
        Expr::Constant(constant) => Ok(matches!(constant, Constant::Null)),
        Expr::Param(_) => Ok(true),
        // Reachable only as a function argument, as in count(*).
        Expr::Star => Ok(false),
        Expr::Unary { op, operand } => {
            let operand = expression_nullability(scope, operand)?;
            Ok(apply_class(null_safety(op), operand))
        }
        Expr::Binary { lhs, op, rhs } => {
            let lhs = expression_nullability(scope, lhs)?;
            let rhs = expression_nullability(scope, rhs)?;
            Ok(apply_class(null_safety(op), lhs || rhs))
        }
        Expr::Ternary { lhs, op, mid, rhs } => {
            let lhs = expression_nullability(scope, lhs)?;
            let mid = expression_nullability(scope, mid)?;
            let rhs = expression_nullability(scope, rhs)?;
            Ok(apply_class(null_safety(op), lhs || mid || rhs))
        }
        Expr::Exists(_) | Expr::ArraySubquery(_) => Ok(false),
        Expr::ScalarSubquery(_) => Ok(true),
        Expr::InList { lhs, list, .. } => {
            for element in list {
                expression_nullability(scope, element)?;
            }
            expression_nullability(scope, lhs)
        }
        Expr::InSubquery { lhs, .. } => expression_nullability(scope, lhs),
        Expr::AnyAll { lhs, operand, .. } => {
            if let AnyAllOperand::Array(array) = operand {
                expression_nullability(scope, array)?;
            }
            expression_nullability(scope, lhs)
        }
        Expr::FunctionCall {
            args,
            filter,
            window,
            ..
        } => {
            let mut nullable = false;
            for arg in args {
                nullable = expression_nullability(scope, arg)? || nullable;
            }
            if let Some(condition) = filter {
                expression_nullability(scope, condition)?;
            }
            if let Some(spec) = window {
                walk_window(scope, spec)?;
            }
            Ok(nullable)
        }
        Expr::Case {
            branches,
            else_branch,
        } => {
            let mut nullable = match else_branch {
                Some(result) => expression_nullability(scope, result)?,
                // No ELSE: an unmatched CASE yields NULL.
                None => true,
            };
            for branch in branches {
                expression_nullability(scope, &branch.condition)?;
                nullable = expression_nullability(scope, &branch.result)? || nullable;
            }
            Ok(nullable)
        }
        // Out-of-range subscripts yield NULL whatever the array is.
        Expr::Subscript { operand, index } => {
            expression_nullability(scope, operand)?;
            expression_nullability(scope, index)?;
            Ok(true)
        }
        Expr::Cast { operand, .. } => expression_nullability(scope, operand),
    }
}

const fn apply_class(class: NullSafety, operands_nullable: bool) -> bool {
    match class {
        NullSafety::Safe => operands_nullable,
        NullSafety::Unsafe | NullSafety::AlwaysNull => true,
        NullSafety::NeverNull => false,
    }
}

fn walk_window(scope: &Scope, spec: &WindowSpec) -> Result<(), InferError> {
    for expr in &spec.partition_by {
        expression_nullability(scope, expr)?;
    }
    for item in &spec.order_by {
        expression_nullability(scope, &item.expr)?;
    }
    Ok(())
}

/// Expands a select or `RETURNING` list into named output columns with
/// inferred nullability. Wildcards flatten the scope's tables in `FROM`
/// order.
pub(crate) fn select_list_columns(
    scope: &Scope,
    items: &[SelectItem],
) -> Result<Vec<OutputColumn>, InferError> {
    let mut columns = Vec::new();
    for item in items {
        match item {
            SelectItem::Wildcard => {
                for table in scope.tables() {
                    columns.extend(table.table.columns.iter().map(|column| OutputColumn {
                        name: column.name.clone(),
                        nullable: column.nullable,
                    }));
                }
            }
            SelectItem::TableWildcard(alias) => {
                let table = scope.table(alias).ok_or_else(|| InferError::UnknownTable {
                    name: alias.clone(),
                })?;
                columns.extend(table.table.columns.iter().map(|column| OutputColumn {
                    name: column.name.clone(),
                    nullable: column.nullable,
                }));
            }
            SelectItem::Expr { expr, alias } => columns.push(OutputColumn {
                name: alias
                    .clone()
                    .unwrap_or_else(|| output_name(expr).to_owned()),
                nullable: expression_nullability(scope, expr)?,
            }),
        }
    }
    Ok(columns)
}

/// The output name PostgreSQL derives for an unaliased expression.
fn output_name(expr: &Expr) -> &str {
    match expr {
        Expr::Column { name, .. } | Expr::FunctionCall { name, .. } => name,
        Expr::Cast { operand, .. } => output_name(operand),
        _ => "?column?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CaseBranch;
    use crate::schema::{Column, Table};
    use super::super::source::SourceTable;

    fn scope() -> Scope {
        Scope::new(vec![SourceTable::new(
            "t",
            Table {
                name: "t".to_owned(),
                columns: vec![
                    Column::new("id", false, 23),
                    Column::new("bio", true, 25),
                ],
            },
        )])
    }

    fn nullable(expr: &Expr) -> bool {
        expression_nullability(&scope(), expr).unwrap()
    }

    #[test]
    fn test_constants_and_params() {
        assert!(!nullable(&Expr::number("1")));
        assert!(!nullable(&Expr::string("x")));
        assert!(!nullable(&Expr::Constant(Constant::True)));
        assert!(nullable(&Expr::Constant(Constant::Null)));
        assert!(nullable(&Expr::Param(1)));
    }

    #[test]
    fn test_columns_resolve_through_the_scope() {
        assert!(!nullable(&Expr::column("id")));
        assert!(nullable(&Expr::qualified_column("t", "bio")));
        assert!(matches!(
            expression_nullability(&scope(), &Expr::column("nosuch")),
            Err(InferError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_strict_binary_operators_or_their_operands() {
        let non_null = Expr::binary(Expr::column("id"), "+", Expr::number("1"));
        assert!(!nullable(&non_null));
        let mixed = Expr::binary(Expr::column("id"), "+", Expr::column("bio"));
        assert!(nullable(&mixed));
    }

    #[test]
    fn test_unknown_operators_are_nullable_even_on_non_null_operands() {
        let json = Expr::binary(Expr::column("id"), "->", Expr::string("key"));
        assert!(nullable(&json));
    }

    #[test]
    fn test_is_null_is_never_null() {
        let tested = Expr::unary("IS NULL", Expr::column("bio"));
        assert!(!nullable(&tested));
        let negated = Expr::unary("NOT", Expr::column("bio"));
        assert!(nullable(&negated));
    }

    #[test]
    fn test_between_is_strict_across_all_three_operands() {
        let strict = Expr::Ternary {
            lhs: Box::new(Expr::column("id")),
            op: "BETWEEN".to_owned(),
            mid: Box::new(Expr::number("1")),
            rhs: Box::new(Expr::number("9")),
        };
        assert!(!nullable(&strict));
        let with_null_bound = Expr::Ternary {
            lhs: Box::new(Expr::column("id")),
            op: "BETWEEN".to_owned(),
            mid: Box::new(Expr::column("bio")),
            rhs: Box::new(Expr::number("9")),
        };
        assert!(nullable(&with_null_bound));
    }

    #[test]
    fn test_in_depends_on_the_left_hand_side_only() {
        let lhs_non_null = Expr::InList {
            lhs: Box::new(Expr::column("id")),
            negated: false,
            list: vec![Expr::column("bio")],
        };
        assert!(!nullable(&lhs_non_null));
        let lhs_nullable = Expr::InList {
            lhs: Box::new(Expr::column("bio")),
            negated: true,
            list: vec![Expr::number("1")],
        };
        assert!(nullable(&lhs_nullable));
    }

    #[test]
    fn test_in_list_elements_still_surface_unknown_columns() {
        let bad = Expr::InList {
            lhs: Box::new(Expr::column("id")),
            negated: false,
            list: vec![Expr::column("nosuch")],
        };
        assert!(expression_nullability(&scope(), &bad).is_err());
    }

    #[test]
    fn test_function_calls_or_their_arguments() {
        let call = |args| Expr::FunctionCall {
            schema: None,
            name: "f".to_owned(),
            distinct: false,
            args,
            filter: None,
            window: None,
        };
        assert!(!nullable(&call(vec![Expr::column("id")])));
        assert!(nullable(&call(vec![Expr::column("id"), Expr::column("bio")])));
        assert!(!nullable(&call(vec![Expr::Star])));
        assert!(!nullable(&call(vec![])));
    }

    #[test]
    fn test_case_without_else_is_nullable() {
        let branch = CaseBranch {
            condition: Expr::binary(Expr::column("id"), "=", Expr::number("1")),
            result: Expr::number("10"),
        };
        let without_else = Expr::Case {
            branches: vec![branch.clone()],
            else_branch: None,
        };
        assert!(nullable(&without_else));
        let with_else = Expr::Case {
            branches: vec![branch],
            else_branch: Some(Box::new(Expr::number("0"))),
        };
        assert!(!nullable(&with_else));
    }

    #[test]
    fn test_subquery_forms_have_fixed_nullability() {
        let subquery =
            Box::new(crate::parser::parse("SELECT 1").expect("subquery fixture must parse"));
        assert!(nullable(&Expr::ScalarSubquery(subquery.clone())));
        assert!(!nullable(&Expr::Exists(subquery.clone())));
        assert!(!nullable(&Expr::ArraySubquery(subquery)));
    }

    #[test]
    fn test_casts_pass_nullability_through_and_subscripts_do_not() {
        let cast = Expr::Cast {
            operand: Box::new(Expr::column("id")),
            target: "text".to_owned(),
        };
        assert!(!nullable(&cast));
        let subscript = Expr::Subscript {
            operand: Box::new(Expr::column("id")),
            index: Box::new(Expr::number("1")),
        };
        assert!(nullable(&subscript));
    }

    #[test]
    fn test_select_list_expansion_names_and_counts() {
        let items = vec![
            SelectItem::Wildcard,
            SelectItem::Expr {
                expr: Expr::column("bio"),
                alias: Some("about".to_owned()),
            },
            SelectItem::Expr {
                expr: Expr::Cast {
                    operand: Box::new(Expr::column("id")),
                    target: "text".to_owned(),
                },
                alias: None,
            },
        ];
        let columns = select_list_columns(&scope(), &items).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "bio", "about", "id"]);
        let nullability: Vec<bool> = columns.iter().map(|c| c.nullable).collect();
        assert_eq!(nullability, [false, true, true, false]);
    }

    #[test]
    fn test_table_wildcard_requires_a_known_alias() {
        let items = vec![SelectItem::TableWildcard("missing".to_owned())];
        assert!(matches!(
            select_list_columns(&scope(), &items),
            Err(InferError::UnknownTable { .. })
        ));
    }
}
