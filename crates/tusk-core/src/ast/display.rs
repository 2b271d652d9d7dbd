//! SQL rendering of the AST.
//!
//! The output is canonical rather than a copy of the input: identifiers are
//! quoted only when necessary, compound operands are parenthesized, and
//! comma-joined `FROM` items reappear as `CROSS JOIN`. Parsing the rendered
//! text yields a structurally equal tree.

use core::fmt::{self, Display, Formatter};

use super::expression::{
    AnyAllOperand, Constant, Expr, FrameBound, WindowSpec,
};
use super::statement::{
    ConflictAction, Cte, DeleteStatement, Distinct, InsertSource, InsertStatement, InsertValue,
    JoinSpec, Limit, NamedWindow, OrderBy, SelectBody, SelectItem, SelectStatement, SetQuantifier,
    Statement, TableExpr, UpdateAssignment, UpdateStatement,
};
use crate::parser::keywords;

fn needs_quoting(name: &str) -> bool {
    let simple = name
        .chars()
        .enumerate()
        .all(|(i, c)| {
            if i == 0 {
                c.is_ascii_lowercase() || c == '_'
            } else {
                c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$'
            }
        });
    name.is_empty() || !simple || keywords::is_reserved(name)
}

fn write_ident(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    if needs_quoting(name) {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    } else {
        f.write_str(name)
    }
}

fn write_string(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "'{}'", text.replace('\'', "''"))
}

/// Expressions that never need parentheses in operand position.
fn is_atomic(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Column { .. }
            | Expr::Constant(_)
            | Expr::Param(_)
            | Expr::Star
            | Expr::FunctionCall { .. }
            | Expr::Exists(_)
            | Expr::ArraySubquery(_)
            | Expr::ScalarSubquery(_)
            | Expr::Case { .. }
            | Expr::Subscript { .. }
            | Expr::Cast { .. }
    )
}

fn write_operand(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    if is_atomic(expr) {
        write!(f, "{expr}")
    } else {
        write!(f, "({expr})")
    }
}

fn write_comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    let mut sep = "";
    for item in items {
        f.write_str(sep)?;
        write!(f, "{item}")?;
        sep = ", ";
    }
    Ok(())
}

fn write_ident_list(f: &mut Formatter<'_>, names: &[String]) -> fmt::Result {
    let mut sep = "";
    for name in names {
        f.write_str(sep)?;
        write_ident(f, name)?;
        sep = ", ";
    }
    Ok(())
}

/// Unary operators rendered after their operand.
fn is_postfix(op: &str) -> bool {
    op.eq_ignore_ascii_case("ISNULL")
        || op.eq_ignore_ascii_case("NOTNULL")
        || op == "!"
        || op.to_ascii_uppercase().starts_with("IS ")
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::True => f.write_str("TRUE"),
            Self::False => f.write_str("FALSE"),
            Self::Number(text) => f.write_str(text),
            Self::String(text) => write_string(f, text),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column { table, name } => {
                if let Some(table) = table {
                    write_ident(f, table)?;
                    f.write_str(".")?;
                }
                write_ident(f, name)
            }
            Self::Constant(constant) => write!(f, "{constant}"),
            Self::Param(index) => write!(f, "${index}"),
            Self::Star => f.write_str("*"),
            Self::Unary { op, operand } => {
                if is_postfix(op) {
                    write_operand(f, operand)?;
                    write!(f, " {op}")
                } else {
                    write!(f, "{op} ")?;
                    write_operand(f, operand)
                }
            }
            Self::Binary { lhs, op, rhs } => {
                write_operand(f, lhs)?;
                write!(f, " {op} ")?;
                write_operand(f, rhs)
            }
            Self::Ternary { lhs, op, mid, rhs } => {
                write_operand(f, lhs)?;
                write!(f, " {op} ")?;
                write_operand(f, mid)?;
                f.write_str(" AND ")?;
                write_operand(f, rhs)
            }
            Self::Exists(query) => write!(f, "EXISTS ({query})"),
            Self::InList { lhs, negated, list } => {
                write_operand(f, lhs)?;
                f.write_str(if *negated { " NOT IN (" } else { " IN (" })?;
                write_comma_separated(f, list)?;
                f.write_str(")")
            }
            Self::InSubquery { lhs, negated, query } => {
                write_operand(f, lhs)?;
                f.write_str(if *negated { " NOT IN (" } else { " IN (" })?;
                write!(f, "{query})")
            }
            Self::AnyAll {
                lhs,
                op,
                quantifier,
                operand,
            } => {
                write_operand(f, lhs)?;
                write!(f, " {op} {} (", quantifier.as_str())?;
                match operand {
                    AnyAllOperand::Subquery(query) => write!(f, "{query}")?,
                    AnyAllOperand::Array(expr) => write!(f, "{expr}")?,
                }
                f.write_str(")")
            }
            Self::FunctionCall {
                schema,
                name,
                distinct,
                args,
                filter,
                window,
            } => {
                if let Some(schema) = schema {
                    write_ident(f, schema)?;
                    f.write_str(".")?;
                }
                write_ident(f, name)?;
                f.write_str("(")?;
                if *distinct {
                    f.write_str("DISTINCT ")?;
                }
                write_comma_separated(f, args)?;
                f.write_str(")")?;
                if let Some(filter) = filter {
                    write!(f, " FILTER (WHERE {filter})")?;
                }
                if let Some(window) = window {
                    if let (Some(existing), true) = (&window.existing, window.is_bare_reference()) {
                        f.write_str(" OVER ")?;
                        write_ident(f, existing)?;
                    } else {
                        write!(f, " OVER ({window})")?;
                    }
                }
                Ok(())
            }
            Self::ArraySubquery(query) => write!(f, "ARRAY ({query})"),
            Self::ScalarSubquery(query) => write!(f, "({query})"),
            Self::Case {
                branches,
                else_branch,
            } => {
                f.write_str("CASE")?;
                for branch in branches {
                    write!(f, " WHEN {} THEN {}", branch.condition, branch.result)?;
                }
                if let Some(else_branch) = else_branch {
                    write!(f, " ELSE {else_branch}")?;
                }
                f.write_str(" END")
            }
            Self::Subscript { operand, index } => {
                write_operand(f, operand)?;
                write!(f, "[{index}]")
            }
            Self::Cast { operand, target } => {
                write_operand(f, operand)?;
                write!(f, "::{target}")
            }
        }
    }
}

impl WindowSpec {
    /// True when the spec is nothing but a reference to a named window.
    #[must_use]
    pub fn is_bare_reference(&self) -> bool {
        self.existing.is_some()
            && self.partition_by.is_empty()
            && self.order_by.is_empty()
            && self.frame.is_none()
    }
}

impl Display for WindowSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(existing) = &self.existing {
            write_ident(f, existing)?;
            sep = " ";
        }
        if !self.partition_by.is_empty() {
            f.write_str(sep)?;
            f.write_str("PARTITION BY ")?;
            write_comma_separated(f, &self.partition_by)?;
            sep = " ";
        }
        if !self.order_by.is_empty() {
            f.write_str(sep)?;
            f.write_str("ORDER BY ")?;
            write_comma_separated(f, &self.order_by)?;
            sep = " ";
        }
        if let Some(frame) = &self.frame {
            f.write_str(sep)?;
            f.write_str(frame.unit.as_str())?;
            match &frame.end {
                Some(end) => write!(f, " BETWEEN {} AND {end}", frame.start)?,
                None => write!(f, " {}", frame.start)?,
            }
        }
        Ok(())
    }
}

impl Display for FrameBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::Preceding(expr) => write!(f, "{expr} PRECEDING"),
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Following(expr) => write!(f, "{expr} FOLLOWING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(nulls) = self.nulls {
            write!(f, " {}", nulls.as_str())?;
        }
        Ok(())
    }
}

impl Display for SelectItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr { expr, alias } => {
                write!(f, "{expr}")?;
                if let Some(alias) = alias {
                    f.write_str(" AS ")?;
                    write_ident(f, alias)?;
                }
                Ok(())
            }
            Self::Wildcard => f.write_str("*"),
            Self::TableWildcard(table) => {
                write_ident(f, table)?;
                f.write_str(".*")
            }
        }
    }
}

impl Display for TableExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table {
                schema,
                name,
                alias,
            } => {
                if let Some(schema) = schema {
                    write_ident(f, schema)?;
                    f.write_str(".")?;
                }
                write_ident(f, name)?;
                if let Some(alias) = alias {
                    f.write_str(" AS ")?;
                    write_ident(f, alias)?;
                }
                Ok(())
            }
            Self::SubQuery { query, alias } => {
                write!(f, "({query}) AS ")?;
                write_ident(f, alias)
            }
            Self::CrossJoin { left, right } => write!(f, "{left} CROSS JOIN {right}"),
            Self::Join {
                kind,
                left,
                right,
                spec,
            } => {
                write!(f, "{left} ")?;
                if matches!(spec, JoinSpec::Natural) {
                    f.write_str("NATURAL ")?;
                }
                write!(f, "{} {right}", kind.as_str())?;
                match spec {
                    JoinSpec::On(condition) => write!(f, " ON {condition}"),
                    JoinSpec::Using(columns) => {
                        f.write_str(" USING (")?;
                        write_ident_list(f, columns)?;
                        f.write_str(")")
                    }
                    JoinSpec::Natural => Ok(()),
                }
            }
        }
    }
}

impl Display for SelectBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT")?;
        match &self.distinct {
            Distinct::All => {}
            Distinct::Rows => f.write_str(" DISTINCT")?,
            Distinct::On(exprs) => {
                f.write_str(" DISTINCT ON (")?;
                write_comma_separated(f, exprs)?;
                f.write_str(")")?;
            }
        }
        f.write_str(" ")?;
        write_comma_separated(f, &self.items)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            write_comma_separated(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        if !self.windows.is_empty() {
            f.write_str(" WINDOW ")?;
            write_comma_separated(f, &self.windows)?;
        }
        Ok(())
    }
}

impl Display for NamedWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        write!(f, " AS ({})", self.spec)
    }
}

impl Display for Cte {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.query)
    }
}

fn write_ctes(f: &mut Formatter<'_>, ctes: &[Cte]) -> fmt::Result {
    if ctes.is_empty() {
        return Ok(());
    }
    f.write_str("WITH ")?;
    write_comma_separated(f, ctes)?;
    f.write_str(" ")
}

fn write_limit(f: &mut Formatter<'_>, limit: &Limit) -> fmt::Result {
    match (&limit.count, &limit.offset) {
        (Some(count), _) => write!(f, " LIMIT {count}")?,
        (None, None) => f.write_str(" LIMIT ALL")?,
        (None, Some(_)) => {}
    }
    if let Some(offset) = &limit.offset {
        write!(f, " OFFSET {offset}")?;
    }
    Ok(())
}

impl Display for SelectStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ctes(f, &self.ctes)?;
        write!(f, "{}", self.body)?;
        for arm in &self.set_ops {
            write!(f, " {}", arm.op.as_str())?;
            if arm.quantifier == SetQuantifier::All {
                f.write_str(" ALL")?;
            }
            write!(f, " {}", arm.body)?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_comma_separated(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write_limit(f, limit)?;
        }
        Ok(())
    }
}

impl Display for InsertValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("DEFAULT"),
            Self::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

impl Display for UpdateAssignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.column)?;
        write!(f, " = {}", self.value)
    }
}

fn write_returning(f: &mut Formatter<'_>, items: &[SelectItem]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    f.write_str(" RETURNING ")?;
    write_comma_separated(f, items)
}

impl Display for InsertStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ctes(f, &self.ctes)?;
        write!(f, "INSERT INTO {}", self.table)?;
        if let Some(alias) = &self.alias {
            f.write_str(" AS ")?;
            write_ident(f, alias)?;
        }
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match &self.source {
            InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES")?,
            InsertSource::Values(rows) => {
                f.write_str(" VALUES ")?;
                let mut sep = "";
                for row in rows {
                    f.write_str(sep)?;
                    f.write_str("(")?;
                    write_comma_separated(f, row)?;
                    f.write_str(")")?;
                    sep = ", ";
                }
            }
            InsertSource::Query(query) => write!(f, " {query}")?,
        }
        if let Some(on_conflict) = &self.on_conflict {
            f.write_str(" ON CONFLICT")?;
            if !on_conflict.target.is_empty() {
                f.write_str(" (")?;
                write_ident_list(f, &on_conflict.target)?;
                f.write_str(")")?;
            }
            match &on_conflict.action {
                ConflictAction::DoNothing => f.write_str(" DO NOTHING")?,
                ConflictAction::DoUpdate(assignments) => {
                    f.write_str(" DO UPDATE SET ")?;
                    write_comma_separated(f, assignments)?;
                }
            }
        }
        write_returning(f, &self.returning)
    }
}

impl Display for UpdateStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ctes(f, &self.ctes)?;
        write!(f, "UPDATE {}", self.table)?;
        if let Some(alias) = &self.alias {
            f.write_str(" AS ")?;
            write_ident(f, alias)?;
        }
        f.write_str(" SET ")?;
        write_comma_separated(f, &self.assignments)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl Display for DeleteStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_ctes(f, &self.ctes)?;
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(alias) = &self.alias {
            f.write_str(" AS ")?;
            write_ident(f, alias)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(statement) => write!(f, "{statement}"),
            Self::Insert(statement) => write!(f, "{statement}"),
            Self::Update(statement) => write!(f, "{statement}"),
            Self::Delete(statement) => write!(f, "{statement}"),
        }
    }
}
