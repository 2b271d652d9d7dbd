//! Expression AST types.
//!
//! Operators are stored as their SQL symbol text (`"+"`, `"->>"`,
//! `"IS NULL"`), because PostgreSQL's operator set is open-ended; the
//! inference layer classifies them through its operator table rather than
//! through an enum.

use super::statement::{OrderBy, Statement};

/// A constant appearing literally in the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// `NULL`.
    Null,
    /// `TRUE`.
    True,
    /// `FALSE`.
    False,
    /// A numeric literal, kept as written.
    Number(String),
    /// A string literal, with quote doubling already unescaped.
    String(String),
}

/// Which rows a quantified comparison must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `ANY` / `SOME`.
    Any,
    /// `ALL`.
    All,
}

impl Quantifier {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::All => "ALL",
        }
    }
}

/// The right-hand operand of an `op ANY/ALL (…)` comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyAllOperand {
    /// A subquery producing the compared set.
    Subquery(Box<Statement>),
    /// An array-valued expression.
    Array(Box<Expr>),
}

/// One `WHEN … THEN …` branch of a `CASE` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    /// The tested condition.
    pub condition: Expr,
    /// The branch result.
    pub result: Expr,
}

/// A window definition attached to a function call.
///
/// `OVER w` is represented as a spec whose `existing` is `w` and whose other
/// fields are empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    /// Name of a window declared in the `WINDOW` clause, if referenced.
    pub existing: Option<String>,
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderBy>,
    /// Frame clause, if present.
    pub frame: Option<WindowFrame>,
}

/// A window frame clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    /// Frame unit.
    pub unit: FrameUnit,
    /// Frame start bound.
    pub start: FrameBound,
    /// Frame end bound when the `BETWEEN` form is used.
    pub end: Option<FrameBound>,
}

/// Window frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    /// `RANGE`.
    Range,
    /// `ROWS`.
    Rows,
    /// `GROUPS`.
    Groups,
}

impl FrameUnit {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Range => "RANGE",
            Self::Rows => "ROWS",
            Self::Groups => "GROUPS",
        }
    }
}

/// A window frame bound.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`.
    UnboundedPreceding,
    /// `<expr> PRECEDING`.
    Preceding(Box<Expr>),
    /// `CURRENT ROW`.
    CurrentRow,
    /// `<expr> FOLLOWING`.
    Following(Box<Expr>),
    /// `UNBOUNDED FOLLOWING`.
    UnboundedFollowing,
}

/// A scalar expression.
///
/// Every variant is immutable and finite; subqueries are nested statement
/// values, never references back into an enclosing tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference, optionally qualified by a table alias.
    Column {
        /// Qualifying table or alias.
        table: Option<String>,
        /// Column name.
        name: String,
    },
    /// A literal constant.
    Constant(Constant),
    /// A positional parameter `$n` (1-based).
    Param(u32),
    /// `*` as a function argument, as in `count(*)`.
    Star,
    /// A prefix or postfix operator application.
    Unary {
        /// Operator symbol, e.g. `"-"`, `"NOT"`, `"IS NULL"`.
        op: String,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operator application.
    Binary {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator symbol.
        op: String,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A ternary operator application, e.g. `a BETWEEN lo AND hi`.
    Ternary {
        /// Tested operand.
        lhs: Box<Expr>,
        /// Operator symbol, e.g. `"BETWEEN"`, `"NOT BETWEEN"`.
        op: String,
        /// Lower operand.
        mid: Box<Expr>,
        /// Upper operand.
        rhs: Box<Expr>,
    },
    /// `EXISTS (subquery)`.
    Exists(Box<Statement>),
    /// `lhs [NOT] IN (expr, …)`.
    InList {
        /// Tested operand.
        lhs: Box<Expr>,
        /// Whether the form is `NOT IN`.
        negated: bool,
        /// The candidate expressions.
        list: Vec<Expr>,
    },
    /// `lhs [NOT] IN (subquery)`.
    InSubquery {
        /// Tested operand.
        lhs: Box<Expr>,
        /// Whether the form is `NOT IN`.
        negated: bool,
        /// The subquery producing candidates.
        query: Box<Statement>,
    },
    /// `lhs op ANY/SOME/ALL (…)`.
    AnyAll {
        /// Left operand.
        lhs: Box<Expr>,
        /// Comparison operator symbol.
        op: String,
        /// `ANY` or `ALL`.
        quantifier: Quantifier,
        /// Subquery or array operand.
        operand: AnyAllOperand,
    },
    /// A function call, possibly aggregate or windowed.
    FunctionCall {
        /// Schema qualifier, if written.
        schema: Option<String>,
        /// Function name.
        name: String,
        /// Whether the argument list is prefixed with `DISTINCT`.
        distinct: bool,
        /// Arguments; `count(*)` carries a single [`Expr::Star`].
        args: Vec<Expr>,
        /// `FILTER (WHERE …)` condition.
        filter: Option<Box<Expr>>,
        /// `OVER …` window.
        window: Option<WindowSpec>,
    },
    /// `ARRAY (subquery)`.
    ArraySubquery(Box<Statement>),
    /// A parenthesized scalar subquery.
    ScalarSubquery(Box<Statement>),
    /// A searched `CASE` expression. The simple form `CASE x WHEN v …` is
    /// desugared at parse time into `x = v` conditions.
    Case {
        /// The `WHEN`/`THEN` branches, in order.
        branches: Vec<CaseBranch>,
        /// The `ELSE` result, if present.
        else_branch: Option<Box<Expr>>,
    },
    /// An array subscript `operand[index]`.
    Subscript {
        /// The array-valued operand.
        operand: Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
    },
    /// A typecast, either `operand::type` or `CAST(operand AS type)` or a
    /// typed literal such as `INTERVAL '1 day'`.
    Cast {
        /// The cast operand.
        operand: Box<Expr>,
        /// The target type name, normalized to lowercase keywords.
        target: String,
    },
}

impl Expr {
    /// An unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// A table-qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// A numeric literal, kept as written.
    #[must_use]
    pub fn number(text: impl Into<String>) -> Self {
        Self::Constant(Constant::Number(text.into()))
    }

    /// A string literal.
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::Constant(Constant::String(text.into()))
    }

    /// A binary operator application.
    #[must_use]
    pub fn binary(lhs: Self, op: impl Into<String>, rhs: Self) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op: op.into(),
            rhs: Box::new(rhs),
        }
    }

    /// A unary operator application.
    #[must_use]
    pub fn unary(op: impl Into<String>, operand: Self) -> Self {
        Self::Unary {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    /// Structural equality up to operator commutativity: `a + b` equals
    /// `b + a`, while `a - b` does not equal `b - a`.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        if let (
            Self::Binary { lhs, op, rhs },
            Self::Binary {
                lhs: other_lhs,
                op: other_op,
                rhs: other_rhs,
            },
        ) = (self, other)
        {
            if op != other_op {
                return false;
            }
            if lhs.equals(other_lhs) && rhs.equals(other_rhs) {
                return true;
            }
            return crate::infer::is_commutative(op)
                && lhs.equals(other_rhs)
                && rhs.equals(other_lhs);
        }
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commutative_operators_compare_symmetrically() {
        let ab = Expr::binary(Expr::column("a"), "+", Expr::column("b"));
        let ba = Expr::binary(Expr::column("b"), "+", Expr::column("a"));
        assert!(ab.equals(&ba));
        assert!(ba.equals(&ab));

        for op in ["=", "<>", "!=", "*", "AND", "OR"] {
            let ab = Expr::binary(Expr::column("a"), op, Expr::column("b"));
            let ba = Expr::binary(Expr::column("b"), op, Expr::column("a"));
            assert!(ab.equals(&ba), "{op} should be commutative");
        }
    }

    #[test]
    fn test_non_commutative_operators_do_not() {
        for op in ["-", "/", "<", "LIKE"] {
            let ab = Expr::binary(Expr::column("a"), op, Expr::column("b"));
            let ba = Expr::binary(Expr::column("b"), op, Expr::column("a"));
            assert!(!ab.equals(&ba), "{op} should not be commutative");
        }
    }

    #[test]
    fn test_commutativity_applies_recursively() {
        // (a + b) = c versus c = (b + a)
        let left = Expr::binary(
            Expr::binary(Expr::column("a"), "+", Expr::column("b")),
            "=",
            Expr::column("c"),
        );
        let right = Expr::binary(
            Expr::column("c"),
            "=",
            Expr::binary(Expr::column("b"), "+", Expr::column("a")),
        );
        assert!(left.equals(&right));
    }

    #[test]
    fn test_structurally_different_expressions_differ() {
        let a = Expr::column("a");
        let b = Expr::qualified_column("t", "a");
        assert!(!a.equals(&b));
    }
}
