//! Statement AST types.

use super::expression::{Expr, WindowSpec};

/// Sort direction in an `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending (the default).
    Asc,
    /// Descending.
    Desc,
}

impl OrderDirection {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null placement in an `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// `NULLS FIRST`.
    First,
    /// `NULLS LAST`.
    Last,
}

impl NullOrdering {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The sorted expression.
    pub expr: Expr,
    /// Explicit direction, if written.
    pub direction: Option<OrderDirection>,
    /// Explicit null placement, if written.
    pub nulls: Option<NullOrdering>,
}

/// Join kind of a qualified join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `[INNER] JOIN`.
    Inner,
    /// `LEFT [OUTER] JOIN`.
    Left,
    /// `RIGHT [OUTER] JOIN`.
    Right,
    /// `FULL [OUTER] JOIN`.
    Full,
}

impl JoinKind {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

/// How a qualified join pairs its rows.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinSpec {
    /// `ON <condition>`.
    On(Expr),
    /// `USING (col, …)`.
    Using(Vec<String>),
    /// `NATURAL`.
    Natural,
}

/// A table expression in a `FROM` clause.
///
/// Joins are binary and left-associative by construction; comma-separated
/// `FROM` items are folded into cross joins.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    /// A base table reference.
    Table {
        /// Schema qualifier, if written.
        schema: Option<String>,
        /// Table name.
        name: String,
        /// Alias, if written.
        alias: Option<String>,
    },
    /// A parenthesized subquery with its mandatory alias.
    SubQuery {
        /// The nested statement.
        query: Box<Statement>,
        /// The alias naming the derived table.
        alias: String,
    },
    /// `left CROSS JOIN right` (or a comma in the `FROM` list).
    CrossJoin {
        /// Left operand.
        left: Box<TableExpr>,
        /// Right operand.
        right: Box<TableExpr>,
    },
    /// A qualified join.
    Join {
        /// Join kind.
        kind: JoinKind,
        /// Left operand.
        left: Box<TableExpr>,
        /// Right operand.
        right: Box<TableExpr>,
        /// Row-pairing specification.
        spec: JoinSpec,
    },
}

/// One item of a select list or `RETURNING` list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// An expression with an optional alias.
    Expr {
        /// The projected expression.
        expr: Expr,
        /// Output name, if aliased.
        alias: Option<String>,
    },
    /// A bare `*`.
    Wildcard,
    /// A qualified `alias.*`.
    TableWildcard(String),
}

/// `DISTINCT` handling of a select body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Distinct {
    /// Plain `SELECT` / `SELECT ALL`.
    #[default]
    All,
    /// `SELECT DISTINCT`.
    Rows,
    /// `SELECT DISTINCT ON (expr, …)`.
    On(Vec<Expr>),
}

/// A window declared in a `WINDOW` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedWindow {
    /// The window's name.
    pub name: String,
    /// Its definition.
    pub spec: WindowSpec,
}

/// The clause block of one `SELECT` (without set operations, ordering, or
/// limits, which attach to the whole statement).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBody {
    /// Distinct handling.
    pub distinct: Distinct,
    /// The select list.
    pub items: Vec<SelectItem>,
    /// The `FROM` clause, if present.
    pub from: Option<TableExpr>,
    /// The `WHERE` condition, if present.
    pub where_clause: Option<Expr>,
    /// `GROUP BY` expressions.
    pub group_by: Vec<Expr>,
    /// The `HAVING` condition, if present.
    pub having: Option<Expr>,
    /// `WINDOW` declarations.
    pub windows: Vec<NamedWindow>,
}

/// A set operation combining select bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    /// `UNION`.
    Union,
    /// `INTERSECT`.
    Intersect,
    /// `EXCEPT`.
    Except,
}

impl SetOperator {
    /// The SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// Duplicate handling of a set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetQuantifier {
    /// Duplicates are eliminated (the default).
    #[default]
    Distinct,
    /// `ALL` keeps duplicates.
    All,
}

/// One `UNION`/`INTERSECT`/`EXCEPT` arm appended to a select.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    /// The set operator.
    pub op: SetOperator,
    /// Duplicate handling.
    pub quantifier: SetQuantifier,
    /// The right-hand select body.
    pub body: SelectBody,
}

/// `LIMIT` / `OFFSET` of a select statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// The `LIMIT` count; `None` for `LIMIT ALL` or when only `OFFSET` was
    /// written.
    pub count: Option<Expr>,
    /// The `OFFSET`, if written.
    pub offset: Option<Expr>,
}

/// One common table expression of a `WITH` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// The name the query is bound to.
    pub name: String,
    /// Explicit output column names; empty when not specified.
    pub columns: Vec<String>,
    /// The nested statement.
    pub query: Statement,
}

/// A (possibly schema-qualified) table name used as a statement target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Schema qualifier, if written.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
}

impl TableName {
    /// A bare table name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }
}

impl core::fmt::Display for TableName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Leading `WITH` bindings.
    pub ctes: Vec<Cte>,
    /// The first select body.
    pub body: SelectBody,
    /// Trailing set-operation arms, in order.
    pub set_ops: Vec<SetOperation>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderBy>,
    /// `LIMIT` / `OFFSET`, if written.
    pub limit: Option<Limit>,
}

/// A cell of a `VALUES` row or `SET` assignment, which may be `DEFAULT`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValue {
    /// The `DEFAULT` keyword.
    Default,
    /// An ordinary expression.
    Expr(Expr),
}

/// The row source of an `INSERT`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `DEFAULT VALUES`.
    DefaultValues,
    /// `VALUES (…), (…)` rows.
    Values(Vec<Vec<InsertValue>>),
    /// `INSERT … SELECT`.
    Query(Box<SelectStatement>),
}

/// One `SET column = value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    /// Assigned column.
    pub column: String,
    /// Assigned value, possibly `DEFAULT`.
    pub value: InsertValue,
}

/// The action of an `ON CONFLICT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    /// `DO NOTHING`.
    DoNothing,
    /// `DO UPDATE SET …`.
    DoUpdate(Vec<UpdateAssignment>),
}

/// An `ON CONFLICT` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    /// Conflict target columns; empty when not specified.
    pub target: Vec<String>,
    /// What to do on conflict.
    pub action: ConflictAction,
}

/// An `INSERT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Leading `WITH` bindings.
    pub ctes: Vec<Cte>,
    /// Target table.
    pub table: TableName,
    /// `AS` alias of the target, if written.
    pub alias: Option<String>,
    /// Explicit target columns; empty when not specified.
    pub columns: Vec<String>,
    /// The row source.
    pub source: InsertSource,
    /// `ON CONFLICT`, if present.
    pub on_conflict: Option<OnConflict>,
    /// `RETURNING` items; empty when absent.
    pub returning: Vec<SelectItem>,
}

/// An `UPDATE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Leading `WITH` bindings.
    pub ctes: Vec<Cte>,
    /// Target table.
    pub table: TableName,
    /// Alias of the target, if written.
    pub alias: Option<String>,
    /// `SET` assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// Additional `FROM` sources, if present.
    pub from: Option<TableExpr>,
    /// The `WHERE` condition, if present.
    pub where_clause: Option<Expr>,
    /// `RETURNING` items; empty when absent.
    pub returning: Vec<SelectItem>,
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Leading `WITH` bindings.
    pub ctes: Vec<Cte>,
    /// Target table.
    pub table: TableName,
    /// Alias of the target, if written.
    pub alias: Option<String>,
    /// The `WHERE` condition, if present.
    pub where_clause: Option<Expr>,
    /// `RETURNING` items; empty when absent.
    pub returning: Vec<SelectItem>,
}

/// A parsed SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A `SELECT`.
    Select(SelectStatement),
    /// An `INSERT`.
    Insert(InsertStatement),
    /// An `UPDATE`.
    Update(UpdateStatement),
    /// A `DELETE`.
    Delete(DeleteStatement),
}

impl Statement {
    /// The statement's `WITH` bindings.
    #[must_use]
    pub fn ctes(&self) -> &[Cte] {
        match self {
            Self::Select(s) => &s.ctes,
            Self::Insert(s) => &s.ctes,
            Self::Update(s) => &s.ctes,
            Self::Delete(s) => &s.ctes,
        }
    }

    /// The statement's `RETURNING` items; empty for selects.
    #[must_use]
    pub fn returning(&self) -> &[SelectItem] {
        match self {
            Self::Select(_) => &[],
            Self::Insert(s) => &s.returning,
            Self::Update(s) => &s.returning,
            Self::Delete(s) => &s.returning,
        }
    }
}
