//! Abstract syntax tree for the supported PostgreSQL statement grammar.
//!
//! The tree is deliberately plain data: every node is `Clone + PartialEq` so
//! inference passes and tests can compare subtrees structurally. Rendering via
//! [`core::fmt::Display`] produces canonical SQL that parses back to an equal
//! tree.

mod display;
mod expression;
mod statement;

pub use expression::{
    AnyAllOperand, CaseBranch, Constant, Expr, FrameBound, FrameUnit, Quantifier, WindowFrame,
    WindowSpec,
};
pub use statement::{
    ConflictAction, Cte, DeleteStatement, Distinct, InsertSource, InsertStatement, InsertValue,
    JoinKind, JoinSpec, Limit, NamedWindow, NullOrdering, OnConflict, OrderBy, OrderDirection,
    SelectBody, SelectItem, SelectStatement, SetOperation, SetOperator, SetQuantifier, Statement,
    TableExpr, TableName, UpdateAssignment, UpdateStatement,
};
