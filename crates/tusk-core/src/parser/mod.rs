//! Backtracking recursive-descent parser for the PostgreSQL subset the
//! inference engine understands.
//!
//! The grammar is written as plain functions over [`combinators::ParseState`];
//! [`parse`] is the only entry point. Failures carry a byte offset, an
//! expectation message, and the grammar scopes that were active, so callers
//! can render them against the source text.

pub mod combinators;
mod error;
mod expression;
pub(crate) mod keywords;
pub(crate) mod lexer;
mod statement;

pub use error::ParseFailure;

use combinators::{opt, ParseState};
use lexer::symbol;

use crate::ast::Statement;

/// Parses a single SQL statement, with an optional trailing semicolon.
///
/// Trailing whitespace and comments are allowed; any other leftover input is
/// an error.
///
/// ```
/// let statement = tusk_core::parser::parse("SELECT 1")?;
/// assert_eq!(statement.to_string(), "SELECT 1");
/// # Ok::<(), tusk_core::parser::ParseFailure>(())
/// ```
pub fn parse(sql: &str) -> Result<Statement, ParseFailure> {
    let mut st = ParseState::new(sql);
    let parsed = statement::statement(&mut st)?;
    opt(symbol(";"))(&mut st)?;
    lexer::skip_ws(&mut st);
    if !st.at_end() {
        return Err(st.error("end of input"));
    }
    Ok(parsed)
}
