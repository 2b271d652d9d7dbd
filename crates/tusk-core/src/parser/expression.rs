//! Expression grammar.
//!
//! Precedence is encoded as a chain of parser layers, loosest binding first:
//! `OR`, `AND`, `NOT`, `IS` postfixes, comparisons, generic operators,
//! addition, multiplication, exponentiation, sign, then subscripts and casts.
//! Each binary layer parses one tighter-binding term and left-folds a run of
//! `(operator, term)` pairs. `IN`, `BETWEEN`, `LIKE`, quantified comparisons,
//! and postfix `!` share the comparison layer as alternative right-hand
//! shapes, so they never re-derive the full chain.

use super::combinators::{attempt, map, one_of, opt, scope, sep_by, sep_by1, try_map, PResult, ParseState};
use super::lexer::{identifier, keyword, number, operator, param, phrase, string_literal, symbol};
use super::statement::{order_by_clause, subquery};
use crate::ast::{
    AnyAllOperand, CaseBranch, Constant, Expr, FrameBound, FrameUnit, Quantifier, WindowFrame,
    WindowSpec,
};

/// Parses a full expression.
pub(crate) fn expression<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    or_expr(st)
}

/// Parses one tighter-binding term, then left-folds `(op, term)` repetitions.
/// Mirrors the repetition protocol of `many`: a clean operator failure ends
/// the chain, a partially consumed one propagates.
fn binary_chain<'s>(
    st: &mut ParseState<'s>,
    term: impl Fn(&mut ParseState<'s>) -> PResult<Expr>,
    op: impl Fn(&mut ParseState<'s>) -> PResult<String>,
) -> PResult<Expr> {
    let mut lhs = term(st)?;
    loop {
        let start = st.pos();
        match op(st) {
            Ok(op_text) => {
                let rhs = term(st)?;
                lhs = Expr::binary(lhs, op_text, rhs);
            }
            Err(failure) => {
                if st.pos() == start {
                    return Ok(lhs);
                }
                return Err(failure);
            }
        }
    }
}

fn keyword_op(kw: &'static str) -> impl Fn(&mut ParseState<'_>) -> PResult<String> {
    move |st: &mut ParseState<'_>| {
        keyword(kw)(st)?;
        Ok(kw.to_owned())
    }
}

fn symbol_op(sym: &'static str) -> impl Fn(&mut ParseState<'_>) -> PResult<String> {
    move |st: &mut ParseState<'_>| {
        symbol(sym)(st)?;
        Ok(sym.to_owned())
    }
}

fn or_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(st, and_expr, keyword_op("OR"))
}

fn and_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(st, not_expr, keyword_op("AND"))
}

fn not_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    if opt(keyword("NOT"))(st)?.is_some() {
        let operand = not_expr(st)?;
        return Ok(Expr::unary("NOT", operand));
    }
    is_expr(st)
}

/// One `IS`-family postfix, or an `IS [NOT] DISTINCT FROM` right-hand side.
enum IsSuffix {
    Postfix(&'static str),
    DistinctFrom { negated: bool, rhs: Expr },
}

fn is_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let mut operand = comparison_expr(st)?;
    loop {
        let start = st.pos();
        match is_suffix(st) {
            Ok(IsSuffix::Postfix(op)) => operand = Expr::unary(op, operand),
            Ok(IsSuffix::DistinctFrom { negated, rhs }) => {
                let op = if negated {
                    "IS NOT DISTINCT FROM"
                } else {
                    "IS DISTINCT FROM"
                };
                operand = Expr::binary(operand, op, rhs);
            }
            Err(failure) => {
                if st.pos() == start {
                    return Ok(operand);
                }
                return Err(failure);
            }
        }
    }
}

fn is_suffix<'s>(st: &mut ParseState<'s>) -> PResult<IsSuffix> {
    if opt(keyword("ISNULL"))(st)?.is_some() {
        return Ok(IsSuffix::Postfix("ISNULL"));
    }
    if opt(keyword("NOTNULL"))(st)?.is_some() {
        return Ok(IsSuffix::Postfix("NOTNULL"));
    }
    keyword("IS")(st)?;
    let negated = opt(keyword("NOT"))(st)?.is_some();
    if opt(keyword("DISTINCT"))(st)?.is_some() {
        keyword("FROM")(st)?;
        let rhs = comparison_expr(st)?;
        return Ok(IsSuffix::DistinctFrom { negated, rhs });
    }
    let word = one_of((
        map(keyword("NULL"), |()| "NULL"),
        map(keyword("TRUE"), |()| "TRUE"),
        map(keyword("FALSE"), |()| "FALSE"),
        map(keyword("UNKNOWN"), |()| "UNKNOWN"),
    ))(st)?;
    let op = match (word, negated) {
        ("NULL", false) => "IS NULL",
        ("NULL", true) => "IS NOT NULL",
        ("TRUE", false) => "IS TRUE",
        ("TRUE", true) => "IS NOT TRUE",
        ("FALSE", false) => "IS FALSE",
        ("FALSE", true) => "IS NOT FALSE",
        ("UNKNOWN", false) => "IS UNKNOWN",
        _ => "IS NOT UNKNOWN",
    };
    Ok(IsSuffix::Postfix(op))
}

/// The alternative right-hand shapes of the comparison layer.
enum CompSuffix {
    Binary { op: String, rhs: Expr },
    AnyAll { op: String, quantifier: Quantifier, operand: AnyAllOperand },
    InList { negated: bool, list: Vec<Expr> },
    InSubquery { negated: bool, query: crate::ast::Statement },
    Between { op: &'static str, low: Expr, high: Expr },
    Factorial,
}

/// Comparisons are non-associative: at most one suffix is consumed.
fn comparison_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let lhs = other_op_expr(st)?;
    let start = st.pos();
    match comparison_suffix(st) {
        Ok(suffix) => Ok(apply_comparison(lhs, suffix)),
        Err(failure) => {
            if st.pos() == start {
                Ok(lhs)
            } else {
                Err(failure)
            }
        }
    }
}

fn comparison_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    one_of((operator_suffix, in_suffix, between_suffix, like_suffix, factorial_suffix))(st)
}

fn apply_comparison(lhs: Expr, suffix: CompSuffix) -> Expr {
    match suffix {
        CompSuffix::Binary { op, rhs } => Expr::binary(lhs, op, rhs),
        CompSuffix::AnyAll { op, quantifier, operand } => Expr::AnyAll {
            lhs: Box::new(lhs),
            op,
            quantifier,
            operand,
        },
        CompSuffix::InList { negated, list } => Expr::InList {
            lhs: Box::new(lhs),
            negated,
            list,
        },
        CompSuffix::InSubquery { negated, query } => Expr::InSubquery {
            lhs: Box::new(lhs),
            negated,
            query: Box::new(query),
        },
        CompSuffix::Between { op, low, high } => Expr::Ternary {
            lhs: Box::new(lhs),
            op: op.to_owned(),
            mid: Box::new(low),
            rhs: Box::new(high),
        },
        CompSuffix::Factorial => Expr::unary("!", lhs),
    }
}

fn comparison_operator<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    one_of((
        symbol_op("<="),
        symbol_op(">="),
        symbol_op("<>"),
        symbol_op("!="),
        symbol_op("="),
        symbol_op("<"),
        symbol_op(">"),
    ))(st)
}

fn quantifier_keyword<'s>(st: &mut ParseState<'s>) -> PResult<Quantifier> {
    one_of((
        map(keyword("ANY"), |()| Quantifier::Any),
        map(keyword("SOME"), |()| Quantifier::Any),
        map(keyword("ALL"), |()| Quantifier::All),
    ))(st)
}

fn operator_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    let op = comparison_operator(st)?;
    if let Some(quantifier) = opt(quantifier_keyword)(st)? {
        symbol("(")(st)?;
        let operand = any_all_operand(st)?;
        symbol(")")(st)?;
        return Ok(CompSuffix::AnyAll { op, quantifier, operand });
    }
    let rhs = other_op_expr(st)?;
    Ok(CompSuffix::Binary { op, rhs })
}

fn any_all_operand<'s>(st: &mut ParseState<'s>) -> PResult<AnyAllOperand> {
    if subquery_ahead(st) {
        Ok(AnyAllOperand::Subquery(Box::new(subquery(st)?)))
    } else {
        Ok(AnyAllOperand::Array(Box::new(expression(st)?)))
    }
}

fn in_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    let negated = opt(phrase(&["NOT", "IN"]))(st)?.is_some();
    if !negated {
        keyword("IN")(st)?;
    }
    symbol("(")(st)?;
    if subquery_ahead(st) {
        let query = subquery(st)?;
        symbol(")")(st)?;
        return Ok(CompSuffix::InSubquery { negated, query });
    }
    let list = sep_by1(expression, symbol(","))(st)?;
    symbol(")")(st)?;
    Ok(CompSuffix::InList { negated, list })
}

fn between_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    let negated = opt(phrase(&["NOT", "BETWEEN"]))(st)?.is_some();
    if !negated {
        keyword("BETWEEN")(st)?;
    }
    let symmetric = opt(keyword("SYMMETRIC"))(st)?.is_some();
    let op = match (negated, symmetric) {
        (false, false) => "BETWEEN",
        (false, true) => "BETWEEN SYMMETRIC",
        (true, false) => "NOT BETWEEN",
        (true, true) => "NOT BETWEEN SYMMETRIC",
    };
    // Bounds parse below the comparison layer so the separating AND is not
    // taken as a logical conjunction.
    let low = other_op_expr(st)?;
    keyword("AND")(st)?;
    let high = other_op_expr(st)?;
    Ok(CompSuffix::Between { op, low, high })
}

fn like_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    let op = one_of((
        map(keyword("LIKE"), |()| "LIKE"),
        map(keyword("ILIKE"), |()| "ILIKE"),
        map(phrase(&["NOT", "LIKE"]), |()| "NOT LIKE"),
        map(phrase(&["NOT", "ILIKE"]), |()| "NOT ILIKE"),
        map(phrase(&["SIMILAR", "TO"]), |()| "SIMILAR TO"),
        map(phrase(&["NOT", "SIMILAR", "TO"]), |()| "NOT SIMILAR TO"),
    ))(st)?;
    let rhs = other_op_expr(st)?;
    Ok(CompSuffix::Binary { op: op.to_owned(), rhs })
}

fn factorial_suffix<'s>(st: &mut ParseState<'s>) -> PResult<CompSuffix> {
    symbol("!")(st)?;
    Ok(CompSuffix::Factorial)
}

/// Operators consumed by a dedicated precedence layer; the generic layer
/// must leave them alone. Sorted for `binary_search`.
const CHAIN_OPERATORS: &[&str] = &[
    "!", "!=", "%", "*", "+", "-", "/", "<", "<=", "<>", "=", ">", ">=", "^",
];

fn other_op_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(st, additive_expr, other_operator)
}

fn other_operator<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    try_map(operator, |op| {
        if CHAIN_OPERATORS.binary_search(&op.as_str()).is_ok() {
            Err("an operator".to_owned())
        } else {
            Ok(op)
        }
    })(st)
}

fn additive_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(st, multiplicative_expr, one_of((symbol_op("+"), symbol_op("-"))))
}

fn multiplicative_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(
        st,
        exponent_expr,
        one_of((symbol_op("*"), symbol_op("/"), symbol_op("%"))),
    )
}

fn exponent_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    binary_chain(st, unary_sign_expr, symbol_op("^"))
}

fn unary_sign_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    if opt(symbol("-"))(st)?.is_some() {
        return Ok(Expr::unary("-", unary_sign_expr(st)?));
    }
    if opt(symbol("+"))(st)?.is_some() {
        return Ok(Expr::unary("+", unary_sign_expr(st)?));
    }
    postfix_expr(st)
}

/// Subscripts and `::` casts bind tightest of all operators.
fn postfix_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let mut operand = primary_expr(st)?;
    loop {
        if opt(symbol("["))(st)?.is_some() {
            let index = expression(st)?;
            symbol("]")(st)?;
            operand = Expr::Subscript {
                operand: Box::new(operand),
                index: Box::new(index),
            };
            continue;
        }
        if opt(symbol("::"))(st)?.is_some() {
            let target = type_name(st)?;
            operand = Expr::Cast {
                operand: Box::new(operand),
                target,
            };
            continue;
        }
        return Ok(operand);
    }
}

fn primary_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    one_of((
        case_expr,
        attempt(exists_expr),
        array_subquery,
        attempt(special_function),
        cast_function,
        attempt(typed_literal),
        attempt(function_call),
        column_ref,
        param_expr,
        literal_expr,
        paren_expr,
    ))(st)
}

/// True when the cursor sits on a `SELECT` or `WITH` keyword. Used to choose
/// between a subquery and an ordinary expression after an opening paren.
fn subquery_ahead(st: &mut ParseState<'_>) -> bool {
    let start = st.pos();
    let ahead = keyword("SELECT")(st).is_ok() || keyword("WITH")(st).is_ok();
    st.rewind(start);
    ahead
}

fn case_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    scope("CASE expression", |st: &mut ParseState<'s>| {
        keyword("CASE")(st)?;
        // In the simple form the scrutinee is compared against each WHEN
        // value; it desugars here into explicit equality conditions.
        let scrutinee = opt(expression)(st)?;
        let mut branches = Vec::new();
        loop {
            if branches.is_empty() {
                keyword("WHEN")(st)?;
            } else if opt(keyword("WHEN"))(st)?.is_none() {
                break;
            }
            let condition = expression(st)?;
            keyword("THEN")(st)?;
            let result = expression(st)?;
            let condition = match &scrutinee {
                Some(value) => Expr::binary(value.clone(), "=", condition),
                None => condition,
            };
            branches.push(CaseBranch { condition, result });
        }
        let else_branch = if opt(keyword("ELSE"))(st)?.is_some() {
            Some(Box::new(expression(st)?))
        } else {
            None
        };
        keyword("END")(st)?;
        Ok(Expr::Case { branches, else_branch })
    })(st)
}

fn exists_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("EXISTS")(st)?;
    symbol("(")(st)?;
    let query = subquery(st)?;
    symbol(")")(st)?;
    Ok(Expr::Exists(Box::new(query)))
}

fn array_subquery<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("ARRAY")(st)?;
    symbol("(")(st)?;
    let query = subquery(st)?;
    symbol(")")(st)?;
    Ok(Expr::ArraySubquery(Box::new(query)))
}

fn cast_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("CAST")(st)?;
    symbol("(")(st)?;
    let operand = expression(st)?;
    keyword("AS")(st)?;
    let target = type_name(st)?;
    symbol(")")(st)?;
    Ok(Expr::Cast {
        operand: Box::new(operand),
        target,
    })
}

/// A typed literal such as `INTERVAL '1 day'` or `NUMERIC(6,2) '1.5'`,
/// represented as a cast of the string constant.
fn typed_literal<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let target = type_name(st)?;
    let value = string_literal(st)?;
    Ok(Expr::Cast {
        operand: Box::new(Expr::Constant(Constant::String(value))),
        target,
    })
}

/// The multi-keyword functions whose argument lists use keywords instead of
/// commas. Each collapses into a plain function call; the comma-separated
/// spellings fall through to the generic call parser.
fn special_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    one_of((substring_function, trim_function, overlay_function, position_function))(st)
}

fn substring_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("SUBSTRING")(st)?;
    symbol("(")(st)?;
    let mut args = vec![expression(st)?];
    if opt(keyword("FROM"))(st)?.is_some() {
        args.push(expression(st)?);
    }
    if opt(keyword("FOR"))(st)?.is_some() {
        args.push(expression(st)?);
    }
    symbol(")")(st)?;
    Ok(function("substring", args))
}

fn trim_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("TRIM")(st)?;
    symbol("(")(st)?;
    opt(one_of((keyword("LEADING"), keyword("TRAILING"), keyword("BOTH"))))(st)?;
    let mut args = Vec::new();
    if opt(keyword("FROM"))(st)?.is_some() {
        args.push(expression(st)?);
    } else {
        let first = expression(st)?;
        if opt(keyword("FROM"))(st)?.is_some() {
            args.push(first);
            args.push(expression(st)?);
        } else {
            args.push(first);
        }
    }
    symbol(")")(st)?;
    Ok(function("trim", args))
}

fn overlay_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("OVERLAY")(st)?;
    symbol("(")(st)?;
    let mut args = vec![expression(st)?];
    keyword("PLACING")(st)?;
    args.push(expression(st)?);
    keyword("FROM")(st)?;
    args.push(expression(st)?);
    if opt(keyword("FOR"))(st)?.is_some() {
        args.push(expression(st)?);
    }
    symbol(")")(st)?;
    Ok(function("overlay", args))
}

fn position_function<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("POSITION")(st)?;
    symbol("(")(st)?;
    // Operands sit below the comparison layer, keeping IN as the separator.
    let needle = other_op_expr(st)?;
    keyword("IN")(st)?;
    let haystack = other_op_expr(st)?;
    symbol(")")(st)?;
    Ok(function("position", vec![needle, haystack]))
}

fn function(name: &str, args: Vec<Expr>) -> Expr {
    Expr::FunctionCall {
        schema: None,
        name: name.to_owned(),
        distinct: false,
        args,
        filter: None,
        window: None,
    }
}

fn function_call<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let first = identifier(st)?;
    let (schema, name) = if opt(symbol("."))(st)?.is_some() {
        (Some(first), identifier(st)?)
    } else {
        (None, first)
    };
    symbol("(")(st)?;
    let distinct = if opt(keyword("DISTINCT"))(st)?.is_some() {
        true
    } else {
        opt(keyword("ALL"))(st)?;
        false
    };
    let args = if opt(symbol("*"))(st)?.is_some() {
        vec![Expr::Star]
    } else {
        sep_by(expression, symbol(","))(st)?
    };
    symbol(")")(st)?;
    let filter = opt(attempt(filter_clause))(st)?.map(Box::new);
    let window = opt(attempt(over_clause))(st)?;
    Ok(Expr::FunctionCall {
        schema,
        name,
        distinct,
        args,
        filter,
        window,
    })
}

fn filter_clause<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    keyword("FILTER")(st)?;
    symbol("(")(st)?;
    keyword("WHERE")(st)?;
    let condition = expression(st)?;
    symbol(")")(st)?;
    Ok(condition)
}

fn over_clause<'s>(st: &mut ParseState<'s>) -> PResult<WindowSpec> {
    keyword("OVER")(st)?;
    if opt(symbol("("))(st)?.is_some() {
        let spec = window_spec(st)?;
        symbol(")")(st)?;
        return Ok(spec);
    }
    let existing = identifier(st)?;
    Ok(WindowSpec {
        existing: Some(existing),
        ..WindowSpec::default()
    })
}

/// The inside of a window definition: `[base] [PARTITION BY …] [ORDER BY …]
/// [frame]`. Shared between `OVER (…)` and the statement-level `WINDOW`
/// clause.
pub(crate) fn window_spec<'s>(st: &mut ParseState<'s>) -> PResult<WindowSpec> {
    scope("window definition", |st: &mut ParseState<'s>| {
        // A leading PARTITION/RANGE/ROWS/GROUPS token starts a clause here,
        // never a base window name.
        let existing = opt(try_map(identifier, |name| {
            if matches!(name.as_str(), "partition" | "range" | "rows" | "groups") {
                Err("a window name".to_owned())
            } else {
                Ok(name)
            }
        }))(st)?;
        let partition_by = if opt(phrase(&["PARTITION", "BY"]))(st)?.is_some() {
            sep_by1(expression, symbol(","))(st)?
        } else {
            Vec::new()
        };
        let order_by = opt(order_by_clause)(st)?.unwrap_or_default();
        let frame = opt(frame_clause)(st)?;
        Ok(WindowSpec {
            existing,
            partition_by,
            order_by,
            frame,
        })
    })(st)
}

fn frame_clause<'s>(st: &mut ParseState<'s>) -> PResult<WindowFrame> {
    let unit = one_of((
        map(keyword("RANGE"), |()| FrameUnit::Range),
        map(keyword("ROWS"), |()| FrameUnit::Rows),
        map(keyword("GROUPS"), |()| FrameUnit::Groups),
    ))(st)?;
    if opt(keyword("BETWEEN"))(st)?.is_some() {
        let start = frame_bound(st)?;
        keyword("AND")(st)?;
        let end = frame_bound(st)?;
        return Ok(WindowFrame {
            unit,
            start,
            end: Some(end),
        });
    }
    let start = frame_bound(st)?;
    Ok(WindowFrame { unit, start, end: None })
}

fn frame_bound<'s>(st: &mut ParseState<'s>) -> PResult<FrameBound> {
    one_of((
        map(phrase(&["UNBOUNDED", "PRECEDING"]), |()| {
            FrameBound::UnboundedPreceding
        }),
        map(phrase(&["UNBOUNDED", "FOLLOWING"]), |()| {
            FrameBound::UnboundedFollowing
        }),
        map(phrase(&["CURRENT", "ROW"]), |()| FrameBound::CurrentRow),
        offset_bound,
    ))(st)
}

fn offset_bound<'s>(st: &mut ParseState<'s>) -> PResult<FrameBound> {
    let offset = expression(st)?;
    if opt(keyword("PRECEDING"))(st)?.is_some() {
        return Ok(FrameBound::Preceding(Box::new(offset)));
    }
    keyword("FOLLOWING")(st)?;
    Ok(FrameBound::Following(Box::new(offset)))
}

fn column_ref<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    let first = identifier(st)?;
    if opt(symbol("."))(st)?.is_some() {
        let name = identifier(st)?;
        return Ok(Expr::Column {
            table: Some(first),
            name,
        });
    }
    Ok(Expr::Column {
        table: None,
        name: first,
    })
}

fn param_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    map(param, Expr::Param)(st)
}

fn literal_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    one_of((
        map(number, |text| Expr::Constant(Constant::Number(text))),
        map(string_literal, |text| Expr::Constant(Constant::String(text))),
        map(keyword("TRUE"), |()| Expr::Constant(Constant::True)),
        map(keyword("FALSE"), |()| Expr::Constant(Constant::False)),
        map(keyword("NULL"), |()| Expr::Constant(Constant::Null)),
    ))(st)
}

/// A parenthesized subquery or grouped expression. Grouping adds no AST
/// node; the inner expression is returned as is.
fn paren_expr<'s>(st: &mut ParseState<'s>) -> PResult<Expr> {
    symbol("(")(st)?;
    if subquery_ahead(st) {
        let query = subquery(st)?;
        symbol(")")(st)?;
        return Ok(Expr::ScalarSubquery(Box::new(query)));
    }
    let inner = expression(st)?;
    symbol(")")(st)?;
    Ok(inner)
}

/// A type name: multi-word spellings, an optional `(…)` modifier, and any
/// number of `[]` array markers, normalized to lowercase.
pub(crate) fn type_name<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    let mut name = base_type_name(st)?;
    while opt(attempt(array_marker))(st)?.is_some() {
        name.push_str("[]");
    }
    Ok(name)
}

fn array_marker<'s>(st: &mut ParseState<'s>) -> PResult<()> {
    symbol("[")(st)?;
    symbol("]")(st)
}

fn base_type_name<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    one_of((double_precision_type, varying_type, time_type, generic_type))(st)
}

fn double_precision_type<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    phrase(&["DOUBLE", "PRECISION"])(st)?;
    Ok("double precision".to_owned())
}

fn varying_type<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    let base = one_of((
        map(phrase(&["CHARACTER", "VARYING"]), |()| "character varying"),
        map(phrase(&["BIT", "VARYING"]), |()| "bit varying"),
    ))(st)?;
    let mut name = base.to_owned();
    if let Some(modifier) = opt(type_modifier)(st)? {
        name.push_str(&modifier);
    }
    Ok(name)
}

fn time_type<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    let base = one_of((
        map(keyword("TIMESTAMP"), |()| "timestamp"),
        map(keyword("TIME"), |()| "time"),
    ))(st)?;
    let mut name = base.to_owned();
    if let Some(modifier) = opt(type_modifier)(st)? {
        name.push_str(&modifier);
    }
    if opt(phrase(&["WITH", "TIME", "ZONE"]))(st)?.is_some() {
        name.push_str(" with time zone");
    } else if opt(phrase(&["WITHOUT", "TIME", "ZONE"]))(st)?.is_some() {
        name.push_str(" without time zone");
    }
    Ok(name)
}

fn generic_type<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    let mut name = identifier(st)?;
    if let Some(modifier) = opt(type_modifier)(st)? {
        name.push_str(&modifier);
    }
    Ok(name)
}

fn type_modifier<'s>(st: &mut ParseState<'s>) -> PResult<String> {
    symbol("(")(st)?;
    let args = sep_by1(number, symbol(","))(st)?;
    symbol(")")(st)?;
    Ok(format!("({})", args.join(",")))
}
