//! Static operator metadata used by nullability inference.
//!
//! PostgreSQL operators are classified by how NULL flows through them. Most
//! built-in operators are strict ([`NullSafety::Safe`]): the result is NULL
//! exactly when an operand is NULL. The `IS` family always produces a
//! boolean, even for NULL input. JSON accessors can produce NULL from
//! non-null operands (a missing key), and any operator absent from the
//! tables gets the same treatment: assume the result may be NULL.

/// How an operator's result nullability relates to its operands'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSafety {
    /// Result is NULL iff at least one operand is NULL.
    Safe,
    /// Result may be NULL even when no operand is. The default for
    /// operators the tables do not know.
    Unsafe,
    /// Result is never NULL, whatever the operands are.
    NeverNull,
    /// Result is always NULL. No built-in operator currently carries this
    /// class; it exists so the metadata model covers the full lattice.
    AlwaysNull,
}

/// Strict operators. Keyword operators are stored uppercase; the probe is
/// uppercased before lookup. Must stay sorted for `binary_search`.
const SAFE: &[&str] = &[
    "!",
    "!!",
    "!=",
    "!~",
    "!~*",
    "#",
    "%",
    "&",
    "*",
    "+",
    "-",
    "/",
    "<",
    "<<",
    "<=",
    "<>",
    "=",
    ">",
    ">=",
    ">>",
    "@",
    "AND",
    "BETWEEN",
    "BETWEEN SYMMETRIC",
    "ILIKE",
    "LIKE",
    "NOT",
    "NOT BETWEEN",
    "NOT BETWEEN SYMMETRIC",
    "NOT ILIKE",
    "NOT LIKE",
    "NOT SIMILAR TO",
    "OR",
    "SIMILAR TO",
    "^",
    "|",
    "|/",
    "||",
    "||/",
    "~",
    "~*",
];

/// Operators that always yield a non-null boolean. Must stay sorted.
const NEVER_NULL: &[&str] = &[
    "IS DISTINCT FROM",
    "IS FALSE",
    "IS NOT DISTINCT FROM",
    "IS NOT FALSE",
    "IS NOT NULL",
    "IS NOT TRUE",
    "IS NOT UNKNOWN",
    "IS NULL",
    "IS TRUE",
    "IS UNKNOWN",
    "ISNULL",
    "NOTNULL",
];

/// Operators known to produce NULL from non-null operands. Must stay sorted.
const UNSAFE: &[&str] = &["#>", "#>>", "->", "->>"];

/// Binary operators for which `a op b` and `b op a` are interchangeable.
/// Must stay sorted.
const COMMUTATIVE: &[&str] = &["!=", "*", "+", "<>", "=", "AND", "OR"];

const CLASSES: &[(&[&str], NullSafety)] = &[
    (SAFE, NullSafety::Safe),
    (NEVER_NULL, NullSafety::NeverNull),
    (UNSAFE, NullSafety::Unsafe),
];

/// Looks up the null-safety class of an operator. Operators missing from
/// every table are [`NullSafety::Unsafe`].
#[must_use]
pub fn null_safety(op: &str) -> NullSafety {
    let probe = op.to_ascii_uppercase();
    for (table, class) in CLASSES {
        if table.binary_search(&probe.as_str()).is_ok() {
            return *class;
        }
    }
    NullSafety::Unsafe
}

/// Whether swapping the operands of a binary operator preserves meaning.
#[must_use]
pub fn is_commutative(op: &str) -> bool {
    let probe = op.to_ascii_uppercase();
    COMMUTATIVE.binary_search(&probe.as_str()).is_ok()
}
