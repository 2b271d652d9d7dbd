//! Backtracking parser combinator runtime.
//!
//! A parser is any `Fn(&mut ParseState<'_>) -> PResult<T>`. Grammar rules are
//! plain functions with that shape; the combinators here compose them.
//! Alternation commits to a branch as soon as it consumes input: a branch
//! that fails after consuming aborts the whole [`one_of`], unless it is
//! wrapped in [`attempt`], which rewinds the cursor on failure.

use super::error::ParseFailure;

/// Result of running a parser.
pub type PResult<T> = Result<T, ParseFailure>;

/// Parsing state: source text, byte cursor, and the active grammar scopes.
#[derive(Debug)]
pub struct ParseState<'s> {
    src: &'s str,
    pos: usize,
    scopes: Vec<&'static str>,
}

impl<'s> ParseState<'s> {
    /// Creates a state positioned at the start of `src`.
    #[must_use]
    pub const fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            scopes: Vec::new(),
        }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// The full source text.
    #[must_use]
    pub const fn source(&self) -> &'s str {
        self.src
    }

    /// The unconsumed remainder of the source.
    #[must_use]
    pub fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    /// True once the cursor has reached the end of the source.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// The next character, if any.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advances the cursor by `bytes`. Callers must stay on a character
    /// boundary.
    pub fn advance(&mut self, bytes: usize) {
        self.pos += bytes;
        debug_assert!(self.src.is_char_boundary(self.pos));
    }

    /// Moves the cursor back to an earlier position.
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    /// Builds a failure at the current position, snapshotting the scope
    /// chain.
    #[must_use]
    pub fn error(&self, expected: impl Into<String>) -> ParseFailure {
        self.error_at(self.pos, expected)
    }

    /// Builds a failure at an explicit offset.
    #[must_use]
    pub fn error_at(&self, offset: usize, expected: impl Into<String>) -> ParseFailure {
        ParseFailure::new(offset, expected, self.scopes.clone())
    }

    fn push_scope(&mut self, name: &'static str) {
        self.scopes.push(name);
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }
}

/// Anything that can be run against a [`ParseState`].
///
/// Implemented for every `Fn(&mut ParseState<'s>) -> PResult<Out>`, so both
/// named grammar functions and combinator-built closures qualify.
pub trait Parser<'s, Out> {
    /// Runs the parser, advancing the state on success.
    fn run(&self, st: &mut ParseState<'s>) -> PResult<Out>;
}

impl<'s, Out, F> Parser<'s, Out> for F
where
    F: Fn(&mut ParseState<'s>) -> PResult<Out>,
{
    fn run(&self, st: &mut ParseState<'s>) -> PResult<Out> {
        self(st)
    }
}

/// Transforms a parser's output.
pub fn map<'s, A, B>(
    parser: impl Parser<'s, A>,
    f: impl Fn(A) -> B,
) -> impl Fn(&mut ParseState<'s>) -> PResult<B> {
    move |st| parser.run(st).map(|value| f(value))
}

/// Transforms a parser's output through a fallible check.
///
/// When the check fails, the cursor rewinds to where the inner parser
/// started and the failure is reported at that offset, so an enclosing
/// [`one_of`] can still try its remaining alternatives.
pub fn try_map<'s, A, B>(
    parser: impl Parser<'s, A>,
    f: impl Fn(A) -> Result<B, String>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<B> {
    move |st| {
        let start = st.pos();
        let value = parser.run(st)?;
        match f(value) {
            Ok(mapped) => Ok(mapped),
            Err(expected) => {
                let failure = st.error_at(start, expected);
                st.rewind(start);
                Err(failure)
            }
        }
    }
}

/// Rewinds the cursor when the inner parser fails, making the failure look
/// consumption-free to an enclosing [`one_of`] or [`many`].
///
/// The failure itself keeps its original offset, so error reporting still
/// points at the deepest position reached.
pub fn attempt<'s, Out>(
    parser: impl Parser<'s, Out>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Out> {
    move |st| {
        let start = st.pos();
        match parser.run(st) {
            Ok(value) => Ok(value),
            Err(failure) => {
                st.rewind(start);
                Err(failure)
            }
        }
    }
}

/// Makes a parser optional: a failure without consumption yields `None`,
/// while a failure after consumption propagates.
pub fn opt<'s, Out>(
    parser: impl Parser<'s, Out>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Option<Out>> {
    move |st| {
        let start = st.pos();
        match parser.run(st) {
            Ok(value) => Ok(Some(value)),
            Err(failure) => {
                if st.pos() == start {
                    Ok(None)
                } else {
                    Err(failure)
                }
            }
        }
    }
}

/// Zero or more repetitions.
///
/// Stops cleanly when the element parser fails without consuming input; a
/// failure mid-element propagates rather than silently truncating the list.
pub fn many<'s, Out>(
    parser: impl Parser<'s, Out>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Vec<Out>> {
    move |st| {
        let mut items = Vec::new();
        loop {
            let start = st.pos();
            match parser.run(st) {
                Ok(item) => {
                    items.push(item);
                    if st.pos() == start {
                        // Zero-width success would loop forever.
                        return Ok(items);
                    }
                }
                Err(failure) => {
                    if st.pos() == start {
                        return Ok(items);
                    }
                    return Err(failure);
                }
            }
        }
    }
}

/// One or more `parser` occurrences separated by `sep`.
///
/// A trailing separator with no element after it is a failure, as is an
/// element that consumes input and then fails.
pub fn sep_by1<'s, Out, S>(
    parser: impl Parser<'s, Out>,
    sep: impl Parser<'s, S>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Vec<Out>> {
    move |st| {
        let mut items = vec![parser.run(st)?];
        loop {
            let start = st.pos();
            match sep.run(st) {
                Ok(_) => items.push(parser.run(st)?),
                Err(failure) => {
                    if st.pos() == start {
                        return Ok(items);
                    }
                    return Err(failure);
                }
            }
        }
    }
}

/// Zero or more `parser` occurrences separated by `sep`.
pub fn sep_by<'s, Out, S>(
    parser: impl Parser<'s, Out>,
    sep: impl Parser<'s, S>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Vec<Out>> {
    map(opt(sep_by1(parser, sep)), Option::unwrap_or_default)
}

/// Defers parser construction to call time, breaking initialization cycles
/// between mutually recursive combinator expressions.
pub fn lazy<'s, Out, P: Parser<'s, Out>>(
    build: impl Fn() -> P,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Out> {
    move |st| build().run(st)
}

/// Names a grammar scope for the duration of the inner parser. Failures
/// produced inside carry the scope chain as breadcrumbs.
pub fn scope<'s, Out>(
    name: &'static str,
    parser: impl Parser<'s, Out>,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Out> {
    move |st| {
        st.push_scope(name);
        let result = parser.run(st);
        st.pop_scope();
        result
    }
}

/// A heterogeneous tuple of parsers run in order.
pub trait Seq<'s> {
    /// Tuple of the element parsers' outputs.
    type Output;

    /// Runs each element in order, failing on the first failure.
    fn run_seq(&self, st: &mut ParseState<'s>) -> PResult<Self::Output>;
}

macro_rules! impl_seq_tuple {
    ($($idx:tt: $P:ident => $T:ident),+) => {
        impl<'s, $($T,)+ $($P,)+> Seq<'s> for ($($P,)+)
        where
            $($P: Fn(&mut ParseState<'s>) -> PResult<$T>,)+
        {
            type Output = ($($T,)+);

            fn run_seq(&self, st: &mut ParseState<'s>) -> PResult<Self::Output> {
                Ok(($(self.$idx.run(st)?,)+))
            }
        }
    };
}

impl_seq_tuple!(0: P0 => T0);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2, 3: P3 => T3);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2, 3: P3 => T3, 4: P4 => T4);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2, 3: P3 => T3, 4: P4 => T4, 5: P5 => T5);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2, 3: P3 => T3, 4: P4 => T4, 5: P5 => T5, 6: P6 => T6);
impl_seq_tuple!(0: P0 => T0, 1: P1 => T1, 2: P2 => T2, 3: P3 => T3, 4: P4 => T4, 5: P5 => T5, 6: P6 => T6, 7: P7 => T7);

/// Runs a tuple of parsers in order and combines their outputs with `f`.
pub fn seq<'s, S: Seq<'s>, Out>(
    parsers: S,
    f: impl Fn(S::Output) -> Out,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Out> {
    move |st| parsers.run_seq(st).map(|value| f(value))
}

/// A homogeneous tuple of alternative parsers.
pub trait Alt<'s, Out> {
    /// Tries each alternative in order.
    fn run_alt(&self, st: &mut ParseState<'s>) -> PResult<Out>;
}

macro_rules! impl_alt_tuple {
    ($($idx:tt: $P:ident),+) => {
        impl<'s, Out, $($P: Parser<'s, Out>,)+> Alt<'s, Out> for ($($P,)+) {
            fn run_alt(&self, st: &mut ParseState<'s>) -> PResult<Out> {
                let start = st.pos();
                let mut deepest: Option<ParseFailure> = None;
                $(
                    match self.$idx.run(st) {
                        Ok(value) => return Ok(value),
                        Err(failure) => {
                            if st.pos() != start {
                                return Err(failure);
                            }
                            if deepest.as_ref().map_or(true, |d| failure.offset > d.offset) {
                                deepest = Some(failure);
                            }
                        }
                    }
                )+
                match deepest {
                    Some(failure) => Err(failure),
                    None => Err(st.error("one of the alternatives")),
                }
            }
        }
    };
}

impl_alt_tuple!(0: P0);
impl_alt_tuple!(0: P0, 1: P1);
impl_alt_tuple!(0: P0, 1: P1, 2: P2);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7, 8: P8);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7, 8: P8, 9: P9);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7, 8: P8, 9: P9, 10: P10);
impl_alt_tuple!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7, 8: P8, 9: P9, 10: P10, 11: P11);

/// Tries alternatives in order.
///
/// An alternative that fails without consuming input lets the next one run;
/// one that consumed input propagates its failure immediately. If every
/// alternative fails, the failure that reached deepest into the input is
/// reported.
pub fn one_of<'s, Out, A: Alt<'s, Out>>(
    alternatives: A,
) -> impl Fn(&mut ParseState<'s>) -> PResult<Out> {
    move |st| alternatives.run_alt(st)
}
