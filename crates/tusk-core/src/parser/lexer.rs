//! Token-level parsers: whitespace and comments, keywords, identifiers,
//! literals, parameters, and operator symbols.
//!
//! Every token parser is atomic: it skips leading whitespace, and on failure
//! rewinds to where it was called, so alternation over token parsers never
//! sees a partially consumed branch.

use super::combinators::{PResult, ParseState};
use super::keywords;

/// Characters that may form an operator.
const OPERATOR_CHARS: &str = "+-*/<>=~!@#%^&|`?";

/// Operator characters that license a trailing `+` or `-`.
const OPERATOR_SPECIALS: &str = "~!@#%^&|`?";

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Consumes whitespace, `--` line comments, and nested `/* */` block
/// comments.
pub(crate) fn skip_ws(st: &mut ParseState<'_>) {
    loop {
        let rest = st.rest();
        if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace()) {
            st.advance(c.len_utf8());
        } else if rest.starts_with("--") {
            let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            st.advance(len);
        } else if rest.starts_with("/*") {
            st.advance(block_comment_len(rest));
        } else {
            return;
        }
    }
}

fn block_comment_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += 1;
        }
    }
    // Unterminated comment swallows the rest; the caller then reports
    // whatever it was expecting at end of input.
    rest.len()
}

/// Matches `kw` case-insensitively as a whole word.
pub(crate) fn keyword(kw: &'static str) -> impl Fn(&mut ParseState<'_>) -> PResult<()> {
    move |st: &mut ParseState<'_>| {
        let start = st.pos();
        skip_ws(st);
        let rest = st.rest();
        let matched = rest
            .get(..kw.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(kw))
            && rest[kw.len()..].chars().next().is_none_or(|c| !is_ident_continue(c));
        if matched {
            st.advance(kw.len());
            Ok(())
        } else {
            let failure = st.error(kw);
            st.rewind(start);
            Err(failure)
        }
    }
}

/// Matches a sequence of keywords atomically: if a later word is missing the
/// whole phrase rewinds.
pub(crate) fn phrase(words: &'static [&'static str]) -> impl Fn(&mut ParseState<'_>) -> PResult<()> {
    move |st: &mut ParseState<'_>| {
        let start = st.pos();
        for word in words {
            if let Err(failure) = keyword(word)(st) {
                st.rewind(start);
                return Err(failure);
            }
        }
        Ok(())
    }
}

/// Matches a punctuation or operator symbol exactly.
///
/// Symbols made of operator characters use maximal munch: `symbol("<")` does
/// not match the front of `<=`.
pub(crate) fn symbol(sym: &'static str) -> impl Fn(&mut ParseState<'_>) -> PResult<()> {
    move |st: &mut ParseState<'_>| {
        let start = st.pos();
        skip_ws(st);
        let matched = if sym.chars().all(|c| OPERATOR_CHARS.contains(c)) {
            operator_run(st.rest()) == sym
        } else {
            st.rest().starts_with(sym)
        };
        if matched {
            st.advance(sym.len());
            Ok(())
        } else {
            let failure = st.error(format!("\"{sym}\""));
            st.rewind(start);
            Err(failure)
        }
    }
}

/// The longest valid operator at the front of `rest`.
///
/// Follows the PostgreSQL lexer rules: the run stops before `--` or `/*`,
/// and may only end in `+` or `-` when it contains one of the characters in
/// [`OPERATOR_SPECIALS`].
pub(crate) fn operator_run(rest: &str) -> &str {
    let bytes = rest.as_bytes();
    let mut len = 0;
    while len < bytes.len() {
        let c = bytes[len] as char;
        if !OPERATOR_CHARS.contains(c) {
            break;
        }
        if c == '-' && bytes.get(len + 1) == Some(&b'-') {
            break;
        }
        if c == '/' && bytes.get(len + 1) == Some(&b'*') {
            break;
        }
        len += 1;
    }
    if !rest[..len].chars().any(|c| OPERATOR_SPECIALS.contains(c)) {
        while len > 1 && matches!(bytes[len - 1], b'+' | b'-') {
            len -= 1;
        }
    }
    &rest[..len]
}

/// Matches any operator token, returning its text.
pub(crate) fn operator(st: &mut ParseState<'_>) -> PResult<String> {
    let start = st.pos();
    skip_ws(st);
    let run = operator_run(st.rest());
    if run.is_empty() {
        let failure = st.error("an operator");
        st.rewind(start);
        return Err(failure);
    }
    let text = run.to_owned();
    st.advance(text.len());
    Ok(text)
}

/// Matches an identifier.
///
/// Unquoted identifiers are folded to lowercase and must not be reserved
/// words; `"quoted"` identifiers are taken verbatim with `""` unescaped to
/// `"`.
pub(crate) fn identifier(st: &mut ParseState<'_>) -> PResult<String> {
    let start = st.pos();
    skip_ws(st);
    if st.rest().starts_with('"') {
        return quoted_identifier(st, start);
    }
    let rest = st.rest();
    let len = rest
        .char_indices()
        .find(|&(i, c)| {
            if i == 0 {
                !is_ident_start(c)
            } else {
                !is_ident_continue(c)
            }
        })
        .map_or(rest.len(), |(i, _)| i);
    if len == 0 {
        let failure = st.error("an identifier");
        st.rewind(start);
        return Err(failure);
    }
    let word = &rest[..len];
    if keywords::is_reserved(word) {
        let failure = st.error(format!("an identifier (\"{word}\" is a reserved word)"));
        st.rewind(start);
        return Err(failure);
    }
    let word = word.to_ascii_lowercase();
    st.advance(len);
    Ok(word)
}

fn quoted_identifier(st: &mut ParseState<'_>, start: usize) -> PResult<String> {
    match scan_quoted(st.rest(), '"') {
        Some((content, len)) if !content.is_empty() => {
            st.advance(len);
            Ok(content)
        }
        Some(_) => {
            let failure = st.error("a non-empty quoted identifier");
            st.rewind(start);
            Err(failure)
        }
        None => {
            let failure = st.error("a closing \"");
            st.rewind(start);
            Err(failure)
        }
    }
}

/// Matches a `'string'` literal, returning its content with `''` unescaped.
pub(crate) fn string_literal(st: &mut ParseState<'_>) -> PResult<String> {
    let start = st.pos();
    skip_ws(st);
    if !st.rest().starts_with('\'') {
        let failure = st.error("a string literal");
        st.rewind(start);
        return Err(failure);
    }
    match scan_quoted(st.rest(), '\'') {
        Some((content, len)) => {
            st.advance(len);
            Ok(content)
        }
        None => {
            let failure = st.error("a closing '");
            st.rewind(start);
            Err(failure)
        }
    }
}

/// Scans a quote-delimited token whose quote is escaped by doubling.
/// Returns the unescaped content and the total byte length consumed, or
/// `None` when unterminated.
fn scan_quoted(rest: &str, quote: char) -> Option<(String, usize)> {
    let mut content = String::new();
    let mut i = quote.len_utf8();
    loop {
        let chunk = rest.get(i..)?;
        let j = chunk.find(quote)?;
        content.push_str(&chunk[..j]);
        let after = i + j + quote.len_utf8();
        if rest[after..].starts_with(quote) {
            content.push(quote);
            i = after + quote.len_utf8();
        } else {
            return Some((content, after));
        }
    }
}

/// Matches a numeric literal, keeping its raw text.
pub(crate) fn number(st: &mut ParseState<'_>) -> PResult<String> {
    let start = st.pos();
    skip_ws(st);
    let rest = st.rest();
    let len = scan_number(rest);
    let valid = len > 0
        && rest[len..]
            .chars()
            .next()
            .is_none_or(|c| !is_ident_continue(c) && c != '.');
    if valid {
        let text = rest[..len].to_owned();
        st.advance(len);
        Ok(text)
    } else {
        let failure = st.error("a number");
        st.rewind(start);
        Err(failure)
    }
}

fn scan_number(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        // A bare "." is not a number; "1." and ".5" are.
        if i > 0 || j > i + 1 {
            i = j;
        }
    }
    if i == 0 {
        return 0;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let digits = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > digits {
            i = j;
        }
    }
    i
}

/// Matches a positional parameter `$n`.
pub(crate) fn param(st: &mut ParseState<'_>) -> PResult<u32> {
    let start = st.pos();
    skip_ws(st);
    let rest = st.rest();
    if !rest.starts_with('$') {
        let failure = st.error("a parameter");
        st.rewind(start);
        return Err(failure);
    }
    let digits = rest[1..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len() - 1);
    match rest[1..1 + digits].parse::<u32>() {
        Ok(index) if index > 0 => {
            st.advance(1 + digits);
            Ok(index)
        }
        _ => {
            let failure = st.error("a parameter number");
            st.rewind(start);
            Err(failure)
        }
    }
}
