//! Parse failure type and human-readable rendering.

/// A parse failure.
///
/// Carries the byte offset of the failure, a description of what was
/// expected there, and a snapshot of the named grammar scopes that were
/// active when the failure was produced (outermost first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Byte offset into the source where parsing failed.
    pub offset: usize,
    /// What the parser expected at the failure position.
    pub expected: String,
    /// Active grammar scopes, outermost first.
    pub scopes: Vec<&'static str>,
}

impl ParseFailure {
    /// Creates a new failure.
    #[must_use]
    pub fn new(offset: usize, expected: impl Into<String>, scopes: Vec<&'static str>) -> Self {
        Self {
            offset,
            expected: expected.into(),
            scopes,
        }
    }

    /// The 1-based line and column of the failure within `source`.
    #[must_use]
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = self.offset.min(source.len());
        let before = &source[..offset];
        let line = before.bytes().filter(|b| *b == b'\n').count() + 1;
        let col = before
            .rfind('\n')
            .map_or_else(|| before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        (line, col)
    }

    /// Renders the failure against its source text: the message, the
    /// offending line, a caret marking the column, and the grammar scope
    /// breadcrumbs.
    #[must_use]
    pub fn explain(&self, source: &str) -> String {
        let (line, col) = self.line_col(source);
        let mut out = format!("expected {} at line {line}, column {col}\n", self.expected);
        if let Some(text) = source.lines().nth(line - 1) {
            out.push_str(text);
            out.push('\n');
            for _ in 1..col {
                out.push(' ');
            }
            out.push('^');
            out.push('\n');
        }
        for scope in self.scopes.iter().rev() {
            out.push_str("  while parsing ");
            out.push_str(scope);
            out.push('\n');
        }
        out
    }
}

impl core::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "expected {} at byte offset {}", self.expected, self.offset)?;
        if let Some(scope) = self.scopes.last() {
            write!(f, " while parsing {scope}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseFailure {}
