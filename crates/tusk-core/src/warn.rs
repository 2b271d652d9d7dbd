//! Warning accumulator: a value plus ordered non-fatal diagnostics.
//!
//! Warnings concatenate left to right and are never deduplicated or
//! reordered, so the rendered output of a pipeline is deterministic.

/// A non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// One-line summary, always rendered.
    pub summary: String,
    /// Longer explanation, rendered in verbose output.
    pub description: String,
}

impl Warning {
    /// Creates a warning.
    pub fn new(summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
        }
    }
}

/// A payload with zero or more warnings attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warn<T> {
    /// The carried value.
    pub payload: T,
    /// Diagnostics accumulated while producing it, oldest first.
    pub warnings: Vec<Warning>,
}

impl<T> Warn<T> {
    /// Wraps a payload with no warnings.
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            warnings: Vec::new(),
        }
    }

    /// Wraps a payload with a single warning.
    pub fn warn(payload: T, summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            payload,
            warnings: vec![Warning::new(summary, description)],
        }
    }

    /// Wraps a payload with an existing warning list.
    pub fn with_warnings(payload: T, warnings: Vec<Warning>) -> Self {
        Self { payload, warnings }
    }

    /// Transforms the payload, leaving the warnings untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warn<U> {
        Warn {
            payload: f(self.payload),
            warnings: self.warnings,
        }
    }

    /// Sequences a warning-producing continuation. The continuation's
    /// warnings follow this value's.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Warn<U>) -> Warn<U> {
        let mut next = f(self.payload);
        let mut warnings = self.warnings;
        warnings.append(&mut next.warnings);
        Warn {
            payload: next.payload,
            warnings,
        }
    }

    /// Pairs two values, concatenating warnings left before right.
    pub fn zip<U>(self, other: Warn<U>) -> Warn<(T, U)> {
        let mut warnings = self.warnings;
        let mut right = other.warnings;
        warnings.append(&mut right);
        Warn {
            payload: (self.payload, other.payload),
            warnings,
        }
    }
}
