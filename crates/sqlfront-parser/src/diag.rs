// Positioned diagnostics.
//
// Every parse failure is reported as one or more `Diagnostic` values, each
// carrying a byte offset into the source. Lookups never produce diagnostics;
// only committed grammar rules do. A failing sub-parse propagates immediately,
// so a `ParseResult` never carries a partial tree.

use std::fmt;

use thiserror::Error;

use crate::dialect::Feature;

/// The category of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    /// A specific token was required and something else was found.
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    /// The input does not match any grammar rule.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The construct is valid SQL but the active dialect does not allow it.
    #[error("{construct} is not supported by the {dialect} dialect")]
    Unsupported {
        construct: String,
        feature: Feature,
        dialect: String,
    },

    /// The input is grammatical but structurally invalid, like a CASE with
    /// no WHEN arm or a GROUP BY ordinal of zero.
    #[error("{0}")]
    Structural(String),
}

/// One diagnostic with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte offset into the source text.
    pub offset: u32,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, offset: u32) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.offset, self.kind)
    }
}

/// A non-empty accumulating list of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Start a list from its first diagnostic.
    #[must_use]
    pub fn new(first: Diagnostic) -> Self {
        Self { items: vec![first] }
    }

    /// Shorthand for a single `Expected` diagnostic.
    #[must_use]
    pub fn expected(expected: impl Into<String>, found: impl Into<String>, offset: u32) -> Self {
        Self::new(Diagnostic::new(
            DiagnosticKind::Expected {
                expected: expected.into(),
                found: found.into(),
            },
            offset,
        ))
    }

    /// Shorthand for a single `Syntax` diagnostic.
    #[must_use]
    pub fn syntax(message: impl Into<String>, offset: u32) -> Self {
        Self::new(Diagnostic::new(DiagnosticKind::Syntax(message.into()), offset))
    }

    /// Shorthand for a single `Structural` diagnostic.
    #[must_use]
    pub fn structural(message: impl Into<String>, offset: u32) -> Self {
        Self::new(Diagnostic::new(
            DiagnosticKind::Structural(message.into()),
            offset,
        ))
    }

    /// Shorthand for a single dialect-unsupported diagnostic.
    #[must_use]
    pub fn unsupported(
        construct: impl Into<String>,
        feature: Feature,
        dialect: impl Into<String>,
        offset: u32,
    ) -> Self {
        Self::new(Diagnostic::new(
            DiagnosticKind::Unsupported {
                construct: construct.into(),
                feature,
                dialect: dialect.into(),
            },
            offset,
        ))
    }

    /// Append one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Absorb another list.
    pub fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    /// The first diagnostic. The list is never empty.
    #[must_use]
    pub fn first(&self) -> &Diagnostic {
        &self.items[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// The result of a grammar rule: exactly one value, or at least one
/// positioned diagnostic.
pub type ParseResult<T> = Result<T, Diagnostics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_formats_both_sides() {
        let d = Diagnostics::expected("')'", "end of input", 17);
        assert_eq!(
            d.first().to_string(),
            "at byte 17: expected ')', found end of input"
        );
    }

    #[test]
    fn unsupported_names_construct_and_dialect() {
        let d = Diagnostics::unsupported("DISTINCT ON", Feature::DistinctOn, "ansi", 7);
        let text = d.first().to_string();
        assert!(text.contains("DISTINCT ON"));
        assert!(text.contains("ansi"));
    }

    #[test]
    fn merge_accumulates_in_order() {
        let mut a = Diagnostics::syntax("first", 0);
        let b = Diagnostics::syntax("second", 5);
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.first().offset, 0);
    }
}
