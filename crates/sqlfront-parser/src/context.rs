// Rule dispatch and composition.
//
// Every grammar rule implements `GrammarRule` and is invoked through
// `ParseContext::parse`, which is the single dispatch point (and the tracing
// boundary). `InfixRule` is the continuation protocol for left-associative
// operator levels; `MatchableRule` is the cheap-test protocol for optional
// postfix constructs. Dispatch is resolved entirely at compile time.

use sqlfront_ast::Expr;
use tracing::trace;

use crate::cursor::Cursor;
use crate::diag::{Diagnostics, ParseResult};
use crate::dialect::{Dialect, Feature, OperatorPolicy};
use crate::lookup::Lookups;
use crate::token::TokenKind;

/// Names every registered grammar rule, for tracing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Expr,
    Predicate,
    Query,
    SelectQuery,
    SelectItem,
    FromItem,
    TableRef,
    CteDef,
    OrderItem,
    GroupItem,
    WindowSpec,
    FrameSpec,
    TypeName,
}

impl RuleKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Expr => "expr",
            Self::Predicate => "predicate",
            Self::Query => "query",
            Self::SelectQuery => "select-query",
            Self::SelectItem => "select-item",
            Self::FromItem => "from-item",
            Self::TableRef => "table-ref",
            Self::CteDef => "cte-def",
            Self::OrderItem => "order-item",
            Self::GroupItem => "group-item",
            Self::WindowSpec => "window-spec",
            Self::FrameSpec => "frame-spec",
            Self::TypeName => "type-name",
        }
    }
}

/// A parse rule producing one AST node kind.
///
/// Rules call each other only through [`ParseContext::parse`], never
/// directly, so every dispatch is observable and uniformly gated.
pub trait GrammarRule: Sized {
    const KIND: RuleKind;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self>;
}

/// One left-associative operator level.
///
/// `operand` parses the next-tighter level; `at_operator` is a pure test for
/// this level's operator at the cursor; `combine` consumes the operator and
/// one right operand, folding it onto `left`.
pub trait InfixRule {
    type Output;

    fn operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self::Output>;
    fn at_operator(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool;
    fn combine(
        cx: &ParseContext<'_>,
        cur: &mut Cursor<'_>,
        left: Self::Output,
    ) -> ParseResult<Self::Output>;
}

/// An optional postfix construct over an expression (COLLATE, AT TIME ZONE,
/// subscript). `matches` is a cheap applicability test; `parse_suffix` only
/// runs when it returned true.
pub trait MatchableRule {
    fn matches(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool;
    fn parse_suffix(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr>;
}

/// The explicit, immutable dispatch context: a borrowed dialect and nothing
/// else. Cheap to copy into sub-parses.
#[derive(Clone, Copy)]
pub struct ParseContext<'d> {
    dialect: &'d Dialect,
}

impl<'d> ParseContext<'d> {
    #[must_use]
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    #[must_use]
    pub fn lookups(&self) -> &'d dyn Lookups {
        self.dialect.lookups()
    }

    #[must_use]
    pub fn operators(&self) -> &'d dyn OperatorPolicy {
        self.dialect.operators()
    }

    /// Gate a construct on a dialect feature. The diagnostic names the
    /// construct, so a disabled feature never surfaces as a syntax error.
    pub fn require(&self, feature: Feature, construct: &str, offset: u32) -> ParseResult<()> {
        if self.dialect.supports(feature) {
            Ok(())
        } else {
            Err(Diagnostics::unsupported(
                construct,
                feature,
                self.dialect.name(),
                offset,
            ))
        }
    }

    /// Dispatch to a rule by its node kind.
    pub fn parse<K: GrammarRule>(&self, cur: &mut Cursor<'_>) -> ParseResult<K> {
        trace!(rule = K::KIND.name(), pos = cur.pos(), "dispatch");
        K::parse(self, cur)
    }

    /// Dispatch to a rule, first stripping exactly one wrapping `( ... )`
    /// when its matching close paren ends the cursor's remaining range.
    /// Inner parens are the rule's own business.
    pub fn parse_enclosed<K: GrammarRule>(&self, cur: &mut Cursor<'_>) -> ParseResult<K> {
        if cur.check(&TokenKind::LeftParen) {
            if let Some(close) = cur.matching_paren() {
                if matches!(cur.token_at(close + 1).kind, TokenKind::Eof) {
                    cur.advance()?;
                    let mut inner = cur.carve_to(close);
                    let value = self.parse::<K>(&mut inner)?;
                    if !inner.is_at_end() {
                        let found = inner.peek();
                        return Err(Diagnostics::expected(
                            "')'",
                            found.kind.describe(),
                            found.span.start,
                        ));
                    }
                    cur.expect(&TokenKind::RightParen, "')'")?;
                    return Ok(value);
                }
            }
        }
        self.parse::<K>(cur)
    }

    /// The generic left-associative climb: one operand, then fold operators
    /// of this level as long as they keep appearing.
    pub fn climb<R: InfixRule>(&self, cur: &mut Cursor<'_>) -> ParseResult<R::Output> {
        let mut left = R::operand(self, cur)?;
        while R::at_operator(self, cur) {
            left = R::combine(self, cur, left)?;
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::QuoteStyle;
    use crate::lexer::Lexer;

    // A toy rule: a single integer literal.
    struct IntRule(i64);

    impl GrammarRule for IntRule {
        const KIND: RuleKind = RuleKind::Expr;

        fn parse(_cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
            let tok = cur.advance()?;
            match tok.kind {
                TokenKind::Integer(v) => Ok(Self(v)),
                other => Err(Diagnostics::expected(
                    "an integer",
                    other.describe(),
                    tok.span.start,
                )),
            }
        }
    }

    fn cx_parse_enclosed(sql: &str) -> ParseResult<IntRule> {
        let tokens = Lexer::tokenize(sql, QuoteStyle::ANSI);
        let dialect = Dialect::ansi();
        let cx = ParseContext::new(&dialect);
        let mut cur = Cursor::new(&tokens);
        cur.truncate(tokens.len() - 1); // exclude the Eof token from the range
        cx.parse_enclosed::<IntRule>(&mut cur)
    }

    #[test]
    fn parse_enclosed_strips_one_layer() {
        assert_eq!(cx_parse_enclosed("42").unwrap().0, 42);
        assert_eq!(cx_parse_enclosed("(42)").unwrap().0, 42);
    }

    #[test]
    fn parse_enclosed_strips_only_the_outermost() {
        // The inner layer is left for the rule, which rejects it.
        assert!(cx_parse_enclosed("((42))").is_err());
    }

    #[test]
    fn parse_enclosed_ignores_non_wrapping_parens() {
        // `(1) + 2` — the close paren does not end the range, so nothing is
        // stripped and the rule sees the `(` itself.
        assert!(cx_parse_enclosed("(1) 2").is_err());
    }

    #[test]
    fn require_reports_unsupported() {
        let dialect = Dialect::ansi();
        let cx = ParseContext::new(&dialect);
        let err = cx
            .require(Feature::DistinctOn, "DISTINCT ON", 3)
            .unwrap_err();
        assert!(err.first().to_string().contains("DISTINCT ON"));
        assert_eq!(err.first().offset, 3);

        let pg = Dialect::postgres();
        let cx = ParseContext::new(&pg);
        assert!(cx.require(Feature::DistinctOn, "DISTINCT ON", 3).is_ok());
    }
}
