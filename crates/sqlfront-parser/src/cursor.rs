// Token cursor with non-destructive lookahead.
//
// A `Cursor` borrows a token slice and tracks a read position plus an
// exclusive `end` bound. Sub-cursors produced by `carve_to` share the backing
// slice but see a shorter range, so a rule handed a sub-cursor cannot read
// past its operand. A `Probe` is a bare index advanced independently of the
// cursor; probing never moves the cursor it came from.

use sqlfront_ast::Span;

use crate::diag::{Diagnostics, ParseResult};
use crate::token::{Token, TokenKind};

/// An independent lookahead position into a cursor's range.
///
/// `Copy`, so callers can fork a probe freely. All reads through a probe go
/// via [`Cursor::probe_kind`], which applies the cursor's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    idx: usize,
}

impl Probe {
    /// Advance past one token.
    pub fn bump(&mut self) {
        self.idx += 1;
    }

    /// The absolute token index.
    #[must_use]
    pub fn index(self) -> usize {
        self.idx
    }
}

/// A bounded view over a token slice.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Exclusive bound. Reads at or past it see the sentinel.
    end: usize,
    /// End-of-range sentinel returned by reads past the bound.
    sentinel: Token,
}

impl<'a> Cursor<'a> {
    /// Cursor over a full token slice.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.len();
        let offset = tokens.last().map_or(0, |t| t.span.end);
        Self {
            tokens,
            pos: 0,
            end,
            sentinel: Token::eof(offset),
        }
    }

    /// The current absolute token index.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The exclusive bound of this view.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the cursor has consumed its whole range.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end || matches!(self.token_at(self.pos).kind, TokenKind::Eof)
    }

    /// Token at an absolute index, clamped to the bound.
    #[must_use]
    pub fn token_at(&self, idx: usize) -> &Token {
        if idx < self.end {
            &self.tokens[idx]
        } else {
            &self.sentinel
        }
    }

    /// The current token without consuming it.
    #[must_use]
    pub fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    /// The token `n` positions ahead without consuming anything.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    /// Byte offset of the current token, for diagnostics.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.peek().span.start
    }

    /// Whether the current token matches `kind` exactly.
    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    /// Whether the token `n` ahead matches `kind` exactly.
    #[must_use]
    pub fn check_nth(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_nth(n).kind == *kind
    }

    /// Consume and return the current token. Errors past the bound.
    pub fn advance(&mut self) -> ParseResult<Token> {
        if self.pos >= self.end {
            return Err(Diagnostics::expected(
                "a token",
                "end of input",
                self.sentinel.span.start,
            ));
        }
        let tok = self.tokens[self.pos].clone();
        self.pos += 1;
        Ok(tok)
    }

    /// Consume the current token if it matches `kind`; return its span.
    pub fn eat(&mut self, kind: &TokenKind) -> Option<Span> {
        if self.check(kind) && self.pos < self.end {
            let span = self.tokens[self.pos].span;
            self.pos += 1;
            Some(span)
        } else {
            None
        }
    }

    /// Require the current token to match `kind`, describing the expectation
    /// as `what` in the diagnostic on mismatch.
    pub fn expect(&mut self, kind: &TokenKind, what: &str) -> ParseResult<Span> {
        match self.eat(kind) {
            Some(span) => Ok(span),
            None => {
                let found = self.peek();
                Err(Diagnostics::expected(
                    what,
                    found.kind.describe(),
                    found.span.start,
                ))
            }
        }
    }

    /// A probe starting at the current position.
    #[must_use]
    pub fn probe(&self) -> Probe {
        Probe { idx: self.pos }
    }

    /// Token kind at a probe position, respecting the bound.
    #[must_use]
    pub fn probe_kind(&self, p: Probe) -> &TokenKind {
        &self.token_at(p.idx).kind
    }

    /// Forward scan for the first token at nesting depth zero matching
    /// `is_terminator`, starting from the current position. Returns the
    /// absolute index, or the bound when none is found.
    ///
    /// Depth counts `( )`, `[ ]`, and `CASE ... END` pairs, so terminators
    /// inside any of those are shielded.
    #[must_use]
    pub fn find(&self, is_terminator: impl Fn(&TokenKind) -> bool) -> usize {
        let mut depth = 0u32;
        let mut idx = self.pos;
        while idx < self.end {
            let kind = &self.tokens[idx].kind;
            match kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::KwCase => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::KwEnd => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Eof => return idx,
                _ => {}
            }
            if depth == 0 && is_terminator(kind) {
                return idx;
            }
            idx += 1;
        }
        self.end
    }

    /// Index of the `)` matching a `(` at the current position, or `None`
    /// when the current token is not `(` or the paren is unbalanced.
    #[must_use]
    pub fn matching_paren(&self) -> Option<usize> {
        if !self.check(&TokenKind::LeftParen) {
            return None;
        }
        let mut depth = 0u32;
        let mut idx = self.pos;
        while idx < self.end {
            match self.tokens[idx].kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        None
    }

    /// Split off a bounded sub-cursor over `[pos, idx)` and jump this cursor
    /// to `idx`. The sub-cursor shares the backing slice.
    #[must_use]
    pub fn carve_to(&mut self, idx: usize) -> Cursor<'a> {
        debug_assert!(idx >= self.pos && idx <= self.end);
        let sentinel_offset = if idx < self.tokens.len() {
            self.tokens[idx].span.start
        } else {
            self.sentinel.span.start
        };
        let child = Cursor {
            tokens: self.tokens,
            pos: self.pos,
            end: idx,
            sentinel: Token::eof(sentinel_offset),
        };
        self.pos = idx;
        child
    }

    /// Narrow this cursor's bound in place to `idx`.
    pub fn truncate(&mut self, idx: usize) {
        debug_assert!(idx >= self.pos && idx <= self.end);
        if idx < self.tokens.len() {
            self.sentinel = Token::eof(self.tokens[idx].span.start);
        }
        self.end = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::QuoteStyle;
    use crate::lexer::Lexer;

    fn toks(sql: &str) -> Vec<Token> {
        Lexer::tokenize(sql, QuoteStyle::ANSI)
    }

    #[test]
    fn peek_does_not_move() {
        let tokens = toks("a + b");
        let cur = Cursor::new(&tokens);
        assert_eq!(cur.peek().kind, TokenKind::Id("a".to_owned()));
        assert_eq!(cur.peek().kind, TokenKind::Id("a".to_owned()));
        assert_eq!(cur.peek_nth(1).kind, TokenKind::Plus);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn peek_past_end_is_sentinel() {
        let tokens = toks("a");
        let cur = Cursor::new(&tokens);
        assert_eq!(cur.peek_nth(99).kind, TokenKind::Eof);
    }

    #[test]
    fn advance_past_end_errors() {
        let tokens = toks("");
        let mut cur = Cursor::new(&tokens);
        assert!(cur.advance().is_ok()); // the Eof token itself
        assert!(cur.advance().is_err());
    }

    #[test]
    fn probe_never_moves_cursor() {
        let tokens = toks("a AND b");
        let cur = Cursor::new(&tokens);
        let mut p = cur.probe();
        p.bump();
        p.bump();
        assert_eq!(*cur.probe_kind(p), TokenKind::Id("b".to_owned()));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn find_skips_nested_parens() {
        let tokens = toks("(a OR b) OR c");
        let cur = Cursor::new(&tokens);
        let idx = cur.find(|k| *k == TokenKind::KwOr);
        assert_eq!(tokens[idx].kind, TokenKind::KwOr);
        // Index 2 is the inner OR; the depth-0 one comes after the parens.
        assert!(idx > 4);
    }

    #[test]
    fn find_skips_case_end() {
        let tokens = toks("CASE WHEN a OR b THEN 1 END OR c");
        let cur = Cursor::new(&tokens);
        let idx = cur.find(|k| *k == TokenKind::KwOr);
        // The OR inside CASE ... END is shielded.
        assert_eq!(tokens[idx + 1].kind, TokenKind::Id("c".to_owned()));
    }

    #[test]
    fn find_returns_bound_when_absent() {
        let tokens = toks("a + b");
        let cur = Cursor::new(&tokens);
        assert_eq!(cur.find(|k| *k == TokenKind::KwOr), cur.end());
    }

    #[test]
    fn carve_bounds_child_and_jumps_parent() {
        let tokens = toks("a = 1 OR b = 2");
        let mut cur = Cursor::new(&tokens);
        let idx = cur.find(|k| *k == TokenKind::KwOr);
        let mut child = cur.carve_to(idx);
        assert_eq!(cur.peek().kind, TokenKind::KwOr);
        // Child sees only `a = 1`.
        let mut seen = 0;
        while child.advance().is_ok() {
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert_eq!(child.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn matching_paren_finds_partner() {
        let tokens = toks("((a), b)");
        let cur = Cursor::new(&tokens);
        let idx = cur.matching_paren().unwrap();
        assert_eq!(tokens[idx].kind, TokenKind::RightParen);
        assert_eq!(idx, 6);
    }

    #[test]
    fn matching_paren_requires_open() {
        let tokens = toks("a)");
        let cur = Cursor::new(&tokens);
        assert!(cur.matching_paren().is_none());
    }
}
