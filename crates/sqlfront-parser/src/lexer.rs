// SQL lexer.
//
// Converts SQL text into a stream of tokens. Uses memchr for accelerated
// string scanning. Identifier quoting is driven by the dialect's QuoteStyle;
// literal sub-kinds (escape/bit/hex/dollar strings) are classified here so
// the grammar rules never re-inspect lexemes.

use memchr::memchr;
use sqlfront_ast::Span;

use crate::dialect::QuoteStyle;
use crate::token::{Token, TokenKind};

/// SQL lexer that produces a stream of tokens from source text.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset into src.
    pos: usize,
    /// Which quote characters delimit identifiers.
    quotes: QuoteStyle,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given SQL source text.
    #[must_use]
    pub fn new(source: &'a str, quotes: QuoteStyle) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            quotes,
        }
    }

    /// Tokenize the entire input into a Vec of tokens ending with `Eof`.
    #[must_use]
    pub fn tokenize(source: &str, quotes: QuoteStyle) -> Vec<Token> {
        let mut lexer = Lexer::new(source, quotes);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        if self.pos >= self.src.len() {
            return Token::eof(self.pos as u32);
        }

        let start = self.pos;
        let ch = self.src[self.pos];

        let kind = match ch {
            // String literal (single-quoted)
            b'\'' => self.lex_string().map_or_else(|e| e, TokenKind::String),

            // Escape-string literal E'...'
            b'E' | b'e' if self.peek_at(1) == Some(b'\'') => self.lex_escape_string(),

            // Bit-string literal B'...'
            b'B' | b'b' if self.peek_at(1) == Some(b'\'') => self.lex_prefixed_string(|s| {
                if s.bytes().all(|c| c == b'0' || c == b'1') {
                    TokenKind::BitString(s)
                } else {
                    TokenKind::Error("invalid digit in bit-string literal".to_owned())
                }
            }),

            // Hex-string literal X'...'
            b'X' | b'x' if self.peek_at(1) == Some(b'\'') => self.lex_prefixed_string(|s| {
                if s.bytes().all(|c| c.is_ascii_hexdigit()) {
                    TokenKind::HexString(s)
                } else {
                    TokenKind::Error("invalid digit in hex-string literal".to_owned())
                }
            }),

            // Double-quoted identifier
            b'"' if self.quotes.double_quote => self.lex_quoted_id(b'"'),

            // Backtick-quoted identifier
            b'`' if self.quotes.backtick => self.lex_quoted_id(b'`'),

            // Bracket-quoted identifier (else `[` is a subscript bracket)
            b'[' if self.quotes.bracket => self.lex_bracket_id(),
            b'[' => {
                self.pos += 1;
                TokenKind::LeftBracket
            }
            b']' => {
                self.pos += 1;
                TokenKind::RightBracket
            }

            // Numbers
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),

            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(),

            // Parameter markers
            b'?' => {
                self.pos += 1;
                TokenKind::Question
            }
            b':' => self.lex_colon(),
            b'$' => self.lex_dollar(),

            // Single-character operators and punctuation
            b'+' => {
                self.pos += 1;
                TokenKind::Plus
            }
            b'-' => {
                self.pos += 1;
                TokenKind::Minus
            }
            b'*' => {
                self.pos += 1;
                TokenKind::Star
            }
            b'/' => {
                self.pos += 1;
                TokenKind::Slash
            }
            b'%' => {
                self.pos += 1;
                TokenKind::Percent
            }
            b'^' => {
                self.pos += 1;
                TokenKind::Caret
            }
            b',' => {
                self.pos += 1;
                TokenKind::Comma
            }
            b';' => {
                self.pos += 1;
                TokenKind::Semicolon
            }
            b'(' => {
                self.pos += 1;
                TokenKind::LeftParen
            }
            b')' => {
                self.pos += 1;
                TokenKind::RightParen
            }
            b'.' => {
                self.pos += 1;
                TokenKind::Dot
            }

            // Multi-character operators
            b'=' => {
                self.pos += 1;
                TokenKind::Eq
            }
            b'<' => self.lex_lt(),
            b'>' => self.lex_gt(),
            b'!' => self.lex_bang(),
            b'~' => self.lex_tilde(),

            // Remaining operator characters start a generic operator run.
            b'@' | b'#' | b'&' | b'|' => self.lex_op_run(),

            _ => {
                self.pos += 1;
                let s = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                TokenKind::Error(format!("unexpected character: {s}"))
            }
        };

        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Skip whitespace, line comments (`--`), and block comments (`/* */`).
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            if self.pos >= self.src.len() {
                break;
            }

            // Line comment: `-- ...`
            if self.src[self.pos] == b'-' && self.peek_at(1) == Some(b'-') {
                self.pos += 2;
                match memchr(b'\n', &self.src[self.pos..]) {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.src.len(),
                }
                continue;
            }

            // Block comment: `/* ... */`, nestable.
            if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                self.pos += 2;
                let mut depth = 1u32;
                while self.pos < self.src.len() && depth > 0 {
                    if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                        self.pos += 2;
                        depth += 1;
                    } else if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                        self.pos += 2;
                        depth -= 1;
                    } else {
                        self.pos += 1;
                    }
                }
                continue;
            }

            break;
        }
    }

    // -----------------------------------------------------------------------
    // Literal tokenizers
    // -----------------------------------------------------------------------

    /// Lex the body of a single-quoted string starting at the opening quote.
    /// `''` is the escaped quote. Returns `Err(TokenKind::Error)` when
    /// unterminated.
    fn lex_string(&mut self) -> Result<String, TokenKind> {
        let start = self.pos;
        self.pos += 1; // skip opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'\'', remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    self.pos += offset + 1; // past the quote

                    // Doubled-quote escape: '' -> '
                    if self.peek() == Some(b'\'') {
                        value.push('\'');
                        self.pos += 1;
                    } else {
                        return Ok(value);
                    }
                }
                None => {
                    self.pos = self.src.len();
                    return Err(TokenKind::Error(format!(
                        "unterminated string literal starting at byte {start}"
                    )));
                }
            }
        }
    }

    /// Lex `E'...'` with backslash escapes decoded.
    fn lex_escape_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 2; // skip E and opening quote

        let mut value = String::new();
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            match ch {
                b'\'' => {
                    self.pos += 1;
                    // Doubled-quote escape still applies.
                    if self.peek() == Some(b'\'') {
                        value.push('\'');
                        self.pos += 1;
                    } else {
                        return TokenKind::EscapeString(value);
                    }
                }
                b'\\' => {
                    self.pos += 1;
                    let Some(esc) = self.peek() else { break };
                    self.pos += 1;
                    match esc {
                        b'n' => value.push('\n'),
                        b't' => value.push('\t'),
                        b'r' => value.push('\r'),
                        b'\\' => value.push('\\'),
                        b'\'' => value.push('\''),
                        other => {
                            // Unknown escapes pass through verbatim.
                            value.push('\\');
                            value.push(other as char);
                        }
                    }
                }
                _ => {
                    value.push(ch as char);
                    self.pos += 1;
                }
            }
        }
        TokenKind::Error(format!(
            "unterminated escape-string literal starting at byte {start}"
        ))
    }

    /// Lex `B'...'` / `X'...'`: skip the prefix letter, take the quoted body
    /// verbatim, and let `classify` validate the digits.
    fn lex_prefixed_string(&mut self, classify: fn(String) -> TokenKind) -> TokenKind {
        self.pos += 1; // skip prefix letter
        match self.lex_string() {
            Ok(body) => classify(body),
            Err(e) => e,
        }
    }

    /// Lex an identifier delimited by `quote`, with doubled-quote escaping.
    fn lex_quoted_id(&mut self, quote: u8) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(quote, remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    self.pos += offset + 1;

                    if self.peek() == Some(quote) {
                        value.push(quote as char);
                        self.pos += 1;
                    } else {
                        return TokenKind::QuotedId(value);
                    }
                }
                None => {
                    self.pos = self.src.len();
                    return TokenKind::Error(format!(
                        "unterminated quoted identifier starting at byte {start}"
                    ));
                }
            }
        }
    }

    /// Lex a bracket-quoted identifier `[name]`.
    fn lex_bracket_id(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip [

        let remaining = &self.src[self.pos..];
        match memchr(b']', remaining) {
            Some(offset) => {
                let value =
                    String::from_utf8_lossy(&self.src[self.pos..self.pos + offset]).into_owned();
                self.pos += offset + 1;
                TokenKind::QuotedId(value)
            }
            None => {
                self.pos = self.src.len();
                TokenKind::Error(format!(
                    "unterminated bracket identifier starting at byte {start}"
                ))
            }
        }
    }

    /// Lex a number. Integral lexemes become `Integer`; a decimal point or
    /// exponent makes the lexeme a `Float`.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        let mut is_float = false;

        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        // Fractional part (also covers a leading-dot number).
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        // Exponent
        if matches!(self.peek(), Some(b'e' | b'E'))
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_digit() || c == b'+' || c == b'-')
        {
            is_float = true;
            self.pos += 2;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        let text = String::from_utf8_lossy(&self.src[start..self.pos]);
        if is_float {
            match text.parse::<f64>() {
                Ok(v) => TokenKind::Float(v),
                Err(_) => TokenKind::Error(format!("invalid float: {text}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => TokenKind::Integer(v),
                Err(_) => TokenKind::Error(format!("integer out of range: {text}")),
            }
        }
    }

    /// Lex an identifier or keyword.
    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // first character already validated

        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        TokenKind::lookup_keyword(&text).unwrap_or(TokenKind::Id(text))
    }

    /// Lex `:name`, or a bare `:` (array-slice separator).
    fn lex_colon(&mut self) -> TokenKind {
        self.pos += 1; // skip :
        if !self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_')
        {
            return TokenKind::Colon;
        }
        let name_start = self.pos;
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name = String::from_utf8_lossy(&self.src[name_start..self.pos]).into_owned();
        TokenKind::ColonParam(name)
    }

    /// Lex `$n` ordinal parameters and `$tag$...$tag$` dollar-quoted strings.
    fn lex_dollar(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip $

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let num_start = self.pos;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            let text = String::from_utf8_lossy(&self.src[num_start..self.pos]);
            return match text.parse::<u32>() {
                Ok(n) => TokenKind::DollarNum(n),
                Err(_) => TokenKind::Error("invalid parameter number".to_owned()),
            };
        }

        // Dollar-quoted string: read the tag up to the next `$`.
        let tag_start = self.pos;
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.peek() != Some(b'$') {
            self.pos = start + 1;
            return TokenKind::Error("unexpected character: $".to_owned());
        }
        let tag = self.src[tag_start..self.pos].to_vec();
        self.pos += 1; // closing $ of the opening delimiter

        // Find `$tag$` terminator.
        let mut delim = Vec::with_capacity(tag.len() + 2);
        delim.push(b'$');
        delim.extend_from_slice(&tag);
        delim.push(b'$');

        let body_start = self.pos;
        let mut search = self.pos;
        while search + delim.len() <= self.src.len() {
            match memchr(b'$', &self.src[search..]) {
                Some(offset) => {
                    let at = search + offset;
                    if self.src[at..].starts_with(&delim) {
                        let value =
                            String::from_utf8_lossy(&self.src[body_start..at]).into_owned();
                        self.pos = at + delim.len();
                        return TokenKind::DollarString(value);
                    }
                    search = at + 1;
                }
                None => break,
            }
        }
        self.pos = self.src.len();
        TokenKind::Error(format!(
            "unterminated dollar-quoted string starting at byte {start}"
        ))
    }

    // -----------------------------------------------------------------------
    // Multi-character operators
    // -----------------------------------------------------------------------

    fn lex_lt(&mut self) -> TokenKind {
        self.pos += 1;
        match self.peek() {
            Some(b'=') => {
                self.pos += 1;
                TokenKind::Le
            }
            Some(b'>') => {
                self.pos += 1;
                TokenKind::LtGt
            }
            _ => TokenKind::Lt,
        }
    }

    fn lex_gt(&mut self) -> TokenKind {
        self.pos += 1;
        if self.peek() == Some(b'=') {
            self.pos += 1;
            TokenKind::Ge
        } else {
            TokenKind::Gt
        }
    }

    fn lex_bang(&mut self) -> TokenKind {
        self.pos += 1;
        match self.peek() {
            Some(b'=') => {
                self.pos += 1;
                TokenKind::Ne
            }
            Some(b'~') => {
                self.pos += 1;
                if self.peek() == Some(b'*') {
                    self.pos += 1;
                    TokenKind::NotTildeStar
                } else {
                    TokenKind::NotTilde
                }
            }
            _ => TokenKind::Op("!".to_owned()),
        }
    }

    fn lex_tilde(&mut self) -> TokenKind {
        self.pos += 1;
        if self.peek() == Some(b'*') {
            self.pos += 1;
            TokenKind::TildeStar
        } else {
            TokenKind::Tilde
        }
    }

    /// Lex a generic operator run starting at `@`, `#`, `&`, or `|`.
    fn lex_op_run(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| matches!(c, b'@' | b'#' | b'&' | b'|' | b'<' | b'>' | b'/' | b'-'))
        {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        TokenKind::Op(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(sql: &str) -> Vec<TokenKind> {
        Lexer::tokenize(sql, QuoteStyle::ANSI)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        assert_eq!(
            lex("SELECT name FROM users"),
            vec![
                TokenKind::KwSelect,
                TokenKind::Id("name".to_owned()),
                TokenKind::KwFrom,
                TokenKind::Id("users".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(lex("42")[0], TokenKind::Integer(42));
        assert_eq!(lex("3.25")[0], TokenKind::Float(3.25));
        assert_eq!(lex("1e3")[0], TokenKind::Float(1000.0));
        assert_eq!(lex(".5")[0], TokenKind::Float(0.5));
        // `1.e` is not an exponent start; the dot needs a digit after it.
        assert_eq!(lex("7")[0], TokenKind::Integer(7));
    }

    #[test]
    fn lex_string_with_doubled_quote() {
        assert_eq!(lex("'it''s'")[0], TokenKind::String("it's".to_owned()));
    }

    #[test]
    fn lex_string_subkinds() {
        assert_eq!(
            lex("E'a\\nb'")[0],
            TokenKind::EscapeString("a\nb".to_owned())
        );
        assert_eq!(lex("B'0101'")[0], TokenKind::BitString("0101".to_owned()));
        assert_eq!(lex("X'CAFE'")[0], TokenKind::HexString("CAFE".to_owned()));
        assert_eq!(
            lex("$tag$any ' text$tag$")[0],
            TokenKind::DollarString("any ' text".to_owned())
        );
        assert_eq!(
            lex("$$plain$$")[0],
            TokenKind::DollarString("plain".to_owned())
        );
    }

    #[test]
    fn lex_bit_string_rejects_bad_digit() {
        assert!(matches!(lex("B'012'")[0], TokenKind::Error(_)));
    }

    #[test]
    fn lex_parameters() {
        assert_eq!(lex("?")[0], TokenKind::Question);
        assert_eq!(lex(":name")[0], TokenKind::ColonParam("name".to_owned()));
        assert_eq!(lex("$3")[0], TokenKind::DollarNum(3));
    }

    #[test]
    fn lex_bare_colon_in_slice() {
        assert_eq!(
            lex("a[1:2]"),
            vec![
                TokenKind::Id("a".to_owned()),
                TokenKind::LeftBracket,
                TokenKind::Integer(1),
                TokenKind::Colon,
                TokenKind::Integer(2),
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            lex("< <= <> > >= = != ^"),
            vec![
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::LtGt,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Eq,
                TokenKind::Ne,
                TokenKind::Caret,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_regex_operators() {
        assert_eq!(
            lex("~ ~* !~ !~*"),
            vec![
                TokenKind::Tilde,
                TokenKind::TildeStar,
                TokenKind::NotTilde,
                TokenKind::NotTildeStar,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_custom_operator_runs() {
        assert_eq!(lex("||")[0], TokenKind::Op("||".to_owned()));
        assert_eq!(lex("@>")[0], TokenKind::Op("@>".to_owned()));
        assert_eq!(lex("#>>")[0], TokenKind::Op("#>>".to_owned()));
        assert_eq!(lex("&&")[0], TokenKind::Op("&&".to_owned()));
    }

    #[test]
    fn lex_comments() {
        assert_eq!(
            lex("1 -- trailing\n+ 2"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Plus,
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            lex("1 /* block /* nested */ */ + 2"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Plus,
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_quoted_identifiers() {
        assert_eq!(
            lex("\"Mixed Case\"")[0],
            TokenKind::QuotedId("Mixed Case".to_owned())
        );
        // Backticks are not identifiers under the ANSI quote style.
        assert!(matches!(lex("`x`")[0], TokenKind::Error(_)));

        let toks = Lexer::tokenize("`x`", QuoteStyle::MYSQLISH);
        assert_eq!(toks[0].kind, TokenKind::QuotedId("x".to_owned()));
    }

    #[test]
    fn lex_unterminated_string_is_error() {
        assert!(matches!(lex("'oops")[0], TokenKind::Error(_)));
    }

    #[test]
    fn spans_track_byte_offsets() {
        let toks = Lexer::tokenize("ab + cd", QuoteStyle::ANSI);
        assert_eq!(toks[0].span, Span::new(0, 2));
        assert_eq!(toks[1].span, Span::new(3, 4));
        assert_eq!(toks[2].span, Span::new(5, 7));
    }
}
