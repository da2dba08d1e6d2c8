// SQL token types.
//
// Every token carries a discriminant and a byte-offset Span. Keywords are
// their own variants for O(1) matching in the grammar rules. Literal
// sub-kinds (bit, hex, dollar, escape strings) are classified distinctly by
// the lexer, as are parameter markers and custom operator runs.

use sqlfront_ast::Span;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token discriminant.
    pub kind: TokenKind,
    /// Byte-offset span into the original source.
    pub span: Span,
}

impl Token {
    /// The end-of-input sentinel at the given offset.
    #[must_use]
    pub const fn eof(offset: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(offset, offset),
        }
    }
}

/// Token discriminant.
///
/// Organized by category: literals, identifiers, parameter markers,
/// operators, punctuation, keywords, and special tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Integer literal: `42`.
    Integer(i64),
    /// Float literal: `3.14`, `1e10`, `.5`.
    Float(f64),
    /// Plain string literal (single-quoted): `'hello'`.
    String(String),
    /// Escape-string literal (`E'a\nb'`), escapes already decoded.
    EscapeString(String),
    /// Bit-string literal: `B'0101'` (digits kept verbatim).
    BitString(String),
    /// Hex-string literal: `X'CAFE'` (digits kept verbatim).
    HexString(String),
    /// Dollar-quoted string literal: `$tag$...$tag$`.
    DollarString(String),

    // === Identifiers ===
    /// Unquoted identifier.
    Id(String),
    /// Quote-delimited identifier.
    QuotedId(String),

    // === Parameter markers ===
    /// `?` anonymous positional.
    Question,
    /// `:name` colon-prefixed named.
    ColonParam(String),
    /// `$n` ordinal positional.
    DollarNum(u32),

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,   // `=`
    Ne,   // `!=`
    LtGt, // `<>`
    Lt,
    Le,
    Gt,
    Ge,
    Tilde,        // `~`
    TildeStar,    // `~*`
    NotTilde,     // `!~`
    NotTildeStar, // `!~*`
    /// Any other operator-character run (`||`, `@>`, `&&`, `#>>`, ...).
    Op(String),

    // === Punctuation ===
    Dot,
    Comma,
    Semicolon,
    Colon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    // === Keywords ===
    KwAll,
    KwAnd,
    KwAny,
    KwAs,
    KwAsc,
    KwAt,
    KwBetween,
    KwBy,
    KwCase,
    KwCast,
    KwCollate,
    KwCross,
    KwCube,
    KwCurrent,
    KwDesc,
    KwDistinct,
    KwElse,
    KwEnd,
    KwEscape,
    KwExcept,
    KwExclude,
    KwExists,
    KwFalse,
    KwFirst,
    KwFollowing,
    KwFor,
    KwFrom,
    KwFull,
    KwGroup,
    KwGrouping,
    KwGroups,
    KwHaving,
    KwIn,
    KwInner,
    KwIntersect,
    KwIs,
    KwJoin,
    KwLast,
    KwLateral,
    KwLeft,
    KwLike,
    KwLimit,
    KwNatural,
    KwNo,
    KwNot,
    KwNull,
    KwNulls,
    KwOf,
    KwOffset,
    KwOn,
    KwOnly,
    KwOr,
    KwOrder,
    KwOthers,
    KwOuter,
    KwOver,
    KwPartition,
    KwPreceding,
    KwRange,
    KwRecursive,
    KwRight,
    KwRollup,
    KwRow,
    KwRows,
    KwSelect,
    KwSets,
    KwShare,
    KwSome,
    KwThen,
    KwTies,
    KwTime,
    KwTrue,
    KwUnbounded,
    KwUnion,
    KwUpdate,
    KwUsing,
    KwValues,
    KwWhen,
    KwWhere,
    KwWindow,
    KwWith,
    KwWithout,
    KwZone,

    // === Special ===
    /// End of input.
    Eof,
    /// Lexer error (invalid input).
    Error(String),
}

impl TokenKind {
    /// Look up an identifier string to see if it's a keyword.
    /// Returns the keyword variant if so, else `None`.
    #[must_use]
    pub fn lookup_keyword(s: &str) -> Option<Self> {
        // SQL keywords are case-insensitive; uppercase for comparison.
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Some(Self::KwAll),
            "AND" => Some(Self::KwAnd),
            "ANY" => Some(Self::KwAny),
            "AS" => Some(Self::KwAs),
            "ASC" => Some(Self::KwAsc),
            "AT" => Some(Self::KwAt),
            "BETWEEN" => Some(Self::KwBetween),
            "BY" => Some(Self::KwBy),
            "CASE" => Some(Self::KwCase),
            "CAST" => Some(Self::KwCast),
            "COLLATE" => Some(Self::KwCollate),
            "CROSS" => Some(Self::KwCross),
            "CUBE" => Some(Self::KwCube),
            "CURRENT" => Some(Self::KwCurrent),
            "DESC" => Some(Self::KwDesc),
            "DISTINCT" => Some(Self::KwDistinct),
            "ELSE" => Some(Self::KwElse),
            "END" => Some(Self::KwEnd),
            "ESCAPE" => Some(Self::KwEscape),
            "EXCEPT" => Some(Self::KwExcept),
            "EXCLUDE" => Some(Self::KwExclude),
            "EXISTS" => Some(Self::KwExists),
            "FALSE" => Some(Self::KwFalse),
            "FIRST" => Some(Self::KwFirst),
            "FOLLOWING" => Some(Self::KwFollowing),
            "FOR" => Some(Self::KwFor),
            "FROM" => Some(Self::KwFrom),
            "FULL" => Some(Self::KwFull),
            "GROUP" => Some(Self::KwGroup),
            "GROUPING" => Some(Self::KwGrouping),
            "GROUPS" => Some(Self::KwGroups),
            "HAVING" => Some(Self::KwHaving),
            "IN" => Some(Self::KwIn),
            "INNER" => Some(Self::KwInner),
            "INTERSECT" => Some(Self::KwIntersect),
            "IS" => Some(Self::KwIs),
            "JOIN" => Some(Self::KwJoin),
            "LAST" => Some(Self::KwLast),
            "LATERAL" => Some(Self::KwLateral),
            "LEFT" => Some(Self::KwLeft),
            "LIKE" => Some(Self::KwLike),
            "LIMIT" => Some(Self::KwLimit),
            "NATURAL" => Some(Self::KwNatural),
            "NO" => Some(Self::KwNo),
            "NOT" => Some(Self::KwNot),
            "NULL" => Some(Self::KwNull),
            "NULLS" => Some(Self::KwNulls),
            "OF" => Some(Self::KwOf),
            "OFFSET" => Some(Self::KwOffset),
            "ON" => Some(Self::KwOn),
            "ONLY" => Some(Self::KwOnly),
            "OR" => Some(Self::KwOr),
            "ORDER" => Some(Self::KwOrder),
            "OTHERS" => Some(Self::KwOthers),
            "OUTER" => Some(Self::KwOuter),
            "OVER" => Some(Self::KwOver),
            "PARTITION" => Some(Self::KwPartition),
            "PRECEDING" => Some(Self::KwPreceding),
            "RANGE" => Some(Self::KwRange),
            "RECURSIVE" => Some(Self::KwRecursive),
            "RIGHT" => Some(Self::KwRight),
            "ROLLUP" => Some(Self::KwRollup),
            "ROW" => Some(Self::KwRow),
            "ROWS" => Some(Self::KwRows),
            "SELECT" => Some(Self::KwSelect),
            "SETS" => Some(Self::KwSets),
            "SHARE" => Some(Self::KwShare),
            "SOME" => Some(Self::KwSome),
            "THEN" => Some(Self::KwThen),
            "TIES" => Some(Self::KwTies),
            "TIME" => Some(Self::KwTime),
            "TRUE" => Some(Self::KwTrue),
            "UNBOUNDED" => Some(Self::KwUnbounded),
            "UNION" => Some(Self::KwUnion),
            "UPDATE" => Some(Self::KwUpdate),
            "USING" => Some(Self::KwUsing),
            "VALUES" => Some(Self::KwValues),
            "WHEN" => Some(Self::KwWhen),
            "WHERE" => Some(Self::KwWhere),
            "WINDOW" => Some(Self::KwWindow),
            "WITH" => Some(Self::KwWith),
            "WITHOUT" => Some(Self::KwWithout),
            "ZONE" => Some(Self::KwZone),
            _ => None,
        }
    }

    /// Returns true for the tokens that can begin a query term.
    #[must_use]
    pub fn is_query_start(&self) -> bool {
        matches!(self, Self::KwSelect | Self::KwValues | Self::KwWith)
    }

    /// Returns true for set-operator keywords (`UNION`, `INTERSECT`, `EXCEPT`).
    #[must_use]
    pub fn is_set_operator(&self) -> bool {
        matches!(self, Self::KwUnion | Self::KwIntersect | Self::KwExcept)
    }

    /// The source lexeme for error messages, where one exists.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s)
            | Self::EscapeString(s)
            | Self::BitString(s)
            | Self::HexString(s)
            | Self::DollarString(s) => format!("'{s}'"),
            Self::Id(s) | Self::QuotedId(s) => s.clone(),
            Self::Question => "?".to_owned(),
            Self::ColonParam(s) => format!(":{s}"),
            Self::DollarNum(n) => format!("${n}"),
            Self::Op(s) => s.clone(),
            Self::Error(s) => s.clone(),
            Self::Eof => "end of input".to_owned(),
            other => format!("{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_case_insensitive() {
        assert_eq!(TokenKind::lookup_keyword("select"), Some(TokenKind::KwSelect));
        assert_eq!(TokenKind::lookup_keyword("SeLeCt"), Some(TokenKind::KwSelect));
        assert_eq!(TokenKind::lookup_keyword("frobnicate"), None);
    }

    #[test]
    fn typed_literal_heads_are_not_keywords() {
        // date / timestamp / interval stay plain identifiers so that bare
        // column references with those names keep working.
        assert_eq!(TokenKind::lookup_keyword("date"), None);
        assert_eq!(TokenKind::lookup_keyword("timestamp"), None);
        assert_eq!(TokenKind::lookup_keyword("interval"), None);
    }

    #[test]
    fn query_start_tokens() {
        assert!(TokenKind::KwSelect.is_query_start());
        assert!(TokenKind::KwWith.is_query_start());
        assert!(TokenKind::KwValues.is_query_start());
        assert!(!TokenKind::KwFrom.is_query_start());
    }

    #[test]
    fn describe_formats() {
        assert_eq!(TokenKind::Integer(7).describe(), "7");
        assert_eq!(TokenKind::ColonParam("x".into()).describe(), ":x");
        assert_eq!(TokenKind::Eof.describe(), "end of input");
    }
}
