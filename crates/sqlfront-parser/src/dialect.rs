// Dialect capability gate.
//
// A `Dialect` is a plain immutable value: a name, a feature bitset, the
// lookup predicates, an operator-classification policy, and an identifier
// quote style. Grammar rules consult `supports` before committing to a gated
// construct and emit a dialect-unsupported diagnostic naming the construct
// when the feature is absent. There is no global dialect state; the value is
// built once and passed by reference.

use sqlfront_ast::{ArithOp, CompareOp};

use crate::lookup::{BaselineLookups, Lookups};
use crate::token::TokenKind;

/// A grammar capability a dialect may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Feature {
    /// Dialect-specific operators kept as lexemes (`||`, `@>`, ...).
    CustomOperators,
    /// The `^` power operator.
    Exponentiation,
    /// `SELECT DISTINCT ON (exprs)`.
    DistinctOn,
    /// `ONLY table` / trailing `*` inheritance markers in FROM.
    TableInheritance,
    /// `DATE '...'`, `TIME '...'`, `TIMESTAMP '...'`, `INTERVAL '...'`.
    TypedLiterals,
    /// `a IS [NOT] DISTINCT FROM b`.
    IsDistinctFrom,
    /// `LATERAL` subqueries and function tables.
    Lateral,
    /// Set-returning functions in FROM position.
    FunctionTables,
    /// `GROUPING SETS` / `ROLLUP` / `CUBE`.
    GroupingSets,
    /// Regular-expression match operators `~`, `~*`, `!~`, `!~*`.
    RegexMatch,
    /// Array subscripts `a[1]` and slices `a[1:2]`.
    ArraySubscript,
    /// `expr AT TIME ZONE zone`.
    AtTimeZone,
    /// `expr COLLATE collation`.
    Collate,
    /// `FOR UPDATE` / `FOR SHARE`.
    LockingClause,
    /// `$n` ordinal parameters.
    OrdinalParameters,
}

impl Feature {
    /// Stable lowercase name, used in log events.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CustomOperators => "custom-operators",
            Self::Exponentiation => "exponentiation",
            Self::DistinctOn => "distinct-on",
            Self::TableInheritance => "table-inheritance",
            Self::TypedLiterals => "typed-literals",
            Self::IsDistinctFrom => "is-distinct-from",
            Self::Lateral => "lateral",
            Self::FunctionTables => "function-tables",
            Self::GroupingSets => "grouping-sets",
            Self::RegexMatch => "regex-match",
            Self::ArraySubscript => "array-subscript",
            Self::AtTimeZone => "at-time-zone",
            Self::Collate => "collate",
            Self::LockingClause => "locking-clause",
            Self::OrdinalParameters => "ordinal-parameters",
        }
    }
}

/// A const-friendly set of [`Feature`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    bits: u32,
}

impl FeatureSet {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Every feature enabled.
    pub const ALL: Self = Self { bits: (1 << 15) - 1 };

    /// This set plus one feature.
    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self {
            bits: self.bits | (1 << feature as u32),
        }
    }

    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        self.bits & (1 << feature as u32) != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }
}

/// Which quote characters delimit identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteStyle {
    /// `"name"`.
    pub double_quote: bool,
    /// `` `name` ``.
    pub backtick: bool,
    /// `[name]`. When false, `[` lexes as a subscript bracket.
    pub bracket: bool,
}

impl QuoteStyle {
    /// Double quotes only.
    pub const ANSI: Self = Self {
        double_quote: true,
        backtick: false,
        bracket: false,
    };

    /// Double quotes and backticks.
    pub const MYSQLISH: Self = Self {
        double_quote: true,
        backtick: true,
        bracket: false,
    };
}

/// The classification of an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Arithmetic(ArithOp),
    Comparison(CompareOp),
    Regex { negated: bool, case_insensitive: bool },
    /// A lexeme-carrying operator with no built-in meaning.
    Generic,
}

/// Classifies operator tokens for the expression and predicate ladders.
pub trait OperatorPolicy: Send + Sync {
    fn classify(&self, kind: &TokenKind) -> Option<OpClass>;
}

/// The stock operator policy shared by the built-in dialects. Feature gating
/// happens in the grammar rules, not here.
#[derive(Debug, Default)]
pub struct StandardOperators;

impl OperatorPolicy for StandardOperators {
    fn classify(&self, kind: &TokenKind) -> Option<OpClass> {
        let class = match kind {
            TokenKind::Plus => OpClass::Arithmetic(ArithOp::Add),
            TokenKind::Minus => OpClass::Arithmetic(ArithOp::Subtract),
            TokenKind::Star => OpClass::Arithmetic(ArithOp::Multiply),
            TokenKind::Slash => OpClass::Arithmetic(ArithOp::Divide),
            TokenKind::Percent => OpClass::Arithmetic(ArithOp::Modulo),
            TokenKind::Caret => OpClass::Arithmetic(ArithOp::Power),
            TokenKind::Eq => OpClass::Comparison(CompareOp::Eq),
            TokenKind::Ne | TokenKind::LtGt => OpClass::Comparison(CompareOp::Ne),
            TokenKind::Lt => OpClass::Comparison(CompareOp::Lt),
            TokenKind::Le => OpClass::Comparison(CompareOp::Le),
            TokenKind::Gt => OpClass::Comparison(CompareOp::Gt),
            TokenKind::Ge => OpClass::Comparison(CompareOp::Ge),
            TokenKind::Tilde => OpClass::Regex {
                negated: false,
                case_insensitive: false,
            },
            TokenKind::TildeStar => OpClass::Regex {
                negated: false,
                case_insensitive: true,
            },
            TokenKind::NotTilde => OpClass::Regex {
                negated: true,
                case_insensitive: false,
            },
            TokenKind::NotTildeStar => OpClass::Regex {
                negated: true,
                case_insensitive: true,
            },
            TokenKind::Op(_) => OpClass::Generic,
            _ => return None,
        };
        Some(class)
    }
}

/// An immutable dialect description.
pub struct Dialect {
    name: &'static str,
    features: FeatureSet,
    lookups: Box<dyn Lookups>,
    operators: Box<dyn OperatorPolicy>,
    quotes: QuoteStyle,
}

impl Dialect {
    /// The baseline dialect: portable SQL with typed literals and COLLATE,
    /// no vendor extensions.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            name: "ansi",
            features: FeatureSet::EMPTY
                .with(Feature::TypedLiterals)
                .with(Feature::Collate),
            lookups: Box::new(BaselineLookups),
            operators: Box::new(StandardOperators),
            quotes: QuoteStyle::ANSI,
        }
    }

    /// A PostgreSQL-flavored dialect with every feature enabled.
    #[must_use]
    pub fn postgres() -> Self {
        Self {
            name: "postgres",
            features: FeatureSet::ALL,
            lookups: Box::new(BaselineLookups),
            operators: Box::new(StandardOperators),
            quotes: QuoteStyle::ANSI,
        }
    }

    /// A dialect with a custom feature set, for tests and embedders.
    #[must_use]
    pub fn custom(name: &'static str, features: FeatureSet) -> Self {
        Self {
            name,
            features,
            lookups: Box::new(BaselineLookups),
            operators: Box::new(StandardOperators),
            quotes: QuoteStyle::ANSI,
        }
    }

    /// Replace the identifier quoting rules.
    #[must_use]
    pub fn with_quote_style(mut self, quotes: QuoteStyle) -> Self {
        self.quotes = quotes;
        self
    }

    /// Replace the grammar-disambiguation predicates.
    #[must_use]
    pub fn with_lookups(mut self, lookups: Box<dyn Lookups>) -> Self {
        self.lookups = lookups;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this dialect provides `feature`. Pure; no side effects.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    #[must_use]
    pub fn lookups(&self) -> &dyn Lookups {
        &*self.lookups
    }

    #[must_use]
    pub fn operators(&self) -> &dyn OperatorPolicy {
        &*self.operators
    }

    #[must_use]
    pub fn quote_style(&self) -> QuoteStyle {
        self.quotes
    }
}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_set_with_contains() {
        let set = FeatureSet::EMPTY
            .with(Feature::Lateral)
            .with(Feature::RegexMatch);
        assert!(set.contains(Feature::Lateral));
        assert!(set.contains(Feature::RegexMatch));
        assert!(!set.contains(Feature::DistinctOn));
    }

    #[test]
    fn all_contains_every_feature() {
        for f in [
            Feature::CustomOperators,
            Feature::Exponentiation,
            Feature::DistinctOn,
            Feature::TableInheritance,
            Feature::TypedLiterals,
            Feature::IsDistinctFrom,
            Feature::Lateral,
            Feature::FunctionTables,
            Feature::GroupingSets,
            Feature::RegexMatch,
            Feature::ArraySubscript,
            Feature::AtTimeZone,
            Feature::Collate,
            Feature::LockingClause,
            Feature::OrdinalParameters,
        ] {
            assert!(FeatureSet::ALL.contains(f), "missing {}", f.name());
        }
    }

    #[test]
    fn stock_dialect_gates() {
        let ansi = Dialect::ansi();
        let pg = Dialect::postgres();
        assert!(!ansi.supports(Feature::DistinctOn));
        assert!(ansi.supports(Feature::Collate));
        assert!(pg.supports(Feature::DistinctOn));
        assert!(pg.supports(Feature::OrdinalParameters));
    }

    #[test]
    fn standard_operator_classification() {
        let ops = StandardOperators;
        assert_eq!(
            ops.classify(&TokenKind::Caret),
            Some(OpClass::Arithmetic(ArithOp::Power))
        );
        assert_eq!(
            ops.classify(&TokenKind::LtGt),
            Some(OpClass::Comparison(CompareOp::Ne))
        );
        assert_eq!(
            ops.classify(&TokenKind::NotTildeStar),
            Some(OpClass::Regex {
                negated: true,
                case_insensitive: true
            })
        );
        assert_eq!(
            ops.classify(&TokenKind::Op("||".to_owned())),
            Some(OpClass::Generic)
        );
        assert_eq!(ops.classify(&TokenKind::Comma), None);
    }
}
