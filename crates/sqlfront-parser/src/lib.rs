// Hand-written recursive descent SQL parser with carve-and-descend operand
// splitting instead of backtracking. Produces an AST from `sqlfront-ast`;
// dialect differences are isolated behind `Dialect` values.

pub mod context;
pub mod cursor;
pub mod diag;
pub mod dialect;
pub mod expr;
pub mod lexer;
pub mod lookup;
pub mod predicate;
pub mod query;
pub mod table_ref;
pub mod token;

pub use context::{GrammarRule, ParseContext, RuleKind};
pub use cursor::{Cursor, Probe};
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics, ParseResult};
pub use dialect::{Dialect, Feature, FeatureSet, OpClass, OperatorPolicy, QuoteStyle};
pub use lexer::Lexer;
pub use lookup::{BaselineLookups, Lookups};
pub use token::{Token, TokenKind};

use sqlfront_ast::{Expr, Predicate, Query, TableRef};

/// Lex `source` and fail on the first malformed token.
fn lex_checked(source: &str, dialect: &Dialect) -> ParseResult<Vec<Token>> {
    let tokens = Lexer::tokenize(source, dialect.quote_style());
    for tok in &tokens {
        if let TokenKind::Error(message) = &tok.kind {
            return Err(Diagnostics::syntax(message.clone(), tok.span.start));
        }
    }
    Ok(tokens)
}

fn parse_exact<K: GrammarRule>(source: &str, dialect: &Dialect) -> ParseResult<K> {
    let tokens = lex_checked(source, dialect)?;
    let cx = ParseContext::new(dialect);
    let mut cur = Cursor::new(&tokens);
    let value = cx.parse::<K>(&mut cur)?;
    expr::expect_exhausted(&cur)?;
    Ok(value)
}

/// Parse a scalar expression.
pub fn parse_expression(source: &str, dialect: &Dialect) -> ParseResult<Expr> {
    parse_exact::<Expr>(source, dialect)
}

/// Parse a boolean predicate.
pub fn parse_predicate(source: &str, dialect: &Dialect) -> ParseResult<Predicate> {
    parse_exact::<Predicate>(source, dialect)
}

/// Parse a full query. A single trailing semicolon is accepted.
pub fn parse_query(source: &str, dialect: &Dialect) -> ParseResult<Query> {
    let tokens = lex_checked(source, dialect)?;
    let cx = ParseContext::new(dialect);
    let mut cur = Cursor::new(&tokens);
    let query = cx.parse::<Query>(&mut cur)?;
    cur.eat(&TokenKind::Semicolon);
    expr::expect_exhausted(&cur)?;
    Ok(query)
}

/// Parse a single FROM-clause table reference.
pub fn parse_table_ref(source: &str, dialect: &Dialect) -> ParseResult<TableRef> {
    parse_exact::<TableRef>(source, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlfront_ast::{Literal, SelectItem, SetOp};

    #[test]
    fn expression_entry_point() {
        let pg = Dialect::postgres();
        let e = parse_expression("1 + 2 * 3", &pg).unwrap();
        assert!(matches!(e, Expr::Arithmetic { .. }));
    }

    #[test]
    fn predicate_entry_point() {
        let pg = Dialect::postgres();
        let p = parse_predicate("a = 1 AND b IS NOT NULL", &pg).unwrap();
        assert!(matches!(p, Predicate::And(_, _, _)));
    }

    #[test]
    fn table_ref_entry_point() {
        let pg = Dialect::postgres();
        let t = parse_table_ref("public.users u", &pg).unwrap();
        assert!(matches!(t, TableRef::Table { .. }));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let pg = Dialect::postgres();
        assert!(parse_expression("1 + 2 3", &pg).is_err());
        assert!(parse_query("SELECT 1 SELECT 2", &pg).is_err());
    }

    #[test]
    fn lexer_errors_surface_as_syntax_diagnostics() {
        let pg = Dialect::postgres();
        let err = parse_expression("'unterminated", &pg).unwrap_err();
        assert!(matches!(err.first().kind, DiagnosticKind::Syntax(_)));
        assert_eq!(err.first().offset, 0);
    }

    #[test]
    fn semicolon_only_allowed_on_queries() {
        let pg = Dialect::postgres();
        assert!(parse_query("SELECT 1;", &pg).is_ok());
        assert!(parse_expression("1;", &pg).is_err());
    }

    #[test]
    fn kitchen_sink_query() {
        let pg = Dialect::postgres();
        let q = parse_query(
            "WITH active AS (SELECT id FROM users WHERE deleted_at IS NULL) \
             SELECT u.name, count(*) AS n, \
                    rank() OVER (PARTITION BY u.region ORDER BY count(*) DESC) \
             FROM users u \
             JOIN active ON active.id = u.id \
             LEFT JOIN orders o ON o.user_id = u.id AND o.total > 0 \
             WHERE u.age BETWEEN 18 AND 65 OR u.vip \
             GROUP BY u.name, u.region \
             HAVING count(*) > 1 \
             ORDER BY n DESC NULLS LAST \
             LIMIT 100;",
            &pg,
        )
        .unwrap();
        match q {
            Query::With { ctes, body, .. } => {
                assert_eq!(ctes.len(), 1);
                match *body {
                    Query::Select(s) => {
                        assert_eq!(s.columns.len(), 3);
                        assert_eq!(s.from[0].joins.len(), 2);
                        assert!(matches!(
                            s.where_clause,
                            Some(Predicate::Or(_, _, _))
                        ));
                        assert_eq!(s.group_by.len(), 2);
                        assert!(s.having.is_some());
                        assert!(matches!(
                            s.limit,
                            Some(Expr::Literal(Literal::Integer(100), _))
                        ));
                    }
                    other => panic!("expected select body, got {other:?}"),
                }
            }
            other => panic!("expected with, got {other:?}"),
        }
    }

    #[test]
    fn gated_constructs_differ_by_dialect() {
        let ansi = Dialect::ansi();
        let pg = Dialect::postgres();
        for sql in [
            "SELECT DISTINCT ON (a) a FROM t",
            "SELECT a FROM t FOR UPDATE",
            "SELECT * FROM LATERAL (SELECT 1) l",
            "SELECT a FROM t GROUP BY ROLLUP (a)",
        ] {
            assert!(parse_query(sql, &pg).is_ok(), "{sql} should parse");
            let err = parse_query(sql, &ansi).unwrap_err();
            assert!(
                matches!(err.first().kind, DiagnosticKind::Unsupported { .. }),
                "{sql} should be gated, got {err}"
            );
        }
        let err = parse_expression("2 ^ 3", &ansi).unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
        assert!(parse_expression("2 ^ 3", &pg).is_ok());
    }

    #[test]
    fn union_chain_via_entry_point() {
        let pg = Dialect::postgres();
        match parse_query("SELECT 1 UNION SELECT 2 UNION ALL SELECT 3", &pg).unwrap() {
            Query::Composite { ops, .. } => {
                assert_eq!(ops, vec![SetOp::Union, SetOp::UnionAll]);
            }
            other => panic!("expected composite, got {other:?}"),
        }
        // A parenthesized first term does not hide the chain, and a trailing
        // semicolon is accepted on composites too.
        match parse_query("(SELECT 1) UNION SELECT 2;", &pg).unwrap() {
            Query::Composite { terms, ops, .. } => {
                assert_eq!(terms.len(), 2);
                assert_eq!(ops, vec![SetOp::Union]);
            }
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn lookup_overrides_take_effect() {
        struct NoValuesLookups;

        impl Lookups for NoValuesLookups {
            fn values_clause(&self, _cur: &Cursor, _p: &mut Probe) -> bool {
                false
            }
        }

        let pg = Dialect::postgres();
        assert!(parse_query("VALUES (1), (2)", &pg).is_ok());

        let strict = Dialect::custom("novalues", FeatureSet::ALL)
            .with_lookups(Box::new(NoValuesLookups));
        assert!(parse_query("VALUES (1), (2)", &strict).is_err());
        assert!(parse_query("SELECT 1", &strict).is_ok());
    }

    #[test]
    fn mysqlish_quoting_respects_dialect() {
        let custom = Dialect::custom("backtickish", FeatureSet::ALL)
            .with_quote_style(QuoteStyle::MYSQLISH);
        let q = parse_query("SELECT `a b` FROM `t`", &custom).unwrap();
        match q {
            Query::Select(s) => {
                assert!(matches!(
                    s.columns[0],
                    SelectItem::Expr { expr: Expr::Column(_, _), .. }
                ));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }
}
