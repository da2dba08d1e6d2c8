// Predicate grammar.
//
// Boolean structure, loosest to tightest: OR, AND, primary. The OR level
// carves its left operand with a depth-zero terminator scan instead of
// backtracking; the AND level folds primaries directly, because a primary
// consumes the `AND` of its own `BETWEEN` before the fold ever sees it.

use sqlfront_ast::{Expr, InSet, Predicate, Quantifier};

use crate::context::{GrammarRule, ParseContext, RuleKind};
use crate::cursor::Cursor;
use crate::diag::{Diagnostics, ParseResult};
use crate::dialect::{Feature, OpClass};
use crate::expr::{expect_exhausted, parse_expr_list, parse_parenthesized_query};
use crate::token::TokenKind;

impl GrammarRule for Predicate {
    const KIND: RuleKind = RuleKind::Predicate;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        parse_or(cx, cur)
    }
}

fn parse_or(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let mut p = cur.probe();
    if !cx.lookups().or_chain(cur, &mut p) {
        return parse_and(cx, cur);
    }
    let mut acc = parse_or_operand(cx, cur)?;
    while cur.eat(&TokenKind::KwOr).is_some() {
        let right = parse_or_operand(cx, cur)?;
        let span = acc.span().merge(right.span());
        acc = Predicate::Or(Box::new(acc), Box::new(right), span);
    }
    Ok(acc)
}

/// One OR operand: everything up to the next depth-zero `OR`, carved into a
/// bounded sub-cursor and parsed as an AND chain.
fn parse_or_operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let idx = cur.find(|k| *k == TokenKind::KwOr);
    if idx < cur.end() {
        let mut sub = cur.carve_to(idx);
        let pred = parse_and(cx, &mut sub)?;
        expect_exhausted(&sub)?;
        Ok(pred)
    } else {
        parse_and(cx, cur)
    }
}

fn parse_and(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let mut p = cur.probe();
    if !cx.lookups().and_chain(cur, &mut p) {
        return parse_primary(cx, cur);
    }
    let mut acc = parse_primary(cx, cur)?;
    while cur.eat(&TokenKind::KwAnd).is_some() {
        let right = parse_primary(cx, cur)?;
        let span = acc.span().merge(right.span());
        acc = Predicate::And(Box::new(acc), Box::new(right), span);
    }
    Ok(acc)
}

fn parse_primary(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let lk = cx.lookups();

    // `[NOT] EXISTS (` binds the NOT to the EXISTS, not the predicate.
    let mut p = cur.probe();
    if lk.exists(cur, &mut p) {
        return parse_exists(cx, cur);
    }

    let mut p = cur.probe();
    if lk.not_predicate(cur, &mut p) {
        let sp = cur.advance()?.span;
        let inner = parse_primary(cx, cur)?;
        let span = sp.merge(inner.span());
        return Ok(Predicate::Not(Box::new(inner), span));
    }

    // One wrapping paren pair around a boolean group. Scalar parens (row
    // constructors, grouped arithmetic, subqueries) take the expression
    // path below instead.
    if cur.check(&TokenKind::LeftParen) && paren_group_is_predicate(cx, cur) {
        if let Some(close) = cur.matching_paren() {
            cur.advance()?;
            let mut sub = cur.carve_to(close);
            let pred = cx.parse::<Predicate>(&mut sub)?;
            expect_exhausted(&sub)?;
            cur.expect(&TokenKind::RightParen, "')'")?;
            return Ok(pred);
        }
    }

    let left = cx.parse::<Expr>(cur)?;
    parse_operator_suffix(cx, cur, left)
}

/// Whether a `( ... )` group at the cursor holds a predicate rather than a
/// scalar expression: not a subquery, and some depth-one token is a boolean
/// connective or predicate operator.
fn paren_group_is_predicate(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
    let mut p = cur.probe();
    if cx.lookups().subquery(cur, &mut p) {
        return false;
    }
    let Some(close) = cur.matching_paren() else {
        return false;
    };
    let mut depth = 0i32;
    for idx in cur.pos()..close {
        let kind = &cur.token_at(idx).kind;
        match kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::KwCase => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::KwEnd => depth -= 1,
            _ if depth == 1 => {
                let is_boolean = matches!(
                    kind,
                    TokenKind::KwAnd
                        | TokenKind::KwOr
                        | TokenKind::KwNot
                        | TokenKind::KwBetween
                        | TokenKind::KwIn
                        | TokenKind::KwLike
                        | TokenKind::KwIs
                        | TokenKind::KwExists
                ) || matches!(
                    cx.operators().classify(kind),
                    Some(OpClass::Comparison(_) | OpClass::Regex { .. })
                );
                if is_boolean {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn parse_exists(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let start = cur.peek().span;
    let negated = cur.eat(&TokenKind::KwNot).is_some();
    cur.expect(&TokenKind::KwExists, "EXISTS")?;
    let (query, q_sp) = parse_parenthesized_query(cx, cur)?;
    Ok(Predicate::Exists {
        query: Box::new(query),
        negated,
        span: start.merge(q_sp),
    })
}

/// After a complete left expression, dispatch on the operator that follows.
fn parse_operator_suffix(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
    left: Expr,
) -> ParseResult<Predicate> {
    let lk = cx.lookups();
    let start = left.span();

    let mut p = cur.probe();
    if lk.between(cur, &mut p) {
        let negated = cur.eat(&TokenKind::KwNot).is_some();
        cur.expect(&TokenKind::KwBetween, "BETWEEN")?;
        let low = cx.parse::<Expr>(cur)?;
        cur.expect(&TokenKind::KwAnd, "AND")?;
        let high = cx.parse::<Expr>(cur)?;
        let span = start.merge(high.span());
        return Ok(Predicate::Between {
            expr: Box::new(left),
            low: Box::new(low),
            high: Box::new(high),
            negated,
            span,
        });
    }

    let mut p = cur.probe();
    if lk.in_list(cur, &mut p) {
        let negated = cur.eat(&TokenKind::KwNot).is_some();
        cur.expect(&TokenKind::KwIn, "IN")?;
        let mut p = cur.probe();
        let (set, end_sp) = if lk.subquery(cur, &mut p) {
            let (query, sp) = parse_parenthesized_query(cx, cur)?;
            (InSet::Subquery(Box::new(query)), sp)
        } else {
            cur.expect(&TokenKind::LeftParen, "'('")?;
            let items = parse_expr_list(cx, cur)?;
            let close = cur.expect(&TokenKind::RightParen, "')'")?;
            (InSet::List(items), close)
        };
        return Ok(Predicate::In {
            expr: Box::new(left),
            set,
            negated,
            span: start.merge(end_sp),
        });
    }

    let mut p = cur.probe();
    if lk.like(cur, &mut p) {
        let negated = cur.eat(&TokenKind::KwNot).is_some();
        cur.expect(&TokenKind::KwLike, "LIKE")?;
        let pattern = cx.parse::<Expr>(cur)?;
        let escape = if cur.eat(&TokenKind::KwEscape).is_some() {
            Some(Box::new(cx.parse::<Expr>(cur)?))
        } else {
            None
        };
        let end = escape.as_ref().map_or(pattern.span(), |e| e.span());
        return Ok(Predicate::Like {
            expr: Box::new(left),
            pattern: Box::new(pattern),
            escape,
            negated,
            span: start.merge(end),
        });
    }

    let mut p = cur.probe();
    if lk.is_distinct_from(cur, &mut p) {
        let is_sp = cur.expect(&TokenKind::KwIs, "IS")?;
        cx.require(Feature::IsDistinctFrom, "IS DISTINCT FROM", is_sp.start)?;
        let negated = cur.eat(&TokenKind::KwNot).is_some();
        cur.expect(&TokenKind::KwDistinct, "DISTINCT")?;
        cur.expect(&TokenKind::KwFrom, "FROM")?;
        let right = cx.parse::<Expr>(cur)?;
        let span = start.merge(right.span());
        return Ok(Predicate::IsDistinctFrom {
            left: Box::new(left),
            right: Box::new(right),
            negated,
            span,
        });
    }

    let mut p = cur.probe();
    if lk.is_null(cur, &mut p) {
        cur.expect(&TokenKind::KwIs, "IS")?;
        let negated = cur.eat(&TokenKind::KwNot).is_some();
        let null_sp = cur.expect(&TokenKind::KwNull, "NULL")?;
        return Ok(Predicate::IsNull {
            expr: Box::new(left),
            negated,
            span: start.merge(null_sp),
        });
    }

    let mut p = cur.probe();
    if lk.comparison(cur, &mut p, cx.operators()) {
        let tok = cur.advance()?;
        let Some(OpClass::Comparison(op)) = cx.operators().classify(&tok.kind) else {
            return Err(Diagnostics::syntax(
                "unclassifiable comparison operator",
                tok.span.start,
            ));
        };
        let mut p = cur.probe();
        if lk.any_all(cur, &mut p) {
            let q_tok = cur.advance()?;
            let quantifier = match q_tok.kind {
                TokenKind::KwAll => Quantifier::All,
                TokenKind::KwAny | TokenKind::KwSome => Quantifier::Any,
                other => {
                    return Err(Diagnostics::expected(
                        "ANY, SOME, or ALL",
                        other.describe(),
                        q_tok.span.start,
                    ))
                }
            };
            let (query, q_sp) = parse_parenthesized_query(cx, cur)?;
            return Ok(Predicate::AnyAll {
                op,
                quantifier,
                left: Box::new(left),
                query: Box::new(query),
                span: start.merge(q_sp),
            });
        }
        let right = cx.parse::<Expr>(cur)?;
        let span = start.merge(right.span());
        return Ok(Predicate::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
    }

    let mut p = cur.probe();
    if lk.regex_match(cur, &mut p, cx.operators()) {
        let tok = cur.advance()?;
        let Some(OpClass::Regex {
            negated,
            case_insensitive,
        }) = cx.operators().classify(&tok.kind)
        else {
            return Err(Diagnostics::syntax(
                "unclassifiable regex operator",
                tok.span.start,
            ));
        };
        cx.require(
            Feature::RegexMatch,
            "regular-expression matching",
            tok.span.start,
        )?;
        let pattern = cx.parse::<Expr>(cur)?;
        let span = start.merge(pattern.span());
        return Ok(Predicate::Regex {
            expr: Box::new(left),
            pattern: Box::new(pattern),
            negated,
            case_insensitive,
            span,
        });
    }

    Ok(Predicate::Expr(Box::new(left), start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::diag::DiagnosticKind;
    use crate::lexer::Lexer;
    use sqlfront_ast::CompareOp;

    fn parse_with(sql: &str, dialect: &Dialect) -> ParseResult<Predicate> {
        let tokens = Lexer::tokenize(sql, dialect.quote_style());
        let cx = ParseContext::new(dialect);
        let mut cur = Cursor::new(&tokens);
        let pred = cx.parse::<Predicate>(&mut cur)?;
        expect_exhausted(&cur)?;
        Ok(pred)
    }

    fn parse(sql: &str) -> Predicate {
        parse_with(sql, &Dialect::postgres()).unwrap()
    }

    #[test]
    fn and_binds_tighter_than_or() {
        match parse("a = 1 AND b = 2 OR c = 3") {
            Predicate::Or(left, right, _) => {
                assert!(matches!(*left, Predicate::And(_, _, _)));
                assert!(matches!(*right, Predicate::Comparison { .. }));
            }
            other => panic!("expected Or at root, got {other:?}"),
        }
    }

    #[test]
    fn or_chains_nest_left() {
        match parse("a = 1 OR b = 2 OR c = 3") {
            Predicate::Or(left, _, _) => assert!(matches!(*left, Predicate::Or(_, _, _))),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn parens_group_boolean_structure() {
        match parse("a = 1 AND (b = 2 OR c = 3)") {
            Predicate::And(_, right, _) => assert!(matches!(*right, Predicate::Or(_, _, _))),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn between_and_is_not_a_conjunction() {
        match parse("x BETWEEN 1 AND 2") {
            Predicate::Between { negated: false, .. } => {}
            other => panic!("expected Between, got {other:?}"),
        }
        match parse("x BETWEEN 1 AND 2 AND y = 3") {
            Predicate::And(left, _, _) => {
                assert!(matches!(*left, Predicate::Between { .. }));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn not_between() {
        assert!(matches!(
            parse("x NOT BETWEEN 1 AND 2"),
            Predicate::Between { negated: true, .. }
        ));
    }

    #[test]
    fn not_negates_a_primary() {
        match parse("NOT a = 1 AND b = 2") {
            Predicate::And(left, _, _) => assert!(matches!(*left, Predicate::Not(_, _))),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn in_list_and_subquery() {
        match parse("x IN (1, 2, 3)") {
            Predicate::In {
                set: InSet::List(items),
                negated: false,
                ..
            } => assert_eq!(items.len(), 3),
            other => panic!("expected In list, got {other:?}"),
        }
        assert!(matches!(
            parse("x NOT IN (SELECT id FROM t)"),
            Predicate::In {
                set: InSet::Subquery(_),
                negated: true,
                ..
            }
        ));
    }

    #[test]
    fn like_with_escape_is_baseline() {
        let ansi = Dialect::ansi();
        match parse_with("name LIKE 'a%' ESCAPE '\\'", &ansi).unwrap() {
            Predicate::Like {
                escape: Some(_),
                negated: false,
                ..
            } => {}
            other => panic!("expected Like, got {other:?}"),
        }
        assert!(matches!(
            parse("name NOT LIKE 'a%'"),
            Predicate::Like { negated: true, .. }
        ));
    }

    #[test]
    fn regex_is_gated_not_a_syntax_error() {
        assert!(matches!(
            parse("name ~ '^a'"),
            Predicate::Regex {
                negated: false,
                case_insensitive: false,
                ..
            }
        ));
        assert!(matches!(
            parse("name !~* '^a'"),
            Predicate::Regex {
                negated: true,
                case_insensitive: true,
                ..
            }
        ));

        let err = parse_with("name ~ '^a'", &Dialect::ansi()).unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
    }

    #[test]
    fn is_null_forms() {
        assert!(matches!(
            parse("x IS NULL"),
            Predicate::IsNull { negated: false, .. }
        ));
        assert!(matches!(
            parse("x IS NOT NULL"),
            Predicate::IsNull { negated: true, .. }
        ));
    }

    #[test]
    fn is_distinct_from_gated() {
        assert!(matches!(
            parse("a IS DISTINCT FROM b"),
            Predicate::IsDistinctFrom { negated: false, .. }
        ));
        assert!(matches!(
            parse("a IS NOT DISTINCT FROM b"),
            Predicate::IsDistinctFrom { negated: true, .. }
        ));
        let err = parse_with("a IS DISTINCT FROM b", &Dialect::ansi()).unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
    }

    #[test]
    fn exists_forms() {
        assert!(matches!(
            parse("EXISTS (SELECT 1)"),
            Predicate::Exists { negated: false, .. }
        ));
        assert!(matches!(
            parse("NOT EXISTS (SELECT 1)"),
            Predicate::Exists { negated: true, .. }
        ));
    }

    #[test]
    fn any_some_all() {
        match parse("x = ANY (SELECT id FROM t)") {
            Predicate::AnyAll {
                op: CompareOp::Eq,
                quantifier: Quantifier::Any,
                ..
            } => {}
            other => panic!("expected AnyAll, got {other:?}"),
        }
        assert!(matches!(
            parse("x < SOME (SELECT id FROM t)"),
            Predicate::AnyAll {
                quantifier: Quantifier::Any,
                ..
            }
        ));
        assert!(matches!(
            parse("x >= ALL (SELECT id FROM t)"),
            Predicate::AnyAll {
                quantifier: Quantifier::All,
                ..
            }
        ));
    }

    #[test]
    fn scalar_parens_still_compare() {
        match parse("(a + b) * 2 > 1") {
            Predicate::Comparison {
                op: CompareOp::Gt, ..
            } => {}
            other => panic!("expected Comparison, got {other:?}"),
        }
    }

    #[test]
    fn row_comparison() {
        match parse("(a, b) = (1, 2)") {
            Predicate::Comparison { left, right, .. } => {
                assert!(matches!(*left, Expr::Row(_, _)));
                assert!(matches!(*right, Expr::Row(_, _)));
            }
            other => panic!("expected Comparison, got {other:?}"),
        }
    }

    #[test]
    fn subquery_comparison() {
        match parse("(SELECT max(x) FROM t) = 1") {
            Predicate::Comparison { left, .. } => {
                assert!(matches!(*left, Expr::Subquery(_, _)));
            }
            other => panic!("expected Comparison, got {other:?}"),
        }
    }

    #[test]
    fn bare_expression_predicate() {
        assert!(matches!(parse("active"), Predicate::Expr(_, _)));
    }

    #[test]
    fn case_inside_predicate_shields_its_or() {
        match parse("CASE WHEN a OR b THEN true ELSE false END = true OR c = 1") {
            Predicate::Or(left, _, _) => {
                assert!(matches!(*left, Predicate::Comparison { .. }));
            }
            other => panic!("expected Or at root, got {other:?}"),
        }
    }
}
