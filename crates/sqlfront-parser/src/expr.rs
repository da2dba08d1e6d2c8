// Expression grammar.
//
// The ladder, loosest to tightest: custom binary operators, additive,
// multiplicative, power, unary, postfix (COLLATE / AT TIME ZONE /
// subscript), atoms. Each binary level is an `InfixRule` driven by the
// generic climb, so every level folds left-associatively. `^` is deliberately
// left-associative: `2 ^ 3 ^ 3` parses as `(2 ^ 3) ^ 3`.

use sqlfront_ast::{
    CaseCondition, CaseWhen, ColumnRef, Expr, FunctionArgs, Literal, Parameter, QualifiedName,
    Query, Span, TypeName, TypedLiteralKind, WindowSpec,
};

use crate::context::{GrammarRule, InfixRule, MatchableRule, ParseContext, RuleKind};
use crate::cursor::Cursor;
use crate::diag::{Diagnostics, ParseResult};
use crate::dialect::{Feature, OpClass};
use crate::token::TokenKind;

impl GrammarRule for Expr {
    const KIND: RuleKind = RuleKind::Expr;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        cx.climb::<CustomBinaryLevel>(cur)
    }
}

// ---------------------------------------------------------------------------
// Infix levels
// ---------------------------------------------------------------------------

struct CustomBinaryLevel;

impl InfixRule for CustomBinaryLevel {
    type Output = Expr;

    fn operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
        cx.climb::<AdditiveLevel>(cur)
    }

    fn at_operator(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        matches!(
            cx.operators().classify(&cur.peek().kind),
            Some(OpClass::Generic)
        )
    }

    fn combine(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        let tok = cur.advance()?;
        let TokenKind::Op(op) = tok.kind else {
            return Err(Diagnostics::expected(
                "an operator",
                tok.kind.describe(),
                tok.span.start,
            ));
        };
        cx.require(
            Feature::CustomOperators,
            &format!("operator {op}"),
            tok.span.start,
        )?;
        let right = cx.climb::<AdditiveLevel>(cur)?;
        let span = left.span().merge(right.span());
        Ok(Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }
}

struct AdditiveLevel;

impl InfixRule for AdditiveLevel {
    type Output = Expr;

    fn operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
        cx.climb::<MultiplicativeLevel>(cur)
    }

    fn at_operator(_cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        matches!(cur.peek().kind, TokenKind::Plus | TokenKind::Minus)
    }

    fn combine(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        arith_combine::<MultiplicativeLevel>(cx, cur, left)
    }
}

struct MultiplicativeLevel;

impl InfixRule for MultiplicativeLevel {
    type Output = Expr;

    fn operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
        cx.climb::<PowerLevel>(cur)
    }

    fn at_operator(_cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        matches!(
            cur.peek().kind,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        )
    }

    fn combine(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        arith_combine::<PowerLevel>(cx, cur, left)
    }
}

struct PowerLevel;

impl InfixRule for PowerLevel {
    type Output = Expr;

    fn operand(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
        parse_unary(cx, cur)
    }

    fn at_operator(_cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        cur.peek().kind == TokenKind::Caret
    }

    fn combine(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        let offset = cur.offset();
        cx.require(Feature::Exponentiation, "the ^ operator", offset)?;
        arith_combine_operand(cx, cur, left, parse_unary)
    }
}

/// Shared arithmetic fold: consume the operator token, classify it, parse
/// one right operand at the next-tighter level.
fn arith_combine<Next: InfixRule<Output = Expr>>(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
    left: Expr,
) -> ParseResult<Expr> {
    arith_combine_operand(cx, cur, left, |cx, cur| cx.climb::<Next>(cur))
}

fn arith_combine_operand(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
    left: Expr,
    operand: impl Fn(&ParseContext<'_>, &mut Cursor<'_>) -> ParseResult<Expr>,
) -> ParseResult<Expr> {
    let tok = cur.advance()?;
    let op = match cx.operators().classify(&tok.kind) {
        Some(OpClass::Arithmetic(op)) => op,
        _ => {
            return Err(Diagnostics::expected(
                "an arithmetic operator",
                tok.kind.describe(),
                tok.span.start,
            ))
        }
    };
    let right = operand(cx, cur)?;
    let span = left.span().merge(right.span());
    Ok(Expr::Arithmetic {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

// ---------------------------------------------------------------------------
// Unary & postfix
// ---------------------------------------------------------------------------

fn parse_unary(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    match &cur.peek().kind {
        TokenKind::Minus => {
            let sp = cur.advance()?.span;
            let inner = parse_unary(cx, cur)?;
            let span = sp.merge(inner.span());
            Ok(Expr::Neg(Box::new(inner), span))
        }
        TokenKind::Plus => {
            // Unary plus is a no-op.
            cur.advance()?;
            parse_unary(cx, cur)
        }
        TokenKind::Op(_) => {
            let tok = cur.advance()?;
            let TokenKind::Op(op) = tok.kind else {
                return Err(Diagnostics::syntax("malformed operator token", tok.span.start));
            };
            cx.require(
                Feature::CustomOperators,
                &format!("operator {op}"),
                tok.span.start,
            )?;
            let inner = parse_unary(cx, cur)?;
            let span = tok.span.merge(inner.span());
            Ok(Expr::UnaryOp {
                op,
                expr: Box::new(inner),
                span,
            })
        }
        _ => parse_postfix(cx, cur),
    }
}

fn parse_postfix(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let mut expr = parse_atom(cx, cur)?;
    loop {
        if CollateSuffix::matches(cx, cur) {
            expr = CollateSuffix::parse_suffix(cx, cur, expr)?;
        } else if AtTimeZoneSuffix::matches(cx, cur) {
            expr = AtTimeZoneSuffix::parse_suffix(cx, cur, expr)?;
        } else if SubscriptSuffix::matches(cx, cur) {
            expr = SubscriptSuffix::parse_suffix(cx, cur, expr)?;
        } else {
            return Ok(expr);
        }
    }
}

struct CollateSuffix;

impl MatchableRule for CollateSuffix {
    fn matches(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        let mut p = cur.probe();
        cx.lookups().collate(cur, &mut p)
    }

    fn parse_suffix(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        let kw = cur.expect(&TokenKind::KwCollate, "COLLATE")?;
        cx.require(Feature::Collate, "COLLATE", kw.start)?;
        let tok = cur.advance()?;
        let collation = match tok.kind {
            TokenKind::Id(s) | TokenKind::QuotedId(s) | TokenKind::String(s) => s,
            other => {
                return Err(Diagnostics::expected(
                    "a collation name",
                    other.describe(),
                    tok.span.start,
                ))
            }
        };
        let span = left.span().merge(tok.span);
        Ok(Expr::Collate {
            expr: Box::new(left),
            collation,
            span,
        })
    }
}

struct AtTimeZoneSuffix;

impl MatchableRule for AtTimeZoneSuffix {
    fn matches(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        let mut p = cur.probe();
        cx.lookups().at_time_zone(cur, &mut p)
    }

    fn parse_suffix(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        let kw = cur.expect(&TokenKind::KwAt, "AT")?;
        cx.require(Feature::AtTimeZone, "AT TIME ZONE", kw.start)?;
        cur.expect(&TokenKind::KwTime, "TIME")?;
        cur.expect(&TokenKind::KwZone, "ZONE")?;
        let zone = parse_unary(cx, cur)?;
        let span = left.span().merge(zone.span());
        Ok(Expr::AtTimeZone {
            expr: Box::new(left),
            zone: Box::new(zone),
            span,
        })
    }
}

struct SubscriptSuffix;

impl MatchableRule for SubscriptSuffix {
    fn matches(cx: &ParseContext<'_>, cur: &Cursor<'_>) -> bool {
        let mut p = cur.probe();
        cx.lookups().subscript(cur, &mut p)
    }

    fn parse_suffix(cx: &ParseContext<'_>, cur: &mut Cursor<'_>, left: Expr) -> ParseResult<Expr> {
        let open = cur.expect(&TokenKind::LeftBracket, "'['")?;
        cx.require(Feature::ArraySubscript, "array subscript", open.start)?;

        let mut lower = None;
        let mut upper = None;
        let mut slice = false;

        if let Some(name) = slice_upper_name(cur) {
            // `a[:name]` lexes the bound as one `:name` token.
            slice = true;
            let tok = cur.advance()?;
            upper = Some(Box::new(Expr::Column(ColumnRef::bare(name), tok.span)));
        } else if cur.eat(&TokenKind::Colon).is_some() {
            slice = true;
            if !cur.check(&TokenKind::RightBracket) {
                upper = Some(Box::new(cx.parse::<Expr>(cur)?));
            }
        } else {
            lower = Some(Box::new(cx.parse::<Expr>(cur)?));
            if let Some(name) = slice_upper_name(cur) {
                slice = true;
                let tok = cur.advance()?;
                upper = Some(Box::new(Expr::Column(ColumnRef::bare(name), tok.span)));
            } else if cur.eat(&TokenKind::Colon).is_some() {
                slice = true;
                if !cur.check(&TokenKind::RightBracket) {
                    upper = Some(Box::new(cx.parse::<Expr>(cur)?));
                }
            }
        }

        let close = cur.expect(&TokenKind::RightBracket, "']'")?;
        let span = left.span().merge(close);
        Ok(Expr::Subscript {
            expr: Box::new(left),
            lower,
            upper,
            slice,
            span,
        })
    }
}

/// A `:name` token directly followed by `]` is a slice colon plus an upper
/// bound, not a named parameter.
fn slice_upper_name(cur: &Cursor<'_>) -> Option<String> {
    if let TokenKind::ColonParam(name) = &cur.peek().kind {
        if cur.check_nth(1, &TokenKind::RightBracket) {
            return Some(name.clone());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Atoms
// ---------------------------------------------------------------------------

fn parse_atom(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let lk = cx.lookups();

    let mut p = cur.probe();
    if lk.literal(cur, &mut p) {
        return parse_literal(cur);
    }
    let mut p = cur.probe();
    if lk.case_expr(cur, &mut p) {
        return parse_case(cx, cur);
    }
    let mut p = cur.probe();
    if lk.cast_expr(cur, &mut p) {
        return parse_cast(cx, cur);
    }
    // A `:name` directly before `]` fails this lookup and falls through to
    // the no-expression error below.
    let mut p = cur.probe();
    if lk.parameter(cur, &mut p) {
        return parse_parameter(cx, cur);
    }

    match &cur.peek().kind {
        TokenKind::KwRow => parse_row(cx, cur),

        TokenKind::LeftParen => {
            let mut p = cur.probe();
            if lk.subquery(cur, &mut p) {
                let (query, span) = parse_parenthesized_query(cx, cur)?;
                Ok(Expr::Subquery(Box::new(query), span))
            } else {
                let mut p = cur.probe();
                if lk.row_constructor(cur, &mut p) {
                    parse_row(cx, cur)
                } else {
                    cur.advance()?;
                    let inner = cx.parse::<Expr>(cur)?;
                    cur.expect(&TokenKind::RightParen, "')'")?;
                    Ok(inner)
                }
            }
        }

        TokenKind::Id(_) | TokenKind::QuotedId(_) => {
            let mut p = cur.probe();
            if lk.typed_literal(cur, &mut p) {
                return parse_typed_literal(cx, cur);
            }
            let mut p = cur.probe();
            if lk.function_call(cur, &mut p) {
                return parse_function(cx, cur);
            }
            let mut p = cur.probe();
            if !lk.column_ref(cur, &mut p) {
                return Err(Diagnostics::expected(
                    "an expression",
                    cur.peek().kind.describe(),
                    cur.offset(),
                ));
            }
            let (first, sp1) = parse_ident(cur)?;
            if cur.eat(&TokenKind::Dot).is_some() {
                let (second, sp2) = parse_ident(cur)?;
                Ok(Expr::Column(
                    ColumnRef::qualified(first, second),
                    sp1.merge(sp2),
                ))
            } else {
                Ok(Expr::Column(ColumnRef::bare(first), sp1))
            }
        }

        other => {
            let found = other.describe();
            let offset = cur.offset();
            Err(Diagnostics::expected("an expression", found, offset))
        }
    }
}

fn parse_literal(cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let tok = cur.advance()?;
    let lit = match tok.kind {
        TokenKind::Integer(v) => Literal::Integer(v),
        TokenKind::Float(v) => Literal::Float(v),
        TokenKind::String(s) | TokenKind::EscapeString(s) => Literal::String(s),
        TokenKind::BitString(s) => Literal::BitString(s),
        TokenKind::HexString(s) => Literal::HexString(s),
        TokenKind::DollarString(s) => Literal::DollarString(s),
        TokenKind::KwNull => Literal::Null,
        TokenKind::KwTrue => Literal::True,
        TokenKind::KwFalse => Literal::False,
        other => {
            return Err(Diagnostics::expected(
                "a literal",
                other.describe(),
                tok.span.start,
            ))
        }
    };
    Ok(Expr::Literal(lit, tok.span))
}

fn parse_parameter(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let tok = cur.advance()?;
    match tok.kind {
        TokenKind::Question => Ok(Expr::Parameter(Parameter::Anonymous, tok.span)),
        TokenKind::DollarNum(n) => {
            cx.require(
                Feature::OrdinalParameters,
                "ordinal parameters",
                tok.span.start,
            )?;
            Ok(Expr::Parameter(Parameter::Ordinal(n), tok.span))
        }
        TokenKind::ColonParam(name) => Ok(Expr::Parameter(Parameter::Named(name), tok.span)),
        other => Err(Diagnostics::expected(
            "a parameter marker",
            other.describe(),
            tok.span.start,
        )),
    }
}

fn parse_typed_literal(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let head = cur.advance()?;
    cx.require(Feature::TypedLiterals, "typed literals", head.span.start)?;
    let TokenKind::Id(name) = &head.kind else {
        return Err(Diagnostics::syntax("malformed typed literal", head.span.start));
    };
    let kind = match name.to_ascii_lowercase().as_str() {
        "date" => TypedLiteralKind::Date,
        "time" => TypedLiteralKind::Time,
        "timestamp" => TypedLiteralKind::Timestamp,
        "interval" => TypedLiteralKind::Interval,
        other => {
            return Err(Diagnostics::expected(
                "a typed-literal keyword",
                other.to_owned(),
                head.span.start,
            ))
        }
    };
    let value_tok = cur.advance()?;
    let value = match value_tok.kind {
        TokenKind::String(s) | TokenKind::EscapeString(s) | TokenKind::DollarString(s) => s,
        other => {
            return Err(Diagnostics::expected(
                "a string literal",
                other.describe(),
                value_tok.span.start,
            ))
        }
    };
    Ok(Expr::TypedLiteral {
        kind,
        value,
        span: head.span.merge(value_tok.span),
    })
}

fn parse_case(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let case_sp = cur.expect(&TokenKind::KwCase, "CASE")?;

    if matches!(cur.peek().kind, TokenKind::KwEnd | TokenKind::KwElse) {
        return Err(Diagnostics::structural(
            "CASE requires at least one WHEN arm",
            cur.offset(),
        ));
    }

    let operand = if cur.check(&TokenKind::KwWhen) {
        None
    } else {
        Some(Box::new(cx.parse::<Expr>(cur)?))
    };

    let mut whens = Vec::new();
    while cur.eat(&TokenKind::KwWhen).is_some() {
        let condition = if operand.is_some() {
            CaseCondition::Value(cx.parse::<Expr>(cur)?)
        } else {
            // The searched form holds a predicate; bound it at THEN so a
            // disjunction cannot scan into later arms.
            let idx = cur.find(|k| *k == TokenKind::KwThen);
            if idx == cur.end() {
                return Err(Diagnostics::expected(
                    "THEN",
                    cur.peek().kind.describe(),
                    cur.offset(),
                ));
            }
            let mut sub = cur.carve_to(idx);
            let pred = cx.parse::<sqlfront_ast::Predicate>(&mut sub)?;
            expect_exhausted(&sub)?;
            CaseCondition::Search(pred)
        };
        cur.expect(&TokenKind::KwThen, "THEN")?;
        let result = cx.parse::<Expr>(cur)?;
        whens.push(CaseWhen { condition, result });
    }

    if whens.is_empty() {
        return Err(Diagnostics::structural(
            "CASE requires at least one WHEN arm",
            cur.offset(),
        ));
    }

    let else_expr = if cur.eat(&TokenKind::KwElse).is_some() {
        Some(Box::new(cx.parse::<Expr>(cur)?))
    } else {
        None
    };

    let end_sp = cur.expect(&TokenKind::KwEnd, "END")?;
    Ok(Expr::Case {
        operand,
        whens,
        else_expr,
        span: case_sp.merge(end_sp),
    })
}

fn parse_cast(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let kw = cur.expect(&TokenKind::KwCast, "CAST")?;
    cur.expect(&TokenKind::LeftParen, "'('")?;
    let expr = cx.parse::<Expr>(cur)?;
    cur.expect(&TokenKind::KwAs, "AS")?;
    let type_name = cx.parse::<TypeName>(cur)?;
    let close = cur.expect(&TokenKind::RightParen, "')'")?;
    Ok(Expr::Cast {
        expr: Box::new(expr),
        type_name,
        span: kw.merge(close),
    })
}

fn parse_row(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let start = if cur.check(&TokenKind::KwRow) {
        cur.advance()?.span
    } else {
        cur.peek().span
    };
    cur.expect(&TokenKind::LeftParen, "'('")?;
    let items = parse_expr_list(cx, cur)?;
    let close = cur.expect(&TokenKind::RightParen, "')'")?;
    let span = start.merge(close);

    // `((1, 2), (3, 4))` is a list of rows, not a row of rows.
    let all_rows = !items.is_empty() && items.iter().all(|e| matches!(e, Expr::Row(_, _)));
    if all_rows {
        let rows = items
            .into_iter()
            .map(|e| match e {
                Expr::Row(fields, _) => fields,
                _ => Vec::new(),
            })
            .collect();
        Ok(Expr::RowList(rows, span))
    } else {
        Ok(Expr::Row(items, span))
    }
}

fn parse_function(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Expr> {
    let (name, name_sp) = parse_qualified_name(cur)?;
    cur.expect(&TokenKind::LeftParen, "'('")?;
    let distinct = cur.eat(&TokenKind::KwDistinct).is_some();

    let args = if cur.check(&TokenKind::Star) && cur.check_nth(1, &TokenKind::RightParen) {
        cur.advance()?;
        FunctionArgs::Star
    } else if cur.check(&TokenKind::RightParen) {
        FunctionArgs::List(Vec::new())
    } else {
        FunctionArgs::List(parse_expr_list(cx, cur)?)
    };
    let close = cur.expect(&TokenKind::RightParen, "')'")?;
    let mut span = name_sp.merge(close);

    let over = if cur.eat(&TokenKind::KwOver).is_some() {
        let mut p = cur.probe();
        if cx.lookups().window_spec_start(cur, &mut p) {
            cur.advance()?;
            let spec = cx.parse::<WindowSpec>(cur)?;
            let end = cur.expect(&TokenKind::RightParen, "')'")?;
            span = span.merge(end);
            Some(Box::new(spec))
        } else {
            let (window, w_sp) = parse_ident(cur)?;
            span = span.merge(w_sp);
            Some(Box::new(WindowSpec {
                base_window: Some(window),
                partition_by: Vec::new(),
                order_by: Vec::new(),
                frame: None,
            }))
        }
    } else {
        None
    };

    Ok(Expr::Function {
        name,
        args,
        distinct,
        over,
        span,
    })
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// A comma-separated, non-empty expression list.
pub(crate) fn parse_expr_list(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Vec<Expr>> {
    let mut items = vec![cx.parse::<Expr>(cur)?];
    while cur.eat(&TokenKind::Comma).is_some() {
        items.push(cx.parse::<Expr>(cur)?);
    }
    Ok(items)
}

/// One identifier token (plain or quoted).
pub(crate) fn parse_ident(cur: &mut Cursor<'_>) -> ParseResult<(String, Span)> {
    let tok = cur.advance()?;
    match tok.kind {
        TokenKind::Id(s) | TokenKind::QuotedId(s) => Ok((s, tok.span)),
        other => Err(Diagnostics::expected(
            "an identifier",
            other.describe(),
            tok.span.start,
        )),
    }
}

/// `name` or `schema.name`.
pub(crate) fn parse_qualified_name(cur: &mut Cursor<'_>) -> ParseResult<(QualifiedName, Span)> {
    let (first, sp1) = parse_ident(cur)?;
    if cur.eat(&TokenKind::Dot).is_some() {
        let (second, sp2) = parse_ident(cur)?;
        Ok((QualifiedName::qualified(first, second), sp1.merge(sp2)))
    } else {
        Ok((QualifiedName::bare(first), sp1))
    }
}

/// `( query )`, bounded at the matching close paren. Returns the query and
/// the span including both parens.
pub(crate) fn parse_parenthesized_query(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<(Query, Span)> {
    let open = cur.peek().span;
    let Some(close) = cur.matching_paren() else {
        return Err(Diagnostics::expected(
            "'('",
            cur.peek().kind.describe(),
            cur.offset(),
        ));
    };
    cur.advance()?;
    let mut sub = cur.carve_to(close);
    let query = cx.parse::<Query>(&mut sub)?;
    expect_exhausted(&sub)?;
    let close_sp = cur.expect(&TokenKind::RightParen, "')'")?;
    Ok((query, open.merge(close_sp)))
}

/// Require a carved sub-cursor to have consumed its whole range.
pub(crate) fn expect_exhausted(cur: &Cursor<'_>) -> ParseResult<()> {
    if cur.is_at_end() {
        Ok(())
    } else {
        let found = cur.peek();
        Err(Diagnostics::expected(
            "end of clause",
            found.kind.describe(),
            found.span.start,
        ))
    }
}

// ---------------------------------------------------------------------------
// Type names
// ---------------------------------------------------------------------------

impl GrammarRule for TypeName {
    const KIND: RuleKind = RuleKind::TypeName;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let _ = cx;
        let (mut name, _) = parse_qualified_name(cur)?;

        // Two-word type heads: `double precision`, `character varying`.
        if name.schema.is_none() {
            let head = name.name.to_ascii_lowercase();
            if head == "double" || head == "character" {
                if let TokenKind::Id(next) = &cur.peek().kind {
                    let tail = next.to_ascii_lowercase();
                    if (head == "double" && tail == "precision")
                        || (head == "character" && tail == "varying")
                    {
                        cur.advance()?;
                        name.name = format!("{} {tail}", name.name);
                    }
                }
            }
        }

        let mut modifiers = Vec::new();
        if cur.eat(&TokenKind::LeftParen).is_some() {
            loop {
                let tok = cur.advance()?;
                match tok.kind {
                    TokenKind::Integer(v) => modifiers.push(v.to_string()),
                    TokenKind::Id(s) => modifiers.push(s),
                    other => {
                        return Err(Diagnostics::expected(
                            "a type modifier",
                            other.describe(),
                            tok.span.start,
                        ))
                    }
                }
                if cur.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
            cur.expect(&TokenKind::RightParen, "')'")?;
        }

        let with_time_zone = if cur.eat(&TokenKind::KwWith).is_some() {
            cur.expect(&TokenKind::KwTime, "TIME")?;
            cur.expect(&TokenKind::KwZone, "ZONE")?;
            Some(true)
        } else if cur.eat(&TokenKind::KwWithout).is_some() {
            cur.expect(&TokenKind::KwTime, "TIME")?;
            cur.expect(&TokenKind::KwZone, "ZONE")?;
            Some(false)
        } else {
            None
        };

        let mut array_dims = 0u8;
        while cur.check(&TokenKind::LeftBracket) && cur.check_nth(1, &TokenKind::RightBracket) {
            cur.advance()?;
            cur.advance()?;
            array_dims = array_dims.saturating_add(1);
        }

        Ok(TypeName {
            name,
            modifiers,
            array_dims,
            with_time_zone,
        })
    }
}
