// Query grammar: SELECT cores, set-operation chains, WITH wrappers, and the
// clause value objects (select items, ordering, grouping, windows, frames).
//
// Composite chains are parsed by carving each term at the next depth-zero
// set operator, so no term parse can overrun into its neighbor. WHERE and
// HAVING regions are carved at the next clause keyword for the same reason.

use sqlfront_ast::{
    CteDef, DistinctSpec, Expr, FrameBound, FrameExclude, FrameSpec, FrameUnit, GroupItem,
    LockMode, LockingClause, NullsOrder, OrderItem, OrderKey, Predicate, Query, QualifiedName,
    SelectItem, SelectQuery, SetOp, SortDirection, Span, WindowDef, WindowSpec,
};

use crate::context::{GrammarRule, ParseContext, RuleKind};
use crate::cursor::Cursor;
use crate::diag::{Diagnostics, ParseResult};
use crate::dialect::Feature;
use crate::expr::{
    expect_exhausted, parse_expr_list, parse_ident, parse_parenthesized_query,
    parse_qualified_name,
};
use crate::table_ref::parse_from_list;
use crate::token::TokenKind;

impl GrammarRule for Query {
    const KIND: RuleKind = RuleKind::Query;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let lk = cx.lookups();
        let mut p = cur.probe();
        if lk.with_query(cur, &mut p) {
            return parse_with(cx, cur);
        }
        let mut p = cur.probe();
        if lk.composite_query(cur, &mut p) {
            return parse_composite(cx, cur);
        }
        parse_term(cx, cur)
    }
}

/// Span of the token consumed immediately before the cursor position.
pub(crate) fn prev_span(cur: &Cursor<'_>) -> Span {
    cur.token_at(cur.pos().saturating_sub(1)).span
}

/// One query term: a SELECT core, a VALUES list, a nested WITH, or a
/// parenthesized query.
fn parse_term(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Query> {
    let mut p = cur.probe();
    if cx.lookups().values_clause(cur, &mut p) {
        let (rows, span) = parse_values_rows(cx, cur)?;
        return Ok(Query::Values(rows, span));
    }
    match cur.peek().kind {
        TokenKind::LeftParen => {
            let Some(close) = cur.matching_paren() else {
                return Err(Diagnostics::syntax("unbalanced '('", cur.offset()));
            };
            if matches!(cur.token_at(close + 1).kind, TokenKind::Eof) {
                return cx.parse_enclosed::<Query>(cur);
            }
            // The close paren does not end the range; consume the pair here
            // and parse the inner range bounded.
            cur.advance()?;
            let mut inner = cur.carve_to(close);
            let query = cx.parse::<Query>(&mut inner)?;
            expect_exhausted(&inner)?;
            cur.expect(&TokenKind::RightParen, "')'")?;
            Ok(query)
        }
        TokenKind::KwSelect => Ok(Query::Select(Box::new(cx.parse::<SelectQuery>(cur)?))),
        TokenKind::KwWith => parse_with(cx, cur),
        ref other => Err(Diagnostics::expected(
            "a query",
            other.describe(),
            cur.offset(),
        )),
    }
}

fn is_chain_boundary(kind: &TokenKind) -> bool {
    kind.is_set_operator()
        || matches!(
            kind,
            TokenKind::KwOrder | TokenKind::KwLimit | TokenKind::KwOffset | TokenKind::Semicolon
        )
}

/// `term (UNION [ALL] | INTERSECT [ALL] | EXCEPT [ALL]) term ...` with an
/// optional trailing ORDER BY / LIMIT / OFFSET applying to the whole chain.
fn parse_composite(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Query> {
    let start = cur.peek().span;
    let mut terms = Vec::new();
    let mut ops = Vec::new();

    loop {
        let idx = cur.find(is_chain_boundary);
        let mut sub = cur.carve_to(idx);
        let term = parse_term(cx, &mut sub)?;
        expect_exhausted(&sub)?;
        terms.push(term);

        let op = match cur.peek().kind {
            TokenKind::KwUnion => {
                cur.advance()?;
                if cur.eat(&TokenKind::KwAll).is_some() {
                    SetOp::UnionAll
                } else {
                    cur.eat(&TokenKind::KwDistinct);
                    SetOp::Union
                }
            }
            TokenKind::KwIntersect => {
                cur.advance()?;
                if cur.eat(&TokenKind::KwAll).is_some() {
                    SetOp::IntersectAll
                } else {
                    cur.eat(&TokenKind::KwDistinct);
                    SetOp::Intersect
                }
            }
            TokenKind::KwExcept => {
                cur.advance()?;
                if cur.eat(&TokenKind::KwAll).is_some() {
                    SetOp::ExceptAll
                } else {
                    cur.eat(&TokenKind::KwDistinct);
                    SetOp::Except
                }
            }
            _ => break,
        };
        ops.push(op);
    }

    if ops.is_empty() {
        // The set operator the lookup saw was behind a paren layer; the
        // single term owns it.
        let term = terms.pop();
        return term.ok_or_else(|| Diagnostics::syntax("empty query", start.start));
    }

    let order_by = parse_order_by(cx, cur)?;
    let (limit, offset) = parse_limit_offset(cx, cur)?;
    let span = start.merge(prev_span(cur));

    Ok(Query::Composite {
        terms,
        ops,
        order_by,
        limit,
        offset,
        span,
    })
}

fn parse_with(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Query> {
    let kw = cur.expect(&TokenKind::KwWith, "WITH")?;
    let recursive = cur.eat(&TokenKind::KwRecursive).is_some();

    let mut ctes = vec![cx.parse::<CteDef>(cur)?];
    while cur.eat(&TokenKind::Comma).is_some() {
        ctes.push(cx.parse::<CteDef>(cur)?);
    }

    let body = cx.parse::<Query>(cur)?;
    let span = kw.merge(prev_span(cur));
    Ok(Query::With {
        recursive,
        ctes,
        body: Box::new(body),
        span,
    })
}

impl GrammarRule for CteDef {
    const KIND: RuleKind = RuleKind::CteDef;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let (name, _) = parse_ident(cur)?;
        let mut columns = Vec::new();
        if cur.eat(&TokenKind::LeftParen).is_some() {
            loop {
                let (col, _) = parse_ident(cur)?;
                columns.push(col);
                if cur.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
            cur.expect(&TokenKind::RightParen, "')'")?;
        }
        cur.expect(&TokenKind::KwAs, "AS")?;
        let (query, _) = parse_parenthesized_query(cx, cur)?;
        Ok(CteDef {
            name,
            columns,
            query: Box::new(query),
        })
    }
}

/// `VALUES (row), (row), ...` returning the rows and the covered span.
pub(crate) fn parse_values_rows(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<(Vec<Vec<Expr>>, Span)> {
    let kw = cur.expect(&TokenKind::KwValues, "VALUES")?;
    let mut rows = Vec::new();
    loop {
        cur.expect(&TokenKind::LeftParen, "'('")?;
        rows.push(parse_expr_list(cx, cur)?);
        cur.expect(&TokenKind::RightParen, "')'")?;
        if cur.eat(&TokenKind::Comma).is_none() {
            break;
        }
    }
    Ok((rows, kw.merge(prev_span(cur))))
}

// ---------------------------------------------------------------------------
// SELECT core
// ---------------------------------------------------------------------------

fn is_clause_boundary(kind: &TokenKind) -> bool {
    kind.is_set_operator()
        || matches!(
            kind,
            TokenKind::KwGroup
                | TokenKind::KwHaving
                | TokenKind::KwWindow
                | TokenKind::KwOrder
                | TokenKind::KwLimit
                | TokenKind::KwOffset
                | TokenKind::KwFor
                | TokenKind::Semicolon
        )
}

/// Carve the predicate region of a WHERE or HAVING clause at the next
/// depth-zero clause keyword and parse it whole.
pub(crate) fn parse_clause_predicate(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Predicate> {
    let idx = cur.find(is_clause_boundary);
    let mut sub = cur.carve_to(idx);
    let pred = cx.parse::<Predicate>(&mut sub)?;
    expect_exhausted(&sub)?;
    Ok(pred)
}

impl GrammarRule for SelectQuery {
    const KIND: RuleKind = RuleKind::SelectQuery;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let start = cur.expect(&TokenKind::KwSelect, "SELECT")?;

        let distinct = if cur.eat(&TokenKind::KwAll).is_some() {
            DistinctSpec::All
        } else if let Some(d_sp) = cur.eat(&TokenKind::KwDistinct) {
            if cur.check(&TokenKind::KwOn) {
                cur.advance()?;
                cx.require(Feature::DistinctOn, "DISTINCT ON", d_sp.start)?;
                cur.expect(&TokenKind::LeftParen, "'('")?;
                let exprs = parse_expr_list(cx, cur)?;
                cur.expect(&TokenKind::RightParen, "')'")?;
                DistinctSpec::DistinctOn(exprs)
            } else {
                DistinctSpec::Distinct
            }
        } else {
            DistinctSpec::All
        };

        let mut columns = vec![cx.parse::<SelectItem>(cur)?];
        while cur.eat(&TokenKind::Comma).is_some() {
            columns.push(cx.parse::<SelectItem>(cur)?);
        }

        let from = if cur.eat(&TokenKind::KwFrom).is_some() {
            parse_from_list(cx, cur)?
        } else {
            Vec::new()
        };

        let where_clause = if cur.eat(&TokenKind::KwWhere).is_some() {
            Some(parse_clause_predicate(cx, cur)?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if cur.eat(&TokenKind::KwGroup).is_some() {
            cur.expect(&TokenKind::KwBy, "BY")?;
            group_by.push(cx.parse::<GroupItem>(cur)?);
            while cur.eat(&TokenKind::Comma).is_some() {
                group_by.push(cx.parse::<GroupItem>(cur)?);
            }
        }

        let having = if cur.eat(&TokenKind::KwHaving).is_some() {
            Some(parse_clause_predicate(cx, cur)?)
        } else {
            None
        };

        let mut windows = Vec::new();
        if cur.eat(&TokenKind::KwWindow).is_some() {
            loop {
                let (name, _) = parse_ident(cur)?;
                cur.expect(&TokenKind::KwAs, "AS")?;
                cur.expect(&TokenKind::LeftParen, "'('")?;
                let spec = cx.parse::<WindowSpec>(cur)?;
                cur.expect(&TokenKind::RightParen, "')'")?;
                windows.push(WindowDef { name, spec });
                if cur.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let order_by = parse_order_by(cx, cur)?;
        let (limit, offset) = parse_limit_offset(cx, cur)?;

        let locking = if cur.check(&TokenKind::KwFor) {
            let for_sp = cur.advance()?.span;
            cx.require(Feature::LockingClause, "a locking clause", for_sp.start)?;
            let mode_tok = cur.advance()?;
            let mode = match mode_tok.kind {
                TokenKind::KwUpdate => LockMode::Update,
                TokenKind::KwShare => LockMode::Share,
                other => {
                    return Err(Diagnostics::expected(
                        "UPDATE or SHARE",
                        other.describe(),
                        mode_tok.span.start,
                    ))
                }
            };
            let mut of = Vec::new();
            if cur.eat(&TokenKind::KwOf).is_some() {
                loop {
                    let (name, _): (QualifiedName, Span) = parse_qualified_name(cur)?;
                    of.push(name);
                    if cur.eat(&TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            Some(LockingClause { mode, of })
        } else {
            None
        };

        let span = start.merge(prev_span(cur));
        Ok(SelectQuery {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            windows,
            order_by,
            limit,
            offset,
            locking,
            span,
        })
    }
}

impl GrammarRule for SelectItem {
    const KIND: RuleKind = RuleKind::SelectItem;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let lk = cx.lookups();

        let mut p = cur.probe();
        if lk.star_item(cur, &mut p) {
            cur.advance()?;
            return Ok(SelectItem::Star);
        }

        let mut p = cur.probe();
        if lk.table_star(cur, &mut p) {
            let (table, _) = parse_ident(cur)?;
            cur.expect(&TokenKind::Dot, "'.'")?;
            cur.expect(&TokenKind::Star, "'*'")?;
            return Ok(SelectItem::TableStar(table));
        }

        let expr = cx.parse::<Expr>(cur)?;
        let alias = try_alias(cx, cur)?;
        Ok(SelectItem::Expr { expr, alias })
    }
}

/// `AS name`, or a bare identifier alias. Keywords never alias.
pub(crate) fn try_alias(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Option<String>> {
    let mut p = cur.probe();
    if !cx.lookups().alias_follows(cur, &mut p) {
        return Ok(None);
    }
    cur.eat(&TokenKind::KwAs);
    let (name, _) = parse_ident(cur)?;
    Ok(Some(name))
}

// ---------------------------------------------------------------------------
// Ordering & grouping
// ---------------------------------------------------------------------------

/// `ORDER BY item, ...` when present, else empty.
pub(crate) fn parse_order_by(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Vec<OrderItem>> {
    if cur.eat(&TokenKind::KwOrder).is_none() {
        return Ok(Vec::new());
    }
    cur.expect(&TokenKind::KwBy, "BY")?;
    let mut items = vec![cx.parse::<OrderItem>(cur)?];
    while cur.eat(&TokenKind::Comma).is_some() {
        items.push(cx.parse::<OrderItem>(cur)?);
    }
    Ok(items)
}

/// `LIMIT n` / `OFFSET n`, in either order. At most one of each clause;
/// `LIMIT ALL` counts as a LIMIT clause even though it leaves no bound.
pub(crate) fn parse_limit_offset(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<(Option<Expr>, Option<Expr>)> {
    let mut limit = None;
    let mut offset = None;
    let mut limit_seen = false;
    let mut offset_seen = false;
    loop {
        if !limit_seen && cur.eat(&TokenKind::KwLimit).is_some() {
            limit_seen = true;
            if cur.eat(&TokenKind::KwAll).is_none() {
                limit = Some(cx.parse::<Expr>(cur)?);
            }
        } else if !offset_seen && cur.eat(&TokenKind::KwOffset).is_some() {
            offset_seen = true;
            offset = Some(cx.parse::<Expr>(cur)?);
            // `OFFSET n ROWS` noise word.
            if cur.eat(&TokenKind::KwRows).is_none() {
                cur.eat(&TokenKind::KwRow);
            }
        } else {
            return Ok((limit, offset));
        }
    }
}

impl GrammarRule for OrderItem {
    const KIND: RuleKind = RuleKind::OrderItem;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let lk = cx.lookups();

        let mut p = cur.probe();
        let key = if lk.ordinal_key(cur, &mut p) {
            let tok = cur.advance()?;
            let TokenKind::Integer(v) = tok.kind else {
                return Err(Diagnostics::syntax("malformed ordinal", tok.span.start));
            };
            if v <= 0 {
                return Err(Diagnostics::structural(
                    "ORDER BY position must be greater than zero",
                    tok.span.start,
                ));
            }
            OrderKey::Ordinal(v)
        } else {
            OrderKey::Expr(cx.parse::<Expr>(cur)?)
        };

        let mut direction = None;
        let mut nulls = None;
        let mut collation = None;
        loop {
            match cur.peek().kind {
                TokenKind::KwAsc | TokenKind::KwDesc => {
                    let tok = cur.advance()?;
                    if direction.is_some() {
                        return Err(Diagnostics::structural(
                            "duplicate sort direction",
                            tok.span.start,
                        ));
                    }
                    direction = Some(if tok.kind == TokenKind::KwAsc {
                        SortDirection::Asc
                    } else {
                        SortDirection::Desc
                    });
                }
                TokenKind::KwNulls => {
                    let tok = cur.advance()?;
                    if nulls.is_some() {
                        return Err(Diagnostics::structural(
                            "duplicate NULLS ordering",
                            tok.span.start,
                        ));
                    }
                    let which = cur.advance()?;
                    nulls = Some(match which.kind {
                        TokenKind::KwFirst => NullsOrder::First,
                        TokenKind::KwLast => NullsOrder::Last,
                        other => {
                            return Err(Diagnostics::expected(
                                "FIRST or LAST",
                                other.describe(),
                                which.span.start,
                            ))
                        }
                    });
                }
                TokenKind::KwCollate => {
                    let tok = cur.advance()?;
                    if collation.is_some() {
                        return Err(Diagnostics::structural(
                            "duplicate COLLATE",
                            tok.span.start,
                        ));
                    }
                    let (name, _) = parse_ident(cur)?;
                    collation = Some(name);
                }
                _ => break,
            }
        }

        Ok(OrderItem {
            key,
            direction,
            nulls,
            collation,
        })
    }
}

impl GrammarRule for GroupItem {
    const KIND: RuleKind = RuleKind::GroupItem;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let lk = cx.lookups();

        let mut p = cur.probe();
        if lk.grouping_element(cur, &mut p) {
            return parse_grouping_element(cx, cur);
        }

        parse_simple_group_item(cx, cur)
    }
}

fn parse_simple_group_item(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<GroupItem> {
    let mut p = cur.probe();
    if cx.lookups().ordinal_key(cur, &mut p) {
        let tok = cur.advance()?;
        let TokenKind::Integer(v) = tok.kind else {
            return Err(Diagnostics::syntax("malformed ordinal", tok.span.start));
        };
        if v <= 0 {
            return Err(Diagnostics::structural(
                "GROUP BY position must be greater than zero",
                tok.span.start,
            ));
        }
        return Ok(GroupItem::Ordinal(v));
    }
    Ok(GroupItem::Expr(cx.parse::<Expr>(cur)?))
}

fn parse_grouping_element(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<GroupItem> {
    match cur.peek().kind {
        TokenKind::KwGrouping => {
            let kw = cur.advance()?.span;
            cur.expect(&TokenKind::KwSets, "SETS")?;
            cx.require(Feature::GroupingSets, "GROUPING SETS", kw.start)?;
            cur.expect(&TokenKind::LeftParen, "'('")?;
            let mut sets = Vec::new();
            loop {
                if cur.eat(&TokenKind::LeftParen).is_some() {
                    let mut set = Vec::new();
                    if !cur.check(&TokenKind::RightParen) {
                        set.push(parse_simple_group_item(cx, cur)?);
                        while cur.eat(&TokenKind::Comma).is_some() {
                            set.push(parse_simple_group_item(cx, cur)?);
                        }
                    }
                    cur.expect(&TokenKind::RightParen, "')'")?;
                    sets.push(set);
                } else {
                    sets.push(vec![parse_simple_group_item(cx, cur)?]);
                }
                if cur.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
            cur.expect(&TokenKind::RightParen, "')'")?;
            Ok(GroupItem::GroupingSets(sets))
        }
        TokenKind::KwRollup | TokenKind::KwCube => {
            let tok = cur.advance()?;
            cx.require(
                Feature::GroupingSets,
                if tok.kind == TokenKind::KwRollup {
                    "ROLLUP"
                } else {
                    "CUBE"
                },
                tok.span.start,
            )?;
            cur.expect(&TokenKind::LeftParen, "'('")?;
            let exprs = parse_expr_list(cx, cur)?;
            cur.expect(&TokenKind::RightParen, "')'")?;
            if tok.kind == TokenKind::KwRollup {
                Ok(GroupItem::Rollup(exprs))
            } else {
                Ok(GroupItem::Cube(exprs))
            }
        }
        ref other => Err(Diagnostics::expected(
            "a grouping element",
            other.describe(),
            cur.offset(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Windows & frames
// ---------------------------------------------------------------------------

impl GrammarRule for WindowSpec {
    const KIND: RuleKind = RuleKind::WindowSpec;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let base_window = match &cur.peek().kind {
            TokenKind::Id(s) | TokenKind::QuotedId(s) => {
                let name = s.clone();
                cur.advance()?;
                Some(name)
            }
            _ => None,
        };

        let mut partition_by = Vec::new();
        if cur.eat(&TokenKind::KwPartition).is_some() {
            cur.expect(&TokenKind::KwBy, "BY")?;
            partition_by = parse_expr_list(cx, cur)?;
        }

        let order_by = parse_order_by(cx, cur)?;

        let mut p = cur.probe();
        let frame = if cx.lookups().frame_spec_start(cur, &mut p) {
            Some(cx.parse::<FrameSpec>(cur)?)
        } else {
            None
        };

        Ok(WindowSpec {
            base_window,
            partition_by,
            order_by,
            frame,
        })
    }
}

impl GrammarRule for FrameSpec {
    const KIND: RuleKind = RuleKind::FrameSpec;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let unit_tok = cur.advance()?;
        let unit = match unit_tok.kind {
            TokenKind::KwRows => FrameUnit::Rows,
            TokenKind::KwRange => FrameUnit::Range,
            TokenKind::KwGroups => FrameUnit::Groups,
            other => {
                return Err(Diagnostics::expected(
                    "ROWS, RANGE, or GROUPS",
                    other.describe(),
                    unit_tok.span.start,
                ))
            }
        };

        let (start, end) = if cur.eat(&TokenKind::KwBetween).is_some() {
            let start = parse_frame_bound(cx, cur)?;
            cur.expect(&TokenKind::KwAnd, "AND")?;
            let end = parse_frame_bound(cx, cur)?;
            (start, Some(end))
        } else {
            (parse_frame_bound(cx, cur)?, None)
        };

        let exclude = if cur.eat(&TokenKind::KwExclude).is_some() {
            let tok = cur.advance()?;
            Some(match tok.kind {
                TokenKind::KwCurrent => {
                    cur.expect(&TokenKind::KwRow, "ROW")?;
                    FrameExclude::CurrentRow
                }
                TokenKind::KwGroup => FrameExclude::Group,
                TokenKind::KwTies => FrameExclude::Ties,
                TokenKind::KwNo => {
                    cur.expect(&TokenKind::KwOthers, "OTHERS")?;
                    FrameExclude::NoOthers
                }
                other => {
                    return Err(Diagnostics::expected(
                        "CURRENT ROW, GROUP, TIES, or NO OTHERS",
                        other.describe(),
                        tok.span.start,
                    ))
                }
            })
        } else {
            None
        };

        Ok(FrameSpec {
            unit,
            start,
            end,
            exclude,
        })
    }
}

fn parse_frame_bound(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<FrameBound> {
    if cur.eat(&TokenKind::KwUnbounded).is_some() {
        let tok = cur.advance()?;
        return match tok.kind {
            TokenKind::KwPreceding => Ok(FrameBound::UnboundedPreceding),
            TokenKind::KwFollowing => Ok(FrameBound::UnboundedFollowing),
            other => Err(Diagnostics::expected(
                "PRECEDING or FOLLOWING",
                other.describe(),
                tok.span.start,
            )),
        };
    }
    if cur.eat(&TokenKind::KwCurrent).is_some() {
        cur.expect(&TokenKind::KwRow, "ROW")?;
        return Ok(FrameBound::CurrentRow);
    }
    let expr = cx.parse::<Expr>(cur)?;
    let tok = cur.advance()?;
    match tok.kind {
        TokenKind::KwPreceding => Ok(FrameBound::Preceding(Box::new(expr))),
        TokenKind::KwFollowing => Ok(FrameBound::Following(Box::new(expr))),
        other => Err(Diagnostics::expected(
            "PRECEDING or FOLLOWING",
            other.describe(),
            tok.span.start,
        )),
    }
}
