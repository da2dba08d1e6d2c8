// FROM-clause grammar: table references and join chains.
//
// A `FromItem` is one comma-separated FROM source plus every join chained
// onto it. ON predicates are carved at the next depth-zero join or clause
// keyword before the predicate rule runs, so a disjunction inside ON can
// never leak into the next join step.

use sqlfront_ast::{FromItem, Join, JoinKind, Predicate, TableAlias, TableRef};

use crate::context::{GrammarRule, ParseContext, RuleKind};
use crate::cursor::Cursor;
use crate::diag::{Diagnostics, ParseResult};
use crate::dialect::Feature;
use crate::expr::{
    expect_exhausted, parse_expr_list, parse_ident, parse_parenthesized_query,
    parse_qualified_name,
};
use crate::query::parse_values_rows;
use crate::token::TokenKind;

/// The comma-separated FROM source list.
pub(crate) fn parse_from_list(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Vec<FromItem>> {
    let mut items = vec![cx.parse::<FromItem>(cur)?];
    while cur.eat(&TokenKind::Comma).is_some() {
        items.push(cx.parse::<FromItem>(cur)?);
    }
    Ok(items)
}

impl GrammarRule for FromItem {
    const KIND: RuleKind = RuleKind::FromItem;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let source = cx.parse::<TableRef>(cur)?;
        let mut joins = Vec::new();
        loop {
            let mut p = cur.probe();
            if !cx.lookups().join(cur, &mut p) {
                break;
            }
            joins.push(parse_join(cx, cur)?);
        }
        Ok(FromItem { source, joins })
    }
}

fn eat_join_kind(cur: &mut Cursor<'_>) -> JoinKind {
    if cur.eat(&TokenKind::KwInner).is_some() {
        JoinKind::Inner
    } else if cur.eat(&TokenKind::KwLeft).is_some() {
        cur.eat(&TokenKind::KwOuter);
        JoinKind::Left
    } else if cur.eat(&TokenKind::KwRight).is_some() {
        cur.eat(&TokenKind::KwOuter);
        JoinKind::Right
    } else if cur.eat(&TokenKind::KwFull).is_some() {
        cur.eat(&TokenKind::KwOuter);
        JoinKind::Full
    } else {
        JoinKind::Inner
    }
}

fn parse_join(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Join> {
    if cur.eat(&TokenKind::KwCross).is_some() {
        cur.expect(&TokenKind::KwJoin, "JOIN")?;
        let table = cx.parse::<TableRef>(cur)?;
        return Ok(Join::Cross { table });
    }

    if cur.eat(&TokenKind::KwNatural).is_some() {
        let kind = eat_join_kind(cur);
        cur.expect(&TokenKind::KwJoin, "JOIN")?;
        let table = cx.parse::<TableRef>(cur)?;
        return Ok(Join::Natural { kind, table });
    }

    let kind = eat_join_kind(cur);
    cur.expect(&TokenKind::KwJoin, "JOIN")?;
    let table = cx.parse::<TableRef>(cur)?;

    if cur.eat(&TokenKind::KwUsing).is_some() {
        cur.expect(&TokenKind::LeftParen, "'('")?;
        let mut columns = vec![parse_ident(cur)?.0];
        while cur.eat(&TokenKind::Comma).is_some() {
            columns.push(parse_ident(cur)?.0);
        }
        cur.expect(&TokenKind::RightParen, "')'")?;
        return Ok(Join::Using {
            kind,
            table,
            columns,
        });
    }

    cur.expect(&TokenKind::KwOn, "ON or USING")?;
    let predicate = parse_on_predicate(cx, cur)?;
    Ok(Join::On {
        kind,
        table,
        predicate,
    })
}

fn is_on_boundary(kind: &TokenKind) -> bool {
    kind.is_set_operator()
        || matches!(
            kind,
            TokenKind::KwJoin
                | TokenKind::KwInner
                | TokenKind::KwLeft
                | TokenKind::KwRight
                | TokenKind::KwFull
                | TokenKind::KwCross
                | TokenKind::KwNatural
                | TokenKind::Comma
                | TokenKind::KwWhere
                | TokenKind::KwGroup
                | TokenKind::KwHaving
                | TokenKind::KwWindow
                | TokenKind::KwOrder
                | TokenKind::KwLimit
                | TokenKind::KwOffset
                | TokenKind::KwFor
                | TokenKind::Semicolon
        )
}

fn parse_on_predicate(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Predicate> {
    let idx = cur.find(is_on_boundary);
    let mut sub = cur.carve_to(idx);
    let pred = cx.parse::<Predicate>(&mut sub)?;
    expect_exhausted(&sub)?;
    Ok(pred)
}

impl GrammarRule for TableRef {
    const KIND: RuleKind = RuleKind::TableRef;

    fn parse(cx: &ParseContext<'_>, cur: &mut Cursor<'_>) -> ParseResult<Self> {
        let lk = cx.lookups();

        let mut lateral = false;
        let mut p = cur.probe();
        if lk.lateral(cur, &mut p) {
            let sp = cur.advance()?.span;
            cx.require(Feature::Lateral, "LATERAL", sp.start)?;
            lateral = true;
        }

        let mut p = cur.probe();
        if lk.values_clause(cur, &mut p) {
            if lateral {
                return Err(Diagnostics::syntax(
                    "LATERAL cannot precede VALUES",
                    cur.offset(),
                ));
            }
            let (rows, _) = parse_values_rows(cx, cur)?;
            let alias = parse_table_alias(cx, cur)?;
            return Ok(TableRef::Values { rows, alias });
        }

        match cur.peek().kind {
            TokenKind::LeftParen => {
                let mut p = cur.probe();
                if !lk.subquery(cur, &mut p) {
                    return Err(Diagnostics::expected(
                        "a subquery",
                        cur.peek().kind.describe(),
                        cur.offset(),
                    ));
                }
                let (query, _) = parse_parenthesized_query(cx, cur)?;
                let alias = parse_table_alias(cx, cur)?;
                Ok(TableRef::Subquery {
                    query: Box::new(query),
                    lateral,
                    alias,
                })
            }
            TokenKind::KwOnly => {
                let sp = cur.advance()?.span;
                cx.require(Feature::TableInheritance, "ONLY", sp.start)?;
                parse_base_table(cx, cur, true)
            }
            TokenKind::Id(_) | TokenKind::QuotedId(_) => {
                let mut p = cur.probe();
                if lk.function_table(cur, &mut p) {
                    return parse_function_table(cx, cur, lateral);
                }
                if lateral {
                    return Err(Diagnostics::expected(
                        "a subquery or function call after LATERAL",
                        cur.peek().kind.describe(),
                        cur.offset(),
                    ));
                }
                parse_base_table(cx, cur, false)
            }
            ref other => Err(Diagnostics::expected(
                "a table reference",
                other.describe(),
                cur.offset(),
            )),
        }
    }
}

fn parse_base_table(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
    only: bool,
) -> ParseResult<TableRef> {
    let (name, _) = parse_qualified_name(cur)?;
    let inherit = if let Some(sp) = cur.eat(&TokenKind::Star) {
        cx.require(Feature::TableInheritance, "the descendant-table marker", sp.start)?;
        true
    } else {
        false
    };
    let alias = parse_table_alias(cx, cur)?;
    Ok(TableRef::Table {
        name,
        only,
        inherit,
        alias,
    })
}

fn parse_function_table(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
    lateral: bool,
) -> ParseResult<TableRef> {
    let (name, sp) = parse_qualified_name(cur)?;
    cx.require(Feature::FunctionTables, "a function in FROM", sp.start)?;
    cur.expect(&TokenKind::LeftParen, "'('")?;
    let args = if cur.check(&TokenKind::RightParen) {
        Vec::new()
    } else {
        parse_expr_list(cx, cur)?
    };
    cur.expect(&TokenKind::RightParen, "')'")?;
    let alias = parse_table_alias(cx, cur)?;
    Ok(TableRef::Function {
        name,
        args,
        lateral,
        alias,
    })
}

/// `AS name (cols)`, `name (cols)`, or nothing. Keywords never alias.
fn parse_table_alias(
    cx: &ParseContext<'_>,
    cur: &mut Cursor<'_>,
) -> ParseResult<Option<TableAlias>> {
    let mut p = cur.probe();
    if !cx.lookups().alias_follows(cur, &mut p) {
        return Ok(None);
    }
    cur.eat(&TokenKind::KwAs);
    let (name, _) = parse_ident(cur)?;

    let mut columns = Vec::new();
    if cur.eat(&TokenKind::LeftParen).is_some() {
        columns.push(parse_ident(cur)?.0);
        while cur.eat(&TokenKind::Comma).is_some() {
            columns.push(parse_ident(cur)?.0);
        }
        cur.expect(&TokenKind::RightParen, "')'")?;
    }
    Ok(Some(TableAlias { name, columns }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlfront_ast::{Query, SelectQuery};

    use crate::diag::DiagnosticKind;
    use crate::dialect::Dialect;
    use crate::lexer::Lexer;

    fn parse_with(sql: &str, dialect: &Dialect) -> ParseResult<Query> {
        let tokens = Lexer::tokenize(sql, dialect.quote_style());
        let cx = ParseContext::new(dialect);
        let mut cur = Cursor::new(&tokens);
        let q = cx.parse::<Query>(&mut cur)?;
        expect_exhausted(&cur)?;
        Ok(q)
    }

    fn from_items(sql: &str) -> Vec<FromItem> {
        match parse_with(sql, &Dialect::postgres()).unwrap() {
            Query::Select(s) => s.from,
            other => panic!("expected select, got {other:?}"),
        }
    }

    fn single(sql: &str) -> FromItem {
        let mut items = from_items(sql);
        assert_eq!(items.len(), 1);
        items.pop().unwrap()
    }

    #[test]
    fn base_table_with_alias_columns() {
        let item = single("SELECT * FROM schema1.t AS x (a, b)");
        match item.source {
            TableRef::Table { name, alias, .. } => {
                assert_eq!(name.schema.as_deref(), Some("schema1"));
                assert_eq!(name.name, "t");
                let alias = alias.unwrap();
                assert_eq!(alias.name, "x");
                assert_eq!(alias.columns, vec!["a".to_owned(), "b".to_owned()]);
            }
            other => panic!("expected base table, got {other:?}"),
        }
    }

    #[test]
    fn bare_identifier_alias() {
        let item = single("SELECT * FROM t x");
        match item.source {
            TableRef::Table { alias, .. } => assert_eq!(alias.unwrap().name, "x"),
            other => panic!("expected base table, got {other:?}"),
        }
    }

    #[test]
    fn comma_list_is_separate_from_items() {
        let items = from_items("SELECT * FROM a, b, c");
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.joins.is_empty()));
    }

    #[test]
    fn only_and_inheritance_marker_gated() {
        let item = single("SELECT * FROM ONLY t");
        assert!(matches!(
            item.source,
            TableRef::Table { only: true, inherit: false, .. }
        ));

        let item = single("SELECT * FROM t *");
        assert!(matches!(
            item.source,
            TableRef::Table { only: false, inherit: true, .. }
        ));

        let err = parse_with("SELECT * FROM ONLY t", &Dialect::ansi()).unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
    }

    #[test]
    fn subquery_source() {
        let item = single("SELECT * FROM (SELECT a FROM t) s");
        match item.source {
            TableRef::Subquery { query, lateral, alias } => {
                assert!(!lateral);
                assert_eq!(alias.unwrap().name, "s");
                assert!(matches!(*query, Query::Select(_)));
            }
            other => panic!("expected subquery, got {other:?}"),
        }
    }

    #[test]
    fn lateral_subquery_gated() {
        let items = from_items("SELECT * FROM t, LATERAL (SELECT * FROM u WHERE u.id = t.id) l");
        assert_eq!(items.len(), 2);
        assert!(matches!(
            items[1].source,
            TableRef::Subquery { lateral: true, .. }
        ));

        let err = parse_with("SELECT * FROM LATERAL (SELECT 1) l", &Dialect::ansi())
            .unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
    }

    #[test]
    fn function_table_gated() {
        let item = single("SELECT * FROM generate_series(1, 10) g (n)");
        match item.source {
            TableRef::Function { name, args, alias, .. } => {
                assert_eq!(name.name, "generate_series");
                assert_eq!(args.len(), 2);
                assert_eq!(alias.unwrap().columns, vec!["n".to_owned()]);
            }
            other => panic!("expected function table, got {other:?}"),
        }

        let err =
            parse_with("SELECT * FROM generate_series(1, 10)", &Dialect::ansi()).unwrap_err();
        assert!(matches!(
            err.first().kind,
            DiagnosticKind::Unsupported { .. }
        ));
    }

    #[test]
    fn values_in_from() {
        let item = single("SELECT * FROM (VALUES (1, 'a'), (2, 'b')) v (id, label)");
        // A parenthesized VALUES is a subquery source.
        match item.source {
            TableRef::Subquery { query, .. } => {
                assert!(matches!(*query, Query::Values(ref rows, _) if rows.len() == 2));
            }
            other => panic!("expected subquery, got {other:?}"),
        }

        let item = single("SELECT * FROM VALUES (1), (2) v");
        assert!(matches!(
            item.source,
            TableRef::Values { ref rows, .. } if rows.len() == 2
        ));
    }

    #[test]
    fn cross_join() {
        let item = single("SELECT * FROM a CROSS JOIN b");
        assert_eq!(item.joins.len(), 1);
        assert!(matches!(item.joins[0], Join::Cross { .. }));
    }

    #[test]
    fn natural_left_join() {
        let item = single("SELECT * FROM a NATURAL LEFT OUTER JOIN b");
        assert!(matches!(
            item.joins[0],
            Join::Natural { kind: JoinKind::Left, .. }
        ));
    }

    #[test]
    fn join_using() {
        let item = single("SELECT * FROM a JOIN b USING (id, ts)");
        match &item.joins[0] {
            Join::Using { kind, columns, .. } => {
                assert_eq!(*kind, JoinKind::Inner);
                assert_eq!(columns, &["id".to_owned(), "ts".to_owned()]);
            }
            other => panic!("expected using join, got {other:?}"),
        }
    }

    #[test]
    fn join_on_predicate() {
        let item = single("SELECT * FROM a LEFT JOIN b ON a.id = b.id");
        match &item.joins[0] {
            Join::On { kind, predicate, .. } => {
                assert_eq!(*kind, JoinKind::Left);
                assert!(matches!(predicate, Predicate::Comparison { .. }));
            }
            other => panic!("expected on join, got {other:?}"),
        }
    }

    #[test]
    fn on_disjunction_stops_at_next_join() {
        let item = single(
            "SELECT * FROM a \
             JOIN b ON a.x = b.x OR a.y = b.y \
             JOIN c ON b.z = c.z",
        );
        assert_eq!(item.joins.len(), 2);
        assert!(matches!(
            item.joins[0],
            Join::On { predicate: Predicate::Or(_, _, _), .. }
        ));
        assert!(matches!(
            item.joins[1],
            Join::On { predicate: Predicate::Comparison { .. }, .. }
        ));
    }

    #[test]
    fn on_predicate_stops_at_where() {
        let q = parse_with(
            "SELECT * FROM a JOIN b ON a.id = b.id OR b.id IS NULL WHERE a.live",
            &Dialect::postgres(),
        )
        .unwrap();
        let s: &SelectQuery = match &q {
            Query::Select(s) => s,
            other => panic!("expected select, got {other:?}"),
        };
        assert_eq!(s.from.len(), 1);
        assert!(s.where_clause.is_some());
        assert!(matches!(
            s.from[0].joins[0],
            Join::On { predicate: Predicate::Or(_, _, _), .. }
        ));
    }

    #[test]
    fn full_outer_join() {
        let item = single("SELECT * FROM a FULL OUTER JOIN b ON a.k = b.k");
        assert!(matches!(
            item.joins[0],
            Join::On { kind: JoinKind::Full, .. }
        ));
    }
}
