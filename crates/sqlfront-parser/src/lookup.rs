// Bounded-lookahead lookup predicates.
//
// A lookup answers one question about the token stream: "does a construct of
// kind X start here?" Lookups read through a `Probe` and never move the
// cursor, never consume tokens, and never produce diagnostics. On success a
// lookup advances its probe past the prefix it recognized, so chained
// lookups compose; callers that only want the boolean fork a probe and drop
// it. All predicates are provided methods, so a dialect overrides only the
// ones where its grammar diverges.

use crate::cursor::{Cursor, Probe};
use crate::dialect::{OpClass, OperatorPolicy};
use crate::token::TokenKind;

/// True for the literal token kinds a typed literal accepts as its value.
fn is_string_like(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::String(_) | TokenKind::EscapeString(_) | TokenKind::DollarString(_)
    )
}

/// True for tokens that open an identifier (plain or quoted).
fn is_ident(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Id(_) | TokenKind::QuotedId(_))
}

/// The dialect's grammar-disambiguation predicates.
pub trait Lookups: Send + Sync {
    // -- queries ------------------------------------------------------------

    /// A query term starts here (`SELECT`, `VALUES`, `WITH`).
    fn query_start(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if cur.probe_kind(*p).is_query_start() {
            p.bump();
            true
        } else {
            false
        }
    }

    /// A parenthesized subquery starts here: `(` layers, then a query head.
    fn subquery(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) != TokenKind::LeftParen {
            return false;
        }
        let mut fork = *p;
        while *cur.probe_kind(fork) == TokenKind::LeftParen {
            fork.bump();
        }
        if self.query_start(cur, &mut fork) {
            p.bump();
            true
        } else {
            false
        }
    }

    /// A set-operation chain starts here. Skips at most one wrapping paren
    /// layer before scanning for a depth-zero set operator; the caller's own
    /// terminator search must start from the un-skipped position. A skipped
    /// paren that closes before any set operator belonged to the first term,
    /// not the chain, so the scan restarts from the un-skipped position.
    fn composite_query(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let start = *p;
        let mut fork = *p;
        let mut skipped_wrapper = false;
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            fork.bump();
            skipped_wrapper = true;
        }
        let mut depth: i32 = 0;
        loop {
            match cur.probe_kind(fork) {
                TokenKind::Eof => return false,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::KwCase => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::KwEnd => {
                    depth -= 1;
                    if depth < 0 {
                        if !skipped_wrapper {
                            return false;
                        }
                        skipped_wrapper = false;
                        fork = start;
                        depth = 0;
                        continue;
                    }
                }
                kind if depth == 0 && kind.is_set_operator() => {
                    *p = fork;
                    return true;
                }
                _ => {}
            }
            fork.bump();
        }
    }

    /// `WITH [RECURSIVE]` starts here.
    fn with_query(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::KwWith {
            p.bump();
            true
        } else {
            false
        }
    }

    /// `VALUES (` starts here.
    fn values_clause(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) != TokenKind::KwValues {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    // -- expressions --------------------------------------------------------

    /// An (optionally qualified) function call starts here: `name (` with no
    /// intervening tokens.
    fn function_call(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if !is_ident(cur.probe_kind(fork)) {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::Dot {
            fork.bump();
            if !is_ident(cur.probe_kind(fork)) {
                return false;
            }
            fork.bump();
        }
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// A typed literal starts here: a head identifier (`date`, `time`,
    /// `timestamp`, `interval`) directly followed by a string literal.
    /// Anything else keeps those words as plain column references.
    fn typed_literal(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let TokenKind::Id(head) = cur.probe_kind(*p) else {
            return false;
        };
        let is_head = matches!(
            head.to_ascii_lowercase().as_str(),
            "date" | "time" | "timestamp" | "interval"
        );
        if !is_head {
            return false;
        }
        let mut fork = *p;
        fork.bump();
        if is_string_like(cur.probe_kind(fork)) {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// A named parameter starts here. A `:name` token directly followed by
    /// `]` is the upper bound of an array slice, not a parameter.
    fn named_parameter(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if !matches!(cur.probe_kind(*p), TokenKind::ColonParam(_)) {
            return false;
        }
        let mut fork = *p;
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::RightBracket {
            return false;
        }
        *p = fork;
        true
    }

    /// Any parameter marker starts here.
    fn parameter(&self, cur: &Cursor, p: &mut Probe) -> bool {
        match cur.probe_kind(*p) {
            TokenKind::Question | TokenKind::DollarNum(_) => {
                p.bump();
                true
            }
            TokenKind::ColonParam(_) => self.named_parameter(cur, p),
            _ => false,
        }
    }

    /// A row constructor starts here: `ROW (`, or a parenthesized list with
    /// a depth-one comma that is not a subquery.
    fn row_constructor(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) == TokenKind::KwRow {
            fork.bump();
            if *cur.probe_kind(fork) == TokenKind::LeftParen {
                *p = fork;
                return true;
            }
            return false;
        }
        if *cur.probe_kind(fork) != TokenKind::LeftParen {
            return false;
        }
        if self.subquery(cur, &mut { fork }) {
            return false;
        }
        let mut depth: i32 = 0;
        loop {
            match cur.probe_kind(fork) {
                TokenKind::Eof => return false,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Comma if depth == 1 => {
                    p.bump();
                    return true;
                }
                _ => {}
            }
            fork.bump();
        }
    }

    /// `CASE` starts here.
    fn case_expr(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::KwCase {
            p.bump();
            true
        } else {
            false
        }
    }

    /// `CAST (` starts here.
    fn cast_expr(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) != TokenKind::KwCast {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// A literal token starts here.
    fn literal(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let hit = matches!(
            cur.probe_kind(*p),
            TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::EscapeString(_)
                | TokenKind::BitString(_)
                | TokenKind::HexString(_)
                | TokenKind::DollarString(_)
                | TokenKind::KwNull
                | TokenKind::KwTrue
                | TokenKind::KwFalse
        );
        if hit {
            p.bump();
        }
        hit
    }

    /// A column reference starts here (and is not a function call).
    fn column_ref(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if !is_ident(cur.probe_kind(*p)) {
            return false;
        }
        if self.function_call(cur, &mut { *p }) {
            return false;
        }
        p.bump();
        true
    }

    // -- predicate operators ------------------------------------------------

    /// `[NOT] BETWEEN` at the probe.
    fn between(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) == TokenKind::KwBetween {
            fork.bump();
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `[NOT] IN (` at the probe.
    fn in_list(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) != TokenKind::KwIn {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `[NOT] LIKE` at the probe.
    fn like(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) == TokenKind::KwLike {
            fork.bump();
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `IS [NOT] NULL` at the probe.
    fn is_null(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) != TokenKind::KwIs {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) == TokenKind::KwNull {
            fork.bump();
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `IS [NOT] DISTINCT FROM` at the probe.
    fn is_distinct_from(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) != TokenKind::KwIs {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) != TokenKind::KwDistinct {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::KwFrom {
            fork.bump();
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `[NOT] EXISTS (` at the probe.
    fn exists(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) == TokenKind::KwNot {
            fork.bump();
        }
        if *cur.probe_kind(fork) != TokenKind::KwExists {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// `ANY` / `SOME` / `ALL (` at the probe (after a comparison operator).
    fn any_all(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if !matches!(
            cur.probe_kind(fork),
            TokenKind::KwAny | TokenKind::KwSome | TokenKind::KwAll
        ) {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::LeftParen {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// A comparison-class operator at the probe.
    fn comparison(&self, cur: &Cursor, p: &mut Probe, ops: &dyn OperatorPolicy) -> bool {
        if matches!(
            ops.classify(cur.probe_kind(*p)),
            Some(OpClass::Comparison(_))
        ) {
            p.bump();
            true
        } else {
            false
        }
    }

    /// A regex-class operator at the probe.
    fn regex_match(&self, cur: &Cursor, p: &mut Probe, ops: &dyn OperatorPolicy) -> bool {
        if matches!(cur.probe_kind(*p), k if matches!(ops.classify(k), Some(OpClass::Regex { .. })))
        {
            p.bump();
            true
        } else {
            false
        }
    }

    /// `NOT` at the probe, negating a whole predicate (not the `NOT` of
    /// `NOT BETWEEN` / `NOT IN` / `NOT LIKE`, which the operator lookups
    /// own).
    fn not_predicate(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::KwNot {
            p.bump();
            true
        } else {
            false
        }
    }

    /// Advance the probe over exactly one primary predicate: balanced
    /// nesting is skipped whole, and each `BETWEEN` consumes its own `AND`.
    /// Stops before a depth-zero conjunction keyword or the bound. Returns
    /// false when nothing was consumed.
    fn primary_predicate(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let start = *p;
        let mut depth: i32 = 0;
        let mut pending_between = 0u32;
        loop {
            match cur.probe_kind(*p) {
                TokenKind::Eof => break,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::KwCase => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::KwEnd => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::KwBetween if depth == 0 => pending_between += 1,
                TokenKind::KwAnd if depth == 0 => {
                    if pending_between == 0 {
                        break;
                    }
                    pending_between -= 1;
                }
                TokenKind::KwOr if depth == 0 => break,
                _ => {}
            }
            p.bump();
        }
        *p != start
    }

    /// An `AND` conjunction chain starts here: one primary predicate, then
    /// `AND` at depth zero. `BETWEEN low AND high` alone does not qualify.
    fn and_chain(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if !self.primary_predicate(cur, &mut fork) {
            return false;
        }
        if *cur.probe_kind(fork) == TokenKind::KwAnd {
            *p = fork;
            true
        } else {
            false
        }
    }

    /// An `OR` disjunction chain starts here: primaries joined by `AND`
    /// eventually followed by a depth-zero `OR`.
    fn or_chain(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        loop {
            if !self.primary_predicate(cur, &mut fork) {
                return false;
            }
            match cur.probe_kind(fork) {
                TokenKind::KwOr => {
                    *p = fork;
                    return true;
                }
                TokenKind::KwAnd => fork.bump(),
                _ => return false,
            }
        }
    }

    // -- table refs & joins -------------------------------------------------

    /// Any join keyword at the probe.
    fn join(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let hit = matches!(
            cur.probe_kind(*p),
            TokenKind::KwJoin
                | TokenKind::KwInner
                | TokenKind::KwLeft
                | TokenKind::KwRight
                | TokenKind::KwFull
                | TokenKind::KwCross
                | TokenKind::KwNatural
        );
        if hit {
            p.bump();
        }
        hit
    }

    /// `LATERAL` at the probe.
    fn lateral(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::KwLateral {
            p.bump();
            true
        } else {
            false
        }
    }

    /// A set-returning function in FROM position: `name (` possibly
    /// schema-qualified.
    fn function_table(&self, cur: &Cursor, p: &mut Probe) -> bool {
        self.function_call(cur, p)
    }

    /// An alias follows: `AS`, or a plain identifier.
    fn alias_follows(&self, cur: &Cursor, p: &mut Probe) -> bool {
        match cur.probe_kind(*p) {
            TokenKind::KwAs => {
                p.bump();
                true
            }
            k if is_ident(k) => {
                p.bump();
                true
            }
            _ => false,
        }
    }

    // -- select-list & clause heads ----------------------------------------

    /// `*` at the probe.
    fn star_item(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::Star {
            p.bump();
            true
        } else {
            false
        }
    }

    /// `table.*` at the probe.
    fn table_star(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if !is_ident(cur.probe_kind(fork)) {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) != TokenKind::Dot {
            return false;
        }
        fork.bump();
        if *cur.probe_kind(fork) == TokenKind::Star {
            fork.bump();
            *p = fork;
            true
        } else {
            false
        }
    }

    /// A grouping element head (`GROUPING SETS`, `ROLLUP (`, `CUBE (`).
    fn grouping_element(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        match cur.probe_kind(fork) {
            TokenKind::KwGrouping => {
                fork.bump();
                if *cur.probe_kind(fork) == TokenKind::KwSets {
                    fork.bump();
                    *p = fork;
                    true
                } else {
                    false
                }
            }
            TokenKind::KwRollup | TokenKind::KwCube => {
                fork.bump();
                if *cur.probe_kind(fork) == TokenKind::LeftParen {
                    *p = fork;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// A bare integer usable as a 1-based ordinal key.
    fn ordinal_key(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if matches!(cur.probe_kind(*p), TokenKind::Integer(_)) {
            let mut fork = *p;
            fork.bump();
            // A lone integer only; `1 + 2` is an expression key.
            let next_is_continuation = !matches!(
                cur.probe_kind(fork),
                TokenKind::Comma
                    | TokenKind::Eof
                    | TokenKind::KwAsc
                    | TokenKind::KwDesc
                    | TokenKind::KwNulls
                    | TokenKind::KwCollate
                    | TokenKind::KwRows
                    | TokenKind::KwRange
                    | TokenKind::KwGroups
                    | TokenKind::RightParen
                    | TokenKind::KwLimit
                    | TokenKind::KwOffset
                    | TokenKind::KwHaving
                    | TokenKind::KwOrder
                    | TokenKind::KwWindow
                    | TokenKind::KwFor
                    | TokenKind::Semicolon
            );
            if next_is_continuation {
                return false;
            }
            p.bump();
            true
        } else {
            false
        }
    }

    // -- windows & postfix --------------------------------------------------

    /// An inline window specification opens here: `(` then `)`, a window
    /// clause keyword, or a base-window name.
    fn window_spec_start(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        if *cur.probe_kind(fork) != TokenKind::LeftParen {
            return false;
        }
        fork.bump();
        let hit = matches!(
            cur.probe_kind(fork),
            TokenKind::RightParen
                | TokenKind::KwPartition
                | TokenKind::KwOrder
                | TokenKind::KwRange
                | TokenKind::KwRows
                | TokenKind::KwGroups
        ) || is_ident(cur.probe_kind(fork));
        if hit {
            p.bump();
        }
        hit
    }

    /// A frame clause starts here (`RANGE`, `ROWS`, `GROUPS`).
    fn frame_spec_start(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let hit = matches!(
            cur.probe_kind(*p),
            TokenKind::KwRange | TokenKind::KwRows | TokenKind::KwGroups
        );
        if hit {
            p.bump();
        }
        hit
    }

    /// `COLLATE` at the probe.
    fn collate(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::KwCollate {
            p.bump();
            true
        } else {
            false
        }
    }

    /// `AT TIME ZONE` at the probe.
    fn at_time_zone(&self, cur: &Cursor, p: &mut Probe) -> bool {
        let mut fork = *p;
        for kw in [TokenKind::KwAt, TokenKind::KwTime, TokenKind::KwZone] {
            if *cur.probe_kind(fork) != kw {
                return false;
            }
            fork.bump();
        }
        *p = fork;
        true
    }

    /// `[` opening a subscript or slice.
    fn subscript(&self, cur: &Cursor, p: &mut Probe) -> bool {
        if *cur.probe_kind(*p) == TokenKind::LeftBracket {
            p.bump();
            true
        } else {
            false
        }
    }
}

/// The stock lookup set shared by the built-in dialects.
#[derive(Debug, Default)]
pub struct BaselineLookups;

impl Lookups for BaselineLookups {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{QuoteStyle, StandardOperators};
    use crate::lexer::Lexer;
    use crate::token::Token;

    fn toks(sql: &str) -> Vec<Token> {
        Lexer::tokenize(sql, QuoteStyle::ANSI)
    }

    fn check(sql: &str, f: impl Fn(&BaselineLookups, &Cursor, &mut Probe) -> bool) -> bool {
        let tokens = toks(sql);
        let cur = Cursor::new(&tokens);
        let mut p = cur.probe();
        f(&BaselineLookups, &cur, &mut p)
    }

    #[test]
    fn subquery_skips_paren_layers() {
        assert!(check("(SELECT 1)", |l, c, p| l.subquery(c, p)));
        assert!(check("((SELECT 1))", |l, c, p| l.subquery(c, p)));
        assert!(!check("(1 + 2)", |l, c, p| l.subquery(c, p)));
        assert!(!check("SELECT 1", |l, c, p| l.subquery(c, p)));
    }

    #[test]
    fn composite_skips_one_wrapping_paren() {
        assert!(check("SELECT 1 UNION SELECT 2", |l, c, p| {
            l.composite_query(c, p)
        }));
        assert!(check("(SELECT 1 UNION SELECT 2)", |l, c, p| {
            l.composite_query(c, p)
        }));
        // The set operator inside a nested subquery is shielded.
        assert!(!check("SELECT 1 FROM (SELECT 2 UNION SELECT 3) t", |l, c, p| {
            let found = l.composite_query(c, p);
            found
        }));
        assert!(!check("SELECT 1", |l, c, p| l.composite_query(c, p)));
    }

    #[test]
    fn composite_with_parenthesized_first_term() {
        // The leading paren closes before the operator, so it is the first
        // term's own paren and the chain is still detected.
        assert!(check("(SELECT 1) UNION SELECT 2", |l, c, p| {
            l.composite_query(c, p)
        }));
        assert!(check("(SELECT 1) INTERSECT (SELECT 2)", |l, c, p| {
            l.composite_query(c, p)
        }));
        assert!(!check("(SELECT 1) t", |l, c, p| l.composite_query(c, p)));
        assert!(!check("((SELECT 1 UNION SELECT 2))", |l, c, p| {
            l.composite_query(c, p)
        }));
    }

    #[test]
    fn typed_literal_needs_string_follower() {
        assert!(check("date '2024-01-01'", |l, c, p| l.typed_literal(c, p)));
        assert!(check("INTERVAL '1 day'", |l, c, p| l.typed_literal(c, p)));
        assert!(!check("date + 1", |l, c, p| l.typed_literal(c, p)));
        assert!(!check("created_at", |l, c, p| l.typed_literal(c, p)));
    }

    #[test]
    fn named_parameter_excludes_slice_colon() {
        assert!(check(":name", |l, c, p| l.named_parameter(c, p)));
        // In `a[1:name]` the cursor would sit on the `:name` token.
        let tokens = toks("a[1:name]");
        let cur = Cursor::new(&tokens);
        let mut p = cur.probe();
        p.bump(); // a
        p.bump(); // [
        p.bump(); // 1
        assert!(matches!(cur.probe_kind(p), TokenKind::ColonParam(_)));
        let mut q = p;
        assert!(!BaselineLookups.named_parameter(&cur, &mut q));
    }

    #[test]
    fn and_chain_skips_between_and() {
        assert!(check("a = 1 AND b = 2", |l, c, p| l.and_chain(c, p)));
        assert!(!check("x BETWEEN 1 AND 2", |l, c, p| l.and_chain(c, p)));
        assert!(check("x BETWEEN 1 AND 2 AND y = 3", |l, c, p| {
            l.and_chain(c, p)
        }));
    }

    #[test]
    fn or_chain_sees_past_and() {
        assert!(check("a = 1 OR b = 2", |l, c, p| l.or_chain(c, p)));
        assert!(check("a = 1 AND b = 2 OR c = 3", |l, c, p| l.or_chain(c, p)));
        assert!(!check("a = 1 AND b = 2", |l, c, p| l.or_chain(c, p)));
        assert!(!check("(a = 1 OR b = 2)", |l, c, p| l.or_chain(c, p)));
    }

    #[test]
    fn function_call_requires_adjacent_paren() {
        assert!(check("count(x)", |l, c, p| l.function_call(c, p)));
        assert!(check("pg_catalog.now()", |l, c, p| l.function_call(c, p)));
        assert!(!check("count", |l, c, p| l.function_call(c, p)));
    }

    #[test]
    fn row_constructor_forms() {
        assert!(check("(1, 2)", |l, c, p| l.row_constructor(c, p)));
        assert!(check("ROW(1)", |l, c, p| l.row_constructor(c, p)));
        assert!(!check("(1 + 2)", |l, c, p| l.row_constructor(c, p)));
        assert!(!check("(SELECT 1, 2)", |l, c, p| l.row_constructor(c, p)));
    }

    #[test]
    fn comparison_uses_operator_policy() {
        let tokens = toks("<=");
        let cur = Cursor::new(&tokens);
        let mut p = cur.probe();
        assert!(BaselineLookups.comparison(&cur, &mut p, &StandardOperators));
    }

    #[test]
    fn lookups_never_move_the_cursor() {
        let tokens = toks("a = 1 OR b = 2");
        let cur = Cursor::new(&tokens);
        let mut p = cur.probe();
        let _ = BaselineLookups.or_chain(&cur, &mut p);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn ordinal_key_is_a_lone_integer() {
        assert!(check("2", |l, c, p| l.ordinal_key(c, p)));
        assert!(!check("2 + 1", |l, c, p| l.ordinal_key(c, p)));
    }
}
