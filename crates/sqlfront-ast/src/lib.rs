//! SQL abstract syntax tree node types for sqlfront.
//!
//! This crate defines the sealed variant families the grammar engine
//! populates: expressions, predicates, queries, table references, joins, and
//! their supporting value objects. Every expression and predicate node
//! carries a [`Span`] so diagnostics and downstream tools can point back at
//! the source. The AST is a pure tree: nodes own their children and hold no
//! back-references.

use std::fmt;

// ---------------------------------------------------------------------------
// Span — source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the original SQL source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive) byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-length span at position 0, used as a placeholder.
    pub const ZERO: Self = Self { start: 0, end: 0 };

    /// Merge two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Qualified names
// ---------------------------------------------------------------------------

/// A possibly-schema-qualified name like `public.users` or just `users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Optional schema name.
    pub schema: Option<String>,
    /// The object name.
    pub name: String,
}

impl QualifiedName {
    /// Create an unqualified name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Create a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref s) = self.schema {
            write!(f, "{s}.{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

// ---------------------------------------------------------------------------
// Column references
// ---------------------------------------------------------------------------

/// A reference to a column, possibly qualified with a table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Optional table (or alias) qualifier.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Create an unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Create a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// A literal value in SQL source.
///
/// Integral lexemes become [`Literal::Integer`]; lexemes with a decimal point
/// or exponent become [`Literal::Float`]. String sub-kinds are classified by
/// the lexer and preserved distinctly.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric integer literal (64-bit).
    Integer(i64),
    /// Numeric float literal.
    Float(f64),
    /// Plain string literal (single-quoted).
    String(String),
    /// Bit-string literal (`B'0101'`), digits kept verbatim.
    BitString(String),
    /// Hex-string literal (`X'CAFE'`), digits kept verbatim.
    HexString(String),
    /// Dollar-quoted string literal (`$tag$...$tag$`).
    DollarString(String),
    /// The keyword `NULL`.
    Null,
    /// The keyword `TRUE`.
    True,
    /// The keyword `FALSE`.
    False,
}

/// The head keyword of a typed literal like `DATE '2024-01-01'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedLiteralKind {
    Date,
    Time,
    Timestamp,
    Interval,
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Exponentiation (`^`). Left-associative in this engine.
    Power,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "^",
        })
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// A bind-parameter marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// `?` anonymous positional.
    Anonymous,
    /// `:name` colon-prefixed named.
    Named(String),
    /// `$n` ordinal positional.
    Ordinal(u32),
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression node.
///
/// Every variant carries a [`Span`]. Boolean-valued composition (AND, OR,
/// NOT, comparisons) lives in the separate [`Predicate`] family.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal(Literal, Span),

    /// A column reference (possibly table-qualified).
    Column(ColumnRef, Span),

    /// A function call: `name(args)` or `name(*)`, optionally windowed
    /// with `OVER`.
    Function {
        name: QualifiedName,
        args: FunctionArgs,
        distinct: bool,
        over: Option<Box<WindowSpec>>,
        span: Span,
    },

    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    ///
    /// Invariant: `whens` is non-empty.
    Case {
        operand: Option<Box<Self>>,
        whens: Vec<CaseWhen>,
        else_expr: Option<Box<Self>>,
        span: Span,
    },

    /// `CAST(expr AS type)`.
    Cast {
        expr: Box<Self>,
        type_name: TypeName,
        span: Span,
    },

    /// A row constructor: `(a, b, c)` or `ROW(a, b, c)`.
    Row(Vec<Self>, Span),

    /// A list of row constructors: `((1, 2), (3, 4))`.
    RowList(Vec<Vec<Self>>, Span),

    /// A built-in arithmetic operation: `left op right`.
    Arithmetic {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
        span: Span,
    },

    /// Unary negation: `-expr`.
    Neg(Box<Self>, Span),

    /// A dialect-specific binary operator, kept as its lexeme.
    BinaryOp {
        op: String,
        left: Box<Self>,
        right: Box<Self>,
        span: Span,
    },

    /// A dialect-specific unary operator, kept as its lexeme.
    UnaryOp {
        op: String,
        expr: Box<Self>,
        span: Span,
    },

    /// A bind-parameter marker.
    Parameter(Parameter, Span),

    /// A scalar subquery: `(SELECT ...)`.
    Subquery(Box<Query>, Span),

    /// `expr COLLATE collation`.
    Collate {
        expr: Box<Self>,
        collation: String,
        span: Span,
    },

    /// `expr AT TIME ZONE zone`.
    AtTimeZone {
        expr: Box<Self>,
        zone: Box<Self>,
        span: Span,
    },

    /// Array subscript `expr[index]` or slice `expr[lower:upper]`.
    Subscript {
        expr: Box<Self>,
        lower: Option<Box<Self>>,
        upper: Option<Box<Self>>,
        slice: bool,
        span: Span,
    },

    /// A typed literal: `DATE '2024-01-01'`, `INTERVAL '1 day'`, etc.
    TypedLiteral {
        kind: TypedLiteralKind,
        value: String,
        span: Span,
    },
}

/// One `WHEN ... THEN result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    pub condition: CaseCondition,
    pub result: Expr,
}

/// The WHEN side of a CASE arm.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseCondition {
    /// A value compared against the CASE operand.
    Value(Expr),
    /// A searched-CASE predicate.
    Search(Predicate),
}

/// Arguments to a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArgs {
    /// `f(*)`.
    Star,
    /// `f(a, b, ...)` (possibly empty).
    List(Vec<Expr>),
}

impl Expr {
    /// The source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(_, span)
            | Self::Column(_, span)
            | Self::Row(_, span)
            | Self::RowList(_, span)
            | Self::Neg(_, span)
            | Self::Parameter(_, span)
            | Self::Subquery(_, span)
            | Self::Function { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::Arithmetic { span, .. }
            | Self::BinaryOp { span, .. }
            | Self::UnaryOp { span, .. }
            | Self::Collate { span, .. }
            | Self::AtTimeZone { span, .. }
            | Self::Subscript { span, .. }
            | Self::TypedLiteral { span, .. } => *span,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// The quantifier of an `ANY`/`ALL` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// `ANY` (or its synonym `SOME`).
    Any,
    All,
}

/// The right-hand side of an `IN` predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    /// `IN (a, b, c)`.
    List(Vec<Expr>),
    /// `IN (SELECT ...)`.
    Subquery(Box<Query>),
}

/// A boolean-valued node.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A bare boolean-valued expression used as a predicate.
    Expr(Box<Expr>, Span),

    /// `left op right`.
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] IN (...)`.
    In {
        expr: Box<Expr>,
        set: InSet,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] LIKE pattern [ESCAPE esc]`.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
        span: Span,
    },

    /// `expr IS [NOT] NULL`.
    IsNull {
        expr: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `left IS [NOT] DISTINCT FROM right`.
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `[NOT] EXISTS (subquery)`.
    Exists {
        query: Box<Query>,
        negated: bool,
        span: Span,
    },

    /// `left op ANY|ALL (subquery)`.
    AnyAll {
        op: CompareOp,
        quantifier: Quantifier,
        left: Box<Expr>,
        query: Box<Query>,
        span: Span,
    },

    /// `left AND right`.
    And(Box<Self>, Box<Self>, Span),

    /// `left OR right`.
    Or(Box<Self>, Box<Self>, Span),

    /// `NOT predicate`.
    Not(Box<Self>, Span),

    /// A regular-expression match: `expr ~ pattern` and friends.
    Regex {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        negated: bool,
        case_insensitive: bool,
        span: Span,
    },
}

impl Predicate {
    /// The source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(_, span)
            | Self::And(_, _, span)
            | Self::Or(_, _, span)
            | Self::Not(_, span)
            | Self::Comparison { span, .. }
            | Self::Between { span, .. }
            | Self::In { span, .. }
            | Self::Like { span, .. }
            | Self::IsNull { span, .. }
            | Self::IsDistinctFrom { span, .. }
            | Self::Exists { span, .. }
            | Self::AnyAll { span, .. }
            | Self::Regex { span, .. } => *span,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A set operation combining two query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

/// The distinctness specification of a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub enum DistinctSpec {
    All,
    Distinct,
    /// `DISTINCT ON (exprs)`.
    DistinctOn(Vec<Expr>),
}

/// A query node: a single SELECT, a set-operation chain, or a WITH wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Box<SelectQuery>),

    /// A bare `VALUES (...), (...)` list used as a query term.
    Values(Vec<Vec<Expr>>, Span),

    /// A set-operation chain: `terms[0] ops[0] terms[1] ops[1] terms[2] ...`.
    ///
    /// Invariant: `terms.len() == ops.len() + 1` and `ops` is non-empty.
    /// A trailing ORDER BY / LIMIT applies to the whole chain.
    Composite {
        terms: Vec<Query>,
        ops: Vec<SetOp>,
        order_by: Vec<OrderItem>,
        limit: Option<Expr>,
        offset: Option<Expr>,
        span: Span,
    },

    /// `WITH [RECURSIVE] ctes body`.
    With {
        recursive: bool,
        ctes: Vec<CteDef>,
        body: Box<Query>,
        span: Span,
    },
}

/// One common-table-expression definition: `name (cols) AS (query)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CteDef {
    pub name: String,
    /// Optional column-alias list.
    pub columns: Vec<String>,
    pub query: Box<Query>,
}

/// A single SELECT block.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub distinct: DistinctSpec,
    pub columns: Vec<SelectItem>,
    /// Comma-separated FROM sources, each with its chain of joins.
    pub from: Vec<FromItem>,
    pub where_clause: Option<Predicate>,
    pub group_by: Vec<GroupItem>,
    pub having: Option<Predicate>,
    /// `WINDOW name AS (...)` definitions.
    pub windows: Vec<WindowDef>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub locking: Option<LockingClause>,
    pub span: Span,
}

/// One item in the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`.
    Star,
    /// `table.*`.
    TableStar(String),
    /// An expression with an optional alias.
    Expr { expr: Expr, alias: Option<String> },
}

/// One FROM source together with the joins chained onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct FromItem {
    pub source: TableRef,
    pub joins: Vec<Join>,
}

/// `FOR UPDATE` / `FOR SHARE [OF tables]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LockingClause {
    pub mode: LockMode,
    pub of: Vec<QualifiedName>,
}

/// The strength of a locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    Update,
    Share,
}

// ---------------------------------------------------------------------------
// Table references & joins
// ---------------------------------------------------------------------------

/// An alias with an optional column-alias list: `AS t (a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    pub name: String,
    pub columns: Vec<String>,
}

/// A table reference in a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A base table.
    Table {
        name: QualifiedName,
        /// `ONLY name` — exclude descendant tables.
        only: bool,
        /// `name *` — explicitly include descendant tables.
        inherit: bool,
        alias: Option<TableAlias>,
    },

    /// A parenthesized subquery, optionally LATERAL.
    Subquery {
        query: Box<Query>,
        lateral: bool,
        alias: Option<TableAlias>,
    },

    /// A `VALUES (...), (...)` table.
    Values {
        rows: Vec<Vec<Expr>>,
        alias: Option<TableAlias>,
    },

    /// A set-returning function in FROM position, optionally LATERAL.
    Function {
        name: QualifiedName,
        args: Vec<Expr>,
        lateral: bool,
        alias: Option<TableAlias>,
    },
}

/// The kind of a qualified join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// One join step chained onto a FROM source.
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    /// `CROSS JOIN table` (or a bare comma in FROM).
    Cross { table: TableRef },
    /// `NATURAL [kind] JOIN table`.
    Natural { kind: JoinKind, table: TableRef },
    /// `[kind] JOIN table USING (cols)`.
    Using {
        kind: JoinKind,
        table: TableRef,
        columns: Vec<String>,
    },
    /// `[kind] JOIN table ON predicate`.
    On {
        kind: JoinKind,
        table: TableRef,
        predicate: Predicate,
    },
}

// ---------------------------------------------------------------------------
// Ordering, grouping, windows
// ---------------------------------------------------------------------------

/// The key of an ORDER BY or GROUP BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderKey {
    Expr(Expr),
    /// A 1-based ordinal into the select list.
    Ordinal(i64),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// NULLS FIRST / NULLS LAST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub key: OrderKey,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
    pub collation: Option<String>,
}

/// One GROUP BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupItem {
    Expr(Expr),
    /// A 1-based ordinal into the select list.
    Ordinal(i64),
    /// `GROUPING SETS ((a), (a, b), ())`.
    GroupingSets(Vec<Vec<GroupItem>>),
    /// `ROLLUP (a, b)`.
    Rollup(Vec<Expr>),
    /// `CUBE (a, b)`.
    Cube(Vec<Expr>),
}

/// A named window definition: `WINDOW name AS (spec)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDef {
    pub name: String,
    pub spec: WindowSpec,
}

/// The body of an OVER clause or window definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Reference to a named base window.
    pub base_window: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderItem>,
    pub frame: Option<FrameSpec>,
}

/// The unit of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

/// A window frame specification.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
    pub exclude: Option<FrameExclude>,
}

/// One bound of a window frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

/// The EXCLUDE clause of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameExclude {
    NoOthers,
    CurrentRow,
    Group,
    Ties,
}

// ---------------------------------------------------------------------------
// Type names
// ---------------------------------------------------------------------------

/// A type name as written in CAST or a typed construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// Possibly schema-qualified type name (`pg_catalog.numeric`, `varchar`).
    pub name: QualifiedName,
    /// Modifier arguments, kept verbatim (`255` in `varchar(255)`).
    pub modifiers: Vec<String>,
    /// Number of array dimensions (`int[][]` has two).
    pub array_dims: u8,
    /// `WITH TIME ZONE` (true) / `WITHOUT TIME ZONE` (false), when written.
    pub with_time_zone: Option<bool>,
}

impl TypeName {
    /// A plain, unparameterized type name.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::bare(name),
            modifiers: Vec::new(),
            array_dims: 0,
            with_time_zone: None,
        }
    }
}
