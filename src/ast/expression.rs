//! Expression nodes.
//!
//! Every expression is an [`Expr`]: a [`ExprKind`] tag with its children,
//! plus the span it was parsed from. Children are boxed so the tree owns
//! them exclusively.

use super::pattern::GraphMatchExpr;
use super::statement::{Select, SortSpec};
use super::types::Type;
use crate::ast::Span;
use crate::value::Value;
use smol_str::SmolStr;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The closed set of expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    Identifier(Identifier),
    /// Positional `?` parameter, numbered from 1 in source order.
    Parameter(usize),
    Path(PathExpr),
    Call(CallExpr),
    Aggregate(AggregateCall),
    Window(WindowCall),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Like(LikeExpr),
    Between(BetweenExpr),
    In(InExpr),
    IsType(IsTypeExpr),
    SetOp(SetOpExpr),
    Case(CaseExpr),
    Cast(CastExpr),
    Substring(SubstringExpr),
    Trim(TrimExpr),
    Extract(ExtractExpr),
    DateArith(DateArithExpr),
    /// `[..]`, `<<..>>`, `SEXP(..)`, `LIST(..)`, `BAG(..)`, row constructors
    /// and `VALUES`.
    Collection(CollectionKind, Vec<Expr>),
    Struct(Vec<StructField>),
    Select(Box<Select>),
    GraphMatch(GraphMatchExpr),
}

/// Case sensitivity of a name, fixed by quoting at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

/// Lookup scope for a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeQualifier {
    Unqualified,
    /// `@name`: resolve against local bindings before the global scope.
    LocalsFirst,
}

/// A variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: SmolStr,
    pub case: CaseSensitivity,
    pub qualifier: ScopeQualifier,
}

impl Identifier {
    /// Returns true if this identifier refers to `name` under its case rule.
    pub fn matches(&self, name: &str) -> bool {
        match self.case {
            CaseSensitivity::Sensitive => self.name == name,
            CaseSensitivity::Insensitive => self.name.eq_ignore_ascii_case(name),
        }
    }
}

/// A root expression followed by navigation steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub root: Box<Expr>,
    pub steps: Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// `.name` or `."Name"`.
    Field {
        name: SmolStr,
        case: CaseSensitivity,
    },
    /// `[expr]`; always case-sensitive for text keys.
    Index(Box<Expr>),
    /// `[*]`
    Wildcard,
    /// `.*`
    Unpivot,
}

/// An ordinary function call; the name is stored lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: SmolStr,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Every,
    Any,
    Some,
}

impl AggregateFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Every => "every",
            AggregateFunction::Any => "any",
            AggregateFunction::Some => "some",
        }
    }
}

/// `ALL` or `DISTINCT`, on aggregates, `SELECT` and set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SetQuantifier {
    #[default]
    All,
    Distinct,
}

/// An aggregate call. `arg` is `None` for `COUNT(*)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub func: AggregateFunction,
    pub quantifier: SetQuantifier,
    pub arg: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFunction {
    Lag,
    Lead,
}

/// `OVER ([PARTITION BY ...] [ORDER BY ...])`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<SortSpec>,
}

/// `LAG(expr [, offset [, default]]) OVER (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub func: WindowFunction,
    pub args: Vec<Expr>,
    pub over: WindowSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Mod,
}

/// `value [NOT] LIKE pattern [ESCAPE escape]`
#[derive(Debug, Clone, PartialEq)]
pub struct LikeExpr {
    pub value: Box<Expr>,
    pub pattern: Box<Expr>,
    pub escape: Option<Box<Expr>>,
    pub negated: bool,
}

/// `value [NOT] BETWEEN low AND high`
#[derive(Debug, Clone, PartialEq)]
pub struct BetweenExpr {
    pub value: Box<Expr>,
    pub low: Box<Expr>,
    pub high: Box<Expr>,
    pub negated: bool,
}

/// `value [NOT] IN collection`
#[derive(Debug, Clone, PartialEq)]
pub struct InExpr {
    pub value: Box<Expr>,
    pub collection: Box<Expr>,
    pub negated: bool,
}

/// `value IS [NOT] type`
#[derive(Debug, Clone, PartialEq)]
pub struct IsTypeExpr {
    pub value: Box<Expr>,
    pub ty: Type,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    Except,
    Intersect,
}

/// `lhs [OUTER] UNION|EXCEPT|INTERSECT [ALL|DISTINCT] rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct SetOpExpr {
    pub op: SetOperator,
    pub quantifier: SetQuantifier,
    pub outer: bool,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenBranch {
    pub condition: Expr,
    pub result: Expr,
}

/// Simple (`operand` present) or searched `CASE`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub operand: Option<Box<Expr>>,
    pub branches: Vec<WhenBranch>,
    pub else_result: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Cast,
    CanCast,
    CanLosslessCast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub kind: CastKind,
    pub value: Box<Expr>,
    pub ty: Type,
}

/// `SUBSTRING(value FROM start [FOR length])` or the comma form.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstringExpr {
    pub value: Box<Expr>,
    pub start: Box<Expr>,
    pub length: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimSpec {
    Both,
    Leading,
    Trailing,
}

/// `TRIM([spec] [remove] FROM source)` or `TRIM(source)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimExpr {
    pub spec: Option<TrimSpec>,
    pub remove: Option<Box<Expr>>,
    pub source: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    TimezoneHour,
    TimezoneMinute,
}

impl DatePart {
    pub fn name(self) -> &'static str {
        match self {
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
            DatePart::Hour => "hour",
            DatePart::Minute => "minute",
            DatePart::Second => "second",
            DatePart::TimezoneHour => "timezone_hour",
            DatePart::TimezoneMinute => "timezone_minute",
        }
    }
}

/// `EXTRACT(part FROM source)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractExpr {
    pub part: DatePart,
    pub source: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateArithOp {
    Add,
    Diff,
}

/// `DATE_ADD(part, quantity, value)` / `DATE_DIFF(part, from, to)`
#[derive(Debug, Clone, PartialEq)]
pub struct DateArithExpr {
    pub op: DateArithOp,
    pub part: DatePart,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Bag,
    Sexp,
}

/// One `key: value` pair of a struct constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub key: Expr,
    pub value: Expr,
}
