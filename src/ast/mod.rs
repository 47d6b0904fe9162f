//! Abstract syntax tree produced by the parser.
//!
//! The tree is immutable once built and exclusively owns its children.
//! Every node that carries a [`Span`] records the byte range it was parsed
//! from; [`sexp`] renders the tree without them.

mod expression;
mod pattern;
pub mod sexp;
mod span;
mod statement;
mod types;

pub use span::{Span, Spanned, join};

pub use expression::{
    AggregateCall, AggregateFunction, BetweenExpr, BinaryOp, CallExpr, CaseExpr, CaseSensitivity,
    CastExpr, CastKind, CollectionKind, DateArithExpr, DateArithOp, DatePart, Expr, ExprKind,
    ExtractExpr, Identifier, InExpr, IsTypeExpr, LikeExpr, PathExpr, PathStep, ScopeQualifier,
    SetOpExpr, SetOperator, SetQuantifier, StructField, SubstringExpr, TrimExpr, TrimSpec,
    UnaryOp, WhenBranch, WindowCall, WindowFunction, WindowSpec,
};
pub use pattern::{
    EdgeDirection, EdgePattern, GraphMatchExpr, GraphPattern, NodePattern, PatternPart,
    Quantifier, Restrictor, Selector,
};
pub use statement::{
    Assignment, DdlStatement, DmlOp, DmlStatement, ExecStatement, FromSource, GroupBy, GroupKey,
    GroupingStrategy, Join, JoinKind, LetBinding, NullsOrder, Ordering, ProjectItem, Projection,
    Scan, Select, SortSpec, Statement, StatementKind,
};
pub use types::{Type, custom_type};
