//! Graph `MATCH` pattern nodes.

use super::expression::Expr;
use crate::ast::Span;
use smol_str::SmolStr;

/// `source MATCH pattern` or `(source MATCH pattern, pattern, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphMatchExpr {
    /// The graph being matched.
    pub source: Box<Expr>,
    /// Selector applying to the whole pattern list.
    pub selector: Option<Selector>,
    pub patterns: Vec<GraphPattern>,
}

/// Chooses which matching paths are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `ANY SHORTEST`
    AnyShortest,
    /// `ALL SHORTEST`
    AllShortest,
    /// `ANY`
    Any,
    /// `ANY k`
    AnyK(u64),
    /// `SHORTEST k`
    ShortestK(u64),
    /// `SHORTEST k GROUP`
    ShortestKGroup(u64),
}

/// Constrains which walks are admissible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Restrictor {
    /// No repeated edges.
    Trail,
    /// No repeated nodes.
    Acyclic,
    /// No repeated nodes except that the first may equal the last.
    Simple,
}

/// A path pattern: an ordered sequence of parts.
///
/// Parts alternate between node-like and edge parts; a nested sub-pattern
/// may stand in either position. Nested patterns start and end on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPattern {
    pub restrictor: Option<Restrictor>,
    /// `p = ...` path variable.
    pub variable: Option<SmolStr>,
    pub parts: Vec<PatternPart>,
    /// `WHERE` inside a parenthesized sub-pattern.
    pub prefilter: Option<Box<Expr>>,
    /// Repetition of a parenthesized or bracketed sub-pattern.
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternPart {
    Node(NodePattern),
    Edge(EdgePattern),
    Pattern(GraphPattern),
}

impl PatternPart {
    pub fn span(&self) -> &Span {
        match self {
            PatternPart::Node(node) => &node.span,
            PatternPart::Edge(edge) => &edge.span,
            PatternPart::Pattern(pattern) => &pattern.span,
        }
    }
}

/// `( [var] [:Label [& Label ...]] [WHERE prefilter] )`
///
/// An empty label list means no label constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<SmolStr>,
    pub labels: Vec<SmolStr>,
    pub prefilter: Option<Box<Expr>>,
    pub span: Span,
}

/// Edge direction, named after the arrowheads that may be traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// `-[ ]->` / `->`
    Right,
    /// `<-[ ]-` / `<-`
    Left,
    /// `~[ ]~` / `~`
    Undirected,
    /// `<-[ ]->` / `<->`
    LeftOrRight,
    /// `~[ ]~>` / `~>`
    UndirectedOrRight,
    /// `<~[ ]~` / `<~`
    LeftOrUndirected,
    /// `-[ ]-` / `-`
    LeftOrUndirectedOrRight,
}

impl EdgeDirection {
    pub fn name(self) -> &'static str {
        match self {
            EdgeDirection::Right => "right",
            EdgeDirection::Left => "left",
            EdgeDirection::Undirected => "undirected",
            EdgeDirection::LeftOrRight => "left_or_right",
            EdgeDirection::UndirectedOrRight => "undirected_or_right",
            EdgeDirection::LeftOrUndirected => "left_or_undirected",
            EdgeDirection::LeftOrUndirectedOrRight => "left_or_undirected_or_right",
        }
    }
}

/// An edge pattern, verbose (`-[e:E WHERE ..]->`) or abbreviated (`->`).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePattern {
    pub direction: EdgeDirection,
    pub quantifier: Option<Quantifier>,
    pub variable: Option<SmolStr>,
    pub labels: Vec<SmolStr>,
    pub prefilter: Option<Box<Expr>>,
    pub span: Span,
}

/// `{lower, upper}`; `upper` is `None` when unbounded.
///
/// `*` is `{0,}` and `+` is `{1,}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantifier {
    pub lower: u64,
    pub upper: Option<u64>,
}
