//! Operator precedence table.
//!
//! The climbing loop in `expression.rs` is generic: every operator it
//! understands is an entry below with its token set, binding level,
//! associativity and the function that builds its node. From loosest to
//! tightest:
//!
//! ```text
//! set operators < OR < AND < NOT < comparison < additive < multiplicative < unary
//! ```
//!
//! Set operators binding looser than `AND`/`OR` means `a AND b UNION c` is
//! `(a AND b) UNION c`.

use super::QueryParser;
use crate::ast::{
    BetweenExpr, BinaryOp, Expr, ExprKind, InExpr, IsTypeExpr, LikeExpr, SetOpExpr, SetOperator,
    SetQuantifier, UnaryOp, join,
};
use crate::error::{ParseResult, codes};
use crate::lexer::token::TokenKind;

/// Binding strength, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Accepts every operator.
    Lowest,
    SetOp,
    Or,
    And,
    Not,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
}

impl Precedence {
    /// The next tighter level.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Lowest => Precedence::SetOp,
            Precedence::SetOp => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Not,
            Precedence::Not => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative | Precedence::Unary => Precedence::Unary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

/// Minimum precedence for the operand of an operator at `precedence`.
fn operand_precedence(precedence: Precedence, assoc: Assoc) -> Precedence {
    match assoc {
        Assoc::Left => precedence.tighter(),
        Assoc::Right => precedence,
    }
}

/// Builds the node for an infix operator whose token has been consumed.
///
/// Receives the left operand, the operator token and the minimum
/// precedence for the right operand.
pub(crate) type InfixBuilder =
    fn(&mut QueryParser<'_>, Expr, &TokenKind, Precedence) -> ParseResult<Expr>;

pub(crate) struct InfixOperator {
    pub tokens: &'static [TokenKind],
    pub precedence: Precedence,
    pub assoc: Assoc,
    pub build: InfixBuilder,
}

impl InfixOperator {
    pub fn operand_precedence(&self) -> Precedence {
        operand_precedence(self.precedence, self.assoc)
    }
}

pub(crate) struct PrefixOperator {
    pub tokens: &'static [TokenKind],
    pub precedence: Precedence,
    pub assoc: Assoc,
    pub op: UnaryOp,
}

impl PrefixOperator {
    pub fn operand_precedence(&self) -> Precedence {
        operand_precedence(self.precedence, self.assoc)
    }
}

static INFIX_OPERATORS: &[InfixOperator] = &[
    InfixOperator {
        tokens: &[
            TokenKind::Union,
            TokenKind::UnionAll,
            TokenKind::Except,
            TokenKind::ExceptAll,
            TokenKind::Intersect,
            TokenKind::IntersectAll,
            TokenKind::OuterUnion,
            TokenKind::OuterUnionAll,
            TokenKind::OuterExcept,
            TokenKind::OuterExceptAll,
            TokenKind::OuterIntersect,
            TokenKind::OuterIntersectAll,
        ],
        precedence: Precedence::SetOp,
        assoc: Assoc::Left,
        build: build_set_op,
    },
    InfixOperator {
        tokens: &[TokenKind::Or],
        precedence: Precedence::Or,
        assoc: Assoc::Left,
        build: build_binary,
    },
    InfixOperator {
        tokens: &[TokenKind::And],
        precedence: Precedence::And,
        assoc: Assoc::Left,
        build: build_binary,
    },
    InfixOperator {
        tokens: &[
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::BangEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ],
        precedence: Precedence::Comparison,
        assoc: Assoc::Left,
        build: build_binary,
    },
    InfixOperator {
        tokens: &[TokenKind::In, TokenKind::NotIn],
        precedence: Precedence::Comparison,
        assoc: Assoc::Left,
        build: build_in,
    },
    InfixOperator {
        tokens: &[TokenKind::Between, TokenKind::NotBetween],
        precedence: Precedence::Comparison,
        assoc: Assoc::Left,
        build: build_between,
    },
    InfixOperator {
        tokens: &[TokenKind::Like, TokenKind::NotLike],
        precedence: Precedence::Comparison,
        assoc: Assoc::Left,
        build: build_like,
    },
    InfixOperator {
        tokens: &[TokenKind::Is, TokenKind::IsNot],
        precedence: Precedence::Comparison,
        assoc: Assoc::Left,
        build: build_is,
    },
    InfixOperator {
        tokens: &[TokenKind::Plus, TokenKind::Minus, TokenKind::Concat],
        precedence: Precedence::Additive,
        assoc: Assoc::Left,
        build: build_binary,
    },
    InfixOperator {
        tokens: &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
        precedence: Precedence::Multiplicative,
        assoc: Assoc::Left,
        build: build_binary,
    },
];

static PREFIX_OPERATORS: &[PrefixOperator] = &[
    PrefixOperator {
        tokens: &[TokenKind::Not],
        precedence: Precedence::Not,
        assoc: Assoc::Right,
        op: UnaryOp::Not,
    },
    PrefixOperator {
        tokens: &[TokenKind::Minus],
        precedence: Precedence::Unary,
        assoc: Assoc::Right,
        op: UnaryOp::Minus,
    },
    PrefixOperator {
        tokens: &[TokenKind::Plus],
        precedence: Precedence::Unary,
        assoc: Assoc::Right,
        op: UnaryOp::Plus,
    },
];

/// Finds the infix entry for `kind`.
pub(crate) fn infix_operator(kind: &TokenKind) -> Option<&'static InfixOperator> {
    INFIX_OPERATORS.iter().find(|entry| entry.tokens.contains(kind))
}

/// Finds the prefix entry for `kind`.
pub(crate) fn prefix_operator(kind: &TokenKind) -> Option<&'static PrefixOperator> {
    PREFIX_OPERATORS
        .iter()
        .find(|entry| entry.tokens.contains(kind))
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq | TokenKind::BangEq => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

fn build_binary(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    min: Precedence,
) -> ParseResult<Expr> {
    let Some(op) = binary_op(op) else {
        return Err(parser.stream.error_here(
            codes::UNEXPECTED_TOKEN,
            format!("{op} is not a binary operator"),
        ));
    };
    let rhs = parser.parse_expr_bp(min)?;
    let span = join(&lhs.span, &rhs.span);
    Ok(Expr::new(
        ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
        span,
    ))
}

fn build_set_op(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    min: Precedence,
) -> ParseResult<Expr> {
    let (set_op, outer, all) = match op {
        TokenKind::Union => (SetOperator::Union, false, false),
        TokenKind::UnionAll => (SetOperator::Union, false, true),
        TokenKind::Except => (SetOperator::Except, false, false),
        TokenKind::ExceptAll => (SetOperator::Except, false, true),
        TokenKind::Intersect => (SetOperator::Intersect, false, false),
        TokenKind::IntersectAll => (SetOperator::Intersect, false, true),
        TokenKind::OuterUnion => (SetOperator::Union, true, false),
        TokenKind::OuterUnionAll => (SetOperator::Union, true, true),
        TokenKind::OuterExcept => (SetOperator::Except, true, false),
        TokenKind::OuterExceptAll => (SetOperator::Except, true, true),
        TokenKind::OuterIntersect => (SetOperator::Intersect, true, false),
        TokenKind::OuterIntersectAll => (SetOperator::Intersect, true, true),
        _ => {
            return Err(parser.stream.error_here(
                codes::UNEXPECTED_TOKEN,
                format!("{op} is not a set operator"),
            ));
        }
    };
    let quantifier = if all || parser.stream.consume(&TokenKind::All) {
        SetQuantifier::All
    } else {
        parser.stream.consume(&TokenKind::Distinct);
        SetQuantifier::Distinct
    };
    let rhs = parser.parse_expr_bp(min)?;
    let span = join(&lhs.span, &rhs.span);
    Ok(Expr::new(
        ExprKind::SetOp(SetOpExpr {
            op: set_op,
            quantifier,
            outer,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }),
        span,
    ))
}

fn build_in(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    min: Precedence,
) -> ParseResult<Expr> {
    let collection = if parser.stream.check(&TokenKind::LeftParen) {
        parser.parse_in_collection()?
    } else {
        parser.parse_expr_bp(min)?
    };
    let span = join(&lhs.span, &collection.span);
    Ok(Expr::new(
        ExprKind::In(InExpr {
            value: Box::new(lhs),
            collection: Box::new(collection),
            negated: *op == TokenKind::NotIn,
        }),
        span,
    ))
}

fn build_between(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    min: Precedence,
) -> ParseResult<Expr> {
    let low = parser.parse_expr_bp(min)?;
    parser.stream.expect(TokenKind::And)?;
    let high = parser.parse_expr_bp(min)?;
    let span = join(&lhs.span, &high.span);
    Ok(Expr::new(
        ExprKind::Between(BetweenExpr {
            value: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            negated: *op == TokenKind::NotBetween,
        }),
        span,
    ))
}

fn build_like(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    min: Precedence,
) -> ParseResult<Expr> {
    let pattern = parser.parse_expr_bp(min)?;
    let escape = if parser.stream.consume(&TokenKind::Escape) {
        Some(Box::new(parser.parse_expr_bp(min)?))
    } else {
        None
    };
    let end = escape.as_ref().map_or(&pattern.span, |escape| &escape.span);
    let span = join(&lhs.span, end);
    Ok(Expr::new(
        ExprKind::Like(LikeExpr {
            value: Box::new(lhs),
            pattern: Box::new(pattern),
            escape,
            negated: *op == TokenKind::NotLike,
        }),
        span,
    ))
}

fn build_is(
    parser: &mut QueryParser<'_>,
    lhs: Expr,
    op: &TokenKind,
    _min: Precedence,
) -> ParseResult<Expr> {
    let ty = parser.parse_type()?;
    let span = parser.stream.span_from(lhs.span.start);
    Ok(Expr::new(
        ExprKind::IsType(IsTypeExpr {
            value: Box::new(lhs),
            ty,
            negated: *op == TokenKind::IsNot,
        }),
        span,
    ))
}
