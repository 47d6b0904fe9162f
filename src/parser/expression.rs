//! Expression parsing: the precedence climber, primaries and paths.

use super::QueryParser;
use super::precedence::{Precedence, infix_operator, prefix_operator};
use crate::ast::{
    CaseSensitivity, CollectionKind, Expr, ExprKind, GraphMatchExpr, Identifier, PathExpr,
    PathStep, ScopeQualifier, Span, Spanned, StructField,
};
use crate::error::{ParseResult, SyntaxError, codes};
use crate::lexer::token::TokenKind;
use smol_str::SmolStr;
use tracing::trace;

impl<'a> QueryParser<'a> {
    /// Parses an expression accepting every operator.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(Precedence::Lowest)
    }

    /// Precedence climbing: parses an operand, then folds in every infix
    /// operator that binds at least as tightly as `min`.
    pub(crate) fn parse_expr_bp(&mut self, min: Precedence) -> ParseResult<Expr> {
        self.with_depth(|parser| {
            let mut lhs = parser.parse_prefix()?;
            while let Some(operator) = infix_operator(&parser.stream.current().kind) {
                if operator.precedence < min {
                    break;
                }
                let token = parser.stream.current().kind.clone();
                parser.stream.advance();
                lhs = (operator.build)(parser, lhs, &token, operator.operand_precedence())?;
            }
            Ok(lhs)
        })
    }

    /// Parses prefix operators and then a primary with its path steps.
    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let Some(operator) = prefix_operator(&self.stream.current().kind) else {
            let primary = self.parse_primary()?;
            return self.parse_path_steps(primary);
        };
        if let Some(literal) = self.fold_min_integer() {
            return self.parse_path_steps(literal);
        }
        let start = self.stream.start();
        self.stream.advance();
        let operand = self.parse_expr_bp(operator.operand_precedence())?;
        let span = start..operand.span.end;
        Ok(Expr::new(
            ExprKind::Unary(operator.op, Box::new(operand)),
            span,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let current = self.stream.current().kind.clone();
        let next = self.stream.peek().kind.clone();
        let followed_by_paren = next == TokenKind::LeftParen;
        match &current {
            kind if kind.is_literal() => self.parse_literal(),
            TokenKind::Null | TokenKind::Missing | TokenKind::True | TokenKind::False => {
                self.parse_literal()
            }
            TokenKind::Date | TokenKind::Timestamp
                if matches!(next, TokenKind::StringLiteral(_)) =>
            {
                self.parse_typed_literal()
            }
            TokenKind::Time
                if matches!(
                    next,
                    TokenKind::StringLiteral(_) | TokenKind::LeftParen | TokenKind::With
                ) =>
            {
                self.parse_typed_literal()
            }
            TokenKind::Question => {
                let span = self.stream.current().span.clone();
                self.stream.advance();
                let index = self.next_parameter();
                Ok(Expr::new(ExprKind::Parameter(index), span))
            }
            TokenKind::AtSign => {
                let start = self.stream.start();
                self.stream.advance();
                let (mut id, _) = self.parse_identifier("identifier after `@`")?;
                id.qualifier = ScopeQualifier::LocalsFirst;
                Ok(Expr::new(
                    ExprKind::Identifier(id),
                    self.stream.span_from(start),
                ))
            }
            TokenKind::Identifier(_) if followed_by_paren => self.parse_call(),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                let (id, span) = self.parse_identifier("identifier")?;
                Ok(Expr::new(ExprKind::Identifier(id), span))
            }
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::LeftBracket => {
                self.parse_collection(TokenKind::RightBracket, CollectionKind::List)
            }
            TokenKind::LeftDoubleAngle => {
                self.parse_collection(TokenKind::RightDoubleAngle, CollectionKind::Bag)
            }
            TokenKind::LeftBrace => self.parse_struct(),
            TokenKind::List | TokenKind::Bag | TokenKind::Sexp if followed_by_paren => {
                self.parse_collection_call()
            }
            TokenKind::Case => self.parse_case(),
            TokenKind::Cast | TokenKind::CanCast | TokenKind::CanLosslessCast => {
                self.parse_cast()
            }
            TokenKind::Count
            | TokenKind::Sum
            | TokenKind::Avg
            | TokenKind::Min
            | TokenKind::Max
            | TokenKind::Every
            | TokenKind::Any
            | TokenKind::Some => self.parse_aggregate(),
            TokenKind::Substring => self.parse_substring(),
            TokenKind::Trim => self.parse_trim(),
            TokenKind::Extract => self.parse_extract(),
            TokenKind::DateAdd | TokenKind::DateDiff => self.parse_date_arith(),
            TokenKind::Values => self.parse_values(),
            TokenKind::Select => self.parse_select(),
            TokenKind::Pivot => self.parse_pivot(),
            _ => Err(self.stream.unexpected("an expression")),
        }
    }

    /// Consumes an identifier token and returns its reference form.
    pub(crate) fn parse_identifier(&mut self, what: &str) -> ParseResult<(Identifier, Span)> {
        let token = self.stream.current();
        let (name, case) = match &token.kind {
            TokenKind::Identifier(name) => (name.clone(), CaseSensitivity::Insensitive),
            TokenKind::QuotedIdentifier(name) => (name.clone(), CaseSensitivity::Sensitive),
            _ => return Err(self.stream.unexpected(what)),
        };
        let span = token.span.clone();
        self.stream.advance();
        Ok((
            Identifier {
                name,
                case,
                qualifier: ScopeQualifier::Unqualified,
            },
            span,
        ))
    }

    /// Consumes an identifier token and returns its text, for aliases and
    /// variable names.
    pub(crate) fn parse_name(&mut self, what: &str) -> ParseResult<Spanned<SmolStr>> {
        let (id, span) = self.parse_identifier(what)?;
        Ok(Spanned::new(id.name, span))
    }

    /// Returns true if the current token can be an implicit alias.
    pub(crate) fn at_name(&self) -> bool {
        self.stream.current().kind.is_identifier()
    }

    /// Parses `.field`, `."Field"`, `.*`, `[expr]` and `[*]` steps after
    /// `root`.
    pub(crate) fn parse_path_steps(&mut self, root: Expr) -> ParseResult<Expr> {
        let mut steps = Vec::new();
        loop {
            match &self.stream.current().kind {
                TokenKind::Dot => {
                    self.stream.advance();
                    steps.push(self.parse_dot_step()?);
                }
                TokenKind::LeftBracket => {
                    self.stream.advance();
                    if self.stream.check(&TokenKind::Star)
                        && self.stream.peek().kind == TokenKind::RightBracket
                    {
                        self.stream.advance();
                        steps.push(PathStep::Wildcard);
                    } else {
                        steps.push(PathStep::Index(Box::new(self.parse_expr()?)));
                    }
                    self.stream.expect(TokenKind::RightBracket)?;
                }
                _ => break,
            }
        }
        if steps.is_empty() {
            return Ok(root);
        }
        let span = self.stream.span_from(root.span.start);
        Ok(Expr::new(
            ExprKind::Path(PathExpr {
                root: Box::new(root),
                steps,
            }),
            span,
        ))
    }

    fn parse_dot_step(&mut self) -> ParseResult<PathStep> {
        let token = self.stream.current();
        let step = match &token.kind {
            TokenKind::Star => PathStep::Unpivot,
            TokenKind::Identifier(name) => PathStep::Field {
                name: name.clone(),
                case: CaseSensitivity::Insensitive,
            },
            TokenKind::QuotedIdentifier(name) => PathStep::Field {
                name: name.clone(),
                case: CaseSensitivity::Sensitive,
            },
            // Reserved words are plain field names after a dot.
            kind if kind.is_keyword() && !token.text.contains(char::is_whitespace) => {
                PathStep::Field {
                    name: token.text.clone(),
                    case: CaseSensitivity::Insensitive,
                }
            }
            _ => return Err(self.stream.unexpected("a field name or `*` after `.`")),
        };
        self.stream.advance();
        Ok(step)
    }

    /// `( ... )`: a grouped expression, a row constructor (a list), a
    /// subquery, or a parenthesized graph match with a pattern list.
    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::LeftParen)?;
        let first = self.parse_expr()?;

        if self.stream.check(&TokenKind::Match) {
            let graph = self.parse_graph_match(first, true)?;
            self.stream.expect(TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::GraphMatch(graph),
                self.stream.span_from(start),
            ));
        }

        if self.stream.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.stream.consume(&TokenKind::Comma) {
                items.push(self.parse_expr()?);
            }
            self.stream.expect(TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Collection(CollectionKind::List, items),
                self.stream.span_from(start),
            ));
        }

        self.stream.expect(TokenKind::RightParen)?;
        Ok(first)
    }

    /// The right operand of `IN` when it starts with `(`: a subquery stays
    /// as is, anything else becomes a list of the parenthesized items.
    pub(crate) fn parse_in_collection(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let is_query = matches!(
            self.stream.peek().kind,
            TokenKind::Select | TokenKind::Pivot | TokenKind::Values
        );
        if is_query {
            return self.parse_parenthesized();
        }
        self.stream.expect(TokenKind::LeftParen)?;
        let items = self.parse_expr_list(&TokenKind::RightParen)?;
        self.stream.expect(TokenKind::RightParen)?;
        trace!(items = items.len(), "IN operand read as a list");
        Ok(Expr::new(
            ExprKind::Collection(CollectionKind::List, items),
            self.stream.span_from(start),
        ))
    }

    /// Comma-separated expressions up to (not including) `close`.
    pub(crate) fn parse_expr_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        if self.stream.check(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expr()?);
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    /// `[a, b]` or `<<a, b>>`.
    fn parse_collection(&mut self, close: TokenKind, kind: CollectionKind) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.advance();
        let items = self.parse_expr_list(&close)?;
        self.stream.expect(close)?;
        Ok(Expr::new(
            ExprKind::Collection(kind, items),
            self.stream.span_from(start),
        ))
    }

    /// `{key: value, ...}`
    fn parse_struct(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::LeftBrace)?;
        let mut fields = Vec::new();
        if !self.stream.check(&TokenKind::RightBrace) {
            loop {
                let key = self.parse_expr()?;
                self.stream.expect(TokenKind::Colon)?;
                let value = self.parse_expr()?;
                fields.push(StructField { key, value });
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.stream.expect(TokenKind::RightBrace)?;
        Ok(Expr::new(
            ExprKind::Struct(fields),
            self.stream.span_from(start),
        ))
    }

    /// `VALUES (a, b), (c, d)`: a bag of row lists.
    fn parse_values(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Values)?;
        let mut rows = Vec::new();
        loop {
            let row_start = self.stream.start();
            self.stream.expect(TokenKind::LeftParen)?;
            let items = self.parse_expr_list(&TokenKind::RightParen)?;
            self.stream.expect(TokenKind::RightParen)?;
            rows.push(Expr::new(
                ExprKind::Collection(CollectionKind::List, items),
                self.stream.span_from(row_start),
            ));
            if !self.stream.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(Expr::new(
            ExprKind::Collection(CollectionKind::Bag, rows),
            self.stream.span_from(start),
        ))
    }

    /// Wraps `source` and the patterns after `MATCH` into a graph match.
    ///
    /// A comma-separated pattern list is only accepted when the whole match
    /// is parenthesized.
    pub(crate) fn parse_graph_match(
        &mut self,
        source: Expr,
        parenthesized: bool,
    ) -> ParseResult<GraphMatchExpr> {
        self.stream.expect(TokenKind::Match)?;
        let selector = self.parse_selector()?;
        let mut patterns = vec![self.parse_graph_pattern()?];
        if parenthesized {
            while self.stream.consume(&TokenKind::Comma) {
                patterns.push(self.parse_graph_pattern()?);
            }
        } else if self.stream.check(&TokenKind::Comma) && self.pattern_follows_comma() {
            return Err(Box::new(
                SyntaxError::parser(
                    codes::INVALID_PATTERN,
                    "a list of graph patterns must be parenthesized",
                    self.stream.current(),
                )
                .with_help("write `(graph MATCH pattern, pattern)`"),
            ));
        }
        Ok(GraphMatchExpr {
            source: Box::new(source),
            selector,
            patterns,
        })
    }
}
