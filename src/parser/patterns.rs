//! Graph `MATCH` patterns: selectors, path patterns, nodes, edges and
//! quantifiers.
//!
//! A pattern is a sequence of parts that alternate between node-like and
//! edge-like positions. Parenthesized or bracketed sub-patterns may stand
//! in either position, carry their own restrictor, path variable, `WHERE`
//! and quantifier, and must themselves start and end on a node.

use super::QueryParser;
use crate::ast::{
    EdgeDirection, EdgePattern, Expr, GraphPattern, NodePattern, PatternPart, Quantifier,
    Restrictor, Selector,
};
use crate::error::{ParseResult, SyntaxError, codes};
use crate::lexer::keywords::ContextualKeyword;
use crate::lexer::token::TokenKind;
use smol_str::SmolStr;
use tracing::trace;

/// The leading half of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeOpener {
    /// `-`
    Dash,
    /// `<-`
    LeftDash,
    /// `~`
    Tilde,
    /// `<~`
    LeftTilde,
}

impl EdgeOpener {
    fn spelling(self) -> &'static str {
        match self {
            EdgeOpener::Dash => "-",
            EdgeOpener::LeftDash => "<-",
            EdgeOpener::Tilde => "~",
            EdgeOpener::LeftTilde => "<~",
        }
    }

    /// Direction of the opener used on its own as an abbreviated edge.
    fn abbreviated(self) -> EdgeDirection {
        match self {
            EdgeOpener::Dash => EdgeDirection::LeftOrUndirectedOrRight,
            EdgeOpener::LeftDash => EdgeDirection::Left,
            EdgeOpener::Tilde => EdgeDirection::Undirected,
            EdgeOpener::LeftTilde => EdgeDirection::LeftOrUndirected,
        }
    }

    /// Direction of `opener[ .. ]closer`, or `None` if they do not pair.
    fn close(self, closer: &TokenKind) -> Option<EdgeDirection> {
        let direction = match (self, closer) {
            (EdgeOpener::Dash, TokenKind::Arrow) => EdgeDirection::Right,
            (EdgeOpener::Dash, TokenKind::Minus) => EdgeDirection::LeftOrUndirectedOrRight,
            (EdgeOpener::LeftDash, TokenKind::Minus) => EdgeDirection::Left,
            (EdgeOpener::LeftDash, TokenKind::Arrow) => EdgeDirection::LeftOrRight,
            (EdgeOpener::Tilde, TokenKind::Tilde) => EdgeDirection::Undirected,
            (EdgeOpener::Tilde, TokenKind::RightTilde) => EdgeDirection::UndirectedOrRight,
            (EdgeOpener::LeftTilde, TokenKind::Tilde) => EdgeDirection::LeftOrUndirected,
            _ => return None,
        };
        Some(direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartShape {
    Node,
    Edge,
    Pattern,
}

/// Variable, labels and `WHERE` shared by nodes and verbose edges.
struct Filler {
    variable: Option<SmolStr>,
    labels: Vec<SmolStr>,
    prefilter: Option<Box<Expr>>,
}

impl<'a> QueryParser<'a> {
    /// `ANY [SHORTEST | k]`, `ALL SHORTEST` or `SHORTEST k [GROUP]`.
    pub(crate) fn parse_selector(&mut self) -> ParseResult<Option<Selector>> {
        let selector = match self.stream.current().kind {
            TokenKind::Any => {
                self.stream.advance();
                if self.stream.consume_contextual(ContextualKeyword::Shortest) {
                    Selector::AnyShortest
                } else if self.at_integer() {
                    Selector::AnyK(self.parse_count("ANY")?)
                } else {
                    Selector::Any
                }
            }
            TokenKind::All => {
                self.stream.advance();
                if !self.stream.consume_contextual(ContextualKeyword::Shortest) {
                    return Err(self.stream.unexpected("SHORTEST"));
                }
                Selector::AllShortest
            }
            TokenKind::Identifier(_)
                if self.stream.check_contextual(ContextualKeyword::Shortest)
                    && matches!(self.stream.peek().kind, TokenKind::IntegerLiteral(_)) =>
            {
                self.stream.advance();
                let k = self.parse_count("SHORTEST")?;
                if self.stream.consume(&TokenKind::Group) {
                    Selector::ShortestKGroup(k)
                } else {
                    Selector::ShortestK(k)
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(selector))
    }

    fn at_integer(&self) -> bool {
        matches!(self.stream.current().kind, TokenKind::IntegerLiteral(_))
    }

    fn parse_count(&mut self, after: &str) -> ParseResult<u64> {
        let TokenKind::IntegerLiteral(digits) = &self.stream.current().kind else {
            return Err(self.stream.unexpected(&format!("a path count after {after}")));
        };
        let Ok(count) = digits.parse::<u64>() else {
            return Err(self.stream.error_here(
                codes::INVALID_LITERAL,
                format!("path count {digits} is out of range"),
            ));
        };
        self.stream.advance();
        Ok(count)
    }

    /// A top-level path pattern: `[restrictor] [p =] part part ...`.
    ///
    /// Top-level patterns may begin or end with an edge.
    pub(crate) fn parse_graph_pattern(&mut self) -> ParseResult<GraphPattern> {
        self.with_depth(|parser| {
            let start = parser.stream.start();
            let restrictor = parser.parse_restrictor();
            let variable = parser.parse_path_variable()?;
            let parts = parser.parse_pattern_parts(false)?;
            Ok(GraphPattern {
                restrictor,
                variable,
                parts,
                prefilter: None,
                quantifier: None,
                span: parser.stream.span_from(start),
            })
        })
    }

    fn parse_restrictor(&mut self) -> Option<Restrictor> {
        let restrictor = match self.stream.contextual_at(0)? {
            ContextualKeyword::Trail => Restrictor::Trail,
            ContextualKeyword::Acyclic => Restrictor::Acyclic,
            ContextualKeyword::Simple => Restrictor::Simple,
            _ => return None,
        };
        // `trail = (a)` names a path variable `trail`.
        if self.stream.peek().kind == TokenKind::Eq {
            return None;
        }
        self.stream.advance();
        Some(restrictor)
    }

    fn parse_path_variable(&mut self) -> ParseResult<Option<SmolStr>> {
        if !(self.at_name() && self.stream.peek().kind == TokenKind::Eq) {
            return Ok(None);
        }
        let name = self.parse_name("a path variable")?;
        self.stream.expect(TokenKind::Eq)?;
        Ok(Some(name.node))
    }

    /// Parses parts until none can start. Two nodes or two edges in a row
    /// are rejected at the second one; `nested` patterns must also start
    /// and end on a node.
    fn parse_pattern_parts(&mut self, nested: bool) -> ParseResult<Vec<PatternPart>> {
        let mut parts = Vec::new();
        let mut previous = None;
        loop {
            let shape = if self.stream.check(&TokenKind::LeftParen) {
                if self.sub_pattern_ahead() {
                    PartShape::Pattern
                } else {
                    PartShape::Node
                }
            } else if self.stream.check(&TokenKind::LeftBracket) {
                PartShape::Pattern
            } else if self.edge_starts_at(0) {
                PartShape::Edge
            } else {
                break;
            };

            if nested && previous.is_none() && shape == PartShape::Edge {
                return Err(self.stream.error_here(
                    codes::INVALID_PATTERN,
                    "a parenthesized pattern must start with a node",
                ));
            }
            if previous == Some(shape) && shape != PartShape::Pattern {
                let message = match shape {
                    PartShape::Node => "adjacent node patterns must be joined by an edge",
                    _ => "adjacent edge patterns must be separated by a node",
                };
                return Err(self.stream.error_here(codes::INVALID_PATTERN, message));
            }

            let part = match shape {
                PartShape::Node => PatternPart::Node(self.parse_node()?),
                PartShape::Edge => PatternPart::Edge(self.parse_edge()?),
                PartShape::Pattern => PatternPart::Pattern(self.parse_sub_pattern()?),
            };
            parts.push(part);
            previous = Some(shape);
        }

        match previous {
            None => Err(self.stream.error_here(
                codes::INVALID_PATTERN,
                format!(
                    "expected a node, edge or sub-pattern, found {}",
                    self.stream.current().kind
                ),
            )),
            Some(PartShape::Edge) if nested => Err(self.stream.error_here(
                codes::INVALID_PATTERN,
                "a parenthesized pattern must end with a node",
            )),
            _ => Ok(parts),
        }
    }

    /// Decides whether the `(` at the cursor opens a sub-pattern rather than
    /// a node.
    fn sub_pattern_ahead(&self) -> bool {
        let ahead = match &self.stream.peek().kind {
            TokenKind::LeftParen | TokenKind::LeftBracket => true,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                let after = &self.stream.peek_nth(2).kind;
                let restrictor = matches!(
                    self.stream.contextual_at(1),
                    Some(
                        ContextualKeyword::Trail
                            | ContextualKeyword::Acyclic
                            | ContextualKeyword::Simple
                    )
                );
                matches!(
                    after,
                    TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::Eq
                ) || (restrictor && after.is_identifier())
            }
            _ => self.edge_starts_at(1),
        };
        trace!(sub_pattern = ahead, "classified `(` in graph pattern");
        ahead
    }

    /// Returns true if an edge starts `n` tokens ahead.
    fn edge_starts_at(&self, n: usize) -> bool {
        match &self.stream.peek_nth(n).kind {
            TokenKind::Minus
            | TokenKind::Arrow
            | TokenKind::Tilde
            | TokenKind::LeftTilde
            | TokenKind::RightTilde => true,
            TokenKind::Lt => {
                matches!(
                    self.stream.peek_nth(n + 1).kind,
                    TokenKind::Minus | TokenKind::Arrow
                ) && self.adjacent(n)
            }
            _ => false,
        }
    }

    /// Returns true if the tokens `n` and `n + 1` ahead touch.
    fn adjacent(&self, n: usize) -> bool {
        self.stream.peek_nth(n).span.end == self.stream.peek_nth(n + 1).span.start
    }

    /// `( [var] [:Label & ...] [WHERE expr] )`
    fn parse_node(&mut self) -> ParseResult<NodePattern> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::LeftParen)?;
        let filler = self.parse_filler("a node variable")?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(NodePattern {
            variable: filler.variable,
            labels: filler.labels,
            prefilter: filler.prefilter,
            span: self.stream.span_from(start),
        })
    }

    fn parse_filler(&mut self, what: &str) -> ParseResult<Filler> {
        let variable = if self.at_name() {
            Some(self.parse_name(what)?.node)
        } else {
            None
        };
        let labels = self.parse_labels()?;
        let prefilter = if self.stream.consume(&TokenKind::Where) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Filler {
            variable,
            labels,
            prefilter,
        })
    }

    /// `:A & B`. Label disjunction, negation, wildcards and grouping are
    /// recognized and reported as unsupported.
    fn parse_labels(&mut self) -> ParseResult<Vec<SmolStr>> {
        let mut labels = Vec::new();
        if !self.stream.consume(&TokenKind::Colon) {
            return Ok(labels);
        }
        loop {
            self.reject_label_operator()?;
            labels.push(self.parse_name("a label")?.node);
            self.reject_label_operator()?;
            if !self.stream.consume(&TokenKind::Ampersand) {
                return Ok(labels);
            }
        }
    }

    fn reject_label_operator(&self) -> ParseResult<()> {
        let construct = match self.stream.current().kind {
            TokenKind::Pipe => "label disjunction `|`",
            TokenKind::Bang => "label negation `!`",
            TokenKind::Percent => "the label wildcard `%`",
            TokenKind::LeftParen => "parenthesized label expressions",
            _ => return Ok(()),
        };
        Err(self.stream.unsupported_here(
            codes::LABEL_EXPRESSION,
            format!("{construct} is not supported in graph patterns"),
        ))
    }

    /// A verbose (`-[e:E]->`) or abbreviated (`->`) edge with an optional
    /// quantifier.
    fn parse_edge(&mut self) -> ParseResult<EdgePattern> {
        let start = self.stream.start();
        let opener = match self.stream.current().kind {
            TokenKind::Minus => EdgeOpener::Dash,
            TokenKind::Tilde => EdgeOpener::Tilde,
            TokenKind::LeftTilde => EdgeOpener::LeftTilde,
            TokenKind::Arrow => {
                self.stream.advance();
                return self.finish_edge(start, EdgeDirection::Right, None);
            }
            TokenKind::RightTilde => {
                self.stream.advance();
                return self.finish_edge(start, EdgeDirection::UndirectedOrRight, None);
            }
            TokenKind::Lt if self.stream.peek().kind == TokenKind::Arrow => {
                self.stream.advance();
                self.stream.advance();
                return self.finish_edge(start, EdgeDirection::LeftOrRight, None);
            }
            TokenKind::Lt => {
                self.stream.advance();
                EdgeOpener::LeftDash
            }
            _ => return Err(self.stream.unexpected("an edge")),
        };
        self.stream.advance();

        if !self.stream.consume(&TokenKind::LeftBracket) {
            return self.finish_edge(start, opener.abbreviated(), None);
        }
        let filler = self.parse_filler("an edge variable")?;
        self.stream.expect(TokenKind::RightBracket)?;

        let closer = self.stream.current().kind.clone();
        let Some(direction) = opener.close(&closer) else {
            let is_closer = matches!(
                closer,
                TokenKind::Minus | TokenKind::Arrow | TokenKind::Tilde | TokenKind::RightTilde
            );
            if !is_closer {
                return Err(self.stream.unexpected("the end of the edge"));
            }
            return Err(self.stream.error_here(
                codes::MISMATCHED_EDGE,
                format!(
                    "edge opened with `{}[` cannot be closed with `]{closer}`",
                    opener.spelling()
                ),
            ));
        };
        self.stream.advance();
        self.finish_edge(start, direction, Some(filler))
    }

    fn finish_edge(
        &mut self,
        start: usize,
        direction: EdgeDirection,
        filler: Option<Filler>,
    ) -> ParseResult<EdgePattern> {
        let quantifier = self.parse_quantifier()?;
        let Filler {
            variable,
            labels,
            prefilter,
        } = filler.unwrap_or(Filler {
            variable: None,
            labels: Vec::new(),
            prefilter: None,
        });
        Ok(EdgePattern {
            direction,
            quantifier,
            variable,
            labels,
            prefilter,
            span: self.stream.span_from(start),
        })
    }

    /// `( [restrictor] [p =] parts [WHERE expr] )` or `[ ... ]`, followed by
    /// an optional quantifier.
    fn parse_sub_pattern(&mut self) -> ParseResult<GraphPattern> {
        self.with_depth(|parser| {
            let start = parser.stream.start();
            let close = if parser.stream.consume(&TokenKind::LeftBracket) {
                TokenKind::RightBracket
            } else {
                parser.stream.expect(TokenKind::LeftParen)?;
                TokenKind::RightParen
            };
            let restrictor = parser.parse_restrictor();
            let variable = parser.parse_path_variable()?;
            let parts = parser.parse_pattern_parts(true)?;
            let prefilter = if parser.stream.consume(&TokenKind::Where) {
                Some(Box::new(parser.parse_expr()?))
            } else {
                None
            };
            parser.stream.expect(close)?;
            let quantifier = parser.parse_quantifier()?;
            Ok(GraphPattern {
                restrictor,
                variable,
                parts,
                prefilter,
                quantifier,
                span: parser.stream.span_from(start),
            })
        })
    }

    /// `*`, `+`, `{m,}` or `{m,n}`.
    fn parse_quantifier(&mut self) -> ParseResult<Option<Quantifier>> {
        let quantifier = match self.stream.current().kind {
            TokenKind::Star => Quantifier {
                lower: 0,
                upper: None,
            },
            TokenKind::Plus => Quantifier {
                lower: 1,
                upper: None,
            },
            TokenKind::LeftBrace => return self.parse_bounded_quantifier().map(Some),
            _ => return Ok(None),
        };
        self.stream.advance();
        Ok(Some(quantifier))
    }

    fn parse_bounded_quantifier(&mut self) -> ParseResult<Quantifier> {
        self.stream.expect(TokenKind::LeftBrace)?;
        let Some(lower) = self.parse_bound()? else {
            return Err(self.stream.error_here(
                codes::INVALID_QUANTIFIER,
                "a quantifier needs a lower bound, as in `{0,5}`",
            ));
        };
        if !self.stream.consume(&TokenKind::Comma) {
            return Err(Box::new(
                SyntaxError::parser(
                    codes::INVALID_QUANTIFIER,
                    "exact quantifiers `{m}` are not supported",
                    self.stream.current(),
                )
                .with_help(format!("write `{{{lower},{lower}}}`")),
            ));
        }
        let upper_at = self.stream.position();
        let upper = self.parse_bound()?;
        if let Some(upper) = upper.filter(|upper| *upper < lower) {
            self.stream.set_position(upper_at);
            return Err(self.stream.error_here(
                codes::INVALID_QUANTIFIER,
                format!("quantifier upper bound {upper} is below the lower bound {lower}"),
            ));
        }
        self.stream.expect(TokenKind::RightBrace)?;
        Ok(Quantifier { lower, upper })
    }

    fn parse_bound(&mut self) -> ParseResult<Option<u64>> {
        let TokenKind::IntegerLiteral(digits) = &self.stream.current().kind else {
            return Ok(None);
        };
        let Ok(bound) = digits.parse::<u64>() else {
            return Err(self.stream.error_here(
                codes::INVALID_QUANTIFIER,
                format!("quantifier bound {digits} is out of range"),
            ));
        };
        self.stream.advance();
        Ok(Some(bound))
    }

    /// With the cursor on the `,` after an unparenthesized `MATCH` pattern,
    /// decides whether a second graph pattern follows rather than another
    /// `FROM` item.
    pub(crate) fn pattern_follows_comma(&self) -> bool {
        let pattern = match &self.stream.peek().kind {
            TokenKind::LeftParen => match &self.stream.peek_nth(2).kind {
                TokenKind::Colon | TokenKind::RightParen => true,
                TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
                    if matches!(
                        self.stream.peek_nth(3).kind,
                        TokenKind::Colon | TokenKind::Where | TokenKind::RightParen
                    ) =>
                {
                    true
                }
                _ => self.edge_follows_group(1),
            },
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                self.stream.peek_nth(2).kind == TokenKind::Eq
                    || (matches!(
                        self.stream.contextual_at(1),
                        Some(
                            ContextualKeyword::Trail
                                | ContextualKeyword::Acyclic
                                | ContextualKeyword::Simple
                        )
                    ) && self.stream.peek_nth(2).kind == TokenKind::LeftParen)
            }
            _ => false,
        };
        trace!(pattern = pattern, "classified item after `,` in MATCH");
        pattern
    }

    /// Returns true if the parenthesized group opening `open` tokens ahead
    /// is followed by an edge.
    fn edge_follows_group(&self, open: usize) -> bool {
        let mut depth = 0usize;
        let mut n = open;
        loop {
            match &self.stream.peek_nth(n).kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.edge_starts_at(n + 1);
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            n += 1;
        }
    }
}
