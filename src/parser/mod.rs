//! Recursive-descent parser producing the AST.
//!
//! [`Parser`] is the configurable front end. Internally one [`QueryParser`]
//! is built per call; its grammar is split across the submodules below,
//! each adding an `impl` block:
//!
//! - `expression`: the precedence climber, primaries and paths
//! - `functions`: calls, aggregates, window calls and special forms
//! - `literals`: scalar and typed temporal literals
//! - `types`: `CAST`/`IS` target types
//! - `patterns`: graph `MATCH` patterns
//! - `statement`: `SELECT`/`PIVOT`, `FROM` sources and the statement root
//! - `dml`: DML, DDL and `EXEC`

mod base;
mod dml;
mod expression;
mod functions;
mod literals;
mod patterns;
mod precedence;
mod statement;
mod types;

pub use base::TokenStream;
pub use precedence::{Assoc, Precedence};

use crate::ast::{Expr, Statement};
use crate::error::{ParseResult, SyntaxError, codes};
use crate::lexer::Lexer;
use crate::lexer::token::{Token, TokenKind};
use crate::value::{LiteralCodec, TextLiteralCodec};
use tracing::debug;

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of expressions and graph sub-patterns.
    pub max_depth: usize,
    /// Accept one `;` after the statement.
    pub allow_trailing_semicolon: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 200,
            allow_trailing_semicolon: true,
        }
    }
}

static DEFAULT_CODEC: TextLiteralCodec = TextLiteralCodec;

/// Reusable parser front end.
///
/// Holds only configuration, so one instance may serve any number of
/// sequential or concurrent calls.
///
/// ```
/// use partiql_syntax::{Parser, ParserConfig};
///
/// let parser = Parser::with_config(ParserConfig {
///     max_depth: 64,
///     ..ParserConfig::default()
/// });
/// assert!(parser.parse_statement("SELECT a FROM t;").is_ok());
/// ```
#[derive(Clone)]
pub struct Parser<'c> {
    config: ParserConfig,
    codec: &'c dyn LiteralCodec,
}

impl Parser<'static> {
    /// Creates a parser with the default configuration and literal codec.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates a parser with `config` and the default literal codec.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            codec: &DEFAULT_CODEC,
        }
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> Parser<'c> {
    /// Replaces the codec used for embedded (backtick) literals.
    pub fn with_literal_codec<'n>(self, codec: &'n dyn LiteralCodec) -> Parser<'n> {
        Parser {
            config: self.config,
            codec,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenizes `source` without parsing it.
    pub fn tokenize(&self, source: &str) -> ParseResult<Vec<Token>> {
        Lexer::new(source).tokenize()
    }

    /// Parses one statement, optionally followed by `;`.
    pub fn parse_statement(&self, source: &str) -> ParseResult<Statement> {
        let tokens = self.tokenize(source)?;
        let mut parser = QueryParser::new(&tokens, &self.config, self.codec);
        let statement = parser.parse_statement_root()?;
        debug!(
            bytes = source.len(),
            tokens = tokens.len(),
            kind = statement.kind_name(),
            "parsed statement"
        );
        Ok(statement)
    }

    /// Parses a single expression spanning the whole input.
    pub fn parse_expression(&self, source: &str) -> ParseResult<Expr> {
        let tokens = self.tokenize(source)?;
        let mut parser = QueryParser::new(&tokens, &self.config, self.codec);
        let expr = parser.parse_expression_root()?;
        debug!(
            bytes = source.len(),
            tokens = tokens.len(),
            "parsed expression"
        );
        Ok(expr)
    }
}

/// Per-call parsing state: the token cursor plus nesting and parameter
/// counters.
pub(crate) struct QueryParser<'a> {
    pub(crate) stream: TokenStream<'a>,
    config: &'a ParserConfig,
    codec: &'a dyn LiteralCodec,
    depth: usize,
    parameters: usize,
}

impl<'a> QueryParser<'a> {
    pub(crate) fn new(
        tokens: &'a [Token],
        config: &'a ParserConfig,
        codec: &'a dyn LiteralCodec,
    ) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            config,
            codec,
            depth: 0,
            parameters: 0,
        }
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is hit.
    pub(crate) fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(self.stream.error_here(
                codes::RECURSION_LIMIT,
                format!(
                    "input nests deeper than the limit of {} levels",
                    self.config.max_depth
                ),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Allocates the next positional parameter number.
    pub(crate) fn next_parameter(&mut self) -> usize {
        self.parameters += 1;
        self.parameters
    }

    /// Parses an expression and requires the input to end after it.
    fn parse_expression_root(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    /// Accepts an optional `;` (when configured) and then requires EOF.
    pub(crate) fn expect_end(&mut self) -> ParseResult<()> {
        if self.config.allow_trailing_semicolon {
            self.stream.consume(&TokenKind::Semicolon);
        }
        if self.stream.at_eof() {
            return Ok(());
        }
        let found = &self.stream.current().kind;
        Err(Box::new(
            SyntaxError::parser(
                codes::TRAILING_INPUT,
                format!("unexpected {found} after the end of the statement"),
                self.stream.current(),
            )
            .with_expected("end of input")
            .with_help("only one statement is parsed per call"),
        ))
    }
}

/// Tokenizes `source` with the default configuration.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    Parser::new().tokenize(source)
}

/// Parses one statement with the default configuration.
pub fn parse_statement(source: &str) -> ParseResult<Statement> {
    Parser::new().parse_statement(source)
}

/// Parses one expression with the default configuration.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    Parser::new().parse_expression(source)
}
