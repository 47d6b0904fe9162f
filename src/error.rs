//! The error type surfaced by the lexer and parser.
//!
//! Every failure is fatal: the first error aborts the parse and is returned
//! with its byte span, 1-based line/column, and the offending token text.

use crate::ast::Span;
use crate::diag::{Diag, SourceFile, render_report};
use crate::lexer::token::{Position, Token};
use miette::Report;
use smol_str::SmolStr;
use std::fmt;

/// Result type used by every fallible lexer and parser routine.
pub type ParseResult<T> = Result<T, Box<SyntaxError>>;

/// Broad category of a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed literal, unterminated quote, exponent overflow.
    Lexer,
    /// Unexpected token, missing clause, mismatched bracket or quantifier.
    Parser,
    /// Grammar that is recognized but deliberately not implemented.
    UnsupportedConstruct,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexer => write!(f, "lexer error"),
            ErrorKind::Parser => write!(f, "parser error"),
            ErrorKind::UnsupportedConstruct => write!(f, "unsupported construct"),
        }
    }
}

/// Stable diagnostic codes.
pub mod codes {
    pub const UNTERMINATED_STRING: &str = "L001";
    pub const UNTERMINATED_QUOTED_IDENTIFIER: &str = "L002";
    pub const UNTERMINATED_COMMENT: &str = "L003";
    pub const UNTERMINATED_EMBEDDED_LITERAL: &str = "L004";
    pub const EXPONENT_OVERFLOW: &str = "L005";
    pub const MALFORMED_EXPONENT: &str = "L006";
    pub const INVALID_CHARACTER: &str = "L007";
    pub const MALFORMED_HEX_LITERAL: &str = "L008";

    pub const UNEXPECTED_TOKEN: &str = "P001";
    pub const TRAILING_INPUT: &str = "P002";
    pub const RECURSION_LIMIT: &str = "P003";
    pub const INVALID_LITERAL: &str = "P004";
    pub const MISMATCHED_EDGE: &str = "P005";
    pub const INVALID_QUANTIFIER: &str = "P006";
    pub const MISPLACED_CLAUSE: &str = "P007";
    pub const INVALID_PATTERN: &str = "P008";
    pub const UNKNOWN_TYPE: &str = "P009";

    pub const LABEL_EXPRESSION: &str = "U001";
    pub const EMBEDDED_LITERAL: &str = "U002";
}

/// A lexical or syntactic error with full positional context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} [{code}] at {line}:{column}: {message}")]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
    pub span: Span,
    /// 1-based line of the error location.
    pub line: usize,
    /// 1-based column (in characters) of the error location.
    pub column: usize,
    /// Source text of the offending token, when one exists.
    pub token: Option<SmolStr>,
    /// What the grammar required at this position.
    pub expected: Option<String>,
    pub help: Option<String>,
}

impl SyntaxError {
    fn new(
        kind: ErrorKind,
        code: &'static str,
        message: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            span,
            line: position.line,
            column: position.column,
            token: None,
            expected: None,
            help: None,
        }
    }

    /// Creates a lexer error covering `span`.
    pub fn lexer(
        code: &'static str,
        message: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        Self::new(ErrorKind::Lexer, code, message, span, position)
    }

    /// Creates a parser error located at `token`.
    pub fn parser(code: &'static str, message: impl Into<String>, token: &Token) -> Self {
        Self::new(
            ErrorKind::Parser,
            code,
            message,
            token.span.clone(),
            token.position,
        )
        .with_token(token)
    }

    /// Creates an unsupported-construct error located at `token`.
    pub fn unsupported(code: &'static str, message: impl Into<String>, token: &Token) -> Self {
        Self::new(
            ErrorKind::UnsupportedConstruct,
            code,
            message,
            token.span.clone(),
            token.position,
        )
        .with_token(token)
    }

    fn with_token(mut self, token: &Token) -> Self {
        if !token.text.is_empty() {
            self.token = Some(token.text.clone());
        }
        self
    }

    /// Records what the grammar expected at the error location.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attaches a suggestion for fixing the error.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Lowers this error to a renderable [`Diag`].
    pub fn to_diag(&self) -> Diag {
        let label = match (&self.expected, &self.token) {
            (Some(expected), _) => format!("expected {expected}"),
            (None, Some(token)) => format!("found `{token}`"),
            (None, None) => "here".to_string(),
        };
        let diag = Diag::new(self.code, format!("{}: {}", self.kind, self.message))
            .with_label(self.span.clone(), label);
        match &self.help {
            Some(help) => diag.with_help(help.clone()),
            None => diag,
        }
    }

    /// Renders this error as a `miette` report over `source`.
    pub fn to_report(&self, source: &str) -> Report {
        render_report(&self.to_diag(), &SourceFile::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::TokenKind;

    fn token(text: &str, span: Span, line: usize, column: usize) -> Token {
        Token::new(
            TokenKind::Identifier(text.into()),
            span,
            text,
            Position { line, column },
        )
    }

    #[test]
    fn parser_error_carries_token_and_position() {
        let tok = token("frob", 7..11, 2, 3);
        let err = SyntaxError::parser(codes::UNEXPECTED_TOKEN, "unexpected identifier", &tok)
            .with_expected("FROM");

        assert_eq!(err.kind, ErrorKind::Parser);
        assert_eq!(err.token.as_deref(), Some("frob"));
        assert_eq!((err.line, err.column), (2, 3));
        assert_eq!(err.expected.as_deref(), Some("FROM"));
        assert_eq!(
            err.to_string(),
            "parser error [P001] at 2:3: unexpected identifier"
        );
    }

    #[test]
    fn diag_conversion_uses_expected_label() {
        let tok = token("x", 0..1, 1, 1);
        let err = SyntaxError::parser(codes::UNEXPECTED_TOKEN, "bad", &tok)
            .with_expected("`)`")
            .with_help("close the parenthesis");
        let diag = err.to_diag();

        assert_eq!(diag.code, "P001");
        assert_eq!(diag.message, "parser error: bad");
        assert_eq!(diag.labels[0].message, "expected `)`");
        assert_eq!(diag.help.as_deref(), Some("close the parenthesis"));
    }

    #[test]
    fn report_renders_against_source() {
        let err = SyntaxError::lexer(
            codes::UNTERMINATED_STRING,
            "unterminated string literal",
            7..11,
            Position { line: 1, column: 8 },
        );
        let report = err.to_report("SELECT 'abc");
        assert!(format!("{report:?}").contains("unterminated string literal"));
    }
}
