//! PartiQL query parser with rich diagnostics.
//!
//! This library turns PartiQL text (SQL-compatible queries over nested,
//! schema-less data, extended with graph `MATCH` patterns, DML, DDL and
//! `EXEC`) into an owned AST. Errors carry stable codes, byte spans and
//! line/column positions, and render through miette.
//!
//! # Example
//!
//! ```
//! use partiql_syntax::ast::sexp::to_sexp;
//! use partiql_syntax::{StatementKind, parse_statement};
//!
//! let statement = parse_statement("SELECT a FROM t WHERE a > 1").unwrap();
//! assert!(matches!(statement.kind, StatementKind::Query(_)));
//! assert!(to_sexp(&statement).starts_with("(select"));
//!
//! let err = parse_statement("SELECT a FROM").unwrap_err();
//! assert_eq!(err.code, "P001");
//! assert_eq!((err.line, err.column), (1, 14));
//! ```

pub mod ast;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{Expr, ExprKind, Span, Spanned, Statement, StatementKind};
pub use diag::{Diag, DiagLabel, SourceFile, render_report};
pub use error::{ErrorKind, ParseResult, SyntaxError};
pub use lexer::Lexer;
pub use lexer::token::{Token, TokenKind};
pub use parser::{Parser, ParserConfig, parse_expression, parse_statement, tokenize};
pub use value::{LiteralCodec, LiteralCodecError, TextLiteralCodec, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _span: Span = 0..5;
        let _spanned = Spanned::new(42, 0..5);
        let tokens = tokenize("SELECT 1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert!(parse_expression("1 + 2").is_ok());
    }
}
