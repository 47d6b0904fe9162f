//! Common test utilities
//!
//! Shared helpers for the integration tests.
//!
//! # Parsing Helpers
//! - [`parse_ok`] - Parse a statement, panicking with the rendered error
//! - [`expr_ok`] - Parse an expression, panicking with the rendered error
//! - [`sexp_of`] - Parse a statement and render it as an s-expression
//!
//! # Error Helpers
//! - [`parse_err`] - Parse a statement that must fail and return the error
//! - [`assert_error_code`] - Assert that parsing fails with a given code

#![allow(dead_code)]

use partiql_syntax::ast::sexp::to_sexp;
use partiql_syntax::{Expr, Statement, SyntaxError, parse_expression, parse_statement};

/// Formats an error as the miette report a user would see.
pub fn render_error(source: &str, err: &SyntaxError) -> String {
    format!("{:?}", err.to_report(source))
}

/// Parses `source` as a statement, panicking with the rendered error.
pub fn parse_ok(source: &str) -> Statement {
    parse_statement(source)
        .unwrap_or_else(|err| panic!("`{source}` failed to parse:\n{}", render_error(source, &err)))
}

/// Parses `source` as an expression, panicking with the rendered error.
pub fn expr_ok(source: &str) -> Expr {
    parse_expression(source)
        .unwrap_or_else(|err| panic!("`{source}` failed to parse:\n{}", render_error(source, &err)))
}

/// Parses `source` and renders the statement as an s-expression.
pub fn sexp_of(source: &str) -> String {
    to_sexp(&parse_ok(source))
}

/// Parses `source` as a statement that must fail.
pub fn parse_err(source: &str) -> SyntaxError {
    match parse_statement(source) {
        Ok(statement) => panic!("`{source}` parsed unexpectedly: {statement:?}"),
        Err(err) => *err,
    }
}

/// Asserts that parsing `source` fails with `code`.
pub fn assert_error_code(source: &str, code: &str) {
    let err = parse_err(source);
    assert_eq!(
        err.code, code,
        "unexpected error for `{source}`: {err}"
    );
}

/// Renders a bare identifier the way the s-expression codec does.
pub fn id(name: &str) -> String {
    format!("(id {name} (case_insensitive) (unqualified))")
}
