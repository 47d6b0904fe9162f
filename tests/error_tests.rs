mod common;

use common::{parse_err, render_error};
use partiql_syntax::error::codes;
use partiql_syntax::{ErrorKind, parse_expression, tokenize};

#[test]
fn parser_errors_report_line_and_column() {
    let source = "SELECT a\nFROM t\nWHERE";
    let err = parse_err(source);
    assert_eq!(err.kind, ErrorKind::Parser);
    assert_eq!(err.code, codes::UNEXPECTED_TOKEN);
    assert_eq!((err.line, err.column), (3, 6));
    assert_eq!(err.span, source.len()..source.len());
    assert!(err.token.is_none());
}

#[test]
fn positions_follow_crlf_and_characters() {
    let err = parse_err("SELECT 'héllo'\r\nFROM t\r\nWHERE a = = 1");
    assert_eq!((err.line, err.column), (3, 11));
    assert_eq!(err.token.as_deref(), Some("="));

    let err = parse_err("SELECT 'ü' #");
    assert_eq!(err.kind, ErrorKind::Lexer);
    assert_eq!(err.column, 12);
}

#[test]
fn unexpected_token_names_what_was_expected() {
    let err = parse_err("SELECT a FROM t WHERE (a = 1");
    assert_eq!(err.expected.as_deref(), Some("`)`"));
    assert!(err.message.contains("end of input"), "{}", err.message);
}

#[test]
fn exponent_overflow_is_never_truncated() {
    for source in ["1E2147483648", "SELECT 1E2147483648 FROM t", "1e-2147483649"] {
        let err = parse_err(source);
        assert_eq!(err.kind, ErrorKind::Lexer, "{source}");
        assert_eq!(err.code, codes::EXPONENT_OVERFLOW, "{source}");
    }
    let Err(err) = tokenize("1E2147483648") else {
        panic!("expected a lexer error");
    };
    assert_eq!(err.code, codes::EXPONENT_OVERFLOW);
}

#[test]
fn integer_overflow_is_an_invalid_literal() {
    let Err(err) = parse_expression("9223372036854775808") else {
        panic!("expected an invalid literal");
    };
    assert_eq!(err.code, codes::INVALID_LITERAL);
    assert!(parse_expression("-9223372036854775807").is_ok());
    assert!(parse_expression("x = -9223372036854775808").is_ok());
}

#[test]
fn unterminated_quotes_fail_at_the_opening_quote() {
    let err = parse_err("SELECT a FROM t WHERE b = 'x");
    assert_eq!(err.code, codes::UNTERMINATED_STRING);
    assert_eq!(err.column, 27);
    assert!(err.help.is_some());
}

#[test]
fn display_and_report_carry_the_message() {
    let source = "SELECT a FROM t LIMIT 1 WHERE a = 1";
    let err = parse_err(source);
    assert_eq!(err.code, codes::MISPLACED_CLAUSE);
    assert!(
        err.to_string().starts_with("parser error [P007] at 1:25:"),
        "{err}"
    );
    let rendered = render_error(source, &err);
    assert!(rendered.contains("out of order"), "{rendered}");
}

#[test]
fn nesting_beyond_the_limit_fails_predictably() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("SELECT {}1{} FROM t", "(".repeat(10_000), ")".repeat(10_000));
            let list = format!("{}1{}", "[".repeat(10_000), "]".repeat(10_000));
            (
                parse_err(&source).code,
                parse_expression(&list).map(|_| ()).unwrap_err().code,
            )
        })
        .expect("spawn parser thread");
    let (nested_parens, nested_lists) = handle.join().expect("parser thread");
    assert_eq!(nested_parens, codes::RECURSION_LIMIT);
    assert_eq!(nested_lists, codes::RECURSION_LIMIT);
}
