mod common;

use chrono::NaiveDate;
use common::{expr_ok, parse_err};
use partiql_syntax::error::codes;
use partiql_syntax::{
    ErrorKind, ExprKind, LiteralCodec, LiteralCodecError, Parser, ParserConfig, Value,
};

fn literal(source: &str) -> Value {
    match expr_ok(source).kind {
        ExprKind::Literal(value) => value,
        other => panic!("expected a literal for `{source}`, got {other:?}"),
    }
}

/// Accepts only decimal digits and returns them as an integer.
struct DigitsCodec;

impl LiteralCodec for DigitsCodec {
    fn parse_literal(&self, text: &str) -> Result<Value, LiteralCodecError> {
        text.trim().parse::<i64>().map(Value::Integer).map_err(|err| LiteralCodecError {
            message: err.to_string(),
            offset: 0,
        })
    }
}

#[test]
fn embedded_literals_use_the_configured_codec() {
    let codec = DigitsCodec;
    let parser = Parser::new().with_literal_codec(&codec);
    let statement = parser
        .parse_statement("SELECT a FROM t WHERE a = ` 42 `")
        .expect("digits decode");
    assert!(format!("{statement:?}").contains("Integer(42)"));

    let err = parser.parse_expression("`abc`").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedConstruct);
    assert_eq!(err.code, codes::EMBEDDED_LITERAL);
}

#[test]
fn default_codec_decodes_structs() {
    assert_eq!(
        literal("`{a: 1, b: \"x\"}`"),
        Value::Struct(vec![
            ("a".into(), Value::Integer(1)),
            ("b".into(), Value::String("x".into())),
        ])
    );
}

#[test]
fn parser_is_shared_across_threads() {
    let parser = Parser::with_config(ParserConfig::default());
    std::thread::scope(|scope| {
        for n in 0..4 {
            let parser = &parser;
            scope.spawn(move || {
                let source = format!("SELECT a FROM t WHERE a > {n}");
                assert!(parser.parse_statement(&source).is_ok());
            });
        }
    });
}

#[test]
fn calendar_dates_are_validated_when_parsed() {
    assert_eq!(
        literal("DATE '2000-02-29'"),
        Value::Date(NaiveDate::from_ymd_opt(2000, 2, 29).unwrap())
    );
    assert_eq!(
        parse_err("SELECT a FROM t WHERE d = DATE '1900-02-29'").code,
        codes::INVALID_LITERAL
    );
    assert_eq!(
        parse_err("SELECT a FROM t WHERE d < DATE '2021-13-01'").code,
        codes::INVALID_LITERAL
    );
}

#[test]
fn negative_numbers_stay_unary() {
    let expr = expr_ok("-5");
    assert!(matches!(expr.kind, ExprKind::Unary(..)));
    assert_eq!(literal("0.0"), Value::Decimal("0.0".into()));
    assert_eq!(literal("NULL"), Value::Null);
}
