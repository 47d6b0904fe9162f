//! Scalar literals and typed temporal literals.

use super::QueryParser;
use crate::ast::{Expr, ExprKind};
use crate::error::{ParseResult, codes};
use crate::lexer::keywords::ContextualKeyword;
use crate::lexer::token::TokenKind;
use crate::value::{TimeValue, TimestampValue, Value};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Largest fractional-second precision accepted by `TIME (p)`.
const MAX_TIME_PRECISION: u32 = 9;

impl<'a> QueryParser<'a> {
    /// Parses a literal token, `NULL`, `MISSING`, `TRUE` or `FALSE`.
    pub(crate) fn parse_literal(&mut self) -> ParseResult<Expr> {
        let token = self.stream.current();
        let invalid = |message: String| self.stream.error_here(codes::INVALID_LITERAL, message);
        let value = match &token.kind {
            TokenKind::IntegerLiteral(digits) => match digits.parse::<i64>() {
                Ok(value) => Value::Integer(value),
                Err(_) => {
                    return Err(invalid(format!(
                        "integer literal {digits} does not fit in 64 bits"
                    )));
                }
            },
            TokenKind::DecimalLiteral(digits) => Value::Decimal(digits.clone()),
            TokenKind::FloatLiteral(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Value::Float(value),
                _ => return Err(invalid(format!("float literal {text} is out of range"))),
            },
            TokenKind::StringLiteral(text) => Value::String(text.clone()),
            TokenKind::ByteStringLiteral(digits) => match Value::blob_from_hex(digits) {
                Some(blob) => blob,
                None => {
                    return Err(invalid(format!(
                        "byte string X'{digits}' needs an even number of hex digits"
                    )));
                }
            },
            TokenKind::EmbeddedLiteral(body) => self.codec.parse_literal(body).map_err(|err| {
                self.stream.unsupported_here(
                    codes::EMBEDDED_LITERAL,
                    format!("embedded literal cannot be decoded: {err}"),
                )
            })?,
            TokenKind::Null => Value::Null,
            TokenKind::Missing => Value::Missing,
            TokenKind::True => Value::Boolean(true),
            TokenKind::False => Value::Boolean(false),
            _ => return Err(self.stream.unexpected("a literal")),
        };
        let span = token.span.clone();
        self.stream.advance();
        Ok(Expr::new(ExprKind::Literal(value), span))
    }

    /// With the cursor on `-`, folds `-9223372036854775808` into a single
    /// `i64::MIN` literal. Any other negation is left to the caller.
    pub(crate) fn fold_min_integer(&mut self) -> Option<Expr> {
        let minus = self.stream.current();
        if minus.kind != TokenKind::Minus {
            return None;
        }
        let literal = self.stream.peek();
        let TokenKind::IntegerLiteral(digits) = &literal.kind else {
            return None;
        };
        if digits.parse::<i64>().is_ok() {
            return None;
        }
        let value = format!("-{digits}").parse::<i64>().ok()?;
        let span = minus.span.start..literal.span.end;
        self.stream.advance();
        self.stream.advance();
        Some(Expr::new(ExprKind::Literal(Value::Integer(value)), span))
    }

    /// `DATE '..'`, `TIME [(p)] [WITH TIME ZONE] '..'` or `TIMESTAMP '..'`.
    pub(crate) fn parse_typed_literal(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let value = match self.stream.current().kind {
            TokenKind::Date => {
                self.stream.advance();
                let date = self.parse_temporal_text(parse_date)?;
                Value::Date(date)
            }
            TokenKind::Time => {
                self.stream.advance();
                let (precision, with_time_zone) = self.parse_time_qualifiers()?;
                let (time, offset) = if with_time_zone {
                    self.parse_temporal_text(parse_zoned_time)?
                } else {
                    (self.parse_temporal_text(parse_time)?, None)
                };
                Value::Time(TimeValue {
                    time,
                    precision,
                    offset,
                })
            }
            _ => {
                self.stream.expect(TokenKind::Timestamp)?;
                let (datetime, offset) = self.parse_temporal_text(parse_timestamp)?;
                Value::Timestamp(TimestampValue { datetime, offset })
            }
        };
        Ok(Expr::new(
            ExprKind::Literal(value),
            self.stream.span_from(start),
        ))
    }

    /// `[(p)] [WITH TIME ZONE]` after `TIME`, in literals and type names.
    pub(crate) fn parse_time_qualifiers(&mut self) -> ParseResult<(Option<u32>, bool)> {
        let precision = if self.stream.consume(&TokenKind::LeftParen) {
            let precision = self.parse_type_parameter(MAX_TIME_PRECISION)?;
            self.stream.expect(TokenKind::RightParen)?;
            Some(precision)
        } else {
            None
        };
        let with_time_zone = self.stream.consume(&TokenKind::With);
        if with_time_zone {
            self.stream.expect(TokenKind::Time)?;
            if !self.stream.consume_contextual(ContextualKeyword::Zone) {
                return Err(self.stream.unexpected("ZONE"));
            }
        }
        Ok((precision, with_time_zone))
    }

    /// Reads the string of a typed literal and converts it with `convert`;
    /// conversion failures point at the string.
    fn parse_temporal_text<T>(
        &mut self,
        convert: fn(&str) -> Result<T, String>,
    ) -> ParseResult<T> {
        let TokenKind::StringLiteral(text) = &self.stream.current().kind else {
            return Err(self.stream.unexpected("a quoted date or time"));
        };
        let value = convert(text)
            .map_err(|message| self.stream.error_here(codes::INVALID_LITERAL, message))?;
        self.stream.advance();
        Ok(value)
    }
}

fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(byte, expected)| match expected {
            b'9' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

/// `YYYY-MM-DD`, checked against the calendar.
fn parse_date(text: &str) -> Result<NaiveDate, String> {
    if !has_shape(text, "9999-99-99") {
        return Err(format!("date '{text}' is not in YYYY-MM-DD form"));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| format!("date '{text}' does not exist in the calendar"))
}

/// `hh:mm:ss[.fraction]`
fn parse_time(text: &str) -> Result<NaiveTime, String> {
    match split_offset(text)? {
        (clock, None) => parse_clock(clock, text),
        (_, Some(_)) => Err(format!(
            "time '{text}' has a time zone offset but the literal is not TIME WITH TIME ZONE"
        )),
    }
}

/// `hh:mm:ss[.fraction][±hh:mm]`; a missing offset means UTC.
fn parse_zoned_time(text: &str) -> Result<(NaiveTime, Option<FixedOffset>), String> {
    let (clock, offset) = split_offset(text)?;
    let offset = offset.or_else(|| FixedOffset::east_opt(0));
    Ok((parse_clock(clock, text)?, offset))
}

/// `YYYY-MM-DD[ T]hh:mm:ss[.fraction][±hh:mm|Z]`
fn parse_timestamp(text: &str) -> Result<(NaiveDateTime, Option<FixedOffset>), String> {
    let malformed = || format!("timestamp '{text}' is not in YYYY-MM-DD hh:mm:ss form");
    let (Some(date), Some(rest)) = (text.get(..10), text.get(11..)) else {
        return Err(malformed());
    };
    if !matches!(text.as_bytes().get(10), Some(b' ' | b'T')) {
        return Err(malformed());
    }
    let date = parse_date(date)?;
    let (clock, offset) = match rest.strip_suffix('Z') {
        Some(clock) => (clock, FixedOffset::east_opt(0)),
        None => split_offset(rest)?,
    };
    Ok((date.and_time(parse_clock(clock, text)?), offset))
}

fn parse_clock(clock: &str, text: &str) -> Result<NaiveTime, String> {
    let whole = clock.get(..8).unwrap_or(clock);
    if !has_shape(whole, "99:99:99") {
        return Err(format!("time in '{text}' is not in hh:mm:ss form"));
    }
    let fraction = &clock[whole.len()..];
    if !fraction.is_empty()
        && !(fraction.len() > 1
            && fraction.starts_with('.')
            && fraction[1..].bytes().all(|byte| byte.is_ascii_digit()))
    {
        return Err(format!("fractional seconds in '{text}' are malformed"));
    }
    NaiveTime::parse_from_str(clock, "%H:%M:%S%.f")
        .map_err(|_| format!("time in '{text}' is out of range"))
}

/// Splits a trailing `±hh:mm` offset off `text`.
fn split_offset(text: &str) -> Result<(&str, Option<FixedOffset>), String> {
    let Some(index) = text.rfind(['+', '-']) else {
        return Ok((text, None));
    };
    let (clock, offset) = text.split_at(index);
    let digits = &offset[1..];
    if !has_shape(digits, "99:99") {
        return Err(format!("time zone offset '{offset}' is not in ±hh:mm form"));
    }
    let hours: i32 = digits[..2].parse().map_err(|_| format!("bad offset '{offset}'"))?;
    let minutes: i32 = digits[3..].parse().map_err(|_| format!("bad offset '{offset}'"))?;
    if hours > 23 || minutes > 59 {
        return Err(format!("time zone offset '{offset}' is out of range"));
    }
    let seconds = (hours * 60 + minutes) * 60;
    let seconds = if offset.starts_with('-') { -seconds } else { seconds };
    Ok((clock, FixedOffset::east_opt(seconds)))
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expr, ExprKind};
    use crate::error::codes;
    use crate::parser::parse_expression;
    use crate::value::Value;
    use chrono::{NaiveDate, NaiveTime, Timelike};

    fn literal(source: &str) -> Value {
        match parse_expression(source) {
            Ok(Expr {
                kind: ExprKind::Literal(value),
                ..
            }) => value,
            other => panic!("expected a literal for {source:?}, got {other:?}"),
        }
    }

    fn error_code(source: &str) -> &'static str {
        match parse_expression(source) {
            Err(err) => err.code,
            Ok(expr) => panic!("expected {source:?} to fail, got {expr:?}"),
        }
    }

    #[test]
    fn scalar_literals() {
        assert_eq!(literal("42"), Value::Integer(42));
        assert_eq!(literal("1.50"), Value::Decimal("1.50".into()));
        assert_eq!(literal("1.5e3"), Value::Float(1500.0));
        assert_eq!(literal("'it''s'"), Value::String("it's".into()));
        assert_eq!(literal("X'0aFF'"), Value::Blob(vec![0x0a, 0xff]));
        assert_eq!(literal("missing"), Value::Missing);
        assert_eq!(literal("TRUE"), Value::Boolean(true));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(error_code("9223372036854775808"), codes::INVALID_LITERAL);
        assert_eq!(error_code("1e400"), codes::INVALID_LITERAL);
        assert_eq!(literal("9223372036854775807"), Value::Integer(i64::MAX));
    }

    #[test]
    fn most_negative_integer_is_a_single_literal() {
        assert_eq!(literal("-9223372036854775808"), Value::Integer(i64::MIN));
        assert_eq!(
            parse_expression("-9223372036854775808").ok().map(|expr| expr.span),
            Some(0..20)
        );
        assert_eq!(error_code("1 - 9223372036854775808"), codes::INVALID_LITERAL);
        assert!(matches!(
            parse_expression("-5").map(|expr| expr.kind),
            Ok(ExprKind::Unary(..))
        ));
    }

    #[test]
    fn odd_hex_digit_count_is_rejected() {
        assert_eq!(error_code("X'ABC'"), codes::MALFORMED_HEX_LITERAL);
    }

    #[test]
    fn embedded_literals_go_through_the_codec() {
        assert_eq!(literal("`[1, 2]`"), Value::List(vec![
            Value::Integer(1),
            Value::Integer(2)
        ]));
        assert_eq!(error_code("`{{ blob }}`"), codes::EMBEDDED_LITERAL);
    }

    #[test]
    fn dates_are_checked_against_the_calendar() {
        assert_eq!(
            literal("DATE '2024-02-29'"),
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(error_code("DATE '2023-02-29'"), codes::INVALID_LITERAL);
        assert_eq!(error_code("DATE '2023-2-1'"), codes::INVALID_LITERAL);
    }

    #[test]
    fn time_precision_and_zone() {
        let Value::Time(time) = literal("TIME (3) '12:30:05.125'") else {
            panic!("expected a time");
        };
        assert_eq!(time.precision, Some(3));
        assert_eq!(time.time.nanosecond(), 125_000_000);
        assert!(time.offset.is_none());

        let Value::Time(zoned) = literal("TIME WITH TIME ZONE '23:59:59-05:30'") else {
            panic!("expected a time");
        };
        assert_eq!(zoned.offset.map(|o| o.local_minus_utc()), Some(-19_800));

        let Value::Time(utc) = literal("TIME WITH TIME ZONE '08:00:00'") else {
            panic!("expected a time");
        };
        assert_eq!(utc.offset.map(|o| o.local_minus_utc()), Some(0));
    }

    #[test]
    fn malformed_times_are_rejected() {
        assert_eq!(error_code("TIME '24:00:00'"), codes::INVALID_LITERAL);
        assert_eq!(error_code("TIME '12:00:00+01:00'"), codes::INVALID_LITERAL);
        assert_eq!(error_code("TIME '12:00'"), codes::INVALID_LITERAL);
        assert_eq!(error_code("TIME (12) '12:00:00'"), codes::INVALID_LITERAL);
    }

    #[test]
    fn timestamps_accept_space_or_t() {
        let Value::Timestamp(plain) = literal("TIMESTAMP '2007-02-23 12:14:33.079'") else {
            panic!("expected a timestamp");
        };
        assert_eq!(
            plain.datetime.time(),
            NaiveTime::from_hms_milli_opt(12, 14, 33, 79).unwrap()
        );
        assert!(plain.offset.is_none());

        let Value::Timestamp(zoned) = literal("TIMESTAMP '2007-02-23T12:14:33Z'") else {
            panic!("expected a timestamp");
        };
        assert_eq!(zoned.offset.map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(error_code("TIMESTAMP '2007-02-23'"), codes::INVALID_LITERAL);
    }
}
