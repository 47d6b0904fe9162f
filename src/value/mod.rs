//! Literal values.
//!
//! [`Value`] is the payload of literal AST nodes: scalars (booleans, exact
//! and approximate numbers, strings, symbols, blobs, temporal values), the
//! two absent markers `NULL` and `MISSING`, and list/bag/sexp/struct
//! containers. Embedded literals are turned into values by a pluggable
//! [`LiteralCodec`].

mod codec;

pub use codec::{LiteralCodec, LiteralCodecError, TextLiteralCodec};

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use smol_str::SmolStr;
use std::fmt;

/// A literal value.
///
/// Equality is structural; floats compare with `f64` semantics, so `Value`
/// is `PartialEq` only.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Missing,
    Boolean(bool),
    Integer(i64),
    /// Exact decimal, kept as written (`1.50` keeps its scale).
    Decimal(SmolStr),
    Float(f64),
    String(SmolStr),
    Symbol(SmolStr),
    Blob(Vec<u8>),
    Date(NaiveDate),
    Time(TimeValue),
    Timestamp(TimestampValue),
    List(Vec<Value>),
    Bag(Vec<Value>),
    Sexp(Vec<Value>),
    Struct(Vec<(SmolStr, Value)>),
}

/// A `TIME` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub time: NaiveTime,
    /// Fractional-second precision given as `TIME (p)`.
    pub precision: Option<u32>,
    /// Present for `TIME WITH TIME ZONE`.
    pub offset: Option<FixedOffset>,
}

/// A `TIMESTAMP` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampValue {
    pub datetime: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Value {
    /// Short lowercase name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Missing => "missing",
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Blob(_) => "blob",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Bag(_) => "bag",
            Value::Sexp(_) => "sexp",
            Value::Struct(_) => "struct",
        }
    }

    /// Returns true for `NULL` and `MISSING`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Null | Value::Missing)
    }

    /// Decodes hexadecimal digits into a blob.
    pub fn blob_from_hex(digits: &str) -> Option<Value> {
        if digits.len() % 2 != 0 {
            return None;
        }
        (0..digits.len())
            .step_by(2)
            .map(|index| u8::from_str_radix(digits.get(index..index + 2)?, 16).ok())
            .collect::<Option<Vec<u8>>>()
            .map(Value::Blob)
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Value], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<FixedOffset>) -> fmt::Result {
    match offset {
        Some(offset) => write!(f, "{offset}"),
        None => Ok(()),
    }
}

/// Renders the value in query-literal syntax.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Missing => f.write_str("MISSING"),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(digits) => f.write_str(digits),
            Value::Float(value) => write!(f, "{value:e}"),
            Value::String(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Value::Symbol(text) => write!(f, "`{text}`"),
            Value::Blob(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            Value::Date(date) => write!(f, "DATE '{}'", date.format("%Y-%m-%d")),
            Value::Time(time) => {
                f.write_str("TIME ")?;
                if let Some(precision) = time.precision {
                    write!(f, "({precision}) ")?;
                }
                if time.offset.is_some() {
                    f.write_str("WITH TIME ZONE ")?;
                }
                write!(f, "'{}", time.time.format("%H:%M:%S%.f"))?;
                write_offset(f, time.offset)?;
                f.write_str("'")
            }
            Value::Timestamp(ts) => {
                write!(f, "TIMESTAMP '{}", ts.datetime.format("%Y-%m-%d %H:%M:%S%.f"))?;
                write_offset(f, ts.offset)?;
                f.write_str("'")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_sequence(f, items, ", ")?;
                f.write_str("]")
            }
            Value::Bag(items) => {
                f.write_str("<<")?;
                write_sequence(f, items, ", ")?;
                f.write_str(">>")
            }
            Value::Sexp(items) => {
                f.write_str("SEXP(")?;
                write_sequence(f, items, ", ")?;
                f.write_str(")")
            }
            Value::Struct(fields) => {
                f.write_str("{")?;
                for (index, (key, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_from_hex_decodes_pairs() {
        assert_eq!(
            Value::blob_from_hex("0aFF"),
            Some(Value::Blob(vec![0x0a, 0xff]))
        );
        assert_eq!(Value::blob_from_hex(""), Some(Value::Blob(vec![])));
        assert_eq!(Value::blob_from_hex("abc"), None);
        assert_eq!(Value::blob_from_hex("zz"), None);
    }

    #[test]
    fn display_uses_literal_syntax() {
        let value = Value::Struct(vec![
            ("a".into(), Value::List(vec![Value::Integer(1), Value::Null])),
            ("b".into(), Value::String("it's".into())),
        ]);
        assert_eq!(value.to_string(), "{'a': [1, NULL], 'b': 'it''s'}");
        assert_eq!(Value::Bag(vec![Value::Boolean(true)]).to_string(), "<<TRUE>>");
        assert_eq!(Value::Blob(vec![0x0a, 0xff]).to_string(), "X'0AFF'");
    }

    #[test]
    fn display_temporal_values() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::Date(date).to_string(), "DATE '2024-02-29'");

        let time = TimeValue {
            time: NaiveTime::from_hms_opt(23, 59, 1).unwrap(),
            precision: Some(2),
            offset: FixedOffset::east_opt(3600),
        };
        assert_eq!(
            Value::Time(time).to_string(),
            "TIME (2) WITH TIME ZONE '23:59:01+01:00'"
        );
    }

    #[test]
    fn absent_values() {
        assert!(Value::Null.is_absent());
        assert!(Value::Missing.is_absent());
        assert!(!Value::Integer(0).is_absent());
        assert_eq!(Value::Missing.type_name(), "missing");
    }
}
