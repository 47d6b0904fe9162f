//! Pluggable decoding of embedded (backtick-quoted) literals.

use super::Value;
use smol_str::SmolStr;

/// Error produced by a [`LiteralCodec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at offset {offset})")]
pub struct LiteralCodecError {
    pub message: String,
    /// Byte offset into the literal body.
    pub offset: usize,
}

impl LiteralCodecError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Decodes the body of an embedded literal into a [`Value`].
///
/// Codecs are shared by reference across parse calls and threads.
pub trait LiteralCodec: Send + Sync {
    fn parse_literal(&self, text: &str) -> Result<Value, LiteralCodecError>;
}

/// Built-in codec for a small text subset of the embedded-literal syntax.
///
/// Understood forms: `null` and typed nulls (`null.int`), `true`/`false`,
/// integers, decimals (`1.5`), floats (`1.5e0`), `"strings"` with
/// backslash escapes, `'symbols'` and bare symbols, `[a, b]` lists,
/// `(a b)` s-expressions and `{key: value}` structs. Anything else is
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLiteralCodec;

impl LiteralCodec for TextLiteralCodec {
    fn parse_literal(&self, text: &str) -> Result<Value, LiteralCodecError> {
        let mut reader = Reader { text, pos: 0 };
        let value = reader.value()?;
        reader.skip_whitespace();
        if reader.pos < text.len() {
            return Err(LiteralCodecError::new("trailing content", reader.pos));
        }
        Ok(value)
    }
}

struct Reader<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Reader<'t> {
    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralCodecError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            _ => Err(LiteralCodecError::new(
                format!("expected `{expected}`"),
                self.pos,
            )),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralCodecError> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            None => Err(LiteralCodecError::new("unexpected end of literal", start)),
            Some('"') => self.quoted('"').map(Value::String),
            Some('\'') => self.quoted('\'').map(Value::Symbol),
            Some('[') => self.sequence('[', ']', true).map(Value::List),
            Some('(') => self.sequence('(', ')', false).map(Value::Sexp),
            Some('{') => self.structure(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => self.word(),
            Some(c) => Err(LiteralCodecError::new(
                format!("unsupported literal syntax starting with `{c}`"),
                start,
            )),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<SmolStr, LiteralCodecError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralCodecError::new("unterminated quoted text", start)),
                Some(c) if c == quote => return Ok(out.into()),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '"' | '\'' | '/')) => c,
                        _ => return Err(LiteralCodecError::new("invalid escape", self.pos)),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn sequence(
        &mut self,
        open: char,
        close: char,
        comma_separated: bool,
    ) -> Result<Vec<Value>, LiteralCodecError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            if comma_separated && !items.is_empty() {
                self.expect(',')?;
            }
            items.push(self.value()?);
        }
    }

    fn structure(&mut self) -> Result<Value, LiteralCodecError> {
        self.expect('{')?;
        let mut fields = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Struct(fields));
            }
            if !fields.is_empty() {
                self.expect(',')?;
                self.skip_whitespace();
            }
            let key = match self.value()? {
                Value::String(key) | Value::Symbol(key) => key,
                other => {
                    return Err(LiteralCodecError::new(
                        format!("struct key must be text, found {}", other.type_name()),
                        self.pos,
                    ));
                }
            };
            self.expect(':')?;
            fields.push((key, self.value()?));
        }
    }

    fn number(&mut self) -> Result<Value, LiteralCodecError> {
        let start = self.pos;
        let end = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')))
            .map_or(self.text.len(), |len| start + len);
        let digits = &self.text[start..end];
        self.pos = end;

        let invalid = || LiteralCodecError::new(format!("invalid number `{digits}`"), start);
        if digits.contains(['e', 'E']) {
            digits.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else if digits.contains('.') {
            digits.parse::<f64>().map_err(|_| invalid())?;
            Ok(Value::Decimal(digits.into()))
        } else {
            digits.parse::<i64>().map(Value::Integer).map_err(|_| invalid())
        }
    }

    fn word(&mut self) -> Result<Value, LiteralCodecError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
        {
            self.bump();
        }
        let word = &self.text[start..self.pos];
        Ok(match word {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            "null" => Value::Null,
            _ if word.starts_with("null.") => Value::Null,
            _ if word.contains('.') => {
                return Err(LiteralCodecError::new(
                    format!("unsupported annotation or symbol `{word}`"),
                    start,
                ));
            }
            _ => Value::Symbol(word.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        TextLiteralCodec
            .parse_literal(text)
            .unwrap_or_else(|err| panic!("{text:?}: {err}"))
    }

    #[test]
    fn scalars() {
        assert_eq!(parse("null"), Value::Null);
        assert_eq!(parse("null.int"), Value::Null);
        assert_eq!(parse(" true "), Value::Boolean(true));
        assert_eq!(parse("-42"), Value::Integer(-42));
        assert_eq!(parse("1.50"), Value::Decimal("1.50".into()));
        assert_eq!(parse("1.5e0"), Value::Float(1.5));
        assert_eq!(parse(r#""a\"b""#), Value::String("a\"b".into()));
        assert_eq!(parse("'sym bol'"), Value::Symbol("sym bol".into()));
        assert_eq!(parse("abc"), Value::Symbol("abc".into()));
    }

    #[test]
    fn containers() {
        assert_eq!(
            parse("{a: [1, 2], 'b': (x 1)}"),
            Value::Struct(vec![
                (
                    "a".into(),
                    Value::List(vec![Value::Integer(1), Value::Integer(2)])
                ),
                (
                    "b".into(),
                    Value::Sexp(vec![Value::Symbol("x".into()), Value::Integer(1)])
                ),
            ])
        );
        assert_eq!(parse("[]"), Value::List(vec![]));
    }

    #[test]
    fn rejects_unsupported_forms() {
        for text in ["{{aGVsbG8=}}", "2020-01-01T", "1 2", "\"open", "[1 2]", "a::b"] {
            assert!(TextLiteralCodec.parse_literal(text).is_err(), "{text}");
        }
    }
}
