//! Type names for `CAST` targets and `IS` operands.

use super::QueryParser;
use crate::ast::{Type, custom_type};
use crate::error::{ParseResult, codes};
use crate::lexer::token::TokenKind;

/// Largest length or precision accepted as a type parameter.
const MAX_TYPE_PARAMETER: u32 = i32::MAX as u32;

impl<'a> QueryParser<'a> {
    /// Parses a type name with its optional parameters.
    pub(crate) fn parse_type(&mut self) -> ParseResult<Type> {
        let kind = self.stream.current().kind.clone();
        if let TokenKind::Identifier(name) = &kind {
            let Some(ty) = custom_type(name) else {
                return Err(self
                    .stream
                    .error_here(codes::UNKNOWN_TYPE, format!("unknown type `{name}`")));
            };
            self.stream.advance();
            return Ok(ty);
        }

        let simple = match kind {
            TokenKind::Null => Some(Type::Null),
            TokenKind::Missing => Some(Type::Missing),
            TokenKind::Any => Some(Type::Any),
            TokenKind::Bool | TokenKind::Boolean => Some(Type::Boolean),
            TokenKind::Smallint | TokenKind::Int2 | TokenKind::Integer2 => Some(Type::Smallint),
            TokenKind::Int4 | TokenKind::Integer4 => Some(Type::Integer4),
            TokenKind::Int8 | TokenKind::Integer8 | TokenKind::Bigint => Some(Type::Integer8),
            TokenKind::Int | TokenKind::Integer => Some(Type::Integer),
            TokenKind::Real => Some(Type::Real),
            TokenKind::DoublePrecision => Some(Type::DoublePrecision),
            TokenKind::String => Some(Type::String),
            TokenKind::Symbol => Some(Type::Symbol),
            TokenKind::Clob => Some(Type::Clob),
            TokenKind::Blob => Some(Type::Blob),
            TokenKind::Date => Some(Type::Date),
            TokenKind::Struct => Some(Type::Struct),
            TokenKind::Tuple => Some(Type::Tuple),
            TokenKind::List => Some(Type::List),
            TokenKind::Bag => Some(Type::Bag),
            TokenKind::Sexp => Some(Type::Sexp),
            _ => None,
        };
        if let Some(ty) = simple {
            self.stream.advance();
            return Ok(ty);
        }

        match kind {
            TokenKind::Float => {
                self.stream.advance();
                Ok(Type::Float(self.parse_optional_length()?))
            }
            TokenKind::Decimal | TokenKind::Dec | TokenKind::Numeric => {
                self.stream.advance();
                let (precision, scale) = self.parse_precision_scale()?;
                Ok(if kind == TokenKind::Numeric {
                    Type::Numeric { precision, scale }
                } else {
                    Type::Decimal { precision, scale }
                })
            }
            TokenKind::Char | TokenKind::Character => {
                self.stream.advance();
                Ok(Type::Char(self.parse_optional_length()?))
            }
            TokenKind::Varchar | TokenKind::CharacterVarying => {
                self.stream.advance();
                Ok(Type::Varchar(self.parse_optional_length()?))
            }
            TokenKind::Time => {
                self.stream.advance();
                let (precision, with_time_zone) = self.parse_time_qualifiers()?;
                Ok(Type::Time {
                    precision,
                    with_time_zone,
                })
            }
            TokenKind::Timestamp => {
                self.stream.advance();
                Ok(Type::Timestamp(self.parse_optional_length()?))
            }
            _ => Err(self.stream.unexpected("a type name")),
        }
    }

    /// An unsigned integer type parameter no larger than `max`.
    pub(crate) fn parse_type_parameter(&mut self, max: u32) -> ParseResult<u32> {
        let TokenKind::IntegerLiteral(digits) = &self.stream.current().kind else {
            return Err(self.stream.unexpected("an integer type parameter"));
        };
        let value = match digits.parse::<u32>() {
            Ok(value) if value <= max => value,
            _ => {
                return Err(self.stream.error_here(
                    codes::INVALID_LITERAL,
                    format!("type parameter {digits} is out of range (at most {max})"),
                ));
            }
        };
        self.stream.advance();
        Ok(value)
    }

    fn parse_optional_length(&mut self) -> ParseResult<Option<u32>> {
        if !self.stream.consume(&TokenKind::LeftParen) {
            return Ok(None);
        }
        let length = self.parse_type_parameter(MAX_TYPE_PARAMETER)?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Some(length))
    }

    /// `[(precision [, scale])]`; the scale may not exceed the precision.
    fn parse_precision_scale(&mut self) -> ParseResult<(Option<u32>, Option<u32>)> {
        if !self.stream.consume(&TokenKind::LeftParen) {
            return Ok((None, None));
        }
        let precision = self.parse_type_parameter(MAX_TYPE_PARAMETER)?;
        let scale = if self.stream.consume(&TokenKind::Comma) {
            Some(self.parse_type_parameter(precision)?)
        } else {
            None
        };
        self.stream.expect(TokenKind::RightParen)?;
        Ok((Some(precision), scale))
    }
}
