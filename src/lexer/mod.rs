//! Lexical analysis.
//!
//! Scanning happens in two passes. A `logos` scanner splits the input into
//! raw lexemes, skipping whitespace and comments and rejecting malformed
//! literals. A second pass cooks raw lexemes into [`Token`]s: it resolves
//! keywords, fuses multi-word keywords, unescapes quoted text, and attaches
//! 1-based line/column positions.

pub mod keywords;
pub mod token;

use crate::ast::Span;
use crate::error::{ParseResult, SyntaxError, codes};
use keywords::{lookup_keyword, multi_word_candidates};
use logos::Logos;
use smol_str::SmolStr;
use token::{Position, Token, TokenKind};
use tracing::{debug, trace};

/// Failure modes of the raw scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RawError {
    #[default]
    InvalidCharacter,
    UnterminatedString,
    UnterminatedQuotedIdentifier,
    UnterminatedComment,
    UnterminatedEmbedded,
    ExponentOverflow,
    MalformedExponent,
    MalformedHex,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r\n\f]+|--[^\r\n]*")]
enum RawToken {
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
    #[token("\"", quoted_identifier)]
    QuotedIdentifier,
    #[token("'", string_literal)]
    String,
    #[regex("[xX]'", hex_literal)]
    HexString,
    #[token("`", embedded_literal)]
    Embedded,

    #[regex(r"[0-9]+(\.[0-9]*)?")]
    #[regex(r"\.[0-9]+")]
    Exact,
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)[eE][+-]*[0-9]+", approximate_number)]
    Approximate,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("<<")]
    LeftDoubleAngle,
    #[token(">>")]
    RightDoubleAngle,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("||")]
    Concat,
    #[token("|")]
    Pipe,
    #[token("&")]
    Ampersand,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("<~")]
    LeftTilde,
    #[token("~>")]
    RightTilde,
    #[token("?")]
    Question,
    #[token("@")]
    AtSign,
}

/// Length (including the closing quote) of a quoted body whose opening quote
/// was already consumed. A doubled quote stands for one literal quote.
fn quoted_len(remainder: &str, quote: u8) -> Option<usize> {
    let bytes = remainder.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == quote {
            if bytes.get(index + 1) == Some(&quote) {
                index += 2;
                continue;
            }
            return Some(index + 1);
        }
        index += 1;
    }
    None
}

fn consume_quoted(
    lex: &mut logos::Lexer<RawToken>,
    quote: u8,
    unterminated: RawError,
) -> Result<(), RawError> {
    match quoted_len(lex.remainder(), quote) {
        Some(len) => {
            lex.bump(len);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(unterminated)
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(RawError::UnterminatedComment)
        }
    }
}

fn quoted_identifier(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    consume_quoted(lex, b'"', RawError::UnterminatedQuotedIdentifier)
}

fn string_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    consume_quoted(lex, b'\'', RawError::UnterminatedString)
}

fn embedded_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    match lex.remainder().find('`') {
        Some(end) => {
            lex.bump(end + 1);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(RawError::UnterminatedEmbedded)
        }
    }
}

fn hex_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    consume_quoted(lex, b'\'', RawError::UnterminatedString)?;
    let slice = lex.slice();
    let digits = &slice[2..slice.len() - 1];
    if digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(RawError::MalformedHex)
    }
}

/// Validates the exponent of a scientific-notation literal: one optional
/// sign, at least one digit, and a value within the `i32` range.
fn approximate_number(lex: &mut logos::Lexer<RawToken>) -> Result<(), RawError> {
    let slice = lex.slice();
    let Some(marker) = slice.find(['e', 'E']) else {
        return Err(RawError::MalformedExponent);
    };
    let exponent = &slice[marker + 1..];
    let digits = exponent.trim_start_matches(['+', '-']);
    if exponent.len() - digits.len() > 1 || digits.is_empty() {
        return Err(RawError::MalformedExponent);
    }
    exponent
        .parse::<i32>()
        .map(|_| ())
        .map_err(|_| RawError::ExponentOverflow)
}

/// Maps byte offsets to 1-based line/column positions.
///
/// `\n`, `\r` and `\r\n` each end one line.
#[derive(Debug, Clone)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        for (index, byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => starts.push(index + 1),
                b'\r' if bytes.get(index + 1) != Some(&b'\n') => starts.push(index + 1),
                _ => {}
            }
        }
        Self { starts }
    }

    fn position(&self, source: &str, offset: usize) -> Position {
        let line = self.starts.partition_point(|start| *start <= offset).max(1);
        let line_start = self.starts[line - 1];
        let column = source
            .get(line_start..offset)
            .map_or(0, |text| text.chars().count());
        Position {
            line,
            column: column + 1,
        }
    }
}

/// Converts source text into tokens terminated by [`TokenKind::Eof`].
pub struct Lexer<'s> {
    source: &'s str,
    lines: LineIndex,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
        }
    }

    /// Tokenizes the whole input, failing on the first malformed lexeme.
    pub fn tokenize(&self) -> ParseResult<Vec<Token>> {
        let mut scanner = RawToken::lexer(self.source);
        let mut raw = Vec::new();
        while let Some(result) = scanner.next() {
            let span = scanner.span();
            match result {
                Ok(RawToken::BlockComment) => {}
                Ok(kind) => raw.push((kind, span)),
                Err(error) => return Err(Box::new(self.raw_error(error, span))),
            }
        }

        let mut tokens = Vec::with_capacity(raw.len() + 1);
        let mut index = 0;
        while index < raw.len() {
            if let Some((kind, consumed)) = self.fuse(&raw[index..]) {
                let span = raw[index].1.start..raw[index + consumed - 1].1.end;
                trace!(keyword = %kind, words = consumed, "fused multi-word keyword");
                tokens.push(self.token(kind, span));
                index += consumed;
                continue;
            }
            let (kind, span) = &raw[index];
            tokens.push(self.token(self.cook(*kind, span), span.clone()));
            index += 1;
        }

        let end = self.source.len();
        tokens.push(self.token(TokenKind::Eof, end..end));
        debug!(bytes = end, tokens = tokens.len(), "tokenized input");
        Ok(tokens)
    }

    fn token(&self, kind: TokenKind, span: Span) -> Token {
        let text = SmolStr::new(&self.source[span.clone()]);
        let position = self.lines.position(self.source, span.start);
        Token::new(kind, span, text, position)
    }

    /// Tries to fuse the words at the start of `run` into one keyword.
    fn fuse(&self, run: &[(RawToken, Span)]) -> Option<(TokenKind, usize)> {
        let (RawToken::Word, first_span) = run.first()? else {
            return None;
        };
        let first = self.source[first_span.clone()].to_ascii_lowercase();
        multi_word_candidates(&first)
            .find(|(words, _)| {
                words.len() <= run.len()
                    && words
                        .iter()
                        .zip(run)
                        .skip(1)
                        .all(|(word, (kind, span))| {
                            *kind == RawToken::Word
                                && self.source[span.clone()].eq_ignore_ascii_case(word)
                        })
            })
            .map(|(words, kind)| (kind.clone(), words.len()))
    }

    fn cook(&self, raw: RawToken, span: &Span) -> TokenKind {
        let slice = &self.source[span.clone()];
        let body = || &slice[1..slice.len() - 1];
        match raw {
            RawToken::Word => {
                lookup_keyword(slice).unwrap_or_else(|| TokenKind::Identifier(slice.into()))
            }
            RawToken::QuotedIdentifier => {
                TokenKind::QuotedIdentifier(body().replace("\"\"", "\"").into())
            }
            RawToken::String => TokenKind::StringLiteral(body().replace("''", "'").into()),
            RawToken::HexString => TokenKind::ByteStringLiteral(slice[2..slice.len() - 1].into()),
            RawToken::Embedded => TokenKind::EmbeddedLiteral(body().into()),
            RawToken::Exact if slice.contains('.') => TokenKind::DecimalLiteral(slice.into()),
            RawToken::Exact => TokenKind::IntegerLiteral(slice.into()),
            RawToken::Approximate => TokenKind::FloatLiteral(slice.into()),
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::LeftBracket => TokenKind::LeftBracket,
            RawToken::RightBracket => TokenKind::RightBracket,
            RawToken::LeftBrace => TokenKind::LeftBrace,
            RawToken::RightBrace => TokenKind::RightBrace,
            RawToken::LeftDoubleAngle => TokenKind::LeftDoubleAngle,
            RawToken::RightDoubleAngle => TokenKind::RightDoubleAngle,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Star => TokenKind::Star,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Concat => TokenKind::Concat,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Ampersand => TokenKind::Ampersand,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Eq => TokenKind::Eq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::LeftTilde => TokenKind::LeftTilde,
            RawToken::RightTilde => TokenKind::RightTilde,
            RawToken::Question => TokenKind::Question,
            RawToken::AtSign => TokenKind::AtSign,
            // Dropped before cooking.
            RawToken::BlockComment => TokenKind::Eof,
        }
    }

    fn raw_error(&self, error: RawError, span: Span) -> SyntaxError {
        let position = self.lines.position(self.source, span.start);
        let slice = self.source.get(span.clone()).unwrap_or_default();
        let (code, message, help) = match error {
            RawError::InvalidCharacter => (
                codes::INVALID_CHARACTER,
                format!("unexpected character `{slice}`"),
                None,
            ),
            RawError::UnterminatedString => (
                codes::UNTERMINATED_STRING,
                "unterminated string literal".to_string(),
                Some("close the literal with `'`; write `''` for a quote inside it"),
            ),
            RawError::UnterminatedQuotedIdentifier => (
                codes::UNTERMINATED_QUOTED_IDENTIFIER,
                "unterminated quoted identifier".to_string(),
                Some("close the identifier with `\"`; write `\"\"` for a quote inside it"),
            ),
            RawError::UnterminatedComment => (
                codes::UNTERMINATED_COMMENT,
                "unterminated block comment".to_string(),
                Some("close the comment with `*/`"),
            ),
            RawError::UnterminatedEmbedded => (
                codes::UNTERMINATED_EMBEDDED_LITERAL,
                "unterminated embedded literal".to_string(),
                Some("close the literal with a backtick"),
            ),
            RawError::ExponentOverflow => (
                codes::EXPONENT_OVERFLOW,
                format!("exponent of numeric literal `{slice}` is out of range"),
                Some("exponents must fit in a 32-bit signed integer"),
            ),
            RawError::MalformedExponent => (
                codes::MALFORMED_EXPONENT,
                format!("malformed exponent in numeric literal `{slice}`"),
                Some("an exponent is `e` or `E`, at most one sign, then digits"),
            ),
            RawError::MalformedHex => (
                codes::MALFORMED_HEX_LITERAL,
                format!("malformed byte string literal `{slice}`"),
                Some("use an even number of hexadecimal digits"),
            ),
        };
        let mut error = SyntaxError::lexer(code, message, span, position);
        if !slice.is_empty() {
            error.token = Some(slice.into());
        }
        match help {
            Some(help) => error.with_help(help),
            None => error,
        }
    }
}

/// Tokenizes `source` into a token sequence ending in [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
