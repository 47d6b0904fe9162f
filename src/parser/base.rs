//! Token stream navigation shared by every parser module.
//!
//! All grammar code reads tokens through [`TokenStream`]; backtracking is a
//! matter of saving [`TokenStream::position`] and restoring it with
//! [`TokenStream::set_position`].

use crate::ast::Span;
use crate::error::{ParseResult, SyntaxError, codes};
use crate::lexer::keywords::{ContextualKeyword, contextual_keyword};
use crate::lexer::token::{Position, Token, TokenKind};

/// Cursor over a lexed token sequence.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Returned once the cursor runs past the last token.
    eof: Token,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream over `tokens`, which normally end with an EOF token.
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof = match tokens.last() {
            Some(last) => Token::new(
                TokenKind::Eof,
                last.span.end..last.span.end,
                "",
                last.position,
            ),
            None => Token::new(TokenKind::Eof, 0..0, "", Position::default()),
        };
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Returns the current token, or EOF past the end.
    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Returns the token after the current one.
    pub fn peek(&self) -> &Token {
        self.peek_nth(1)
    }

    /// Returns the token `n` places ahead of the current one.
    pub fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    /// Advances to the next token. Does nothing at EOF.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    pub fn at_eof(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    /// Consumes the current token if it is `kind`.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` and returns its span, or fails with
    /// "expected X, found Y".
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Builds an unexpected-token error at the current token.
    pub fn unexpected(&self, expected: &str) -> Box<SyntaxError> {
        let found = &self.current().kind;
        Box::new(
            SyntaxError::parser(
                codes::UNEXPECTED_TOKEN,
                format!("expected {expected}, found {found}"),
                self.current(),
            )
            .with_expected(expected),
        )
    }

    /// Builds a parser error with `code` at the current token.
    pub fn error_here(&self, code: &'static str, message: impl Into<String>) -> Box<SyntaxError> {
        Box::new(SyntaxError::parser(code, message, self.current()))
    }

    /// Builds an unsupported-construct error at the current token.
    pub fn unsupported_here(
        &self,
        code: &'static str,
        message: impl Into<String>,
    ) -> Box<SyntaxError> {
        Box::new(SyntaxError::unsupported(code, message, self.current()))
    }

    /// Returns true if the current token is an unquoted identifier spelling
    /// `keyword`.
    pub fn check_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.contextual_at(0) == Some(keyword)
    }

    /// Classifies the unquoted identifier `n` tokens ahead, if any.
    pub fn contextual_at(&self, n: usize) -> Option<ContextualKeyword> {
        match &self.peek_nth(n).kind {
            TokenKind::Identifier(name) => contextual_keyword(name),
            _ => None,
        }
    }

    pub fn consume_contextual(&mut self, keyword: ContextualKeyword) -> bool {
        if self.check_contextual(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current index into the token slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor, used for backtracking.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len().saturating_sub(1));
    }

    /// Returns the span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|pos| self.tokens.get(pos)) {
            Some(token) => token.span.clone(),
            None => self.current().span.clone(),
        }
    }

    /// Byte offset where the current token starts.
    pub fn start(&self) -> usize {
        self.current().offset()
    }

    /// Span from `start` to the end of the most recently consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        start..self.previous_span().end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).unwrap_or_else(|err| panic!("tokenize failed: {err}"))
    }

    #[test]
    fn navigation_and_lookahead() {
        let tokens = tokens("SELECT a FROM t");
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.current().kind, TokenKind::Select);
        assert_eq!(stream.peek().kind, TokenKind::Identifier("a".into()));
        assert_eq!(stream.peek_nth(2).kind, TokenKind::From);
        assert_eq!(stream.peek_nth(10).kind, TokenKind::Eof);

        stream.advance();
        assert_eq!(stream.current().kind, TokenKind::Identifier("a".into()));
        assert_eq!(stream.previous_span(), 0..6);
    }

    #[test]
    fn consume_only_matches_current_kind() {
        let tokens = tokens("SELECT a");
        let mut stream = TokenStream::new(&tokens);

        assert!(!stream.consume(&TokenKind::From));
        assert!(stream.consume(&TokenKind::Select));
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn expect_failure_reports_expected_and_found() {
        let tokens = tokens("SELECT a");
        let mut stream = TokenStream::new(&tokens);

        let Err(err) = stream.expect(TokenKind::From) else {
            panic!("expected an error");
        };
        assert_eq!(err.code, codes::UNEXPECTED_TOKEN);
        assert_eq!(err.expected.as_deref(), Some("FROM"));
        assert_eq!(err.token.as_deref(), Some("SELECT"));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn stays_at_eof() {
        let tokens = tokens("a");
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        stream.advance();
        stream.advance();
        assert!(stream.at_eof());
    }

    #[test]
    fn empty_slice_reads_as_eof() {
        let stream = TokenStream::new(&[]);
        assert!(stream.at_eof());
        assert_eq!(stream.previous_span(), 0..0);
    }

    #[test]
    fn contextual_keywords_only_match_unquoted_identifiers() {
        let tokens = tokens(r#"trail "trail""#);
        let mut stream = TokenStream::new(&tokens);

        assert!(stream.check_contextual(ContextualKeyword::Trail));
        assert!(stream.consume_contextual(ContextualKeyword::Trail));
        assert!(!stream.check_contextual(ContextualKeyword::Trail));
    }
}
