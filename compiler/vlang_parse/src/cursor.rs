//! Token cursor: position, lookahead and consumption.

use vlang_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

use crate::ParseError;

/// Cursor over a lexed token stream.
///
/// Reads past the end return the final `Eof` token, so lookahead never
/// needs bounds checks at call sites.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Index of the current token; compared before and after a parse step
    /// to detect progress.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn token_at(&self, pos: usize) -> Token {
        self.tokens
            .get(pos)
            .or_else(|| self.tokens.as_slice().last())
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.token_at(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the last consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            Span::DUMMY
        } else {
            self.token_at(self.pos - 1).span
        }
    }

    /// Kind of the token `offset` places ahead; `peek_kind(0)` is the
    /// current token.
    #[inline]
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.token_at(self.pos + offset).kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Whether the current token is of `kind`, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Consume the current token. At `Eof` the cursor stays put.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is of `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// "expected X, found Y" at the current token.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let found = self.current();
        ParseError::new(
            format!("expected {expected}, found {}", found.kind.describe()),
            found.span,
        )
    }
}
