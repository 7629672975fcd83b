//! Lexer for V-lang using logos with string interning.
//!
//! [`lex`] never fails: malformed input becomes [`TokenKind::Error`] tokens
//! plus [`LexError`] records, and the stream always ends with `Eof`.

mod escape;
mod lex_error;
mod raw_token;

#[cfg(test)]
mod tests;

use logos::Logos;
use vlang_ir::{Span, StringInterner, Token, TokenKind, TokenList};

pub use escape::{cook_escapes, has_interpolation, split_template, TemplatePiece};
pub use lex_error::{LexError, LexErrorKind};

use raw_token::RawToken;

/// Tokens plus whatever went wrong producing them.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex source code into a [`TokenList`].
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    let mut output = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        match result {
            Ok(RawToken::OpenComment) => {
                let start = logos.span().start;
                output.errors.push(LexError::new(
                    LexErrorKind::UnterminatedComment,
                    Span::from_range(start..source.len()),
                ));
                break;
            }
            Ok(raw) => {
                let span = Span::from_range(logos.span());
                let kind = match convert_token(raw, logos.slice(), interner) {
                    Ok(kind) => kind,
                    Err((kind, offset)) => {
                        // Offsets are relative to the literal body, after the quote.
                        let at = span.start + 1 + u32::try_from(offset).unwrap_or(0);
                        let end = at.saturating_add(2).min(span.end);
                        output.errors.push(LexError::new(kind, Span::new(at, end)));
                        TokenKind::Error
                    }
                };
                output.tokens.push(Token::new(kind, span));
            }
            Err(()) => {
                let slice = logos.slice();
                let kind = if slice.starts_with('"') {
                    // Swallow the rest of the line so the body is not re-lexed.
                    let rest = logos.remainder();
                    logos.bump(rest.find('\n').unwrap_or(rest.len()));
                    LexErrorKind::UnterminatedString
                } else if slice.starts_with(|c: char| c.is_ascii_digit()) {
                    LexErrorKind::IntegerOverflow(slice.to_owned())
                } else {
                    LexErrorKind::UnexpectedChar(slice.chars().next().unwrap_or('\0'))
                };
                let span = Span::from_range(logos.span());
                output.errors.push(LexError::new(kind, span));
                output.tokens.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    let eof = u32::try_from(source.len()).unwrap_or(u32::MAX);
    output.tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    output
}

/// Convert a raw token to a [`TokenKind`], interning text.
fn convert_token(
    raw: RawToken,
    slice: &str,
    interner: &StringInterner,
) -> Result<TokenKind, (LexErrorKind, usize)> {
    let kind = match raw {
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::String => {
            let body = &slice[1..slice.len() - 1];
            if has_interpolation(body) {
                // Validate now so the error points at the literal; the
                // parser splits it again from the raw text.
                split_template(body)?;
                TokenKind::Template(interner.intern(body))
            } else {
                TokenKind::String(interner.intern(&cook_escapes(body)?))
            }
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Mut => TokenKind::Mut,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Struct => TokenKind::Struct,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::In => TokenKind::In,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Nil => TokenKind::Nil,

        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Bang => TokenKind::Bang,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::OpenComment => TokenKind::Error,
    };
    Ok(kind)
}
