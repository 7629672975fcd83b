//! Lexical errors.

use thiserror::Error;
use vlang_ir::Span;

/// What went wrong while tokenizing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("integer literal `{0}` does not fit in 64 bits")]
    IntegerOverflow(String),
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),
    #[error("malformed string interpolation: {0}")]
    BadInterpolation(String),
}

/// A lexical error with its location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}
