//! Token definitions shared by the lexer and the parser.

use std::fmt;

use crate::{Name, Span};

/// A lexed token.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds of V-lang.
///
/// Type names (`int`, `float`, ...) are plain identifiers; the parser
/// decides whether an identifier names a type from its position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Int(i64),
    /// Float literal stored as bits so the token stays `Eq + Hash`.
    Float(u64),
    /// String literal with escapes already processed.
    String(Name),
    /// String literal containing `$` interpolation, kept raw for the parser.
    Template(Name),
    Ident(Name),
    True,
    False,
    Nil,

    // Keywords
    Mut,
    Fn,
    Struct,
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    While,
    In,
    Break,
    Continue,
    Return,

    // Operators
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    PlusEq,
    MinusEq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Dot,
    Comma,
    Dollar,

    /// Unrecognized input; the lexer also records a diagnostic.
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable form used in "expected X, found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::String(_) | TokenKind::Template(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Nil => "`nil`",
            TokenKind::Mut => "`mut`",
            TokenKind::Fn => "`fn`",
            TokenKind::Struct => "`struct`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::Switch => "`switch`",
            TokenKind::Case => "`case`",
            TokenKind::Default => "`default`",
            TokenKind::For => "`for`",
            TokenKind::While => "`while`",
            TokenKind::In => "`in`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Return => "`return`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Eq => "`=`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Bang => "`!`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Dollar => "`$`",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }

    /// Dense discriminant index, below 64, for bitset token sets.
    pub const fn tag(self) -> u8 {
        match self {
            TokenKind::Int(_) => 0,
            TokenKind::Float(_) => 1,
            TokenKind::String(_) => 2,
            TokenKind::Template(_) => 3,
            TokenKind::Ident(_) => 4,
            TokenKind::True => 5,
            TokenKind::False => 6,
            TokenKind::Nil => 7,
            TokenKind::Mut => 8,
            TokenKind::Fn => 9,
            TokenKind::Struct => 10,
            TokenKind::If => 11,
            TokenKind::Else => 12,
            TokenKind::Switch => 13,
            TokenKind::Case => 14,
            TokenKind::Default => 15,
            TokenKind::For => 16,
            TokenKind::While => 17,
            TokenKind::In => 18,
            TokenKind::Break => 19,
            TokenKind::Continue => 20,
            TokenKind::Return => 21,
            TokenKind::PlusPlus => 22,
            TokenKind::MinusMinus => 23,
            TokenKind::Plus => 24,
            TokenKind::Minus => 25,
            TokenKind::Star => 26,
            TokenKind::Slash => 27,
            TokenKind::Percent => 28,
            TokenKind::Eq => 29,
            TokenKind::PlusEq => 30,
            TokenKind::MinusEq => 31,
            TokenKind::EqEq => 32,
            TokenKind::NotEq => 33,
            TokenKind::Lt => 34,
            TokenKind::LtEq => 35,
            TokenKind::Gt => 36,
            TokenKind::GtEq => 37,
            TokenKind::AmpAmp => 38,
            TokenKind::PipePipe => 39,
            TokenKind::Bang => 40,
            TokenKind::LParen => 41,
            TokenKind::RParen => 42,
            TokenKind::LBrace => 43,
            TokenKind::RBrace => 44,
            TokenKind::LBracket => 45,
            TokenKind::RBracket => 46,
            TokenKind::Semicolon => 47,
            TokenKind::Colon => 48,
            TokenKind::Dot => 49,
            TokenKind::Comma => 50,
            TokenKind::Dollar => 51,
            TokenKind::Error => 52,
            TokenKind::Eof => 53,
        }
    }

    /// Whether two kinds are the same variant, ignoring payloads.
    #[inline]
    pub fn same_kind(self, other: TokenKind) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Token stream produced by the lexer. Always terminated by `Eof`.
#[derive(Clone, Default, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
