//! Error recovery: token sets and resynchronization.

use vlang_ir::TokenKind;

use crate::cursor::Cursor;

/// Set of token kinds as a bitset over [`TokenKind::tag`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new() -> Self {
        TokenSet(0)
    }

    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1u64 << kind.tag()))
    }

    #[must_use]
    pub const fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u64 << kind.tag()) != 0
    }
}

/// Tokens that can begin a fresh statement, plus hard terminators.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Mut)
    .with(TokenKind::Fn)
    .with(TokenKind::Struct)
    .with(TokenKind::If)
    .with(TokenKind::Switch)
    .with(TokenKind::For)
    .with(TokenKind::While)
    .with(TokenKind::Break)
    .with(TokenKind::Continue)
    .with(TokenKind::Return)
    .with(TokenKind::Semicolon)
    .with(TokenKind::RBrace)
    .with(TokenKind::Eof);

/// Inside a switch body, arms also end a broken statement.
pub const CASE_BOUNDARY: TokenSet = STMT_BOUNDARY
    .with(TokenKind::Case)
    .with(TokenKind::Default);

/// Skip tokens until one in `set`. A `;` stopper is consumed.
pub fn synchronize(cursor: &mut Cursor<'_>, set: TokenSet) {
    while !set.contains(cursor.current_kind()) {
        cursor.advance();
    }
    cursor.eat(TokenKind::Semicolon);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_payload() {
        let set = TokenSet::new().with(TokenKind::Int(0));
        assert!(set.contains(TokenKind::Int(42)));
        assert!(!set.contains(TokenKind::Float(0)));
    }

    #[test]
    fn case_boundary_extends_statements() {
        assert!(CASE_BOUNDARY.contains(TokenKind::Case));
        assert!(CASE_BOUNDARY.contains(TokenKind::Return));
        assert!(!STMT_BOUNDARY.contains(TokenKind::Default));
        assert_eq!(STMT_BOUNDARY.union(CASE_BOUNDARY), CASE_BOUNDARY);
    }
}
