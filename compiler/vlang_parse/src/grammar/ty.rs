//! Type annotations: `T`, `[]T`, `[][]T`.

use vlang_ir::{BaseType, ParsedType, TokenKind};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Whether a type annotation starts here.
    ///
    /// A bare identifier counts; callers only ask in positions where an
    /// identifier cannot mean anything else.
    pub(crate) fn at_type_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_) => true,
            TokenKind::LBracket => self.cursor.peek_kind(1) == TokenKind::RBracket,
            _ => false,
        }
    }

    pub(crate) fn parse_type(&mut self) -> Result<ParsedType, ParseError> {
        self.in_error_context(ErrorContext::Type, |p| {
            let start = p.current_span();
            let mut dims: u8 = 0;
            while p.check(TokenKind::LBracket) {
                p.cursor.advance();
                p.cursor.expect(TokenKind::RBracket)?;
                dims = dims.saturating_add(1);
            }
            if dims > ParsedType::MAX_DIMS {
                return Err(ParseError::new(
                    "vectors nest at most two levels (`[][]T`)",
                    start.merge(p.previous_span()),
                ));
            }
            let base = p.parse_base_type()?;
            Ok(ParsedType { base, dims })
        })
    }

    pub(crate) fn parse_base_type(&mut self) -> Result<BaseType, ParseError> {
        let (name, _) = self.cursor.expect_ident()?;
        let text = self.interner().lookup(name);
        Ok(BaseType::from_keyword(text).unwrap_or(BaseType::Named(name)))
    }
}
