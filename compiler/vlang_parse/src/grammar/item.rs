//! Function and struct declarations.

use vlang_ir::{FieldDecl, FunctionDecl, FunctionId, Param, StmtId, StmtKind, StructDecl, TokenKind};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_function_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let id = self.parse_function(false)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::FnDecl(id), span))
    }

    /// `fn name(params) [T] { body }`; the `mut` of a mutating method has
    /// already been consumed by the caller.
    fn parse_function(&mut self, is_mutating: bool) -> Result<FunctionId, ParseError> {
        self.in_error_context(ErrorContext::FunctionDecl, |p| {
            let start = p.cursor.expect(TokenKind::Fn)?.span;
            let (name, _) = p.cursor.expect_ident()?;
            let params = p.parse_params()?;
            let ret = if p.at_type_start() {
                Some(p.parse_type()?)
            } else {
                None
            };
            let body = p.parse_block()?;

            let span = start.merge(p.previous_span());
            Ok(p.arena.alloc_function(FunctionDecl {
                name,
                params,
                ret,
                body,
                is_mutating,
                span,
            }))
        })
    }

    /// `( [param (, param)*] )`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.in_error_context(ErrorContext::Params, |p| {
            p.cursor.expect(TokenKind::LParen)?;
            let mut params = Vec::new();
            while !p.check(TokenKind::RParen) {
                params.push(p.parse_param()?);
                if !p.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.cursor.expect(TokenKind::RParen)?;
            Ok(params)
        })
    }

    /// `[mut] [extern] name T`.
    ///
    /// Two identifiers followed by a type mean the first is the external
    /// label: `from start int` vs. `start Point`.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.current_span();
        let by_ref = self.cursor.eat(TokenKind::Mut);
        let (first, _) = self.cursor.expect_ident()?;

        let labeled = matches!(self.current_kind(), TokenKind::Ident(_))
            && matches!(
                self.cursor.peek_kind(1),
                TokenKind::Ident(_) | TokenKind::LBracket
            );
        let (extern_name, name) = if labeled {
            let (inner, _) = self.cursor.expect_ident()?;
            (Some(first), inner)
        } else {
            (None, first)
        };

        let ty = self.parse_type()?;
        Ok(Param {
            extern_name,
            name,
            ty,
            by_ref,
            span: start.merge(self.previous_span()),
        })
    }

    pub(crate) fn parse_struct_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.in_error_context(ErrorContext::StructDecl, |p| {
            let start = p.cursor.expect(TokenKind::Struct)?.span;
            let (name, _) = p.cursor.expect_ident()?;
            p.cursor.expect(TokenKind::LBrace)?;

            let mut fields = Vec::new();
            let mut methods = Vec::new();
            loop {
                p.skip_semicolons();
                match p.current_kind() {
                    TokenKind::RBrace | TokenKind::Eof => break,
                    TokenKind::Fn => methods.push(p.parse_function(false)?),
                    TokenKind::Mut => {
                        p.cursor.advance();
                        methods.push(p.parse_function(true)?);
                    }
                    _ => {
                        let field_start = p.current_span();
                        let ty = p.parse_type()?;
                        let (field, _) = p.cursor.expect_ident()?;
                        fields.push(FieldDecl {
                            name: field,
                            ty,
                            span: field_start.merge(p.previous_span()),
                        });
                    }
                }
            }
            p.cursor.expect(TokenKind::RBrace)?;

            let span = start.merge(p.previous_span());
            let id = p.arena.alloc_struct(StructDecl {
                name,
                fields,
                methods,
                span,
            });
            Ok(p.alloc_stmt(StmtKind::StructDecl(id), span))
        })
    }
}
