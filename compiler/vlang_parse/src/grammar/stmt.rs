//! Statements and blocks.

use vlang_ir::{
    AssignOp, ExprId, Span, StepOp, Stmt, StmtId, StmtKind, StmtRange, SwitchCase, TokenKind,
};

use crate::recovery::{self, TokenSet};
use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.nested(Self::parse_stmt_inner)
    }

    fn parse_stmt_inner(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::Mut if self.cursor.peek_kind(1) == TokenKind::Fn => Err(ParseError::new(
                "`mut fn` is only allowed inside a struct",
                self.current_span(),
            )),
            TokenKind::Mut => self.parse_var_decl(),
            TokenKind::Ident(_) if self.at_typed_decl() => self.parse_var_decl(),
            TokenKind::Fn => self.parse_function_stmt(),
            TokenKind::Struct => self.parse_struct_stmt(),
            TokenKind::If => self.in_error_context(ErrorContext::IfStatement, Self::parse_if),
            TokenKind::Switch => {
                self.in_error_context(ErrorContext::SwitchStatement, Self::parse_switch)
            }
            TokenKind::While => self.in_error_context(ErrorContext::WhileLoop, Self::parse_while),
            TokenKind::For => self.in_error_context(ErrorContext::ForLoop, Self::parse_for),
            TokenKind::Break => {
                let span = self.cursor.advance().span;
                Ok(self.alloc_stmt(StmtKind::Break, span))
            }
            TokenKind::Continue => {
                let span = self.cursor.advance().span;
                Ok(self.alloc_stmt(StmtKind::Continue, span))
            }
            TokenKind::Return => {
                self.in_error_context(ErrorContext::ReturnStatement, Self::parse_return)
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// `name T ...` or `name []T ...`: two identifiers in a row never start
    /// an expression statement.
    fn at_typed_decl(&self) -> bool {
        match self.cursor.peek_kind(1) {
            TokenKind::Ident(_) => true,
            TokenKind::LBracket => self.cursor.peek_kind(2) == TokenKind::RBracket,
            _ => false,
        }
    }

    /// `[mut] name [T] [= init]`.
    pub(crate) fn parse_var_decl(&mut self) -> Result<StmtId, ParseError> {
        self.in_error_context(ErrorContext::VarDecl, |p| {
            let start = p.current_span();
            let mutable = p.cursor.eat(TokenKind::Mut);
            let (name, name_span) = p.cursor.expect_ident()?;
            let ty = if p.at_type_start() {
                Some(p.parse_type()?)
            } else {
                None
            };
            let init = if p.cursor.eat(TokenKind::Eq) {
                Some(p.parse_expr()?)
            } else {
                None
            };

            let span = start.merge(p.previous_span());
            let text = p.interner().lookup(name);
            if ty.is_none() && init.is_none() {
                return Err(ParseError::new(
                    format!("declaration of '{text}' needs a type or an initial value"),
                    span,
                ));
            }
            if !mutable && init.is_none() {
                return Err(ParseError::new(
                    format!("constant '{text}' must be initialised"),
                    span,
                ));
            }

            Ok(p.alloc_stmt(
                StmtKind::VarDecl {
                    name,
                    name_span,
                    ty,
                    init,
                    mutable,
                },
                span,
            ))
        })
    }

    /// Expression statement, assignment, or `++`/`--`.
    fn parse_simple_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let expr = self.parse_expr()?;
        self.finish_simple_stmt(expr, start)
    }

    fn finish_simple_stmt(&mut self, expr: ExprId, start: Span) -> Result<StmtId, ParseError> {
        let assign_op = match self.current_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            _ => None,
        };
        let step_op = match self.current_kind() {
            TokenKind::PlusPlus => Some(StepOp::Increment),
            TokenKind::MinusMinus => Some(StepOp::Decrement),
            _ => None,
        };

        let kind = if let Some(op) = assign_op {
            self.in_error_context(ErrorContext::Assignment, |p| {
                let op_span = p.cursor.advance().span;
                p.require_place(expr, op.as_symbol(), op_span)?;
                let value = p.parse_expr()?;
                Ok(StmtKind::Assign {
                    target: expr,
                    op,
                    value,
                })
            })?
        } else if let Some(op) = step_op {
            let op_span = self.cursor.advance().span;
            self.require_place(expr, op.as_symbol(), op_span)?;
            StmtKind::Step { target: expr, op }
        } else {
            StmtKind::Expr(expr)
        };

        Ok(self.alloc_stmt(kind, start.merge(self.previous_span())))
    }

    fn require_place(&self, target: ExprId, op: &str, op_span: Span) -> Result<(), ParseError> {
        if self.arena.get_expr(target).kind.is_place() {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("left side of `{op}` must be a variable, field or index"),
                self.arena.get_expr(target).span.merge(op_span),
            ))
        }
    }

    /// `{ stmt* }`. Broken statements inside are recorded and skipped.
    pub(crate) fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let stmts = self.parse_stmts_until(recovery::STMT_BOUNDARY, |kind| {
            kind == TokenKind::RBrace
        });
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_stmt_list(stmts))
    }

    fn parse_stmts_until(
        &mut self,
        recovery_set: TokenSet,
        stop: impl Fn(TokenKind) -> bool,
    ) -> Vec<StmtId> {
        let mut stmts = Vec::new();
        loop {
            self.skip_semicolons();
            if self.is_at_end() || stop(self.current_kind()) {
                break;
            }
            let start = self.cursor.position();
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    self.errors.push(error);
                    self.recover(start, recovery_set);
                }
            }
        }
        stmts
    }

    /// Expression in a statement header, where `Name {` opens the body.
    pub(crate) fn parse_header_expr(&mut self) -> Result<ExprId, ParseError> {
        self.with_struct_literals(false, Self::parse_expr)
    }

    /// `if cond { } [else if ... | else { }]`.
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::If)?.span;
        let cond = self.parse_header_expr()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.cursor.eat(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(self.parse_if()?)
            } else {
                let block_start = self.current_span();
                let block = self.parse_block()?;
                let span = block_start.merge(self.previous_span());
                Some(self.alloc_stmt(StmtKind::Block(block), span))
            }
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `switch e { case v: ... default: ... }`.
    fn parse_switch(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Switch)?.span;
        let scrutinee = self.parse_header_expr()?;
        self.cursor.expect(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut default = None;
        loop {
            self.skip_semicolons();
            match self.current_kind() {
                TokenKind::Case => {
                    let case_start = self.cursor.advance().span;
                    let value = self.parse_expr()?;
                    self.cursor.expect(TokenKind::Colon)?;
                    let body = self.parse_case_body();
                    cases.push(SwitchCase {
                        value,
                        body,
                        span: case_start.merge(self.previous_span()),
                    });
                }
                TokenKind::Default => {
                    let default_span = self.cursor.advance().span;
                    self.cursor.expect(TokenKind::Colon)?;
                    let body = self.parse_case_body();
                    if default.is_some() {
                        self.errors.push(ParseError::new(
                            "switch has more than one `default`",
                            default_span,
                        ));
                    } else {
                        default = Some(body);
                    }
                }
                TokenKind::RBrace => break,
                _ => return Err(self.cursor.unexpected("`case`, `default` or `}`")),
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;

        let cases = self.arena.alloc_cases(cases);
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::Switch {
                scrutinee,
                cases,
                default,
            },
            span,
        ))
    }

    fn parse_case_body(&mut self) -> StmtRange {
        let stmts = self.parse_stmts_until(recovery::CASE_BOUNDARY, |kind| {
            matches!(
                kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace
            )
        });
        self.arena.alloc_stmt_list(stmts)
    }

    /// `while cond { }`.
    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::While)?.span;
        let cond = self.parse_header_expr()?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::While { cond, body }, span))
    }

    /// The four `for` shapes: `for v in e`, `for i, v in e`,
    /// `for init; cond; step`, and `for cond`.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::For)?.span;

        if let Some(stmt) = self.try_parse_for_in(start)? {
            return Ok(stmt);
        }

        let init = match self.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Mut => Some(self.with_struct_literals(false, Self::parse_var_decl)?),
            TokenKind::Ident(_) if self.at_typed_decl() => {
                Some(self.with_struct_literals(false, Self::parse_var_decl)?)
            }
            _ => {
                let expr_start = self.current_span();
                let expr = self.parse_header_expr()?;
                let is_stmt = matches!(
                    self.current_kind(),
                    TokenKind::Eq
                        | TokenKind::PlusEq
                        | TokenKind::MinusEq
                        | TokenKind::PlusPlus
                        | TokenKind::MinusMinus
                        | TokenKind::Semicolon
                );
                if !is_stmt {
                    // `for cond { }`
                    let body = self.parse_block()?;
                    let span = start.merge(self.previous_span());
                    return Ok(self.alloc_stmt(StmtKind::While { cond: expr, body }, span));
                }
                Some(self.with_struct_literals(false, |p| p.finish_simple_stmt(expr, expr_start))?)
            }
        };

        self.cursor.expect(TokenKind::Semicolon)?;
        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_header_expr()?)
        };
        self.cursor.expect(TokenKind::Semicolon)?;
        let step = if self.check(TokenKind::LBrace) {
            None
        } else {
            Some(self.with_struct_literals(false, Self::parse_simple_stmt)?)
        };
        let body = self.parse_block()?;

        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::ForClassic {
                init,
                cond,
                step,
                body,
            },
            span,
        ))
    }

    fn try_parse_for_in(&mut self, start: Span) -> Result<Option<StmtId>, ParseError> {
        let (index, value) = match (
            self.cursor.peek_kind(0),
            self.cursor.peek_kind(1),
            self.cursor.peek_kind(2),
            self.cursor.peek_kind(3),
        ) {
            (TokenKind::Ident(value), TokenKind::In, _, _) => {
                self.cursor.advance();
                (None, value)
            }
            (TokenKind::Ident(index), TokenKind::Comma, TokenKind::Ident(value), TokenKind::In) => {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
                (Some(index), value)
            }
            _ => return Ok(None),
        };
        self.cursor.expect(TokenKind::In)?;
        let iterable = self.parse_header_expr()?;
        let body = self.parse_block()?;

        let span = start.merge(self.previous_span());
        Ok(Some(self.alloc_stmt(
            StmtKind::ForIn {
                index,
                value,
                iterable,
                body,
            },
            span,
        )))
    }

    /// `return [expr]`.
    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Return)?.span;
        let value = if self.can_start_expr() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Return(value), span))
    }
}
