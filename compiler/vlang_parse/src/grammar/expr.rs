//! Expressions: precedence climbing over [`BinaryOp::binding_power`],
//! then unary, postfix and primary forms.

use vlang_ir::{
    BaseType, BinaryOp, CallArg, CallArgRange, Expr, ExprId, ExprKind, FieldInit, Name, Span,
    TokenKind, UnaryOp,
};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.nested(|p| p.parse_binary(0))
    }

    /// Whether the current token can begin an expression.
    pub(crate) fn can_start_expr(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Template(_)
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Minus
                | TokenKind::Bang
        )
    }

    fn match_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current_kind() {
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    /// Left-associative binary operators binding tighter than `min_bp`.
    fn parse_binary(&mut self, min_bp: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary_op() {
            let bp = op.binding_power();
            if bp <= min_bp {
                break;
            }
            self.cursor.advance();
            let right = self.nested(|p| p.parse_binary(bp))?;
            let span = self.expr_span(left).merge(self.expr_span(right));
            left = self.alloc_expr(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.cursor.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(self.expr_span(operand));
        Ok(self.alloc_expr(ExprKind::Unary { op, operand }, span))
    }

    /// Calls, indexing, field access and method calls.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    let span = self.expr_span(expr).merge(self.previous_span());
                    expr = self.alloc_expr(ExprKind::Call { callee: expr, args }, span);
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.with_struct_literals(true, Self::parse_expr)?;
                    self.cursor.expect(TokenKind::RBracket)?;
                    let span = self.expr_span(expr).merge(self.previous_span());
                    expr = self.alloc_expr(
                        ExprKind::Index {
                            receiver: expr,
                            index,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (name, _) = self.cursor.expect_ident()?;
                    let kind = if self.check(TokenKind::LParen) {
                        let args = self.parse_call_args()?;
                        ExprKind::MethodCall {
                            receiver: expr,
                            method: name,
                            args,
                        }
                    } else {
                        ExprKind::Field {
                            receiver: expr,
                            field: name,
                        }
                    };
                    let span = self.expr_span(expr).merge(self.previous_span());
                    expr = self.alloc_expr(kind, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `( [arg (, arg)*] )` with `arg := [label:] [mut] expr`.
    fn parse_call_args(&mut self) -> Result<CallArgRange, ParseError> {
        self.in_error_context(ErrorContext::CallArgs, |p| {
            p.with_struct_literals(true, |p| {
                p.cursor.expect(TokenKind::LParen)?;
                let mut args = Vec::new();
                while !p.check(TokenKind::RParen) {
                    args.push(p.parse_call_arg()?);
                    if !p.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                p.cursor.expect(TokenKind::RParen)?;
                Ok(p.arena.alloc_call_args(args))
            })
        })
    }

    fn parse_call_arg(&mut self) -> Result<CallArg, ParseError> {
        let start = self.current_span();
        let label = match (self.current_kind(), self.cursor.peek_kind(1)) {
            (TokenKind::Ident(name), TokenKind::Colon) => {
                self.cursor.advance();
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };
        let by_ref = self.cursor.eat(TokenKind::Mut);
        let value = self.parse_expr()?;
        if by_ref && !self.arena.get_expr(value).kind.is_place() {
            return Err(ParseError::new(
                "`mut` argument must be a variable, field or index",
                self.expr_span(value),
            ));
        }
        Ok(CallArg {
            label,
            by_ref,
            value,
            span: start.merge(self.previous_span()),
        })
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Float(bits) => ExprKind::Float(bits),
            TokenKind::String(name) => ExprKind::String(name),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Nil => ExprKind::Nil,
            TokenKind::Template(raw) => {
                self.cursor.advance();
                return self.parse_template(raw, token.span);
            }
            TokenKind::Ident(name) => {
                if self.at_struct_literal() {
                    return self.parse_struct_literal(name);
                }
                ExprKind::Ident(name)
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.with_struct_literals(true, Self::parse_expr)?;
                self.cursor.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket if self.at_typed_collection() => {
                return self.parse_typed_collection();
            }
            TokenKind::LBracket => return self.parse_vector_literal(),
            _ => return Err(self.cursor.unexpected("expression")),
        };
        self.cursor.advance();
        Ok(self.alloc_expr(kind, token.span))
    }

    /// `[]T{` or `[][`; a bare `[]` is an empty untyped vector.
    fn at_typed_collection(&self) -> bool {
        if self.cursor.peek_kind(1) != TokenKind::RBracket {
            return false;
        }
        match self.cursor.peek_kind(2) {
            TokenKind::Ident(_) => self.cursor.peek_kind(3) == TokenKind::LBrace,
            TokenKind::LBracket => self.cursor.peek_kind(3) == TokenKind::RBracket,
            _ => false,
        }
    }

    /// `Name { field:` or `Name { }`, outside statement headers.
    fn at_struct_literal(&self) -> bool {
        if self.no_struct_literal || self.cursor.peek_kind(1) != TokenKind::LBrace {
            return false;
        }
        match self.cursor.peek_kind(2) {
            TokenKind::RBrace => true,
            TokenKind::Ident(_) => self.cursor.peek_kind(3) == TokenKind::Colon,
            _ => false,
        }
    }

    /// `Name { field: expr, ... }`.
    fn parse_struct_literal(&mut self, name: Name) -> Result<ExprId, ParseError> {
        self.in_error_context(ErrorContext::StructLiteral, |p| {
            let start = p.cursor.advance().span;
            p.cursor.expect(TokenKind::LBrace)?;
            let fields = p.with_struct_literals(true, |p| {
                let mut fields = Vec::new();
                while !p.check(TokenKind::RBrace) {
                    let (field, field_span) = p.cursor.expect_ident()?;
                    p.cursor.expect(TokenKind::Colon)?;
                    let value = p.parse_expr()?;
                    fields.push(FieldInit {
                        name: field,
                        value,
                        span: field_span.merge(p.previous_span()),
                    });
                    if !p.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                Ok::<_, ParseError>(fields)
            })?;
            p.cursor.expect(TokenKind::RBrace)?;

            let fields = p.arena.alloc_field_inits(fields);
            let span = start.merge(p.previous_span());
            Ok(p.alloc_expr(ExprKind::StructLit { name, fields }, span))
        })
    }

    /// `[a, b, c]`.
    fn parse_vector_literal(&mut self) -> Result<ExprId, ParseError> {
        self.in_error_context(ErrorContext::VectorLiteral, |p| {
            let start = p.cursor.expect(TokenKind::LBracket)?.span;
            let items = p.parse_expr_list(TokenKind::RBracket)?;
            p.cursor.expect(TokenKind::RBracket)?;
            let items = p.arena.alloc_expr_list(items);
            let span = start.merge(p.previous_span());
            Ok(p.alloc_expr(ExprKind::Vector { elem: None, items }, span))
        })
    }

    /// Comma-separated expressions up to (not including) `close`.
    fn parse_expr_list(&mut self, close: TokenKind) -> Result<Vec<ExprId>, ParseError> {
        self.with_struct_literals(true, |p| {
            let mut items = Vec::new();
            while !p.check(close) {
                items.push(p.parse_expr()?);
                if !p.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(items)
        })
    }

    /// `[]T{a, b}` or `[][]T{{a, b}, {c, d}}`.
    fn parse_typed_collection(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let ty = self.parse_type()?;
        if ty.dims == 2 {
            return self.in_error_context(ErrorContext::MatrixLiteral, |p| {
                p.parse_matrix_body(ty.base, start)
            });
        }
        self.in_error_context(ErrorContext::VectorLiteral, |p| {
            let items = p.parse_braced_items()?;
            let items = p.arena.alloc_expr_list(items);
            let span = start.merge(p.previous_span());
            Ok(p.alloc_expr(
                ExprKind::Vector {
                    elem: Some(ty.base),
                    items,
                },
                span,
            ))
        })
    }

    fn parse_braced_items(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let items = self.parse_expr_list(TokenKind::RBrace)?;
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(items)
    }

    /// Rows are `{...}` groups, or any vector-valued expression.
    fn parse_matrix_body(&mut self, elem: BaseType, start: Span) -> Result<ExprId, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut rows = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let row = if self.check(TokenKind::LBrace) {
                let row_start = self.current_span();
                let items = self.parse_braced_items()?;
                let items = self.arena.alloc_expr_list(items);
                let span = row_start.merge(self.previous_span());
                self.alloc_expr(
                    ExprKind::Vector {
                        elem: Some(elem),
                        items,
                    },
                    span,
                )
            } else {
                self.with_struct_literals(true, Self::parse_expr)?
            };
            rows.push(row);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;

        let rows = self.arena.alloc_expr_list(rows);
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::Matrix { elem, rows }, span))
    }
}
