//! Statement execution.

use vlang_ir::{
    AssignOp, CaseRange, ExprId, ExprKind, Name, ParsedType, Span, StepOp, StmtId, StmtKind,
    StmtRange,
};
use vlang_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::call_stack::{ExecResult, FrameId, FrameKind, Signal, Unwind};
use crate::environment::{Mutability, Variable};
use crate::errors::{
    cannot_infer, condition_not_bool, integer_overflow, invalid_unary_op, nested_declaration,
    not_iterable, type_mismatch, EvalResult, SignalKind,
};
use crate::symbols::SymbolKind;
use crate::value::{conform, Value, ValueType};

/// What a loop does after one pass of its body.
enum LoopControl {
    Next,
    Exit,
}

/// Sort the outcome of a loop body: signals aimed at `frame` steer the
/// loop, anything else keeps unwinding.
fn loop_control(outcome: Result<(), Signal>, frame: FrameId) -> Result<LoopControl, Signal> {
    match outcome {
        Ok(()) => Ok(LoopControl::Next),
        Err(Signal::Continue { frame: target }) if target == frame => Ok(LoopControl::Next),
        Err(Signal::Break { frame: target }) if target == frame => Ok(LoopControl::Exit),
        Err(signal) => Err(signal),
    }
}

/// Type a declaration takes from its initial value.
fn infer_type(value: &Value) -> EvalResult<ValueType> {
    match value.value_type() {
        ValueType::Vector(None) => Err(cannot_infer("empty vector")),
        ValueType::Nil => Err(cannot_infer("nil")),
        ValueType::Pointer => Err(cannot_infer("a reference")),
        ty => Ok(ty),
    }
}

impl Interpreter<'_> {
    /// Execute one statement.
    pub fn exec_stmt(&mut self, id: StmtId) -> ExecResult {
        let stmt = *self.arena.get_stmt(id);
        ensure_sufficient_stack(|| self.exec_stmt_kind(stmt.kind, stmt.span))
    }

    fn exec_stmt_kind(&mut self, kind: StmtKind, span: Span) -> ExecResult {
        match kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
            StmtKind::VarDecl {
                name,
                name_span,
                ty,
                init,
                mutable,
            } => {
                let mutability = if mutable {
                    Mutability::Mutable
                } else {
                    Mutability::Immutable
                };
                self.exec_var_decl(name, name_span, ty, init, mutability)?;
                Ok(())
            }
            StmtKind::Assign { target, op, value } => self.exec_assign(target, op, value),
            StmtKind::Step { target, op } => self.exec_step(target, op).map_err(Unwind::from),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.exec_if(cond, then_branch, else_branch),
            StmtKind::Block(body) => self
                .exec_block(body, self.names.else_branch)
                .map_err(Unwind::from),
            StmtKind::Switch {
                scrutinee,
                cases,
                default,
            } => self.exec_switch(scrutinee, cases, default, span),
            StmtKind::While { cond, body } => self.exec_while(cond, body, span),
            StmtKind::ForClassic {
                init,
                cond,
                step,
                body,
            } => self.exec_for_classic(init, cond, step, body, span),
            StmtKind::ForIn {
                index,
                value,
                iterable,
                body,
            } => self.exec_for_in(index, value, iterable, body, span),
            StmtKind::Break => {
                let frame = self.stack.target(SignalKind::Break)?;
                Err(Signal::Break { frame }.into())
            }
            StmtKind::Continue => {
                let frame = self.stack.target(SignalKind::Continue)?;
                Err(Signal::Continue { frame }.into())
            }
            StmtKind::Return(value) => {
                let frame = self.stack.target(SignalKind::Return)?;
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Err(Signal::Return { frame, value }.into())
            }
            // Registered by the declaration pass; only the placement is
            // checked here.
            StmtKind::FnDecl(_) if !self.env.is_global() => {
                Err(nested_declaration("function").with_span(span).into())
            }
            StmtKind::StructDecl(_) if !self.env.is_global() => {
                Err(nested_declaration("struct").with_span(span).into())
            }
            StmtKind::FnDecl(_) | StmtKind::StructDecl(_) | StmtKind::Error => Ok(()),
        }
    }

    /// Run a statement list in a fresh child scope.
    pub(crate) fn exec_block(&mut self, body: StmtRange, name: Name) -> Result<(), Signal> {
        let arena = self.arena;
        let stmts = arena.get_stmt_list(body);
        let mut scoped = self.scoped(name);
        scoped.exec_stmts(stmts)
    }

    pub(crate) fn eval_condition(&mut self, cond: ExprId) -> EvalResult<bool> {
        match self.eval_expr(cond)? {
            Value::Bool(b) => Ok(b),
            other => {
                let span = self.arena.get_expr(cond).span;
                Err(condition_not_bool(other.type_name(self.interner)).with_span(span))
            }
        }
    }

    // Declarations and assignment

    /// `[mut] name [T] [= init]`.
    ///
    /// A failing initialiser still declares the name (holding nil) so the
    /// statements after it report their own problems rather than
    /// "undefined variable".
    fn exec_var_decl(
        &mut self,
        name: Name,
        name_span: Span,
        ty: Option<ParsedType>,
        init: Option<ExprId>,
        mutability: Mutability,
    ) -> EvalResult<()> {
        let declared = match ty {
            Some(ty) => Some(self.resolve_type(ty).map_err(|e| e.with_span(name_span))?),
            None => None,
        };
        let value = match init.map(|expr| self.eval_expr(expr)) {
            Some(Ok(value)) => Some(value),
            Some(Err(error)) => {
                let ty = declared.unwrap_or(ValueType::Nil);
                let mut variable = Variable::new(name, ty, Value::Nil, mutability, name_span);
                variable.allow_nil = true;
                // The name may already exist; the original error wins.
                let _ = self.env.declare(variable);
                return Err(error);
            }
            None => None,
        };

        let ty = match (declared, &value) {
            (Some(ty), _) => ty,
            (None, Some(value)) => infer_type(value)?,
            (None, None) => return Err(cannot_infer("a declaration without a value")),
        };
        let value = match value {
            Some(value) => conform(value, ty, ty.allows_nil()).map_err(|v| {
                type_mismatch(self.type_name(ty), v.type_name(self.interner))
            })?,
            None => ty.default_value(),
        };

        let kind = if mutability.is_mutable() {
            SymbolKind::Variable
        } else {
            SymbolKind::Constant
        };
        self.declare_variable(Variable::new(name, ty, value, mutability, name_span), kind)?;
        Ok(())
    }

    /// `place = value`, `place += value`, `place -= value`.
    ///
    /// Plain assignment to a name that is not bound anywhere declares an
    /// immutable variable.
    fn exec_assign(&mut self, target: ExprId, op: AssignOp, value: ExprId) -> ExecResult {
        let target_expr = *self.arena.get_expr(target);
        if let (AssignOp::Assign, ExprKind::Ident(name)) = (op, target_expr.kind) {
            if self.env.lookup_binding(name).is_none() {
                let span = target_expr.span;
                self.exec_var_decl(name, span, None, Some(value), Mutability::Immutable)?;
                return Ok(());
            }
        }

        let place = self.resolve_place(target)?;
        let new_value = self.eval_expr(value)?;
        let new_value = match op.binary_op() {
            Some(binary) => {
                let current = self.read_place(&place)?;
                self.apply_binary(binary, &current, &new_value)?
            }
            None => new_value,
        };
        self.write_place(&place, new_value)
            .map_err(|e| e.or_span(target_expr.span))?;
        Ok(())
    }

    /// `place++` / `place--` on an int or float.
    fn exec_step(&mut self, target: ExprId, op: StepOp) -> EvalResult<()> {
        let place = self.resolve_place(target)?;
        let updated = match self.read_place(&place)? {
            Value::Int(i) => i
                .checked_add(op.delta())
                .map(Value::Int)
                .ok_or_else(|| integer_overflow(op.as_symbol()))?,
            #[allow(clippy::cast_precision_loss, reason = "delta is 1 or -1")]
            Value::Float(f) => Value::Float(f + op.delta() as f64),
            other => {
                return Err(invalid_unary_op(op.as_symbol(), other.type_name(self.interner)));
            }
        };
        self.write_place(&place, updated)
    }

    // Control flow

    fn exec_if(
        &mut self,
        cond: ExprId,
        then_branch: StmtRange,
        else_branch: Option<StmtId>,
    ) -> ExecResult {
        if self.eval_condition(cond)? {
            self.exec_block(then_branch, self.names.if_branch)?;
        } else if let Some(else_branch) = else_branch {
            self.exec_stmt(else_branch)?;
        }
        Ok(())
    }

    /// Run the first case whose value equals the scrutinee, else the
    /// default. Cases do not fall through; `break` leaves the switch.
    fn exec_switch(
        &mut self,
        scrutinee: ExprId,
        cases: CaseRange,
        default: Option<StmtRange>,
        span: Span,
    ) -> ExecResult {
        let value = self.eval_expr(scrutinee)?;
        let arena = self.arena;
        let cases = arena.get_cases(cases);
        let switch = self.names.switch;
        let case = self.names.case;

        let mut framed = self.framed(FrameKind::Switch, switch, span)?;
        let frame = framed.frame;
        let mut chosen = None;
        for arm in cases {
            if framed.eval_expr(arm.value)?.loosely_equals(&value) {
                chosen = Some(arm.body);
                break;
            }
        }
        let Some(body) = chosen.or(default) else {
            return Ok(());
        };
        match framed.exec_block(body, case) {
            Ok(()) => Ok(()),
            Err(Signal::Break { frame: target }) if target == frame => Ok(()),
            Err(signal) => Err(signal.into()),
        }
    }

    fn exec_while(&mut self, cond: ExprId, body: StmtRange, span: Span) -> ExecResult {
        let name = self.names.while_loop;
        let mut framed = self.framed(FrameKind::Loop, name, span)?;
        let frame = framed.frame;
        while framed.eval_condition(cond)? {
            let outcome = framed.exec_block(body, name);
            if let LoopControl::Exit = loop_control(outcome, frame)? {
                break;
            }
        }
        Ok(())
    }

    /// `for init; cond; step { body }`. The init variable lives in a scope
    /// around the whole loop; each pass of the body gets its own scope.
    fn exec_for_classic(
        &mut self,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<StmtId>,
        body: StmtRange,
        span: Span,
    ) -> ExecResult {
        let name = self.names.for_loop;
        let mut scoped = self.scoped(name);
        if let Some(init) = init {
            scoped.exec_stmt(init)?;
        }
        let mut framed = scoped.framed(FrameKind::Loop, name, span)?;
        let frame = framed.frame;
        loop {
            if let Some(cond) = cond {
                if !framed.eval_condition(cond)? {
                    break;
                }
            }
            let outcome = framed.exec_block(body, name);
            if let LoopControl::Exit = loop_control(outcome, frame)? {
                break;
            }
            if let Some(step) = step {
                framed.exec_stmt(step)?;
            }
        }
        Ok(())
    }

    /// `for [index,] value in iterable`. Vectors yield items, matrices
    /// yield rows and strings yield runes. The collection is copied before
    /// the first pass, so the body may modify the original freely.
    fn exec_for_in(
        &mut self,
        index: Option<Name>,
        value: Name,
        iterable: ExprId,
        body: StmtRange,
        span: Span,
    ) -> ExecResult {
        let (item_ty, items): (ValueType, Vec<Value>) = match self.eval_expr(iterable)? {
            Value::Vector(v) => (
                v.item.map_or(ValueType::Nil, ValueType::from_base),
                v.items,
            ),
            Value::Matrix(m) => (
                ValueType::Vector(Some(m.item)),
                m.rows.into_iter().map(Value::Vector).collect(),
            ),
            Value::Str(s) => (ValueType::Rune, s.chars().map(Value::Rune).collect()),
            other => {
                let span = self.arena.get_expr(iterable).span;
                return Err(not_iterable(other.type_name(self.interner))
                    .with_span(span)
                    .into());
            }
        };

        let name = self.names.for_loop;
        let arena = self.arena;
        let stmts = arena.get_stmt_list(body);
        let mut framed = self.framed(FrameKind::Loop, name, span)?;
        let frame = framed.frame;
        for (position, item) in items.into_iter().enumerate() {
            let outcome = {
                let mut scoped = framed.scoped(name);
                if let Some(index) = index {
                    let position = i64::try_from(position).unwrap_or(i64::MAX);
                    let variable = Variable::new(
                        index,
                        ValueType::Int,
                        Value::Int(position),
                        Mutability::Immutable,
                        span,
                    );
                    scoped.declare_variable(variable, SymbolKind::Constant)?;
                }
                let variable = Variable::new(value, item_ty, item, Mutability::Immutable, span);
                scoped.declare_variable(variable, SymbolKind::Constant)?;
                scoped.exec_stmts(stmts)
            };
            if let LoopControl::Exit = loop_control(outcome, frame)? {
                break;
            }
        }
        Ok(())
    }
}
