//! Statement nodes.

use std::fmt;

use super::operators::{AssignOp, StepOp};
use super::ranges::{CaseRange, StmtRange};
use crate::{ExprId, FunctionId, Name, ParsedType, Span, Spanned, StmtId, StructId};

/// Statement node stored in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression evaluated for its effects.
    Expr(ExprId),

    /// `[mut] name [T] [= init]`.
    VarDecl {
        name: Name,
        name_span: Span,
        ty: Option<ParsedType>,
        init: Option<ExprId>,
        mutable: bool,
    },

    /// `place op value`.
    Assign {
        target: ExprId,
        op: AssignOp,
        value: ExprId,
    },

    /// `place++` / `place--`.
    Step { target: ExprId, op: StepOp },

    /// `if cond { then } else ...`; `else_branch` is another `If` or a `Block`.
    If {
        cond: ExprId,
        then_branch: StmtRange,
        else_branch: Option<StmtId>,
    },

    /// Braced statement list; only produced for `else { ... }`.
    Block(StmtRange),

    /// `switch scrutinee { case v: ... default: ... }`.
    Switch {
        scrutinee: ExprId,
        cases: CaseRange,
        default: Option<StmtRange>,
    },

    /// `while cond { }` and `for cond { }`.
    While { cond: ExprId, body: StmtRange },

    /// `for init; cond; step { }`.
    ForClassic {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<StmtId>,
        body: StmtRange,
    },

    /// `for [index,] value in iterable { }`.
    ForIn {
        index: Option<Name>,
        value: Name,
        iterable: ExprId,
        body: StmtRange,
    },

    Break,
    Continue,
    Return(Option<ExprId>),

    FnDecl(FunctionId),
    StructDecl(StructId),

    /// Placeholder left by parse error recovery.
    Error,
}

/// `case value: body` arm of a switch.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SwitchCase {
    pub value: ExprId,
    pub body: StmtRange,
    pub span: Span,
}
