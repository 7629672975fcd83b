//! Expression nodes.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use super::ranges::{CallArgRange, ExprRange, FieldInitRange, TemplatePartRange};
use crate::{BaseType, ExprId, Name, Span, Spanned};

/// Expression node stored in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression variants.
///
/// Children are arena indices, so every variant is `Copy`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Int(i64),
    /// Float literal as bits.
    Float(u64),
    /// String literal; a single-character literal evaluates to a rune.
    String(Name),
    Bool(bool),
    Nil,

    /// String literal with `$name` / `${path}` holes.
    Template(TemplatePartRange),

    /// Variable, function or builtin reference.
    Ident(Name),

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// `callee(args)`.
    Call {
        callee: ExprId,
        args: CallArgRange,
    },

    /// `receiver.method(args)`.
    MethodCall {
        receiver: ExprId,
        method: Name,
        args: CallArgRange,
    },

    /// `receiver.field`.
    Field {
        receiver: ExprId,
        field: Name,
    },

    /// `receiver[index]`.
    Index {
        receiver: ExprId,
        index: ExprId,
    },

    /// `[a, b]` (untyped) or `[]T{a, b}` (typed).
    Vector {
        elem: Option<BaseType>,
        items: ExprRange,
    },

    /// `[][]T{{a, b}, {c, d}}`; each row is a `Vector` expression.
    Matrix {
        elem: BaseType,
        rows: ExprRange,
    },

    /// `Name{field: value, ...}`.
    StructLit {
        name: Name,
        fields: FieldInitRange,
    },

    /// Placeholder left by parse error recovery.
    Error,
}

impl ExprKind {
    /// Whether this expression can designate a storage location.
    pub fn is_place(self) -> bool {
        matches!(
            self,
            ExprKind::Ident(_) | ExprKind::Field { .. } | ExprKind::Index { .. }
        )
    }
}

/// One argument of a call: `expr`, `label: expr`, `mut place`,
/// or `label: mut place`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallArg {
    pub label: Option<Name>,
    pub by_ref: bool,
    pub value: ExprId,
    pub span: Span,
}

/// `field: value` inside a struct literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Piece of an interpolated string.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TemplatePart {
    /// Literal text, escapes already processed.
    Text(Name),
    /// A hole; `raw` is the source spelling (`$name` / `${a.b}`) kept for
    /// error recovery.
    Hole { expr: ExprId, raw: Name },
}
