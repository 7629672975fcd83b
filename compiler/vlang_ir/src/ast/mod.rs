//! Parse tree consumed by the evaluator.

mod expr;
mod items;
mod operators;
mod ranges;
mod stmt;

pub use expr::{CallArg, Expr, ExprKind, FieldInit, TemplatePart};
pub use items::{FieldDecl, FunctionDecl, Module, Param, StructDecl};
pub use operators::{AssignOp, BinaryOp, StepOp, UnaryOp};
pub use ranges::{
    CallArgRange, CaseRange, ExprRange, FieldInitRange, StmtRange, TemplatePartRange,
};
pub use stmt::{Stmt, StmtKind, SwitchCase};
