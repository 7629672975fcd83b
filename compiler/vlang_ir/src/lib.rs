//! Shared data structures for the V-lang runtime.
//!
//! - [`Span`] source locations and the [`Spanned`] trait
//! - [`Name`] handles from the [`StringInterner`]
//! - [`Token`]/[`TokenKind`]/[`TokenList`] exchanged between lexer and parser
//! - the flat parse tree: [`ExprArena`] with [`ExprId`]/[`StmtId`] indices
//!
//! The parse tree is the evaluator's input contract; every [`ExprKind`] and
//! [`StmtKind`] variant has a handler in `vlang_eval`.

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
mod parsed_type;
mod span;
mod token;

pub use arena::ExprArena;
pub use ast::{
    AssignOp, BinaryOp, CallArg, CallArgRange, CaseRange, Expr, ExprKind, ExprRange, FieldDecl,
    FieldInit, FieldInitRange, FunctionDecl, Module, Param, StepOp, Stmt, StmtKind, StmtRange,
    StructDecl, SwitchCase, TemplatePart, TemplatePartRange, UnaryOp,
};
pub use expr_id::{ExprId, FunctionId, StmtId, StructId};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use parsed_type::{BaseType, ParsedType};
pub use span::{Span, Spanned};
pub use token::{Token, TokenKind, TokenList};
