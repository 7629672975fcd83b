//! Function and struct declarations.

use super::ranges::StmtRange;
use crate::{FunctionId, Name, ParsedType, Span, StmtId};

/// Function parameter: `[mut] [extern] name T`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    /// Required call-site label; `None` means positional (or keyword by `name`).
    pub extern_name: Option<Name>,
    pub name: Name,
    pub ty: ParsedType,
    /// `mut` parameters alias the caller's variable.
    pub by_ref: bool,
    pub span: Span,
}

/// `fn name(params) [T] { body }`, either global or inside a struct.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub params: Vec<Param>,
    /// `None` for functions that return nothing.
    pub ret: Option<ParsedType>,
    pub body: StmtRange,
    /// `mut fn` inside a struct: may assign the receiver's fields.
    pub is_mutating: bool,
    pub span: Span,
}

/// `T name` field line of a struct declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: ParsedType,
    pub span: Span,
}

/// `struct Name { fields; methods }`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructDecl {
    pub name: Name,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FunctionId>,
    pub span: Span,
}

/// A parsed source file: its top-level statements in order.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Module {
    pub stmts: Vec<StmtId>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }
}
