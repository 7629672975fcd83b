//! Contiguous storage for one module's parse tree.
//!
//! Every node lives in a flat `Vec`; parents hold indices or ranges into
//! these tables. The arena is built once by the parser and read-only during
//! evaluation.

use crate::ast::{
    CallArg, CallArgRange, CaseRange, Expr, ExprRange, FieldInit, FieldInitRange, FunctionDecl,
    Stmt, StmtRange, StructDecl, SwitchCase, TemplatePart, TemplatePartRange,
};
use crate::{ExprId, FunctionId, StmtId, StructId};

/// Flat parse-tree storage.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    stmt_lists: Vec<StmtId>,
    call_args: Vec<CallArg>,
    field_inits: Vec<FieldInit>,
    template_parts: Vec<TemplatePart>,
    cases: Vec<SwitchCase>,
    functions: Vec<FunctionDecl>,
    structs: Vec<StructDecl>,
}

/// Convert a table length to a `u32` index, saturating on absurd sizes.
#[inline]
fn to_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Start and length of the items appended since `start`.
#[inline]
fn span_of(start: usize, end: usize) -> (u32, u16) {
    (
        to_index(start),
        u16::try_from(end - start).unwrap_or(u16::MAX),
    )
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the tables from the source length (about one node per
    /// 16 bytes of source).
    pub fn with_capacity(source_len: usize) -> Self {
        let estimate = source_len / 16;
        ExprArena {
            exprs: Vec::with_capacity(estimate),
            expr_lists: Vec::with_capacity(estimate / 4),
            stmts: Vec::with_capacity(estimate / 4),
            stmt_lists: Vec::with_capacity(estimate / 4),
            call_args: Vec::with_capacity(estimate / 8),
            ..Self::default()
        }
    }

    // Expressions

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(ids);
        let (start, len) = span_of(start, self.expr_lists.len());
        ExprRange::new(start, len)
    }

    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let (start, end) = range.bounds();
        &self.expr_lists[start..end]
    }

    // Statements

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_index(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = self.stmt_lists.len();
        self.stmt_lists.extend(ids);
        let (start, len) = span_of(start, self.stmt_lists.len());
        StmtRange::new(start, len)
    }

    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        let (start, end) = range.bounds();
        &self.stmt_lists[start..end]
    }

    // Call arguments

    pub fn alloc_call_args(&mut self, args: impl IntoIterator<Item = CallArg>) -> CallArgRange {
        let start = self.call_args.len();
        self.call_args.extend(args);
        let (start, len) = span_of(start, self.call_args.len());
        CallArgRange::new(start, len)
    }

    pub fn get_call_args(&self, range: CallArgRange) -> &[CallArg] {
        let (start, end) = range.bounds();
        &self.call_args[start..end]
    }

    // Struct literal fields

    pub fn alloc_field_inits(
        &mut self,
        inits: impl IntoIterator<Item = FieldInit>,
    ) -> FieldInitRange {
        let start = self.field_inits.len();
        self.field_inits.extend(inits);
        let (start, len) = span_of(start, self.field_inits.len());
        FieldInitRange::new(start, len)
    }

    pub fn get_field_inits(&self, range: FieldInitRange) -> &[FieldInit] {
        let (start, end) = range.bounds();
        &self.field_inits[start..end]
    }

    // Interpolated strings

    pub fn alloc_template_parts(
        &mut self,
        parts: impl IntoIterator<Item = TemplatePart>,
    ) -> TemplatePartRange {
        let start = self.template_parts.len();
        self.template_parts.extend(parts);
        let (start, len) = span_of(start, self.template_parts.len());
        TemplatePartRange::new(start, len)
    }

    pub fn get_template_parts(&self, range: TemplatePartRange) -> &[TemplatePart] {
        let (start, end) = range.bounds();
        &self.template_parts[start..end]
    }

    // Switch cases

    pub fn alloc_cases(&mut self, cases: impl IntoIterator<Item = SwitchCase>) -> CaseRange {
        let start = self.cases.len();
        self.cases.extend(cases);
        let (start, len) = span_of(start, self.cases.len());
        CaseRange::new(start, len)
    }

    pub fn get_cases(&self, range: CaseRange) -> &[SwitchCase] {
        let (start, end) = range.bounds();
        &self.cases[start..end]
    }

    // Declarations

    pub fn alloc_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId::new(to_index(self.functions.len()));
        self.functions.push(decl);
        id
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.index()]
    }

    pub fn alloc_struct(&mut self, decl: StructDecl) -> StructId {
        let id = StructId::new(to_index(self.structs.len()));
        self.structs.push(decl);
        id
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_struct(&self, id: StructId) -> &StructDecl {
        &self.structs[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::Span;

    #[test]
    fn expr_lists_are_independent() {
        let mut arena = ExprArena::new();
        let a = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::new(0, 1)));
        let b = arena.alloc_expr(Expr::new(ExprKind::Int(2), Span::new(2, 3)));
        let c = arena.alloc_expr(Expr::new(ExprKind::Nil, Span::new(4, 7)));

        let first = arena.alloc_expr_list([a, b]);
        let second = arena.alloc_expr_list([c]);

        assert_eq!(arena.get_expr_list(first), &[a, b]);
        assert_eq!(arena.get_expr_list(second), &[c]);
        assert_eq!(arena.expr_count(), 3);
        assert!(matches!(arena.get_expr(b).kind, ExprKind::Int(2)));
    }

    #[test]
    fn empty_list_round_trips() {
        let mut arena = ExprArena::new();
        let range = arena.alloc_stmt_list([]);
        assert!(range.is_empty());
        assert!(arena.get_stmt_list(range).is_empty());
    }
}
