//! Declaration pass.
//!
//! Every top-level struct and function is registered in the global scope
//! before the first statement runs, so code may call functions and build
//! structs declared further down the file. Signatures are checked once all
//! names are known, which lets structs refer to each other in any order.

use vlang_ir::{FunctionDecl, FunctionId, Module, Span, StmtKind, StructId};

use crate::errors::{already_declared, builtin_redeclared};
use crate::interpreter::Interpreter;
use crate::symbols::SymbolKind;
use crate::value::ValueType;

impl Interpreter<'_> {
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn register_declarations(&mut self, module: &Module) {
        let arena = self.arena;
        let decls: Vec<(StmtKind, Span)> = module
            .stmts
            .iter()
            .map(|&id| {
                let stmt = arena.get_stmt(id);
                (stmt.kind, stmt.span)
            })
            .collect();

        // Structs first: function signatures may name them.
        let mut registered = Vec::with_capacity(decls.len());
        for &(kind, span) in &decls {
            if let StmtKind::StructDecl(id) = kind {
                if self.register_struct(id, span) {
                    registered.push(kind);
                }
            }
        }
        for &(kind, span) in &decls {
            if let StmtKind::FnDecl(id) = kind {
                if self.register_function(id, span) {
                    registered.push(kind);
                }
            }
        }

        let global = self.text(self.names.global);
        for kind in &registered {
            match *kind {
                StmtKind::StructDecl(id) => self.check_struct(id),
                StmtKind::FnDecl(id) => self.check_signature(id, global),
                _ => {}
            }
        }
        tracing::debug!(declarations = registered.len(), "declarations registered");
    }

    fn register_struct(&mut self, id: StructId, span: Span) -> bool {
        let arena = self.arena;
        let decl = arena.get_struct(id);
        let name = self.text(decl.name);
        if self.builtins.contains(decl.name) {
            self.report(builtin_redeclared(name), span);
            return false;
        }
        if self.env.declare_struct(decl.name, id).is_err() {
            self.report(already_declared("struct", name), span);
            return false;
        }
        self.record_symbol(decl.name, SymbolKind::Struct, "struct".to_owned(), decl.span);
        true
    }

    fn register_function(&mut self, id: FunctionId, span: Span) -> bool {
        let arena = self.arena;
        let decl = arena.get_function(id);
        let name = self.text(decl.name);
        if self.builtins.contains(decl.name) {
            self.report(builtin_redeclared(name), span);
            return false;
        }
        if self.env.declare_function(decl.name, id).is_err() {
            self.report(already_declared("function", name), span);
            return false;
        }
        let signature = self.signature(decl);
        self.record_symbol(decl.name, SymbolKind::Function, signature, decl.span);
        true
    }

    /// Field types must name known types; field and method names must be
    /// unique within the struct.
    fn check_struct(&mut self, id: StructId) {
        let arena = self.arena;
        let decl = arena.get_struct(id);
        let struct_name = self.text(decl.name);

        for (i, field) in decl.fields.iter().enumerate() {
            if decl.fields[..i].iter().any(|f| f.name == field.name) {
                let error = already_declared("field", self.text(field.name));
                self.report(error, field.span);
            }
            if let Err(error) = self.resolve_type(field.ty) {
                self.report(error, field.span);
            }
        }

        let scope = format!("{}/{struct_name}", self.text(self.names.global));
        for (i, &method) in decl.methods.iter().enumerate() {
            let method_decl = arena.get_function(method);
            let duplicate = decl.methods[..i]
                .iter()
                .any(|&m| arena.get_function(m).name == method_decl.name);
            if duplicate {
                let error = already_declared("method", self.text(method_decl.name));
                self.report(error, method_decl.span);
                continue;
            }
            let signature = self.signature(method_decl);
            self.record_symbol_in(
                method_decl.name,
                SymbolKind::Function,
                signature,
                scope.clone(),
                method_decl.span,
            );
            self.check_signature(method, &scope);
        }
    }

    /// Parameter and return types must exist and parameter names must be
    /// unique. Parameters are listed in the symbol report here, once per
    /// declaration rather than once per call.
    fn check_signature(&mut self, id: FunctionId, scope: &str) {
        let arena = self.arena;
        let decl = arena.get_function(id);
        let param_scope = format!("{scope}/{}", self.text(decl.name));

        for (i, param) in decl.params.iter().enumerate() {
            if decl.params[..i].iter().any(|p| p.name == param.name) {
                let error = already_declared("parameter", self.text(param.name));
                self.report(error, param.span);
                continue;
            }
            match self.resolve_type(param.ty) {
                Ok(ty) => self.record_symbol_in(
                    param.name,
                    SymbolKind::Parameter,
                    self.type_name(ty),
                    param_scope.clone(),
                    param.span,
                ),
                Err(error) => self.report(error, param.span),
            }
        }
        if let Some(ret) = decl.ret {
            if let Err(error) = self.resolve_type(ret) {
                self.report(error, decl.span);
            }
        }
    }

    /// `fn(int, mut []float) string`
    fn signature(&self, decl: &FunctionDecl) -> String {
        let params = decl
            .params
            .iter()
            .map(|p| {
                let ty = self.type_name(ValueType::from_parsed(p.ty));
                if p.by_ref {
                    format!("mut {ty}")
                } else {
                    ty
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        match decl.ret {
            Some(ret) => {
                let ret = self.type_name(ValueType::from_parsed(ret));
                format!("fn({params}) {ret}")
            }
            None => format!("fn({params})"),
        }
    }
}
