//! Indented text rendering of a parsed module, for `vlangc parse`.

use std::fmt::Write;

use vlang_ir::{
    BaseType, ExprArena, ExprId, ExprKind, Module, ParsedType, StmtId, StmtKind, StmtRange,
    StringInterner, TemplatePart,
};

/// Render every top-level statement, one node per line.
pub fn dump_module(module: &Module, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut dumper = Dumper {
        arena,
        interner,
        out: String::new(),
    };
    for &stmt in &module.stmts {
        dumper.stmt(stmt, 0);
    }
    dumper.out
}

struct Dumper<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    out: String,
}

impl Dumper<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:indent$}{text}", "", indent = depth * 2);
    }

    fn name(&self, name: vlang_ir::Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn ty(&self, ty: ParsedType) -> String {
        let base = match ty.base {
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::String => "string",
            BaseType::Bool => "bool",
            BaseType::Rune => "rune",
            BaseType::Named(name) => self.name(name),
        };
        format!("{}{base}", "[]".repeat(ty.dims as usize))
    }

    fn block(&mut self, label: &str, range: StmtRange, depth: usize) {
        let arena = self.arena;
        self.line(depth, label);
        for &stmt in arena.get_stmt_list(range) {
            self.stmt(stmt, depth + 1);
        }
    }

    fn stmt(&mut self, id: StmtId, depth: usize) {
        let arena = self.arena;
        let stmt = *arena.get_stmt(id);
        match stmt.kind {
            StmtKind::Expr(expr) => {
                self.line(depth, "ExprStmt");
                self.expr(expr, depth + 1);
            }
            StmtKind::VarDecl {
                name,
                ty,
                init,
                mutable,
                ..
            } => {
                let ty = ty.map(|t| format!(" {}", self.ty(t))).unwrap_or_default();
                let keyword = if mutable { "mut " } else { "" };
                self.line(depth, &format!("VarDecl {keyword}{}{ty}", self.name(name)));
                if let Some(init) = init {
                    self.expr(init, depth + 1);
                }
            }
            StmtKind::Assign { target, op, value } => {
                self.line(depth, &format!("Assign {}", op.as_symbol()));
                self.expr(target, depth + 1);
                self.expr(value, depth + 1);
            }
            StmtKind::Step { target, op } => {
                self.line(depth, &format!("Step {}", op.as_symbol()));
                self.expr(target, depth + 1);
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(depth, "If");
                self.expr(cond, depth + 1);
                self.block("Then", then_branch, depth + 1);
                if let Some(other) = else_branch {
                    self.line(depth + 1, "Else");
                    self.stmt(other, depth + 2);
                }
            }
            StmtKind::Block(range) => self.block("Block", range, depth),
            StmtKind::Switch {
                scrutinee,
                cases,
                default,
            } => {
                self.line(depth, "Switch");
                self.expr(scrutinee, depth + 1);
                for case in arena.get_cases(cases) {
                    self.line(depth + 1, "Case");
                    self.expr(case.value, depth + 2);
                    self.block("Body", case.body, depth + 2);
                }
                if let Some(range) = default {
                    self.block("Default", range, depth + 1);
                }
            }
            StmtKind::While { cond, body } => {
                self.line(depth, "While");
                self.expr(cond, depth + 1);
                self.block("Body", body, depth + 1);
            }
            StmtKind::ForClassic {
                init,
                cond,
                step,
                body,
            } => {
                self.line(depth, "For");
                if let Some(init) = init {
                    self.stmt(init, depth + 1);
                }
                if let Some(cond) = cond {
                    self.expr(cond, depth + 1);
                }
                if let Some(step) = step {
                    self.stmt(step, depth + 1);
                }
                self.block("Body", body, depth + 1);
            }
            StmtKind::ForIn {
                index,
                value,
                iterable,
                body,
            } => {
                let index = index
                    .map(|i| format!("{}, ", self.name(i)))
                    .unwrap_or_default();
                self.line(depth, &format!("ForIn {index}{}", self.name(value)));
                self.expr(iterable, depth + 1);
                self.block("Body", body, depth + 1);
            }
            StmtKind::Break => self.line(depth, "Break"),
            StmtKind::Continue => self.line(depth, "Continue"),
            StmtKind::Return(value) => {
                self.line(depth, "Return");
                if let Some(value) = value {
                    self.expr(value, depth + 1);
                }
            }
            StmtKind::FnDecl(id) => self.function(id, depth),
            StmtKind::StructDecl(id) => {
                let decl = arena.get_struct(id);
                self.line(depth, &format!("Struct {}", self.name(decl.name)));
                for field in &decl.fields {
                    let text = format!("Field {} {}", self.name(field.name), self.ty(field.ty));
                    self.line(depth + 1, &text);
                }
                for &method in &decl.methods {
                    self.function(method, depth + 1);
                }
            }
            StmtKind::Error => self.line(depth, "Error"),
        }
    }

    fn function(&mut self, id: vlang_ir::FunctionId, depth: usize) {
        let arena = self.arena;
        let decl = arena.get_function(id);
        let params: Vec<String> = decl
            .params
            .iter()
            .map(|p| {
                let by_ref = if p.by_ref { "mut " } else { "" };
                let label = p
                    .extern_name
                    .map(|l| format!("{} ", self.name(l)))
                    .unwrap_or_default();
                format!("{by_ref}{label}{} {}", self.name(p.name), self.ty(p.ty))
            })
            .collect();
        let ret = decl.ret.map(|t| format!(" {}", self.ty(t))).unwrap_or_default();
        let keyword = if decl.is_mutating { "mut fn" } else { "fn" };
        let header = format!(
            "{keyword} {}({}){ret}",
            self.name(decl.name),
            params.join(", ")
        );
        let body = decl.body;
        self.block(&header, body, depth);
    }

    fn expr(&mut self, id: ExprId, depth: usize) {
        let arena = self.arena;
        let expr = *arena.get_expr(id);
        match expr.kind {
            ExprKind::Int(n) => self.line(depth, &format!("Int {n}")),
            ExprKind::Float(bits) => self.line(depth, &format!("Float {}", f64::from_bits(bits))),
            ExprKind::String(name) => self.line(depth, &format!("String {:?}", self.name(name))),
            ExprKind::Bool(b) => self.line(depth, &format!("Bool {b}")),
            ExprKind::Nil => self.line(depth, "Nil"),
            ExprKind::Template(range) => {
                self.line(depth, "Template");
                for part in arena.get_template_parts(range) {
                    match *part {
                        TemplatePart::Text(text) => {
                            self.line(depth + 1, &format!("Text {:?}", self.name(text)));
                        }
                        TemplatePart::Hole { expr, .. } => self.expr(expr, depth + 1),
                    }
                }
            }
            ExprKind::Ident(name) => self.line(depth, &format!("Ident {}", self.name(name))),
            ExprKind::Binary { op, left, right } => {
                self.line(depth, &format!("Binary {}", op.as_symbol()));
                self.expr(left, depth + 1);
                self.expr(right, depth + 1);
            }
            ExprKind::Unary { op, operand } => {
                self.line(depth, &format!("Unary {}", op.as_symbol()));
                self.expr(operand, depth + 1);
            }
            ExprKind::Call { callee, args } => {
                self.line(depth, "Call");
                self.expr(callee, depth + 1);
                self.args(args, depth + 1);
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.line(depth, &format!("MethodCall {}", self.name(method)));
                self.expr(receiver, depth + 1);
                self.args(args, depth + 1);
            }
            ExprKind::Field { receiver, field } => {
                self.line(depth, &format!("Field {}", self.name(field)));
                self.expr(receiver, depth + 1);
            }
            ExprKind::Index { receiver, index } => {
                self.line(depth, "Index");
                self.expr(receiver, depth + 1);
                self.expr(index, depth + 1);
            }
            ExprKind::Vector { elem, items } => {
                let label = elem
                    .map(|base| format!("Vector {}", self.ty(ParsedType::vector(base))))
                    .unwrap_or_else(|| "Vector".to_owned());
                self.line(depth, &label);
                for &item in arena.get_expr_list(items) {
                    self.expr(item, depth + 1);
                }
            }
            ExprKind::Matrix { elem, rows } => {
                let label = format!("Matrix {}", self.ty(ParsedType::matrix(elem)));
                self.line(depth, &label);
                for &row in arena.get_expr_list(rows) {
                    self.expr(row, depth + 1);
                }
            }
            ExprKind::StructLit { name, fields } => {
                self.line(depth, &format!("StructLit {}", self.name(name)));
                for init in arena.get_field_inits(fields) {
                    self.line(depth + 1, &format!("{}:", self.name(init.name)));
                    self.expr(init.value, depth + 2);
                }
            }
            ExprKind::Error => self.line(depth, "Error"),
        }
    }

    fn args(&mut self, range: vlang_ir::CallArgRange, depth: usize) {
        let arena = self.arena;
        for arg in arena.get_call_args(range) {
            let mut label = String::from("Arg");
            if let Some(name) = arg.label {
                let _ = write!(label, " {}:", self.name(name));
            }
            if arg.by_ref {
                label.push_str(" mut");
            }
            self.line(depth, &label);
            self.expr(arg.value, depth + 1);
        }
    }
}
