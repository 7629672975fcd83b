//! Tree-walking interpreter.
//!
//! Statements run through [`Interpreter::exec_stmt`], expressions through
//! [`Interpreter::eval_expr`]. Errors never abort the program: they travel
//! up as [`Unwind::Error`] to the nearest statement boundary, where
//! [`Interpreter::exec_stmts`] records them in the error table and moves on
//! to the next statement. `return`, `break` and `continue` travel the same
//! way as [`Unwind::Signal`] until the frame they target catches them.

mod expr;
mod function_call;
mod place;
mod scope_guard;
mod stmt;

pub use scope_guard::{FramedInterpreter, ScopedInterpreter};

use vlang_diagnostic::{ErrorTable, LineIndex, SharedConsole};
use vlang_ir::{ExprArena, Module, Name, ParsedType, Span, StmtId, StringInterner};

use crate::builtins::BuiltinRegistry;
use crate::call_stack::{CallStack, Signal, Unwind};
use crate::config::EvalConfig;
use crate::environment::{EnvError, Environment, Mutability, VarRef, Variable};
use crate::errors::{
    already_declared, misplaced_signal, undefined_struct, EvalError, EvalResult, SignalKind,
};
use crate::symbols::{Symbol, SymbolKind, SymbolTable};
use crate::value::{Value, ValueType};

/// Interned names of the scopes the interpreter opens.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ScopeNames {
    pub global: Name,
    pub if_branch: Name,
    pub else_branch: Name,
    pub while_loop: Name,
    pub for_loop: Name,
    pub switch: Name,
    pub case: Name,
}

impl ScopeNames {
    fn new(interner: &StringInterner) -> Self {
        ScopeNames {
            global: interner.intern("global"),
            if_branch: interner.intern("if"),
            else_branch: interner.intern("else"),
            while_loop: interner.intern("while"),
            for_loop: interner.intern("for"),
            switch: interner.intern("switch"),
            case: interner.intern("case"),
        }
    }
}

/// Evaluator state for one program run.
pub struct Interpreter<'a> {
    pub(crate) arena: &'a ExprArena,
    pub(crate) interner: &'a StringInterner,
    lines: &'a LineIndex,
    pub(crate) env: Environment,
    pub(crate) stack: CallStack,
    pub(crate) builtins: BuiltinRegistry,
    console: SharedConsole,
    errors: ErrorTable,
    symbols: SymbolTable,
    config: EvalConfig,
    pub(crate) names: ScopeNames,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        lines: &'a LineIndex,
        console: SharedConsole,
        config: EvalConfig,
    ) -> Self {
        let names = ScopeNames::new(interner);
        Interpreter {
            arena,
            interner,
            lines,
            env: Environment::new(names.global),
            stack: CallStack::new(config.max_call_depth),
            builtins: BuiltinRegistry::new(interner),
            console,
            errors: ErrorTable::new(),
            symbols: SymbolTable::new(),
            config,
            names,
        }
    }

    /// Run a whole module: declarations first, then the top-level
    /// statements in order.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = module.stmts.len()))]
    pub fn run(&mut self, module: &Module) {
        self.register_declarations(module);
        if let Err(signal) = self.exec_stmts(&module.stmts) {
            // Frames catch every signal they are aimed at; this is a leak.
            let kind = match signal {
                Signal::Return { .. } => SignalKind::Return,
                Signal::Break { .. } => SignalKind::Break,
                Signal::Continue { .. } => SignalKind::Continue,
            };
            self.report(misplaced_signal(kind), Span::DUMMY);
        }
        tracing::debug!(errors = self.errors.len(), "run finished");
    }

    /// Execute statements in order, recording errors and carrying on.
    /// Stops at the first signal.
    pub fn exec_stmts(&mut self, stmts: &[StmtId]) -> Result<(), Signal> {
        for &id in stmts {
            match self.exec_stmt(id) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => {
                    let span = self.arena.get_stmt(id).span;
                    self.report(error, span);
                }
                Err(Unwind::Signal(signal)) => return Err(signal),
            }
        }
        Ok(())
    }

    /// Record `error` in the error table, located at its own span or at
    /// `fallback`.
    pub fn report(&mut self, error: EvalError, fallback: Span) {
        let span = error.span.unwrap_or(fallback);
        let (line, column) = self.lines.span_start(span);
        tracing::debug!(line, column, message = %error.message, "evaluation error");
        self.errors.add(error.error_kind(), line, column, error.message);
    }

    pub fn errors(&self) -> &ErrorTable {
        &self.errors
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn console(&self) -> &SharedConsole {
        &self.console
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Consume the interpreter, keeping its reports.
    pub fn into_parts(self) -> (ErrorTable, SymbolTable) {
        (self.errors, self.symbols)
    }

    // Helpers shared by the submodules

    #[inline]
    pub(crate) fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub(crate) fn type_name(&self, ty: ValueType) -> String {
        ty.display(self.interner)
    }

    pub(crate) fn line_of(&self, span: Span) -> u32 {
        self.lines.span_start(span).0
    }

    /// Resolve an annotation, checking that a named struct exists.
    pub(crate) fn resolve_type(&self, ty: ParsedType) -> EvalResult<ValueType> {
        let resolved = ValueType::from_parsed(ty);
        if let vlang_ir::BaseType::Named(name) = ty.base {
            if self.env.lookup_struct(name).is_none() {
                return Err(undefined_struct(self.text(name)));
            }
        }
        Ok(resolved)
    }

    /// Bind a variable in the current scope and list it in the symbol
    /// report.
    pub(crate) fn declare_variable(
        &mut self,
        variable: Variable,
        kind: SymbolKind,
    ) -> EvalResult<VarRef> {
        let name = variable.name;
        let span = variable.span;
        let ty = variable.ty;
        let var = self.env.declare(variable).map_err(|e| match e {
            EnvError::AlreadyDeclared => already_declared("variable", self.text(name)),
            EnvError::Dangling => EvalError::new("scope is no longer live"),
        });
        let var = var.map_err(|e| e.with_span(span))?;
        self.record_symbol(name, kind, self.type_name(ty), span);
        Ok(var)
    }

    /// Declare an immutable or mutable variable without reporting it.
    pub(crate) fn bind_quietly(
        &mut self,
        name: Name,
        ty: ValueType,
        value: Value,
        mutability: Mutability,
        span: Span,
    ) -> EvalResult<VarRef> {
        self.env
            .declare(Variable::new(name, ty, value, mutability, span))
            .map_err(|_| already_declared("variable", self.text(name)).with_span(span))
    }

    pub(crate) fn record_symbol(&mut self, name: Name, kind: SymbolKind, ty: String, span: Span) {
        let scope = self
            .env
            .path(self.env.current())
            .into_iter()
            .map(|n| self.text(n))
            .collect::<Vec<_>>()
            .join("/");
        self.record_symbol_in(name, kind, ty, scope, span);
    }

    pub(crate) fn record_symbol_in(
        &mut self,
        name: Name,
        kind: SymbolKind,
        ty: String,
        scope: String,
        span: Span,
    ) {
        let (line, column) = self.lines.span_start(span);
        self.symbols.record(Symbol {
            name: self.text(name).to_owned(),
            kind,
            ty,
            scope,
            line,
            column,
        });
    }
}
