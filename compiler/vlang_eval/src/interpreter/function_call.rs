//! Calls of user functions, methods and builtins.
//!
//! Arguments are bound in the caller's scope before anything is pushed:
//! arity, then labels, then positional slots, then reference markers, and
//! last the argument values themselves, converted to the parameter types.
//! Only a fully bound call enters its frame and scope, so a failed binding
//! leaves no trace.
//!
//! A method runs with an extra scope between the global scope and its
//! body that holds the receiver's fields. The fields are constants unless
//! the method is `mut fn`; in that case the updated fields are copied
//! back into the receiver when the call returns.

use smallvec::{smallvec, SmallVec};
use vlang_ir::{
    CallArg, CallArgRange, ExprId, ExprKind, FunctionDecl, FunctionId, Name, Param, Span,
};

use super::place::Place;
use super::Interpreter;
use crate::builtins::{Builtin, BuiltinContext};
use crate::call_stack::{FrameId, FrameKind, Signal};
use crate::environment::{Mutability, ScopeFlags, ScopeId};
use crate::errors::{
    arity_mismatch, builtin_failed, dangling_reference, duplicate_argument,
    invalid_reference_argument, missing_argument, missing_label, mutating_on_immutable,
    nil_access, not_callable, reference_mismatch, return_type_mismatch, type_mismatch,
    undefined_function, undefined_method, undefined_variable, unknown_label, EvalError,
    EvalResult,
};
use crate::value::{conform, StructField, StructValue, Value, ValueType};

/// Where a mutating method's updated receiver goes.
enum WriteBack {
    /// The receiver was a temporary.
    Discard,
    Place(Place),
    /// The receiver is the struct scope of the running method.
    Scope(ScopeId),
}

/// A parameter with its argument, ready to be declared in the call scope.
struct Binding {
    name: Name,
    ty: ValueType,
    value: Value,
    span: Span,
}

impl Interpreter<'_> {
    /// `callee(args)`. Names resolve as in [`Interpreter::eval_ident`]:
    /// variables, then user functions, then builtins.
    pub(crate) fn eval_call(
        &mut self,
        callee: ExprId,
        args: CallArgRange,
        span: Span,
    ) -> EvalResult {
        let ident = match self.arena.get_expr(callee).kind {
            ExprKind::Ident(name) if self.env.lookup_binding(name).is_none() => Some(name),
            _ => None,
        };
        if let Some(name) = ident {
            if let Some((id, owner)) = self.env.lookup_function(name) {
                if self.env.flags(owner).contains(ScopeFlags::STRUCT) {
                    let receiver = self.struct_scope_value(owner);
                    return self.call_method(receiver, WriteBack::Scope(owner), id, args, span);
                }
                return self.call_function(id, args, span);
            }
            if let Some(builtin) = self.builtins.get(name) {
                return self.call_builtin(builtin, args, span);
            }
            return Err(undefined_function(self.text(name)));
        }
        let target = self.eval_expr(callee)?;
        self.call_value(target, args, span)
    }

    /// `receiver.method(args)`.
    pub(crate) fn eval_method_call(
        &mut self,
        receiver: ExprId,
        method: Name,
        args: CallArgRange,
        span: Span,
    ) -> EvalResult {
        let (value, write_back) = if self.rooted_at_variable(receiver) {
            let place = self.resolve_place(receiver)?;
            (self.read_place(&place)?, WriteBack::Place(place))
        } else {
            (self.eval_expr(receiver)?, WriteBack::Discard)
        };
        let instance = match value {
            Value::Struct(instance) => instance,
            Value::Nil => return Err(nil_access(self.text(method))),
            other => {
                return Err(undefined_method(
                    self.text(method),
                    &other.type_name(self.interner),
                ));
            }
        };
        if let Some(id) = self.find_method(instance.name, method) {
            return self.call_method(instance, write_back, id, args, span);
        }
        // A field holding a function value.
        match instance.field(method) {
            Some(field) => {
                let target = field.value.clone();
                self.call_value(target, args, span)
            }
            None => Err(undefined_method(self.text(method), self.text(instance.name))),
        }
    }

    fn call_value(&mut self, target: Value, args: CallArgRange, span: Span) -> EvalResult {
        match target {
            Value::Function { id, .. } => self.call_function(id, args, span),
            Value::Builtin(builtin) => self.call_builtin(builtin, args, span),
            Value::BoundMethod(bound) => {
                let current = bound.origin.and_then(|var| {
                    let variable = self.env.get(var).ok()?;
                    match &variable.value {
                        Value::Struct(instance) => {
                            Some((instance.clone(), Place::variable(var, variable.name)))
                        }
                        _ => None,
                    }
                });
                let (receiver, write_back) = match current {
                    Some((instance, place)) => (instance, WriteBack::Place(place)),
                    None => (bound.receiver.clone(), WriteBack::Discard),
                };
                self.call_method(receiver, write_back, bound.method, args, span)
            }
            other => Err(not_callable(other.type_name(self.interner))),
        }
    }

    fn call_function(&mut self, id: FunctionId, args: CallArgRange, span: Span) -> EvalResult {
        let (value, _) = self.invoke(id, args, None, span)?;
        Ok(value)
    }

    fn call_method(
        &mut self,
        receiver: StructValue,
        write_back: WriteBack,
        id: FunctionId,
        args: CallArgRange,
        span: Span,
    ) -> EvalResult {
        let arena = self.arena;
        let decl = arena.get_function(id);
        if decl.is_mutating {
            let writable = match &write_back {
                WriteBack::Discard => false,
                WriteBack::Place(place) => self
                    .env
                    .get(place.root)
                    .map_err(|_| dangling_reference(self.text(place.root_name)))?
                    .mutability
                    .is_mutable(),
                WriteBack::Scope(scope) => self.env.flags(*scope).contains(ScopeFlags::MUTATING),
            };
            if !writable {
                return Err(mutating_on_immutable(self.text(decl.name)));
            }
        }

        let (value, updated) = self.invoke(id, args, Some(receiver), span)?;
        if let Some(updated) = updated {
            match write_back {
                WriteBack::Place(place) => self.write_place(&place, Value::Struct(updated))?,
                WriteBack::Scope(scope) => self.store_fields(scope, updated),
                WriteBack::Discard => {}
            }
        }
        Ok(value)
    }

    /// Bind, run and check one call. Returns the result and, for mutating
    /// methods, the receiver as the body left it.
    #[tracing::instrument(level = "debug", skip_all)]
    fn invoke(
        &mut self,
        id: FunctionId,
        args: CallArgRange,
        receiver: Option<StructValue>,
        span: Span,
    ) -> EvalResult<(Value, Option<StructValue>)> {
        let arena = self.arena;
        let decl = arena.get_function(id);
        let name = self.text(decl.name);
        tracing::debug!(function = name, depth = self.stack.call_depth(), "call");

        let call_args = arena.get_call_args(args);
        if call_args.len() != decl.params.len() {
            return Err(arity_mismatch(name, decl.params.len(), call_args.len()));
        }
        let slots = self.match_arguments(name, &decl.params, call_args)?;
        let mut bindings: SmallVec<[Binding; 4]> = SmallVec::with_capacity(slots.len());
        for (param, arg) in decl.params.iter().zip(slots) {
            bindings.push(self.bind_argument(name, param, arg)?);
        }
        let ret = decl.ret.map(|ty| self.resolve_type(ty)).transpose()?;
        let reported = self.errors.len();

        let (outcome, updated) = {
            let mut framed = self.framed(FrameKind::Function, decl.name, span)?;
            let frame = framed.frame;
            match receiver {
                None => (framed.run_body(decl, bindings, ScopeId::GLOBAL, frame), None),
                Some(instance) => {
                    let (flags, mutability) = if decl.is_mutating {
                        (ScopeFlags::STRUCT | ScopeFlags::MUTATING, Mutability::Mutable)
                    } else {
                        (ScopeFlags::STRUCT, Mutability::Immutable)
                    };
                    let mut fields = framed.scoped_in(instance.name, ScopeId::GLOBAL, flags);
                    let struct_scope = fields.env.current();
                    fields.register_methods(instance.name);
                    for field in instance.fields {
                        fields.bind_quietly(field.name, field.ty, field.value, mutability, span)?;
                    }
                    let outcome = fields.run_body(decl, bindings, struct_scope, frame);
                    let updated = decl
                        .is_mutating
                        .then(|| fields.struct_scope_value(struct_scope));
                    (outcome, updated)
                }
            }
        };

        let value = outcome?;
        // Nil after a reported error is the substitute, not a bad return.
        let value = if value.is_nil() && self.errors.len() > reported {
            value
        } else {
            self.check_return(name, ret, value)?
        };
        Ok((value, updated))
    }

    /// Pair every parameter with its argument.
    ///
    /// Labeled arguments go to the parameter with that external name (or,
    /// for parameters without one, that internal name). Unlabeled
    /// arguments fill the remaining parameters left to right and must not
    /// skip a parameter that requires a label.
    fn match_arguments<'c>(
        &self,
        function: &str,
        params: &[Param],
        args: &'c [CallArg],
    ) -> EvalResult<SmallVec<[&'c CallArg; 4]>> {
        let mut slots: SmallVec<[Option<&'c CallArg>; 4]> = smallvec![None; params.len()];

        for arg in args {
            let Some(label) = arg.label else {
                continue;
            };
            let index = params
                .iter()
                .position(|p| p.extern_name == Some(label))
                .or_else(|| {
                    params
                        .iter()
                        .position(|p| p.extern_name.is_none() && p.name == label)
                })
                .ok_or_else(|| unknown_label(function, self.text(label)).with_span(arg.span))?;
            if slots[index].is_some() {
                return Err(duplicate_argument(function, self.text(params[index].name))
                    .with_span(arg.span));
            }
            slots[index] = Some(arg);
        }

        let mut next = 0;
        for arg in args.iter().filter(|a| a.label.is_none()) {
            while slots.get(next).is_some_and(Option::is_some) {
                next += 1;
            }
            let Some(param) = params.get(next) else {
                return Err(arity_mismatch(function, params.len(), args.len()));
            };
            if let Some(label) = param.extern_name {
                return Err(
                    missing_label(function, self.text(param.name), self.text(label))
                        .with_span(arg.span),
                );
            }
            slots[next] = Some(arg);
            next += 1;
        }

        slots
            .into_iter()
            .zip(params)
            .map(|(slot, param)| {
                slot.ok_or_else(|| missing_argument(function, self.text(param.name)))
            })
            .collect()
    }

    /// Check the reference marker of `arg` and produce the value `param`
    /// will be bound to: a pointer for `mut` parameters, a converted copy
    /// otherwise.
    fn bind_argument(
        &mut self,
        function: &str,
        param: &Param,
        arg: &CallArg,
    ) -> EvalResult<Binding> {
        if param.by_ref != arg.by_ref {
            let param_name = self.text(param.name);
            return Err(
                reference_mismatch(function, param_name, param.by_ref).with_span(arg.span),
            );
        }
        let ty = self
            .resolve_type(param.ty)
            .map_err(|e| e.with_span(param.span))?;

        let value = if param.by_ref {
            let ExprKind::Ident(name) = self.arena.get_expr(arg.value).kind else {
                return Err(invalid_reference_argument().with_span(arg.span));
            };
            let var = self
                .env
                .lookup(name)
                .ok_or_else(|| undefined_variable(self.text(name)).with_span(arg.span))?;
            let variable = self
                .env
                .get(var)
                .map_err(|_| dangling_reference(self.text(name)).with_span(arg.span))?;
            if !variable.mutability.is_mutable() {
                return Err(invalid_reference_argument().with_span(arg.span));
            }
            if variable.ty != ty {
                return Err(
                    type_mismatch(self.type_name(ty), self.type_name(variable.ty))
                        .with_span(arg.span),
                );
            }
            Value::Pointer(var)
        } else {
            let value = self.eval_expr(arg.value)?;
            conform(value, ty, ty.allows_nil()).map_err(|v| {
                type_mismatch(self.type_name(ty), v.type_name(self.interner)).with_span(arg.span)
            })?
        };

        Ok(Binding {
            name: param.name,
            ty,
            value,
            span: param.span,
        })
    }

    /// Declare the parameters in a fresh scope under `parent` and run the
    /// body. Falling off the end returns nil.
    fn run_body(
        &mut self,
        decl: &FunctionDecl,
        bindings: SmallVec<[Binding; 4]>,
        parent: ScopeId,
        frame: FrameId,
    ) -> EvalResult {
        let arena = self.arena;
        let mut scoped = self.scoped_in(decl.name, parent, ScopeFlags::empty());
        // Value parameters hold copies, so they are ordinary locals.
        for Binding {
            name,
            ty,
            value,
            span,
        } in bindings
        {
            scoped.bind_quietly(name, ty, value, Mutability::Mutable, span)?;
        }
        match scoped.exec_stmts(arena.get_stmt_list(decl.body)) {
            Ok(()) => Ok(Value::Nil),
            Err(Signal::Return { frame: target, value }) if target == frame => Ok(value),
            Err(_) => Err(EvalError::new("control flow escaped a function body")),
        }
    }

    fn check_return(&self, function: &str, ret: Option<ValueType>, value: Value) -> EvalResult {
        match ret {
            None if value.is_nil() => Ok(Value::Nil),
            None => Err(return_type_mismatch(
                function,
                "nothing".to_owned(),
                value.type_name(self.interner),
            )),
            Some(ty) => conform(value, ty, ty.allows_nil()).map_err(|v| {
                return_type_mismatch(function, self.type_name(ty), v.type_name(self.interner))
            }),
        }
    }

    fn call_builtin(&mut self, builtin: Builtin, args: CallArgRange, span: Span) -> EvalResult {
        let arena = self.arena;
        let call_args = arena.get_call_args(args);
        let name = builtin.name();
        if let Some(expected) = builtin.arity() {
            if call_args.len() != expected {
                return Err(arity_mismatch(name, expected, call_args.len()));
            }
        }
        let mut values = Vec::with_capacity(call_args.len());
        for arg in call_args {
            if let Some(label) = arg.label {
                return Err(unknown_label(name, self.text(label)).with_span(arg.span));
            }
            if arg.by_ref {
                return Err(EvalError::new(format!(
                    "builtin '{name}' does not take arguments by reference"
                ))
                .with_span(arg.span));
            }
            values.push(self.eval_expr(arg.value)?);
        }
        tracing::trace!(builtin = name, args = values.len(), "builtin call");

        let context = BuiltinContext {
            console: &self.console,
            interner: self.interner,
            float_precision: self.config.float_precision,
            line: self.line_of(span),
        };
        builtin
            .call(&context, &values)
            .map_err(|message| builtin_failed(name, message))
    }

    // Struct scopes

    /// The method `method` of struct `struct_name`.
    pub(crate) fn find_method(&self, struct_name: Name, method: Name) -> Option<FunctionId> {
        let arena = self.arena;
        let id = self.env.lookup_struct(struct_name)?;
        arena
            .get_struct(id)
            .methods
            .iter()
            .copied()
            .find(|&m| arena.get_function(m).name == method)
    }

    /// Make the methods of `struct_name` callable by bare name from the
    /// current scope.
    fn register_methods(&mut self, struct_name: Name) {
        let arena = self.arena;
        let Some(id) = self.env.lookup_struct(struct_name) else {
            return;
        };
        for &method in &arena.get_struct(id).methods {
            // Duplicates were reported by the declaration pass.
            let _ = self.env.declare_function(arena.get_function(method).name, method);
        }
    }

    /// Snapshot of the receiver held by a struct scope.
    pub(crate) fn struct_scope_value(&self, scope: ScopeId) -> StructValue {
        StructValue {
            name: self.env.name(scope),
            fields: self
                .env
                .variables(scope)
                .iter()
                .map(|v| StructField {
                    name: v.name,
                    ty: v.ty,
                    value: v.value.clone(),
                })
                .collect(),
        }
    }

    /// Copy the fields of `updated` into the struct scope `scope`.
    fn store_fields(&mut self, scope: ScopeId, updated: StructValue) {
        for field in updated.fields {
            let Some(var) = self.env.lookup_in(scope, field.name) else {
                continue;
            };
            if let Ok(variable) = self.env.get_mut(var) {
                variable.value = field.value;
            }
        }
    }
}
