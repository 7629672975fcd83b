//! Expression evaluation.

use std::rc::Rc;

use smallvec::SmallVec;
use vlang_ir::{
    BaseType, BinaryOp, ExprId, ExprKind, ExprRange, FieldInitRange, Name, Span,
    TemplatePart, TemplatePartRange, UnaryOp,
};
use vlang_stack::ensure_sufficient_stack;

use super::place::{read_path, PathStep};
use super::Interpreter;
use crate::environment::ScopeFlags;
use crate::errors::{
    cannot_infer, dangling_reference, nil_access, not_a_struct, type_mismatch, undefined_field,
    undefined_struct, undefined_variable, EvalError, EvalResult,
};
use crate::operators::{early_return_strategy, evaluate_binary, unary_strategy, OperandError};
use crate::value::{
    conform, interpolate, BoundMethod, MatrixValue, StructField, StructValue, Value, ValueType,
    VectorValue,
};

impl Interpreter<'_> {
    /// Evaluate an expression. Errors without a location get the span of
    /// the innermost expression that produced them.
    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        let expr = *self.arena.get_expr(id);
        ensure_sufficient_stack(|| self.eval_expr_kind(id, expr.kind, expr.span))
            .map_err(|e| e.or_span(expr.span))
    }

    fn eval_expr_kind(&mut self, id: ExprId, kind: ExprKind, span: Span) -> EvalResult {
        match kind {
            ExprKind::Int(i) => Ok(Value::Int(i)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            ExprKind::String(text) => Ok(string_literal(self.text(text))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Template(parts) => self.eval_template(parts),
            ExprKind::Ident(name) => self.eval_ident(name),
            ExprKind::Binary { op, left, right } => self.eval_binary(op, left, right),
            ExprKind::Unary { op, operand } => self.eval_unary(op, operand),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, span),
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => self.eval_method_call(receiver, method, args, span),
            ExprKind::Field { receiver, field } => self.eval_field(receiver, field),
            ExprKind::Index { receiver, .. } => {
                if self.rooted_at_variable(receiver) {
                    let place = self.resolve_place(id)?;
                    self.read_place(&place)
                } else {
                    self.eval_index_of(id)
                }
            }
            ExprKind::Vector { elem, items } => self.eval_vector(elem, items),
            ExprKind::Matrix { elem, rows } => self.eval_matrix(elem, rows),
            ExprKind::StructLit { name, fields } => self.eval_struct_literal(name, fields),
            ExprKind::Error => Err(EvalError::new("invalid expression")),
        }
    }

    pub(crate) fn apply_binary(&self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
        evaluate_binary(op, left, right, self.interner)
    }

    /// Variables first, then functions, then builtins.
    fn eval_ident(&self, name: Name) -> EvalResult {
        if let Some(binding) = self.env.lookup_binding(name) {
            let var = self.env.resolve(binding);
            return self
                .env
                .get(var)
                .map(|variable| variable.value.clone())
                .map_err(|_| dangling_reference(self.text(name)));
        }
        if let Some((id, owner)) = self.env.lookup_function(name) {
            if self.env.flags(owner).contains(ScopeFlags::STRUCT) {
                return Ok(Value::BoundMethod(Rc::new(BoundMethod {
                    receiver: self.struct_scope_value(owner),
                    origin: None,
                    method: id,
                    name,
                })));
            }
            return Ok(Value::Function { id, name });
        }
        if let Some(builtin) = self.builtins.get(name) {
            return Ok(Value::Builtin(builtin));
        }
        Err(undefined_variable(self.text(name)))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> EvalResult {
        let left = self.eval_expr(left)?;
        if let Some(strategy) = early_return_strategy(op) {
            match strategy.early_return(&left) {
                Ok(Some(result)) => return Ok(result),
                Ok(None) => {}
                Err(OperandError::Unsupported) => {
                    return Err(type_mismatch("bool", left.type_name(self.interner)));
                }
                Err(OperandError::Failed(error)) => return Err(error),
            }
        }
        let right = self.eval_expr(right)?;
        self.apply_binary(op, &left, &right)
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: ExprId) -> EvalResult {
        let operand = self.eval_expr(operand)?;
        unary_strategy(op)
            .validate(&operand)
            .map_err(|e| e.into_unary_error(op, &operand, self.interner))
    }

    fn eval_template(&mut self, parts: TemplatePartRange) -> EvalResult {
        let arena = self.arena;
        let mut out = String::new();
        for part in arena.get_template_parts(parts) {
            match *part {
                TemplatePart::Text(text) => out.push_str(self.text(text)),
                TemplatePart::Hole { expr, .. } => {
                    let value = self.eval_expr(expr)?;
                    out.push_str(&interpolate(&value, self.interner));
                }
            }
        }
        Ok(Value::Str(out.into()))
    }

    // Field and index access

    fn eval_field(&mut self, receiver: ExprId, field: Name) -> EvalResult {
        let instance = match self.eval_expr(receiver)? {
            Value::Struct(instance) => instance,
            Value::Nil => return Err(nil_access(self.text(field))),
            other => {
                return Err(not_a_struct(self.text(field), other.type_name(self.interner)));
            }
        };
        if let Some(found) = instance.field(field) {
            return Ok(found.value.clone());
        }
        // `p.method` without a call: bind the receiver.
        let Some(method) = self.find_method(instance.name, field) else {
            return Err(undefined_field(self.text(field), self.text(instance.name)));
        };
        let origin = match self.arena.get_expr(receiver).kind {
            ExprKind::Ident(name) => self.env.lookup(name),
            _ => None,
        };
        Ok(Value::BoundMethod(Rc::new(BoundMethod {
            receiver: instance,
            origin,
            method,
            name: field,
        })))
    }

    /// Whether a chain of field and index steps starts at a variable, so
    /// it can be read in place instead of copying the whole receiver.
    pub(super) fn rooted_at_variable(&self, mut id: ExprId) -> bool {
        loop {
            match self.arena.get_expr(id).kind {
                ExprKind::Ident(name) => return self.env.lookup_binding(name).is_some(),
                ExprKind::Field { receiver, .. } | ExprKind::Index { receiver, .. } => {
                    id = receiver;
                }
                _ => return false,
            }
        }
    }

    /// Index into a temporary, e.g. `make()[0]`.
    fn eval_index_of(&mut self, id: ExprId) -> EvalResult {
        let ExprKind::Index { receiver, index } = self.arena.get_expr(id).kind else {
            return Err(EvalError::new("invalid expression"));
        };
        let value = self.eval_expr(receiver)?;
        let index = self.eval_index(index)?;
        read_path(&value, &[PathStep::Index(index)], self.interner)
    }

    // Composite literals

    /// `[a, b]` or `[]T{a, b}`.
    ///
    /// Untyped literals take their item type from the first item (a rune
    /// among strings widens to string); nested untyped literals build a
    /// matrix.
    fn eval_vector(&mut self, elem: Option<BaseType>, items: ExprRange) -> EvalResult {
        let values = self.eval_list(items)?;
        let item = match elem {
            Some(item) => self.resolve_base(item)?,
            None => match infer_item_type(&values) {
                ItemType::Empty => return Ok(Value::Vector(VectorValue::empty(None))),
                ItemType::Rows(item) => return self.build_matrix(item, values),
                ItemType::Scalar(item) => item,
                ItemType::Unknown(ty) => {
                    return Err(cannot_infer(format!("vector of {}", self.type_name(ty))));
                }
            },
        };
        let item_ty = ValueType::from_base(item);
        let items = values
            .into_iter()
            .map(|v| {
                conform(v, item_ty, item_ty.allows_nil()).map_err(|v| {
                    type_mismatch(self.type_name(item_ty), v.type_name(self.interner))
                })
            })
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::Vector(VectorValue::new(item, items)))
    }

    /// `[][]T{{...}, {...}}`.
    fn eval_matrix(&mut self, elem: BaseType, rows: ExprRange) -> EvalResult {
        let item = self.resolve_base(elem)?;
        let rows = self.eval_list(rows)?;
        self.build_matrix(item, rows)
    }

    fn build_matrix(&self, item: BaseType, rows: Vec<Value>) -> EvalResult {
        let row_ty = ValueType::Vector(Some(item));
        let rows = rows
            .into_iter()
            .map(|row| match conform(row, row_ty, false) {
                Ok(Value::Vector(row)) => Ok(row),
                Ok(other) | Err(other) => Err(type_mismatch(
                    self.type_name(row_ty),
                    other.type_name(self.interner),
                )),
            })
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::Matrix(MatrixValue::new(item, rows)))
    }

    /// `Name{field: value, ...}`. Fields left out take their default value.
    fn eval_struct_literal(&mut self, name: Name, inits: FieldInitRange) -> EvalResult {
        let arena = self.arena;
        let Some(id) = self.env.lookup_struct(name) else {
            return Err(undefined_struct(self.text(name)));
        };
        let decl = arena.get_struct(id);
        let mut fields = decl
            .fields
            .iter()
            .map(|field| {
                let ty = self.resolve_type(field.ty)?;
                Ok(StructField {
                    name: field.name,
                    ty,
                    value: ty.default_value(),
                })
            })
            .collect::<EvalResult<Vec<_>>>()?;

        let mut seen: SmallVec<[Name; 8]> = SmallVec::new();
        for init in arena.get_field_inits(inits) {
            if seen.contains(&init.name) {
                return Err(EvalError::new(format!(
                    "field '{}' is given more than once",
                    self.text(init.name)
                ))
                .with_span(init.span));
            }
            seen.push(init.name);
            let value = self.eval_expr(init.value)?;
            let Some(slot) = fields.iter_mut().find(|f| f.name == init.name) else {
                return Err(undefined_field(self.text(init.name), self.text(name))
                    .with_span(init.span));
            };
            slot.value = conform(value, slot.ty, slot.ty.allows_nil()).map_err(|v| {
                type_mismatch(slot.ty.display(self.interner), v.type_name(self.interner))
                    .with_span(init.span)
            })?;
        }
        Ok(Value::Struct(StructValue { name, fields }))
    }

    fn eval_list(&mut self, items: ExprRange) -> EvalResult<Vec<Value>> {
        let arena = self.arena;
        arena
            .get_expr_list(items)
            .iter()
            .map(|&item| self.eval_expr(item))
            .collect()
    }

    fn resolve_base(&self, base: BaseType) -> EvalResult<BaseType> {
        match base {
            BaseType::Named(name) if self.env.lookup_struct(name).is_none() => {
                Err(undefined_struct(self.text(name)))
            }
            _ => Ok(base),
        }
    }
}

/// A one-character literal is a rune.
fn string_literal(text: &str) -> Value {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Value::Rune(c),
        _ => Value::string(text),
    }
}

enum ItemType {
    Empty,
    Scalar(BaseType),
    /// Every item is a vector: the literal is a matrix.
    Rows(BaseType),
    Unknown(ValueType),
}

fn infer_item_type(values: &[Value]) -> ItemType {
    let Some(first) = values.first() else {
        return ItemType::Empty;
    };
    if let Value::Vector(row) = first {
        if let Some(item) = row.item {
            if values.iter().all(|v| matches!(v, Value::Vector(_))) {
                return ItemType::Rows(item);
            }
        }
        return ItemType::Unknown(first.value_type());
    }
    let ty = first.value_type();
    if ty == ValueType::Rune && values.iter().any(|v| matches!(v, Value::Str(_))) {
        return ItemType::Scalar(BaseType::String);
    }
    ty.as_base()
        .map_or(ItemType::Unknown(ty), ItemType::Scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_character_literal_is_rune() {
        assert_eq!(string_literal("a"), Value::Rune('a'));
        assert_eq!(string_literal("ab"), Value::string("ab"));
        assert_eq!(string_literal(""), Value::string(""));
    }

    #[test]
    fn rune_and_string_items_widen_to_string() {
        let values = [Value::Rune('a'), Value::string("bc")];
        assert!(matches!(
            infer_item_type(&values),
            ItemType::Scalar(BaseType::String)
        ));
    }

    #[test]
    fn nested_vectors_infer_rows() {
        let row = Value::Vector(VectorValue::new(BaseType::Int, vec![Value::Int(1)]));
        assert!(matches!(
            infer_item_type(&[row.clone(), row]),
            ItemType::Rows(BaseType::Int)
        ));
    }

    #[test]
    fn nil_items_cannot_be_inferred() {
        assert!(matches!(
            infer_item_type(&[Value::Nil]),
            ItemType::Unknown(ValueType::Nil)
        ));
    }
}
