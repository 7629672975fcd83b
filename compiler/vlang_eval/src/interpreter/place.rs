//! Assignable locations.
//!
//! A [`Place`] is a variable plus a path of field and index steps, e.g.
//! `grid[1][2]` or `p.items[0].x`. Reads walk the path by reference;
//! writes walk it mutably and conform the new value to the type of the
//! slot it lands in.

use smallvec::SmallVec;
use vlang_ir::{ExprId, ExprKind, Name, StringInterner};

use super::Interpreter;
use crate::environment::{ScopeFlags, VarRef};
use crate::errors::{
    dangling_reference, immutable_binding, immutable_field, index_not_int, index_out_of_range,
    nil_access, not_a_struct, not_indexable, type_mismatch, undefined_field, undefined_variable,
    EvalError, EvalResult,
};
use crate::value::{conform, Value, ValueType};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PathStep {
    Field(Name),
    Index(i64),
}

/// A variable and the path into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Place {
    pub root: VarRef,
    pub root_name: Name,
    pub path: SmallVec<[PathStep; 4]>,
}

impl Place {
    pub(crate) fn variable(root: VarRef, root_name: Name) -> Self {
        Place {
            root,
            root_name,
            path: SmallVec::new(),
        }
    }
}

impl Interpreter<'_> {
    /// Evaluate the index expressions of a place expression, without
    /// reading the location itself.
    pub(crate) fn resolve_place(&mut self, id: ExprId) -> EvalResult<Place> {
        let expr = *self.arena.get_expr(id);
        let place = match expr.kind {
            ExprKind::Ident(name) => {
                let var = self
                    .env
                    .lookup(name)
                    .ok_or_else(|| undefined_variable(self.text(name)))?;
                Place::variable(var, name)
            }
            ExprKind::Field { receiver, field } => {
                let mut place = self.resolve_place(receiver)?;
                place.path.push(PathStep::Field(field));
                place
            }
            ExprKind::Index { receiver, index } => {
                let mut place = self.resolve_place(receiver)?;
                let index = self.eval_index(index)?;
                place.path.push(PathStep::Index(index));
                place
            }
            _ => return Err(EvalError::new("expression cannot be assigned to")),
        };
        Ok(place)
    }

    pub(crate) fn eval_index(&mut self, id: ExprId) -> EvalResult<i64> {
        match self.eval_expr(id)? {
            Value::Int(i) => Ok(i),
            other => Err(index_not_int(other.type_name(self.interner))),
        }
    }

    pub(crate) fn read_place(&self, place: &Place) -> EvalResult {
        let variable = self
            .env
            .get(place.root)
            .map_err(|_| dangling_reference(self.text(place.root_name)))?;
        read_path(&variable.value, &place.path, self.interner)
    }

    /// Store `value` at `place`, checking mutability and conforming the
    /// value to the slot's type.
    pub(crate) fn write_place(&mut self, place: &Place, value: Value) -> EvalResult<()> {
        let interner = self.interner;
        let name = interner.lookup(place.root_name);
        let in_struct = self
            .env
            .flags(place.root.scope())
            .contains(ScopeFlags::STRUCT);
        let variable = self
            .env
            .get_mut(place.root)
            .map_err(|_| dangling_reference(name))?;
        if !variable.mutability.is_mutable() {
            return Err(if in_struct {
                immutable_field(name)
            } else {
                immutable_binding(name)
            });
        }
        if place.path.is_empty() {
            variable.value = conform(value, variable.ty, variable.allow_nil)
                .map_err(|v| mismatch(variable.ty, &v, interner))?;
            return Ok(());
        }
        let ty = variable.ty;
        assign_path(&mut variable.value, &place.path, value, ty, interner)
    }
}

fn mismatch(expected: ValueType, got: &Value, interner: &StringInterner) -> EvalError {
    type_mismatch(expected.display(interner), got.type_name(interner))
}

/// Follow `path` from `value` and copy out what it designates.
pub(crate) fn read_path(
    value: &Value,
    path: &[PathStep],
    interner: &StringInterner,
) -> EvalResult {
    let Some((step, rest)) = path.split_first() else {
        return Ok(value.clone());
    };
    match (value, *step) {
        (Value::Struct(s), PathStep::Field(field)) => {
            let found = s.field(field).ok_or_else(|| {
                undefined_field(interner.lookup(field), interner.lookup(s.name))
            })?;
            read_path(&found.value, rest, interner)
        }
        (Value::Vector(v), PathStep::Index(i)) => read_path(v.get(i)?, rest, interner),
        (Value::Matrix(m), PathStep::Index(i)) => match rest.split_first() {
            Some((PathStep::Index(j), rest)) => {
                let row = m
                    .rows
                    .get(usize::try_from(i).unwrap_or(usize::MAX))
                    .ok_or_else(|| index_out_of_range(i, m.len()))?;
                read_path(row.get(*j)?, rest, interner)
            }
            _ => read_path(&Value::Vector(m.row(i)?), rest, interner),
        },
        (Value::Str(s), PathStep::Index(i)) => {
            let count = s.chars().count();
            let c = usize::try_from(i)
                .ok()
                .and_then(|at| s.chars().nth(at))
                .ok_or_else(|| index_out_of_range(i, count))?;
            read_path(&Value::Rune(c), rest, interner)
        }
        (Value::Nil, PathStep::Field(field)) => Err(nil_access(interner.lookup(field))),
        (other, PathStep::Field(field)) => {
            Err(not_a_struct(interner.lookup(field), other.type_name(interner)))
        }
        (other, PathStep::Index(_)) => Err(not_indexable(other.type_name(interner))),
    }
}

/// Follow `path` from `slot` and store `value` there. `ty` is the type
/// of `slot` itself.
fn assign_path(
    slot: &mut Value,
    path: &[PathStep],
    value: Value,
    ty: ValueType,
    interner: &StringInterner,
) -> EvalResult<()> {
    let Some((step, rest)) = path.split_first() else {
        *slot = conform(value, ty, ty.allows_nil()).map_err(|v| mismatch(ty, &v, interner))?;
        return Ok(());
    };
    match (slot, *step) {
        (Value::Struct(s), PathStep::Field(field)) => {
            let struct_name = s.name;
            let target = s.field_mut(field).ok_or_else(|| {
                undefined_field(interner.lookup(field), interner.lookup(struct_name))
            })?;
            let field_ty = target.ty;
            assign_path(&mut target.value, rest, value, field_ty, interner)
        }
        (Value::Vector(v), PathStep::Index(i)) => {
            let item_ty = v.item_type().unwrap_or(ValueType::Nil);
            assign_path(v.get_mut(i)?, rest, value, item_ty, interner)
        }
        (Value::Matrix(m), PathStep::Index(i)) => {
            let item = m.item;
            let row = m.row_mut(i)?;
            match rest.split_first() {
                None => {
                    let row_ty = ValueType::Vector(Some(item));
                    match conform(value, row_ty, false) {
                        Ok(Value::Vector(new_row)) => {
                            *row = new_row;
                            Ok(())
                        }
                        Ok(other) | Err(other) => Err(mismatch(row_ty, &other, interner)),
                    }
                }
                Some((PathStep::Index(j), rest)) => {
                    let item_ty = ValueType::from_base(item);
                    assign_path(row.get_mut(*j)?, rest, value, item_ty, interner)
                }
                Some((PathStep::Field(field), _)) => Err(not_a_struct(
                    interner.lookup(*field),
                    ValueType::Vector(Some(item)).display(interner),
                )),
            }
        }
        (Value::Str(_), PathStep::Index(_)) => {
            Err(EvalError::new("strings cannot be modified by index"))
        }
        (Value::Nil, PathStep::Field(field)) => Err(nil_access(interner.lookup(field))),
        (other, PathStep::Field(field)) => {
            Err(not_a_struct(interner.lookup(field), other.type_name(interner)))
        }
        (other, PathStep::Index(_)) => Err(not_indexable(other.type_name(interner))),
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use super::*;
    use crate::value::{MatrixValue, StructField, StructValue, VectorValue};
    use pretty_assertions::assert_eq;
    use vlang_ir::BaseType;

    fn ints(values: &[i64]) -> VectorValue {
        VectorValue::new(BaseType::Int, values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn nested_index_write_conforms_items() {
        let interner = StringInterner::new();
        let mut grid = Value::Matrix(MatrixValue::new(
            BaseType::Float,
            vec![VectorValue::new(BaseType::Float, vec![Value::Float(0.0)])],
        ));
        let path = [PathStep::Index(0), PathStep::Index(0)];
        let ty = ValueType::Matrix(BaseType::Float);
        assign_path(&mut grid, &path, Value::Int(3), ty, &interner).unwrap();
        assert_eq!(read_path(&grid, &path, &interner), Ok(Value::Float(3.0)));
    }

    #[test]
    fn field_write_rejects_wrong_type() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let point = interner.intern("Point");
        let mut value = Value::Struct(StructValue {
            name: point,
            fields: vec![StructField {
                name: x,
                ty: ValueType::Int,
                value: Value::Int(1),
            }],
        });
        let path = [PathStep::Field(x)];
        let result = assign_path(
            &mut value,
            &path,
            Value::Bool(true),
            ValueType::Struct(point),
            &interner,
        );
        assert_eq!(
            result.map_err(|e| e.message),
            Err("type mismatch: expected int, found bool".to_owned())
        );
        assert_eq!(read_path(&value, &path, &interner), Ok(Value::Int(1)));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let interner = StringInterner::new();
        let value = Value::Vector(ints(&[1, 2]));
        let err = read_path(&value, &[PathStep::Index(5)], &interner).map_err(|e| e.message);
        assert_eq!(err, Err("index 5 out of range for length 2".to_owned()));
    }

    #[test]
    fn string_index_reads_rune() {
        let interner = StringInterner::new();
        let value = Value::string("héllo");
        assert_eq!(
            read_path(&value, &[PathStep::Index(1)], &interner),
            Ok(Value::Rune('é'))
        );
    }
}
