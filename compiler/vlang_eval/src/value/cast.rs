//! Implicit conversions.
//!
//! A value is accepted by a slot of type `T` when its own type is `T`, or
//! when the one-directional table below converts it:
//!
//! | target  | source                                   |
//! |---------|------------------------------------------|
//! | `float` | `int`, numeric `string`                  |
//! | `int`   | `float` (truncated), numeric `string`    |
//! | `string`| `rune`                                   |
//!
//! Vectors and matrices convert item by item, and the empty literal `[]`
//! fits any vector or matrix type.

use super::{MatrixValue, Value, ValueType, VectorValue};

/// Parse an integer, falling back to a float that is then truncated.
#[allow(
    clippy::cast_possible_truncation,
    reason = "float to int conversion truncates by definition"
)]
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Scalar conversion table. `None` when no rule applies.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "the conversions are defined as lossy"
)]
pub fn implicit_cast(target: ValueType, value: &Value) -> Option<Value> {
    match (target, value) {
        (ValueType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (ValueType::Float, Value::Str(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
        (ValueType::Int, Value::Float(f)) if f.is_finite() => Some(Value::Int(f.trunc() as i64)),
        (ValueType::Int, Value::Str(s)) => parse_int(s).map(Value::Int),
        (ValueType::String, Value::Rune(c)) => Some(Value::Str(c.to_string().into())),
        _ => None,
    }
}

/// Convert `value` for a slot of type `target`.
///
/// Returns the value unchanged on an exact match, the converted value when
/// a rule applies, and the original value back as `Err` otherwise.
pub fn conform(value: Value, target: ValueType, allow_nil: bool) -> Result<Value, Value> {
    if value.value_type() == target {
        return Ok(value);
    }
    coerce(&value, target, allow_nil).ok_or(value)
}

fn coerce(value: &Value, target: ValueType, allow_nil: bool) -> Option<Value> {
    match (target, value) {
        (_, Value::Nil) => (allow_nil || target.allows_nil()).then_some(Value::Nil),
        (ValueType::Vector(None), Value::Vector(_)) => Some(value.clone()),
        (ValueType::Vector(Some(item)), Value::Vector(v)) => {
            if v.item.is_none() {
                return Some(Value::Vector(VectorValue::empty(Some(item))));
            }
            let item_ty = ValueType::from_base(item);
            let items = v
                .items
                .iter()
                .map(|x| coerce_item(x, item_ty))
                .collect::<Option<Vec<_>>>()?;
            Some(Value::Vector(VectorValue::new(item, items)))
        }
        (ValueType::Matrix(item), Value::Vector(v)) if v.item.is_none() => {
            Some(Value::Matrix(MatrixValue::empty(item)))
        }
        (ValueType::Matrix(item), Value::Matrix(m)) => {
            let item_ty = ValueType::from_base(item);
            let rows = m
                .rows
                .iter()
                .map(|row| {
                    row.items
                        .iter()
                        .map(|x| coerce_item(x, item_ty))
                        .collect::<Option<Vec<_>>>()
                        .map(|items| VectorValue::new(item, items))
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Value::Matrix(MatrixValue::new(item, rows)))
        }
        _ => implicit_cast(target, value),
    }
}

fn coerce_item(value: &Value, target: ValueType) -> Option<Value> {
    if value.value_type() == target {
        Some(value.clone())
    } else {
        coerce(value, target, target.allows_nil())
    }
}
