//! Vectors, matrices, struct instances and bound methods.

use vlang_ir::{BaseType, FunctionId, Name};

use super::{Value, ValueType};
use crate::environment::VarRef;
use crate::errors::{index_out_of_range, EvalResult};

/// Bounds-check `index` against `len`.
pub(crate) fn checked_index(index: i64, len: usize) -> EvalResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_range(index, len))
}

/// Homogeneous, zero-indexed sequence.
///
/// `item` is `None` only for the untyped empty literal, which adopts the
/// item type of whatever it is assigned to.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorValue {
    pub item: Option<BaseType>,
    pub items: Vec<Value>,
}

impl VectorValue {
    pub fn new(item: BaseType, items: Vec<Value>) -> Self {
        VectorValue {
            item: Some(item),
            items,
        }
    }

    pub fn empty(item: Option<BaseType>) -> Self {
        VectorValue {
            item,
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Type every item must have; `None` for the wildcard vector.
    pub fn item_type(&self) -> Option<ValueType> {
        self.item.map(ValueType::from_base)
    }

    pub fn get(&self, index: i64) -> EvalResult<&Value> {
        let i = checked_index(index, self.items.len())?;
        Ok(&self.items[i])
    }

    pub fn get_mut(&mut self, index: i64) -> EvalResult<&mut Value> {
        let i = checked_index(index, self.items.len())?;
        Ok(&mut self.items[i])
    }

    /// New vector with `value` appended; `self` is left untouched.
    #[must_use]
    pub fn appended(&self, item: BaseType, value: Value) -> VectorValue {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(value);
        VectorValue::new(item, items)
    }
}

/// Vector of rows sharing one item type.
///
/// Reading a row hands out a copy; only two-index places reach into a row.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixValue {
    pub item: BaseType,
    pub rows: Vec<VectorValue>,
}

impl MatrixValue {
    pub fn new(item: BaseType, rows: Vec<VectorValue>) -> Self {
        MatrixValue { item, rows }
    }

    pub fn empty(item: BaseType) -> Self {
        MatrixValue {
            item,
            rows: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Independent copy of row `index`.
    pub fn row(&self, index: i64) -> EvalResult<VectorValue> {
        let i = checked_index(index, self.rows.len())?;
        Ok(self.rows[i].clone())
    }

    pub fn row_mut(&mut self, index: i64) -> EvalResult<&mut VectorValue> {
        let i = checked_index(index, self.rows.len())?;
        Ok(&mut self.rows[i])
    }

    #[must_use]
    pub fn appended(&self, row: VectorValue) -> MatrixValue {
        let mut rows = self.rows.clone();
        rows.push(row);
        MatrixValue::new(self.item, rows)
    }
}

/// One field of a struct instance, with its declared type.
#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: Name,
    pub ty: ValueType,
    pub value: Value,
}

/// Struct instance; fields are kept in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    pub name: Name,
    pub fields: Vec<StructField>,
}

impl StructValue {
    pub fn field(&self, name: Name) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: Name) -> Option<&mut StructField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// A method together with the instance it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundMethod {
    pub receiver: StructValue,
    /// Variable the receiver came from; mutating methods write back here.
    pub origin: Option<VarRef>,
    pub method: FunctionId,
    pub name: Name,
}
