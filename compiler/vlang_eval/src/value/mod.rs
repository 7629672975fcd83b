//! Runtime values.
//!
//! [`Value`] is the closed set of everything an expression can produce.
//! Composites own their contents: cloning a vector, matrix or struct is a
//! deep copy, which is what assignment and argument passing do. The only
//! aliasing value is [`Value::Pointer`], a handle to a variable slot.

mod cast;
mod composite;
mod format;


use std::rc::Rc;

use vlang_ir::{BaseType, FunctionId, Name, ParsedType, StringInterner};

use crate::builtins::Builtin;
use crate::environment::VarRef;

pub use cast::{conform, implicit_cast, parse_int};
pub use composite::{BoundMethod, MatrixValue, StructField, StructValue, VectorValue};
pub use format::{display, interpolate};

/// Runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Rune(char),
    Bool(bool),
    Nil,
    Vector(VectorValue),
    Matrix(MatrixValue),
    Struct(StructValue),
    /// Alias of a variable, created by `mut` arguments.
    Pointer(VarRef),
    Function {
        id: FunctionId,
        name: Name,
    },
    Builtin(Builtin),
    /// `receiver.method` taken as a value.
    BoundMethod(Rc<BoundMethod>),
}

impl Value {
    #[inline]
    pub fn string(text: &str) -> Value {
        Value::Str(Rc::from(text))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::String,
            Value::Rune(_) => ValueType::Rune,
            Value::Bool(_) => ValueType::Bool,
            Value::Nil => ValueType::Nil,
            Value::Vector(v) => ValueType::Vector(v.item),
            Value::Matrix(m) => ValueType::Matrix(m.item),
            Value::Struct(s) => ValueType::Struct(s.name),
            Value::Pointer(_) => ValueType::Pointer,
            Value::Function { .. } | Value::BoundMethod(_) => ValueType::Function,
            Value::Builtin(_) => ValueType::Builtin,
        }
    }

    /// Type name as reported by `TypeOf` and error messages.
    pub fn type_name(&self, interner: &StringInterner) -> String {
        self.value_type().display(interner)
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Equality used by `switch`, `indexOf` and `==` on same-kind operands:
    /// strict structural equality, except that a rune equals the
    /// one-character string spelling it.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(s), Value::Rune(c)) | (Value::Rune(c), Value::Str(s)) => {
                let mut chars = s.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            _ => self == other,
        }
    }
}

/// Static type of a value or a declaration.
///
/// Vector item types reuse [`BaseType`]; `Vector(None)` is the wildcard
/// type of the empty literal `[]`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueType {
    Int,
    Float,
    String,
    Rune,
    Bool,
    Nil,
    Struct(Name),
    Vector(Option<BaseType>),
    Matrix(BaseType),
    Pointer,
    Function,
    Builtin,
}

impl ValueType {
    pub const fn from_base(base: BaseType) -> ValueType {
        match base {
            BaseType::Int => ValueType::Int,
            BaseType::Float => ValueType::Float,
            BaseType::String => ValueType::String,
            BaseType::Bool => ValueType::Bool,
            BaseType::Rune => ValueType::Rune,
            BaseType::Named(name) => ValueType::Struct(name),
        }
    }

    /// Item type a vector of this scalar type would carry.
    pub const fn as_base(self) -> Option<BaseType> {
        match self {
            ValueType::Int => Some(BaseType::Int),
            ValueType::Float => Some(BaseType::Float),
            ValueType::String => Some(BaseType::String),
            ValueType::Bool => Some(BaseType::Bool),
            ValueType::Rune => Some(BaseType::Rune),
            ValueType::Struct(name) => Some(BaseType::Named(name)),
            _ => None,
        }
    }

    /// Type named by an annotation. Struct names are not checked here.
    pub const fn from_parsed(ty: ParsedType) -> ValueType {
        match ty.dims {
            0 => ValueType::from_base(ty.base),
            1 => ValueType::Vector(Some(ty.base)),
            _ => ValueType::Matrix(ty.base),
        }
    }

    /// Struct-typed slots may hold nil.
    #[inline]
    pub const fn allows_nil(self) -> bool {
        matches!(self, ValueType::Struct(_))
    }

    /// Initial value of an uninitialised declaration.
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String => Value::string(""),
            ValueType::Rune => Value::Rune('\0'),
            ValueType::Bool => Value::Bool(false),
            ValueType::Vector(item) => Value::Vector(VectorValue::empty(item)),
            ValueType::Matrix(item) => Value::Matrix(MatrixValue::empty(item)),
            ValueType::Nil
            | ValueType::Struct(_)
            | ValueType::Pointer
            | ValueType::Function
            | ValueType::Builtin => Value::Nil,
        }
    }

    pub fn display(self, interner: &StringInterner) -> String {
        match self {
            ValueType::Int => "int".to_owned(),
            ValueType::Float => "float".to_owned(),
            ValueType::String => "string".to_owned(),
            ValueType::Rune => "rune".to_owned(),
            ValueType::Bool => "bool".to_owned(),
            ValueType::Nil => "nil".to_owned(),
            ValueType::Struct(name) => interner.lookup(name).to_owned(),
            ValueType::Vector(None) => "[]".to_owned(),
            ValueType::Vector(Some(item)) => {
                format!("[]{}", ValueType::from_base(item).display(interner))
            }
            ValueType::Matrix(item) => {
                format!("[][]{}", ValueType::from_base(item).display(interner))
            }
            ValueType::Pointer => "pointer".to_owned(),
            ValueType::Function => "fn".to_owned(),
            ValueType::Builtin => "builtin".to_owned(),
        }
    }
}
