//! Type annotations as written in source.

use crate::Name;

/// Element type at the bottom of a (possibly nested) vector type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BaseType {
    Int,
    Float,
    String,
    Bool,
    Rune,
    /// A user-declared struct, resolved by the evaluator.
    Named(Name),
}

impl BaseType {
    /// Map a built-in type keyword to its base type.
    pub fn from_keyword(text: &str) -> Option<BaseType> {
        match text {
            "int" => Some(BaseType::Int),
            "float" => Some(BaseType::Float),
            "string" => Some(BaseType::String),
            "bool" => Some(BaseType::Bool),
            "rune" => Some(BaseType::Rune),
            _ => None,
        }
    }
}

/// A type annotation: a base type wrapped in zero, one (`[]T`) or two
/// (`[][]T`) vector layers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParsedType {
    pub base: BaseType,
    pub dims: u8,
}

impl ParsedType {
    /// Deepest nesting the language supports (`[][]T`).
    pub const MAX_DIMS: u8 = 2;

    #[inline]
    pub const fn scalar(base: BaseType) -> Self {
        ParsedType { base, dims: 0 }
    }

    #[inline]
    pub const fn vector(base: BaseType) -> Self {
        ParsedType { base, dims: 1 }
    }

    #[inline]
    pub const fn matrix(base: BaseType) -> Self {
        ParsedType { base, dims: 2 }
    }
}
