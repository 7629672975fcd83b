//! Arena indices for the flat parse tree.
//!
//! Nodes refer to their children through `u32` indices into an
//! [`ExprArena`](crate::ExprArena) instead of owning boxes.

use std::fmt;

/// Index of an expression in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Sentinel for "no expression".
    pub const INVALID: ExprId = ExprId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            f.write_str("ExprId::INVALID")
        }
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Declares a plain `u32` index newtype for one arena table.
macro_rules! define_index {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    )* };
}

define_index!(
    /// Index of a statement in the arena.
    StmtId,
    /// Index of a function declaration (global function or struct method).
    FunctionId,
    /// Index of a struct declaration.
    StructId,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_id_validity() {
        assert!(ExprId::new(3).is_valid());
        assert!(!ExprId::INVALID.is_valid());
        assert!(!ExprId::default().is_valid());
    }

    #[test]
    fn index_newtypes_debug() {
        assert_eq!(format!("{:?}", StmtId::new(4)), "StmtId(4)");
        assert_eq!(format!("{:?}", FunctionId::new(0)), "FunctionId(0)");
        assert_eq!(StructId::new(9).index(), 9);
    }
}
