//! Range handles into the arena's side tables.
//!
//! A range is `start + len` into one flat `Vec`, which keeps every node
//! `Copy` regardless of how many children it has.

macro_rules! define_range {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u16,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u16) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) const fn bounds(&self) -> (usize, usize) {
                (self.start as usize, self.start as usize + self.len as usize)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}({}..{})",
                    stringify!($name),
                    self.start,
                    self.start + u32::from(self.len)
                )
            }
        }
    )* };
}

define_range!(
    ExprRange,
    StmtRange,
    CallArgRange,
    FieldInitRange,
    TemplatePartRange,
    CaseRange,
);
