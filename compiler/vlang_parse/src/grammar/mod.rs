//! Grammar productions, one file per syntactic area.

mod expr;
mod item;
mod stmt;
mod template;
mod ty;
