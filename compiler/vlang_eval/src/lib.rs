//! Tree-walking evaluator for V-lang.
//!
//! # Architecture
//!
//! - [`Environment`]: arena of scopes addressed by handle, with
//!   generation-checked variable references
//! - [`CallStack`]: signal frames that `return`, `break` and `continue`
//!   unwind to
//! - [`Value`]: the runtime value model and its implicit conversions
//! - [`operators`]: per-operator strategies, including short-circuiting
//! - [`Builtin`]: `print`, `println`, `len`, `append` and friends
//! - [`Interpreter`]: statement and expression evaluation, argument
//!   binding, methods and places
//!
//! [`run_source`] drives a whole program from text and collects program
//! output in a [`Console`](vlang_diagnostic::Console) and every problem in
//! an [`ErrorTable`](vlang_diagnostic::ErrorTable).

pub mod builtins;
pub mod call_stack;
mod config;
mod declarations;
pub mod environment;
pub mod errors;
pub mod interpreter;
pub mod operators;
mod pipeline;
pub mod symbols;
pub mod value;

pub use builtins::{Builtin, BuiltinRegistry};
pub use call_stack::{CallStack, FrameKind, Signal};
pub use config::EvalConfig;
pub use environment::{Environment, Mutability, ScopeId, VarRef, Variable};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::Interpreter;
pub use operators::evaluate_binary;
pub use pipeline::{check_syntax, run_source, run_source_with, RunOutput};
pub use symbols::{Symbol, SymbolKind, SymbolTable};
pub use value::{Value, ValueType};
