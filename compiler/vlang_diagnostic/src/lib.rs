//! Output sinks of the V-lang pipeline.
//!
//! - [`ErrorTable`]: every lexical, syntax, semantic and runtime error with
//!   its 1-based line and column
//! - [`Console`]: structured, timestamped program output
//! - [`LineIndex`]: byte offset to line/column conversion
//!
//! Neither sink writes to the terminal on its own unless built with
//! [`Echo::Stdout`].

mod console;
mod error_table;
mod line_index;

pub use console::{Console, ConsoleMessage, Echo, MessageKind, SharedConsole};
pub use error_table::{ErrorEntry, ErrorKind, ErrorSummary, ErrorTable};
pub use line_index::LineIndex;
