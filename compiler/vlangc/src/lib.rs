//! V-lang command-line driver.
//!
//! The binary in `main.rs` only dispatches; every command lives in
//! [`commands`] so it can be exercised from tests.

pub mod commands;
pub mod settings;
pub mod tracing_setup;
