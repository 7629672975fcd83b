//! Command handlers for the `vlang` CLI.
//!
//! Each submodule implements one command. Shared helpers such as
//! [`read_file`] and error reporting live here.

use vlang_diagnostic::ErrorTable;

mod debug;
mod run;

pub use debug::{lex_file, parse_file, symbols_file};
pub use run::{check_file, run_file};

/// Flags accepted by `vlang run`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the full error table after the run.
    pub show_errors: bool,
    /// Print the symbol report after the run.
    pub show_symbols: bool,
}

impl RunOptions {
    /// Parse flags, returning the first argument that is not one.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = RunOptions::default();
        for arg in args {
            match arg.as_str() {
                "--errors" | "-e" => options.show_errors = true,
                "--symbols" | "-s" => options.show_symbols = true,
                other => return Err(format!("unknown option '{other}'")),
            }
        }
        Ok(options)
    }
}

pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// One `path:line:column: kind error: message` line per entry, then the
/// summary.
pub(crate) fn format_errors(path: &str, errors: &ErrorTable) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for entry in errors {
        let _ = writeln!(
            out,
            "{path}:{}:{}: {} error: {}",
            entry.line, entry.column, entry.kind, entry.message
        );
    }
    let _ = write!(out, "{}", errors.summary());
    out
}

pub(crate) fn report_errors(path: &str, errors: &ErrorTable) {
    if !errors.is_empty() {
        eprintln!("{}", format_errors(path, errors));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn run_flags() {
        assert_eq!(RunOptions::parse(&args(&[])), Ok(RunOptions::default()));
        assert_eq!(
            RunOptions::parse(&args(&["--symbols", "-e"])),
            Ok(RunOptions {
                show_errors: true,
                show_symbols: true,
            })
        );
        assert_eq!(
            RunOptions::parse(&args(&["--fast"])),
            Err("unknown option '--fast'".to_owned())
        );
    }

    #[test]
    fn errors_are_prefixed_with_the_path() {
        let mut table = ErrorTable::new();
        table.add_semantic(3, 7, "undefined variable 'x'");
        assert_eq!(
            format_errors("demo.v", &table),
            "demo.v:3:7: Semantic error: undefined variable 'x'\n\
             1 error(s): 0 lexical, 0 syntax, 1 semantic, 0 runtime"
        );
    }
}
