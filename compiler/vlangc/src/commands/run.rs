//! The `run` and `check` commands.

use vlang_eval::run_source;

use super::{read_file, report_errors, RunOptions};
use crate::settings::config_from_env;

/// Evaluate a program, echoing its output as it is produced.
///
/// Errors do not stop the run; they are reported once it finishes, and the
/// process exits with status 1 if there were any.
pub fn run_file(path: &str, options: RunOptions) {
    let source = read_file(path);
    let config = config_from_env();
    tracing::debug!(path, ?config, "run");
    let output = run_source(&source, &config);
    let printed = output.console.output();
    if !printed.is_empty() && !printed.ends_with('\n') {
        println!();
    }

    if options.show_symbols {
        println!("{}", output.symbols.render());
    }
    if options.show_errors {
        println!("{}", output.errors.render());
    } else {
        report_errors(path, &output.errors);
    }
    if !output.errors.is_empty() {
        std::process::exit(1);
    }
}

/// Evaluate a program without showing its output and report only the
/// problems found.
pub fn check_file(path: &str) {
    let source = read_file(path);
    let config = config_from_env().with_echo(false);
    tracing::debug!(path, ?config, "check");
    let output = run_source(&source, &config);
    if output.errors.is_empty() {
        println!("OK: {path}");
        return;
    }
    report_errors(path, &output.errors);
    std::process::exit(1);
}
