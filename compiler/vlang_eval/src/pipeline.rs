//! Source-to-result driver: lex, parse, then evaluate.
//!
//! Lexical and syntax errors go into the same [`ErrorTable`] as evaluation
//! errors. A program with front-end errors is not evaluated at all.

use vlang_diagnostic::{Console, ErrorKind, ErrorTable, LineIndex, SharedConsole};
use vlang_ir::StringInterner;
use vlang_lexer::LexOutput;
use vlang_parse::ParseOutput;

use crate::config::EvalConfig;
use crate::interpreter::Interpreter;
use crate::symbols::SymbolTable;

/// Everything one run produced.
pub struct RunOutput {
    pub errors: ErrorTable,
    pub symbols: SymbolTable,
    pub console: SharedConsole,
    /// Whether evaluation took place (no lexical or syntax errors).
    pub evaluated: bool,
}

/// Run `source` with a console chosen by `config`.
pub fn run_source(source: &str, config: &EvalConfig) -> RunOutput {
    let console = if config.echo_console {
        Console::stdout()
    } else {
        Console::buffered()
    };
    run_source_with(source, config, console)
}

/// Run `source`, writing program output to `console`.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn run_source_with(source: &str, config: &EvalConfig, console: SharedConsole) -> RunOutput {
    let interner = StringInterner::new();
    let lines = LineIndex::new(source);
    let lexed = vlang_lexer::lex(source, &interner);
    let parsed = vlang_parse::parse(&lexed.tokens, &interner);
    let mut errors = front_end_errors(&lexed, &parsed, &lines);
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "front-end errors, skipping evaluation");
        return RunOutput {
            errors,
            symbols: SymbolTable::new(),
            console,
            evaluated: false,
        };
    }

    let mut interpreter =
        Interpreter::new(&parsed.arena, &interner, &lines, console.clone(), config.clone());
    interpreter.run(&parsed.module);
    let (mut eval_errors, symbols) = interpreter.into_parts();
    errors.append(&mut eval_errors);
    RunOutput {
        errors,
        symbols,
        console,
        evaluated: true,
    }
}

/// Lex and parse `source` without evaluating it; only the errors are kept.
pub fn check_syntax(source: &str) -> ErrorTable {
    let interner = StringInterner::new();
    let lines = LineIndex::new(source);
    let lexed = vlang_lexer::lex(source, &interner);
    let parsed = vlang_parse::parse(&lexed.tokens, &interner);
    front_end_errors(&lexed, &parsed, &lines)
}

fn front_end_errors(lexed: &LexOutput, parsed: &ParseOutput, lines: &LineIndex) -> ErrorTable {
    let mut errors = ErrorTable::new();
    for error in &lexed.errors {
        let (line, column) = lines.span_start(error.span);
        errors.add(ErrorKind::Lexical, line, column, error.to_string());
    }
    for error in &parsed.errors {
        let (line, column) = lines.span_start(error.span);
        errors.add(ErrorKind::Syntax, line, column, error.to_string());
    }
    errors
}
