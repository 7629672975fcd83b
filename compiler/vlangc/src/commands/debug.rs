//! Debug commands: `lex`, `parse` and `symbols`.

use vlang_diagnostic::LineIndex;
use vlang_eval::{check_syntax, run_source};
use vlang_ir::StringInterner;

use super::{read_file, report_errors};
use crate::settings::config_from_env;

/// Tokenize a file and print one token per line.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let lines = LineIndex::new(&source);
    let lexed = vlang_lexer::lex(&source, &interner);

    println!("Tokens for '{}' ({} tokens):", path, lexed.tokens.len());
    for token in lexed.tokens.iter() {
        let (line, column) = lines.span_start(token.span);
        println!("  {line:>4}:{column:<4} {:?}", token.kind);
    }
    for error in &lexed.errors {
        let (line, column) = lines.span_start(error.span);
        println!("  {line:>4}:{column:<4} error: {error}");
    }
}

/// Parse a file and print its statement tree.
pub fn parse_file(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let lexed = vlang_lexer::lex(&source, &interner);
    let parsed = vlang_parse::parse(&lexed.tokens, &interner);

    println!("Parse result for '{path}':");
    println!("  Statements: {}", parsed.module.stmts.len());
    println!();
    print!(
        "{}",
        vlang_parse::dump_module(&parsed.module, &parsed.arena, &interner)
    );

    let errors = check_syntax(&source);
    report_errors(path, &errors);
}

/// Run a file quietly and print every declaration it made.
pub fn symbols_file(path: &str) {
    let source = read_file(path);
    let config = config_from_env().with_echo(false);
    let output = run_source(&source, &config);
    print!("{}", output.symbols.render());
    report_errors(path, &output.errors);
}
