//! V-lang CLI
//!
//! Tree-walking evaluator front end.

use vlangc::commands::{check_file, lex_file, parse_file, run_file, symbols_file, RunOptions};
use vlangc::tracing_setup::init_tracing;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: vlang run <file.v> [--errors] [--symbols]");
                std::process::exit(1);
            };
            let options = match RunOptions::parse(&args[3..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            };
            run_file(path, options);
        }
        "check" | "parse" | "lex" | "symbols" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: vlang {command} <file.v>");
                std::process::exit(1);
            };
            match command.as_str() {
                "check" => check_file(path),
                "parse" => parse_file(path),
                "lex" => lex_file(path),
                _ => symbols_file(path),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("vlang {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare `.v` path runs the file.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("v"))
            {
                run_file(command, RunOptions::default());
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("V-lang tree-walking evaluator");
    println!();
    println!("Usage: vlang <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.v>         Evaluate a program");
    println!("  check <file.v>       Evaluate without output, report errors only");
    println!("  symbols <file.v>     List every declaration made by a run");
    println!("  parse <file.v>       Print the statement tree");
    println!("  lex <file.v>         Print the token stream");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --errors, -e         Print the full error table");
    println!("  --symbols, -s        Print the symbol report");
    println!();
    println!("Environment:");
    println!("  VLANG_MAX_DEPTH        Maximum call depth (default 1024)");
    println!("  VLANG_FLOAT_PRECISION  Decimals printed for floats (default 4)");
    println!("  VLANG_LOG              Log filter, e.g. vlang_eval=debug");
}
