//! Property tests for evaluation invariants that should hold for any
//! input values.

#![allow(
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use vlang_eval::{run_source, EvalConfig};

fn run(source: &str) -> (String, usize) {
    let out = run_source(source, &EvalConfig::default());
    (out.console.output(), out.errors.len())
}

fn print_style(items: &[i64]) -> String {
    let mut out = String::from("[");
    for item in items {
        out.push(' ');
        out.push_str(&item.to_string());
    }
    out.push_str(" ]");
    out
}

fn literal(items: &[i64]) -> String {
    let items: Vec<String> = items.iter().map(i64::to_string).collect();
    format!("[{}]", items.join(", "))
}

proptest! {
    #[test]
    fn integer_arithmetic_matches_host(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let (output, errors) = run(&format!("println({a} + {b} * 3 - {a})\n"));
        prop_assert_eq!(errors, 0);
        prop_assert_eq!(output, format!("{}\n", a + b * 3 - a));
    }

    #[test]
    fn inner_declarations_do_not_leak(outer in 0i64..1000, inner in 0i64..1000) {
        let source = format!(
            "mut x int = {outer}\nif true {{\n  mut x int = {inner}\n  x += 1\n}}\nprintln(x)\n"
        );
        let (output, errors) = run(&source);
        prop_assert_eq!(errors, 0);
        prop_assert_eq!(output, format!("{outer}\n"));
    }

    #[test]
    fn copies_are_independent(items in prop::collection::vec(0i64..1000, 1..8)) {
        let source = format!(
            "mut a = {}\nmut b = a\nb[0] = b[0] + 1\nprintln(a)\n",
            literal(&items)
        );
        let (output, errors) = run(&source);
        prop_assert_eq!(errors, 0);
        prop_assert_eq!(output, format!("{}\n", print_style(&items)));
    }

    #[test]
    fn reference_parameters_write_back(start in 0i64..1000, times in 0usize..5) {
        let calls = "add_one(mut n)\n".repeat(times);
        let source = format!(
            "fn add_one(mut v int) {{\n  v++\n}}\nmut n int = {start}\n{calls}println(n)\n"
        );
        let (output, errors) = run(&source);
        prop_assert_eq!(errors, 0);
        let expected = (0..times).fold(start, |n, _| n + 1);
        prop_assert_eq!(output, format!("{expected}\n"));
    }
}
