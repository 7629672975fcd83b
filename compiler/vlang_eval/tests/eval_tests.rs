//! Whole-program tests: source text in, console output and error table
//! out.

use pretty_assertions::assert_eq;
use vlang_diagnostic::ErrorKind;
use vlang_eval::{run_source, EvalConfig, RunOutput, SymbolKind};

fn run(source: &str) -> RunOutput {
    run_source(source, &EvalConfig::default())
}

/// Output of a program that must run without errors.
fn output_of(source: &str) -> String {
    let out = run(source);
    assert!(out.errors.is_empty(), "unexpected errors:\n{}", out.errors.render());
    out.console.output()
}

/// `(line, message)` of every recorded error.
fn errors_of(out: &RunOutput) -> Vec<(u32, String)> {
    out.errors.iter().map(|e| (e.line, e.message.clone())).collect()
}

// -- Expressions --

#[test]
fn arithmetic_and_printing() {
    let source = "println(1 + 2 * 3)
println(7 / 2, 7 % 3)
println(2 * 1.25)
print(\"a\")
print(\"b\")
";
    assert_eq!(output_of(source), "7\n3 1\n2.5000\nab");
}

#[test]
fn block_comments_are_ignored() {
    let source = "/* header
   spanning lines */
println(1 /* inline */ + 2) // trailing
/** stars * inside **/
println(\"done\")
";
    assert_eq!(output_of(source), "3\ndone\n");
}

#[test]
fn float_precision_is_configurable() {
    let config = EvalConfig::default().with_float_precision(1);
    let out = run_source("println(1.5 + 1)\n", &config);
    assert_eq!(out.console.output(), "2.5\n");
}

#[test]
fn string_templates() {
    let source = "name = \"ann\"
age = 30
println(\"$name is ${age}\")
";
    assert_eq!(output_of(source), "ann is 30\n");
}

#[test]
fn implicit_conversions_on_declaration() {
    let source = "mut f float = 3
mut n int = \"42\"
mut s string = \"x\"
println(f, n + 1, s)
";
    assert_eq!(output_of(source), "3.0000 43 x\n");
}

#[test]
fn short_circuit_skips_right_operand() {
    let source = "fn loud() bool {
  println(\"evaluated\")
  return true
}
println(false && loud())
println(true || loud())
";
    assert_eq!(output_of(source), "false\ntrue\n");
}

// -- Scopes and bindings --

#[test]
fn inner_scope_shadows_and_writes_through() {
    let source = "mut x int = 1
if true {
  x = 2
  mut y int = 3
}
println(x)
println(y)
";
    let out = run(source);
    assert_eq!(out.console.output(), "2\n");
    assert_eq!(errors_of(&out), vec![(7, "undefined variable 'y'".to_owned())]);
}

#[test]
fn constants_cannot_be_reassigned() {
    let out = run("x = 1\nx = 2\nprintln(x)\n");
    assert_eq!(out.console.output(), "1\n");
    assert_eq!(errors_of(&out), vec![(2, "cannot assign to constant 'x'".to_owned())]);
}

#[test]
fn redeclaration_in_same_scope_is_rejected() {
    let out = run("mut a int = 1\nmut a int = 2\n");
    assert_eq!(
        errors_of(&out),
        vec![(2, "variable 'a' is already declared in this scope".to_owned())]
    );
}

#[test]
fn assignment_copies_collections() {
    let source = "mut a = [1, 2]
mut b = a
b[0] = 5
println(a)
println(b)
";
    assert_eq!(output_of(source), "[ 1 2 ]\n[ 5 2 ]\n");
}

// -- Functions --

#[test]
fn recursion() {
    let source = "fn fact(n int) int {
  if n <= 1 {
    return 1
  }
  return n * fact(n - 1)
}
println(fact(10))
";
    assert_eq!(output_of(source), "3628800\n");
}

#[test]
fn labeled_arguments() {
    let source = "fn area(width w int, height h int) int {
  return w * h
}
println(area(width: 2, height: 3))
println(area(height: 4, width: 2))
println(area(2, 3))
";
    let out = run(source);
    assert_eq!(out.console.output(), "6\n8\n");
    assert_eq!(
        errors_of(&out),
        vec![(
            6,
            "argument for parameter 'w' of 'area' must be labeled 'width:'".to_owned()
        )]
    );
}

#[test]
fn reference_arguments_alias_the_caller() {
    let source = "fn bump(mut n int) {
  n += 1
}
mut c int = 1
bump(mut c)
bump(mut c)
println(c)
bump(c)
";
    let out = run(source);
    assert_eq!(out.console.output(), "3\n");
    assert_eq!(
        errors_of(&out),
        vec![(
            8,
            "parameter 'n' of 'bump' takes a reference; pass it with `mut`".to_owned()
        )]
    );
}

#[test]
fn value_arguments_are_copies() {
    let source = "fn clear(items []int) {
  mut local = items
  local[0] = 0
}
mut v = [7, 8]
clear(v)
println(v)
";
    assert_eq!(output_of(source), "[ 7 8 ]\n");
}

#[test]
fn value_parameters_are_assignable_locals() {
    let source = "fn bump(n int) int {
  n = n + 1
  n++
  return n
}
mut x = 1
println(bump(x), x)
";
    assert_eq!(output_of(source), "3 1\n");
}

#[test]
fn variables_shadow_callables_in_calls_and_reads() {
    let source = "mut len = 5
println(len)
println(len([1, 2]))
";
    let out = run(source);
    assert_eq!(out.console.output(), "5\n");
    assert_eq!(
        errors_of(&out),
        vec![(3, "value of type int is not callable".to_owned())]
    );
}

#[test]
fn arity_is_checked() {
    let out = run("fn one(a int) int {\n  return a\n}\nprintln(one(1, 2))\n");
    assert_eq!(
        errors_of(&out),
        vec![(4, "function 'one' expects 1 arguments, found 2".to_owned())]
    );
}

#[test]
fn wrong_return_type_is_reported() {
    let out = run("fn f() int {\n  return \"no\"\n}\nf()\n");
    assert_eq!(
        errors_of(&out),
        vec![(4, "function 'f' must return int, found string".to_owned())]
    );
}

#[test]
fn call_depth_is_bounded() {
    let source = "fn down(n int) int {\n  return down(n + 1)\n}\ndown(0)\nprintln(\"after\")\n";
    let config = EvalConfig::default().with_max_call_depth(50);
    let out = run_source(source, &config);
    assert_eq!(out.console.output(), "after\n");
    assert_eq!(
        errors_of(&out),
        vec![(2, "maximum call depth of 50 exceeded".to_owned())]
    );
    assert!(out.errors.has_kind(ErrorKind::Runtime));
}

#[test]
fn functions_are_values() {
    let source = "fn twice(x int) int {
  return x * 2
}
f = twice
println(f(4))
";
    assert_eq!(output_of(source), "8\n");
}

// -- Structs --

const COUNTER: &str = "struct Counter {
  int n
  mut fn inc() {
    n += 1
  }
  fn get() int {
    return n
  }
}
";

#[test]
fn mutating_methods_update_the_receiver() {
    let source = format!(
        "{COUNTER}mut c = Counter{{n: 1}}
c.inc()
c.inc()
println(c.get(), c.n)
"
    );
    assert_eq!(output_of(&source), "3 3\n");
}

#[test]
fn mutating_method_on_constant_is_rejected() {
    let source = format!("{COUNTER}k = Counter{{n: 0}}\nk.inc()\nprintln(k.n)\n");
    let out = run(&source);
    assert_eq!(out.console.output(), "0\n");
    assert_eq!(
        errors_of(&out),
        vec![(
            11,
            "cannot call mutating method 'inc' on an immutable value".to_owned()
        )]
    );
}

#[test]
fn non_mutating_method_cannot_assign_fields() {
    let source = "struct P {
  int x
  fn reset() {
    x = 0
  }
}
mut p = P{x: 4}
p.reset()
println(p.x)
";
    let out = run(source);
    assert_eq!(out.console.output(), "4\n");
    assert_eq!(
        errors_of(&out),
        vec![(4, "cannot assign to field 'x' outside a mutating method".to_owned())]
    );
}

#[test]
fn struct_literals_default_missing_fields() {
    let source = "struct User {
  string name
  int age
}
u = User{name: \"bo\"}
println(u)
";
    assert_eq!(output_of(source), "User{name: \"bo\", age: 0}\n");
}

#[test]
fn unknown_field_is_reported() {
    let out = run("struct A {\n  int x\n}\na = A{x: 1}\nprintln(a.y)\n");
    assert_eq!(errors_of(&out), vec![(5, "struct 'A' has no field 'y'".to_owned())]);
}

// -- Collections --

#[test]
fn vectors_and_matrices() {
    let source = "mut v = [1, 2]
v = append(v, 3)
println(v, len(v))
mut grid = [][]int{{1, 2}, {3, 4}}
grid[1][0] = 9
println(grid)
println(grid[0])
";
    assert_eq!(output_of(source), "[ 1 2 3 ] 3\n[ [ 1 2 ] [ 9 4 ] ]\n[ 1 2 ]\n");
}

#[test]
fn index_out_of_range_is_a_runtime_error() {
    let out = run("v = [1]\nprintln(v[3])\nprintln(\"next\")\n");
    assert_eq!(out.console.output(), "next\n");
    assert_eq!(
        errors_of(&out),
        vec![(2, "index 3 out of range for length 1".to_owned())]
    );
    assert_eq!(out.errors.entries()[0].kind, ErrorKind::Runtime);
}

// -- Control flow --

#[test]
fn classic_for_with_break_and_continue() {
    let source = "mut total int = 0
for mut i = 0; i < 10; i++ {
  if i == 5 {
    break
  }
  if i % 2 == 0 {
    continue
  }
  total += i
}
println(total)
";
    assert_eq!(output_of(source), "4\n");
}

#[test]
fn for_in_over_vectors_and_strings() {
    let source = "items = [10, 20]
for i, v in items {
  println(i, v)
}
for c in \"hé\" {
  print(c)
}
";
    assert_eq!(output_of(source), "0 10\n1 20\nhé");
}

#[test]
fn while_loops() {
    let source = "mut n int = 3
while n > 0 {
  print(n)
  n--
}
";
    assert_eq!(output_of(source), "321");
}

#[test]
fn switch_picks_one_case() {
    let source = "items = [1, 2, 3]
for v in items {
  switch v {
  case 1: println(\"one\")
  case 2: println(\"two\")
  default: println(\"many\")
  }
}
";
    assert_eq!(output_of(source), "one\ntwo\nmany\n");
}

#[test]
fn break_in_switch_leaves_only_the_switch() {
    let source = "mut count int = 0
for mut i = 0; i < 3; i++ {
  switch i {
  case 1: break
  }
  count++
}
println(count)
";
    assert_eq!(output_of(source), "3\n");
}

#[test]
fn return_from_inside_loops() {
    let source = "fn first_even(items []int) int {
  for v in items {
    if v % 2 == 0 {
      return v
    }
  }
  return -1
}
println(first_even([3, 5, 6, 8]))
";
    assert_eq!(output_of(source), "6\n");
}

#[test]
fn misplaced_signals_are_errors() {
    let out = run("return 1\nbreak\nprintln(\"still running\")\n");
    assert_eq!(out.console.output(), "still running\n");
    assert_eq!(
        errors_of(&out),
        vec![
            (1, "return must be inside a function".to_owned()),
            (2, "break must be inside a loop or switch".to_owned()),
        ]
    );
}

#[test]
fn non_bool_condition_is_reported() {
    let out = run("if 1 {\n  println(\"no\")\n}\n");
    assert_eq!(errors_of(&out), vec![(1, "condition must be bool, found int".to_owned())]);
}

// -- Error recovery --

#[test]
fn evaluation_continues_after_errors() {
    let source = "mut x int = 1
y = x / 0
println(undefined)
println(x)
";
    let out = run(source);
    assert_eq!(out.console.output(), "1\n");
    assert_eq!(
        errors_of(&out),
        vec![
            (2, "division by zero".to_owned()),
            (3, "undefined variable 'undefined'".to_owned()),
        ]
    );
}

#[test]
fn syntax_errors_prevent_evaluation() {
    let out = run("println(1)\nmut = 3\n");
    assert!(!out.evaluated);
    assert_eq!(out.console.output(), "");
    assert!(out.errors.has_kind(ErrorKind::Syntax));
}

// -- Symbols --

#[test]
fn symbol_report_lists_scopes() {
    let source = "mut x int = 1
if true {
  y = 2.5
}
";
    let out = run(source);
    let x = out.symbols.find("x").next().cloned();
    let y = out.symbols.find("y").next().cloned();
    let (x, y) = (x.map(|s| (s.kind, s.ty, s.scope)), y.map(|s| (s.kind, s.ty, s.scope)));
    assert_eq!(
        x,
        Some((SymbolKind::Variable, "int".to_owned(), "global".to_owned()))
    );
    assert_eq!(
        y,
        Some((SymbolKind::Constant, "float".to_owned(), "global/if".to_owned()))
    );
}

// -- Reference scenarios --

#[test]
fn redeclared_constant_keeps_first_value() {
    let out = run("mut x int = 5\nx int = 10\nprintln(x)\n");
    assert_eq!(out.console.output(), "5\n");
    assert_eq!(
        errors_of(&out),
        vec![(2, "variable 'x' is already declared in this scope".to_owned())]
    );
}

#[test]
fn add_with_missing_argument() {
    let source = "fn add(a int, b int) int {
  return a + b
}
println(add(2, 3))
println(add(2))
";
    let out = run(source);
    assert_eq!(out.console.output(), "5\n");
    assert_eq!(
        errors_of(&out),
        vec![(5, "function 'add' expects 2 arguments, found 1".to_owned())]
    );
}

#[test]
fn break_stops_at_first_index() {
    let source = "for i, v in [10, 20, 30] {
  println(v)
  if i == 1 {
    break
  }
}
";
    assert_eq!(output_of(source), "10\n20\n");
}

#[test]
fn struct_field_scenario() {
    let source = "struct Point {
  int x; int y
}
println(Point{x: 1, y: 2}.x)
println(Point{x: 1}.z)
";
    let out = run(source);
    assert_eq!(out.console.output(), "1\n");
    assert_eq!(
        errors_of(&out),
        vec![(5, "struct 'Point' has no field 'z'".to_owned())]
    );
}

#[test]
fn matrix_rows_are_copies() {
    let source = "mut m = [][]int{{1, 2}, {3, 4}}
mut row = m[0]
row[0] = 7
println(m[0][0], row[0])
";
    assert_eq!(output_of(source), "1 7\n");
}
