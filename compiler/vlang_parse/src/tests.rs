use pretty_assertions::assert_eq;
use vlang_ir::{
    AssignOp, BaseType, BinaryOp, ExprKind, ParsedType, StepOp, StmtKind, StringInterner,
    TemplatePart,
};

use super::*;

fn parse_source(source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = vlang_lexer::lex(source, interner);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    parse(&lexed.tokens, interner)
}

fn parse_ok(source: &str, interner: &StringInterner) -> ParseOutput {
    let output = parse_source(source, interner);
    assert!(output.errors.is_empty(), "parse errors: {:?}", output.errors);
    output
}

fn first_kind(output: &ParseOutput) -> StmtKind {
    output.arena.get_stmt(output.module.stmts[0]).kind
}

#[test]
fn mutable_declaration_with_type() {
    let interner = StringInterner::new();
    let output = parse_ok("mut x int = 5", &interner);
    let StmtKind::VarDecl {
        name,
        ty,
        init,
        mutable,
        ..
    } = first_kind(&output)
    else {
        panic!("expected declaration");
    };
    assert_eq!(interner.lookup(name), "x");
    assert_eq!(ty, Some(ParsedType::scalar(BaseType::Int)));
    assert!(mutable);
    let init = init.map(|id| output.arena.get_expr(id).kind);
    assert_eq!(init, Some(ExprKind::Int(5)));
}

#[test]
fn constant_requires_initialiser() {
    let interner = StringInterner::new();
    let output = parse_source("x int", &interner);
    assert_eq!(output.errors.len(), 1);
    assert!(output.errors[0].message.contains("must be initialised"));
    assert_eq!(output.errors[0].context, Some(ErrorContext::VarDecl));
}

#[test]
fn vector_and_matrix_types() {
    let interner = StringInterner::new();
    let output = parse_ok("mut v []float\nmut m [][]string", &interner);
    let types: Vec<Option<ParsedType>> = output
        .module
        .stmts
        .iter()
        .map(|&id| match output.arena.get_stmt(id).kind {
            StmtKind::VarDecl { ty, .. } => ty,
            _ => None,
        })
        .collect();
    assert_eq!(
        types,
        vec![
            Some(ParsedType::vector(BaseType::Float)),
            Some(ParsedType::matrix(BaseType::String)),
        ]
    );
}

#[test]
fn precedence_climbing() {
    let interner = StringInterner::new();
    let output = parse_ok("x = 1 + 2 * 3 == 7 && !done", &interner);
    let StmtKind::Assign { value, op, .. } = first_kind(&output) else {
        panic!("expected assignment");
    };
    assert_eq!(op, AssignOp::Assign);
    let ExprKind::Binary {
        op: BinaryOp::And,
        left,
        ..
    } = output.arena.get_expr(value).kind
    else {
        panic!("expected && at the root");
    };
    let ExprKind::Binary {
        op: BinaryOp::Eq,
        left: sum,
        ..
    } = output.arena.get_expr(left).kind
    else {
        panic!("expected == under &&");
    };
    assert!(matches!(
        output.arena.get_expr(sum).kind,
        ExprKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn subtraction_is_left_associative() {
    let interner = StringInterner::new();
    let output = parse_ok("r = 10 - 4 - 3", &interner);
    let StmtKind::Assign { value, .. } = first_kind(&output) else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { left, right, .. } = output.arena.get_expr(value).kind else {
        panic!("expected binary");
    };
    assert!(matches!(
        output.arena.get_expr(left).kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
    assert_eq!(output.arena.get_expr(right).kind, ExprKind::Int(3));
}

#[test]
fn increment_and_compound_assignment() {
    let interner = StringInterner::new();
    let output = parse_ok("i++; total += v[i]", &interner);
    assert!(matches!(
        first_kind(&output),
        StmtKind::Step {
            op: StepOp::Increment,
            ..
        }
    ));
    let second = output.arena.get_stmt(output.module.stmts[1]).kind;
    assert!(matches!(
        second,
        StmtKind::Assign {
            op: AssignOp::AddAssign,
            ..
        }
    ));
}

#[test]
fn assignment_to_literal_is_rejected() {
    let interner = StringInterner::new();
    let output = parse_source("5 = x", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].context, Some(ErrorContext::Assignment));
}

#[test]
fn function_with_labeled_and_reference_params() {
    let interner = StringInterner::new();
    let source = "fn move(mut p Point, by delta int, items []int) int { return delta }";
    let output = parse_ok(source, &interner);
    let StmtKind::FnDecl(id) = first_kind(&output) else {
        panic!("expected function");
    };
    let decl = output.arena.get_function(id);
    assert_eq!(interner.lookup(decl.name), "move");
    assert_eq!(decl.params.len(), 3);
    assert!(decl.params[0].by_ref);
    assert_eq!(decl.params[0].extern_name, None);
    assert_eq!(decl.params[0].ty, ParsedType::scalar(BaseType::Named(interner.intern("Point"))));
    assert_eq!(decl.params[1].extern_name.map(|n| interner.lookup(n)), Some("by"));
    assert_eq!(interner.lookup(decl.params[1].name), "delta");
    assert_eq!(decl.params[2].ty, ParsedType::vector(BaseType::Int));
    assert_eq!(decl.ret, Some(ParsedType::scalar(BaseType::Int)));
}

#[test]
fn struct_with_fields_and_methods() {
    let interner = StringInterner::new();
    let source = "struct Point {
        int x
        int y
        fn sum() int { return x + y }
        mut fn shift(d int) { x += d }
    }";
    let output = parse_ok(source, &interner);
    let StmtKind::StructDecl(id) = first_kind(&output) else {
        panic!("expected struct");
    };
    let decl = output.arena.get_struct(id);
    assert_eq!(decl.fields.len(), 2);
    assert_eq!(decl.methods.len(), 2);
    assert!(!output.arena.get_function(decl.methods[0]).is_mutating);
    assert!(output.arena.get_function(decl.methods[1]).is_mutating);
}

#[test]
fn struct_literal_and_field_access() {
    let interner = StringInterner::new();
    let output = parse_ok("p = Point{x: 1, y: 2}.x", &interner);
    let StmtKind::Assign { value, .. } = first_kind(&output) else {
        panic!("expected assignment");
    };
    let ExprKind::Field { receiver, .. } = output.arena.get_expr(value).kind else {
        panic!("expected field access");
    };
    let ExprKind::StructLit { fields, .. } = output.arena.get_expr(receiver).kind else {
        panic!("expected struct literal");
    };
    assert_eq!(output.arena.get_field_inits(fields).len(), 2);
}

#[test]
fn if_header_is_not_a_struct_literal() {
    let interner = StringInterner::new();
    let output = parse_ok("if ready { x = 1 } else if other { x = 2 } else { x = 3 }", &interner);
    let StmtKind::If {
        cond, else_branch, ..
    } = first_kind(&output)
    else {
        panic!("expected if");
    };
    assert!(matches!(output.arena.get_expr(cond).kind, ExprKind::Ident(_)));
    let nested = else_branch.map(|id| output.arena.get_stmt(id).kind);
    assert!(matches!(nested, Some(StmtKind::If { else_branch: Some(_), .. })));
}

#[test]
fn for_shapes() {
    let interner = StringInterner::new();
    let source = "for i, v in items { }
        for v in items { }
        for mut i = 0; i < 3; i++ { }
        for x < 10 { }";
    let output = parse_ok(source, &interner);
    let kinds: Vec<StmtKind> = output
        .module
        .stmts
        .iter()
        .map(|&id| output.arena.get_stmt(id).kind)
        .collect();
    assert!(matches!(kinds[0], StmtKind::ForIn { index: Some(_), .. }));
    assert!(matches!(kinds[1], StmtKind::ForIn { index: None, .. }));
    assert!(matches!(
        kinds[2],
        StmtKind::ForClassic {
            init: Some(_),
            cond: Some(_),
            step: Some(_),
            ..
        }
    ));
    assert!(matches!(kinds[3], StmtKind::While { .. }));
}

#[test]
fn switch_cases_and_default() {
    let interner = StringInterner::new();
    let source = "switch n { case 1: print(\"one\") \
                  case 2: print(\"two\"); break default: print(\"many\") }";
    let output = parse_ok(source, &interner);
    let StmtKind::Switch { cases, default, .. } = first_kind(&output) else {
        panic!("expected switch");
    };
    let cases = output.arena.get_cases(cases);
    assert_eq!(cases.len(), 2);
    assert_eq!(output.arena.get_stmt_list(cases[1].body).len(), 2);
    assert!(default.is_some());
}

#[test]
fn call_arguments() {
    let interner = StringInterner::new();
    let output = parse_ok("swap(mut a, to: mut b, 3)", &interner);
    let StmtKind::Expr(call) = first_kind(&output) else {
        panic!("expected expression statement");
    };
    let ExprKind::Call { args, .. } = output.arena.get_expr(call).kind else {
        panic!("expected call");
    };
    let args = output.arena.get_call_args(args);
    assert_eq!(args.len(), 3);
    assert!(args[0].by_ref && args[0].label.is_none());
    assert!(args[1].by_ref);
    assert_eq!(args[1].label.map(|l| interner.lookup(l)), Some("to"));
    assert!(!args[2].by_ref);
}

#[test]
fn mut_argument_must_be_a_place() {
    let interner = StringInterner::new();
    let output = parse_source("f(mut 3)", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].context, Some(ErrorContext::CallArgs));
}

#[test]
fn collection_literals() {
    let interner = StringInterner::new();
    let output = parse_ok(
        "a = [1, 2]\nb = []int{3}\nc = [][]int{{1, 2}, {3, 4}}\nmut d []int = []",
        &interner,
    );
    let values: Vec<ExprKind> = output
        .module
        .stmts
        .iter()
        .filter_map(|&id| match output.arena.get_stmt(id).kind {
            StmtKind::Assign { value, .. } => Some(output.arena.get_expr(value).kind),
            StmtKind::VarDecl { init, .. } => init.map(|e| output.arena.get_expr(e).kind),
            _ => None,
        })
        .collect();
    assert!(matches!(values[0], ExprKind::Vector { elem: None, .. }));
    assert!(matches!(
        values[1],
        ExprKind::Vector {
            elem: Some(BaseType::Int),
            ..
        }
    ));
    let ExprKind::Matrix { rows, .. } = values[2] else {
        panic!("expected matrix");
    };
    assert_eq!(output.arena.get_expr_list(rows).len(), 2);
    let ExprKind::Vector { elem: None, items } = values[3] else {
        panic!("expected empty vector");
    };
    assert!(items.is_empty());
}

#[test]
fn template_holes_become_paths() {
    let interner = StringInterner::new();
    let output = parse_ok(r#"print("at ${p.x}, $name")"#, &interner);
    let StmtKind::Expr(call) = first_kind(&output) else {
        panic!("expected call");
    };
    let ExprKind::Call { args, .. } = output.arena.get_expr(call).kind else {
        panic!("expected call");
    };
    let arg = output.arena.get_call_args(args)[0].value;
    let ExprKind::Template(parts) = output.arena.get_expr(arg).kind else {
        panic!("expected template");
    };
    let parts = output.arena.get_template_parts(parts);
    assert_eq!(parts.len(), 4);
    let TemplatePart::Hole { expr, .. } = parts[1] else {
        panic!("expected hole");
    };
    assert!(matches!(
        output.arena.get_expr(expr).kind,
        ExprKind::Field { .. }
    ));
}

#[test]
fn recovery_continues_after_broken_statement() {
    let interner = StringInterner::new();
    let output = parse_source("mut x int = ; mut y int = 2", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.module.stmts.len(), 1);
}

#[test]
fn recovery_inside_block() {
    let interner = StringInterner::new();
    let output = parse_source("fn f() { x = ) ; return } mut z = 1", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.module.stmts.len(), 2);
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
    let interner = StringInterner::new();
    let depth = MAX_NESTING + 10;
    let source = format!("x = {}1{}", "(".repeat(depth), ")".repeat(depth));
    let output = parse_source(&source, &interner);
    assert!(output.has_errors());
    assert!(output.errors[0].message.contains("nesting"));
}

#[test]
fn dump_renders_tree() {
    let interner = StringInterner::new();
    let output = parse_ok("mut x int = 1 + 2", &interner);
    let dump = dump_module(&output.module, &output.arena, &interner);
    assert_eq!(dump, "VarDecl mut x int\n  Binary +\n    Int 1\n    Int 2\n");
}
