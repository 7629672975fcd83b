#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use vlang_ir::{FunctionId, StringInterner};

use super::*;

fn int_var(name: Name, value: i64) -> Variable {
    Variable::new(
        name,
        ValueType::Int,
        Value::Int(value),
        Mutability::Mutable,
        Span::DUMMY,
    )
}

fn value_of(env: &Environment, name: Name) -> Option<Value> {
    env.lookup(name).map(|v| env.get(v).unwrap().value.clone())
}

#[test]
fn inner_binding_disappears_on_pop() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut env = Environment::new(interner.intern("global"));
    env.declare(int_var(x, 1)).unwrap();

    env.push_scope(interner.intern("block"));
    env.declare(int_var(x, 2)).unwrap();
    assert_eq!(value_of(&env, x), Some(Value::Int(2)));
    env.pop_scope();

    assert_eq!(value_of(&env, x), Some(Value::Int(1)));
}

#[test]
fn redeclaring_in_same_scope_fails() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut env = Environment::new(interner.intern("global"));
    env.declare(int_var(x, 5)).unwrap();
    assert_eq!(env.declare(int_var(x, 10)), Err(EnvError::AlreadyDeclared));
    assert_eq!(value_of(&env, x), Some(Value::Int(5)));
}

#[test]
fn global_scope_is_never_popped() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut env = Environment::new(interner.intern("global"));
    env.declare(int_var(x, 1)).unwrap();
    env.pop_scope();
    assert!(env.is_global());
    assert_eq!(value_of(&env, x), Some(Value::Int(1)));
}

#[test]
fn stale_handle_is_dangling_after_slot_reuse() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut env = Environment::new(interner.intern("global"));

    let first = env.push_scope(interner.intern("a"));
    let stale = env.declare(int_var(x, 1)).unwrap();
    env.pop_scope();

    let second = env.push_scope(interner.intern("b"));
    env.declare(int_var(x, 2)).unwrap();
    assert_eq!(first, second);
    assert_eq!(env.get(stale).err(), Some(EnvError::Dangling));
}

#[test]
fn lookup_follows_pointers() {
    let interner = StringInterner::new();
    let (x, p) = (interner.intern("x"), interner.intern("p"));
    let mut env = Environment::new(interner.intern("global"));
    let target = env.declare(int_var(x, 7)).unwrap();

    env.push_scope(interner.intern("call"));
    env.declare(Variable::new(
        p,
        ValueType::Int,
        Value::Pointer(target),
        Mutability::Mutable,
        Span::DUMMY,
    ))
    .unwrap();
    let resolved = env.lookup(p).unwrap();
    assert_eq!(resolved, target);
    env.get_mut(resolved).unwrap().value = Value::Int(8);
    env.pop_scope();

    assert_eq!(value_of(&env, x), Some(Value::Int(8)));
}

#[test]
fn function_scope_parent_is_declaration_scope() {
    let interner = StringInterner::new();
    let (local, f) = (interner.intern("local"), interner.intern("f"));
    let mut env = Environment::new(interner.intern("global"));
    env.declare_function(f, FunctionId::new(0)).unwrap();

    env.push_scope(interner.intern("caller"));
    env.declare(int_var(local, 1)).unwrap();
    env.push_scope_in(interner.intern("f"), ScopeId::GLOBAL, ScopeFlags::empty());

    assert!(env.lookup(local).is_none());
    assert_eq!(
        env.lookup_function(f),
        Some((FunctionId::new(0), ScopeId::GLOBAL))
    );
    assert_eq!(env.depth(), 2);
    env.pop_scope();
    assert!(env.lookup(local).is_some());
}

#[test]
fn children_and_path_track_nesting() {
    let interner = StringInterner::new();
    let mut env = Environment::new(interner.intern("global"));
    let outer = env.push_scope(interner.intern("main"));
    let inner = env.push_scope(interner.intern("while"));

    assert_eq!(env.children(outer), &[inner]);
    let path: Vec<&str> = env.path(inner).iter().map(|n| interner.lookup(*n)).collect();
    assert_eq!(path, vec!["global", "main", "while"]);

    env.pop_scope();
    assert!(env.children(outer).is_empty());
}

#[test]
fn struct_scope_is_found_from_nested_blocks() {
    let interner = StringInterner::new();
    let mut env = Environment::new(interner.intern("global"));
    let fields = env.push_scope_in(
        interner.intern("Point"),
        ScopeId::GLOBAL,
        ScopeFlags::STRUCT | ScopeFlags::MUTATING,
    );
    env.push_scope(interner.intern("move"));
    env.push_scope(interner.intern("if"));
    assert_eq!(env.enclosing_struct_scope(), Some(fields));
    assert!(env.flags(fields).contains(ScopeFlags::MUTATING));
}
