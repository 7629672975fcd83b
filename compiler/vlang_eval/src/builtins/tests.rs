#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use vlang_ir::BaseType;

use super::*;
use crate::value::MatrixValue;

fn call(builtin: Builtin, args: &[Value]) -> (Result<Value, String>, String) {
    let console = Console::new(vlang_diagnostic::Echo::Silent);
    let interner = StringInterner::new();
    let ctx = BuiltinContext {
        console: &console,
        interner: &interner,
        float_precision: 4,
        line: 1,
    };
    let result = builtin.call(&ctx, args);
    (result, console.output())
}

fn ints(items: &[i64]) -> Value {
    Value::Vector(VectorValue::new(
        BaseType::Int,
        items.iter().copied().map(Value::Int).collect(),
    ))
}

#[test]
fn registry_knows_every_builtin() {
    let interner = StringInterner::new();
    let registry = BuiltinRegistry::new(&interner);
    assert_eq!(registry.len(), Builtin::ALL.len());
    assert_eq!(
        registry.get(interner.intern("indexOf")),
        Some(Builtin::IndexOf)
    );
    assert!(!registry.contains(interner.intern("main")));
}

#[test]
fn print_joins_with_spaces() {
    let (result, output) = call(
        Builtin::Print,
        &[Value::Int(1), Value::Float(2.5), Value::string("x")],
    );
    assert_eq!(result.unwrap(), Value::Nil);
    assert_eq!(output, "1 2.5000 x");

    let (_, output) = call(Builtin::Println, &[ints(&[1, 2, 3])]);
    assert_eq!(output, "[ 1 2 3 ]\n");
}

#[test]
fn len_of_each_kind() {
    assert_eq!(call(Builtin::Len, &[ints(&[1, 2])]).0.unwrap(), Value::Int(2));
    assert_eq!(
        call(Builtin::Len, &[Value::string("ñam")]).0.unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        call(Builtin::Len, &[Value::Int(3)]).0.unwrap_err(),
        "expected a vector, matrix or string, found int"
    );
}

#[test]
fn append_copies_and_casts() {
    let original = ints(&[1]);
    let grown = call(Builtin::Append, &[original.clone(), Value::Float(2.9)])
        .0
        .unwrap();
    assert_eq!(grown, ints(&[1, 2]));
    assert_eq!(original, ints(&[1]));

    let err = call(Builtin::Append, &[ints(&[1]), Value::Bool(true)])
        .0
        .unwrap_err();
    assert_eq!(err, "cannot append bool to []int");
}

#[test]
fn append_to_wildcard_adopts_item_type() {
    let empty = Value::Vector(VectorValue::empty(None));
    let grown = call(Builtin::Append, &[empty, Value::Int(4)]).0.unwrap();
    assert_eq!(grown, ints(&[4]));
}

#[test]
fn append_row_to_matrix() {
    let matrix = Value::Matrix(MatrixValue::empty(BaseType::Int));
    let grown = call(Builtin::Append, &[matrix, ints(&[1, 2])]).0.unwrap();
    let Value::Matrix(m) = grown else {
        panic!("expected a matrix");
    };
    assert_eq!(m.len(), 1);
}

#[test]
fn join_strings_and_runes() {
    let words = Value::Vector(VectorValue::new(
        BaseType::String,
        vec![Value::string("a"), Value::string("bc")],
    ));
    assert_eq!(
        call(Builtin::Join, &[words, Value::Rune(',')]).0.unwrap(),
        Value::string("a,bc")
    );
}

#[test]
fn index_of_vectors_and_strings() {
    assert_eq!(
        call(Builtin::IndexOf, &[ints(&[5, 6, 7]), Value::Int(7)])
            .0
            .unwrap(),
        Value::Int(2)
    );
    assert_eq!(
        call(Builtin::IndexOf, &[ints(&[5]), Value::Int(9)]).0.unwrap(),
        Value::Int(-1)
    );
    assert_eq!(
        call(Builtin::IndexOf, &[Value::string("héllo"), Value::string("llo")])
            .0
            .unwrap(),
        Value::Int(2)
    );
}

#[test]
fn conversions() {
    assert_eq!(
        call(Builtin::Atoi, &[Value::string(" 42 ")]).0.unwrap(),
        Value::Int(42)
    );
    assert_eq!(
        call(Builtin::Atoi, &[Value::string("3.9")]).0.unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        call(Builtin::Atoi, &[Value::string("abc")]).0.unwrap_err(),
        "cannot convert \"abc\" to int"
    );
    assert_eq!(
        call(Builtin::ParseFloat, &[Value::string("2.5")]).0.unwrap(),
        Value::Float(2.5)
    );
    assert_eq!(
        call(Builtin::TypeOf, &[ints(&[])]).0.unwrap(),
        Value::string("[]int")
    );
}

#[test]
fn direct_calls_with_wrong_arity_fail_cleanly() {
    for builtin in [Builtin::Len, Builtin::Atoi, Builtin::ParseFloat, Builtin::TypeOf] {
        assert_eq!(
            call(builtin, &[]).0.unwrap_err(),
            "expected 1 argument, found 0"
        );
    }
    for builtin in [Builtin::Append, Builtin::Join, Builtin::IndexOf] {
        assert_eq!(
            call(builtin, &[ints(&[1])]).0.unwrap_err(),
            "expected 2 arguments, found 1"
        );
    }
}
