#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use vlang_diagnostic::ErrorKind;

use super::*;

fn eval(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    evaluate_binary(op, &left, &right, &StringInterner::new())
}

#[test]
fn int_arithmetic() {
    assert_eq!(
        eval(BinaryOp::Add, Value::Int(2), Value::Int(3)).unwrap(),
        Value::Int(5)
    );
    assert_eq!(
        eval(BinaryOp::Div, Value::Int(7), Value::Int(2)).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        eval(BinaryOp::Mod, Value::Int(7), Value::Int(3)).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn mixed_numbers_widen() {
    assert_eq!(
        eval(BinaryOp::Mul, Value::Int(2), Value::Float(1.5)).unwrap(),
        Value::Float(3.0)
    );
    assert_eq!(
        eval(BinaryOp::Lt, Value::Float(1.5), Value::Int(2)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(BinaryOp::Eq, Value::Int(2), Value::Float(2.0)).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn division_by_zero_is_runtime() {
    let err = eval(BinaryOp::Div, Value::Int(1), Value::Int(0)).unwrap_err();
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.error_kind(), ErrorKind::Runtime);

    let err = eval(BinaryOp::Mod, Value::Int(1), Value::Int(0)).unwrap_err();
    assert_eq!(err.message, "modulo by zero");

    let err = eval(BinaryOp::Div, Value::Float(1.0), Value::Int(0)).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::Runtime);
}

#[test]
fn overflow_is_reported() {
    let err = eval(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)).unwrap_err();
    assert_eq!(err.message, "integer overflow in addition");
}

#[test]
fn strings_and_runes_concatenate() {
    assert_eq!(
        eval(BinaryOp::Add, Value::string("ab"), Value::Rune('c')).unwrap(),
        Value::string("abc")
    );
    assert_eq!(
        eval(BinaryOp::Add, Value::Rune('a'), Value::Rune('b')).unwrap(),
        Value::string("ab")
    );
    assert_eq!(
        eval(BinaryOp::Eq, Value::string("a"), Value::Rune('a')).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(BinaryOp::Lt, Value::string("abc"), Value::string("abd")).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn unsupported_operands_name_types() {
    let err = eval(BinaryOp::Sub, Value::string("a"), Value::Int(1)).unwrap_err();
    assert_eq!(err.message, "operator - cannot be applied to string and int");
    let err = eval(BinaryOp::Eq, Value::Bool(true), Value::Int(1)).unwrap_err();
    assert_eq!(err.message, "operator == cannot be applied to bool and int");
}

#[test]
fn nil_equality() {
    assert_eq!(
        eval(BinaryOp::Eq, Value::Nil, Value::Nil).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(BinaryOp::NotEq, Value::Int(1), Value::Nil).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn short_circuit_decides_from_left() {
    let and = early_return_strategy(BinaryOp::And).unwrap();
    assert_eq!(
        and.early_return(&Value::Bool(false)).unwrap(),
        Some(Value::Bool(false))
    );
    assert_eq!(and.early_return(&Value::Bool(true)).unwrap(), None);

    let or = early_return_strategy(BinaryOp::Or).unwrap();
    assert_eq!(
        or.early_return(&Value::Bool(true)).unwrap(),
        Some(Value::Bool(true))
    );
    assert!(or.early_return(&Value::Int(1)).is_err());
    assert!(early_return_strategy(BinaryOp::Add).is_none());
}

#[test]
fn unary_operators() {
    assert_eq!(
        unary_strategy(UnaryOp::Neg).validate(&Value::Int(4)).unwrap(),
        Value::Int(-4)
    );
    assert_eq!(
        unary_strategy(UnaryOp::Not).validate(&Value::Bool(true)).unwrap(),
        Value::Bool(false)
    );
    let err = unary_strategy(UnaryOp::Not)
        .validate(&Value::Int(1))
        .unwrap_err()
        .into_unary_error(UnaryOp::Not, &Value::Int(1), &StringInterner::new());
    assert_eq!(err.message, "operator ! cannot be applied to int");
}
