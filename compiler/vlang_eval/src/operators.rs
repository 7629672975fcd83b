//! Operator strategy tables.
//!
//! Every operator is a strategy object; [`binary_strategy`] and
//! [`unary_strategy`] map an operator to its one implementation. A
//! strategy validates its operands and produces the result, or describes
//! why it cannot. `&&` and `||` additionally expose an [`EarlyReturn`]
//! strategy that the evaluator consults with the left operand *before*
//! evaluating the right one.

use std::cmp::Ordering;
use std::rc::Rc;

use vlang_ir::{BinaryOp, StringInterner, UnaryOp};

use crate::errors::{
    division_by_zero, integer_overflow, invalid_binary_op, invalid_unary_op, modulo_by_zero,
    EvalError, EvalResult,
};
use crate::value::Value;

/// Evaluates a binary operator on two operand values.
pub trait BinaryStrategy: Sync {
    fn validate(&self, left: &Value, right: &Value) -> Result<Value, OperandError>;
}

/// Decides a short-circuit operator from its left operand alone.
pub trait EarlyReturn: Sync {
    /// `Some(result)` when the right operand must not be evaluated.
    fn early_return(&self, left: &Value) -> Result<Option<Value>, OperandError>;
}

/// Evaluates a prefix operator.
pub trait UnaryStrategy: Sync {
    fn validate(&self, operand: &Value) -> Result<Value, OperandError>;
}

/// Failure description returned by a strategy.
///
/// Operand type names need the interner, so the evaluator turns
/// [`OperandError::Unsupported`] into a message once it knows them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperandError {
    /// The operator is not defined for these operand types.
    Unsupported,
    Failed(EvalError),
}

impl From<EvalError> for OperandError {
    fn from(error: EvalError) -> Self {
        OperandError::Failed(error)
    }
}

impl OperandError {
    pub fn into_binary_error(
        self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        interner: &StringInterner,
    ) -> EvalError {
        match self {
            OperandError::Unsupported => invalid_binary_op(
                op.as_symbol(),
                left.type_name(interner),
                right.type_name(interner),
            ),
            OperandError::Failed(error) => error,
        }
    }

    pub fn into_unary_error(
        self,
        op: UnaryOp,
        operand: &Value,
        interner: &StringInterner,
    ) -> EvalError {
        match self {
            OperandError::Unsupported => {
                invalid_unary_op(op.as_symbol(), operand.type_name(interner))
            }
            OperandError::Failed(error) => error,
        }
    }
}

type OpResult = Result<Value, OperandError>;

// Helpers

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> OpResult {
    result
        .map(Value::Int)
        .ok_or_else(|| integer_overflow(op_name).into())
}

#[inline]
fn checked_div(a: i64, b: i64) -> OpResult {
    if b == 0 {
        Err(division_by_zero().into())
    } else {
        checked_arith(a.checked_div(b), "division")
    }
}

#[inline]
fn checked_mod(a: i64, b: i64) -> OpResult {
    if b == 0 {
        Err(modulo_by_zero().into())
    } else {
        checked_arith(a.checked_rem(b), "remainder")
    }
}

/// Both operands as floats when at least one is a float and neither is
/// anything but a number.
#[allow(
    clippy::cast_precision_loss,
    reason = "int operands widen to float in mixed arithmetic"
)]
fn as_float_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => Some((*a, *b)),
        (Value::Int(a), Value::Float(b)) => Some((*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Some((*a, *b as f64)),
        _ => None,
    }
}

/// Text of a string or rune operand.
fn as_text(value: &Value) -> Option<Rc<str>> {
    match value {
        Value::Str(s) => Some(Rc::clone(s)),
        Value::Rune(c) => Some(Rc::from(c.to_string())),
        _ => None,
    }
}

// Arithmetic

struct Add;

impl BinaryStrategy for Add {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            return checked_arith(a.checked_add(*b), "addition");
        }
        if let Some((a, b)) = as_float_pair(left, right) {
            return Ok(Value::Float(a + b));
        }
        match (as_text(left), as_text(right)) {
            (Some(a), Some(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(&a);
                joined.push_str(&b);
                Ok(Value::Str(joined.into()))
            }
            _ => Err(OperandError::Unsupported),
        }
    }
}

struct Sub;

impl BinaryStrategy for Sub {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            return checked_arith(a.checked_sub(*b), "subtraction");
        }
        as_float_pair(left, right)
            .map(|(a, b)| Value::Float(a - b))
            .ok_or(OperandError::Unsupported)
    }
}

struct Mul;

impl BinaryStrategy for Mul {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            return checked_arith(a.checked_mul(*b), "multiplication");
        }
        as_float_pair(left, right)
            .map(|(a, b)| Value::Float(a * b))
            .ok_or(OperandError::Unsupported)
    }
}

struct Div;

impl BinaryStrategy for Div {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            return checked_div(*a, *b);
        }
        match as_float_pair(left, right) {
            Some((_, b)) if b == 0.0 => Err(division_by_zero().into()),
            Some((a, b)) => Ok(Value::Float(a / b)),
            None => Err(OperandError::Unsupported),
        }
    }
}

struct Rem;

impl BinaryStrategy for Rem {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => checked_mod(*a, *b),
            _ => Err(OperandError::Unsupported),
        }
    }
}

// Comparison

/// Equality across operand kinds: numbers compare by value, strings and
/// runes by text, nil equals only nil, everything else structurally within
/// one type.
#[allow(clippy::float_cmp, reason = "language equality is exact")]
fn equals(left: &Value, right: &Value) -> Result<bool, OperandError> {
    if let Some((a, b)) = as_float_pair(left, right) {
        return Ok(a == b);
    }
    match (left, right) {
        (Value::Nil, other) | (other, Value::Nil) => Ok(other.is_nil()),
        _ if left.value_type() == right.value_type() => Ok(left == right),
        (Value::Str(_) | Value::Rune(_), Value::Str(_) | Value::Rune(_)) => {
            Ok(left.loosely_equals(right))
        }
        _ => Err(OperandError::Unsupported),
    }
}

struct Equality {
    negate: bool,
}

impl BinaryStrategy for Equality {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        equals(left, right).map(|eq| Value::Bool(eq != self.negate))
    }
}

fn compare(left: &Value, right: &Value) -> Result<Ordering, OperandError> {
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    if let Some((a, b)) = as_float_pair(left, right) {
        return a.partial_cmp(&b).ok_or(OperandError::Unsupported);
    }
    match (left, right) {
        (Value::Rune(a), Value::Rune(b)) => Ok(a.cmp(b)),
        _ => match (as_text(left), as_text(right)) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => Err(OperandError::Unsupported),
        },
    }
}

struct Relational {
    accept: fn(Ordering) -> bool,
}

impl BinaryStrategy for Relational {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        compare(left, right).map(|ord| Value::Bool((self.accept)(ord)))
    }
}

// Logical

/// `&&` (`short_on == false`) or `||` (`short_on == true`).
struct Logical {
    short_on: bool,
}

impl BinaryStrategy for Logical {
    fn validate(&self, left: &Value, right: &Value) -> OpResult {
        match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if self.short_on {
                *a || *b
            } else {
                *a && *b
            })),
            _ => Err(OperandError::Unsupported),
        }
    }
}

impl EarlyReturn for Logical {
    fn early_return(&self, left: &Value) -> Result<Option<Value>, OperandError> {
        match left {
            Value::Bool(b) if *b == self.short_on => Ok(Some(Value::Bool(*b))),
            Value::Bool(_) => Ok(None),
            _ => Err(OperandError::Unsupported),
        }
    }
}

// Unary

struct Negate;

impl UnaryStrategy for Negate {
    fn validate(&self, operand: &Value) -> OpResult {
        match operand {
            Value::Int(i) => checked_arith(i.checked_neg(), "negation"),
            Value::Float(f) => Ok(Value::Float(-f)),
            _ => Err(OperandError::Unsupported),
        }
    }
}

struct Not;

impl UnaryStrategy for Not {
    fn validate(&self, operand: &Value) -> OpResult {
        match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(OperandError::Unsupported),
        }
    }
}

// Tables

static ADD: Add = Add;
static SUB: Sub = Sub;
static MUL: Mul = Mul;
static DIV: Div = Div;
static REM: Rem = Rem;
static EQ: Equality = Equality { negate: false };
static NOT_EQ: Equality = Equality { negate: true };
static LT: Relational = Relational {
    accept: Ordering::is_lt,
};
static LT_EQ: Relational = Relational {
    accept: Ordering::is_le,
};
static GT: Relational = Relational {
    accept: Ordering::is_gt,
};
static GT_EQ: Relational = Relational {
    accept: Ordering::is_ge,
};
static AND: Logical = Logical { short_on: false };
static OR: Logical = Logical { short_on: true };
static NEGATE: Negate = Negate;
static NOT: Not = Not;

/// The strategy implementing `op`.
pub fn binary_strategy(op: BinaryOp) -> &'static dyn BinaryStrategy {
    match op {
        BinaryOp::Add => &ADD,
        BinaryOp::Sub => &SUB,
        BinaryOp::Mul => &MUL,
        BinaryOp::Div => &DIV,
        BinaryOp::Mod => &REM,
        BinaryOp::Eq => &EQ,
        BinaryOp::NotEq => &NOT_EQ,
        BinaryOp::Lt => &LT,
        BinaryOp::LtEq => &LT_EQ,
        BinaryOp::Gt => &GT,
        BinaryOp::GtEq => &GT_EQ,
        BinaryOp::And => &AND,
        BinaryOp::Or => &OR,
    }
}

/// Short-circuit strategy of `op`, if it has one.
pub fn early_return_strategy(op: BinaryOp) -> Option<&'static dyn EarlyReturn> {
    match op {
        BinaryOp::And => Some(&AND),
        BinaryOp::Or => Some(&OR),
        _ => None,
    }
}

pub fn unary_strategy(op: UnaryOp) -> &'static dyn UnaryStrategy {
    match op {
        UnaryOp::Neg => &NEGATE,
        UnaryOp::Not => &NOT,
    }
}

/// Apply `op` to two already-evaluated operands.
pub fn evaluate_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    interner: &StringInterner,
) -> EvalResult {
    binary_strategy(op)
        .validate(left, right)
        .map_err(|e| e.into_binary_error(op, left, right, interner))
}

#[cfg(test)]
mod tests;
