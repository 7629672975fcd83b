//! Evaluation errors.
//!
//! Every failure the evaluator can hit is an [`EvalError`]: a structured
//! [`EvalErrorKind`], its rendered message, and the span it belongs to when
//! known. Errors are built through the factory functions below and get a
//! span attached with [`EvalError::with_span`] at the site that knows it.

use std::fmt;

use thiserror::Error;
use vlang_diagnostic::ErrorKind;
use vlang_ir::Span;

/// Result of evaluating an expression.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// Which control-flow statement appeared where it has no target.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SignalKind {
    Return,
    Break,
    Continue,
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names
    UndefinedVariable {
        name: String,
    },
    UndefinedFunction {
        name: String,
    },
    UndefinedStruct {
        name: String,
    },
    UndefinedField {
        field: String,
        type_name: String,
    },
    UndefinedMethod {
        method: String,
        type_name: String,
    },
    AlreadyDeclared {
        what: &'static str,
        name: String,
    },
    BuiltinRedeclared {
        name: String,
    },
    NestedDeclaration {
        what: &'static str,
    },

    // Mutability
    ImmutableBinding {
        name: String,
    },
    ImmutableField {
        name: String,
    },
    MutatingOnImmutable {
        method: String,
    },

    // Types
    TypeMismatch {
        expected: String,
        got: String,
    },
    ConditionNotBool {
        got: String,
    },
    InvalidBinaryOp {
        op: &'static str,
        left: String,
        right: String,
    },
    InvalidUnaryOp {
        op: &'static str,
        operand: String,
    },
    CannotInfer {
        what: String,
    },

    // Access
    IndexOutOfRange {
        index: i64,
        len: usize,
    },
    IndexNotInt {
        got: String,
    },
    NotIndexable {
        type_name: String,
    },
    NotIterable {
        type_name: String,
    },
    NilAccess {
        field: String,
    },
    NotAStruct {
        field: String,
        type_name: String,
    },
    DanglingReference {
        name: String,
    },

    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: &'static str,
    },

    // Calls
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    UnknownLabel {
        function: String,
        label: String,
    },
    MissingLabel {
        function: String,
        param: String,
        label: String,
    },
    DuplicateArgument {
        function: String,
        param: String,
    },
    MissingArgument {
        function: String,
        param: String,
    },
    ReferenceMismatch {
        function: String,
        param: String,
        expects_reference: bool,
    },
    InvalidReferenceArgument,
    ReturnTypeMismatch {
        function: String,
        expected: String,
        got: String,
    },
    NotCallable {
        type_name: String,
    },
    StackOverflow {
        depth: usize,
    },
    Builtin {
        name: &'static str,
        message: String,
    },

    // Control flow
    MisplacedSignal(SignalKind),

    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// Table category: execution-only conditions are `Runtime`, the rest
    /// `Semantic`.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. }
            | Self::DivisionByZero
            | Self::ModuloByZero
            | Self::StackOverflow { .. } => ErrorKind::Runtime,
            _ => ErrorKind::Semantic,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable '{name}'"),
            Self::UndefinedFunction { name } => write!(f, "undefined function '{name}'"),
            Self::UndefinedStruct { name } => write!(f, "undefined struct '{name}'"),
            Self::UndefinedField { field, type_name } => {
                write!(f, "struct '{type_name}' has no field '{field}'")
            }
            Self::UndefinedMethod { method, type_name } => {
                write!(f, "type '{type_name}' has no method '{method}'")
            }
            Self::AlreadyDeclared { what, name } => {
                write!(f, "{what} '{name}' is already declared in this scope")
            }
            Self::BuiltinRedeclared { name } => write!(f, "cannot redeclare builtin '{name}'"),
            Self::NestedDeclaration { what } => {
                write!(f, "{what} declarations are only allowed at global scope")
            }

            Self::ImmutableBinding { name } => write!(f, "cannot assign to constant '{name}'"),
            Self::ImmutableField { name } => {
                write!(f, "cannot assign to field '{name}' outside a mutating method")
            }
            Self::MutatingOnImmutable { method } => {
                write!(f, "cannot call mutating method '{method}' on an immutable value")
            }

            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, found {got}")
            }
            Self::ConditionNotBool { got } => write!(f, "condition must be bool, found {got}"),
            Self::InvalidBinaryOp { op, left, right } => {
                write!(f, "operator {op} cannot be applied to {left} and {right}")
            }
            Self::InvalidUnaryOp { op, operand } => {
                write!(f, "operator {op} cannot be applied to {operand}")
            }
            Self::CannotInfer { what } => write!(f, "cannot infer type of {what}"),

            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::IndexNotInt { got } => write!(f, "index must be int, found {got}"),
            Self::NotIndexable { type_name } => write!(f, "cannot index into {type_name}"),
            Self::NotIterable { type_name } => write!(f, "cannot iterate over {type_name}"),
            Self::NilAccess { field } => write!(f, "cannot access '{field}' of nil"),
            Self::NotAStruct { field, type_name } => {
                write!(f, "cannot access field '{field}' of {type_name}")
            }
            Self::DanglingReference { name } => {
                write!(f, "reference '{name}' outlived the variable it points to")
            }

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),

            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "function '{name}' expects {expected} arguments, found {got}"
            ),
            Self::UnknownLabel { function, label } => {
                write!(f, "function '{function}' has no parameter labeled '{label}'")
            }
            Self::MissingLabel {
                function,
                param,
                label,
            } => write!(
                f,
                "argument for parameter '{param}' of '{function}' must be labeled '{label}:'"
            ),
            Self::DuplicateArgument { function, param } => {
                write!(f, "parameter '{param}' of '{function}' is given more than once")
            }
            Self::MissingArgument { function, param } => {
                write!(f, "missing argument for parameter '{param}' of '{function}'")
            }
            Self::ReferenceMismatch {
                function,
                param,
                expects_reference: true,
            } => write!(
                f,
                "parameter '{param}' of '{function}' takes a reference; pass it with `mut`"
            ),
            Self::ReferenceMismatch {
                function,
                param,
                expects_reference: false,
            } => write!(
                f,
                "parameter '{param}' of '{function}' does not take a reference"
            ),
            Self::InvalidReferenceArgument => {
                write!(f, "only a mutable variable can be passed by reference")
            }
            Self::ReturnTypeMismatch {
                function,
                expected,
                got,
            } => write!(f, "function '{function}' must return {expected}, found {got}"),
            Self::NotCallable { type_name } => {
                write!(f, "value of type {type_name} is not callable")
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth of {depth} exceeded")
            }
            Self::Builtin { name, message } => write!(f, "{name}: {message}"),

            Self::MisplacedSignal(SignalKind::Return) => {
                write!(f, "return must be inside a function")
            }
            Self::MisplacedSignal(SignalKind::Break) => {
                write!(f, "break must be inside a loop or switch")
            }
            Self::MisplacedSignal(SignalKind::Continue) => {
                write!(f, "continue must be inside a loop")
            }

            Self::Custom { message } => f.write_str(message),
        }
    }
}

/// Evaluation error with its location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Uncategorized error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    #[inline]
    pub fn error_kind(&self) -> ErrorKind {
        self.kind.error_kind()
    }
}

// Factory functions

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    })
}

pub fn undefined_struct(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedStruct {
        name: name.to_owned(),
    })
}

pub fn undefined_field(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedField {
        field: field.to_owned(),
        type_name: type_name.to_owned(),
    })
}

pub fn undefined_method(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedMethod {
        method: method.to_owned(),
        type_name: type_name.to_owned(),
    })
}

pub fn already_declared(what: &'static str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDeclared {
        what,
        name: name.to_owned(),
    })
}

pub fn builtin_redeclared(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BuiltinRedeclared {
        name: name.to_owned(),
    })
}

pub fn nested_declaration(what: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NestedDeclaration { what })
}

pub fn immutable_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_owned(),
    })
}

pub fn immutable_field(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableField {
        name: name.to_owned(),
    })
}

pub fn mutating_on_immutable(method: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MutatingOnImmutable {
        method: method.to_owned(),
    })
}

pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.into(),
    })
}

pub fn condition_not_bool(got: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConditionNotBool { got: got.into() })
}

pub fn invalid_binary_op(
    op: &'static str,
    left: impl Into<String>,
    right: impl Into<String>,
) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        left: left.into(),
        right: right.into(),
    })
}

pub fn invalid_unary_op(op: &'static str, operand: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        operand: operand.into(),
    })
}

pub fn cannot_infer(what: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotInfer { what: what.into() })
}

pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

pub fn index_not_int(got: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexNotInt { got: got.into() })
}

pub fn not_indexable(type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        type_name: type_name.into(),
    })
}

pub fn not_iterable(type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.into(),
    })
}

pub fn nil_access(field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NilAccess {
        field: field.to_owned(),
    })
}

pub fn not_a_struct(field: &str, type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAStruct {
        field: field.to_owned(),
        type_name: type_name.into(),
    })
}

pub fn dangling_reference(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DanglingReference {
        name: name.to_owned(),
    })
}

pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    })
}

pub fn unknown_label(function: &str, label: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownLabel {
        function: function.to_owned(),
        label: label.to_owned(),
    })
}

pub fn missing_label(function: &str, param: &str, label: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingLabel {
        function: function.to_owned(),
        param: param.to_owned(),
        label: label.to_owned(),
    })
}

pub fn duplicate_argument(function: &str, param: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateArgument {
        function: function.to_owned(),
        param: param.to_owned(),
    })
}

pub fn missing_argument(function: &str, param: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingArgument {
        function: function.to_owned(),
        param: param.to_owned(),
    })
}

pub fn reference_mismatch(function: &str, param: &str, expects_reference: bool) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReferenceMismatch {
        function: function.to_owned(),
        param: param.to_owned(),
        expects_reference,
    })
}

pub fn invalid_reference_argument() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidReferenceArgument)
}

pub fn return_type_mismatch(function: &str, expected: String, got: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReturnTypeMismatch {
        function: function.to_owned(),
        expected,
        got,
    })
}

pub fn not_callable(type_name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.into(),
    })
}

pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

pub fn builtin_failed(name: &'static str, message: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Builtin { name, message })
}

pub fn misplaced_signal(kind: SignalKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MisplacedSignal(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_come_from_kind() {
        assert_eq!(
            arity_mismatch("add", 2, 1).to_string(),
            "function 'add' expects 2 arguments, found 1"
        );
        assert_eq!(
            misplaced_signal(SignalKind::Break).message,
            "break must be inside a loop or switch"
        );
        assert_eq!(
            undefined_field("z", "Point").message,
            "struct 'Point' has no field 'z'"
        );
    }

    #[test]
    fn runtime_kinds() {
        assert_eq!(division_by_zero().error_kind(), ErrorKind::Runtime);
        assert_eq!(index_out_of_range(3, 3).error_kind(), ErrorKind::Runtime);
        assert_eq!(stack_overflow(10).error_kind(), ErrorKind::Runtime);
        assert_eq!(undefined_variable("x").error_kind(), ErrorKind::Semantic);
        assert_eq!(integer_overflow("addition").error_kind(), ErrorKind::Semantic);
    }

    #[test]
    fn or_span_keeps_precise_span() {
        let inner = Span::new(4, 5);
        let outer = Span::new(0, 10);
        assert_eq!(
            undefined_variable("x").with_span(inner).or_span(outer).span,
            Some(inner)
        );
        assert_eq!(undefined_variable("x").or_span(outer).span, Some(outer));
    }
}
