//! Parse error types.

use std::fmt;

use vlang_ir::Span;

/// What the parser was working on when an error occurred, for
/// "while parsing X" messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    VarDecl,
    Assignment,
    IfStatement,
    SwitchStatement,
    WhileLoop,
    ForLoop,
    ReturnStatement,
    FunctionDecl,
    Params,
    StructDecl,
    Type,
    CallArgs,
    VectorLiteral,
    MatrixLiteral,
    StructLiteral,
    StringInterpolation,
}

impl ErrorContext {
    pub const fn description(self) -> &'static str {
        match self {
            ErrorContext::VarDecl => "a variable declaration",
            ErrorContext::Assignment => "an assignment",
            ErrorContext::IfStatement => "an if statement",
            ErrorContext::SwitchStatement => "a switch statement",
            ErrorContext::WhileLoop => "a while loop",
            ErrorContext::ForLoop => "a for loop",
            ErrorContext::ReturnStatement => "a return statement",
            ErrorContext::FunctionDecl => "a function declaration",
            ErrorContext::Params => "a parameter list",
            ErrorContext::StructDecl => "a struct declaration",
            ErrorContext::Type => "a type",
            ErrorContext::CallArgs => "call arguments",
            ErrorContext::VectorLiteral => "a vector literal",
            ErrorContext::MatrixLiteral => "a matrix literal",
            ErrorContext::StructLiteral => "a struct literal",
            ErrorContext::StringInterpolation => "an interpolated string",
        }
    }
}

/// A syntax error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// Innermost construct being parsed; set once, on the way out.
    pub context: Option<ErrorContext>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach `context` unless a more specific one is already present.
    #[must_use]
    pub fn or_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(context) = self.context {
            write!(f, " (while parsing {})", context.description())?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
