//! Operators appearing in expressions and assignments.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling, used in diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Binding strength for the parser; larger binds tighter.
    ///
    /// - 6: `*` `/` `%`
    /// - 5: `+` `-`
    /// - 4: `<` `<=` `>` `>=`
    /// - 3: `==` `!=`
    /// - 2: `&&`
    /// - 1: `||`
    pub const fn binding_power(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 6,
            Self::Add | Self::Sub => 5,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 4,
            Self::Eq | Self::NotEq => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    /// `&&` and `||` decide from the left operand alone when they can.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Assignment forms: `=`, `+=`, `-=`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    /// The arithmetic operator a compound assignment applies, if any.
    pub const fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::AddAssign => Some(BinaryOp::Add),
            Self::SubAssign => Some(BinaryOp::Sub),
        }
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
        }
    }
}

/// Postfix `++` / `--`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StepOp {
    Increment,
    Decrement,
}

impl StepOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    /// `+1` or `-1`.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}
