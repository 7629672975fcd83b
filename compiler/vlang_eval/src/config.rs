//! Evaluator settings.

/// Knobs of one evaluation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest function call nesting before a call fails with a runtime
    /// error.
    pub max_call_depth: usize,
    /// Decimals shown for floats by `print`/`println`.
    pub float_precision: usize,
    /// Write console output through to the terminal as it is produced.
    pub echo_console: bool,
}

impl EvalConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;
    pub const DEFAULT_FLOAT_PRECISION: usize = 4;

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_console = echo;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            float_precision: Self::DEFAULT_FLOAT_PRECISION,
            echo_console: false,
        }
    }
}
