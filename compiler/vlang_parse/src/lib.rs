//! Recursive descent parser for V-lang.
//!
//! Produces a [`Module`] of top-level statements whose nodes live in a flat
//! [`ExprArena`]. Errors are collected, not fatal: after a broken statement
//! the parser resynchronizes at the next statement boundary and keeps going.

mod cursor;
mod dump;
mod error;
mod grammar;
mod recovery;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use dump::dump_module;
pub use error::{ErrorContext, ParseError};
pub use recovery::{synchronize, TokenSet};

use vlang_ir::{ExprArena, Module, Span, StringInterner, TokenKind, TokenList};
use vlang_stack::{LimitExceeded, NestingLimit};

/// Deepest expression/block nesting accepted before reporting an error.
pub const MAX_NESTING: usize = 512;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    errors: Vec<ParseError>,
    nesting: NestingLimit,
    /// Set while parsing `if`/`for`/`switch` headers, where `Name {` opens
    /// the body rather than a struct literal.
    no_struct_literal: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        let source_len = tokens.as_slice().last().map_or(0, |eof| eof.span.end as usize);
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::with_capacity(source_len),
            errors: Vec::new(),
            nesting: NestingLimit::new(MAX_NESTING),
            no_struct_literal: false,
        }
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    fn skip_semicolons(&mut self) {
        while self.cursor.eat(TokenKind::Semicolon) {}
    }

    /// Run `f`, tagging any error it returns with `context`.
    fn in_error_context<T>(
        &mut self,
        context: ErrorContext,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        f(self).map_err(|e| e.or_context(context))
    }

    /// Run `f` with struct literals allowed or not, restoring the previous
    /// setting afterwards.
    fn with_struct_literals<T>(&mut self, allowed: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.no_struct_literal;
        self.no_struct_literal = !allowed;
        let result = f(self);
        self.no_struct_literal = saved;
        result
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let span = self.current_span();
        self.nesting.enter().map_err(|LimitExceeded(max)| {
            ParseError::new(format!("nesting exceeds {max} levels"), span)
        })?;
        let result = vlang_stack::ensure_sufficient_stack(|| f(self));
        self.nesting.exit();
        result
    }

    /// Skip past a broken statement that started at token `start`.
    fn recover(&mut self, start: usize, set: TokenSet) {
        recovery::synchronize(&mut self.cursor, set);
        if self.cursor.position() == start {
            self.cursor.advance();
        }
    }

    /// Parse the whole token stream.
    pub fn parse_module(mut self) -> ParseOutput {
        let mut module = Module::new();

        loop {
            self.skip_semicolons();
            if self.is_at_end() {
                break;
            }
            let start = self.cursor.position();
            match self.parse_stmt() {
                Ok(stmt) => module.stmts.push(stmt),
                Err(error) => {
                    self.errors.push(error);
                    self.recover(start, recovery::STMT_BOUNDARY);
                }
            }
        }

        ParseOutput {
            module,
            arena: self.arena,
            errors: self.errors,
        }
    }
}

/// Parsed module, its arena, and any syntax errors.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub module: Module,
    pub arena: ExprArena,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse tokens into a module.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    let output = Parser::new(tokens, interner).parse_module();
    tracing::debug!(
        stmts = output.module.stmts.len(),
        errors = output.errors.len(),
        "parsed module"
    );
    output
}
