//! RAII guards for scopes and signal frames.
//!
//! [`ScopedInterpreter`] pops its environment scope on drop and
//! [`FramedInterpreter`] pops its signal frame on drop, so every exit path
//! (normal completion, `?` on an error, an unwinding signal) restores the
//! interpreter. Both deref to [`Interpreter`] and nest freely.

use std::ops::{Deref, DerefMut};

use vlang_ir::{Name, Span};

use super::Interpreter;
use crate::call_stack::{FrameId, FrameKind};
use crate::environment::{ScopeFlags, ScopeId};
use crate::errors::EvalError;

/// Guard that pops the environment scope it pushed.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// Guard that pops the signal frame it pushed.
pub struct FramedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    /// Identity that signals aimed at this frame carry.
    pub frame: FrameId,
}

impl Drop for FramedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.stack.pop();
    }
}

impl<'interp> Deref for FramedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for FramedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Enter a child of the current scope until the guard drops.
    pub fn scoped(&mut self, name: Name) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope(name);
        ScopedInterpreter { interpreter: self }
    }

    /// Enter a scope hanging off `parent` until the guard drops.
    pub fn scoped_in(
        &mut self,
        name: Name,
        parent: ScopeId,
        flags: ScopeFlags,
    ) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope_in(name, parent, flags);
        ScopedInterpreter { interpreter: self }
    }

    /// Push a signal frame until the guard drops. Fails only when a
    /// function frame would exceed the call depth limit.
    pub fn framed(
        &mut self,
        kind: FrameKind,
        name: Name,
        span: Span,
    ) -> Result<FramedInterpreter<'_, 'a>, EvalError> {
        let frame = self.stack.push(kind, name, span)?;
        Ok(FramedInterpreter {
            interpreter: self,
            frame,
        })
    }
}
