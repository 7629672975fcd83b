//! Signal frames for `return`, `break` and `continue`.
//!
//! Function bodies, loops and switches push a [`SignalFrame`] before running
//! their body. A control-flow statement looks up the nearest frame that
//! accepts it and unwinds toward it as an [`Unwind::Signal`] carrying that
//! frame's id; every construct on the way re-raises signals that are not
//! its own. A function frame is a barrier: `break` and `continue` never
//! cross it.

use bitflags::bitflags;
use vlang_ir::{Name, Span};

use crate::errors::{misplaced_signal, stack_overflow, EvalError, SignalKind};
use crate::value::Value;

bitflags! {
    /// Control-flow actions a frame handles.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SignalSet: u8 {
        const RETURN = 1 << 0;
        const BREAK = 1 << 1;
        const CONTINUE = 1 << 2;
    }
}

impl SignalSet {
    pub const fn of(kind: SignalKind) -> SignalSet {
        match kind {
            SignalKind::Return => SignalSet::RETURN,
            SignalKind::Break => SignalSet::BREAK,
            SignalKind::Continue => SignalSet::CONTINUE,
        }
    }
}

/// Construct that owns a frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FrameKind {
    Function,
    Loop,
    Switch,
}

impl FrameKind {
    pub const fn accepts(self) -> SignalSet {
        match self {
            FrameKind::Function => SignalSet::RETURN,
            FrameKind::Loop => SignalSet::BREAK.union(SignalSet::CONTINUE),
            FrameKind::Switch => SignalSet::BREAK,
        }
    }
}

/// Identity of one pushed frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FrameId(u32);

#[derive(Clone, Debug)]
pub struct SignalFrame {
    pub id: FrameId,
    pub kind: FrameKind,
    /// Function name, or the loop/switch keyword.
    pub name: Name,
    pub span: Span,
}

/// A control-flow action on its way to its frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Return { frame: FrameId, value: Value },
    Break { frame: FrameId },
    Continue { frame: FrameId },
}

impl Signal {
    pub fn frame(&self) -> FrameId {
        match self {
            Signal::Return { frame, .. } | Signal::Break { frame } | Signal::Continue { frame } => {
                *frame
            }
        }
    }
}

/// Why statement execution stopped early.
#[derive(Clone, Debug, PartialEq)]
pub enum Unwind {
    Signal(Signal),
    /// Recorded at the nearest statement boundary.
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(error: EvalError) -> Self {
        Unwind::Error(error)
    }
}

impl From<Signal> for Unwind {
    fn from(signal: Signal) -> Self {
        Unwind::Signal(signal)
    }
}

/// Outcome of executing a statement.
pub type ExecResult = Result<(), Unwind>;

/// Live stack of signal frames.
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<SignalFrame>,
    next_id: u32,
    calls: usize,
    max_calls: usize,
}

impl CallStack {
    /// Stack allowing at most `max_calls` nested function frames.
    pub fn new(max_calls: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            next_id: 0,
            calls: 0,
            max_calls,
        }
    }

    /// Push a frame. Function frames count against the depth limit; on
    /// overflow nothing is pushed.
    pub fn push(
        &mut self,
        kind: FrameKind,
        name: Name,
        span: Span,
    ) -> Result<FrameId, EvalError> {
        if kind == FrameKind::Function {
            if self.calls >= self.max_calls {
                return Err(stack_overflow(self.max_calls));
            }
            self.calls += 1;
        }
        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        tracing::trace!(?kind, frame = id.0, depth = self.frames.len(), "push frame");
        self.frames.push(SignalFrame {
            id,
            kind,
            name,
            span,
        });
        Ok(id)
    }

    pub fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            if frame.kind == FrameKind::Function {
                self.calls -= 1;
            }
            tracing::trace!(kind = ?frame.kind, frame = frame.id.0, "pop frame");
        }
    }

    /// Frame that a `kind` statement at this point would unwind to.
    pub fn target(&self, kind: SignalKind) -> Result<FrameId, EvalError> {
        let wanted = SignalSet::of(kind);
        for frame in self.frames.iter().rev() {
            if frame.kind.accepts().contains(wanted) {
                return Ok(frame.id);
            }
            if frame.kind == FrameKind::Function {
                break;
            }
        }
        Err(misplaced_signal(kind))
    }

    /// Number of active function frames.
    #[inline]
    pub fn call_depth(&self) -> usize {
        self.calls
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use super::*;
    use pretty_assertions::assert_eq;
    use vlang_diagnostic::ErrorKind;

    fn push(stack: &mut CallStack, kind: FrameKind) -> FrameId {
        stack.push(kind, Name::EMPTY, Span::DUMMY).unwrap()
    }

    #[test]
    fn nearest_accepting_frame_wins() {
        let mut stack = CallStack::new(8);
        let function = push(&mut stack, FrameKind::Function);
        let outer = push(&mut stack, FrameKind::Loop);
        let switch = push(&mut stack, FrameKind::Switch);

        assert_eq!(stack.target(SignalKind::Break).unwrap(), switch);
        assert_eq!(stack.target(SignalKind::Continue).unwrap(), outer);
        assert_eq!(stack.target(SignalKind::Return).unwrap(), function);
    }

    #[test]
    fn function_frame_is_a_barrier() {
        let mut stack = CallStack::new(8);
        push(&mut stack, FrameKind::Loop);
        push(&mut stack, FrameKind::Function);

        let err = stack.target(SignalKind::Break).unwrap_err();
        assert_eq!(err.message, "break must be inside a loop or switch");
        let err = stack.target(SignalKind::Continue).unwrap_err();
        assert_eq!(err.message, "continue must be inside a loop");
    }

    #[test]
    fn return_outside_function() {
        let stack = CallStack::new(8);
        let err = stack.target(SignalKind::Return).unwrap_err();
        assert_eq!(err.message, "return must be inside a function");
        assert_eq!(err.error_kind(), ErrorKind::Semantic);
    }

    #[test]
    fn depth_limit_counts_only_functions() {
        let mut stack = CallStack::new(1);
        push(&mut stack, FrameKind::Function);
        push(&mut stack, FrameKind::Loop);
        let err = stack
            .push(FrameKind::Function, Name::EMPTY, Span::DUMMY)
            .unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::Runtime);
        assert_eq!(stack.len(), 2);

        stack.pop();
        stack.pop();
        assert_eq!(stack.call_depth(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn frame_ids_are_unique() {
        let mut stack = CallStack::new(8);
        let a = push(&mut stack, FrameKind::Loop);
        stack.pop();
        let b = push(&mut stack, FrameKind::Loop);
        assert_ne!(a, b);
        assert_eq!(Signal::Break { frame: b }.frame(), b);
    }
}
