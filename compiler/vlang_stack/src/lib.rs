//! Recursion helpers shared by the parser and the evaluator.
//!
//! Two separate concerns live here. [`ensure_sufficient_stack`] grows the
//! native stack on demand so deeply nested source does not overflow it.
//! [`NestingLimit`] counts logical depth (nested expressions, active calls)
//! so a pass can refuse input past a configured bound with a proper error
//! instead of recursing forever.

/// Remaining stack below which we grow.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Depth counter with an upper bound.
///
/// `enter` and `exit` must pair up; callers usually wrap the recursive step
/// between them and exit on every path.
#[derive(Clone, Debug)]
pub struct NestingLimit {
    depth: usize,
    max: usize,
}

/// The bound was hit; carries the configured maximum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LimitExceeded(pub usize);

impl NestingLimit {
    pub const fn new(max: usize) -> Self {
        NestingLimit { depth: 0, max }
    }

    /// Step one level deeper, or fail without changing the depth.
    pub fn enter(&mut self) -> Result<(), LimitExceeded> {
        if self.depth >= self.max {
            return Err(LimitExceeded(self.max));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + nest(n - 1) })
    }

    #[test]
    fn deep_recursion_does_not_overflow() {
        assert_eq!(nest(200_000), 200_000);
    }

    #[test]
    fn limit_refuses_past_max() {
        let mut limit = NestingLimit::new(2);
        assert_eq!(limit.enter(), Ok(()));
        assert_eq!(limit.enter(), Ok(()));
        assert_eq!(limit.enter(), Err(LimitExceeded(2)));
        assert_eq!(limit.depth(), 2);
        limit.exit();
        assert_eq!(limit.enter(), Ok(()));
    }

    #[test]
    fn exit_never_underflows() {
        let mut limit = NestingLimit::new(1);
        limit.exit();
        assert_eq!(limit.depth(), 0);
        assert_eq!(limit.max(), 1);
    }
}
