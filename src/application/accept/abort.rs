use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token shared between the accepting thread and
/// whoever wants it to stop.
///
/// Clones share state. The acceptor only looks at it on entry and after each
/// readiness wait returns, so a raised flag is noticed within one wait budget.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination. Idempotent.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clear the flag so the same token can drive another call.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
