// ============================================================================
// ranged-observable - Inline Dispatcher
// ============================================================================

use crate::core::error::DispatchError;

use super::context::{DispatchPriority, Dispatcher, Task};

/// A context that every thread is considered to be on.
///
/// Posted work runs immediately on the caller. Useful for headless owners and
/// tests that do not care about thread affinity.
#[derive(Copy, Clone, Debug, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn check_access(&self) -> bool {
        true
    }

    fn post(&self, _priority: DispatchPriority, task: Task) -> Result<(), DispatchError> {
        task();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ContextHandle;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn always_current() {
        let handle = ContextHandle::new(InlineDispatcher);
        assert!(handle.is_current());
        let remote = handle.clone();
        assert!(std::thread::spawn(move || remote.is_current()).join().unwrap());
    }

    #[test]
    fn post_runs_immediately() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        ContextHandle::new(InlineDispatcher)
            .enqueue(DispatchPriority::Background, move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
