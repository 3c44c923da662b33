// ============================================================================
// ranged-observable - Execution Context
// The contract a home context must satisfy, and the handle the collection holds
// ============================================================================
//
// A collection never reads ambient state to find its home context. The owner
// passes a ContextHandle in; `current()` is provided for owners that want the
// calling thread's queue.
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::core::error::DispatchError;

use super::queue::DispatchQueue;

/// A unit of work posted to a context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

// =============================================================================
// PRIORITY
// =============================================================================

/// Ordering of posted work within one context. Later variants run first.
///
/// Work posted at the same priority always runs in posting order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum DispatchPriority {
    Background,
    #[default]
    DataBind,
    Normal,
    Send,
}

// =============================================================================
// DISPATCHER TRAIT
// =============================================================================

/// An execution context that can run posted work on itself.
pub trait Dispatcher: Send + Sync + 'static {
    /// Whether the calling thread is already executing on this context.
    fn check_access(&self) -> bool;

    /// Queue `task` to run on this context. Must not block waiting for it.
    fn post(&self, priority: DispatchPriority, task: Task) -> Result<(), DispatchError>;
}

// =============================================================================
// CONTEXT HANDLE
// =============================================================================

/// Shared, cloneable reference to a [`Dispatcher`].
#[derive(Clone)]
pub struct ContextHandle {
    inner: Arc<dyn Dispatcher>,
}

impl ContextHandle {
    pub fn new<D: Dispatcher>(dispatcher: D) -> Self {
        Self {
            inner: Arc::new(dispatcher),
        }
    }

    /// Whether the caller is already on this context.
    pub fn is_current(&self) -> bool {
        self.inner.check_access()
    }

    /// Post `f` to run on this context at `priority`.
    pub fn enqueue<F>(&self, priority: DispatchPriority, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.post(priority, Box::new(f))
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("dispatcher", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

// =============================================================================
// CURRENT CONTEXT
// =============================================================================

// Shuts the queue down when its thread exits, so handles that outlive the
// thread fail to post instead of filling a queue nobody drains.
struct ThreadQueue(DispatchQueue);

impl Drop for ThreadQueue {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}

thread_local! {
    static CURRENT_QUEUE: ThreadQueue = ThreadQueue(DispatchQueue::for_current_thread());
}

/// The calling thread's dispatch queue, created on first use.
///
/// The queue is shut down when the thread exits.
pub fn current_queue() -> DispatchQueue {
    CURRENT_QUEUE.with(|queue| queue.0.clone())
}

/// Handle to the calling thread's dispatch queue.
pub fn current() -> ContextHandle {
    current_queue().handle()
}

// =============================================================================
// TESTS
// =============================================================================
