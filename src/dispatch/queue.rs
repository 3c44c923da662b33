// ============================================================================
// ranged-observable - Dispatch Queue
// A thread-affine priority queue of posted work
// ============================================================================
//
// The queue is bound to the thread that created it. Any thread may post;
// only the owner may run. Work is ordered by priority, then by posting order.
// ============================================================================

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::error::DispatchError;

use super::context::{ContextHandle, DispatchPriority, Dispatcher, Task};

// =============================================================================
// QUEUE ENTRY
// =============================================================================

struct Entry {
    priority: DispatchPriority,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Max-heap: higher priority first, then lower sequence number first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// =============================================================================
// DISPATCH QUEUE
// =============================================================================

#[derive(Default)]
struct QueueState {
    entries: BinaryHeap<Entry>,
    next_seq: u64,
    shut_down: bool,
}

struct QueueInner {
    owner: ThreadId,
    state: Mutex<QueueState>,
    available: Condvar,
}

/// A FIFO-per-priority work queue owned by one thread.
///
/// # Example
///
/// ```
/// use ranged_observable::{DispatchPriority, DispatchQueue};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let queue = DispatchQueue::for_current_thread();
/// let handle = queue.handle();
/// let ran = Arc::new(AtomicBool::new(false));
///
/// let flag = ran.clone();
/// std::thread::spawn(move || {
///     handle
///         .enqueue(DispatchPriority::Normal, move || flag.store(true, Ordering::SeqCst))
///         .unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert!(!ran.load(Ordering::SeqCst));
/// queue.run_pending().unwrap();
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Clone)]
pub struct DispatchQueue {
    inner: Arc<QueueInner>,
}

impl DispatchQueue {
    /// Create a queue owned by the calling thread.
    pub fn for_current_thread() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                owner: thread::current().id(),
                state: Mutex::new(QueueState::default()),
                available: Condvar::new(),
            }),
        }
    }

    pub fn handle(&self) -> ContextHandle {
        ContextHandle::new(self.clone())
    }

    pub fn owner(&self) -> ThreadId {
        self.inner.owner
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.state.lock().shut_down
    }

    /// Stop accepting work. Tasks already queued can still be run.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        if !state.shut_down {
            state.shut_down = true;
            tracing::debug!(pending = state.entries.len(), "dispatch queue shut down");
        }
        drop(state);
        self.inner.available.notify_all();
    }

    fn ensure_owner(&self) -> Result<(), DispatchError> {
        if self.check_access() {
            Ok(())
        } else {
            Err(DispatchError::WrongThread)
        }
    }

    fn pop(&self) -> Option<Task> {
        self.inner.state.lock().entries.pop().map(|entry| entry.task)
    }

    /// Run the tasks queued at the time of the call. Returns how many ran.
    ///
    /// Tasks posted while draining wait for the next call.
    pub fn run_pending(&self) -> Result<usize, DispatchError> {
        self.ensure_owner()?;

        let queued = self.pending();
        let mut ran = 0;
        while ran < queued {
            // The lock is released before the task runs so it may post again.
            let Some(task) = self.pop() else { break };
            task();
            ran += 1;
        }

        if ran > 0 {
            tracing::trace!(ran, "drained dispatch queue");
        }
        Ok(ran)
    }

    // Block until work is queued, the queue shuts down, or `deadline` passes.
    // No deadline means wait for one of the other two.
    fn wait_for_work(&self, deadline: Option<Instant>) {
        let mut state = self.inner.state.lock();
        while state.entries.is_empty() && !state.shut_down {
            match deadline {
                Some(deadline) => {
                    if self
                        .inner
                        .available
                        .wait_until(&mut state, deadline)
                        .timed_out()
                    {
                        break;
                    }
                }
                None => self.inner.available.wait(&mut state),
            }
        }
    }

    /// Block until work arrives or `timeout` elapses, then run what is queued.
    ///
    /// Returns 0 on timeout, or immediately if the queue is shut down and empty.
    /// A timeout too large to represent as a deadline waits without one.
    pub fn wait_and_run(&self, timeout: Duration) -> Result<usize, DispatchError> {
        self.ensure_owner()?;
        self.wait_for_work(Instant::now().checked_add(timeout));
        self.run_pending()
    }

    /// Keep running work until `done` returns true or `timeout` elapses.
    ///
    /// Returns whether `done` was satisfied.
    pub fn run_until(
        &self,
        timeout: Duration,
        mut done: impl FnMut() -> bool,
    ) -> Result<bool, DispatchError> {
        self.ensure_owner()?;

        let deadline = Instant::now().checked_add(timeout);
        loop {
            self.run_pending()?;
            if done() {
                return Ok(true);
            }
            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if expired || (self.is_shut_down() && self.pending() == 0) {
                return Ok(done());
            }
            self.wait_for_work(deadline);
            self.run_pending()?;
            if done() {
                return Ok(true);
            }
        }
    }
}

impl Dispatcher for DispatchQueue {
    fn check_access(&self) -> bool {
        thread::current().id() == self.inner.owner
    }

    fn post(&self, priority: DispatchPriority, task: Task) -> Result<(), DispatchError> {
        let mut state = self.inner.state.lock();
        if state.shut_down {
            return Err(DispatchError::ShutDown);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(Entry {
            priority,
            seq,
            task,
        });
        drop(state);

        self.inner.available.notify_one();
        Ok(())
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("DispatchQueue")
            .field("owner", &self.inner.owner)
            .field("pending", &state.entries.len())
            .field("shut_down", &state.shut_down)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
