// ============================================================================
// ranged-observable - Notification Gate
// Every change passes through here on its way to subscribers
// ============================================================================
//
// The gate decides three things for each change:
// 1. Suppressed: a batch is active, so the change is dropped
// 2. Inline: the caller is on the home context, so handlers run now
// 3. Posted: the caller is elsewhere, so delivery is queued on the home context
// ============================================================================

use std::cell::Cell;
use std::fmt;

use crate::core::change::{ChangeHandler, CollectionChange, SubscriptionId};
use crate::core::error::DispatchError;
use crate::dispatch::{ContextHandle, DispatchPriority};

use super::batching::{enter_batch, BatchGuard, BatchState};

/// Outcome of a single emit, mostly useful for logging and tests.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Delivery {
    /// Dropped because a batch was active.
    Suppressed,
    /// Dropped because nobody is subscribed.
    NoSubscribers,
    /// Delivered synchronously on the home context.
    Inline,
    /// Queued on the home context.
    Posted,
}

/// Subscriber list plus the rules for delivering changes to it.
pub struct NotificationGate<T> {
    home: ContextHandle,
    priority: DispatchPriority,
    state: Cell<BatchState>,
    subscribers: Vec<(SubscriptionId, ChangeHandler<T>)>,
    next_id: u64,
}

impl<T> NotificationGate<T>
where
    T: Send + 'static,
{
    pub fn new(home: ContextHandle, priority: DispatchPriority) -> Self {
        Self {
            home,
            priority,
            state: Cell::new(BatchState::Idle),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn home(&self) -> &ContextHandle {
        &self.home
    }

    pub fn priority(&self) -> DispatchPriority {
        self.priority
    }

    pub fn batch_state(&self) -> BatchState {
        self.state.get()
    }

    pub fn is_suppressed(&self) -> bool {
        self.state.get() == BatchState::InBatch
    }

    /// Start suppressing until the returned guard drops.
    pub fn suppress(&self) -> BatchGuard<'_> {
        enter_batch(&self.state)
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    pub fn subscribe(&mut self, handler: ChangeHandler<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // =========================================================================
    // EMIT
    // =========================================================================

    /// Deliver the change built by `build`, honouring suppression and affinity.
    ///
    /// `build` only runs when the change will actually be delivered, so
    /// suppressed per-item changes cost nothing.
    pub fn emit(
        &self,
        build: impl FnOnce() -> CollectionChange<T>,
    ) -> Result<Delivery, DispatchError> {
        if self.is_suppressed() {
            tracing::trace!("change suppressed by active batch");
            return Ok(Delivery::Suppressed);
        }
        // Nothing is posted, so a closed home context goes unnoticed here.
        if self.subscribers.is_empty() {
            return Ok(Delivery::NoSubscribers);
        }

        let change = build();

        if self.home.is_current() {
            tracing::trace!(kind = ?change.kind(), subscribers = self.subscribers.len(), "delivering change inline");
            for (_, handler) in &self.subscribers {
                handler(&change);
            }
            return Ok(Delivery::Inline);
        }

        // Handlers are snapshotted with the payload so the posted task does not
        // observe later subscribe/unsubscribe calls or later mutations.
        let handlers: Vec<ChangeHandler<T>> = self
            .subscribers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        tracing::debug!(kind = ?change.kind(), priority = ?self.priority, "posting change to home context");

        self.home.enqueue(self.priority, move || {
            for handler in &handlers {
                handler(&change);
            }
        })?;
        Ok(Delivery::Posted)
    }
}

impl<T> fmt::Debug for NotificationGate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationGate")
            .field("home", &self.home)
            .field("priority", &self.priority)
            .field("state", &self.state.get())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
