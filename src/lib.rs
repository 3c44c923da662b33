// ============================================================================
// ranged-observable - Observable Collections with Home-Context Delivery
// ============================================================================
//
// An ordered collection with coalesced bulk notifications. Every notification
// runs on the execution context captured at construction, whichever thread
// performed the mutation.
// ============================================================================

pub mod collections;
pub mod core;
pub mod dispatch;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::change::{ChangeHandler, ChangeKind, CollectionChange, SubscriptionId};
pub use crate::core::error::{CollectionError, DispatchError};
pub use crate::core::options::{CollectionOptions, ResetPolicy};

// Re-export dispatch primitives
pub use dispatch::{
    current, current_queue, ContextHandle, DispatchPriority, DispatchQueue, Dispatcher,
    InlineDispatcher, Task,
};

// Re-export reactivity
pub use reactivity::batching::BatchState;
pub use reactivity::gate::Delivery;

// Re-export collections
pub use collections::RangeObservableCollection;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn collection_is_send() {
        fn assert_send<S: Send>() {}
        assert_send::<RangeObservableCollection<String>>();
        assert_send::<ContextHandle>();
        assert_send::<DispatchQueue>();
    }

    #[test]
    fn bulk_add_from_worker_delivers_one_reset_on_home() {
        let queue = DispatchQueue::for_current_thread();
        let home_thread = thread::current().id();
        let mut collection = RangeObservableCollection::new(queue.handle());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        collection.subscribe(move |change: &CollectionChange<i32>| {
            sink.lock().push((thread::current().id(), change.kind()));
        });

        let collection = thread::spawn(move || {
            collection.add_range(0..10).unwrap();
            collection
        })
        .join()
        .unwrap();

        assert_eq!(collection.len(), 10);
        assert!(seen.lock().is_empty());

        let delivered = queue
            .run_until(Duration::from_secs(5), || !seen.lock().is_empty())
            .unwrap();
        assert!(delivered);
        assert_eq!(*seen.lock(), vec![(home_thread, ChangeKind::Reset)]);
    }

    #[test]
    fn posted_payload_is_fixed_at_mutation_time() {
        let queue = DispatchQueue::for_current_thread();
        let mut collection = RangeObservableCollection::new(queue.handle());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        collection.subscribe(move |change: &CollectionChange<&'static str>| {
            sink.lock().push(change.clone());
        });

        let collection = thread::spawn(move || {
            collection.push("first").unwrap();
            collection.set(0, "second").unwrap();
            collection
        })
        .join()
        .unwrap();

        queue.run_pending().unwrap();
        assert_eq!(collection.as_slice(), &["second"]);
        assert_eq!(
            *seen.lock(),
            vec![
                CollectionChange::Added {
                    index: 0,
                    items: vec!["first"]
                },
                CollectionChange::Replaced {
                    index: 0,
                    old: "first",
                    new: "second"
                },
            ]
        );
    }
}
