// ============================================================================
// ranged-observable - RangeObservableCollection
// An observable list with coalesced bulk operations and home-context delivery
// ============================================================================

use std::borrow::Borrow;
use std::fmt;
use std::ops::Index;
use std::slice::Iter;
use std::sync::Arc;

use crate::core::change::{CollectionChange, SubscriptionId};
use crate::core::error::CollectionError;
use crate::core::options::{CollectionOptions, ResetPolicy};
use crate::dispatch::{ContextHandle, DispatchPriority};
use crate::reactivity::batching::BatchState;
use crate::reactivity::gate::NotificationGate;

// =============================================================================
// RANGE OBSERVABLE COLLECTION
// =============================================================================

/// An ordered collection whose change notifications always run on one context.
///
/// Two behaviors compose here:
/// 1. Bulk operations (`add_range`, `remove_range`, `replace_all`) swallow the
///    per-item notifications of the mutations they perform and raise a single
///    [`CollectionChange::Reset`] once every mutation has been applied.
/// 2. Every notification is delivered on the home context given at
///    construction. A mutation made on another thread posts the delivery to
///    the home context and returns without waiting for it.
///
/// Every mutation takes `&mut self`, so two batches on one instance can never
/// overlap. Sharing an instance between writers requires external locking.
///
/// # Example
///
/// ```
/// use ranged_observable::{ChangeKind, InlineDispatcher, ContextHandle, RangeObservableCollection};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let mut scores = RangeObservableCollection::<u32>::new(ContextHandle::new(InlineDispatcher));
///
/// let resets = Arc::new(AtomicUsize::new(0));
/// let counter = resets.clone();
/// scores.subscribe(move |change| {
///     if change.kind() == ChangeKind::Reset {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// scores.add_range([2, 4, 8, 16]).unwrap();
/// assert_eq!(scores.as_slice(), &[2, 4, 8, 16]);
/// assert_eq!(resets.load(Ordering::SeqCst), 1);
///
/// scores.remove_range([4, 16]).unwrap();
/// assert_eq!(scores.as_slice(), &[2, 8]);
/// assert_eq!(resets.load(Ordering::SeqCst), 2);
/// ```
pub struct RangeObservableCollection<T> {
    elements: Vec<T>,
    gate: NotificationGate<T>,
    reset_policy: ResetPolicy,
}

impl<T> RangeObservableCollection<T>
where
    T: Clone + Send + 'static,
{
    /// Create an empty collection that delivers notifications on `home`.
    pub fn new(home: ContextHandle) -> Self {
        Self::with_options(home, CollectionOptions::default())
    }

    pub fn with_options(home: ContextHandle, options: CollectionOptions) -> Self {
        Self {
            elements: Vec::with_capacity(options.capacity),
            gate: NotificationGate::new(home, options.priority),
            reset_policy: options.reset_policy,
        }
    }

    /// Create a collection that starts with `data`. No notification is raised.
    pub fn from_vec(home: ContextHandle, data: Vec<T>) -> Self {
        let mut collection = Self::new(home);
        collection.elements = data;
        collection
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn home(&self) -> &ContextHandle {
        self.gate.home()
    }

    pub fn priority(&self) -> DispatchPriority {
        self.gate.priority()
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    /// [`BatchState::InBatch`] only while a bulk operation is running.
    pub fn batch_state(&self) -> BatchState {
        self.gate.batch_state()
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    /// Register `handler`. It runs on the home context for every delivered change.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&CollectionChange<T>) + Send + Sync + 'static,
    {
        self.gate.subscribe(Arc::new(handler))
    }

    /// Remove a handler. Changes already posted to the home context still reach it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.gate.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.gate.subscriber_count()
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.elements.contains(item)
    }

    /// Index of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.elements.iter().position(|e| e == item)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.elements
    }

    // =========================================================================
    // SINGLE-ITEM PATHS
    // =========================================================================
    //
    // Bulk operations reuse these so per-item behavior is identical inside and
    // outside a batch. They take the fields separately so a batch guard can
    // borrow the gate while the elements are mutated.

    fn append(
        elements: &mut Vec<T>,
        gate: &NotificationGate<T>,
        item: T,
    ) -> Result<(), CollectionError> {
        let index = elements.len();
        elements.push(item);
        gate.emit(|| CollectionChange::Added {
            index,
            items: vec![elements[index].clone()],
        })?;
        Ok(())
    }

    fn remove_first(
        elements: &mut Vec<T>,
        gate: &NotificationGate<T>,
        item: &T,
    ) -> Result<bool, CollectionError>
    where
        T: PartialEq,
    {
        let Some(index) = elements.iter().position(|e| e == item) else {
            return Ok(false);
        };
        let removed = elements.remove(index);
        gate.emit(move || CollectionChange::Removed {
            index,
            items: vec![removed],
        })?;
        Ok(true)
    }

    fn check_index(&self, index: usize, len: usize) -> Result<(), CollectionError> {
        if index < len {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            })
        }
    }

    // =========================================================================
    // SINGLE-ITEM MUTATIONS
    // =========================================================================

    /// Append `item`, raising [`CollectionChange::Added`].
    pub fn push(&mut self, item: T) -> Result<(), CollectionError> {
        Self::append(&mut self.elements, &self.gate, item)
    }

    /// Insert `item` at `index`, shifting later elements right.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        self.check_index(index, self.elements.len() + 1)?;
        self.elements.insert(index, item);
        let elements = &self.elements;
        self.gate.emit(|| CollectionChange::Added {
            index,
            items: vec![elements[index].clone()],
        })?;
        Ok(())
    }

    /// Replace the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, CollectionError> {
        self.check_index(index, self.elements.len())?;
        let old = std::mem::replace(&mut self.elements[index], item);
        let elements = &self.elements;
        self.gate.emit(|| CollectionChange::Replaced {
            index,
            old: old.clone(),
            new: elements[index].clone(),
        })?;
        Ok(old)
    }

    /// Remove the first element equal to `item`. Returns whether one was found.
    pub fn remove(&mut self, item: &T) -> Result<bool, CollectionError>
    where
        T: PartialEq,
    {
        Self::remove_first(&mut self.elements, &self.gate, item)
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        self.check_index(index, self.elements.len())?;
        let removed = self.elements.remove(index);
        self.gate.emit(|| CollectionChange::Removed {
            index,
            items: vec![removed.clone()],
        })?;
        Ok(removed)
    }

    /// Move the element at `from` so that it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), CollectionError> {
        let len = self.elements.len();
        self.check_index(from, len)?;
        self.check_index(to, len)?;
        if from == to {
            return Ok(());
        }

        let item = self.elements.remove(from);
        self.elements.insert(to, item);
        let elements = &self.elements;
        self.gate.emit(|| CollectionChange::Moved {
            from,
            to,
            item: elements[to].clone(),
        })?;
        Ok(())
    }

    /// Remove every element, raising [`CollectionChange::Reset`] if any existed.
    pub fn clear(&mut self) -> Result<(), CollectionError> {
        if self.elements.is_empty() {
            return Ok(());
        }
        self.elements.clear();
        self.gate.emit(|| CollectionChange::Reset)?;
        Ok(())
    }

    // =========================================================================
    // BULK OPERATIONS
    // =========================================================================

    /// Append every item in order, then raise one [`CollectionChange::Reset`].
    ///
    /// An empty input appends nothing and raises nothing. Returns the number of
    /// items appended.
    pub fn add_range<I>(&mut self, items: I) -> Result<usize, CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let span = tracing::debug_span!("add_range", len = self.elements.len());
        let _enter = span.enter();

        let added = {
            let _batch = self.gate.suppress();
            let mut added = 0;
            for item in items {
                Self::append(&mut self.elements, &self.gate, item)?;
                added += 1;
            }
            added
        };

        if self.reset_policy.should_reset(added, added) {
            self.gate.emit(|| CollectionChange::Reset)?;
        }
        tracing::debug!(added, "bulk add complete");
        Ok(added)
    }

    /// [`add_range`](Self::add_range) for an input that may be absent.
    ///
    /// `None` fails with [`CollectionError::InvalidArgument`] and changes nothing.
    pub fn try_add_range<I>(&mut self, items: Option<I>) -> Result<usize, CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.ok_or_else(|| CollectionError::missing("add_range", "items"))?;
        self.add_range(items)
    }

    /// Remove the first element equal to each item, in order.
    ///
    /// Items with no match are skipped. Whether a [`CollectionChange::Reset`]
    /// follows when nothing matched depends on the [`ResetPolicy`]. Returns the
    /// number of elements removed.
    pub fn remove_range<I>(&mut self, items: I) -> Result<usize, CollectionError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        T: PartialEq,
    {
        let span = tracing::debug_span!("remove_range", len = self.elements.len());
        let _enter = span.enter();

        let (requested, removed) = {
            let _batch = self.gate.suppress();
            let mut requested = 0;
            let mut removed = 0;
            for item in items {
                requested += 1;
                if Self::remove_first(&mut self.elements, &self.gate, item.borrow())? {
                    removed += 1;
                }
            }
            (requested, removed)
        };

        if self.reset_policy.should_reset(requested, removed) {
            self.gate.emit(|| CollectionChange::Reset)?;
        }
        tracing::debug!(requested, removed, "bulk remove complete");
        Ok(removed)
    }

    /// [`remove_range`](Self::remove_range) for an input that may be absent.
    pub fn try_remove_range<I>(&mut self, items: Option<I>) -> Result<usize, CollectionError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        T: PartialEq,
    {
        let items = items.ok_or_else(|| CollectionError::missing("remove_range", "items"))?;
        self.remove_range(items)
    }

    /// Replace the whole contents with `items` under one batch.
    ///
    /// Raises one [`CollectionChange::Reset`] unless the collection was empty
    /// before and after.
    pub fn replace_all<I>(&mut self, items: I) -> Result<usize, CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let span = tracing::debug_span!("replace_all", len = self.elements.len());
        let _enter = span.enter();

        let (cleared, added) = {
            let _batch = self.gate.suppress();
            let cleared = self.elements.len();
            self.elements.clear();
            let mut added = 0;
            for item in items {
                Self::append(&mut self.elements, &self.gate, item)?;
                added += 1;
            }
            (cleared, added)
        };

        if cleared + added > 0 {
            self.gate.emit(|| CollectionChange::Reset)?;
        }
        tracing::debug!(cleared, added, "bulk replace complete");
        Ok(added)
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl<T> Index<usize> for RangeObservableCollection<T> {
    type Output = T;

    /// Panics if `index` is out of bounds, like `Vec`.
    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<'a, T> IntoIterator for &'a RangeObservableCollection<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for RangeObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeObservableCollection")
            .field("elements", &self.elements)
            .field("gate", &self.gate)
            .field("reset_policy", &self.reset_policy)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
