// ============================================================================
// ranged-observable - Collection Options
// ============================================================================

use crate::dispatch::DispatchPriority;

/// When a bulk operation raises its coalesced `Reset`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ResetPolicy {
    /// Only when at least one element was actually added or removed.
    #[default]
    WhenChanged,

    /// Whenever the input sequence was non-empty, even if no element matched.
    WhenInputNonEmpty,
}

impl ResetPolicy {
    pub(crate) fn should_reset(self, input_len: usize, mutated: usize) -> bool {
        match self {
            Self::WhenChanged => mutated > 0,
            Self::WhenInputNonEmpty => input_len > 0,
        }
    }
}

/// Construction options for a [`RangeObservableCollection`](crate::RangeObservableCollection).
///
/// # Example
///
/// ```
/// use ranged_observable::{CollectionOptions, DispatchPriority, ResetPolicy};
///
/// let options = CollectionOptions::default()
///     .with_priority(DispatchPriority::Normal)
///     .with_reset_policy(ResetPolicy::WhenInputNonEmpty)
///     .with_capacity(64);
/// assert_eq!(options.capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Priority used when posting a notification to the home context.
    pub priority: DispatchPriority,
    pub reset_policy: ResetPolicy,
    /// Initial element capacity.
    pub capacity: usize,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            priority: DispatchPriority::DataBind,
            reset_policy: ResetPolicy::default(),
            capacity: 0,
        }
    }
}

impl CollectionOptions {
    pub fn with_priority(mut self, priority: DispatchPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_reset_policy(mut self, reset_policy: ResetPolicy) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
