// ============================================================================
// ranged-observable - Change Payloads
// The "contents changed" notification delivered to subscribers
// ============================================================================

use std::fmt;
use std::slice;
use std::sync::Arc;

// =============================================================================
// CHANGE KIND
// =============================================================================

/// Discriminant of a [`CollectionChange`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ChangeKind {
    Added,
    Removed,
    Replaced,
    Moved,
    /// The contents changed in a way not worth describing item by item.
    Reset,
}

// =============================================================================
// COLLECTION CHANGE
// =============================================================================

/// A single notification describing how a collection's contents changed.
///
/// Payloads are built once, at the moment of the mutation, and moved to the
/// home context by value. Indexes refer to positions at the time of the change.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CollectionChange<T> {
    Added { index: usize, items: Vec<T> },
    Removed { index: usize, items: Vec<T> },
    Replaced { index: usize, old: T, new: T },
    Moved { from: usize, to: usize, item: T },
    Reset,
}

impl<T> CollectionChange<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Replaced { .. } => ChangeKind::Replaced,
            Self::Moved { .. } => ChangeKind::Moved,
            Self::Reset => ChangeKind::Reset,
        }
    }

    /// Items carried by the change, if any.
    ///
    /// `Replaced` reports the new value and `Moved` the moved item.
    /// `Reset` carries no detail.
    pub fn affected_items(&self) -> Option<&[T]> {
        match self {
            Self::Added { items, .. } | Self::Removed { items, .. } => Some(items),
            Self::Replaced { new, .. } => Some(slice::from_ref(new)),
            Self::Moved { item, .. } => Some(slice::from_ref(item)),
            Self::Reset => None,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Reset)
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Handler invoked on the home context for every delivered change.
pub type ChangeHandler<T> = Arc<dyn Fn(&CollectionChange<T>) + Send + Sync + 'static>;

/// Identifies one registered handler; pass it to `unsubscribe`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let added = CollectionChange::Added {
            index: 0,
            items: vec![1],
        };
        assert_eq!(added.kind(), ChangeKind::Added);
        assert_eq!(CollectionChange::<i32>::Reset.kind(), ChangeKind::Reset);
        assert!(CollectionChange::<i32>::Reset.is_reset());
    }

    #[test]
    fn reset_has_no_affected_items() {
        assert_eq!(CollectionChange::<i32>::Reset.affected_items(), None);
    }

    #[test]
    fn replaced_reports_new_value() {
        let change = CollectionChange::Replaced {
            index: 2,
            old: "a",
            new: "b",
        };
        assert_eq!(change.affected_items(), Some(&["b"][..]));
    }

    #[test]
    fn removed_reports_all_items() {
        let change = CollectionChange::Removed {
            index: 1,
            items: vec![4, 5],
        };
        assert_eq!(change.affected_items(), Some(&[4, 5][..]));
    }
}
