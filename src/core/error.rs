// ============================================================================
// ranged-observable - Errors
// Error types surfaced by the collection and the dispatch providers
// ============================================================================

use thiserror::Error;

// =============================================================================
// DISPATCH ERROR
// =============================================================================

/// Failure reported by an execution-context provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The target context no longer accepts work.
    #[error("dispatch context has been shut down")]
    ShutDown,

    /// A queue was pumped from a thread that does not own it.
    #[error("dispatch queue can only be run on its owning thread")]
    WrongThread,
}

// =============================================================================
// COLLECTION ERROR
// =============================================================================

/// Errors returned by [`RangeObservableCollection`](crate::RangeObservableCollection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A required batch input was absent.
    #[error("invalid argument `{parameter}` passed to `{operation}`: value is absent")]
    InvalidArgument {
        operation: &'static str,
        parameter: &'static str,
    },

    /// An index was outside `0..len` (or `0..=len` for insertion).
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The home context refused the notification. The mutation itself was applied.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl CollectionError {
    pub(crate) fn missing(operation: &'static str, parameter: &'static str) -> Self {
        Self::InvalidArgument {
            operation,
            parameter,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
