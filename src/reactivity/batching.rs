// ============================================================================
// ranged-observable - Batching
// Suppress per-item notifications for the extent of a bulk operation
// ============================================================================

use std::cell::Cell;

// =============================================================================
// BATCH STATE
// =============================================================================

/// Whether a collection is inside a bulk operation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum BatchState {
    #[default]
    Idle,
    InBatch,
}

// =============================================================================
// BATCH GUARD
// =============================================================================

/// Restores [`BatchState::Idle`] when dropped, including on unwind.
///
/// Created by [`enter_batch`]. While a guard is alive, notifications emitted
/// through the owning gate are swallowed.
#[must_use = "the batch ends as soon as the guard is dropped"]
pub struct BatchGuard<'a> {
    state: &'a Cell<BatchState>,
}

/// Move `state` into [`BatchState::InBatch`].
///
/// Batches never nest: every bulk operation takes `&mut` on its collection,
/// so a second batch cannot start while a guard is alive.
pub fn enter_batch(state: &Cell<BatchState>) -> BatchGuard<'_> {
    let prev = state.replace(BatchState::InBatch);
    debug_assert_eq!(prev, BatchState::Idle, "bulk operations do not nest");
    BatchGuard { state }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.state.set(BatchState::Idle);
    }
}

// =============================================================================
// TESTS
// =============================================================================
