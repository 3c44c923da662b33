// ============================================================================
// ranged-observable - Collections
// ============================================================================
//
// RangeObservableCollection composes a Vec with a NotificationGate:
//
// 1. Single-item mutations raise Added/Removed/Replaced/Moved immediately
// 2. Bulk mutations raise one Reset after all items are applied
// 3. Delivery always happens on the home context
// ============================================================================

mod range;

pub use range::RangeObservableCollection;
