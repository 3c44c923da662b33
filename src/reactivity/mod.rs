// ============================================================================
// ranged-observable - Reactivity Module
// Batch suppression and the notification gate
// ============================================================================

pub mod batching;
pub mod gate;

pub use batching::{enter_batch, BatchGuard, BatchState};
pub use gate::{Delivery, NotificationGate};
