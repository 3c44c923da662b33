// ============================================================================
// ranged-observable - Core Module
// Change payloads, errors, and options shared by every other module
// ============================================================================

pub mod change;
pub mod error;
pub mod options;

pub use change::{ChangeHandler, ChangeKind, CollectionChange, SubscriptionId};
pub use error::{CollectionError, DispatchError};
pub use options::{CollectionOptions, ResetPolicy};
