// ============================================================================
// ranged-observable - Dispatch Module
// Execution contexts that notifications are delivered on
// ============================================================================

mod context;
mod inline;
mod queue;

pub use context::{
    current, current_queue, ContextHandle, DispatchPriority, Dispatcher, Task,
};
pub use inline::InlineDispatcher;
pub use queue::DispatchQueue;
