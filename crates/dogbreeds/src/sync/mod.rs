//! Client-side sync helpers
//!
//! Retry bookkeeping, list reconciliation and query debouncing. Everything
//! here is synchronous and runs on the consumer thread.

pub mod debounce;
pub mod reconcile;
pub mod retry;

pub use debounce::Debouncer;
pub use retry::{PendingOperation, RetryQueue};
