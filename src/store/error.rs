//! Store Errors
//!
//! Lower-level storage failures. The service layer wraps these as
//! `SERVICE_UNAVAILABLE` business errors with the store error as cause.

/// Errors that can occur in the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store was closed during shutdown
    #[error("Store is closed")]
    Closed,

    /// A writer panicked while holding the lock
    #[error("Store lock poisoned")]
    Poisoned,
}
