//! Store module
//!
//! In-process storage for users, sessions, students and enrollments.
//! Tables live behind a single lock so multi-table updates stay atomic.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::{MemoryStore, SessionRecord, Tables};
