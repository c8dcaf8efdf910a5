//! Domain module
//!
//! Core domain types, business rules and the business error taxonomy.

pub mod context;
pub mod enrollment;
pub mod error;
pub mod role;
pub mod student;
pub mod user;

pub use context::{Actor, OperationContext};
pub use enrollment::{AcademicYear, Enrollment, EnrollmentInput, EnrollmentStatus, NewEnrollment};
pub use error::{BusinessError, BusinessErrorKind, BusinessResult, Cause, ErrorCode};
pub use role::{access_denied, Action, Resource, ResourceKind, Role};
pub use student::{Level, NewStudent, Student, StudentChanges, StudentInput, StudentPatch};
pub use user::{hash_secret, User};
