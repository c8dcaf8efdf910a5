//! Services module
//!
//! Business operations for authentication, students, enrollments and
//! dashboards. Every failure is reported as a `BusinessError`; storage
//! failures are wrapped as `SERVICE_UNAVAILABLE` with the store error as cause.

mod auth;
mod dashboard;
mod enrollments;
mod students;


use std::sync::Arc;

use crate::domain::BusinessError;
use crate::store::StoreError;

pub use auth::{AuthService, Session, DEMO_ACCOUNTS};
pub use dashboard::{DashboardService, DashboardSummary, EnrollmentCounts};
pub use enrollments::EnrollmentService;
pub use students::StudentService;

/// Wrap a storage failure as a service-unavailable business error
fn unavailable(service: &'static str) -> impl Fn(StoreError) -> BusinessError {
    move |err| {
        tracing::error!(service, error = %err, "Store failure");
        BusinessError::service_unavailable_with_cause(service, Arc::new(err))
    }
}
