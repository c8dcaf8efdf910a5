//! Application State
//!
//! Services shared by every request handler.

use std::sync::Arc;

use chrono::Duration;

use crate::services::{AuthService, DashboardService, EnrollmentService, StudentService};
use crate::store::MemoryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<AuthService>,
    pub students: Arc<StudentService>,
    pub enrollments: Arc<EnrollmentService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, session_ttl: Duration) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), session_ttl)),
            students: Arc::new(StudentService::new(store.clone())),
            enrollments: Arc::new(EnrollmentService::new(store.clone())),
            dashboard: Arc::new(DashboardService::new(store.clone())),
            store,
        }
    }
}
