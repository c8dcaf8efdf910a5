//! Dashboard Service
//!
//! Per-role summary shown after login.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    Action, BusinessError, BusinessResult, Enrollment, EnrollmentStatus, OperationContext,
    Resource, Role,
};
use crate::store::MemoryStore;

use super::unavailable;

const SERVICE: &str = "DashboardService";

/// Enrollment counts by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrollmentCounts {
    pub total: usize,
    pub pending: usize,
    pub validated: usize,
    pub cancelled: usize,
}

impl EnrollmentCounts {
    fn tally<'a>(enrollments: impl Iterator<Item = &'a Enrollment>) -> Self {
        enrollments.fold(Self::default(), |mut counts, e| {
            counts.total += 1;
            match e.status {
                EnrollmentStatus::Pending => counts.pending += 1,
                EnrollmentStatus::Validated => counts.validated += 1,
                EnrollmentStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub role: Role,
    pub role_label: &'static str,
    pub display_name: String,
    /// Absent for the student role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_count: Option<usize>,
    pub enrollments: EnrollmentCounts,
}

pub struct DashboardService {
    store: Arc<MemoryStore>,
}

impl DashboardService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn summary(&self, context: &OperationContext) -> BusinessResult<DashboardSummary> {
        let actor = context.actor()?;
        actor.authorize(Action::Read, Resource::Dashboard)?;

        let (display_name, student_count, enrollments) = self
            .store
            .read(|t| {
                let display_name = t.users.get(&actor.user_id).map(|u| u.display_name.clone());
                let student_count = actor.role.is_staff().then_some(t.students.len());
                let enrollments = EnrollmentCounts::tally(
                    t.enrollments
                        .values()
                        .filter(|e| actor.can_see_student(e.student_id)),
                );
                (display_name, student_count, enrollments)
            })
            .map_err(unavailable(SERVICE))?;

        let display_name =
            display_name.ok_or_else(|| BusinessError::not_found("Utilisateur", actor.user_id))?;

        Ok(DashboardSummary {
            role: actor.role,
            role_label: actor.role.label(),
            display_name,
            student_count,
            enrollments,
        })
    }
}
