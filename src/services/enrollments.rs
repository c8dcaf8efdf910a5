//! Enrollment Service
//!
//! Enrollment requests and their validation or cancellation.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::student::required;
use crate::domain::{
    access_denied, AcademicYear, Action, BusinessError, BusinessResult, Enrollment,
    EnrollmentInput, EnrollmentStatus, Level, NewEnrollment, OperationContext, Resource,
};
use crate::store::MemoryStore;

use super::unavailable;

const SERVICE: &str = "EnrollmentService";

pub struct EnrollmentService {
    store: Arc<MemoryStore>,
}

impl EnrollmentService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Open a pending enrollment. Program and level default to the
    /// student's current ones.
    pub fn enroll(
        &self,
        context: &OperationContext,
        input: EnrollmentInput,
    ) -> BusinessResult<Enrollment> {
        let actor = context.actor()?;
        actor.authorize(Action::Create, Resource::Enrollments)?;
        if !actor.can_see_student(input.student_id) {
            return Err(access_denied(Action::Create, Resource::Enrollments));
        }

        let academic_year: AcademicYear = input.academic_year.parse()?;
        let program = input
            .program
            .as_deref()
            .map(|p| required("filiere", p))
            .transpose()?;
        let level = input
            .level
            .as_deref()
            .map(str::parse::<Level>)
            .transpose()?;
        let student_id = input.student_id;

        let enrollment = self
            .store
            .write(|t| {
                let student = t
                    .students
                    .get(&student_id)
                    .ok_or_else(|| BusinessError::not_found("Etudiant", student_id))?;

                let new = NewEnrollment {
                    student_id,
                    academic_year,
                    program: program.unwrap_or_else(|| student.program.clone()),
                    level: level.unwrap_or(student.level),
                };

                if t
                    .enrollments_for(student_id)
                    .any(|e| e.academic_year == academic_year && e.status.is_active())
                {
                    return Err(BusinessError::data_integrity(format!(
                        "L'étudiant #{} a déjà une inscription active pour {}",
                        student_id, academic_year
                    ))
                    .with_parameter(student_id)
                    .with_parameter(academic_year.to_string()));
                }

                let id = t.next_enrollment_id();
                let enrollment = Enrollment::create(id, new, Utc::now());
                t.enrollments.insert(id, enrollment.clone());
                Ok(enrollment)
            })
            .map_err(unavailable(SERVICE))??;

        tracing::info!(
            enrollment_id = enrollment.id,
            student_id,
            academic_year = %academic_year,
            actor = %actor.username,
            "Enrollment created"
        );
        Ok(enrollment)
    }

    pub fn get(&self, context: &OperationContext, id: u64) -> BusinessResult<Enrollment> {
        let actor = context.actor()?;
        actor.authorize(Action::Read, Resource::Enrollment(id))?;

        let enrollment = self
            .store
            .read(|t| t.enrollments.get(&id).cloned())
            .map_err(unavailable(SERVICE))?
            .ok_or_else(|| BusinessError::not_found("Inscription", id))?;

        if !actor.can_see_student(enrollment.student_id) {
            return Err(access_denied(Action::Read, Resource::Enrollment(id)));
        }
        Ok(enrollment)
    }

    /// Every enrollment visible to the actor, ordered by id
    pub fn list(&self, context: &OperationContext) -> BusinessResult<Vec<Enrollment>> {
        let actor = context.actor()?;
        actor.authorize(Action::Read, Resource::Enrollments)?;

        self.store
            .read(|t| {
                t.enrollments
                    .values()
                    .filter(|e| actor.can_see_student(e.student_id))
                    .cloned()
                    .collect()
            })
            .map_err(unavailable(SERVICE))
    }

    pub fn list_for_student(
        &self,
        context: &OperationContext,
        student_id: u64,
    ) -> BusinessResult<Vec<Enrollment>> {
        let actor = context.actor()?;
        actor.authorize(Action::Read, Resource::Student(student_id))?;
        actor.authorize(Action::Read, Resource::Enrollments)?;

        self.store
            .read(|t| {
                if !t.students.contains_key(&student_id) {
                    return Err(BusinessError::not_found("Etudiant", student_id));
                }
                Ok(t.enrollments_for(student_id).cloned().collect())
            })
            .map_err(unavailable(SERVICE))?
    }

    pub fn validate(&self, context: &OperationContext, id: u64) -> BusinessResult<Enrollment> {
        self.transition(context, id, Action::Validate, EnrollmentStatus::Validated)
    }

    pub fn cancel(&self, context: &OperationContext, id: u64) -> BusinessResult<Enrollment> {
        self.transition(context, id, Action::Cancel, EnrollmentStatus::Cancelled)
    }

    fn transition(
        &self,
        context: &OperationContext,
        id: u64,
        action: Action,
        next: EnrollmentStatus,
    ) -> BusinessResult<Enrollment> {
        let actor = context.actor()?;
        actor.authorize(action, Resource::Enrollment(id))?;

        let enrollment = self
            .store
            .write(|t| {
                let enrollment = t
                    .enrollments
                    .get_mut(&id)
                    .ok_or_else(|| BusinessError::not_found("Inscription", id))?;
                enrollment.transition(next, Utc::now())?;
                Ok(enrollment.clone())
            })
            .map_err(unavailable(SERVICE))??;

        tracing::info!(
            enrollment_id = id,
            status = ?enrollment.status,
            actor = %actor.username,
            "Enrollment status changed"
        );
        Ok(enrollment)
    }
}
