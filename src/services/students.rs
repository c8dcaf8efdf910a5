//! Student Service
//!
//! Student CRUD with role checks and data integrity rules.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Action, BusinessError, BusinessResult, EnrollmentStatus, NewStudent, OperationContext,
    Resource, Student, StudentChanges, StudentInput, StudentPatch,
};
use crate::store::MemoryStore;

use super::unavailable;

const SERVICE: &str = "StudentService";

pub struct StudentService {
    store: Arc<MemoryStore>,
}

impl StudentService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Register a new student
    pub fn create(&self, context: &OperationContext, input: StudentInput) -> BusinessResult<Student> {
        let actor = context.actor()?;
        actor.authorize(Action::Create, Resource::Students)?;

        let now = Utc::now();
        let input = NewStudent::parse(input, now.date_naive())?;

        let student = self
            .store
            .write(|t| {
                if t.student_by_email(&input.email).is_some() {
                    return Err(duplicate_email(&input.email));
                }
                let id = t.next_student_id();
                let student = Student::create(id, input, now);
                t.students.insert(id, student.clone());
                Ok(student)
            })
            .map_err(unavailable(SERVICE))??;

        tracing::info!(
            student_id = student.id,
            matricule = %student.matricule,
            actor = %actor.username,
            "Student created"
        );
        Ok(student)
    }

    pub fn get(&self, context: &OperationContext, id: u64) -> BusinessResult<Student> {
        context.actor()?.authorize(Action::Read, Resource::Student(id))?;

        self.store
            .read(|t| t.students.get(&id).cloned())
            .map_err(unavailable(SERVICE))?
            .ok_or_else(|| BusinessError::not_found("Etudiant", id))
    }

    /// All students, ordered by id
    pub fn list(&self, context: &OperationContext) -> BusinessResult<Vec<Student>> {
        context.actor()?.authorize(Action::Read, Resource::Students)?;

        self.store
            .read(|t| t.students.values().cloned().collect())
            .map_err(unavailable(SERVICE))
    }

    pub fn update(
        &self,
        context: &OperationContext,
        id: u64,
        patch: StudentPatch,
    ) -> BusinessResult<Student> {
        let actor = context.actor()?;
        actor.authorize(Action::Update, Resource::Student(id))?;

        let now = Utc::now();
        let changes = StudentChanges::parse(patch, now.date_naive())?;

        let (student, changed) = self
            .store
            .write(|t| {
                if !t.students.contains_key(&id) {
                    return Err(BusinessError::not_found("Etudiant", id));
                }
                if let Some(email) = &changes.email {
                    if t.student_by_email(email).is_some_and(|s| s.id != id) {
                        return Err(duplicate_email(email));
                    }
                }
                let student = t
                    .students
                    .get_mut(&id)
                    .ok_or_else(|| BusinessError::not_found("Etudiant", id))?;
                let changed = student.apply(changes, now);
                Ok((student.clone(), changed))
            })
            .map_err(unavailable(SERVICE))??;

        if changed {
            tracing::info!(student_id = id, actor = %actor.username, "Student updated");
        }
        Ok(student)
    }

    /// Remove a student and its enrollments. Refused while a validated
    /// enrollment exists.
    pub fn delete(&self, context: &OperationContext, id: u64) -> BusinessResult<()> {
        let actor = context.actor()?;
        actor.authorize(Action::Delete, Resource::Student(id))?;

        let removed_enrollments = self
            .store
            .write(|t| {
                if !t.students.contains_key(&id) {
                    return Err(BusinessError::not_found("Etudiant", id));
                }
                if t
                    .enrollments_for(id)
                    .any(|e| e.status == EnrollmentStatus::Validated)
                {
                    return Err(BusinessError::data_integrity(format!(
                        "Impossible de supprimer l'étudiant #{}: une inscription validée existe",
                        id
                    ))
                    .with_parameter(id));
                }

                t.students.remove(&id);
                let before = t.enrollments.len();
                t.enrollments.retain(|_, e| e.student_id != id);
                for user in t.users.values_mut() {
                    if user.student_id == Some(id) {
                        user.student_id = None;
                    }
                }
                Ok(before - t.enrollments.len())
            })
            .map_err(unavailable(SERVICE))??;

        tracing::info!(
            student_id = id,
            removed_enrollments,
            actor = %actor.username,
            "Student deleted"
        );
        Ok(())
    }
}

fn duplicate_email(email: &str) -> BusinessError {
    BusinessError::data_integrity(format!(
        "Un étudiant avec l'email '{}' existe déjà",
        email
    ))
    .with_parameter(email)
}
