//! Operation Context
//!
//! Contains the authenticated actor and tracing metadata for the current operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{BusinessError, BusinessResult};
use super::role::{access_denied, Action, Resource, Role};
use super::user::User;

/// The authenticated user performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<u64>,
}

impl Actor {
    /// Check the role policy, plus record ownership for the student role
    pub fn authorize(&self, action: Action, resource: Resource) -> BusinessResult<()> {
        if !self.role.permits(action, resource.kind()) {
            return Err(access_denied(action, resource));
        }
        if self.role.is_staff() {
            return Ok(());
        }

        let owns = match resource {
            Resource::Student(id) => self.student_id == Some(id),
            Resource::Dashboard | Resource::Enrollments | Resource::Enrollment(_) => true,
            Resource::Students => false,
        };
        if owns {
            Ok(())
        } else {
            Err(access_denied(action, resource))
        }
    }

    /// Staff see every student; a student only itself
    pub fn can_see_student(&self, student_id: u64) -> bool {
        self.role.is_staff() || self.student_id == Some(student_id)
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            student_id: user.student_id,
        }
    }
}

/// Context for an operation, used for authorization and tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Authenticated user, absent for anonymous calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            actor: None,
            correlation_id: None,
        }
    }

    /// Create context with an authenticated actor
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }

    /// The authenticated actor, or an authentication error
    pub fn actor(&self) -> BusinessResult<&Actor> {
        self.actor
            .as_ref()
            .ok_or_else(|| BusinessError::authentication("Authentification requise"))
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, student_id: Option<u64>) -> Actor {
        Actor {
            user_id: 1,
            username: "test".to_string(),
            role,
            student_id,
        }
    }

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let context = OperationContext::new()
            .with_actor(actor(Role::Admin, None))
            .with_correlation_id(correlation_id);

        assert_eq!(context.actor().unwrap().role, Role::Admin);
        assert_eq!(context.correlation_id, Some(correlation_id));
    }

    #[test]
    fn test_ensure_correlation_id() {
        let mut context = OperationContext::new();
        assert!(context.correlation_id.is_none());

        let id = context.ensure_correlation_id();
        assert_eq!(context.correlation_id, Some(id));

        // Calling again should return the same ID
        assert_eq!(context.ensure_correlation_id(), id);
    }

    #[test]
    fn test_anonymous_context_is_authentication_error() {
        let err = OperationContext::new().actor().unwrap_err();
        assert_eq!(err.code().as_str(), "AUTH_ERROR");
        assert_eq!(err.message(), "Authentification requise");
    }

    #[test]
    fn test_student_only_reads_own_record() {
        let student = actor(Role::Etudiant, Some(5));

        assert!(student.authorize(Action::Read, Resource::Student(5)).is_ok());

        let err = student.authorize(Action::Read, Resource::Student(6)).unwrap_err();
        assert_eq!(err.message(), "Accès refusé pour l'action 'read' sur 'etudiant#6'");

        assert!(student.authorize(Action::Read, Resource::Students).is_err());
    }

    #[test]
    fn test_staff_role_policy() {
        let enseignant = actor(Role::Enseignant, None);
        assert!(enseignant.authorize(Action::Read, Resource::Student(9)).is_ok());

        let err = enseignant.authorize(Action::Delete, Resource::Student(9)).unwrap_err();
        assert_eq!(err.code().as_str(), "AUTHORIZATION_ERROR");
    }
}
