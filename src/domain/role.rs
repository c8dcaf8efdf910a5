//! Roles and permissions
//!
//! Maps each user role to the actions it may perform on each kind of resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::BusinessError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Enseignant,
    Etudiant,
    Scolarite,
    Direction,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Enseignant,
        Role::Etudiant,
        Role::Scolarite,
        Role::Direction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Enseignant => "enseignant",
            Role::Etudiant => "etudiant",
            Role::Scolarite => "scolarite",
            Role::Direction => "direction",
        }
    }

    /// Human-readable label shown on dashboards
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrateur",
            Role::Enseignant => "Enseignant",
            Role::Etudiant => "Étudiant",
            Role::Scolarite => "Service de scolarité",
            Role::Direction => "Direction",
        }
    }

    /// Staff roles see every record; the student role only its own
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Etudiant)
    }

    /// Check whether this role may perform `action` on resources of `kind`.
    ///
    /// For the student role this only says the action is possible in
    /// principle; ownership of the record is checked by the caller.
    pub fn permits(&self, action: Action, kind: ResourceKind) -> bool {
        use Action::*;
        use ResourceKind::*;

        match (self, kind) {
            (_, Dashboard) => action == Read,
            (Role::Admin, _) => true,
            (Role::Scolarite, Students) => matches!(action, Read | Create | Update | Delete),
            (Role::Scolarite, Enrollments) => matches!(action, Read | Create | Validate | Cancel),
            (Role::Direction, Students) => action == Read,
            (Role::Direction, Enrollments) => matches!(action, Read | Validate),
            (Role::Enseignant, Students | Enrollments) => action == Read,
            (Role::Etudiant, Students) => action == Read,
            (Role::Etudiant, Enrollments) => matches!(action, Read | Create),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BusinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| BusinessError::validation("role", format!("rôle inconnu '{}'", s)))
    }
}

/// Action performed on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Validate,
    Cancel,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Validate => "validate",
            Action::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource, used for permission lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Students,
    Enrollments,
    Dashboard,
}

/// A concrete resource an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Student(u64),
    Students,
    Enrollment(u64),
    Enrollments,
    Dashboard,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Student(_) | Resource::Students => ResourceKind::Students,
            Resource::Enrollment(_) | Resource::Enrollments => ResourceKind::Enrollments,
            Resource::Dashboard => ResourceKind::Dashboard,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Student(id) => write!(f, "etudiant#{}", id),
            Resource::Students => f.write_str("etudiants"),
            Resource::Enrollment(id) => write!(f, "inscription#{}", id),
            Resource::Enrollments => f.write_str("inscriptions"),
            Resource::Dashboard => f.write_str("tableau-de-bord"),
        }
    }
}

/// Build the authorization error for a denied action
pub fn access_denied(action: Action, resource: Resource) -> BusinessError {
    BusinessError::authorization(action.as_str(), resource.to_string())
}
