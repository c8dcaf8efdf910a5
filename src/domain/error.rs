//! Business Error Types
//!
//! The closed taxonomy of business errors raised by the service layer.
//! Each error carries a stable code, a message formatted at construction,
//! optional structured parameters and an optional diagnostic cause.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Result type for operations that fail with a business error
pub type BusinessResult<T> = Result<T, BusinessError>;

/// Shared handle to a lower-level failure kept for diagnostics
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    DataIntegrity,
    ServiceUnavailable,
}

impl ErrorCode {
    /// Every code, in declaration order
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::Validation,
        ErrorCode::Authentication,
        ErrorCode::Authorization,
        ErrorCode::NotFound,
        ErrorCode::DataIntegrity,
        ErrorCode::ServiceUnavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::Authentication => "AUTH_ERROR",
            ErrorCode::Authorization => "AUTHORIZATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DataIntegrity => "DATA_INTEGRITY",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The variant of a business error, with the context it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessErrorKind {
    /// Input rejected by a business rule; `field` is absent for free-form messages
    Validation { field: Option<String> },

    /// Caller identity could not be established
    Authentication,

    /// Caller is known but not allowed to perform `action` on `resource`
    Authorization { action: String, resource: String },

    /// Requested entity does not exist; both fields absent for free-form messages
    NotFound {
        entity_type: Option<String>,
        id: Option<String>,
    },

    /// Operation would break a data consistency rule
    DataIntegrity,

    /// A collaborating service cannot serve the request right now
    ServiceUnavailable { service_name: String },
}

impl BusinessErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::Authentication => ErrorCode::Authentication,
            Self::Authorization { .. } => ErrorCode::Authorization,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::DataIntegrity => ErrorCode::DataIntegrity,
            Self::ServiceUnavailable { .. } => ErrorCode::ServiceUnavailable,
        }
    }
}

/// A business error
///
/// # Invariants
/// - The code is derived from the kind and never changes
/// - The message is fully formatted when the error is built
/// - Parameters are an empty list when none were supplied
///
/// # Example
/// ```
/// use scolarite::domain::BusinessError;
///
/// let err = BusinessError::validation("email", "format invalide");
/// assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
/// assert_eq!(err.message(), "Erreur de validation sur email: format invalide");
/// ```
#[derive(Debug, Clone)]
pub struct BusinessError {
    kind: BusinessErrorKind,
    message: String,
    parameters: Vec<Value>,
    cause: Option<Cause>,
}

impl BusinessError {
    fn new(kind: BusinessErrorKind, message: String, parameters: Vec<Value>) -> Self {
        Self {
            kind,
            message,
            parameters,
            cause: None,
        }
    }

    fn caused_by(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validation error on a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(
            BusinessErrorKind::Validation {
                field: Some(field.clone()),
            },
            format!("Erreur de validation sur {}: {}", field, message),
            vec![Value::String(field), Value::String(message)],
        )
    }

    /// Validation error with a free-form message
    pub fn validation_message(message: impl Into<String>) -> Self {
        Self::new(
            BusinessErrorKind::Validation { field: None },
            message.into(),
            Vec::new(),
        )
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::Authentication, message.into(), Vec::new())
    }

    pub fn authentication_with_cause(message: impl Into<String>, cause: Cause) -> Self {
        Self::authentication(message).caused_by(cause)
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    pub fn authorization(action: impl Into<String>, resource: impl Into<String>) -> Self {
        let action = action.into();
        let resource = resource.into();
        Self::new(
            BusinessErrorKind::Authorization {
                action: action.clone(),
                resource: resource.clone(),
            },
            format!("Accès refusé pour l'action '{}' sur '{}'", action, resource),
            vec![Value::String(action), Value::String(resource)],
        )
    }

    // =========================================================================
    // Not found
    // =========================================================================

    /// Entity of the given type and id does not exist
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        let entity_type = entity_type.into();
        let id = id.to_string();
        Self::new(
            BusinessErrorKind::NotFound {
                entity_type: Some(entity_type.clone()),
                id: Some(id.clone()),
            },
            format!("{} avec l'ID '{}' non trouvé", entity_type, id),
            vec![Value::String(entity_type), Value::String(id)],
        )
    }

    pub fn not_found_message(message: impl Into<String>) -> Self {
        Self::new(
            BusinessErrorKind::NotFound {
                entity_type: None,
                id: None,
            },
            message.into(),
            Vec::new(),
        )
    }

    // =========================================================================
    // Data integrity
    // =========================================================================

    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::DataIntegrity, message.into(), Vec::new())
    }

    pub fn data_integrity_with_cause(message: impl Into<String>, cause: Cause) -> Self {
        Self::data_integrity(message).caused_by(cause)
    }

    // =========================================================================
    // Service unavailable
    // =========================================================================

    pub fn service_unavailable(service_name: impl Into<String>) -> Self {
        let service_name = service_name.into();
        Self::new(
            BusinessErrorKind::ServiceUnavailable {
                service_name: service_name.clone(),
            },
            format!("Service '{}' temporairement indisponible", service_name),
            vec![Value::String(service_name)],
        )
    }

    pub fn service_unavailable_with_cause(service_name: impl Into<String>, cause: Cause) -> Self {
        Self::service_unavailable(service_name).caused_by(cause)
    }

    /// Append a structured parameter before the error is raised
    pub fn with_parameter(mut self, value: impl Into<Value>) -> Self {
        self.parameters.push(value.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> &BusinessErrorKind {
        &self.kind
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Check if retrying the operation later may succeed
    pub fn is_retryable(&self) -> bool {
        self.code() == ErrorCode::ServiceUnavailable
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for BusinessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
