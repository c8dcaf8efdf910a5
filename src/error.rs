//! Error handling module
//!
//! Application-level error type and HTTP response conversion. Business
//! errors keep their code and message; anything else is a defect and is
//! rendered as an opaque internal error.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{BusinessError, ErrorCode};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Expected business failure
    #[error(transparent)]
    Business(#[from] BusinessError),

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "en-tête Content-Type: application/json attendu".to_string()
            }
            _ => rejection.body_text(),
        };
        BusinessError::validation_message(format!("Corps de requête invalide: {}", detail)).into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        BusinessError::validation_message(format!(
            "Paramètre d'URL invalide: {}",
            rejection.body_text()
        ))
        .into()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
}

/// HTTP status for each business error code
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Authentication => StatusCode::UNAUTHORIZED,
        ErrorCode::Authorization => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DataIntegrity => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Business(err) => {
                let status = status_for(err.code());
                let cause = err.cause().map(|c| c.to_string());

                if status.is_server_error() {
                    tracing::error!(
                        code = %err.code(),
                        message = %err.message(),
                        parameters = ?err.parameters(),
                        cause = ?cause,
                        "Business error"
                    );
                } else {
                    tracing::warn!(
                        code = %err.code(),
                        message = %err.message(),
                        parameters = ?err.parameters(),
                        "Business error"
                    );
                }

                let body = ErrorResponse {
                    error: err.message().to_string(),
                    error_code: err.code().as_str().to_string(),
                    parameters: err.parameters().to_vec(),
                };
                (status, body)
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = ErrorResponse {
                    error: "Erreur interne".to_string(),
                    error_code: "internal_error".to_string(),
                    parameters: Vec::new(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                let body = ErrorResponse {
                    error: "Erreur de configuration".to_string(),
                    error_code: "config_error".to_string(),
                    parameters: Vec::new(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}
