//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Enrollment, EnrollmentInput, Student, StudentInput, StudentPatch, User};
use crate::error::AppError;
use crate::services::DashboardSummary;

use super::extract::{ApiJson, ApiPath};
use super::middleware::{session_token, Ctx};
use super::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

// =========================================================================
// Routers
// =========================================================================

/// Routes reachable without a session
pub fn public_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Routes that require a session
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
        .route("/dashboard", get(dashboard))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:student_id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/:student_id/enrollments", get(list_student_enrollments))
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route("/enrollments/:enrollment_id", get(get_enrollment))
        .route("/enrollments/:enrollment_id/validate", post(validate_enrollment))
        .route("/enrollments/:enrollment_id/cancel", post(cancel_enrollment))
}

// =========================================================================
// Authentication
// =========================================================================

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state.auth.login(&request.username, &request.password)?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user,
    }))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(token)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>, Ctx(context): Ctx) -> Result<Json<User>, AppError> {
    Ok(Json(state.auth.current_user(&context)?))
}

async fn dashboard(
    State(state): State<AppState>,
    Ctx(context): Ctx,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(state.dashboard.summary(&context)?))
}

// =========================================================================
// Students
// =========================================================================

async fn list_students(
    State(state): State<AppState>,
    Ctx(context): Ctx,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(state.students.list(&context)?))
}

async fn create_student(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiJson(request): ApiJson<StudentInput>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = state.students.create(&context, request)?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn get_student(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(student_id): ApiPath<u64>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.students.get(&context, student_id)?))
}

async fn update_student(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(student_id): ApiPath<u64>,
    ApiJson(request): ApiJson<StudentPatch>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.students.update(&context, student_id, request)?))
}

async fn delete_student(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(student_id): ApiPath<u64>,
) -> Result<StatusCode, AppError> {
    state.students.delete(&context, student_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_student_enrollments(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(student_id): ApiPath<u64>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(state.enrollments.list_for_student(&context, student_id)?))
}

// =========================================================================
// Enrollments
// =========================================================================

async fn list_enrollments(
    State(state): State<AppState>,
    Ctx(context): Ctx,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(state.enrollments.list(&context)?))
}

async fn create_enrollment(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiJson(request): ApiJson<EnrollmentInput>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = state.enrollments.enroll(&context, request)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn get_enrollment(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(enrollment_id): ApiPath<u64>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.enrollments.get(&context, enrollment_id)?))
}

async fn validate_enrollment(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(enrollment_id): ApiPath<u64>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.enrollments.validate(&context, enrollment_id)?))
}

async fn cancel_enrollment(
    State(state): State<AppState>,
    Ctx(context): Ctx,
    ApiPath(enrollment_id): ApiPath<u64>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(state.enrollments.cancel(&context, enrollment_id)?))
}
