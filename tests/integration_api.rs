//! API Integration Tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

mod common;

use common::{login, send, setup_app};

#[tokio::test]
async fn test_health() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_login_and_me() {
    let (app, _) = setup_app();
    let token = login(&app, "scolarite", "scol123").await;

    let (status, me) = send(&app, "GET", "/api/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "scolarite");
    assert_eq!(me["role"], "scolarite");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn test_bad_credentials_are_401() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "AUTH_ERROR");
    assert_eq!(body["error"], "Identifiants invalides");
}

#[tokio::test]
async fn test_missing_and_unknown_session() {
    let (app, _) = setup_app();

    let (status, body) = send(&app, "GET", "/api/v1/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "En-tête X-Session-Token manquant");

    let (status, body) = send(&app, "GET", "/api/v1/students", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Session invalide ou expirée");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let (app, _) = setup_app();
    let token = login(&app, "admin", "admin123").await;

    let (status, _) = send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_lifecycle_e2e() {
    let (app, _) = setup_app();
    let registrar = login(&app, "scolarite", "scol123").await;
    let director = login(&app, "direction", "dir123").await;

    // 1. Create a student
    let (status, student) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&registrar),
        Some(json!({
            "last_name": "Ba",
            "first_name": "Omar",
            "email": "omar.ba@etu.univ.example",
            "date_of_birth": "2003-11-02",
            "program": "Mathématiques",
            "level": "L1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "student creation failed: {}", student);
    let student_id = student["id"].as_u64().unwrap();

    // 2. Enroll for a year
    let (status, enrollment) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&registrar),
        Some(json!({ "student_id": student_id, "academic_year": "2025-2026" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "enrollment failed: {}", enrollment);
    assert_eq!(enrollment["status"], "pending");
    assert_eq!(enrollment["program"], "Mathématiques");
    let enrollment_id = enrollment["id"].as_u64().unwrap();

    // 3. Direction validates it
    let (status, enrollment) = send(
        &app,
        "POST",
        &format!("/api/v1/enrollments/{}/validate", enrollment_id),
        Some(&director),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(enrollment["status"], "validated");

    // 4. Deleting the student is now refused
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/students/{}", student_id),
        Some(&registrar),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "DATA_INTEGRITY");

    // 5. Enrollment list for the student
    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}/enrollments", student_id),
        Some(&director),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // 6. Dashboard reflects it
    let (status, summary) = send(&app, "GET", "/api/v1/dashboard", Some(&director), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["student_count"], 2);
    assert_eq!(summary["enrollments"]["validated"], 1);
}

#[tokio::test]
async fn test_validation_error_response() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&admin),
        Some(json!({
            "last_name": "Ba",
            "first_name": "Omar",
            "email": "omar.ba",
            "date_of_birth": "2003-11-02",
            "program": "Mathématiques",
            "level": "L1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Erreur de validation sur email: format invalide");
    assert_eq!(body["parameters"], json!(["email", "format invalide"]));
}

#[tokio::test]
async fn test_authorization_error_response() {
    let (app, _) = setup_app();
    let enseignant = login(&app, "enseignant", "prof123").await;

    let (status, body) = send(&app, "DELETE", "/api/v1/students/1", Some(&enseignant), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], "AUTHORIZATION_ERROR");
    assert_eq!(body["error"], "Accès refusé pour l'action 'delete' sur 'etudiant#1'");
}

#[tokio::test]
async fn test_not_found_response() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(&app, "GET", "/api/v1/students/42", Some(&admin), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");
    assert_eq!(body["error"], "Etudiant avec l'ID '42' non trouvé");
}

#[tokio::test]
async fn test_student_role_views() {
    let (app, _) = setup_app();
    let student = login(&app, "etudiant", "etudiant123").await;

    let (status, own) = send(&app, "GET", "/api/v1/students/1", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["last_name"], "Diop");

    let (status, _) = send(&app, "GET", "/api/v1/students", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, summary) = send(&app, "GET", "/api/v1/dashboard", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(summary.get("student_count").is_none());
}

#[tokio::test]
async fn test_closed_store_is_503() {
    let (app, state) = setup_app();
    let admin = login(&app, "admin", "admin123").await;
    state.store.close();

    let (status, body) = send(&app, "GET", "/api/v1/me", Some(&admin), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_code"], "SERVICE_UNAVAILABLE");
    assert_eq!(body["error"], "Service 'AuthService' temporairement indisponible");
}

#[tokio::test]
async fn test_missing_body_field_is_validation_error() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&admin),
        Some(json!({
            "last_name": "Ba",
            "first_name": "Omar",
            "email": "omar.ba@etu.univ.example",
            "date_of_birth": "2003-11-02",
            "program": "Mathématiques"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Corps de requête invalide: "), "{}", message);
    assert!(message.contains("level"), "{}", message);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_validation_error() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/enrollments")
        .header("X-Session-Token", &admin)
        .body(Body::from(r#"{"student_id":1,"academic_year":"2025-2026"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"],
        "Corps de requête invalide: en-tête Content-Type: application/json attendu"
    );
}

#[tokio::test]
async fn test_malformed_path_parameter_is_validation_error() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(&app, "GET", "/api/v1/students/abc", Some(&admin), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Paramètre d'URL invalide: "));
}

#[tokio::test]
async fn test_update_unknown_student_is_404_even_with_taken_email() {
    let (app, _) = setup_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/students/999",
        Some(&admin),
        Some(json!({ "email": "awa.diop@etu.univ.example" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Etudiant avec l'ID '999' non trouvé");
}
