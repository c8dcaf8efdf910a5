//! Business error taxonomy scenarios

use std::io;
use std::sync::Arc;

use scolarite::{BusinessError, BusinessErrorKind, Cause, ErrorCode};

#[test]
fn test_validation_scenario() {
    let err = BusinessError::validation("email", "format invalide");

    assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
    assert_eq!(err.message(), "Erreur de validation sur email: format invalide");
}

#[test]
fn test_authorization_scenario() {
    let err = BusinessError::authorization("delete", "etudiant#42");

    assert_eq!(err.code().as_str(), "AUTHORIZATION_ERROR");
    assert_eq!(
        err.message(),
        "Accès refusé pour l'action 'delete' sur 'etudiant#42'"
    );
}

#[test]
fn test_not_found_scenario() {
    let err = BusinessError::not_found("Etudiant", 42);

    assert_eq!(err.code().as_str(), "NOT_FOUND");
    assert_eq!(err.message(), "Etudiant avec l'ID '42' non trouvé");
}

#[test]
fn test_service_unavailable_scenario() {
    let io_failure: Cause = Arc::new(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
    let err = BusinessError::service_unavailable_with_cause("DatabaseService", io_failure.clone());

    assert_eq!(err.code().as_str(), "SERVICE_UNAVAILABLE");
    assert_eq!(
        err.message(),
        "Service 'DatabaseService' temporairement indisponible"
    );
    assert!(Arc::ptr_eq(err.cause().unwrap(), &io_failure));
}

#[test]
fn test_every_constructor_has_a_fixed_code() {
    let cases = [
        (BusinessError::validation("f", "m"), "VALIDATION_ERROR"),
        (BusinessError::validation_message("m"), "VALIDATION_ERROR"),
        (BusinessError::authentication("m"), "AUTH_ERROR"),
        (BusinessError::authorization("a", "r"), "AUTHORIZATION_ERROR"),
        (BusinessError::not_found("E", 1), "NOT_FOUND"),
        (BusinessError::not_found_message("m"), "NOT_FOUND"),
        (BusinessError::data_integrity("m"), "DATA_INTEGRITY"),
        (BusinessError::service_unavailable("S"), "SERVICE_UNAVAILABLE"),
    ];

    for (err, code) in cases {
        assert_eq!(err.code().as_str(), code);
        assert_eq!(err.code(), err.clone().code());
        assert!(!err.message().contains('{'), "unformatted message: {}", err.message());
    }
}

#[test]
fn test_callers_match_exhaustively_on_kind() {
    fn describe(err: &BusinessError) -> String {
        match err.kind() {
            BusinessErrorKind::Validation { field: Some(field) } => format!("field {}", field),
            BusinessErrorKind::Validation { field: None } => "form".to_string(),
            BusinessErrorKind::Authentication => "login".to_string(),
            BusinessErrorKind::Authorization { action, resource } => {
                format!("{} on {}", action, resource)
            }
            BusinessErrorKind::NotFound { entity_type, id } => {
                format!("{:?} {:?}", entity_type, id)
            }
            BusinessErrorKind::DataIntegrity => "integrity".to_string(),
            BusinessErrorKind::ServiceUnavailable { service_name } => service_name.clone(),
        }
    }

    assert_eq!(describe(&BusinessError::validation("email", "x")), "field email");
    assert_eq!(describe(&BusinessError::authorization("read", "etudiants")), "read on etudiants");
    assert_eq!(
        describe(&BusinessError::not_found("Inscription", 3)),
        "Some(\"Inscription\") Some(\"3\")"
    );
    assert_eq!(describe(&BusinessError::service_unavailable("Mail")), "Mail");
}

#[test]
fn test_error_is_shareable_across_threads() {
    let err = BusinessError::data_integrity("Doublon");
    let handle = std::thread::spawn(move || err.code());
    assert_eq!(handle.join().unwrap(), ErrorCode::DataIntegrity);
}
