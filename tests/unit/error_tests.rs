// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use backend_lib::auth::PolicyViolation;
use backend_lib::error::AppError;
use backend_lib::validation::ValidationError;
use betledger_common::ErrorResponse;

async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_app_error_display() {
    assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid credentials");
    assert_eq!(
        AppError::NotFound("Wette".to_string()).to_string(),
        "Not found: Wette"
    );
    assert!(AppError::Validation(ValidationError::MissingResult)
        .to_string()
        .contains("result is required"));
}

#[test]
fn test_error_codes_are_distinct() {
    let errors = [
        AppError::Validation(ValidationError::MissingCredentials),
        AppError::WeakPassword(vec![PolicyViolation::TooShort]),
        AppError::BreachedPassword,
        AppError::DuplicateEmail,
        AppError::InvalidCredentials,
        AppError::AccountLocked,
        AppError::Unauthenticated,
        AppError::NotFound("Wette".to_string()),
        AppError::Session("down".to_string()),
        AppError::Internal("down".to_string()),
    ];
    let mut codes: Vec<_> = errors.iter().map(AppError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[tokio::test]
async fn test_error_bodies() {
    let (status, body) = body_of(AppError::AccountLocked).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body.code, "AUTH_002");

    let (status, body) = body_of(AppError::Validation(ValidationError::MissingBetFields)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "Einsatz, Quote und Mannschaft sind erforderlich");

    let (status, body) = body_of(AppError::Session("redis unreachable".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.error.contains("redis"));
}
