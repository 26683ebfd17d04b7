//! Unit tests for the HTTP error mapping
use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use credential_backend::{
    auth::{AuthError, HashingError, TokenError},
    error::AppError,
    storage::StoreError,
};
use credential_common::ErrorBody;

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::CredentialsExist.error_code(), "AUTH_001");
    assert_eq!(AppError::UnknownEmail.error_code(), "AUTH_002");
    assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_003");
    assert_eq!(
        AppError::Unauthenticated("x".to_string()).error_code(),
        "AUTH_004"
    );
    assert_eq!(AppError::InvalidInput("x".to_string()).error_code(), "VAL_001");
    assert_eq!(AppError::Internal("x".to_string()).error_code(), "INT_001");
}

#[test]
fn test_internal_failures_map_to_500() {
    let failures = [
        AuthError::Hashing(HashingError::Malformed("bad".to_string())),
        AuthError::Token(TokenError::Signing("no secret".to_string())),
        AuthError::Store(StoreError::Backend("down".to_string())),
    ];
    for failure in failures {
        assert_eq!(
            AppError::from(failure).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

#[tokio::test]
async fn test_error_body_shape() {
    let response = AppError::CredentialsExist.into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.error.code, "AUTH_001");
    assert_eq!(body.error.message, "Credentials already exist");
}
