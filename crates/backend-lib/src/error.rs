// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use credential_common::{ErrorBody, ErrorDetail};
use thiserror::Error;

use crate::auth::{AuthError, TokenError};

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Credentials already exist")]
    CredentialsExist,

    #[error("Email does not exist")]
    UnknownEmail,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::CredentialsExist | AppError::UnknownEmail | AppError::InvalidCredentials => {
                StatusCode::FORBIDDEN
            },
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::CredentialsExist => "AUTH_001",
            AppError::UnknownEmail => "AUTH_002",
            AppError::InvalidCredentials => "AUTH_003",
            AppError::Unauthenticated(_) => "AUTH_004",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::CredentialsExist => "Credentials already exist".to_string(),
            AppError::UnknownEmail | AppError::InvalidCredentials => {
                "Authentication failed".to_string()
            },
            AppError::Unauthenticated(_) => "Unauthorized".to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialsExist => AppError::CredentialsExist,
            AuthError::UnknownEmail => AppError::UnknownEmail,
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Validation(e) => AppError::InvalidInput(e.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) | AuthError::Store(_) => {
                tracing::error!(error = %err, "auth request failed");
                AppError::Internal(err.to_string())
            },
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) | TokenError::SecretUnavailable(_) => {
                tracing::error!(error = %err, "token verification unavailable");
                AppError::Internal(err.to_string())
            },
            TokenError::Expired | TokenError::InvalidSignature | TokenError::Malformed => {
                AppError::Unauthenticated(err.to_string())
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
