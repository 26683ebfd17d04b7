// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between credential clients and the server.
//! This module defines the request and response bodies of the auth API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a registered user
pub type UserId = Uuid;

/// Body of a signup or signin request
#[derive(Serialize, Deserialize, Clone)]
pub struct AuthRequest {
    /// Email address, the sole lookup key
    pub email: String,
    /// Plaintext password
    pub password: String,
}

impl AuthRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Hand-written so the password never lands in a log line.
impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed bearer token returned by signup and signin
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

/// Identity resolved from a verified token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Credential record id (the token subject)
    pub id: UserId,
    /// Registered email address
    pub email: String,
}

/// Error payload returned by the server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable code plus a human-readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
