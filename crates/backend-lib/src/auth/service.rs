use async_trait::async_trait;
use credential_common::{AccessToken, AuthRequest};
use thiserror::Error;

use super::{HashingError, TokenError};
use crate::storage::StoreError;
use crate::validation::ValidationError;

/// Outcomes of signup and signin other than success
#[derive(Error, Debug)]
pub enum AuthError {
    /// Signup hit an email that is already registered
    #[error("Credentials already exist")]
    CredentialsExist,

    /// Signin with an email nobody registered
    #[error("Email does not exist")]
    UnknownEmail,

    /// Signin with a wrong password
    #[error("Incorrect password")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(StoreError),
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and return a token for it
    async fn signup(&self, request: AuthRequest) -> Result<AccessToken, AuthError>;

    /// Authenticate an existing account and return a fresh token
    async fn signin(&self, request: AuthRequest) -> Result<AccessToken, AuthError>;
}
