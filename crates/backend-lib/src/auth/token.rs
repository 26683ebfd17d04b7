// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, email, iat, exp}`. The signing secret
//! is looked up by name on every `issue` and `verify`, never cached.
//!
//! # Invariants
//! - `exp` is always `iat + TOKEN_TTL`.
//! - A token is accepted only while `now < exp` and its signature checks out
//!   against the secret current at verification time.
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use credential_common::{AccessToken, Principal};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::secrets::SecretProvider;

/// Validity window of every issued token
pub const TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Claims carried inside an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Credential record id
    pub sub: String,
    pub email: String,
    /// Issued at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl Claims {
    /// Resolve the claims into the principal they assert
    pub fn principal(&self) -> Result<Principal, TokenError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)?;
        Ok(Principal {
            id,
            email: self.email.clone(),
        })
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("signing secret {0} is unavailable")]
    SecretUnavailable(String),

    #[error("token has expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,
}

/// Builds, signs and verifies access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    secrets: Arc<dyn SecretProvider>,
    secret_name: String,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer reading `secret_name` from `secrets` on every call
    pub fn new(secrets: Arc<dyn SecretProvider>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sign a fresh token for the given subject
    pub fn issue(&self, subject: Uuid, email: &str) -> Result<AccessToken, TokenError> {
        let secret = self.secrets.current(&self.secret_name).ok_or_else(|| {
            TokenError::Signing(format!("secret {} is unavailable", self.secret_name))
        })?;

        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + ttl_secs(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(AccessToken {
            access_token: token,
        })
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self
            .secrets
            .current(&self.secret_name)
            .ok_or_else(|| TokenError::SecretUnavailable(self.secret_name.clone()))?;

        // Expiry is judged against our clock below, not the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        // `iat` is required by `Claims` deserialization.
        validation.set_required_spec_claims(&["sub", "exp"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(map_jwt_error)?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn ttl_secs() -> i64 {
    TOKEN_TTL.as_secs() as i64
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
