use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use credential_common::{AccessToken, AuthRequest};
use metrics::counter;
use zeroize::Zeroizing;

use super::{hash_password, verify_password, AuthError, AuthService, HashingError, TokenIssuer};
use crate::metrics as keys;
use crate::storage::{StoreError, UserStore};
use crate::validation::validate_auth_request;

/// Signup and signin over a `UserStore`
pub struct DefaultAuth<S> {
    store: Arc<S>,
    tokens: TokenIssuer,
    unify_signin_errors: bool,
}

impl<S: UserStore> DefaultAuth<S> {
    pub fn new(store: Arc<S>, tokens: TokenIssuer) -> Self {
        Self {
            store,
            tokens,
            unify_signin_errors: false,
        }
    }

    /// Report unknown emails as `InvalidCredentials` so callers cannot probe
    /// which addresses are registered.
    #[must_use]
    pub fn with_unified_signin_errors(mut self, unify: bool) -> Self {
        self.unify_signin_errors = unify;
        self
    }

    fn issue_for(&self, id: uuid::Uuid, email: &str) -> Result<AccessToken, AuthError> {
        let token = self.tokens.issue(id, email)?;
        counter!(keys::TOKEN_ISSUED).increment(1);
        Ok(token)
    }
}

/// Hash checked when no record matches, so unknown emails cost a full verify
static ABSENT_RECORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("absent-record-placeholder").ok());

/// Run CPU-heavy hashing work off the async executor
async fn run_blocking<T, F>(work: F) -> Result<T, HashingError>
where
    F: FnOnce() -> Result<T, HashingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| HashingError::Failure(e.to_string()))?
}

#[async_trait]
impl<S: UserStore + 'static> AuthService for DefaultAuth<S> {
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    async fn signup(&self, request: AuthRequest) -> Result<AccessToken, AuthError> {
        validate_auth_request(&request)?;
        let AuthRequest { email, password } = request;

        let password = Zeroizing::new(password);
        let hash = run_blocking(move || hash_password(&password)).await?;

        let record = match self.store.create(&email, &hash).await {
            Ok(record) => record,
            Err(StoreError::DuplicateEmail) => {
                counter!(keys::SIGNUP_CONFLICT).increment(1);
                tracing::info!("signup rejected: email already registered");
                return Err(AuthError::CredentialsExist);
            },
            Err(e) => {
                tracing::error!(error = %e, "signup failed in store");
                return Err(AuthError::Store(e));
            },
        };

        let token = self.issue_for(record.id, &record.email)?;
        counter!(keys::SIGNUP_SUCCEEDED).increment(1);
        tracing::info!(user_id = %record.id, "signup succeeded");
        Ok(token)
    }

    #[tracing::instrument(skip_all, fields(email = %request.email))]
    async fn signin(&self, request: AuthRequest) -> Result<AccessToken, AuthError> {
        validate_auth_request(&request)?;
        let AuthRequest { email, password } = request;

        let password = Zeroizing::new(password);
        let Some(record) = self.store.find_by_email(&email).await.map_err(AuthError::Store)? else {
            let _ = run_blocking(move || match ABSENT_RECORD_HASH.as_deref() {
                Some(placeholder) => verify_password(placeholder, &password),
                None => Ok(false),
            })
            .await;
            counter!(keys::SIGNIN_REJECTED, "reason" => "unknown_email").increment(1);
            tracing::info!("signin rejected: unknown email");
            return Err(if self.unify_signin_errors {
                AuthError::InvalidCredentials
            } else {
                AuthError::UnknownEmail
            });
        };

        let stored = record.password_hash.clone();
        let matches = run_blocking(move || verify_password(&stored, &password)).await?;
        if !matches {
            counter!(keys::SIGNIN_REJECTED, "reason" => "wrong_password").increment(1);
            tracing::info!(user_id = %record.id, "signin rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_for(record.id, &record.email)?;
        counter!(keys::SIGNIN_SUCCEEDED).increment(1);
        tracing::info!(user_id = %record.id, "signin succeeded");
        Ok(token)
    }
}
