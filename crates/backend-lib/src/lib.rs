// ============================
// credential-backend/src/lib.rs
// ============================
//! Core functionality for the credential server: password hashing, user
//! storage, signed access tokens and the HTTP surface around them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod secrets;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, TokenIssuer};
use crate::config::{Settings, StorageBackend};
use crate::secrets::SecretProvider;
use crate::storage::{FlatFileUserStore, MemoryUserStore, StoreError, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Signup and signin
    pub auth: Arc<dyn AuthService>,
    /// Token verification for the identity guard
    pub tokens: TokenIssuer,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over `store`
    pub fn new<S: UserStore + 'static>(
        store: Arc<S>,
        secrets: Arc<dyn SecretProvider>,
        settings: &Settings,
    ) -> Self {
        let tokens = TokenIssuer::new(secrets, settings.auth.secret_name.clone());
        Self::with_token_issuer(store, tokens, settings)
    }

    /// Create a new application state with a preconfigured token issuer
    pub fn with_token_issuer<S: UserStore + 'static>(
        store: Arc<S>,
        tokens: TokenIssuer,
        settings: &Settings,
    ) -> Self {
        let auth = DefaultAuth::new(store, tokens.clone())
            .with_unified_signin_errors(settings.auth.unify_signin_errors);

        Self {
            auth: Arc::new(auth),
            tokens,
            settings: Arc::new(settings.clone()),
        }
    }

    /// Create the application state with the store selected in `settings`
    pub fn from_settings(
        settings: &Settings,
        secrets: Arc<dyn SecretProvider>,
    ) -> Result<Self, StoreError> {
        let email_case = settings.storage.email_case;
        let state = match settings.storage.backend {
            StorageBackend::Memory => {
                Self::new(Arc::new(MemoryUserStore::new(email_case)), secrets, settings)
            },
            StorageBackend::FlatFile => {
                let store = FlatFileUserStore::new(&settings.storage.path, email_case)?;
                Self::new(Arc::new(store), secrets, settings)
            },
        };
        Ok(state)
    }
}
