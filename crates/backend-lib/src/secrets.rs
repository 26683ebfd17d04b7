//! Signing secret lookup.
//!
//! Secrets are resolved by name on every call so a rotated value is picked
//! up by the next token operation without restarting anything.
use std::collections::HashMap;

use parking_lot::RwLock;
use zeroize::Zeroizing;

/// Source of named secret strings
pub trait SecretProvider: Send + Sync {
    /// Current value of the named secret, or `None` when unset or empty
    fn current(&self, name: &str) -> Option<Zeroizing<String>>;
}

/// Reads secrets from process environment variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn current(&self, name: &str) -> Option<Zeroizing<String>> {
        std::env::var(name)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Zeroizing::new)
    }
}

/// In-process secret table, rotatable at runtime
#[derive(Default)]
pub struct StaticSecretProvider {
    secrets: RwLock<HashMap<String, Zeroizing<String>>>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider holding a single secret
    pub fn with_secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set(name, value);
        provider
    }

    /// Insert or replace a secret
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets
            .write()
            .insert(name.into(), Zeroizing::new(value.into()));
    }

    pub fn remove(&self, name: &str) {
        self.secrets.write().remove(name);
    }
}

impl SecretProvider for StaticSecretProvider {
    fn current(&self, name: &str) -> Option<Zeroizing<String>> {
        self.secrets
            .read()
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}
