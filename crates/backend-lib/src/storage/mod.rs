// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Credential storage abstraction with in-memory and flat-file implementations.
//!
//! Email uniqueness is enforced by each store inside `create`, never by a
//! separate lookup beforehand.
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use credential_common::{Principal, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod flat_file;
mod memory;

pub use flat_file::FlatFileUserStore;
pub use memory::MemoryUserStore;

/// Stored identity and password hash of one registered user
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Assigned by the store at creation
    pub id: UserId,
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Case-sensitivity policy for the email lookup key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCase {
    /// `A@x.com` and `a@x.com` are different accounts
    #[default]
    Sensitive,
    /// Lookups ignore ASCII and Unicode case; the stored email keeps its spelling
    Insensitive,
}

impl EmailCase {
    /// Key under which a record with this email is stored
    pub fn key(self, email: &str) -> String {
        match self {
            EmailCase::Sensitive => email.to_string(),
            EmailCase::Insensitive => email.to_lowercase(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Trait for credential storage backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new record, failing with `StoreError::DuplicateEmail` if the
    /// email is taken. All-or-nothing: on error no record exists.
    async fn create(&self, email: &str, password_hash: &str) -> Result<CredentialRecord, StoreError>;

    /// Look up a record by email. No side effects.
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError>;
}
