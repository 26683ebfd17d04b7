//! In-memory credential store.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use super::{CredentialRecord, EmailCase, StoreError, UserStore};

/// `DashMap`-backed store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, CredentialRecord>>,
    email_case: EmailCase,
}

impl MemoryUserStore {
    pub fn new(email_case: EmailCase) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            email_case,
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<CredentialRecord, StoreError> {
        // The entry guard holds the shard lock, so check and insert are one step.
        match self.users.entry(self.email_case.key(email)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let record = CredentialRecord {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(record.clone());
                Ok(record)
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self
            .users
            .get(&self.email_case.key(email))
            .map(|entry| entry.value().clone()))
    }
}
