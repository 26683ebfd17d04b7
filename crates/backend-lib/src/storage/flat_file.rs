// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file credential store: one JSON document per user.
//!
//! Layout under the root directory:
//! - `users/<sha256 of email key>.json`: committed records
//! - `staging/<uuid>.json`: records being written
//!
//! A record is fully written and synced in `staging/`, then hard-linked into
//! `users/`. The link either creates the final name or fails with
//! `AlreadyExists`, which makes the filesystem the uniqueness constraint.
//! Staged files older than `STAGING_GRACE` are left over from abandoned
//! creates and are removed when the store is opened.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::{fs as tokio_fs, io::AsyncWriteExt};
use uuid::Uuid;

use super::{CredentialRecord, EmailCase, StoreError, UserStore};

/// Age after which a staged record is treated as abandoned
pub const STAGING_GRACE: Duration = Duration::from_secs(10 * 60);

#[derive(Clone, Debug)]
pub struct FlatFileUserStore {
    root: PathBuf,
    email_case: EmailCase,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P, email_case: EmailCase) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("users"))?;
        std::fs::create_dir_all(root.join("staging"))?;
        sweep_staging(&root.join("staging"), SystemTime::now())?;
        Ok(Self { root, email_case })
    }

    fn record_path(&self, email: &str) -> PathBuf {
        let digest = Sha256::digest(self.email_case.key(email).as_bytes());
        self.root
            .join("users")
            .join(format!("{}.json", hex::encode(digest)))
    }

    async fn write_staged(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = tokio_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

/// Remove staged files last modified more than `STAGING_GRACE` before `now`
fn sweep_staging(staging: &Path, now: SystemTime) -> Result<(), StoreError> {
    for entry in std::fs::read_dir(staging)? {
        let path = entry?.path();
        let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat staged record");
                continue;
            },
        };
        let abandoned = now
            .duration_since(modified)
            .is_ok_and(|age| age > STAGING_GRACE);
        if abandoned {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed abandoned staged record"),
                Err(e) if e.kind() == ErrorKind::NotFound => {},
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove staged record");
                },
            }
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<CredentialRecord, StoreError> {
        let record = CredentialRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        let staged = self
            .root
            .join("staging")
            .join(format!("{}.json", record.id));
        let target = self.record_path(email);

        let committed = match Self::write_staged(&staged, &json).await {
            Ok(()) => tokio_fs::hard_link(&staged, &target).await.map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::Io(e)
                }
            }),
            Err(e) => Err(e),
        };

        if let Err(e) = tokio_fs::remove_file(&staged).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %staged.display(), error = %e, "failed to remove staged record");
            }
        }

        committed.map(|()| record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let content = match tokio_fs::read_to_string(self.record_path(email)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CredentialRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }
}
