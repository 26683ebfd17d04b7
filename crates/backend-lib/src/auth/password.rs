// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are PHC strings: algorithm, parameters and salt travel inside the
//! hash, so verification dispatches on the embedded algorithm identifier and
//! old hashes keep verifying after the default algorithm changes.
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use scrypt::Scrypt;
use thiserror::Error;

/// Failures of the hashing layer. A wrong password is not an error.
#[derive(Error, Debug)]
pub enum HashingError {
    #[error("malformed password hash: {0}")]
    Malformed(String),

    #[error("unsupported password hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("password hashing failed: {0}")]
    Failure(String),
}

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String, HashingError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| HashingError::Failure(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(false)` on mismatch. Errors only when the stored hash cannot
/// be parsed or names an algorithm this build does not know.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, HashingError> {
    let parsed = PasswordHash::new(hash).map_err(|e| HashingError::Malformed(e.to_string()))?;

    let outcome = match parsed.algorithm.as_str() {
        "argon2id" | "argon2i" | "argon2d" => {
            Argon2::default().verify_password(plain.as_bytes(), &parsed)
        },
        "scrypt" => Scrypt.verify_password(plain.as_bytes(), &parsed),
        other => return Err(HashingError::UnsupportedAlgorithm(other.to_string())),
    };

    match outcome {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashingError::Malformed(e.to_string())),
    }
}
