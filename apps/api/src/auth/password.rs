use anyhow::anyhow;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::errors::AppError;

/// Hashes a password with argon2id and a fresh random salt. Returns a PHC string.
/// Runs on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("password hashing failed: {e}"))
    })
    .await
    .map_err(|e| anyhow!("hashing task panicked: {e}"))?
    .map_err(AppError::Internal)
}

/// Checks a claimed password against a stored PHC string.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
        let parsed =
            PasswordHash::new(&stored_hash).map_err(|e| anyhow!("stored hash is invalid: {e}"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| anyhow!("verification task panicked: {e}"))?
    .map_err(AppError::Internal)
}
