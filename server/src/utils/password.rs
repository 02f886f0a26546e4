//! Salted password hashing. bcrypt is CPU bound, so both directions run on
//! the blocking pool instead of a runtime worker.

use tokio::task;

use crate::utils::error::{AppError, AppResult};

pub async fn hash_password(plaintext: String, cost: u32) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|e| AppError::InternalServerError(format!("hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalServerError(format!("hashing failed: {e}")))
}

/// Returns `false` for a malformed stored hash rather than failing the
/// request, so a corrupt row reads as a credential mismatch.
pub async fn verify_password(plaintext: String, hash: String) -> AppResult<bool> {
    task::spawn_blocking(move || bcrypt::verify(plaintext, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::InternalServerError(format!("verification task failed: {e}")))
}
