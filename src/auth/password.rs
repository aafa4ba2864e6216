use crate::error::AppError;
use bcrypt::{hash, verify};
use validator::ValidationError;

// bcrypt cost 12 lands in the ~100ms range on current commodity hardware.
const HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

/// Rejects any plaintext containing the case-insensitive substring "password".
/// Runs as part of payload validation, before the plaintext ever reaches
/// `hash_password`.
pub fn forbid_password_substring(value: &str) -> Result<(), ValidationError> {
    if value.to_lowercase().contains("password") {
        let mut error = ValidationError::new("password_content");
        error.message = Some("must not contain \"password\"".into());
        return Err(error);
    }
    Ok(())
}
