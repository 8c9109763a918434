//! # Password Hashing
//!
//! Passwords are only ever stored as Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::errors::{StoreError, StoreResult};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reject passwords shorter than the minimum length
pub fn validate_password(password: &str) -> StoreResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(StoreError::Invalid(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| StoreError::HashingFailed)
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> StoreResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| StoreError::Internal("Stored hash is malformed".to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
