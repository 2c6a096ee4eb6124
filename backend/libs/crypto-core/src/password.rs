/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password too weak: {0}")]
    Weak(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Hash a password with a fresh random salt.
///
/// Returns a PHC-formatted string safe for database storage. The strength
/// policy is enforced before hashing.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a password against its PHC hash.
///
/// `Ok(false)` means a clean mismatch; `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| PasswordError::Hash(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

/// Minimum 8 characters (max 128), at least one letter and one digit
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(PasswordError::Weak(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(PasswordError::Weak(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LEN
        )));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(PasswordError::Weak(
            "Password must contain at least one letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::Weak(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}
