//! Account password hashing.
//!
//! Account passwords never leave this process in the clear. They are stored
//! as Argon2id PHC strings with a random per-user salt, which is unrelated
//! to message keys (those must stay salt-free, see [`super::key`]).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

use crate::error::{CipherMailError, Result};

/// Hash an account password into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CipherMailError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is a
/// storage error, not a failed login.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| CipherMailError::Storage(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
