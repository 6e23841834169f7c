//! Account registration and login.

use crate::crypto::{hash_password, verify_password};
use crate::error::{CipherMailError, Result};
use crate::storage::{MailStore, NewUser, User};

/// Hash checked when the username is unknown, so a failed login costs the
/// same Argon2 work whether or not the account exists.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$zUFK1xUSiIPDv2LL1KYNNQ$zrq0zvteYD0xdmddQlQaqUY3gJfVUNJcrk539AxMeIY";

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Strip surrounding whitespace and a single leading `@`.
///
/// Users address each other as `@name`; the store keys on `name`.
pub fn normalize_username(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

/// Validate a (normalized) username.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(CipherMailError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CipherMailError::InvalidInput(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if username.starts_with('@') || username.chars().any(char::is_whitespace) {
        return Err(CipherMailError::InvalidInput(
            "Username cannot contain whitespace or start with '@'".to_string(),
        ));
    }
    Ok(())
}

/// Account service over a borrowed store.
pub struct Accounts<'a, S: MailStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MailStore + ?Sized> Accounts<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed username or empty password
    /// - `UsernameTaken` if the username exists
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = normalize_username(username);
        validate_username(username)?;
        if password.is_empty() {
            return Err(CipherMailError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        if self.store.find_user_by_username(username)?.is_some() {
            return Err(CipherMailError::UsernameTaken(username.to_string()));
        }

        let user = self
            .store
            .insert_user(&NewUser::new(username, hash_password(password)?))?;
        tracing::info!(username, "account registered");
        Ok(user)
    }

    /// Authenticate a user.
    ///
    /// Unknown username and wrong password give the same error.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = normalize_username(username);
        let user = match self.store.find_user_by_username(username)? {
            Some(user) => user,
            None => {
                verify_password(password, DUMMY_PASSWORD_HASH)?;
                tracing::info!(username, "login failed");
                return Err(CipherMailError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(username, "login failed");
            return Err(CipherMailError::InvalidCredentials);
        }

        tracing::info!(username, "login succeeded");
        Ok(user)
    }
}
