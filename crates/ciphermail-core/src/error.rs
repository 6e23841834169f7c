//! Error types for CipherMail core operations.
//!
//! Errors fall into three groups: validation failures (unknown recipient,
//! unknown message, bad account input), crypto failures (a token that does
//! not open under the given passphrase) and storage failures. The first two
//! are expected during normal use and the CLI reports them without exiting.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for CipherMail operations.
pub type Result<T> = std::result::Result<T, CipherMailError>;

/// Core error type for CipherMail operations.
#[derive(Debug, Error)]
pub enum CipherMailError {
    /// Send was addressed to a username that is not registered
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// No message with this ID exists
    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    /// Registration with a username that already exists
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// Login failed (unknown user or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrong passphrase or corrupted token. Carries no detail.
    #[error("Decryption failed: wrong key or corrupted message")]
    DecryptionFailed,

    /// Encryption-side failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CipherMailError {
    /// Whether the caller can report this error and carry on.
    ///
    /// Validation and crypto failures are part of normal use. Storage
    /// failures mean the persistence layer is unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CipherMailError::RecipientNotFound(_)
                | CipherMailError::MessageNotFound(_)
                | CipherMailError::UsernameTaken(_)
                | CipherMailError::InvalidCredentials
                | CipherMailError::InvalidInput(_)
                | CipherMailError::DecryptionFailed
                | CipherMailError::Crypto(_)
        )
    }
}

impl From<crate::crypto::DecryptError> for CipherMailError {
    fn from(_: crate::crypto::DecryptError) -> Self {
        CipherMailError::DecryptionFailed
    }
}
