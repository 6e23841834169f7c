//! CLI error types for structured error handling.
//!
//! Core errors are mapped here to messages and exit codes, so every command
//! fails the same way for the same cause.

use std::fmt;

use ciphermail_core::CipherMailError;

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Invalid input (clap uses this for usage errors too)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 2;

    /// Resource not found (recipient, message, config).
    pub const NOT_FOUND: i32 = 3;

    /// Authentication or decryption failed.
    pub const AUTH_FAILED: i32 = 4;
}

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (recipient, message, config)
    NotFound { message: String, hint: String },

    /// Login or decryption failed
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }

    /// Translate an expected core failure into a user-facing error.
    ///
    /// Returns `None` for storage failures, which stay as plain errors.
    pub fn from_core(err: &CipherMailError) -> Option<Self> {
        let mapped = match err {
            CipherMailError::RecipientNotFound(name) => CliError::not_found(
                format!("Failed to send: @{} is not a registered user.", name),
                "Check the recipient's username and try again.",
            ),
            CipherMailError::MessageNotFound(id) => CliError::not_found(
                format!("Message {} not found.", id),
                "Run `ciphermail inbox` to list your unread messages.",
            ),
            CipherMailError::DecryptionFailed => CliError::auth_failed_with_hint(
                "Decryption failed! Wrong key or corrupted message.",
                "Ask the sender for the key; the message stays unread.",
            ),
            CipherMailError::InvalidCredentials => {
                CliError::auth_failed("Access denied! Invalid credentials.")
            }
            CipherMailError::UsernameTaken(name) => CliError::invalid_input(format!(
                "Registration failed! Username @{} already exists.",
                name
            )),
            CipherMailError::InvalidInput(message) => CliError::invalid_input(message.clone()),
            _ => return None,
        };
        Some(mapped)
    }
}

/// Convert a core error into an `anyhow::Error`, preferring a `CliError`.
pub fn core_error(err: CipherMailError) -> anyhow::Error {
    match CliError::from_core(&err) {
        Some(cli) => cli.into(),
        None => err.into(),
    }
}
