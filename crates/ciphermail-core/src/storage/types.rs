//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Login name, also the address other users send to
    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When this account was created
    pub created_at: DateTime<Utc>,
}

/// A stored message.
///
/// Everything except `read` is fixed at creation. `read` only ever goes
/// from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier assigned by the store
    pub id: Uuid,

    /// Username of the sender
    pub sender: String,

    /// Username of the recipient
    pub recipient: String,

    /// Encrypted token; opaque to everything outside `crypto`
    pub ciphertext: String,

    /// When this message was sent
    pub created_at: DateTime<Utc>,

    /// Whether the recipient has decrypted it
    pub read: bool,
}

/// Builder for creating new users.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Builder for creating new messages. New messages are always unread.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender: String,
    pub recipient: String,
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        ciphertext: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            ciphertext: ciphertext.into(),
            created_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
