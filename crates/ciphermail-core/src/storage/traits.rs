//! Mail store trait definition.
//!
//! `MailStore` is everything the messaging and account services need from
//! persistence. The services borrow a store; they never open one.

use uuid::Uuid;

use super::types::{Message, NewMessage, NewUser, User};
use crate::error::Result;

/// Persistence interface for users and messages.
///
/// Implementations must ensure:
/// - Messages are never modified except for the `read` flag
/// - `read` never goes back to `false`
/// - Identifiers are assigned by the store
pub trait MailStore: Send + Sync {
    // --- User operations ---

    /// Look up a user by exact username.
    ///
    /// Returns `Ok(None)` if no such user exists.
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `CipherMailError::UsernameTaken` if the username exists.
    fn insert_user(&self, user: &NewUser) -> Result<User>;

    // --- Message operations ---

    /// Insert a new, unread message.
    ///
    /// # Returns
    ///
    /// Returns the UUID assigned to the message.
    fn insert_message(&self, message: &NewMessage) -> Result<Uuid>;

    /// List unread messages addressed to `username`, newest first.
    fn find_messages_by_recipient_unread(&self, username: &str) -> Result<Vec<Message>>;

    /// Get a message by ID.
    ///
    /// Returns `Ok(Some(message))` if found, `Ok(None)` if not found.
    fn find_message_by_id(&self, id: &Uuid) -> Result<Option<Message>>;

    /// Set the `read` flag on a message.
    ///
    /// Idempotent: marking a read message again succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `CipherMailError::MessageNotFound` if no message has this ID.
    fn mark_message_read(&self, id: &Uuid) -> Result<()>;
}
