//! Message lifecycle: send, list unread, read.
//!
//! `Mailbox` encrypts on the way in and decrypts on the way out. The store
//! only ever sees tokens. A message becomes read only when its recipient
//! supplies the right passphrase; a failed attempt leaves no trace.

use uuid::Uuid;

use crate::crypto;
use crate::error::{CipherMailError, Result};
use crate::storage::{MailStore, Message, NewMessage};

/// Messaging service over a borrowed store.
pub struct Mailbox<'a, S: MailStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MailStore + ?Sized> Mailbox<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Encrypt `plaintext` under `passphrase` and deliver it to `recipient`.
    ///
    /// # Errors
    ///
    /// - `RecipientNotFound` if the recipient is not registered; nothing is stored
    /// - `Crypto` if encryption fails
    /// - storage errors from the underlying store
    pub fn send_message(
        &self,
        sender: &str,
        recipient: &str,
        plaintext: &str,
        passphrase: &str,
    ) -> Result<Uuid> {
        if self.store.find_user_by_username(recipient)?.is_none() {
            tracing::info!(sender, recipient, "send rejected: unknown recipient");
            return Err(CipherMailError::RecipientNotFound(recipient.to_string()));
        }

        let token = crypto::encrypt(plaintext, passphrase)?;
        let id = self
            .store
            .insert_message(&NewMessage::new(sender, recipient, token))?;

        tracing::info!(%id, sender, recipient, "message sent");
        Ok(id)
    }

    /// Unread messages addressed to `username`, newest first.
    pub fn list_unread(&self, username: &str) -> Result<Vec<Message>> {
        let messages = self.store.find_messages_by_recipient_unread(username)?;
        tracing::debug!(username, count = messages.len(), "listed unread messages");
        Ok(messages)
    }

    /// Decrypt a message and mark it read.
    ///
    /// Reading an already-read message with the right passphrase succeeds
    /// again. A wrong passphrase never changes the read flag.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if no message has this ID
    /// - `DecryptionFailed` for a wrong passphrase or corrupted token
    /// - storage errors from the underlying store
    pub fn read_message(&self, id: &Uuid, passphrase: &str) -> Result<String> {
        let message = self
            .store
            .find_message_by_id(id)?
            .ok_or(CipherMailError::MessageNotFound(*id))?;

        let plaintext = match crypto::decrypt(&message.ciphertext, passphrase) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                tracing::info!(%id, "decryption failed");
                return Err(err.into());
            }
        };

        self.store.mark_message_read(id)?;
        tracing::info!(%id, "message read");
        Ok(plaintext)
    }
}
