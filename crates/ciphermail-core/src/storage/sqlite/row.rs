//! Row types for database queries.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{CipherMailError, Result};
use crate::storage::types::{Message, User};

/// Column list matching [`MessageRow::from_row`].
pub const MESSAGE_COLUMNS: &str = "id, sender, recipient, ciphertext, created_at, read";

/// Column list matching [`UserRow::from_row`].
pub const USER_COLUMNS: &str = "id, username, password_hash, created_at";

/// Format a timestamp so that text order equals time order.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| CipherMailError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| CipherMailError::Storage(format!("Invalid {} UUID: {}", what, e)))
}

/// Raw row data from the messages table, before parsing into domain types.
#[derive(Debug)]
pub struct MessageRow {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub ciphertext: String,
    pub created_at: String,
    pub read: bool,
}

impl MessageRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender: row.get(1)?,
            recipient: row.get(2)?,
            ciphertext: row.get(3)?,
            created_at: row.get(4)?,
            read: row.get(5)?,
        })
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = CipherMailError;

    fn try_from(row: MessageRow) -> Result<Self> {
        Ok(Message {
            id: parse_uuid(&row.id, "message")?,
            sender: row.sender,
            recipient: row.recipient,
            ciphertext: row.ciphertext,
            created_at: parse_timestamp(&row.created_at)?,
            read: row.read,
        })
    }
}

/// Raw row data from the users table.
#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

impl UserRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = CipherMailError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_uuid(&row.id, "user")?,
            username: row.username,
            password_hash: row.password_hash,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
