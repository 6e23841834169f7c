//! SQLite storage backend.
//!
//! Messages are already encrypted by the time they reach the store, so the
//! database file itself is plain SQLite. Every write is a single statement,
//! which keeps each operation atomic without explicit transactions.

mod row;

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{ffi, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{CipherMailError, Result};
use crate::storage::traits::MailStore;
use crate::storage::types::{Message, NewMessage, NewUser, User};

use row::{format_timestamp, MessageRow, UserRow, MESSAGE_COLUMNS, USER_COLUMNS};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        sender TEXT NOT NULL,
        recipient TEXT NOT NULL,
        ciphertext TEXT NOT NULL,
        created_at TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,

        FOREIGN KEY (recipient) REFERENCES users(username)
    );

    CREATE INDEX IF NOT EXISTS messages_inbox
    ON messages (recipient, read, created_at);
"#;

/// SQLite-backed mail store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories and
    /// schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CipherMailError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the connection, reporting any error SQLite raises on close.
    ///
    /// Dropping the store also closes it, silently.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| CipherMailError::Storage("SQLite connection poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| CipherMailError::from(e))?;
        tracing::debug!("closed sqlite store");
        Ok(())
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CipherMailError::Storage("SQLite connection poisoned".to_string()))
    }
}

fn has_extended_code(err: &rusqlite::Error, code: i32) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == code)
}

impl MailStore for SqliteStore {
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                [username],
                UserRow::from_row,
            )
            .optional()?;
        row.map(User::try_from).transpose()
    }

    fn insert_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.lock_conn()?;
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                &user.username,
                &user.password_hash,
                format_timestamp(&created_at),
            ),
        )
        .map_err(|e| {
            if has_extended_code(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) {
                CipherMailError::UsernameTaken(user.username.clone())
            } else {
                CipherMailError::from(e)
            }
        })?;

        Ok(User {
            id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            created_at,
        })
    }

    fn insert_message(&self, message: &NewMessage) -> Result<Uuid> {
        let conn = self.lock_conn()?;
        let id = Uuid::now_v7();

        conn.execute(
            "INSERT INTO messages (id, sender, recipient, ciphertext, created_at, read) VALUES (?, ?, ?, ?, ?, 0)",
            (
                id.to_string(),
                &message.sender,
                &message.recipient,
                &message.ciphertext,
                format_timestamp(&message.created_at),
            ),
        )
        .map_err(|e| {
            if has_extended_code(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                CipherMailError::RecipientNotFound(message.recipient.clone())
            } else {
                CipherMailError::from(e)
            }
        })?;

        Ok(id)
    }

    fn find_messages_by_recipient_unread(&self, username: &str) -> Result<Vec<Message>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM messages WHERE recipient = ? AND read = 0 ORDER BY created_at DESC, id DESC",
            MESSAGE_COLUMNS
        ))?;
        let rows = stmt.query_map([username], MessageRow::from_row)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(Message::try_from(row?)?);
        }
        Ok(messages)
    }

    fn find_message_by_id(&self, id: &Uuid) -> Result<Option<Message>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM messages WHERE id = ?", MESSAGE_COLUMNS),
                [id.to_string()],
                MessageRow::from_row,
            )
            .optional()?;
        row.map(Message::try_from).transpose()
    }

    fn mark_message_read(&self, id: &Uuid) -> Result<()> {
        let conn = self.lock_conn()?;
        // Only ever writes 1, so concurrent readers cannot undo each other.
        let changed = conn.execute("UPDATE messages SET read = 1 WHERE id = ?", [id.to_string()])?;
        if changed == 0 {
            return Err(CipherMailError::MessageNotFound(*id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn store_with_users(names: &[&str]) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        for name in names {
            store.insert_user(&NewUser::new(*name, "hash")).unwrap();
        }
        store
    }

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_insert_and_find_user() {
        let store = store_with_users(&["alice"]);

        let found = store.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.password_hash, "hash");

        assert!(store.find_user_by_username("Alice").unwrap().is_none());
        assert!(store.find_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = store_with_users(&["alice"]);
        let result = store.insert_user(&NewUser::new("alice", "other"));
        assert!(matches!(result, Err(CipherMailError::UsernameTaken(name)) if name == "alice"));
    }

    #[test]
    fn test_insert_message_round_trip() {
        let store = store_with_users(&["alice", "bob"]);
        let sent_at = at("2024-03-01T08:30:00.123456Z");

        let id = store
            .insert_message(&NewMessage::new("alice", "bob", "token").with_created_at(sent_at))
            .unwrap();
        let message = store.find_message_by_id(&id).unwrap().unwrap();

        assert_eq!(message.id, id);
        assert_eq!(message.sender, "alice");
        assert_eq!(message.recipient, "bob");
        assert_eq!(message.ciphertext, "token");
        assert_eq!(message.created_at, sent_at);
        assert!(!message.read);
    }

    #[test]
    fn test_message_to_unknown_recipient_rejected_by_schema() {
        let store = store_with_users(&["alice"]);
        let result = store.insert_message(&NewMessage::new("alice", "ghost", "token"));
        assert!(matches!(result, Err(CipherMailError::RecipientNotFound(_))));
        assert!(store.find_messages_by_recipient_unread("ghost").unwrap().is_empty());
    }

    #[test]
    fn test_unread_listing_filters_and_orders() {
        let store = store_with_users(&["alice", "bob", "carol"]);
        let base = at("2024-03-01T08:00:00Z");

        let oldest = store
            .insert_message(&NewMessage::new("alice", "bob", "1").with_created_at(base))
            .unwrap();
        let newest = store
            .insert_message(
                &NewMessage::new("carol", "bob", "3").with_created_at(base + Duration::hours(2)),
            )
            .unwrap();
        let middle = store
            .insert_message(
                &NewMessage::new("alice", "bob", "2").with_created_at(base + Duration::hours(1)),
            )
            .unwrap();
        store
            .insert_message(&NewMessage::new("bob", "carol", "x").with_created_at(base))
            .unwrap();

        let ids: Vec<Uuid> = store
            .find_messages_by_recipient_unread("bob")
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![newest, middle, oldest]);

        store.mark_message_read(&middle).unwrap();
        let ids: Vec<Uuid> = store
            .find_messages_by_recipient_unread("bob")
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![newest, oldest]);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let store = store_with_users(&["alice", "bob"]);
        let id = store
            .insert_message(&NewMessage::new("alice", "bob", "token"))
            .unwrap();

        store.mark_message_read(&id).unwrap();
        store.mark_message_read(&id).unwrap();

        assert!(store.find_message_by_id(&id).unwrap().unwrap().read);
    }

    #[test]
    fn test_mark_read_unknown_id() {
        let store = store_with_users(&[]);
        let id = Uuid::new_v4();
        let result = store.mark_message_read(&id);
        assert!(matches!(result, Err(CipherMailError::MessageNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_sender_need_not_be_registered() {
        let store = store_with_users(&["bob"]);
        let id = store
            .insert_message(&NewMessage::new("nobody", "bob", "token"))
            .unwrap();

        let unread = store.find_messages_by_recipient_unread("bob").unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, id);
        assert_eq!(unread[0].sender, "nobody");
    }

    #[test]
    fn test_close_in_memory_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.close().unwrap();
    }
}
