//! # CipherMail Core
//!
//! Core library for CipherMail - a terminal messenger where message bodies
//! are encrypted with a passphrase the sender and recipient agree on out of
//! band.
//!
//! This crate provides the domain logic, storage abstraction and data models
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: passphrase key derivation, message tokens, password hashing
//! - **messaging**: send / list unread / read lifecycle
//! - **accounts**: registration and login
//! - **storage**: `MailStore` trait and the SQLite backend

pub mod accounts;
pub mod crypto;
pub mod error;
pub mod messaging;
pub mod storage;

pub use accounts::{normalize_username, Accounts};
pub use error::{CipherMailError, Result};
pub use messaging::Mailbox;
pub use storage::{MailStore, Message, SqliteStore, User};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
