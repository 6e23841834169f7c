//! Storage abstraction for CipherMail.
//!
//! The `MailStore` trait is the persistence collaborator used by the
//! messaging and account services. `SqliteStore` is the only backend.
//!
//! Stores hold ciphertext only; decryption happens in `crypto`, driven by
//! `messaging`.

pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use sqlite::SqliteStore;
pub use traits::MailStore;
pub use types::{Message, NewMessage, NewUser, User};
