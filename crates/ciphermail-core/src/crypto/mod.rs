//! Cryptographic operations for CipherMail.
//!
//! - **key**: passphrase → 256-bit message key (SHA-256, no salt)
//! - **token**: ChaCha20-Poly1305 message tokens, URL-safe base64
//! - **password**: Argon2id hashing for account passwords
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading stored messages without the passphrase
//! - Undetected modification of stored messages
//!
//! We do NOT defend against:
//! - Offline dictionary attacks on weak message passphrases
//! - Key distribution (passphrases are shared out of band)
//! - Compromised OS / keylogger

pub mod key;
pub mod password;
pub mod token;

pub use key::{derive_key, DerivedKey, KEY_LENGTH};
pub use password::{hash_password, verify_password};
pub use token::{decrypt, encrypt, DecryptError};
