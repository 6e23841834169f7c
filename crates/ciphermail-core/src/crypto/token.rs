//! Authenticated message tokens.
//!
//! A token is URL-safe base64 over:
//!
//! ```text
//! version (1) || created_at (8, big-endian unix seconds) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! The version byte and timestamp are bound to the ciphertext as associated
//! data, so none of the token can be altered without failing the tag check.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand_core::{OsRng, RngCore};
use thiserror::Error;

use super::key::derive_key;
use crate::error::{CipherMailError, Result};

/// Current token format version.
const TOKEN_VERSION: u8 = 0x01;

const TIMESTAMP_LEN: usize = 8;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Bytes covered by the associated data: version + timestamp.
const AAD_LEN: usize = 1 + TIMESTAMP_LEN;
const HEADER_LEN: usize = AAD_LEN + NONCE_LEN;

/// Current time as unsigned unix seconds; clocks before 1970 read as 0.
fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// Token could not be opened.
///
/// Wrong passphrase, truncation, tampering and malformed encoding all
/// produce this same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("decryption failed")]
pub struct DecryptError;

/// Encrypt a message under a passphrase, producing a self-contained token.
///
/// The empty string is valid plaintext. Each call uses a fresh random
/// nonce, so encrypting the same message twice gives different tokens.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String> {
    let key = derive_key(passphrase);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut header = [0u8; HEADER_LEN];
    header[0] = TOKEN_VERSION;
    header[1..AAD_LEN].copy_from_slice(&unix_now().to_be_bytes());
    OsRng
        .try_fill_bytes(&mut header[AAD_LEN..])
        .map_err(|e| CipherMailError::Crypto(format!("Nonce generation failed: {}", e)))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&header[AAD_LEN..]),
            Payload {
                msg: plaintext.as_bytes(),
                aad: &header[..AAD_LEN],
            },
        )
        .map_err(|e| CipherMailError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    token.extend_from_slice(&header);
    token.extend_from_slice(&ciphertext);

    Ok(URL_SAFE.encode(token))
}

/// Decrypt a token with a passphrase.
pub fn decrypt(token: &str, passphrase: &str) -> std::result::Result<String, DecryptError> {
    let raw = URL_SAFE.decode(token).map_err(|_| DecryptError)?;
    if raw.len() < HEADER_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
        return Err(DecryptError);
    }

    let key = derive_key(passphrase);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&raw[AAD_LEN..HEADER_LEN]),
            Payload {
                msg: &raw[HEADER_LEN..],
                aad: &raw[..AAD_LEN],
            },
        )
        .map_err(|_| DecryptError)?;

    String::from_utf8(plaintext).map_err(|_| DecryptError)
}
