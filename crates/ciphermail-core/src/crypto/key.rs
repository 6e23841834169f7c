//! Message key derivation.
//!
//! Keys are derived from the passphrase alone with SHA-256. There is no
//! salt: sender and recipient share nothing but the passphrase, so the
//! derivation has to be reproducible from it. The cost is that a stolen
//! token can be attacked offline with a dictionary; strong passphrases are
//! the only defence.

use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

/// Length of derived key in bytes (ChaCha20-Poly1305 key size).
pub const KEY_LENGTH: usize = 32;

/// A symmetric key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a message key from a passphrase.
///
/// Any string is accepted, including the empty string. The same passphrase
/// always yields the same key.
pub fn derive_key(passphrase: &str) -> DerivedKey {
    let digest = Sha256::digest(passphrase.as_bytes());
    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&digest);
    DerivedKey { key }
}
