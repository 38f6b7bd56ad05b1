//! Key derivation.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CipherError, KEY_LEN, MIN_PASSPHRASE_LEN};

/// A 256-bit key derived from a passphrase.
///
/// The bytes are zeroed on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Derive a key as the SHA-256 digest of the passphrase bytes.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, CipherError> {
        if passphrase.len() < MIN_PASSPHRASE_LEN {
            return Err(CipherError::PassphraseTooShort {
                len: passphrase.len(),
                min: MIN_PASSPHRASE_LEN,
            });
        }

        let digest = Sha256::digest(passphrase.as_bytes());
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&digest);
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}
