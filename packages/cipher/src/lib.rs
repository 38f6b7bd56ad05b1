//! Passphrase-keyed encryption for calibration payloads.
//!
//! A 256-bit key is derived from a passphrase with SHA-256 and kept in memory
//! only, zeroed when the [`Cipher`] is dropped. Two modes are offered:
//!
//! - [`CipherMode::Authenticated`]: AES-256-GCM with a fresh random nonce per
//!   message. Output is `nonce || ciphertext || tag`.
//! - [`CipherMode::LegacyEcb`]: AES-256 applied to each padded 16-byte block on
//!   its own. Equal plaintexts give equal ciphertexts and nothing detects
//!   tampering. Only for reading data written by older firmware.
//!
//! # Example
//!
//! ```rust
//! use calibkv_cipher::{Cipher, CipherMode};
//!
//! let cipher = Cipher::new("a passphrase of some length", CipherMode::Authenticated).unwrap();
//! let sealed = cipher.encrypt(b"gyro bias").unwrap();
//! assert_eq!(cipher.decrypt(&sealed).unwrap(), b"gyro bias");
//! ```

mod cipher;
mod error;
mod key;
mod padding;

pub use cipher::{Cipher, CipherMode};
pub use error::CipherError;
pub use key::DerivedKey;
pub use padding::{pad, unpad};

/// AES block length in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Shortest passphrase accepted for key derivation, in bytes.
pub const MIN_PASSPHRASE_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM tag length in bytes.
pub const TAG_LEN: usize = 16;
