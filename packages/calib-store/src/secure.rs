//! Encryption wired into the accessor.
//!
//! Plain `set`/`get` never encrypt. Callers either encrypt buffers themselves
//! or use the secret helpers, which store ciphertext as base64 strings.

use base64::prelude::*;
use calibkv_cipher::{Cipher, CipherMode};
use calibkv_nvs_store::NvsStore;

use crate::{CalibrationStore, DebugLevel, Error, Result};

impl<S: NvsStore> CalibrationStore<S> {
    /// Derive a key from `passphrase` using the configured cipher mode.
    pub fn enable_encryption(&mut self, passphrase: &str) -> Result<()> {
        let mode = self.config().cipher_mode;
        self.enable_encryption_with(passphrase, mode)
    }

    pub fn enable_encryption_with(&mut self, passphrase: &str, mode: CipherMode) -> Result<()> {
        let result = Cipher::new(passphrase, mode).map_err(Error::from);
        let cipher = self.track(result)?;
        self.cipher = Some(cipher);
        self.log(DebugLevel::Info, format_args!("Encryption enabled"));
        Ok(())
    }

    /// Forget the key. The key bytes are zeroed on drop.
    pub fn disable_encryption(&mut self) {
        if self.cipher.take().is_some() {
            self.log(DebugLevel::Info, format_args!("Encryption disabled"));
        }
    }

    pub fn is_encryption_enabled(&self) -> bool {
        self.cipher.is_some()
    }

    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let result = match &self.cipher {
            Some(cipher) => cipher.encrypt(plaintext).map_err(Error::from),
            None => Err(Error::EncryptionDisabled),
        };
        self.track(result)
    }

    pub fn decrypt(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let result = match &self.cipher {
            Some(cipher) => cipher.decrypt(ciphertext).map_err(Error::from),
            None => Err(Error::EncryptionDisabled),
        };
        self.track(result)
    }

    /// Encrypt `plaintext` and store it base64-encoded under `key`.
    pub fn set_secret(&mut self, key: &str, plaintext: &[u8]) -> Result<()> {
        let ciphertext = self.encrypt(plaintext)?;
        let encoded = BASE64_STANDARD.encode(ciphertext);
        self.set_str(key, &encoded)
    }

    /// Read back a value written by [`set_secret`](Self::set_secret).
    pub fn get_secret(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(encoded) = self.get_string(key, "")?.into_option() else {
            return Ok(None);
        };
        let result = BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(|_| Error::SecretEncoding {
                key: key.to_string(),
            });
        let ciphertext = self.track(result)?;
        self.decrypt(&ciphertext).map(Some)
    }
}
