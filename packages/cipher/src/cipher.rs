//! Block cipher modes.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{pad, unpad, CipherError, DerivedKey, BLOCK_SIZE, NONCE_LEN, TAG_LEN};

/// How payloads are encrypted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherMode {
    /// AES-256-GCM with a random nonce per message.
    #[default]
    Authenticated,
    /// Independent AES-256 blocks, no IV, no integrity check. Insecure.
    LegacyEcb,
}

/// A derived key bound to a mode.
#[derive(Debug, Clone)]
pub struct Cipher {
    key: DerivedKey,
    mode: CipherMode,
}

impl Cipher {
    /// Derive a key from `passphrase` and bind it to `mode`.
    pub fn new(passphrase: &str, mode: CipherMode) -> Result<Self, CipherError> {
        let key = DerivedKey::from_passphrase(passphrase)?;
        if mode == CipherMode::LegacyEcb {
            log::warn!("legacy block mode enabled: ciphertexts leak equal blocks");
        }
        Ok(Self { key, mode })
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.mode {
            CipherMode::Authenticated => self.seal(plaintext),
            CipherMode::LegacyEcb => Ok(self.encrypt_blocks(plaintext)),
        }
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.mode {
            CipherMode::Authenticated => self.open(ciphertext),
            CipherMode::LegacyEcb => self.decrypt_blocks(ciphertext),
        }
    }

    fn gcm(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.key.as_bytes()))
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self
            .gcm()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CipherError::Authentication)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Truncated {
                len: ciphertext.len(),
            });
        }
        let (nonce, sealed) = ciphertext.split_at(NONCE_LEN);

        self.gcm()
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Authentication)
    }

    fn encrypt_blocks(&self, plaintext: &[u8]) -> Vec<u8> {
        let aes = Aes256::new(GenericArray::from_slice(self.key.as_bytes()));
        let mut data = pad(plaintext);
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            aes.encrypt_block(GenericArray::from_mut_slice(chunk));
        }
        data
    }

    fn decrypt_blocks(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if ciphertext.is_empty() {
            return Err(CipherError::EmptyCiphertext);
        }
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::MisalignedCiphertext {
                len: ciphertext.len(),
            });
        }

        let aes = Aes256::new(GenericArray::from_slice(self.key.as_bytes()));
        let mut data = ciphertext.to_vec();
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            aes.decrypt_block(GenericArray::from_mut_slice(chunk));
        }
        unpad(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str = "calibration-secret-42";

    fn legacy() -> Cipher {
        Cipher::new(PASSPHRASE, CipherMode::LegacyEcb).unwrap()
    }

    fn authenticated() -> Cipher {
        Cipher::new(PASSPHRASE, CipherMode::Authenticated).unwrap()
    }

    #[test]
    fn legacy_roundtrip_every_length() {
        let cipher = legacy();
        for len in 0..=1024usize {
            let data: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
            let encrypted = cipher.encrypt(&data).unwrap();
            assert_eq!(encrypted.len() % BLOCK_SIZE, 0);
            assert!(encrypted.len() > data.len());
            assert_eq!(cipher.decrypt(&encrypted).unwrap(), data, "length {}", len);
        }
    }

    #[test]
    fn authenticated_roundtrip_every_length() {
        let cipher = authenticated();
        for len in 0..=1024usize {
            let data: Vec<u8> = (0..len).map(|i| (i * 13 % 256) as u8).collect();
            let encrypted = cipher.encrypt(&data).unwrap();
            assert_eq!(encrypted.len(), NONCE_LEN + len + TAG_LEN);
            assert_eq!(cipher.decrypt(&encrypted).unwrap(), data, "length {}", len);
        }
    }

    #[test]
    fn legacy_mode_leaks_equal_plaintexts() {
        let cipher = legacy();
        let block = [0x5au8; 32];

        assert_eq!(cipher.encrypt(&block).unwrap(), cipher.encrypt(&block).unwrap());

        // Repeated blocks inside one message encrypt identically too
        let encrypted = cipher.encrypt(&block).unwrap();
        assert_eq!(encrypted[..16], encrypted[16..32]);
    }

    #[test]
    fn authenticated_mode_uses_fresh_nonces() {
        let cipher = authenticated();
        let block = [0x5au8; 32];
        assert_ne!(cipher.encrypt(&block).unwrap(), cipher.encrypt(&block).unwrap());
    }

    #[test]
    fn legacy_rejects_misaligned_and_empty() {
        let cipher = legacy();
        assert_eq!(
            cipher.decrypt(&[0u8; 15]).unwrap_err(),
            CipherError::MisalignedCiphertext { len: 15 }
        );
        assert_eq!(cipher.decrypt(&[]).unwrap_err(), CipherError::EmptyCiphertext);
    }

    #[test]
    fn legacy_rejects_bad_padding() {
        let cipher = legacy();
        let aes = Aes256::new(GenericArray::from_slice(cipher.key.as_bytes()));

        // A block whose plaintext ends in 0xff decrypts to an invalid pad
        let mut block = [0u8; 16];
        block[15] = 0xff;
        aes.encrypt_block(GenericArray::from_mut_slice(&mut block));

        assert_eq!(
            cipher.decrypt(&block).unwrap_err(),
            CipherError::InvalidPadding { value: 0xff }
        );
    }

    #[test]
    fn authenticated_detects_tampering() {
        let cipher = authenticated();
        let mut sealed = cipher.encrypt(b"offset=42").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert_eq!(cipher.decrypt(&sealed).unwrap_err(), CipherError::Authentication);

        assert_eq!(
            cipher.decrypt(&[0u8; 27]).unwrap_err(),
            CipherError::Truncated { len: 27 }
        );
    }

    #[test]
    fn wrong_key_does_not_decrypt() {
        let sealed = authenticated().encrypt(b"secret").unwrap();
        let other = Cipher::new("another passphrase!!", CipherMode::Authenticated).unwrap();
        assert!(other.decrypt(&sealed).is_err());
    }

    #[test]
    fn mode_parses_from_config_names() {
        let mode: CipherMode = serde_json::from_str("\"legacy_ecb\"").unwrap();
        assert_eq!(mode, CipherMode::LegacyEcb);
        assert_eq!(CipherMode::default(), CipherMode::Authenticated);
    }
}
