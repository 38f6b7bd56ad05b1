/// Errors from key derivation, encryption and decryption.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("passphrase too short: {len} bytes, need at least {min}")]
    PassphraseTooShort { len: usize, min: usize },

    #[error("ciphertext is empty")]
    EmptyCiphertext,

    #[error("ciphertext length {len} is not a multiple of the block size")]
    MisalignedCiphertext { len: usize },

    #[error("invalid padding length {value}")]
    InvalidPadding { value: u8 },

    #[error("ciphertext too short: {len} bytes")]
    Truncated { len: usize },

    #[error("authentication failed")]
    Authentication,
}
