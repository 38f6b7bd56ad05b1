//! Error types for the accessor layer.

use std::fmt;

use calibkv_cipher::CipherError;
use calibkv_nvs_store::{NvsError, StoredType};
use serde::{Deserialize, Serialize};

/// Errors at the accessor layer.
///
/// Storage and cipher failures are wrapped; everything else is about how the
/// accessor was called.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An operation needed an open namespace.
    #[error("no namespace open")]
    NotOpen,

    /// The backend could not mount a namespace.
    #[error("cannot open namespace '{namespace}': {source}")]
    Mount {
        namespace: String,
        #[source]
        source: NvsError,
    },

    /// Key is empty, too long, or has characters outside `[A-Za-z0-9_]`.
    #[error("invalid key '{key}'")]
    InvalidKey { key: String },

    #[error("value for '{key}' is {size} bytes, limit is {limit}")]
    ValueTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("invalid parameter: {message}")]
    InvalidParam { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Write(#[source] NvsError),

    #[error("read failed: {0}")]
    Read(#[source] NvsError),

    #[error("'{key}' holds {found}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: StoredType,
        found: StoredType,
    },

    #[error("out of storage: {0}")]
    Full(#[source] NvsError),

    #[error("encryption not enabled")]
    EncryptionDisabled,

    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("secret '{key}' is not valid base64")]
    SecretEncoding { key: String },
}

impl Error {
    /// Map the error to the coarse taxonomy kept in the last-error field.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotOpen | Error::Mount { .. } => ErrorKind::NotInitialized,
            Error::InvalidKey { .. }
            | Error::ValueTooLarge { .. }
            | Error::InvalidParam { .. }
            | Error::Json(_) => ErrorKind::InvalidParam,
            Error::Write(_) => ErrorKind::WriteError,
            Error::Read(_) | Error::TypeMismatch { .. } => ErrorKind::ReadError,
            Error::Full(_) => ErrorKind::MemoryError,
            Error::EncryptionDisabled | Error::Cipher(_) | Error::SecretEncoding { .. } => {
                ErrorKind::EncryptionError
            }
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidParam {
            message: message.into(),
        }
    }

    /// Classify a failed backend mutation.
    pub(crate) fn from_write(e: NvsError) -> Self {
        match e {
            NvsError::Full { .. } => Error::Full(e),
            NvsError::NotOpen => Error::NotOpen,
            e => Error::Write(e),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Outcome of the most recent fallible call, as kept by the accessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[default]
    Ok,
    NotInitialized,
    InvalidParam,
    WriteError,
    ReadError,
    MemoryError,
    EncryptionError,
}

impl ErrorKind {
    /// Numeric code used by older firmware (0 for success, negative otherwise).
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::Ok => 0,
            ErrorKind::NotInitialized => -1,
            ErrorKind::InvalidParam => -2,
            ErrorKind::WriteError => -3,
            ErrorKind::ReadError => -4,
            ErrorKind::MemoryError => -5,
            ErrorKind::EncryptionError => -6,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Ok => "No error",
            ErrorKind::NotInitialized => "Library not initialized",
            ErrorKind::InvalidParam => "Invalid parameter",
            ErrorKind::WriteError => "Write error",
            ErrorKind::ReadError => "Read error",
            ErrorKind::MemoryError => "Memory error",
            ErrorKind::EncryptionError => "Encryption error",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == ErrorKind::Ok
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<&Error> for ErrorKind {
    fn from(e: &Error) -> Self {
        e.kind()
    }
}
