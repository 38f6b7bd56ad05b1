//! Error types for the NVS layer.
//!
//! Errors at this level are storage-focused. Accessor concerns like
//! "namespace not open in the accessor" or "type mismatch" belong higher up.

/// Errors raised by an [`NvsStore`](crate::NvsStore) backend.
#[derive(thiserror::Error, Debug)]
pub enum NvsError {
    /// A namespace or key name the backend cannot hold: empty, longer than
    /// the flash layout allows, or not usable as a file name.
    #[error("invalid name '{name}'")]
    InvalidName { name: String },

    /// An operation needed an open namespace.
    #[error("no namespace open")]
    NotOpen,

    /// The namespace could not be mounted.
    #[error("namespace '{namespace}' unavailable: {message}")]
    Unavailable { namespace: String, message: String },

    /// Every entry slot of the partition is in use.
    #[error("storage full: all {capacity} entries in use")]
    Full { capacity: usize },

    /// The backend rejected a write.
    #[error("write rejected: {message}")]
    WriteRejected { message: String },

    /// Persisted data could not be decoded.
    #[error("corrupt namespace data: {message}")]
    Corrupt { message: String },

    /// Filesystem failure in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NvsError {
    /// Whether the failure left the namespace unusable rather than one entry.
    pub fn is_mount_failure(&self) -> bool {
        matches!(
            self,
            NvsError::InvalidName { .. } | NvsError::Unavailable { .. } | NvsError::Corrupt { .. }
        )
    }
}
