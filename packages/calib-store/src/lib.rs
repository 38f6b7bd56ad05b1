//! Calibration Store: Typed Accessor Layer
//!
//! This layer gives meaning to the raw entries of an NVS backend:
//! - `CalibrationStore`: typed `i32`/`f32`/string access in one namespace
//! - `ErrorKind`: the last-error field every fallible call updates
//! - Batches: buffered writes with commit and rollback
//! - Metadata: `_version` and `_timestamp` bookkeeping
//! - Encryption: AES-256 over caller buffers and base64 secrets
//!
//! # Example
//!
//! ```rust
//! use calibkv_store::{CalibrationStore, ErrorKind, MemoryNvs};
//!
//! let mut store = CalibrationStore::new(MemoryNvs::new());
//! store.open("motor").unwrap();
//!
//! store.set_version("1.0.0").unwrap();
//! store.set_i32("offset", 42).unwrap();
//!
//! assert!(!store.is_outdated("1.0.0"));
//! assert_eq!(store.get_or("offset", 0), 42);
//! assert_eq!(store.last_error(), ErrorKind::Ok);
//! ```

mod batch;
mod clock;
mod config;
mod diagnostics;
mod error;
mod metadata;
mod secure;
mod store;
mod validate;
mod value;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{StoreConfig, DEFAULT_NAMESPACE};
pub use diagnostics::{CaptureSink, DebugLevel, LogFacadeSink, LogSink};
pub use error::{Error, ErrorKind, Result};
pub use metadata::{TIMESTAMP_KEY, VERSION_KEY};
pub use store::CalibrationStore;
pub use validate::{validate_key, validate_value, MAX_KEY_LEN, MAX_VALUE_SIZE};
pub use value::{Fetched, Scalar};

// Re-export the layers below for convenience
pub use calibkv_cipher::{Cipher, CipherError, CipherMode};
pub use calibkv_nvs_store::{FileNvs, MemoryNvs, NvsError, NvsStore, StoredType, StoredValue};
