//! NVS: Non-Volatile Storage Capability
//!
//! This is the narrow waist of the calibkv stack. Everything at this level is
//! a namespaced map of typed scalars - no key policy beyond what flash storage
//! itself imposes, no metadata, no encryption, no JSON shape.
//!
//! Use this layer for:
//! - Backing the typed accessor with a platform flash API
//! - Tests that need a store with injected failures
//! - Host-side tools persisting calibration data to a directory
//!
//! # Example
//!
//! ```rust
//! use calibkv_nvs_store::{MemoryNvs, NvsStore, StoredValue};
//!
//! let mut nvs = MemoryNvs::new();
//! nvs.open("calib").unwrap();
//! nvs.put("offset", StoredValue::I32(42)).unwrap();
//!
//! assert_eq!(nvs.get("offset").unwrap(), Some(StoredValue::I32(42)));
//! assert!(!nvs.is_key("missing").unwrap());
//! ```

mod error;
mod file;
mod memory;
mod traits;
mod value;

pub use error::NvsError;
pub use file::FileNvs;
pub use memory::MemoryNvs;
pub use traits::NvsStore;
pub use value::{StoredType, StoredValue};

/// Longest namespace or key name the flash layout can hold.
pub const MAX_NAME_LEN: usize = 15;

/// Entry slots in a default partition (four pages of 126 entries).
pub const DEFAULT_CAPACITY: usize = 504;

/// Check a namespace or key name against the flash name limit.
pub fn check_name(name: &str) -> Result<(), NvsError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(NvsError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
