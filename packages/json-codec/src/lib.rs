//! JSON Export and Import for Calibration Stores
//!
//! This layer moves a whole namespace in and out of a flat JSON object:
//! - `JsonPorter`: `export_json` / `import_json` on any `CalibrationStore`
//! - `encode_value` / `classify`: the per-entry mapping both directions use
//!
//! Integers are stored as `i32` (the `_timestamp` entry as `u64`), other
//! numbers as `f32`, strings as strings. Objects, arrays, null and booleans
//! have no stored form and are skipped on import.
//!
//! # Example
//!
//! ```rust
//! use calibkv_json::JsonPorter;
//! use calibkv_store::{CalibrationStore, MemoryNvs};
//!
//! let mut store = CalibrationStore::new(MemoryNvs::new());
//! store.open("t1").unwrap();
//!
//! store.import_json(r#"{"offset": 42, "scale": 1.5, "note": {"ignored": true}}"#).unwrap();
//!
//! assert_eq!(store.get_or("offset", 0), 42);
//! assert_eq!(store.export_json().unwrap(), r#"{"offset":42,"scale":1.5}"#);
//! ```

mod codec;
mod porter;

pub use codec::{classify, encode_entries, encode_value};
pub use porter::JsonPorter;

// Re-export the accessor for convenience
pub use calibkv_store::{CalibrationStore, Error, Result};
