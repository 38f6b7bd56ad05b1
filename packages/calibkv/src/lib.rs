//! calibkv: typed calibration values kept in non-volatile storage.
//!
//! The crates stack from the backend up:
//! - `calibkv-nvs-store`: the `NvsStore` backend trait, with memory and file backends
//! - `calibkv-cipher`: AES-256 over byte buffers
//! - `calibkv-store`: the typed `CalibrationStore` accessor
//! - `calibkv-json`: flat JSON export and import
//!
//! # Example
//!
//! ```rust
//! use calibkv::prelude::*;
//!
//! let mut store = CalibrationStore::new(MemoryNvs::new());
//! store.open("imu").unwrap();
//!
//! store.set_f32("gyro_bias", 0.02).unwrap();
//! store.set_version("2.1.0").unwrap();
//!
//! let json = store.export_json_excluding_metadata().unwrap();
//! assert_eq!(json, r#"{"gyro_bias":0.02}"#);
//! ```

pub use calibkv_cipher as cipher;
pub use calibkv_json as json;
pub use calibkv_nvs_store as nvs;
pub use calibkv_store as store;

pub use calibkv_json::JsonPorter;
pub use calibkv_store::{
    CalibrationStore, CipherMode, DebugLevel, Error, ErrorKind, Fetched, FileNvs, MemoryNvs,
    NvsStore, Result, StoreConfig, StoredType, StoredValue,
};

/// Everything needed for everyday use.
pub mod prelude {
    pub use calibkv_json::JsonPorter;
    pub use calibkv_store::{
        CalibrationStore, DebugLevel, ErrorKind, FileNvs, MemoryNvs, NvsStore, StoreConfig,
    };
}
