//! Accessor configuration.

use calibkv_cipher::CipherMode;
use serde::{Deserialize, Serialize};

use crate::{DebugLevel, Result, MAX_VALUE_SIZE};

/// Namespace opened by [`CalibrationStore::open_default`](crate::CalibrationStore::open_default)
/// unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "calib";

/// Settings for a [`CalibrationStore`](crate::CalibrationStore).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use calibkv_store::{DebugLevel, StoreConfig};
///
/// let config = StoreConfig::from_json_str(r#"{"namespace": "imu", "debug_level": "info"}"#).unwrap();
/// assert_eq!(config.namespace, "imu");
/// assert_eq!(config.debug_level, DebugLevel::Info);
/// assert!(config.enforce_validation);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub namespace: String,
    pub debug_level: DebugLevel,
    /// Mode used by `enable_encryption`.
    pub cipher_mode: CipherMode,
    /// Check keys and value sizes on every call. When off, only the
    /// backend's own limits apply.
    pub enforce_validation: bool,
    pub max_value_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            debug_level: DebugLevel::None,
            cipher_mode: CipherMode::Authenticated,
            enforce_validation: true,
            max_value_size: MAX_VALUE_SIZE,
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
