//! Version and timestamp bookkeeping stored next to the calibration values.

use calibkv_nvs_store::{NvsStore, StoredValue};

use crate::{CalibrationStore, DebugLevel, Error, Result};

/// Reserved key holding the calibration format version.
pub const VERSION_KEY: &str = "_version";

/// Reserved key holding the time of the last calibration, in milliseconds.
pub const TIMESTAMP_KEY: &str = "_timestamp";

impl<S: NvsStore> CalibrationStore<S> {
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        self.set_str(VERSION_KEY, version)?;
        self.log(DebugLevel::Info, format_args!("Version set: {}", version));
        Ok(())
    }

    /// The stored version string, if any.
    pub fn version(&mut self) -> Result<Option<String>> {
        let fetched = self.get_string(VERSION_KEY, "")?;
        Ok(fetched.into_option())
    }

    /// True unless the namespace is open and stores exactly `current`.
    pub fn is_outdated(&mut self, current: &str) -> bool {
        match self.version() {
            Ok(Some(stored)) => stored != current,
            _ => true,
        }
    }

    /// Store a timestamp, or the clock's current time when `None`.
    ///
    /// Returns the value written.
    pub fn set_timestamp(&mut self, timestamp_ms: Option<u64>) -> Result<u64> {
        let timestamp = timestamp_ms.unwrap_or_else(|| self.now_ms());
        self.set(TIMESTAMP_KEY, timestamp)?;
        self.log(DebugLevel::Verbose, format_args!("Timestamp set: {}", timestamp));
        Ok(timestamp)
    }

    /// The stored timestamp.
    ///
    /// A non-negative `i32` is accepted as well, since an import of an older
    /// export may have stored a small timestamp that way.
    pub fn timestamp(&mut self) -> Result<Option<u64>> {
        let result = self.timestamp_inner();
        self.track(result)
    }

    fn timestamp_inner(&mut self) -> Result<Option<u64>> {
        match self.get_value(TIMESTAMP_KEY)? {
            None => Ok(None),
            Some(StoredValue::U64(ts)) => Ok(Some(ts)),
            Some(StoredValue::I32(ts)) if ts >= 0 => Ok(Some(ts as u64)),
            Some(other) => Err(Error::TypeMismatch {
                key: TIMESTAMP_KEY.to_string(),
                expected: calibkv_nvs_store::StoredType::U64,
                found: other.stored_type(),
            }),
        }
    }

    /// True when no timestamp is stored or it is older than `max_age_ms`.
    ///
    /// A timestamp ahead of the clock counts as fresh.
    pub fn is_expired(&mut self, max_age_ms: u64) -> bool {
        match self.timestamp() {
            Ok(Some(stored)) => self.now_ms().saturating_sub(stored) > max_age_ms,
            _ => true,
        }
    }
}
