//! Export and import extension trait.

use calibkv_store::{
    CalibrationStore, DebugLevel, Error, NvsStore, Result, StoredValue, TIMESTAMP_KEY,
    VERSION_KEY,
};
use serde_json::{Map, Value as JsonValue};

use crate::codec::{classify, encode_entries};

/// Flat JSON export and import for a calibration namespace.
///
/// Implemented for every [`CalibrationStore`]. Calls update the accessor's
/// last-error field like its own operations do.
///
/// # Example
///
/// ```rust
/// use calibkv_json::JsonPorter;
/// use calibkv_store::{CalibrationStore, MemoryNvs};
///
/// let mut store = CalibrationStore::new(MemoryNvs::new());
/// store.open("t1").unwrap();
/// store.set_i32("offset", 42).unwrap();
///
/// let json = store.export_json().unwrap();
/// assert_eq!(json, r#"{"offset":42}"#);
///
/// store.clear_all().unwrap();
/// assert_eq!(store.import_json(&json).unwrap(), 1);
/// assert_eq!(store.get_or("offset", 0), 42);
/// ```
pub trait JsonPorter {
    /// Every entry of the open namespace as a JSON object.
    ///
    /// NaN and infinite floats have no JSON form and are exported as `null`,
    /// which a later import skips. Each such key is logged at `Info`.
    fn export_value(&mut self) -> Result<Map<String, JsonValue>>;

    /// Import the scalar members of a JSON object.
    ///
    /// Returns how many entries were written. Non-scalar members are
    /// skipped. The first failing write aborts the import with that write's
    /// error, and members written before it stay written (or stay queued,
    /// inside a batch). Wrap the call in a batch and roll back on error to
    /// get all-or-nothing behavior.
    fn import_value(&mut self, value: JsonValue) -> Result<usize>;

    /// Parse `text` and import it.
    fn import_json(&mut self, text: &str) -> Result<usize>;

    /// Compact JSON text of [`export_value`](Self::export_value).
    fn export_json(&mut self) -> Result<String> {
        let map = self.export_value()?;
        Ok(JsonValue::Object(map).to_string())
    }

    /// Like [`export_json`](Self::export_json), without `_version` and
    /// `_timestamp`.
    fn export_json_excluding_metadata(&mut self) -> Result<String> {
        let mut map = self.export_value()?;
        map.remove(VERSION_KEY);
        map.remove(TIMESTAMP_KEY);
        Ok(JsonValue::Object(map).to_string())
    }
}

impl<S: NvsStore> JsonPorter for CalibrationStore<S> {
    fn export_value(&mut self) -> Result<Map<String, JsonValue>> {
        let entries = self.entries()?;
        let count = entries.len();
        for (key, value) in &entries {
            if matches!(value, StoredValue::F32(v) if !v.is_finite()) {
                self.log(
                    DebugLevel::Info,
                    format_args!("Exported {} as null: {:?} has no JSON form", key, value),
                );
            }
        }
        let map = encode_entries(entries);
        self.log(
            DebugLevel::Verbose,
            format_args!("Exported {} entries", count),
        );
        Ok(map)
    }

    fn import_json(&mut self, text: &str) -> Result<usize> {
        let parsed = serde_json::from_str::<JsonValue>(text).map_err(Error::from);
        let value = self.track(parsed)?;
        self.import_value(value)
    }

    fn import_value(&mut self, value: JsonValue) -> Result<usize> {
        let checked = match value {
            JsonValue::Object(_) if !self.is_open() => Err(Error::NotOpen),
            JsonValue::Object(map) => Ok(map),
            other => Err(Error::InvalidParam {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        };
        let map = self.track(checked)?;

        let mut written = 0;
        for (key, member) in &map {
            let Some(stored) = classify(key, member) else {
                self.log(
                    DebugLevel::Verbose,
                    format_args!("Skipped {} ({})", key, json_kind(member)),
                );
                continue;
            };
            self.set_value(key, stored)?;
            written += 1;
        }

        self.log(
            DebugLevel::Info,
            format_args!("Imported {} entries", written),
        );
        self.track(Ok(written))
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
