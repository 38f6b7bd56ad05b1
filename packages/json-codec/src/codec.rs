//! Conversion between stored entries and flat JSON.

use calibkv_store::{StoredValue, TIMESTAMP_KEY};
use serde_json::{Map, Number, Value as JsonValue};

/// Encode one stored value.
///
/// Floats use the shortest decimal that reads back as the same `f32`, so
/// `1.5f32` becomes `1.5` rather than its widened `f64` digits. Non-finite
/// floats have no JSON form and encode as `null`.
///
/// # Example
///
/// ```rust
/// use calibkv_json::encode_value;
/// use calibkv_store::StoredValue;
/// use serde_json::json;
///
/// assert_eq!(encode_value(&StoredValue::F32(0.1)), json!(0.1));
/// assert_eq!(encode_value(&StoredValue::F32(f32::NAN)), json!(null));
/// assert_eq!(encode_value(&StoredValue::I32(-3)), json!(-3));
/// ```
pub fn encode_value(value: &StoredValue) -> JsonValue {
    match value {
        StoredValue::I32(v) => JsonValue::from(*v),
        StoredValue::U64(v) => JsonValue::from(*v),
        StoredValue::F32(v) => encode_f32(*v),
        StoredValue::Str(s) => JsonValue::String(s.clone()),
    }
}

fn encode_f32(v: f32) -> JsonValue {
    // f32's Display is the shortest round-tripping form
    v.to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Encode entries into a flat JSON object, keeping their order.
pub fn encode_entries<I>(entries: I) -> Map<String, JsonValue>
where
    I: IntoIterator<Item = (String, StoredValue)>,
{
    entries
        .into_iter()
        .map(|(key, value)| {
            let json = encode_value(&value);
            (key, json)
        })
        .collect()
}

/// Decide what an imported JSON value is stored as.
///
/// Returns `None` for values that have no stored type (objects, arrays,
/// null and booleans).
pub fn classify(key: &str, value: &JsonValue) -> Option<StoredValue> {
    match value {
        JsonValue::String(s) => Some(StoredValue::Str(s.clone())),
        JsonValue::Number(n) => Some(classify_number(key, n)),
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn classify_number(key: &str, n: &Number) -> StoredValue {
    if key == TIMESTAMP_KEY {
        if let Some(ts) = n.as_u64() {
            return StoredValue::U64(ts);
        }
    }

    if let Some(v) = n.as_i64().and_then(|v| i32::try_from(v).ok()) {
        return StoredValue::I32(v);
    }

    // Everything else, including integers outside the i32 range
    StoredValue::F32(n.as_f64().unwrap_or(f64::NAN) as f32)
}
