//! Typed scalars as they sit in flash.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payload bytes one entry slot carries for a string.
const SLOT_PAYLOAD: usize = 32;

/// The type tag flash keeps next to every entry.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredType {
    I32,
    U64,
    F32,
    Str,
}

impl StoredType {
    /// Short tag, matching the flash entry header.
    pub fn tag(&self) -> &'static str {
        match self {
            StoredType::I32 => "i32",
            StoredType::U64 => "u64",
            StoredType::F32 => "f32",
            StoredType::Str => "str",
        }
    }
}

impl fmt::Display for StoredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A scalar value with its type.
///
/// Serialized with an explicit tag so a file-backed store keeps `1` and `1.0`
/// apart after a reload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum StoredValue {
    I32(i32),
    U64(u64),
    F32(#[serde(with = "float_repr")] f32),
    Str(String),
}

/// `f32` as a JSON number, or as `"nan"`, `"inf"` or `"-inf"` when it has no
/// number form. Plain serialization would write `null` and fail to read back.
mod float_repr {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f32, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_f32(*v)
        } else if v.is_nan() {
            s.serialize_str("nan")
        } else if v.is_sign_positive() {
            s.serialize_str("inf")
        } else {
            s.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Named(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Number(v) => Ok(v),
            Repr::Named(name) => match name.as_str() {
                "nan" => Ok(f32::NAN),
                "inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"a number, \"nan\", \"inf\" or \"-inf\"",
                )),
            },
        }
    }
}

impl StoredValue {
    pub fn stored_type(&self) -> StoredType {
        match self {
            StoredValue::I32(_) => StoredType::I32,
            StoredValue::U64(_) => StoredType::U64,
            StoredValue::F32(_) => StoredType::F32,
            StoredValue::Str(_) => StoredType::Str,
        }
    }

    /// Bytes the value occupies in its entry payload.
    pub fn encoded_len(&self) -> usize {
        match self {
            StoredValue::I32(_) | StoredValue::F32(_) => 4,
            StoredValue::U64(_) => 8,
            StoredValue::Str(s) => s.len(),
        }
    }

    /// Entry slots the value consumes: one header slot, plus payload slots
    /// for strings (terminator included).
    pub fn slots(&self) -> usize {
        match self {
            StoredValue::Str(s) => 1 + (s.len() + 1).div_ceil(SLOT_PAYLOAD),
            _ => 1,
        }
    }
}

impl From<i32> for StoredValue {
    fn from(v: i32) -> Self {
        StoredValue::I32(v)
    }
}

impl From<u64> for StoredValue {
    fn from(v: u64) -> Self {
        StoredValue::U64(v)
    }
}

impl From<f32> for StoredValue {
    fn from(v: f32) -> Self {
        StoredValue::F32(v)
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::Str(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::Str(v.to_string())
    }
}
