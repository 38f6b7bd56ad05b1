//! Typed access to stored scalars.

use calibkv_nvs_store::{StoredType, StoredValue};

/// A Rust type that maps onto exactly one stored type.
///
/// Implemented for the calibration types (`i32`, `f32`, `String`) and for
/// `u64`, the type of the timestamp entry.
pub trait Scalar: Sized {
    /// The stored type this Rust type reads from and writes to.
    const TYPE: StoredType;

    fn into_stored(self) -> StoredValue;

    /// Extract the value if `stored` has the matching type.
    fn from_stored(stored: StoredValue) -> Option<Self>;
}

impl Scalar for i32 {
    const TYPE: StoredType = StoredType::I32;

    fn into_stored(self) -> StoredValue {
        StoredValue::I32(self)
    }

    fn from_stored(stored: StoredValue) -> Option<Self> {
        match stored {
            StoredValue::I32(v) => Some(v),
            _ => None,
        }
    }
}

impl Scalar for f32 {
    const TYPE: StoredType = StoredType::F32;

    fn into_stored(self) -> StoredValue {
        StoredValue::F32(self)
    }

    fn from_stored(stored: StoredValue) -> Option<Self> {
        match stored {
            StoredValue::F32(v) => Some(v),
            _ => None,
        }
    }
}

impl Scalar for String {
    const TYPE: StoredType = StoredType::Str;

    fn into_stored(self) -> StoredValue {
        StoredValue::Str(self)
    }

    fn from_stored(stored: StoredValue) -> Option<Self> {
        match stored {
            StoredValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl Scalar for u64 {
    const TYPE: StoredType = StoredType::U64;

    fn into_stored(self) -> StoredValue {
        StoredValue::U64(self)
    }

    fn from_stored(stored: StoredValue) -> Option<Self> {
        match stored {
            StoredValue::U64(v) => Some(v),
            _ => None,
        }
    }
}

/// Result of a typed read: the value, or the caller's default when the key
/// is absent, plus whether the key was present.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<V> {
    pub value: V,
    pub present: bool,
}

impl<V> Fetched<V> {
    pub(crate) fn found(value: V) -> Self {
        Self {
            value,
            present: true,
        }
    }

    pub(crate) fn defaulted(value: V) -> Self {
        Self {
            value,
            present: false,
        }
    }

    pub fn into_value(self) -> V {
        self.value
    }

    /// `Some(value)` only when the key was present.
    pub fn into_option(self) -> Option<V> {
        self.present.then_some(self.value)
    }
}
