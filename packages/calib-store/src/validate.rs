//! Key and value validation.

use calibkv_nvs_store::StoredValue;

/// Longest accepted key.
pub const MAX_KEY_LEN: usize = 15;

/// Largest accepted value payload in bytes.
pub const MAX_VALUE_SIZE: usize = 4096;

/// Check a key: 1 to 15 characters from `[A-Za-z0-9_]`.
///
/// # Examples
///
/// ```rust
/// use calibkv_store::validate_key;
///
/// assert!(validate_key("gyro_x"));
/// assert!(validate_key("_version"));
/// assert!(!validate_key(""));
/// assert!(!validate_key("gyro-x"));
/// assert!(!validate_key("a_key_that_is_far_too_long"));
/// ```
pub fn validate_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Check a value's payload against [`MAX_VALUE_SIZE`].
pub fn validate_value(value: &StoredValue) -> bool {
    validate_value_with_limit(value, MAX_VALUE_SIZE)
}

pub(crate) fn validate_value_with_limit(value: &StoredValue, limit: usize) -> bool {
    value.encoded_len() <= limit
}
