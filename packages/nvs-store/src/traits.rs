//! The store capability consumed by the accessor.

use crate::{NvsError, StoredType, StoredValue};

/// A namespaced, typed key-value store backed by non-volatile memory.
///
/// Implementations own the storage engine: wear leveling, page layout and
/// write serialization are theirs. Callers open one namespace at a time and
/// every entry operation applies to it.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn NvsStore>`.
pub trait NvsStore: Send + Sync {
    /// Mount a namespace, creating it if needed. An already open namespace
    /// is closed first.
    fn open(&mut self, namespace: &str) -> Result<(), NvsError>;

    /// Flush and release the open namespace. No-op when nothing is open.
    fn close(&mut self) -> Result<(), NvsError>;

    /// Write a typed value, replacing any previous value and type.
    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), NvsError>;

    /// Read a value.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The key does not exist (not an error condition).
    /// * `Ok(Some(value))` - The value with its stored type.
    /// * `Err(NvsError)` - A storage failure occurred.
    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, NvsError>;

    /// Remove a key, returning whether it existed.
    fn remove(&mut self, key: &str) -> Result<bool, NvsError>;

    /// Remove every key in the open namespace.
    fn clear(&mut self) -> Result<(), NvsError>;

    /// Keys of the open namespace in the backend's enumeration order.
    fn keys(&mut self) -> Result<Vec<String>, NvsError>;

    /// Entry slots still available in the partition.
    fn free_entries(&self) -> usize;

    /// Entry slots in the partition, used or not.
    fn total_entries(&self) -> usize;

    /// Check for a key without decoding its value.
    fn is_key(&mut self, key: &str) -> Result<bool, NvsError> {
        Ok(self.get(key)?.is_some())
    }

    /// The stored type of a key, if present.
    fn entry_type(&mut self, key: &str) -> Result<Option<StoredType>, NvsError> {
        Ok(self.get(key)?.map(|v| v.stored_type()))
    }
}

// Blanket implementations for references and boxes

impl<T: NvsStore + ?Sized> NvsStore for &mut T {
    fn open(&mut self, namespace: &str) -> Result<(), NvsError> {
        (*self).open(namespace)
    }

    fn close(&mut self) -> Result<(), NvsError> {
        (*self).close()
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), NvsError> {
        (*self).put(key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, NvsError> {
        (*self).get(key)
    }

    fn remove(&mut self, key: &str) -> Result<bool, NvsError> {
        (*self).remove(key)
    }

    fn clear(&mut self) -> Result<(), NvsError> {
        (*self).clear()
    }

    fn keys(&mut self) -> Result<Vec<String>, NvsError> {
        (*self).keys()
    }

    fn free_entries(&self) -> usize {
        (**self).free_entries()
    }

    fn total_entries(&self) -> usize {
        (**self).total_entries()
    }

    fn is_key(&mut self, key: &str) -> Result<bool, NvsError> {
        (*self).is_key(key)
    }
}

impl<T: NvsStore + ?Sized> NvsStore for Box<T> {
    fn open(&mut self, namespace: &str) -> Result<(), NvsError> {
        self.as_mut().open(namespace)
    }

    fn close(&mut self) -> Result<(), NvsError> {
        self.as_mut().close()
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), NvsError> {
        self.as_mut().put(key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, NvsError> {
        self.as_mut().get(key)
    }

    fn remove(&mut self, key: &str) -> Result<bool, NvsError> {
        self.as_mut().remove(key)
    }

    fn clear(&mut self) -> Result<(), NvsError> {
        self.as_mut().clear()
    }

    fn keys(&mut self) -> Result<Vec<String>, NvsError> {
        self.as_mut().keys()
    }

    fn free_entries(&self) -> usize {
        self.as_ref().free_entries()
    }

    fn total_entries(&self) -> usize {
        self.as_ref().total_entries()
    }

    fn is_key(&mut self, key: &str) -> Result<bool, NvsError> {
        self.as_mut().is_key(key)
    }
}
