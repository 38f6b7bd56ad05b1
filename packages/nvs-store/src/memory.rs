//! In-memory flash simulation.
//!
//! Namespaces outlive `close`, so reopening sees earlier writes the way a
//! flash partition would. Faults can be injected to exercise error paths.

use std::collections::BTreeMap;

use crate::{check_name, NvsError, NvsStore, StoredValue, DEFAULT_CAPACITY};

/// An in-memory [`NvsStore`] with partition-wide slot accounting.
///
/// # Example
///
/// ```rust
/// use calibkv_nvs_store::{MemoryNvs, NvsStore, StoredValue};
///
/// let mut nvs = MemoryNvs::with_capacity(8);
/// nvs.open("calib").unwrap();
/// nvs.put("offset", StoredValue::I32(-3)).unwrap();
/// nvs.close().unwrap();
///
/// nvs.open("calib").unwrap();
/// assert_eq!(nvs.get("offset").unwrap(), Some(StoredValue::I32(-3)));
/// assert_eq!(nvs.free_entries(), 7);
/// ```
#[derive(Debug)]
pub struct MemoryNvs {
    capacity: usize,
    namespaces: BTreeMap<String, Vec<(String, StoredValue)>>,
    current: Option<String>,
    fail_writes: bool,
    fail_mount: bool,
}

impl MemoryNvs {
    /// Create an empty store with the default partition size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty store with `capacity` entry slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            namespaces: BTreeMap::new(),
            current: None,
            fail_writes: false,
            fail_mount: false,
        }
    }

    /// Make every following mutation fail, as a worn or locked partition would.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every following `open` fail.
    pub fn fail_mount(&mut self, fail: bool) {
        self.fail_mount = fail;
    }

    /// The open namespace, if any.
    pub fn current_namespace(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Copy of a namespace's entries, open or not.
    pub fn snapshot(&self, namespace: &str) -> Option<Vec<(String, StoredValue)>> {
        self.namespaces.get(namespace).cloned()
    }

    fn used_slots(&self) -> usize {
        self.namespaces
            .values()
            .flat_map(|entries| entries.iter().map(|(_, v)| v.slots()))
            .sum()
    }

    fn entries(&self) -> Result<&Vec<(String, StoredValue)>, NvsError> {
        let name = self.current.as_ref().ok_or(NvsError::NotOpen)?;
        self.namespaces.get(name).ok_or(NvsError::NotOpen)
    }

    fn entries_mut(&mut self) -> Result<&mut Vec<(String, StoredValue)>, NvsError> {
        if self.fail_writes {
            return Err(NvsError::WriteRejected {
                message: "injected write failure".to_string(),
            });
        }
        let name = self.current.as_ref().ok_or(NvsError::NotOpen)?;
        self.namespaces.get_mut(name).ok_or(NvsError::NotOpen)
    }
}

impl Default for MemoryNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl NvsStore for MemoryNvs {
    fn open(&mut self, namespace: &str) -> Result<(), NvsError> {
        self.current = None;
        check_name(namespace)?;
        if self.fail_mount {
            return Err(NvsError::Unavailable {
                namespace: namespace.to_string(),
                message: "injected mount failure".to_string(),
            });
        }
        self.namespaces.entry(namespace.to_string()).or_default();
        self.current = Some(namespace.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<(), NvsError> {
        self.current = None;
        Ok(())
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), NvsError> {
        check_name(key)?;

        let existing = self
            .entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.slots())
            .unwrap_or(0);
        let needed = value.slots();
        if self.used_slots() - existing + needed > self.capacity {
            return Err(NvsError::Full {
                capacity: self.capacity,
            });
        }

        let entries = self.entries_mut()?;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key.to_string(), value)),
        }
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, NvsError> {
        Ok(self
            .entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn remove(&mut self, key: &str) -> Result<bool, NvsError> {
        let entries = self.entries_mut()?;
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        Ok(entries.len() != before)
    }

    fn clear(&mut self) -> Result<(), NvsError> {
        self.entries_mut()?.clear();
        Ok(())
    }

    fn keys(&mut self) -> Result<Vec<String>, NvsError> {
        Ok(self.entries()?.iter().map(|(k, _)| k.clone()).collect())
    }

    fn free_entries(&self) -> usize {
        self.capacity.saturating_sub(self.used_slots())
    }

    fn total_entries(&self) -> usize {
        self.capacity
    }
}
