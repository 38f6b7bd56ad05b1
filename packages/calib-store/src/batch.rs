//! Buffered writes.
//!
//! While a batch is open, mutations queue here instead of reaching the
//! backend. Reads look through the queue first, newest operation wins.

use calibkv_nvs_store::StoredValue;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PendingOp {
    Put(String, StoredValue),
    Remove(String),
    Clear,
}

#[derive(Debug, Default)]
pub(crate) struct Batch {
    ops: Vec<PendingOp>,
}

impl Batch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn into_ops(self) -> Vec<PendingOp> {
        self.ops
    }

    /// What the queue says about `key`.
    ///
    /// * `None` - untouched, ask the backend.
    /// * `Some(None)` - removed or cleared.
    /// * `Some(Some(value))` - written.
    pub(crate) fn lookup(&self, key: &str) -> Option<Option<&StoredValue>> {
        for op in self.ops.iter().rev() {
            match op {
                PendingOp::Put(k, v) if k == key => return Some(Some(v)),
                PendingOp::Remove(k) if k == key => return Some(None),
                PendingOp::Clear => return Some(None),
                _ => {}
            }
        }
        None
    }

    /// Apply the queue to a snapshot of backend entries.
    pub(crate) fn overlay(&self, mut entries: Vec<(String, StoredValue)>) -> Vec<(String, StoredValue)> {
        for op in &self.ops {
            match op {
                PendingOp::Put(key, value) => match entries.iter_mut().find(|(k, _)| k == key) {
                    Some(slot) => slot.1 = value.clone(),
                    None => entries.push((key.clone(), value.clone())),
                },
                PendingOp::Remove(key) => entries.retain(|(k, _)| k != key),
                PendingOp::Clear => entries.clear(),
            }
        }
        entries
    }
}
