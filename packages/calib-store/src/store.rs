//! The typed accessor over an [`NvsStore`].

use calibkv_cipher::Cipher;
use calibkv_nvs_store::{NvsStore, StoredValue};

use crate::batch::{Batch, PendingOp};
use crate::diagnostics::Logger;
use crate::validate::validate_value_with_limit;
use crate::{
    validate_key, Clock, DebugLevel, Error, ErrorKind, Fetched, LogSink, MonotonicClock, Result,
    Scalar, StoreConfig,
};

/// Typed calibration values in one open namespace of an NVS backend.
///
/// Every fallible call returns a [`Result`] and also records its outcome in
/// [`last_error`](CalibrationStore::last_error), which always reflects the
/// most recent fallible call only.
///
/// # Example
///
/// ```rust
/// use calibkv_nvs_store::MemoryNvs;
/// use calibkv_store::CalibrationStore;
///
/// let mut store = CalibrationStore::new(MemoryNvs::new());
/// store.open("imu").unwrap();
///
/// store.set_i32("offset", 42).unwrap();
/// store.set_f32("scale", 1.5).unwrap();
///
/// assert_eq!(store.get_i32("offset", 0).unwrap().value, 42);
///
/// let missing = store.get_f32("gain", 1.0).unwrap();
/// assert_eq!(missing.value, 1.0);
/// assert!(!missing.present);
/// ```
pub struct CalibrationStore<S> {
    nvs: S,
    config: StoreConfig,
    namespace: Option<String>,
    logger: Logger,
    clock: Box<dyn Clock>,
    pub(crate) cipher: Option<Cipher>,
    batch: Option<Batch>,
    last_error: ErrorKind,
}

impl<S: NvsStore> CalibrationStore<S> {
    pub fn new(nvs: S) -> Self {
        Self::with_config(nvs, StoreConfig::default())
    }

    pub fn with_config(nvs: S, config: StoreConfig) -> Self {
        Self {
            nvs,
            logger: Logger::new(config.debug_level),
            config,
            namespace: None,
            clock: Box::new(MonotonicClock::new()),
            cipher: None,
            batch: None,
            last_error: ErrorKind::Ok,
        }
    }

    /// Replace the uptime clock used for timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn nvs(&self) -> &S {
        &self.nvs
    }

    /// Direct backend access. Bypasses batches and validation.
    pub fn nvs_mut(&mut self) -> &mut S {
        &mut self.nvs
    }

    pub fn into_inner(self) -> S {
        self.nvs
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.namespace.is_some()
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // === Diagnostics ===

    pub fn last_error(&self) -> ErrorKind {
        self.last_error
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.logger.level()
    }

    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.logger.set_level(level);
    }

    pub fn set_log_sink(&mut self, sink: impl LogSink + 'static) {
        self.logger.set_sink(Box::new(sink));
    }

    /// Emit a line through the level filter and the current sink.
    pub fn log(&mut self, level: DebugLevel, args: std::fmt::Arguments<'_>) {
        self.logger.log(level, args);
    }

    /// Record the outcome of a fallible call in the last-error field.
    ///
    /// Public so extension crates layering operations on the accessor keep
    /// the field accurate.
    pub fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = ErrorKind::Ok,
            Err(e) => {
                let kind = e.kind();
                self.last_error = kind;
                self.logger
                    .log(DebugLevel::Error, format_args!("Error: {}", kind));
                self.logger.log(DebugLevel::Verbose, format_args!("{}", e));
            }
        }
        result
    }

    // === Validation ===

    pub fn validate_key(&self, key: &str) -> bool {
        validate_key(key)
    }

    /// Check a value against the configured size limit.
    pub fn validate_value(&self, value: &StoredValue) -> bool {
        validate_value_with_limit(value, self.config.max_value_size)
    }

    fn check_key(&self, key: &str) -> Result<()> {
        if self.config.enforce_validation && !validate_key(key) {
            return Err(Error::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn check_value(&self, key: &str, value: &StoredValue) -> Result<()> {
        if self.config.enforce_validation && !self.validate_value(value) {
            return Err(Error::ValueTooLarge {
                key: key.to_string(),
                size: value.encoded_len(),
                limit: self.config.max_value_size,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.namespace.is_none() {
            return Err(Error::NotOpen);
        }
        Ok(())
    }

    // === Namespace lifecycle ===

    /// Open a namespace, closing the current one first.
    pub fn open(&mut self, namespace: &str) -> Result<()> {
        let result = self.open_inner(namespace);
        self.track(result)
    }

    /// Open the namespace named in the configuration.
    pub fn open_default(&mut self) -> Result<()> {
        let namespace = self.config.namespace.clone();
        self.open(&namespace)
    }

    fn open_inner(&mut self, namespace: &str) -> Result<()> {
        if namespace.is_empty() {
            return Err(Error::invalid("namespace name is empty"));
        }

        if self.namespace.is_some() {
            if let Err(e) = self.close_inner() {
                self.log(
                    DebugLevel::Error,
                    format_args!("Closing previous namespace failed: {}", e),
                );
            }
        }

        self.nvs.open(namespace).map_err(|source| Error::Mount {
            namespace: namespace.to_string(),
            source,
        })?;
        self.namespace = Some(namespace.to_string());

        self.log(
            DebugLevel::Info,
            format_args!("Initialized with namespace: {}", namespace),
        );
        Ok(())
    }

    /// Flush and release the namespace. No-op when nothing is open.
    ///
    /// An uncommitted batch is discarded.
    pub fn close(&mut self) -> Result<()> {
        if self.namespace.is_none() {
            return Ok(());
        }
        let result = self.close_inner();
        self.track(result)
    }

    fn close_inner(&mut self) -> Result<()> {
        if let Some(batch) = self.batch.take() {
            self.log(
                DebugLevel::Info,
                format_args!("Batch discarded on close: {} pending operations", batch.len()),
            );
        }
        let Some(namespace) = self.namespace.take() else {
            return Ok(());
        };
        self.nvs.close().map_err(Error::Write)?;
        self.log(DebugLevel::Verbose, format_args!("Closed namespace: {}", namespace));
        Ok(())
    }

    // === Writes ===

    pub fn set<V: Scalar>(&mut self, key: &str, value: V) -> Result<()> {
        self.set_value(key, value.into_stored())
    }

    pub fn set_i32(&mut self, key: &str, value: i32) -> Result<()> {
        self.set(key, value)
    }

    pub fn set_f32(&mut self, key: &str, value: f32) -> Result<()> {
        self.set(key, value)
    }

    pub fn set_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, value.to_string())
    }

    /// Write an already typed value.
    pub fn set_value(&mut self, key: &str, value: StoredValue) -> Result<()> {
        let result = self.set_inner(key, value);
        self.track(result)
    }

    fn set_inner(&mut self, key: &str, value: StoredValue) -> Result<()> {
        self.ensure_open()?;
        self.check_key(key)?;
        self.check_value(key, &value)?;

        self.log(
            DebugLevel::Verbose,
            format_args!("Set {} ({})", key, value.stored_type()),
        );

        if let Some(batch) = self.batch.as_mut() {
            batch.push(PendingOp::Put(key.to_string(), value));
            return Ok(());
        }
        self.nvs.put(key, value).map_err(Error::from_write)
    }

    /// Remove a key, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let result = self.remove_inner(key);
        self.track(result)
    }

    fn remove_inner(&mut self, key: &str) -> Result<bool> {
        self.ensure_open()?;
        self.check_key(key)?;

        if self.batch.is_some() {
            let existed = self.read(key)?.is_some();
            if let Some(batch) = self.batch.as_mut() {
                batch.push(PendingOp::Remove(key.to_string()));
            }
            return Ok(existed);
        }
        self.nvs.remove(key).map_err(Error::from_write)
    }

    /// Remove every key in the namespace, metadata included.
    pub fn clear_all(&mut self) -> Result<()> {
        let result = self.clear_inner();
        self.track(result)
    }

    fn clear_inner(&mut self) -> Result<()> {
        self.ensure_open()?;
        if let Some(batch) = self.batch.as_mut() {
            batch.push(PendingOp::Clear);
            return Ok(());
        }
        self.nvs.clear().map_err(Error::from_write)?;
        self.log(DebugLevel::Info, format_args!("Cleared all values"));
        Ok(())
    }

    // === Reads ===

    /// Read a typed value, falling back to `default` when the key is absent.
    ///
    /// Absence is not an error: check [`Fetched::present`]. A key holding a
    /// different type fails with [`Error::TypeMismatch`].
    pub fn get<V: Scalar>(&mut self, key: &str, default: V) -> Result<Fetched<V>> {
        let result = self.get_inner(key, default);
        self.track(result)
    }

    pub fn get_i32(&mut self, key: &str, default: i32) -> Result<Fetched<i32>> {
        self.get(key, default)
    }

    pub fn get_f32(&mut self, key: &str, default: f32) -> Result<Fetched<f32>> {
        self.get(key, default)
    }

    pub fn get_string(&mut self, key: &str, default: &str) -> Result<Fetched<String>> {
        self.get(key, default.to_string())
    }

    /// Read a typed value, returning `default` on absence and on any failure.
    pub fn get_or<V: Scalar + Clone>(&mut self, key: &str, default: V) -> V {
        match self.get(key, default.clone()) {
            Ok(fetched) => fetched.value,
            Err(_) => default,
        }
    }

    fn get_inner<V: Scalar>(&mut self, key: &str, default: V) -> Result<Fetched<V>> {
        match self.read(key)? {
            None => Ok(Fetched::defaulted(default)),
            Some(stored) => {
                let found = stored.stored_type();
                V::from_stored(stored)
                    .map(Fetched::found)
                    .ok_or_else(|| Error::TypeMismatch {
                        key: key.to_string(),
                        expected: V::TYPE,
                        found,
                    })
            }
        }
    }

    /// Read a value with whatever type it was stored as.
    pub fn get_value(&mut self, key: &str) -> Result<Option<StoredValue>> {
        let result = self.read(key);
        self.track(result)
    }

    pub fn exists(&mut self, key: &str) -> Result<bool> {
        let result = self.read(key).map(|v| v.is_some());
        self.track(result)
    }

    fn read(&mut self, key: &str) -> Result<Option<StoredValue>> {
        self.ensure_open()?;
        self.check_key(key)?;

        if let Some(hit) = self.batch.as_ref().and_then(|b| b.lookup(key)) {
            return Ok(hit.cloned());
        }
        self.nvs.get(key).map_err(Error::Read)
    }

    /// Every entry of the namespace in backend order, pending batch
    /// operations applied.
    pub fn entries(&mut self) -> Result<Vec<(String, StoredValue)>> {
        let result = self.entries_inner();
        self.track(result)
    }

    fn entries_inner(&mut self) -> Result<Vec<(String, StoredValue)>> {
        self.ensure_open()?;

        let mut entries = Vec::new();
        for key in self.nvs.keys().map_err(Error::Read)? {
            if let Some(value) = self.nvs.get(&key).map_err(Error::Read)? {
                entries.push((key, value));
            }
        }

        Ok(match &self.batch {
            Some(batch) => batch.overlay(entries),
            None => entries,
        })
    }

    // === Space ===

    /// Free entry slots reported by the backend; 0 when not open.
    pub fn free_space(&self) -> usize {
        if self.is_open() {
            self.nvs.free_entries()
        } else {
            0
        }
    }

    /// Entry slots in use: backend capacity minus free slots; 0 when not open.
    pub fn used_space(&self) -> usize {
        if self.is_open() {
            self.nvs
                .total_entries()
                .saturating_sub(self.nvs.free_entries())
        } else {
            0
        }
    }

    // === Batches ===

    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    /// Start buffering writes until [`batch_commit`](Self::batch_commit) or
    /// [`batch_rollback`](Self::batch_rollback).
    pub fn batch_begin(&mut self) -> Result<()> {
        let result = self.batch_begin_inner();
        self.track(result)
    }

    fn batch_begin_inner(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.batch.is_some() {
            return Err(Error::invalid("batch already in progress"));
        }
        self.batch = Some(Batch::new());
        self.log(DebugLevel::Info, format_args!("Batch operation started"));
        Ok(())
    }

    /// Apply buffered operations in order.
    ///
    /// The first backend failure stops the commit; operations applied before
    /// it stay applied.
    pub fn batch_commit(&mut self) -> Result<()> {
        let result = self.batch_commit_inner();
        self.track(result)
    }

    fn batch_commit_inner(&mut self) -> Result<()> {
        self.ensure_open()?;
        let batch = self
            .batch
            .take()
            .ok_or_else(|| Error::invalid("no batch in progress"))?;

        let ops = batch.into_ops();
        let count = ops.len();
        for op in ops {
            match op {
                PendingOp::Put(key, value) => self.nvs.put(&key, value),
                PendingOp::Remove(key) => self.nvs.remove(&key).map(|_| ()),
                PendingOp::Clear => self.nvs.clear(),
            }
            .map_err(Error::from_write)?;
        }

        self.log(
            DebugLevel::Info,
            format_args!("Batch operation committed: {} operations", count),
        );
        Ok(())
    }

    /// Drop buffered operations. Nothing reached the backend.
    pub fn batch_rollback(&mut self) -> Result<()> {
        let result = self.batch_rollback_inner();
        self.track(result)
    }

    fn batch_rollback_inner(&mut self) -> Result<()> {
        self.ensure_open()?;
        let batch = self
            .batch
            .take()
            .ok_or_else(|| Error::invalid("no batch in progress"))?;
        self.log(
            DebugLevel::Info,
            format_args!("Batch operation rolled back: {} operations", batch.len()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaptureSink;
    use calibkv_nvs_store::{MemoryNvs, NvsError, StoredType};

    fn open_store() -> CalibrationStore<MemoryNvs> {
        let mut store = CalibrationStore::new(MemoryNvs::new());
        store.open("t1").unwrap();
        store
    }

    #[test]
    fn set_get_each_type() {
        let mut store = open_store();

        store.set_i32("offset", -42).unwrap();
        store.set_f32("scale", 0.1).unwrap();
        store.set_str("name", "left wheel").unwrap();

        assert_eq!(store.get_i32("offset", 0).unwrap(), Fetched::found(-42));
        assert_eq!(
            store.get_f32("scale", 0.0).unwrap().value.to_bits(),
            0.1f32.to_bits()
        );
        assert_eq!(
            store.get_string("name", "").unwrap().value,
            "left wheel".to_string()
        );
    }

    #[test]
    fn extremes_roundtrip_exactly() {
        let mut store = open_store();
        for v in [i32::MIN, -1, 0, 1, i32::MAX] {
            store.set_i32("v", v).unwrap();
            assert_eq!(store.get_i32("v", 7).unwrap().value, v);
        }
        for v in [f32::MIN_POSITIVE, -0.0, 3.4028235e38, 1.0e-10] {
            store.set_f32("f", v).unwrap();
            assert_eq!(store.get_f32("f", 7.0).unwrap().value.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn absent_key_gives_default_without_error() {
        let mut store = open_store();
        store.set_i32("other", 1).unwrap();

        let fetched = store.get_i32("missing", 99).unwrap();
        assert_eq!(fetched.value, 99);
        assert!(!fetched.present);
        assert_eq!(store.last_error(), ErrorKind::Ok);

        assert_eq!(store.get_string("missing", "dflt").unwrap().value, "dflt");
    }

    #[test]
    fn not_open_fails_everything() {
        let mut store = CalibrationStore::new(MemoryNvs::new());

        assert!(matches!(store.set_i32("a", 1), Err(Error::NotOpen)));
        assert_eq!(store.last_error(), ErrorKind::NotInitialized);
        assert!(matches!(store.get_i32("a", 5), Err(Error::NotOpen)));
        assert_eq!(store.get_or("a", 5), 5);
        assert!(store.exists("a").is_err());
        assert!(store.remove("a").is_err());
        assert!(store.clear_all().is_err());
        assert!(store.entries().is_err());
        assert!(store.batch_begin().is_err());
        assert_eq!(store.free_space(), 0);
        assert_eq!(store.used_space(), 0);
    }

    #[test]
    fn last_error_tracks_latest_call() {
        let mut store = open_store();

        assert!(store.set_i32("bad-key", 1).is_err());
        assert_eq!(store.last_error(), ErrorKind::InvalidParam);

        store.set_i32("good_key", 1).unwrap();
        assert_eq!(store.last_error(), ErrorKind::Ok);
    }

    #[test]
    fn validation_is_uniform() {
        let mut store = open_store();
        let long = "x".repeat(16);

        assert!(matches!(store.set_i32(&long, 1), Err(Error::InvalidKey { .. })));
        assert!(matches!(store.get_i32("a b", 0), Err(Error::InvalidKey { .. })));
        assert!(matches!(store.exists(""), Err(Error::InvalidKey { .. })));
        assert!(matches!(store.remove("é"), Err(Error::InvalidKey { .. })));

        let big = "x".repeat(4097);
        assert!(matches!(
            store.set_str("blob", &big),
            Err(Error::ValueTooLarge { size: 4097, .. })
        ));
    }

    #[test]
    fn validation_can_be_relaxed() {
        let config = StoreConfig {
            enforce_validation: false,
            ..StoreConfig::default()
        };
        let mut store = CalibrationStore::with_config(MemoryNvs::new(), config);
        store.open("t1").unwrap();

        // The backend accepts any short name
        store.set_i32("a-b", 1).unwrap();
        assert_eq!(store.get_i32("a-b", 0).unwrap().value, 1);

        // but still enforces its own length limit
        let err = store.set_i32(&"x".repeat(16), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteError);
    }

    #[test]
    fn type_mismatch_is_read_error() {
        let mut store = open_store();
        store.set_f32("scale", 1.5).unwrap();

        let err = store.get_i32("scale", 0).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: StoredType::I32,
                found: StoredType::F32,
                ..
            }
        ));
        assert_eq!(store.last_error(), ErrorKind::ReadError);
        assert_eq!(store.get_or("scale", 3), 3);
    }

    #[test]
    fn overwrite_changes_type() {
        let mut store = open_store();
        store.set_i32("v", 1).unwrap();
        store.set_str("v", "one").unwrap();
        assert_eq!(store.get_value("v").unwrap(), Some(StoredValue::from("one")));
    }

    #[test]
    fn exists_remove_clear() {
        let mut store = open_store();
        store.set_i32("a", 1).unwrap();
        store.set_i32("b", 2).unwrap();

        assert!(store.exists("a").unwrap());
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert!(!store.exists("a").unwrap());

        store.clear_all().unwrap();
        assert!(!store.exists("b").unwrap());
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn reopening_switches_namespace() {
        let mut store = open_store();
        store.set_i32("a", 1).unwrap();

        store.open("t2").unwrap();
        assert_eq!(store.namespace(), Some("t2"));
        assert!(!store.exists("a").unwrap());

        store.open("t1").unwrap();
        assert!(store.exists("a").unwrap());
    }

    #[test]
    fn open_failures() {
        let mut store = CalibrationStore::new(MemoryNvs::new());

        assert!(matches!(store.open(""), Err(Error::InvalidParam { .. })));
        assert_eq!(store.last_error(), ErrorKind::InvalidParam);

        let err = store.open("name_longer_than_15").unwrap_err();
        assert!(matches!(err, Error::Mount { .. }));
        assert_eq!(store.last_error(), ErrorKind::NotInitialized);
        assert!(!store.is_open());

        store.nvs_mut().fail_mount(true);
        assert!(store.open("calib").is_err());
        assert!(!store.is_open());
    }

    #[test]
    fn failed_open_leaves_nothing_open() {
        let mut store = open_store();
        store.nvs_mut().fail_mount(true);

        assert!(store.open("t2").is_err());
        assert!(!store.is_open());
        assert!(matches!(store.get_i32("a", 0), Err(Error::NotOpen)));
    }

    #[test]
    fn open_default_uses_config() {
        let mut store = CalibrationStore::new(MemoryNvs::new());
        store.open_default().unwrap();
        assert_eq!(store.namespace(), Some("calib"));
    }

    #[test]
    fn close_is_idempotent() {
        let mut store = open_store();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_open());
        assert_eq!(store.nvs().current_namespace(), None);
    }

    #[test]
    fn backend_write_failure() {
        let mut store = open_store();
        store.nvs_mut().fail_writes(true);

        let err = store.set_i32("a", 1).unwrap_err();
        assert!(matches!(err, Error::Write(NvsError::WriteRejected { .. })));
        assert_eq!(store.last_error(), ErrorKind::WriteError);
    }

    #[test]
    fn full_backend_is_memory_error() {
        let mut store = CalibrationStore::new(MemoryNvs::with_capacity(1));
        store.open("t1").unwrap();
        store.set_i32("a", 1).unwrap();

        assert!(matches!(store.set_i32("b", 2), Err(Error::Full(_))));
        assert_eq!(store.last_error(), ErrorKind::MemoryError);
    }

    #[test]
    fn space_accounting() {
        let mut store = CalibrationStore::new(MemoryNvs::with_capacity(10));
        store.open("t1").unwrap();
        assert_eq!(store.free_space(), 10);
        assert_eq!(store.used_space(), 0);

        store.set_i32("a", 1).unwrap();
        store.set_i32("b", 2).unwrap();
        assert_eq!(store.free_space(), 8);
        assert_eq!(store.used_space(), 2);
    }

    #[test]
    fn batch_commit_applies() {
        let mut store = open_store();
        store.set_i32("keep", 1).unwrap();

        store.batch_begin().unwrap();
        store.set_i32("a", 10).unwrap();
        store.set_str("b", "x").unwrap();
        assert!(store.remove("keep").unwrap());

        // Nothing reached the backend yet
        assert!(store.nvs_mut().get("a").unwrap().is_none());
        // but reads see the pending state
        assert_eq!(store.get_i32("a", 0).unwrap().value, 10);
        assert!(!store.exists("keep").unwrap());

        store.batch_commit().unwrap();
        assert!(!store.in_batch());
        assert_eq!(store.nvs_mut().get("a").unwrap(), Some(StoredValue::I32(10)));
        assert_eq!(store.nvs_mut().get("keep").unwrap(), None);
    }

    #[test]
    fn batch_rollback_discards() {
        let mut store = open_store();
        store.set_i32("a", 1).unwrap();

        store.batch_begin().unwrap();
        store.set_i32("a", 2).unwrap();
        store.clear_all().unwrap();
        assert!(!store.exists("a").unwrap());
        assert!(store.entries().unwrap().is_empty());

        store.batch_rollback().unwrap();
        assert_eq!(store.get_i32("a", 0).unwrap().value, 1);
    }

    #[test]
    fn batch_misuse() {
        let mut store = open_store();

        assert!(matches!(store.batch_commit(), Err(Error::InvalidParam { .. })));
        assert!(matches!(store.batch_rollback(), Err(Error::InvalidParam { .. })));

        store.batch_begin().unwrap();
        assert!(matches!(store.batch_begin(), Err(Error::InvalidParam { .. })));
        assert_eq!(store.last_error(), ErrorKind::InvalidParam);
    }

    #[test]
    fn batch_commit_stops_at_first_failure() {
        let mut store = CalibrationStore::new(MemoryNvs::with_capacity(2));
        store.open("t1").unwrap();

        store.batch_begin().unwrap();
        store.set_i32("a", 1).unwrap();
        store.set_i32("b", 2).unwrap();
        store.set_i32("c", 3).unwrap();

        assert!(matches!(store.batch_commit(), Err(Error::Full(_))));
        assert!(!store.in_batch());
        // Applied operations stay applied
        assert!(store.exists("a").unwrap());
        assert!(store.exists("b").unwrap());
        assert!(!store.exists("c").unwrap());
    }

    #[test]
    fn close_discards_batch() {
        let mut store = open_store();
        store.batch_begin().unwrap();
        store.set_i32("a", 1).unwrap();
        store.close().unwrap();

        store.open("t1").unwrap();
        assert!(!store.in_batch());
        assert!(!store.exists("a").unwrap());
    }

    #[test]
    fn entries_overlay_batch() {
        let mut store = open_store();
        store.set_i32("a", 1).unwrap();
        store.set_i32("b", 2).unwrap();

        store.batch_begin().unwrap();
        store.set_i32("b", 20).unwrap();
        store.set_i32("c", 3).unwrap();

        assert_eq!(
            store.entries().unwrap(),
            vec![
                ("a".to_string(), StoredValue::I32(1)),
                ("b".to_string(), StoredValue::I32(20)),
                ("c".to_string(), StoredValue::I32(3)),
            ]
        );
    }

    #[test]
    fn logging_respects_level() {
        let capture = CaptureSink::new();
        let mut store = CalibrationStore::new(MemoryNvs::new());
        store.set_log_sink(capture.clone());

        store.open("t1").unwrap();
        assert!(capture.lines().is_empty());

        store.set_debug_level(DebugLevel::Error);
        let _ = store.get_i32("bad key", 0);
        assert_eq!(capture.lines(), vec!["Error: Invalid parameter".to_string()]);

        capture.clear();
        store.set_debug_level(DebugLevel::Info);
        store.open("t2").unwrap();
        store.set_i32("a", 1).unwrap();
        assert_eq!(
            capture.lines(),
            vec!["Initialized with namespace: t2".to_string()]
        );

        capture.clear();
        store.set_debug_level(DebugLevel::Verbose);
        store.set_i32("a", 1).unwrap();
        assert_eq!(capture.lines(), vec!["Set a (i32)".to_string()]);
    }
}
