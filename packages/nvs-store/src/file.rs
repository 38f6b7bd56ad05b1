//! Directory-backed store for host builds.
//!
//! Each namespace is one JSON document at `<root>/<namespace>.json`. The open
//! namespace is cached; every mutation is written through before returning.

use std::{fs, io, path};

use serde::{Deserialize, Serialize};

use crate::{check_name, NvsError, NvsStore, StoredValue, DEFAULT_CAPACITY};

#[derive(Debug, Default, Serialize, Deserialize)]
struct NamespaceFile {
    entries: Vec<FileEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FileEntry {
    key: String,
    entry: StoredValue,
}

#[derive(Debug)]
struct OpenNamespace {
    name: String,
    file_path: path::PathBuf,
    data: NamespaceFile,
}

/// An [`NvsStore`] persisting namespaces as files under a root directory.
///
/// `capacity` bounds the entry slots of each namespace file.
#[derive(Debug)]
pub struct FileNvs {
    root: path::PathBuf,
    capacity: usize,
    current: Option<OpenNamespace>,
}

impl FileNvs {
    pub fn new(root: path::PathBuf) -> Result<FileNvs, NvsError> {
        Self::with_capacity(root, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(root: path::PathBuf, capacity: usize) -> Result<FileNvs, NvsError> {
        let attr = fs::metadata(&root)?;

        if !attr.is_dir() {
            return Err(NvsError::Io(io::Error::other(format!(
                "root path {} must be a directory",
                root.display()
            ))));
        }

        if attr.permissions().readonly() {
            return Err(NvsError::Io(io::Error::other(format!(
                "root directory {} must be writable",
                root.display()
            ))));
        }

        Ok(FileNvs {
            root: root.canonicalize()?,
            capacity,
            current: None,
        })
    }

    pub fn root(&self) -> &path::Path {
        &self.root
    }

    fn namespace_path(&self, namespace: &str) -> path::PathBuf {
        self.root.join(format!("{}.json", namespace))
    }

    fn load(namespace: &str, file_path: &path::Path) -> Result<NamespaceFile, NvsError> {
        log::debug!("Reading {}...", file_path.display());

        let text = match fs::read_to_string(file_path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(NamespaceFile::default());
            }
            Err(err) => {
                return Err(NvsError::Unavailable {
                    namespace: namespace.to_string(),
                    message: err.to_string(),
                });
            }
        };

        serde_json::from_str(&text).map_err(|err| NvsError::Corrupt {
            message: format!("{}: {}", file_path.display(), err),
        })
    }

    fn open_namespace(&self) -> Result<&OpenNamespace, NvsError> {
        self.current.as_ref().ok_or(NvsError::NotOpen)
    }

    /// Apply a mutation to the cached namespace and persist it.
    ///
    /// The cache is only updated once the file write succeeded.
    fn mutate<R>(
        &mut self,
        op: impl FnOnce(&mut Vec<FileEntry>) -> R,
    ) -> Result<R, NvsError> {
        let ns = self.current.as_mut().ok_or(NvsError::NotOpen)?;

        let mut entries = ns.data.entries.clone();
        let result = op(&mut entries);
        let next = NamespaceFile { entries };

        log::debug!("Writing {}...", ns.file_path.display());
        let text = serde_json::to_string_pretty(&next).map_err(|err| NvsError::WriteRejected {
            message: err.to_string(),
        })?;

        // Write to a sibling then rename so a crash never leaves half a file
        let tmp_path = ns.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, text.as_bytes())?;
        if let Err(err) = fs::rename(&tmp_path, &ns.file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        ns.data = next;
        Ok(result)
    }
}

/// Namespace names become file names under the root, so only
/// `[A-Za-z0-9_-]` is accepted. This keeps separators and `..` out.
fn check_file_stem(namespace: &str) -> Result<(), NvsError> {
    let portable = namespace
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if !portable {
        return Err(NvsError::InvalidName {
            name: namespace.to_string(),
        });
    }
    Ok(())
}

impl NvsStore for FileNvs {
    fn open(&mut self, namespace: &str) -> Result<(), NvsError> {
        self.close()?;
        check_name(namespace)?;
        check_file_stem(namespace)?;

        let file_path = self.namespace_path(namespace);
        let data = Self::load(namespace, &file_path)?;
        self.current = Some(OpenNamespace {
            name: namespace.to_string(),
            file_path,
            data,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), NvsError> {
        if let Some(ns) = self.current.take() {
            log::debug!("Closing namespace {}", ns.name);
        }
        Ok(())
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), NvsError> {
        check_name(key)?;

        let ns = self.open_namespace()?;
        let used: usize = ns.data.entries.iter().map(|e| e.entry.slots()).sum();
        let existing = ns
            .data
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.entry.slots())
            .unwrap_or(0);
        if used - existing + value.slots() > self.capacity {
            return Err(NvsError::Full {
                capacity: self.capacity,
            });
        }

        self.mutate(|entries| match entries.iter_mut().find(|e| e.key == key) {
            Some(slot) => slot.entry = value,
            None => entries.push(FileEntry {
                key: key.to_string(),
                entry: value,
            }),
        })
    }

    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, NvsError> {
        Ok(self
            .open_namespace()?
            .data
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.entry.clone()))
    }

    fn remove(&mut self, key: &str) -> Result<bool, NvsError> {
        if !self.is_key(key)? {
            return Ok(false);
        }
        self.mutate(|entries| {
            entries.retain(|e| e.key != key);
            true
        })
    }

    fn clear(&mut self) -> Result<(), NvsError> {
        self.mutate(|entries| entries.clear())
    }

    fn keys(&mut self) -> Result<Vec<String>, NvsError> {
        Ok(self
            .open_namespace()?
            .data
            .entries
            .iter()
            .map(|e| e.key.clone())
            .collect())
    }

    fn free_entries(&self) -> usize {
        match &self.current {
            Some(ns) => {
                let used: usize = ns.data.entries.iter().map(|e| e.entry.slots()).sum();
                self.capacity.saturating_sub(used)
            }
            None => 0,
        }
    }

    fn total_entries(&self) -> usize {
        self.capacity
    }
}
