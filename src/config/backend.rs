//! Key-value storage for the settings blob.
//!
//! The settings record lives under one fixed key of a flat string store,
//! the same shape as a browser's `localStorage`. [`FileBackend`] keeps the
//! whole store in one JSON object on disk; [`MemoryBackend`] is used by
//! tests and by callers that do not want persistence.

use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Flat string store.
///
/// `set_item` must be all-or-nothing: after a failed write, `get_item`
/// returns the previous value.
pub trait SettingsBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

impl<B: SettingsBackend + ?Sized> SettingsBackend for &B {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// JSON object of key → string stored in a single file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_store(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(Error::storage_at(
                    "Failed to read settings file",
                    &self.path,
                    e,
                ))
            }
        };

        match serde_json::from_str(&contents) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Settings file is not a JSON object; starting from an empty store"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write through a sibling temp file and rename, so readers never see a
    /// half-written store.
    fn write_store(&self, store: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(store)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::storage_at("Failed to create settings directory", parent, e)
                })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .map_err(|e| Error::storage_at("Failed to write settings file", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| Error::storage_at("Failed to replace settings file", &self.path, e))
    }
}

impl SettingsBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_store()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut store = self.read_store()?;
        store.insert(key.to_string(), value.to_string());
        self.write_store(&store)
    }
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: Arc<Mutex<BTreeMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the write counter.
    pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items
            .lock()
            .expect("Lock poisoned")
            .insert(key.into(), value.into());
        self
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().expect("Lock poisoned")
    }
}

impl SettingsBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|_| Error::storage("Settings store lock poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| Error::storage("Settings store lock poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        let mut writes = self
            .writes
            .lock()
            .map_err(|_| Error::storage("Settings store lock poisoned"))?;
        *writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_result_ok;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("settings.json"));
        assert_eq!(assert_result_ok!(backend.get_item("anything")), None);
    }

    #[test]
    fn test_file_backend_round_trip_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let backend = FileBackend::new(&path);

        assert_result_ok!(backend.set_item("a", "1"));
        assert_result_ok!(backend.set_item("b", "2"));

        assert!(path.exists());
        assert_eq!(assert_result_ok!(backend.get_item("a")).as_deref(), Some("1"));
        assert_eq!(assert_result_ok!(backend.get_item("b")).as_deref(), Some("2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_backend_tolerates_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let backend = FileBackend::new(&path);
        assert_eq!(assert_result_ok!(backend.get_item("key")), None);

        assert_result_ok!(backend.set_item("key", "value"));
        assert_eq!(assert_result_ok!(backend.get_item("key")).as_deref(), Some("value"));
    }

    #[test]
    fn test_memory_backend_counts_writes_and_shares_state() {
        let backend = MemoryBackend::new().with_item("seed", "x");
        let clone = backend.clone();

        assert_eq!(backend.write_count(), 0);
        assert_result_ok!(clone.set_item("k", "v"));

        assert_eq!(backend.write_count(), 1);
        assert_eq!(assert_result_ok!(backend.get_item("k")).as_deref(), Some("v"));
        assert_eq!(assert_result_ok!(backend.get_item("seed")).as_deref(), Some("x"));
    }
}
