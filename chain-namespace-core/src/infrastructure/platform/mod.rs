//! Storage backends
//!
//! `MemoryStorage` keeps the two persisted keys in process memory.
//! `FileStorage` keeps them in a small JSON object on disk, rewritten on
//! every change.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::repositories::storage_repository::StorageAdapter;
use crate::shared::error::CoordinatorError;

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoordinatorError> {
        let data = self
            .data
            .lock()
            .map_err(|_| CoordinatorError::storage("Failed to acquire lock for storage read"))?;
        Ok(data.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoordinatorError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| CoordinatorError::storage("Failed to acquire lock for storage write"))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CoordinatorError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| CoordinatorError::storage("Failed to acquire lock for storage delete"))?;
        data.remove(key);
        Ok(())
    }
}

/// JSON key/value file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CoordinatorError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CoordinatorError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, data: &BTreeMap<String, String>) -> Result<(), CoordinatorError> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, CoordinatorError> {
        self.lock
            .lock()
            .map_err(|_| CoordinatorError::storage("Failed to acquire file storage lock"))
    }
}

impl StorageAdapter for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoordinatorError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoordinatorError> {
        let _guard = self.guard()?;
        let mut data = self.read_all()?;
        data.insert(key.to_string(), value.to_string());
        self.write_all(&data)
    }

    fn remove_item(&self, key: &str) -> Result<(), CoordinatorError> {
        let _guard = self.guard()?;
        let mut data = self.read_all()?;
        if data.remove(key).is_some() {
            self.write_all(&data)?;
        }
        Ok(())
    }
}
