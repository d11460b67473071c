// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable key/value storage backends.
//!
//! The client persists exactly one thing (the session record), but the store
//! is keyed so callers never touch file names directly. Two backends exist:
//!
//! - [`FileStorage`]: one file per key under the data directory, written via
//!   temp-file + rename so a crash never leaves a half-written value.
//! - [`MemoryStorage`]: process-local map for tests and throwaway sessions.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::sync::RwLock;

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations
    Io(io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Key contains characters that cannot map to a file name
    InvalidKey(String),
    /// In-memory backend lock was poisoned by a panicking writer
    Poisoned,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Json(e) => write!(f, "JSON error: {e}"),
            StorageError::InvalidKey(key) => write!(f, "Invalid storage key: {key:?}"),
            StorageError::Poisoned => write!(f, "Storage lock poisoned"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal durable key/value contract.
pub trait KeyValueStorage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// File-per-key storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
}

impl FileStorage {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    fn validate_key(key: &str) -> StorageResult<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::validate_key(key)?;
        match fs::read_to_string(self.paths.key_file(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::validate_key(key)?;
        fs::create_dir_all(self.paths.root())?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.paths.key_temp_file(key);
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        fs::rename(&temp_path, self.paths.key_file(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::validate_key(key)?;
        match fs::remove_file(self.paths.key_file(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(StoragePaths::new(temp_dir.path().join("data")));
        (storage, temp_dir)
    }

    #[test]
    fn file_storage_creates_root_on_first_write() {
        let (storage, _temp_dir) = file_storage();
        assert!(!storage.paths().root().exists());

        storage.set("auth_data", "{}").unwrap();
        assert!(storage.paths().key_file("auth_data").exists());
        assert!(!storage.paths().key_temp_file("auth_data").exists());
    }

    #[test]
    fn file_storage_overwrites_and_reads_back() {
        let (storage, _temp_dir) = file_storage();
        storage.set("auth_data", "first").unwrap();
        storage.set("auth_data", "second").unwrap();
        assert_eq!(storage.get("auth_data").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn file_storage_missing_key_is_none() {
        let (storage, _temp_dir) = file_storage();
        assert_eq!(storage.get("auth_data").unwrap(), None);
    }

    #[test]
    fn file_storage_remove_is_idempotent() {
        let (storage, _temp_dir) = file_storage();
        storage.set("auth_data", "x").unwrap();
        storage.remove("auth_data").unwrap();
        storage.remove("auth_data").unwrap();
        assert_eq!(storage.get("auth_data").unwrap(), None);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let (storage, _temp_dir) = file_storage();
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
