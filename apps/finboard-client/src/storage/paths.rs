// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the on-disk storage layout.

use std::path::{Path, PathBuf};

/// Directory name used under `$HOME` when no data directory is configured.
pub const DEFAULT_DIR_NAME: &str = ".finboard";

/// Storage path utilities for the client's data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        match std::env::var_os("HOME") {
            Some(home) => Self::new(PathBuf::from(home).join(DEFAULT_DIR_NAME)),
            None => Self::new(DEFAULT_DIR_NAME),
        }
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a single storage key.
    pub fn key_file(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Scratch file used for atomic writes of `key`.
    pub fn key_temp_file(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.json.tmp"))
    }
}
