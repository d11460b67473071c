// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Client-side durable storage. Everything the client remembers between runs
//! lives under one data directory:
//!
//! ```text
//! $FINBOARD_DATA_DIR/
//!   auth_data.json    # Serialized SessionRecord (present only while logged in)
//! ```
//!
//! Values are written atomically (temp file + rename). Nothing here encrypts
//! data at rest; the directory should be private to the user.

pub mod fs;
pub mod paths;
pub mod session;

pub use fs::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use session::{SessionStore, SESSION_KEY};
