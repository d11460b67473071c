// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store: the single persisted login for this installation.

use std::sync::Arc;

use tracing::warn;

use super::{KeyValueStorage, StorageResult};
use crate::models::SessionRecord;

/// Storage key holding the serialized [`SessionRecord`].
pub const SESSION_KEY: &str = "auth_data";

/// Persists, loads and clears the current session record.
///
/// Exactly one session is tracked; `save` overwrites whatever was there.
/// Share it behind an `Arc` between the auth gateway, resource client and
/// route gate.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self { backend }
    }

    /// Serialize `record` and write it under [`SESSION_KEY`].
    pub fn save(&self, record: &SessionRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        self.backend.set(SESSION_KEY, &json)
    }

    /// Read the current record.
    ///
    /// Missing, unreadable and malformed values all come back as `None`; the
    /// caller only needs to know whether a usable session exists.
    pub fn load(&self) -> Option<SessionRecord> {
        let raw = match self.backend.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read persisted session");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "ignoring malformed persisted session");
                None
            }
        }
    }

    /// Remove the stored record. Safe to call when nothing is stored.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.remove(SESSION_KEY)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::storage::{FileStorage, MemoryStorage, StoragePaths};
    use tempfile::TempDir;

    fn sample_record() -> SessionRecord {
        SessionRecord {
            access_token: "header.payload.sig".to_string(),
            refresh_token: "refresh-123".to_string(),
            user_id: "usr_1".to_string(),
            client_id: "cl_1".to_string(),
            user: UserProfile {
                id: "usr_1".to_string(),
                first_name: Some("Asha".to_string()),
                last_name: Some("Rao".to_string()),
                email: Some("asha@example.com".to_string()),
                phone: None,
                status: Some("active".to_string()),
            },
        }
    }

    fn memory_store() -> (SessionStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        (SessionStore::new(backend.clone()), backend)
    }

    #[test]
    fn save_then_load_returns_identical_record() {
        let (store, _) = memory_store();
        let record = sample_record();
        store.save(&record).unwrap();
        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn save_overwrites_previous_session() {
        let (store, _) = memory_store();
        store.save(&sample_record()).unwrap();

        let mut second = sample_record();
        second.user_id = "usr_2".to_string();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().user_id, "usr_2");
    }

    #[test]
    fn load_without_session_is_none() {
        let (store, _) = memory_store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn malformed_session_loads_as_none() {
        let (store, backend) = memory_store();
        backend.set(SESSION_KEY, "{not json").unwrap();
        assert_eq!(store.load(), None);

        backend.set(SESSION_KEY, r#"{"accessToken":"only"}"#).unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_removes_session_and_is_idempotent() {
        let (store, _) = memory_store();
        store.save(&sample_record()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let record = sample_record();

        SessionStore::new(Arc::new(FileStorage::new(paths.clone())))
            .save(&record)
            .unwrap();

        let reopened = SessionStore::new(Arc::new(FileStorage::new(paths)));
        assert_eq!(reopened.load(), Some(record));
    }
}
