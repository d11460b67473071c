// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local session validity check.

use std::sync::Arc;

use chrono::Utc;

use super::claims::decode_token;
use crate::storage::SessionStore;

/// Current wall-clock time in whole Unix seconds (floored).
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Answers "is there a usable session right now?".
///
/// Pure and synchronous: it never writes to storage, never calls the network
/// and never attempts a refresh. An expired record is reported invalid but
/// left in place until an explicit logout.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    sessions: Arc<SessionStore>,
}

impl SessionGuard {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(unix_now())
    }

    /// Validity against an explicit clock reading (Unix seconds).
    pub fn is_valid_at(&self, now: i64) -> bool {
        let Some(record) = self.sessions.load() else {
            return false;
        };

        match decode_token(&record.access_token) {
            Ok(claims) => claims.is_live_at(now),
            Err(_) => false,
        }
    }
}
