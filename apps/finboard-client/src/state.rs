// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::api::ResourceClient;
use crate::auth::{AuthGateway, GateDecision, RouteGate, SessionGuard};
use crate::config::ClientConfig;
use crate::models::SessionRecord;
use crate::storage::{FileStorage, KeyValueStorage, SessionStore};

/// Everything the front end needs, wired around one shared session store.
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub sessions: Arc<SessionStore>,
    pub auth: AuthGateway,
    pub api: ResourceClient,
    pub gate: RouteGate,
    ready: Arc<AtomicBool>,
}

impl AppState {
    /// State backed by files under `config.data_dir`. Not ready until
    /// [`restore`](Self::restore) runs.
    pub fn new(config: ClientConfig) -> Self {
        let backend = Arc::new(FileStorage::new(config.storage_paths()));
        Self::with_storage(config, backend)
    }

    pub fn with_storage(config: ClientConfig, backend: Arc<dyn KeyValueStorage>) -> Self {
        let sessions = Arc::new(SessionStore::new(backend));
        let http = Client::new();

        Self {
            auth: AuthGateway::new(config.auth_base_url.as_str(), http.clone(), sessions.clone()),
            api: ResourceClient::new(config.api_base_url.as_str(), http, sessions.clone()),
            gate: RouteGate::new(SessionGuard::new(sessions.clone()), config.login_path.as_str()),
            sessions,
            config,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build the state and restore any persisted session.
    pub fn bootstrap(config: ClientConfig) -> Self {
        let state = Self::new(config);
        state.restore();
        state
    }

    /// Read the persisted session and mark start-up as finished.
    ///
    /// The record is surfaced as-is; an expired token is not cleared here.
    pub fn restore(&self) -> Option<SessionRecord> {
        let record = self.sessions.load();
        match &record {
            Some(record) => info!(user_id = %record.user_id, "restored persisted session"),
            None => info!("no persisted session"),
        }
        self.ready.store(true, Ordering::Release);
        record
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn current_session(&self) -> Option<SessionRecord> {
        self.sessions.load()
    }

    /// Gate decision for a protected screen right now.
    pub fn gate_decision(&self) -> GateDecision {
        self.gate.check(!self.is_ready())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
