// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Navigation guard for protected screens.

use super::guard::SessionGuard;

/// Default redirect target for unauthenticated navigation.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// What the front end should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session restore has not finished yet; show a waiting state.
    Pending,
    /// No valid session; go to the login entry point (replacing history).
    Redirect { to: String },
    /// Render the protected content.
    Admit,
}

/// Stateless gate combining the start-up flag with the session guard.
#[derive(Debug, Clone)]
pub struct RouteGate {
    guard: SessionGuard,
    login_path: String,
}

impl RouteGate {
    pub fn new(guard: SessionGuard, login_path: impl Into<String>) -> Self {
        Self {
            guard,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn check(&self, loading: bool) -> GateDecision {
        self.decide(loading, self.guard.is_valid())
    }

    /// Like [`check`](Self::check) but against an explicit clock reading.
    pub fn check_at(&self, loading: bool, now: i64) -> GateDecision {
        self.decide(loading, self.guard.is_valid_at(now))
    }

    fn decide(&self, loading: bool, authenticated: bool) -> GateDecision {
        if loading {
            GateDecision::Pending
        } else if !authenticated {
            GateDecision::Redirect {
                to: self.login_path.clone(),
            }
        } else {
            GateDecision::Admit
        }
    }
}
