// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity service client: password login, one-time codes, logout.
//!
//! Every call is a single attempt. Any non-2xx status becomes an
//! [`AuthError`] carrying the backend's message (or a per-operation fallback);
//! there is no retry and no backoff.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::claims::decode_token;
use super::error::AuthError;
use crate::error::failure_message;
use crate::models::{SessionRecord, UserProfile};
use crate::storage::SessionStore;

const LOGIN_FAILED: &str = "Login failed";
const OTP_REQUEST_FAILED: &str = "Failed to send OTP";
const OTP_VERIFY_FAILED: &str = "OTP verification failed";

/// Token pair returned by a successful login.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Outcome of a one-time-code verification.
#[derive(Debug, Clone)]
pub struct OtpVerification {
    /// Raw response body
    pub response: Value,
    /// Session established from the response, when it carried a token pair
    pub session: Option<SessionRecord>,
}

#[derive(Debug, Clone)]
pub struct AuthGateway {
    base_url: String,
    http: Client,
    sessions: Arc<SessionStore>,
}

impl AuthGateway {
    pub fn new(base_url: impl Into<String>, http: Client, sessions: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            sessions,
        }
    }

    /// Exchange email and password for a session and persist it.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionRecord, AuthError> {
        let body = self
            .post_json(
                "/login",
                &json!({ "email": email, "password": password }),
                LOGIN_FAILED,
            )
            .await?;

        let grant: TokenGrant = serde_json::from_value(body)
            .map_err(|e| AuthError::InvalidResponse(format!("login response: {e}")))?;

        self.establish_session(grant)
    }

    /// Ask the identity service to text a one-time code to `phone`.
    pub async fn request_one_time_code(&self, phone: &str) -> Result<Value, AuthError> {
        self.post_json("/request-otp", &json!({ "phone": phone }), OTP_REQUEST_FAILED)
            .await
    }

    /// Submit the code. When the response carries an access/refresh token pair
    /// the session is assembled and persisted exactly as for password login.
    pub async fn verify_one_time_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<OtpVerification, AuthError> {
        let response = self
            .post_json(
                "/verify-otp",
                &json!({ "phone": phone, "otp": code }),
                OTP_VERIFY_FAILED,
            )
            .await?;

        let grant = token_grant_in(&response)
            .map(serde_json::from_value::<TokenGrant>)
            .transpose()
            .map_err(|e| AuthError::InvalidResponse(format!("verify-otp response: {e}")))?;

        let session = match grant {
            Some(grant) => Some(self.establish_session(grant)?),
            None => None,
        };

        Ok(OtpVerification { response, session })
    }

    /// Forget the local session. No server-side call is made.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        info!("session cleared");
        Ok(())
    }

    fn establish_session(&self, grant: TokenGrant) -> Result<SessionRecord, AuthError> {
        let record = assemble_session(grant)?;
        self.sessions.save(&record)?;
        info!(
            user_id = %record.user_id,
            client_id = %record.client_id,
            "session established"
        );
        Ok(record)
    }

    async fn post_json(&self, path: &str, payload: &Value, fallback: &str) -> Result<Value, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("{fallback}: {e}")))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "identity response");

        if !status.is_success() {
            let message = failure_message(response, fallback).await;
            return Err(AuthError::Rejected { status, message });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(format!("{fallback}: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(format!("POST {path} invalid JSON: {e}")))
    }
}

/// Build a session record from a token grant.
///
/// Identity comes from the token's own claims so the record can never
/// disagree with the token it carries. The profile's id is used only when the
/// token has no subject claim.
fn assemble_session(grant: TokenGrant) -> Result<SessionRecord, AuthError> {
    let claims = decode_token(&grant.access_token).map_err(|_| AuthError::InvalidToken)?;
    let client_id = claims.client_id.clone().ok_or(AuthError::InvalidToken)?;

    let user = grant.user.unwrap_or_default();
    let user_id = claims
        .subject()
        .map(str::to_string)
        .or_else(|| (!user.id.is_empty()).then(|| user.id.clone()))
        .ok_or(AuthError::InvalidToken)?;

    let user = if user.id.is_empty() {
        UserProfile {
            id: user_id.clone(),
            ..user
        }
    } else {
        user
    };

    Ok(SessionRecord {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
        user_id,
        client_id,
        user,
    })
}

/// Locate a token pair either at the top level or inside a `data` envelope.
fn token_grant_in(response: &Value) -> Option<Value> {
    if response.get("access_token").is_some() {
        return Some(response.clone());
    }
    response
        .get("data")
        .filter(|data| data.get("access_token").is_some())
        .cloned()
}
