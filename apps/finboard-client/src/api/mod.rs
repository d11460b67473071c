// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Resource Client
//!
//! Authenticated request dispatcher shared by every domain binding
//! (accounts, financial settings, ledgers, transactions, inventory).
//!
//! ## Request contract
//!
//! - `Content-Type: application/json` is always sent; caller headers are
//!   merged over it.
//! - When a session exists its access token goes out as
//!   `Authorization: Bearer <token>`; with no session the header is omitted.
//! - Non-2xx responses become [`ApiError::Status`] with the body's
//!   `message`/`detail`, or `"Request failed"`. 4xx and 5xx are not told apart.
//! - 2xx bodies are returned as an [`Envelope`] without checking `success`;
//!   callers decide what an unsuccessful envelope means.
//!
//! ## Identity fields
//!
//! The backend also expects `client_id`/`user_id` (and sometimes the raw
//! token) in the body, path or query string depending on the endpoint. Each
//! binding mirrors its endpoint exactly; see the per-module docs.

pub mod accounts;
pub mod financial;
pub mod inventory;
pub mod ledgers;
pub mod transactions;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{failure_message, ApiError, GENERIC_FAILURE};
use crate::models::Identity;
use crate::storage::SessionStore;

pub use transactions::QueryOutcome;

/// Uniform response wrapper used by every domain endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<Value>,
    pub meta: Option<Value>,
}

impl<T> Envelope<T> {
    /// The payload, but only when the backend reported success.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }

    /// Decode `meta` into a typed shape (e.g. pagination).
    pub fn meta_as<M: DeserializeOwned>(&self) -> Option<M> {
        self.meta
            .as_ref()
            .and_then(|meta| serde_json::from_value(meta.clone()).ok())
    }

    /// Field name the backend needs before it can finish the operation.
    pub fn requires(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.get("requires"))
            .and_then(Value::as_str)
    }
}

/// Wire shape before the payload is typed.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    meta: Option<Value>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Type the payload of a raw body.
    ///
    /// A payload that does not fit `T` is an error only when the envelope
    /// claims success; failed envelopes often carry unrelated `data`.
    fn from_body(body: Value) -> Result<Self, ApiError> {
        let raw: RawEnvelope = serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("envelope: {e}")))?;

        let data = match raw.data {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value(value) {
                Ok(data) => Some(data),
                Err(e) if raw.success => {
                    return Err(ApiError::InvalidResponse(format!("data: {e}")));
                }
                Err(_) => None,
            },
        };

        Ok(Self {
            success: raw.success,
            status_code: raw.status_code.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            data,
            error: raw.error,
            meta: raw.meta,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResourceClient {
    base_url: String,
    http: Client,
    sessions: Arc<SessionStore>,
}

impl ResourceClient {
    pub fn new(base_url: impl Into<String>, http: Client, sessions: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            sessions,
        }
    }

    /// Dispatch a request with default headers.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Envelope<T>, ApiError> {
        self.request_with_headers(method, path, body, HeaderMap::new())
            .await
    }

    /// Dispatch a request, merging `extra` over the default headers.
    pub async fn request_with_headers<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra: HeaderMap,
    ) -> Result<Envelope<T>, ApiError> {
        let headers = self.headers(extra)?;
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .headers(headers);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::InvalidResponse(format!("serialize body failed: {e}")))?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "resource response");

        if !status.is_success() {
            let message = failure_message(response, GENERIC_FAILURE).await;
            return Err(ApiError::status(status, message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{method} {path} invalid JSON: {e}")))?;

        Envelope::from_body(body)
    }

    /// Headers for a JSON request: content type, caller overrides, bearer token.
    pub fn headers(&self, extra: HeaderMap) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Replaces by name, keeping every value of a repeated caller header.
        headers.extend(extra);
        if let Some(bearer) = self.bearer()? {
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }

    /// `Bearer <token>` for the current session, if any.
    fn bearer(&self) -> Result<Option<HeaderValue>, ApiError> {
        let Some(record) = self.sessions.load() else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", record.access_token))
            .map_err(|_| ApiError::NotAuthenticated)?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Identity of the current session; domain calls cannot be built without it.
    fn identity(&self) -> Result<Identity, ApiError> {
        self.sessions
            .load()
            .map(|record| Identity::from(&record))
            .ok_or(ApiError::NotAuthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Append an encoded query string to `path`.
fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}

/// Serialize `payload` and add the identity fields the endpoint expects.
fn stamp<P: Serialize>(payload: &P, identity: &Identity, with_token: bool) -> Result<Value, ApiError> {
    let mut body = serde_json::to_value(payload)
        .map_err(|e| ApiError::InvalidResponse(format!("serialize body failed: {e}")))?;
    if let Value::Object(map) = &mut body {
        map.insert("client_id".to_string(), Value::String(identity.client_id.clone()));
        map.insert("user_id".to_string(), Value::String(identity.user_id.clone()));
        if with_token {
            map.insert("token".to_string(), Value::String(identity.access_token.clone()));
        }
    }
    Ok(body)
}
