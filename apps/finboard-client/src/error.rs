// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use reqwest::StatusCode;
use serde_json::Value;

/// Fallback when a failed response carries no readable message.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Failure of a resource-backend call.
///
/// Callers surface `to_string()` directly to the user, so every variant
/// renders as a plain sentence.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Download(String),

    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message` first, then `detail`. A `detail` array (validation
/// errors) is rendered by joining its `msg` entries.
pub fn message_from_body(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        if !message.trim().is_empty() {
            return Some(message.to_string());
        }
    }

    match body.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

/// Read a failed response's body and turn it into a message, or `fallback`.
pub async fn failure_message(response: reqwest::Response, fallback: &str) -> String {
    response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(message_from_body)
        .unwrap_or_else(|| fallback.to_string())
}
