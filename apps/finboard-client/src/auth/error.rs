// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use reqwest::StatusCode;

use crate::storage::StorageError;

/// Login / OTP failure.
///
/// The display string is always something a person can read: the backend's
/// own `message`/`detail` when it sent one, otherwise a fixed fallback for the
/// operation. Wrong credentials and an unreachable server are not told apart.
#[derive(Debug)]
pub enum AuthError {
    /// The request never produced a response
    Transport(String),
    /// The identity service answered with a non-2xx status
    Rejected { status: StatusCode, message: String },
    /// The response body was not the expected shape
    InvalidResponse(String),
    /// The issued access token could not be decoded or lacks a tenant claim
    InvalidToken,
    /// The session could not be persisted or cleared
    Storage(StorageError),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Transport(_) => "transport_error",
            AuthError::Rejected { .. } => "rejected",
            AuthError::InvalidResponse(_) => "invalid_response",
            AuthError::InvalidToken => "invalid_token",
            AuthError::Storage(_) => "storage_error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Transport(msg) => write!(f, "{msg}"),
            AuthError::Rejected { message, .. } => write!(f, "{message}"),
            AuthError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::Storage(e) => write!(f, "Failed to persist session: {e}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}
