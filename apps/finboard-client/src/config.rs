// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Endpoint and storage settings are read from the environment once at
//! startup. Blank values count as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `FINBOARD_API_BASE_URL` | Resource backend base URL | `http://localhost:8000` |
//! | `FINBOARD_AUTH_BASE_URL` | Identity service base URL | hosted auth endpoint |
//! | `FINBOARD_DATA_DIR` | Directory holding the persisted session | `$HOME/.finboard` |
//! | `FINBOARD_LOGIN_PATH` | Redirect target for unauthenticated routes | `/login` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::auth::route_gate::DEFAULT_LOGIN_PATH;
use crate::storage::StoragePaths;

pub const API_BASE_URL_ENV: &str = "FINBOARD_API_BASE_URL";
pub const AUTH_BASE_URL_ENV: &str = "FINBOARD_AUTH_BASE_URL";
pub const DATA_DIR_ENV: &str = "FINBOARD_DATA_DIR";
pub const LOGIN_PATH_ENV: &str = "FINBOARD_LOGIN_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTH_BASE_URL: &str =
    "https://dt1wp7hrm9.execute-api.ap-south-1.amazonaws.com/auth/api/auth";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env_optional(LOG_FORMAT_ENV).as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub auth_base_url: String,
    pub data_dir: PathBuf,
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            data_dir: StoragePaths::default().root().to_path_buf(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            api_base_url: env_or_default(API_BASE_URL_ENV, &defaults.api_base_url),
            auth_base_url: env_or_default(AUTH_BASE_URL_ENV, &defaults.auth_base_url),
            data_dir: env_optional(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            login_path: env_or_default(LOGIN_PATH_ENV, &defaults.login_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Both base URLs must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url(API_BASE_URL_ENV, &self.api_base_url)?;
        check_url(AUTH_BASE_URL_ENV, &self.auth_base_url)
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.data_dir)
    }
}

fn check_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
