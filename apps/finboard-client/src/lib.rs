// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! finboard - client core for a small-business bookkeeping dashboard
//!
//! This crate owns the session lifecycle (login, persistence, expiry checks,
//! logout) and the request contract every bookkeeping call goes through.
//!
//! ## Modules
//!
//! - `api` - Authenticated resource client and domain endpoints
//! - `auth` - Identity service client, token decoding and route gating
//! - `config` - Environment-driven endpoint and storage settings
//! - `dashboard` - Concurrent page-level aggregation
//! - `storage` - Durable key/value storage and the session store

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
