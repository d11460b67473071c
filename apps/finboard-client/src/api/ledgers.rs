// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger endpoints.

use reqwest::Method;
use serde_json::Value;

use super::{stamp, with_query, Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::{Ledger, NewLedger};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

impl ResourceClient {
    /// `POST /ledgers/` with `client_id`/`user_id` in the body.
    pub async fn create_ledger(&self, ledger: &NewLedger) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let body = stamp(ledger, &identity, false)?;
        self.request(Method::POST, "/ledgers/", Some(&body)).await
    }

    /// `GET /ledgers/{client_id}/{user_id}?page&size`; `meta.total_pages`
    /// is available via `envelope.meta_as::<PageMeta>()`.
    pub async fn list_ledgers(&self, page: u32, size: u32) -> Result<Envelope<Vec<Ledger>>, ApiError> {
        let identity = self.identity()?;
        let page = page.max(1).to_string();
        let size = size.to_string();
        let path = with_query(
            &format!("/ledgers/{}/{}", identity.client_id, identity.user_id),
            &[("page", page.as_str()), ("size", size.as_str())],
        );
        self.request(Method::GET, &path, None).await
    }
}
