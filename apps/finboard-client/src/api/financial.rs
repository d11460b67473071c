// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Financial settings (financial year, currency, locale, GST).
//!
//! The same POST both creates and updates; the backend keys settings on the
//! tenant/user pair carried in the body.

use reqwest::Method;
use serde_json::Value;

use super::{stamp, with_query, Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::{FinancialSettings, FinancialSettingsInput};

const SETTINGS_PATH: &str = "/accounts/financial_settings";
const SETTINGS_PAGE_LIMIT: &str = "10";

impl ResourceClient {
    pub async fn save_financial_settings(
        &self,
        settings: &FinancialSettingsInput,
    ) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let body = stamp(settings, &identity, false)?;
        self.request(Method::POST, SETTINGS_PATH, Some(&body)).await
    }

    pub async fn financial_settings(&self) -> Result<Envelope<Vec<FinancialSettings>>, ApiError> {
        let identity = self.identity()?;
        let path = with_query(
            SETTINGS_PATH,
            &[
                ("user_id", identity.user_id.as_str()),
                ("client_id", identity.client_id.as_str()),
                ("limit", SETTINGS_PAGE_LIMIT),
                ("offset", "0"),
            ],
        );
        self.request(Method::GET, &path, None).await
    }
}
