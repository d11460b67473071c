// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints.
//!
//! | Operation | Identity fields |
//! |-----------|-----------------|
//! | `POST /transactions/query` | body (+ optional `bank_account_id`) |
//! | `POST /transactions/` | body |
//! | `PUT /transactions/update` | query string |
//! | `DELETE /transactions/delete` | query string |
//! | `GET /transactions/history` | query string |
//! | `GET /transactions/download_statement` | query string, binary response |
//! | `GET /transactions/total_balance` | query string |
//!
//! ## Two-phase creation
//!
//! A natural-language query without an account may come back with
//! `status_code == 200` and `meta.requires == "bank_account_id"`. That is a
//! preview, not a completed transaction: the caller must resubmit the same
//! query with the chosen account id. [`QueryOutcome`] makes the distinction
//! explicit.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{stamp, with_query, Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::{
    BalanceReport, DateRange, NewTransaction, Period, TransactionDraft, TransactionHistory,
    TransactionUpdate,
};

/// Field the query endpoint asks for when it cannot pick an account itself.
pub const REQUIRES_BANK_ACCOUNT: &str = "bank_account_id";

const STATEMENT_FAILED: &str = "Failed to download statement";

/// Result of submitting a natural-language transaction query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The transaction was created.
    Completed(Envelope<Value>),
    /// The backend drafted a transaction and needs an account to finish it.
    NeedsAccountSelection {
        draft: TransactionDraft,
        message: String,
    },
    /// 2xx response whose envelope reports failure.
    Rejected(Envelope<Value>),
}

impl QueryOutcome {
    fn from_envelope(envelope: Envelope<Value>) -> Self {
        if envelope.status_code == 200 && envelope.requires() == Some(REQUIRES_BANK_ACCOUNT) {
            let draft = envelope
                .data
                .clone()
                .and_then(|data| serde_json::from_value(data).ok())
                .unwrap_or_default();
            return QueryOutcome::NeedsAccountSelection {
                draft,
                message: envelope.message,
            };
        }

        if envelope.success {
            QueryOutcome::Completed(envelope)
        } else {
            QueryOutcome::Rejected(envelope)
        }
    }
}

impl ResourceClient {
    /// Submit a free-text transaction. Pass `bank_account_id` on the second
    /// phase, after a [`QueryOutcome::NeedsAccountSelection`].
    pub async fn create_transaction_from_query(
        &self,
        query: &str,
        bank_account_id: Option<&str>,
    ) -> Result<QueryOutcome, ApiError> {
        let identity = self.identity()?;
        let mut payload = json!({ "query": query });
        if let Some(account) = bank_account_id {
            payload["bank_account_id"] = json!(account);
        }
        let body = stamp(&payload, &identity, false)?;

        let envelope = self
            .request(Method::POST, "/transactions/query", Some(&body))
            .await?;
        Ok(QueryOutcome::from_envelope(envelope))
    }

    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let body = stamp(transaction, &identity, false)?;
        self.request(Method::POST, "/transactions/", Some(&body)).await
    }

    /// Identity travels in the query string; the body holds only the changes.
    pub async fn update_transaction(
        &self,
        transaction_id: &str,
        update: &TransactionUpdate,
    ) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let path = with_query(
            "/transactions/update",
            &[
                ("transaction_id", transaction_id),
                ("user_id", identity.user_id.as_str()),
                ("client_id", identity.client_id.as_str()),
            ],
        );
        let body = serde_json::to_value(update)
            .map_err(|e| ApiError::InvalidResponse(format!("serialize body failed: {e}")))?;
        self.request(Method::PUT, &path, Some(&body)).await
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let path = with_query(
            "/transactions/delete",
            &[
                ("transaction_id", transaction_id),
                ("user_id", identity.user_id.as_str()),
                ("client_id", identity.client_id.as_str()),
            ],
        );
        self.request(Method::DELETE, &path, None).await
    }

    /// History for `period`; the date window is sent only when given.
    pub async fn transaction_history(
        &self,
        period: Period,
        range: Option<DateRange>,
    ) -> Result<Envelope<TransactionHistory>, ApiError> {
        let identity = self.identity()?;
        let start;
        let end;
        let mut pairs = vec![
            ("filter_type", period.as_str()),
            ("user_id", identity.user_id.as_str()),
            ("client_id", identity.client_id.as_str()),
        ];
        if let Some(range) = range {
            start = range.start.to_string();
            end = range.end.to_string();
            pairs.push(("start_date", start.as_str()));
            pairs.push(("end_date", end.as_str()));
        }
        let path = with_query("/transactions/history", &pairs);
        self.request(Method::GET, &path, None).await
    }

    pub async fn total_balance(&self, period: Period) -> Result<Envelope<BalanceReport>, ApiError> {
        let identity = self.identity()?;
        let path = with_query(
            "/transactions/total_balance",
            &[
                ("period", period.as_str()),
                ("user_id", identity.user_id.as_str()),
                ("client_id", identity.client_id.as_str()),
            ],
        );
        self.request(Method::GET, &path, None).await
    }

    /// Download the PDF statement for `period` into `dest_dir`.
    ///
    /// Bypasses the envelope: the body is the file. Only the bearer header is
    /// sent. Returns the path written.
    pub async fn download_statement(
        &self,
        period: Period,
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let identity = self.identity()?;
        let path = with_query(
            "/transactions/download_statement",
            &[
                ("filter_type", period.as_str()),
                ("user_id", identity.user_id.as_str()),
                ("client_id", identity.client_id.as_str()),
            ],
        );

        let mut request = self.http.get(self.url(&path));
        if let Some(bearer) = self.bearer()? {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Download(format!("{STATEMENT_FAILED}: {e}")))?;
        let status = response.status();
        debug!(path = %path, status = status.as_u16(), "statement response");
        if !status.is_success() {
            return Err(ApiError::Download(STATEMENT_FAILED.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Download(format!("{STATEMENT_FAILED}: {e}")))?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let file = dest_dir.join(statement_filename(period, Utc::now().date_naive()));
        tokio::fs::write(&file, &bytes).await?;

        info!(file = %file.display(), bytes = bytes.len(), "statement saved");
        Ok(file)
    }
}

/// `statement_{filter}_{YYYY-MM-DD}.pdf`
pub fn statement_filename(period: Period, date: NaiveDate) -> String {
    format!("statement_{}_{}.pdf", period.as_str(), date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, CLIENT_ID, USER_ID};
    use super::*;
    use crate::models::EntryKind;
    use tempfile::TempDir;
    use wiremock::matchers::{
        body_json, header_exists, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn query_needing_account_is_a_preview() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("POST"))
            .and(path("/transactions/query"))
            .and(body_json(json!({
                "query": "paid 500 for office rent",
                "client_id": CLIENT_ID,
                "user_id": USER_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "status_code": 200,
                "message": "Select an account",
                "data": { "type": "expense", "amount": 500, "description": "office rent" },
                "meta": { "requires": "bank_account_id" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client
            .create_transaction_from_query("paid 500 for office rent", None)
            .await
            .unwrap();

        match outcome {
            QueryOutcome::NeedsAccountSelection { draft, message } => {
                assert_eq!(draft.kind.as_deref(), Some("expense"));
                assert_eq!(draft.amount, Some(json!(500)));
                assert_eq!(draft.description.as_deref(), Some("office rent"));
                assert_eq!(message, "Select an account");
            }
            other => panic!("expected preview, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn query_with_account_completes() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("POST"))
            .and(path("/transactions/query"))
            .and(body_json(json!({
                "query": "paid 500 for office rent",
                "bank_account_id": "acc_1",
                "client_id": CLIENT_ID,
                "user_id": USER_ID
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "status_code": 201,
                "message": "Transaction created",
                "data": { "id": "tx_1" }
            })))
            .mount(&server)
            .await;

        let outcome = client
            .create_transaction_from_query("paid 500 for office rent", Some("acc_1"))
            .await
            .unwrap();
        match outcome {
            QueryOutcome::Completed(envelope) => {
                assert_eq!(envelope.message, "Transaction created");
                assert_eq!(envelope.data, Some(json!({ "id": "tx_1" })));
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn requires_marker_only_counts_with_status_200() {
        let envelope = Envelope {
            success: true,
            status_code: 202,
            message: String::new(),
            data: None,
            error: None,
            meta: Some(json!({ "requires": "bank_account_id" })),
        };
        assert!(matches!(
            QueryOutcome::from_envelope(envelope),
            QueryOutcome::Completed(_)
        ));
    }

    #[test]
    fn unsuccessful_query_envelope_is_rejected() {
        let envelope = Envelope {
            success: false,
            status_code: 422,
            message: "Could not understand query".to_string(),
            data: None,
            error: None,
            meta: None,
        };
        assert!(matches!(
            QueryOutcome::from_envelope(envelope),
            QueryOutcome::Rejected(_)
        ));
    }

    #[tokio::test]
    async fn create_transaction_stamps_identity() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("POST"))
            .and(path("/transactions/"))
            .and(body_json(json!({
                "bank_account_id": "acc_1",
                "type": "income",
                "amount": "1500",
                "description": "Consulting",
                "include_gst": true,
                "client_id": CLIENT_ID,
                "user_id": USER_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let tx = NewTransaction {
            bank_account_id: "acc_1".to_string(),
            kind: EntryKind::Income,
            amount: "1500".to_string(),
            description: "Consulting".to_string(),
            include_gst: true,
        };
        assert!(client.create_transaction(&tx).await.unwrap().success);
    }

    #[tokio::test]
    async fn update_sends_identity_in_query_and_changes_in_body() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("PUT"))
            .and(path("/transactions/update"))
            .and(query_param("transaction_id", "tx_9"))
            .and(query_param("user_id", USER_ID))
            .and(query_param("client_id", CLIENT_ID))
            .and(body_json(json!({ "description": "Corrected" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let update = TransactionUpdate {
            description: Some("Corrected".to_string()),
            ..TransactionUpdate::default()
        };
        assert!(client.update_transaction("tx_9", &update).await.unwrap().success);
    }

    #[tokio::test]
    async fn delete_sends_identity_in_query() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("DELETE"))
            .and(path("/transactions/delete"))
            .and(query_param("transaction_id", "tx_9"))
            .and(query_param("user_id", USER_ID))
            .and(query_param("client_id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.delete_transaction("tx_9").await.unwrap().success);
    }

    #[tokio::test]
    async fn history_without_range_omits_dates() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("GET"))
            .and(path("/transactions/history"))
            .and(query_param("filter_type", "this_week"))
            .and(query_param_is_missing("start_date"))
            .and(query_param_is_missing("end_date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "transactions": [
                    { "id": "tx_1", "type": "expense", "amount": "20.00", "description": "Tea" }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = client
            .transaction_history(Period::ThisWeek, None)
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(history.transactions.len(), 1);
        assert_eq!(history.transactions[0].description.as_deref(), Some("Tea"));
    }

    #[tokio::test]
    async fn history_with_range_sends_both_dates() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("GET"))
            .and(path("/transactions/history"))
            .and(query_param("start_date", "2026-01-01"))
            .and(query_param("end_date", "2026-01-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        };
        client
            .transaction_history(Period::ThisMonth, Some(range))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn total_balance_reads_summary() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("GET"))
            .and(path("/transactions/total_balance"))
            .and(query_param("period", "this_month"))
            .and(query_param("user_id", USER_ID))
            .and(query_param("client_id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "summary": {
                    "income": 1000, "expense": 400, "loan_payable": 0,
                    "loan_receivable": 50, "total": 650
                }}
            })))
            .mount(&server)
            .await;

        let summary = client
            .total_balance(Period::ThisMonth)
            .await
            .unwrap()
            .into_data()
            .and_then(|report| report.summary)
            .unwrap();
        assert_eq!(summary.total, 650.0);
        assert_eq!(summary.loan_receivable, 50.0);
    }

    #[tokio::test]
    async fn statement_is_saved_with_dated_filename() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);
        let pdf = b"%PDF-1.7 fake".to_vec();

        Mock::given(method("GET"))
            .and(path("/transactions/download_statement"))
            .and(query_param("filter_type", "last_week"))
            .and(query_param("user_id", USER_ID))
            .and(query_param("client_id", CLIENT_ID))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(pdf.clone())
                    .insert_header("content-type", "application/pdf"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = client
            .download_statement(Period::LastWeek, dir.path())
            .await
            .unwrap();

        let name = file.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("statement_last_week_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(std::fs::read(&file).unwrap(), pdf);
    }

    #[tokio::test]
    async fn statement_failure_has_fixed_message() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("GET"))
            .and(path("/transactions/download_statement"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
            .mount(&server)
            .await;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = client
            .download_statement(Period::Today, dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to download statement");
    }

    #[test]
    fn statement_filename_embeds_filter_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        assert_eq!(
            statement_filename(Period::ThisMonth, date),
            "statement_this_month_2026-10-07.pdf"
        );
    }
}
