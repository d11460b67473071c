// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bank and cash account endpoints.
//!
//! | Operation | Identity fields |
//! |-----------|-----------------|
//! | `POST /accounts/bank` | `client_id`, `user_id`, `token` in body |
//! | `POST /accounts/cash` | `client_id`, `user_id`, `token` in body |
//! | `GET /accounts/{client_id}/{user_id}` | path |

use reqwest::Method;
use serde_json::{json, Value};

use super::{stamp, Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::{Account, NewBankAccount};

impl ResourceClient {
    pub async fn create_bank_account(
        &self,
        account: &NewBankAccount,
    ) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let mut body = stamp(account, &identity, true)?;
        body["account_type"] = json!("bank");
        self.request(Method::POST, "/accounts/bank", Some(&body)).await
    }

    pub async fn create_cash_account(&self, balance: f64) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let body = stamp(&json!({ "balance": balance }), &identity, true)?;
        self.request(Method::POST, "/accounts/cash", Some(&body)).await
    }

    pub async fn list_accounts(&self) -> Result<Envelope<Vec<Account>>, ApiError> {
        let identity = self.identity()?;
        let path = format!("/accounts/{}/{}", identity.client_id, identity.user_id);
        self.request(Method::GET, &path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, CLIENT_ID, USER_ID};
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn bank_account_body_carries_identity_and_token() {
        let server = MockServer::start().await;
        let (client, store) = client(&server, true);
        let token = store.load().unwrap().access_token;

        Mock::given(method("POST"))
            .and(path("/accounts/bank"))
            .and(body_partial_json(json!({
                "account_name": "Operating",
                "account_number": "000123",
                "bank_name": "HDFC",
                "balance": 2500.0,
                "account_type": "bank",
                "client_id": CLIENT_ID,
                "user_id": USER_ID,
                "token": token
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true, "status_code": 201, "message": "Account created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client
            .create_bank_account(&NewBankAccount {
                account_name: "Operating".to_string(),
                account_number: "000123".to_string(),
                bank_name: "HDFC".to_string(),
                balance: 2500.0,
            })
            .await
            .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message, "Account created");
    }

    #[tokio::test]
    async fn cash_account_body_carries_identity_and_token() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("POST"))
            .and(path("/accounts/cash"))
            .and(body_partial_json(json!({
                "balance": 100.0,
                "client_id": CLIENT_ID,
                "user_id": USER_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.create_cash_account(100.0).await.unwrap().success);
    }

    #[tokio::test]
    async fn list_accounts_uses_identity_path() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("GET"))
            .and(path(format!("/accounts/{CLIENT_ID}/{USER_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "status_code": 200,
                "message": "ok",
                "data": [
                    { "id": "acc_1", "account_name": "Cash", "account_type": "cash", "balance": 40.5 },
                    { "id": "acc_2", "account_name": "Operating", "account_type": "bank",
                      "balance": 1200, "bank_name": "HDFC", "account_number": "000123" }
                ]
            })))
            .mount(&server)
            .await;

        let accounts = client.list_accounts().await.unwrap().into_data().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].balance, 40.5);
        assert_eq!(accounts[1].bank_name.as_deref(), Some("HDFC"));
    }

    #[tokio::test]
    async fn domain_calls_require_a_session() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, false);

        let err = client.list_accounts().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
