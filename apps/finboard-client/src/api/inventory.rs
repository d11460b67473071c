// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Inventory endpoint.

use reqwest::Method;
use serde_json::Value;

use super::{stamp, Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::NewInventoryItem;

impl ResourceClient {
    /// `POST /inventory/` with `client_id`/`user_id` in the body.
    pub async fn create_inventory_item(
        &self,
        item: &NewInventoryItem,
    ) -> Result<Envelope<Value>, ApiError> {
        let identity = self.identity()?;
        let body = stamp(item, &identity, false)?;
        self.request(Method::POST, "/inventory/", Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, CLIENT_ID, USER_ID};
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_item_sends_all_fields_with_identity() {
        let server = MockServer::start().await;
        let (client, _) = client(&server, true);

        Mock::given(method("POST"))
            .and(path("/inventory/"))
            .and(body_json(json!({
                "bank_account_id": "acc_1",
                "item_name": "Printer paper",
                "description": "A4, 80gsm",
                "category": "office",
                "quantity": "10",
                "unit_price": "250",
                "total_value": "2500",
                "unit": "ream",
                "client_id": CLIENT_ID,
                "user_id": USER_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "message": "Item added"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = NewInventoryItem {
            bank_account_id: "acc_1".to_string(),
            item_name: "Printer paper".to_string(),
            description: "A4, 80gsm".to_string(),
            category: "office".to_string(),
            quantity: "10".to_string(),
            unit_price: "250".to_string(),
            total_value: "2500".to_string(),
            unit: "ream".to_string(),
        };
        let envelope = client.create_inventory_item(&item).await.unwrap();
        assert_eq!(envelope.message, "Item added");
    }
}
