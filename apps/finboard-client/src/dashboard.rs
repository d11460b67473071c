// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page-level aggregation.
//!
//! Each page issues its fetches concurrently. A failed fetch leaves its part of
//! the page empty instead of failing the whole page; the failure is logged.

use tracing::warn;

use crate::api::{Envelope, ResourceClient};
use crate::error::ApiError;
use crate::models::{Account, BalanceSummary, Period, Transaction};

/// Overview shown after login: this month's totals plus all accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub balance: BalanceSummary,
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsPage {
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
}

pub async fn load_dashboard(client: &ResourceClient) -> DashboardSnapshot {
    let (balance, accounts) = tokio::join!(
        client.total_balance(Period::ThisMonth),
        client.list_accounts()
    );

    DashboardSnapshot {
        balance: settle("total_balance", balance)
            .and_then(|report| report.summary)
            .unwrap_or_default(),
        accounts: settle("accounts", accounts).unwrap_or_default(),
    }
}

pub async fn load_transactions_page(client: &ResourceClient, period: Period) -> TransactionsPage {
    let (history, accounts) = tokio::join!(
        client.transaction_history(period, None),
        client.list_accounts()
    );

    TransactionsPage {
        transactions: settle("transaction_history", history)
            .map(|history| history.transactions)
            .unwrap_or_default(),
        accounts: settle("accounts", accounts).unwrap_or_default(),
    }
}

/// Payload of a fetch, or `None` (logged) when it failed either way.
fn settle<T>(what: &str, result: Result<Envelope<T>, ApiError>) -> Option<T> {
    match result {
        Ok(envelope) if envelope.success => envelope.data,
        Ok(envelope) => {
            warn!(fetch = what, message = %envelope.message, "fetch reported failure");
            None
        }
        Err(e) => {
            warn!(fetch = what, error = %e, "fetch failed");
            None
        }
    }
}
