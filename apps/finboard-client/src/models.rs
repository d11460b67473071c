// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Types exchanged with the identity and resource backends, plus the
//! persisted [`SessionRecord`].
//!
//! ## Model Categories
//!
//! - **Session**: the record written to durable storage after login
//! - **Accounts**: bank and cash accounts
//! - **Financial settings**: per-tenant bookkeeping configuration
//! - **Ledgers / Transactions / Inventory**: bookkeeping entries
//!
//! Field names follow the backend's JSON exactly; amounts keep whatever
//! representation the backend uses (numbers for account balances, strings for
//! ledger balances and transaction amounts).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Render a JSON string or number as a string; anything else is `None`.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identifier that may arrive as a JSON string or number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    scalar_string(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a string or number, got {value}"))
    })
}

/// Optional text field; numbers are rendered, other non-string values dropped.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_string(&Value::deserialize(deserializer)?))
}

// =============================================================================
// Session
// =============================================================================

/// Profile snapshot captured at login time. Never re-synchronised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

/// One authenticated login, as persisted in durable storage.
///
/// `user_id` and `client_id` are copied from the access token claims when the
/// record is assembled and are never changed independently afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub access_token: String,
    /// Stored for completeness; no refresh flow exists.
    pub refresh_token: String,
    pub user_id: String,
    pub client_id: String,
    pub user: UserProfile,
}

/// Identity fields stamped onto outgoing domain requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub client_id: String,
    pub user_id: String,
    pub access_token: String,
}

impl From<&SessionRecord> for Identity {
    fn from(record: &SessionRecord) -> Self {
        Self {
            client_id: record.client_id.clone(),
            user_id: record.user_id.clone(),
            access_token: record.access_token.clone(),
        }
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Classification shared by ledgers and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
    LoanPayable,
    LoanReceivable,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
            EntryKind::LoanPayable => "loan_payable",
            EntryKind::LoanReceivable => "loan_receivable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            "loan_payable" => Some(EntryKind::LoanPayable),
            "loan_receivable" => Some(EntryKind::LoanReceivable),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting window for history, statements and balance totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    #[default]
    ThisMonth,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Yesterday => "yesterday",
            Period::ThisWeek => "this_week",
            Period::LastWeek => "last_week",
            Period::ThisMonth => "this_month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Period::Today),
            "yesterday" => Some(Period::Yesterday),
            "this_week" => Some(Period::ThisWeek),
            "last_week" => Some(Period::LastWeek),
            "this_month" => Some(Period::ThisMonth),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit date window for transaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_name: String,
    pub account_type: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBankAccount {
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
    pub balance: f64,
}

// =============================================================================
// Financial Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSettingsInput {
    pub financial_year_start: NaiveDate,
    pub currency_code: String,
    pub language: String,
    pub timezone: String,
    pub gst_enabled: bool,
    pub gst_rate: f64,
}

impl Default for FinancialSettingsInput {
    fn default() -> Self {
        Self {
            financial_year_start: chrono::Utc::now().date_naive(),
            currency_code: "INR".to_string(),
            language: "en".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            gst_enabled: false,
            gst_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSettings {
    pub id: String,
    pub financial_year_start: String,
    pub currency_code: String,
    pub language: String,
    pub timezone: String,
    pub gst_enabled: bool,
    pub gst_rate: Value,
}

// =============================================================================
// Ledgers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub balance: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedger {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub balance: f64,
}

/// Pagination metadata returned alongside ledger pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total_pages: u32,
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub bank_account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub bank_account_id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: String,
    pub description: String,
    pub include_gst: bool,
}

/// Partial update; only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_gst: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionHistory {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Draft produced by the natural-language endpoint before an account is chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expense: f64,
    #[serde(default)]
    pub loan_payable: f64,
    #[serde(default)]
    pub loan_receivable: f64,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    #[serde(default)]
    pub summary: Option<BalanceSummary>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub bank_account_id: String,
    pub item_name: String,
    pub description: String,
    pub category: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_value: String,
    pub unit: String,
}
