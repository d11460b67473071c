// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use finboard_client::models::{EntryKind, Period};

/// finboard - bookkeeping dashboard client
#[derive(Parser)]
#[command(name = "finboard", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FINBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with a one-time code sent by SMS
    Otp {
        #[command(subcommand)]
        command: OtpCommands,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a usable session exists
    Status,

    /// This month's totals and all accounts
    Dashboard,

    /// Bank and cash accounts
    Accounts {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Financial year, currency and GST settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Ledgers
    Ledgers {
        #[command(subcommand)]
        command: LedgerCommands,
    },

    /// Transactions, balances and statements
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },

    /// Inventory items
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
}

#[derive(Subcommand)]
pub enum OtpCommands {
    /// Send a code to a phone number
    Request {
        #[arg(long)]
        phone: String,
    },
    /// Submit the received code
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    List,
    /// Add a bank account
    AddBank {
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        bank: String,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
    /// Add (or top up) the cash account
    AddCash {
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    /// Create or update the settings
    Save {
        /// First day of the financial year (YYYY-MM-DD)
        #[arg(long)]
        year_start: NaiveDate,
        #[arg(long, default_value = "INR")]
        currency: String,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long, default_value = "Asia/Kolkata")]
        timezone: String,
        /// GST rate in percent; enables GST when given
        #[arg(long)]
        gst_rate: Option<f64>,
    },
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    Add {
        #[arg(long)]
        name: String,
        /// income, expense, loan_payable or loan_receivable
        #[arg(long, value_parser = parse_kind)]
        kind: EntryKind,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Transactions for a period, optionally narrowed to a date range
    History {
        #[arg(long, value_parser = parse_period, default_value = "this_month")]
        period: Period,
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Record a transaction from structured fields
    Add {
        #[arg(long)]
        account: String,
        #[arg(long, value_parser = parse_kind)]
        kind: EntryKind,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        gst: bool,
    },
    /// Change fields of an existing transaction
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long, value_parser = parse_kind)]
        kind: Option<EntryKind>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        gst: Option<bool>,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Describe a transaction in plain words
    Query {
        text: String,
        /// Account to book against; asked for when omitted
        #[arg(long)]
        account: Option<String>,
    },
    /// Download the PDF statement
    Statement {
        #[arg(long, value_parser = parse_period, default_value = "this_month")]
        period: Period,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Income, expense and loan totals
    Balance {
        #[arg(long, value_parser = parse_period, default_value = "this_month")]
        period: Period,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    Add {
        #[arg(long)]
        account: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        unit_price: String,
        #[arg(long)]
        total_value: String,
        #[arg(long, default_value = "")]
        unit: String,
    },
}

fn parse_period(s: &str) -> Result<Period, String> {
    Period::from_str(s).ok_or_else(|| {
        format!("unknown period '{s}' (today, yesterday, this_week, last_week, this_month)")
    })
}

fn parse_kind(s: &str) -> Result<EntryKind, String> {
    EntryKind::from_str(s).ok_or_else(|| {
        format!("unknown type '{s}' (income, expense, loan_payable, loan_receivable)")
    })
}
