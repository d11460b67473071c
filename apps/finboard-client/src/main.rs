// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

mod cli;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{
    AccountCommands, Cli, Commands, InventoryCommands, LedgerCommands, OtpCommands,
    SettingsCommands, TxCommands,
};
use finboard_client::api::QueryOutcome;
use finboard_client::auth::{AuthError, GateDecision};
use finboard_client::config::{ClientConfig, ConfigError, LogFormat};
use finboard_client::dashboard::load_dashboard;
use finboard_client::error::ApiError;
use finboard_client::models::{
    DateRange, FinancialSettingsInput, NewBankAccount, NewInventoryItem, NewLedger,
    NewTransaction, PageMeta, TransactionUpdate,
};
use finboard_client::state::AppState;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Not signed in. Run `finboard login` first.")]
    SignedOut,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(args: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let state = AppState::bootstrap(config);

    match args.command {
        Commands::Login { email, password } => {
            let session = state.auth.login_with_password(&email, &password).await?;
            println!("Signed in as {} (client {})", session.user_id, session.client_id);
        }
        Commands::Otp { command } => match command {
            OtpCommands::Request { phone } => {
                print_json(&state.auth.request_one_time_code(&phone).await?)?;
            }
            OtpCommands::Verify { phone, code } => {
                let verification = state.auth.verify_one_time_code(&phone, &code).await?;
                match verification.session {
                    Some(session) => println!("Signed in as {}", session.user_id),
                    None => print_json(&verification.response)?,
                }
            }
        },
        Commands::Logout => {
            state.auth.logout()?;
            println!("Signed out");
        }
        Commands::Status => match state.gate_decision() {
            GateDecision::Admit => match state.current_session() {
                Some(session) => println!(
                    "Signed in as {} (client {})",
                    session.user_id, session.client_id
                ),
                None => println!("Signed in"),
            },
            GateDecision::Redirect { to } => println!("Not signed in (login at {to})"),
            GateDecision::Pending => println!("Starting up"),
        },
        command => {
            require_session(&state)?;
            run_protected(&state, command).await?;
        }
    }

    Ok(())
}

fn require_session(state: &AppState) -> Result<(), CliError> {
    match state.gate_decision() {
        GateDecision::Admit => Ok(()),
        _ => Err(CliError::SignedOut),
    }
}

async fn run_protected(state: &AppState, command: Commands) -> Result<(), CliError> {
    let api = &state.api;

    match command {
        Commands::Dashboard => {
            let snapshot = load_dashboard(api).await;
            let b = snapshot.balance;
            println!(
                "Income {:.2}  Expense {:.2}  Payable {:.2}  Receivable {:.2}  Total {:.2}",
                b.income, b.expense, b.loan_payable, b.loan_receivable, b.total
            );
            for account in snapshot.accounts {
                println!(
                    "{:<24} {:<6} {:>12.2}",
                    account.account_name, account.account_type, account.balance
                );
            }
        }
        Commands::Accounts { command } => match command {
            AccountCommands::List => print_json(&api.list_accounts().await?)?,
            AccountCommands::AddBank {
                name,
                number,
                bank,
                balance,
            } => {
                let account = NewBankAccount {
                    account_name: name,
                    account_number: number,
                    bank_name: bank,
                    balance,
                };
                print_json(&api.create_bank_account(&account).await?)?;
            }
            AccountCommands::AddCash { balance } => {
                print_json(&api.create_cash_account(balance).await?)?;
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show => print_json(&api.financial_settings().await?)?,
            SettingsCommands::Save {
                year_start,
                currency,
                language,
                timezone,
                gst_rate,
            } => {
                let input = FinancialSettingsInput {
                    financial_year_start: year_start,
                    currency_code: currency,
                    language,
                    timezone,
                    gst_enabled: gst_rate.is_some(),
                    gst_rate: gst_rate.unwrap_or(0.0),
                };
                print_json(&api.save_financial_settings(&input).await?)?;
            }
        },
        Commands::Ledgers { command } => match command {
            LedgerCommands::List { page, size } => {
                let envelope = api.list_ledgers(page, size).await?;
                if let Some(meta) = envelope.meta_as::<PageMeta>() {
                    println!("Page {page} of {}", meta.total_pages);
                }
                print_json(&envelope)?;
            }
            LedgerCommands::Add {
                name,
                kind,
                balance,
            } => {
                let ledger = NewLedger {
                    name,
                    kind,
                    balance,
                };
                print_json(&api.create_ledger(&ledger).await?)?;
            }
        },
        Commands::Tx { command } => run_tx(state, command).await?,
        Commands::Inventory { command } => match command {
            InventoryCommands::Add {
                account,
                name,
                description,
                category,
                quantity,
                unit_price,
                total_value,
                unit,
            } => {
                let item = NewInventoryItem {
                    bank_account_id: account,
                    item_name: name,
                    description,
                    category,
                    quantity,
                    unit_price,
                    total_value,
                    unit,
                };
                print_json(&api.create_inventory_item(&item).await?)?;
            }
        },
        Commands::Login { .. } | Commands::Otp { .. } | Commands::Logout | Commands::Status => {}
    }

    Ok(())
}

async fn run_tx(state: &AppState, command: TxCommands) -> Result<(), CliError> {
    let api = &state.api;

    match command {
        TxCommands::History { period, start, end } => {
            let range = start
                .zip(end)
                .map(|(start, end)| DateRange { start, end });
            print_json(&api.transaction_history(period, range).await?)?;
        }
        TxCommands::Add {
            account,
            kind,
            amount,
            description,
            gst,
        } => {
            let tx = NewTransaction {
                bank_account_id: account,
                kind,
                amount,
                description,
                include_gst: gst,
            };
            print_json(&api.create_transaction(&tx).await?)?;
        }
        TxCommands::Update {
            id,
            account,
            kind,
            amount,
            description,
            gst,
        } => {
            let update = TransactionUpdate {
                bank_account_id: account,
                kind,
                amount,
                description,
                include_gst: gst,
            };
            print_json(&api.update_transaction(&id, &update).await?)?;
        }
        TxCommands::Delete { id } => print_json(&api.delete_transaction(&id).await?)?,
        TxCommands::Query { text, account } => {
            match api
                .create_transaction_from_query(&text, account.as_deref())
                .await?
            {
                QueryOutcome::Completed(envelope) => print_json(&envelope)?,
                QueryOutcome::Rejected(envelope) => {
                    println!("Not created: {}", envelope.message);
                }
                QueryOutcome::NeedsAccountSelection { draft, message } => {
                    println!("{message}");
                    print_json(&draft)?;
                    println!("Re-run with --account <id>. Accounts:");
                    if let Some(accounts) = api.list_accounts().await?.into_data() {
                        for account in accounts {
                            println!("  {}  {}", account.id, account.account_name);
                        }
                    }
                }
            }
        }
        TxCommands::Statement { period, out } => {
            let file = api.download_statement(period, &out).await?;
            println!("Saved {}", file.display());
        }
        TxCommands::Balance { period } => print_json(&api.total_balance(period).await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
