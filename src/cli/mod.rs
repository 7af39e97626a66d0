use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::{self, ServerConfig};
use crate::application::{AppError, WalletService};
use crate::domain::{Deposit, Withdrawal, format_amount, parse_amount};

/// Online Wallet - single-account balance ledger
#[derive(Parser)]
#[command(name = "online-wallet")]
#[command(about = "A single-account wallet backed by an append-only balance ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "WALLET_DATABASE", default_value = "wallet.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Show the current balance
    Balance,

    /// Deposit funds
    Deposit {
        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw funds
    Withdraw {
        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Show ledger size and balance
    Status,

    /// Verify ledger integrity
    Check,

    /// Serve the wallet over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "WALLET_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "WALLET_PORT", default_value_t = 8080)]
        port: u16,

        /// Keep the ledger in memory instead of the database
        #[arg(long)]
        in_memory: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                WalletService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Balance => {
                let service = WalletService::connect(&self.database).await?;
                let balance = service.get_balance().await?;
                println!("Balance: {}", balance);
            }

            Commands::Deposit { amount } => {
                let service = WalletService::connect(&self.database).await?;
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let deposit = Deposit::new(amount).map_err(AppError::from)?;

                let balance = service.deposit_funds(deposit).await?;
                println!(
                    "Deposited {}. New balance: {}",
                    format_amount(deposit.amount()),
                    balance
                );
            }

            Commands::Withdraw { amount } => {
                let service = WalletService::connect(&self.database).await?;
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let withdrawal = Withdrawal::new(amount).map_err(AppError::from)?;

                let balance = service.withdraw_funds(withdrawal).await?;
                println!(
                    "Withdrew {}. New balance: {}",
                    format_amount(withdrawal.amount()),
                    balance
                );
            }

            Commands::Status => {
                let service = WalletService::connect(&self.database).await?;
                let entries = service.entry_count().await?;
                let balance = service.get_balance().await?;
                println!("Database: {}", self.database);
                println!("Entries:  {}", entries);
                println!("Balance:  {}", balance);
            }

            Commands::Check => {
                let service = WalletService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Serve {
                host,
                port,
                in_memory,
            } => {
                let config = ServerConfig { host, port };
                if in_memory {
                    api::serve(Arc::new(WalletService::in_memory()), &config).await?;
                } else {
                    let service = WalletService::init(&self.database).await?;
                    api::serve(Arc::new(service), &config).await?;
                }
            }
        }

        Ok(())
    }
}

async fn run_check_command(service: &WalletService<crate::storage::Repository>) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = service.check_integrity().await?;

    println!("Entries: {}", report.entry_count);
    println!("Balance: {}", report.balance);
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        return Err(AppError::LedgerCorrupted(format!("{} issue(s)", report.issues.len())).into());
    }

    Ok(())
}
