// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use online_wallet::application::WalletService;
use online_wallet::domain::{Amount, Balance, Deposit, Withdrawal};
use online_wallet::storage::Repository;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(WalletService<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = WalletService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a decimal literal
pub fn amount(value: &str) -> Amount {
    Amount::from_str(value).unwrap()
}

pub async fn deposit(service: &WalletService<Repository>, value: &str) -> Result<Balance> {
    Ok(service
        .deposit_funds(Deposit::new(amount(value))?)
        .await?)
}

pub async fn withdraw(service: &WalletService<Repository>, value: &str) -> Result<Balance> {
    Ok(service
        .withdraw_funds(Withdrawal::new(amount(value))?)
        .await?)
}
