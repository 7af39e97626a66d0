use thiserror::Error;

use crate::domain::{Amount, AmountError, LedgerError};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: Amount, requested: Amount },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Ledger integrity check failed: {0}")]
    LedgerCorrupted(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// True for errors caused by the request itself rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InsufficientBalance { .. } | AppError::InvalidAmount(_)
        )
    }
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { balance, requested } => {
                AppError::InsufficientBalance { balance, requested }
            }
            overflow @ LedgerError::BalanceOverflow { .. } => {
                AppError::InvalidAmount(overflow.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Store(StoreError::Backend(err))
    }
}
