use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, format_amount};

/// The account balance at a point in time. Always derived from the ledger, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Amount,
}

impl Balance {
    pub fn new(amount: Amount) -> Self {
        Self { amount }
    }

    pub fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_amount(self.amount))
    }
}

/// A request to add funds. The amount is validated to be non-negative on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    amount: Amount,
}

impl Deposit {
    pub fn new(amount: Amount) -> Result<Self, AmountError> {
        validate_non_negative(amount)?;
        Ok(Self { amount })
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// A request to take funds out. Non-negative on construction; whether it fits
/// the current balance is only known once the ledger has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    amount: Amount,
}

impl Withdrawal {
    pub fn new(amount: Amount) -> Result<Self, AmountError> {
        validate_non_negative(amount)?;
        Ok(Self { amount })
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

fn validate_non_negative(amount: Amount) -> Result<(), AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// No amount was supplied at all
    Missing,
    Negative(Amount),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Missing => write!(f, "amount is required"),
            AmountError::Negative(amount) => {
                write!(f, "amount must not be negative, got {}", amount)
            }
        }
    }
}

impl std::error::Error for AmountError {}
