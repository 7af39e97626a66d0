use rust_decimal::Decimal;

use super::{Amount, Balance, Deposit, LedgerEntry, Withdrawal, format_amount};

/// Derive the current balance from the last ledger entry.
/// An empty ledger has a balance of zero.
pub fn current_balance(last: Option<&LedgerEntry>) -> Balance {
    last.map_or_else(Balance::zero, |entry| Balance::new(entry.balance_after()))
}

/// Sequence number the next appended entry must carry.
pub fn next_sequence(last: Option<&LedgerEntry>) -> i64 {
    last.map_or(1, |entry| entry.sequence + 1)
}

/// Build the entry that records a deposit on top of `last`.
/// Deposits are non-negative, so they can never break the non-negative balance
/// invariant, but the new balance must still fit in a `Decimal`.
pub fn plan_deposit(
    last: Option<&LedgerEntry>,
    deposit: &Deposit,
) -> Result<LedgerEntry, LedgerError> {
    let balance = current_balance(last);
    if balance.amount.checked_add(deposit.amount()).is_none() {
        return Err(LedgerError::BalanceOverflow {
            balance: balance.amount,
            amount: deposit.amount(),
        });
    }
    Ok(LedgerEntry::new(
        next_sequence(last),
        balance.amount,
        deposit.amount(),
    ))
}

/// Build the entry that records a withdrawal on top of `last`, or reject it
/// when it exceeds the current balance.
pub fn plan_withdrawal(
    last: Option<&LedgerEntry>,
    withdrawal: &Withdrawal,
) -> Result<LedgerEntry, LedgerError> {
    let balance = current_balance(last);
    if withdrawal.amount() > balance.amount {
        return Err(LedgerError::InsufficientBalance {
            balance: balance.amount,
            requested: withdrawal.amount(),
        });
    }

    let delta = if withdrawal.amount().is_zero() {
        Decimal::ZERO
    } else {
        -withdrawal.amount()
    };
    Ok(LedgerEntry::new(next_sequence(last), balance.amount, delta))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InsufficientBalance { balance: Amount, requested: Amount },
    BalanceOverflow { balance: Amount, amount: Amount },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InsufficientBalance { balance, requested } => {
                write!(
                    f,
                    "Withdrawal of {} exceeds current balance of {}",
                    format_amount(*requested),
                    format_amount(*balance)
                )
            }
            LedgerError::BalanceOverflow { balance, amount } => {
                write!(
                    f,
                    "Deposit of {} would overflow the balance of {}",
                    format_amount(*amount),
                    format_amount(*balance)
                )
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Result of replaying a full ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub entry_count: usize,
    pub balance: Balance,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Replay every entry in order and check that the chain is consistent:
/// sequences are contiguous from 1, each entry starts where the previous one
/// ended, and no running balance is negative.
pub fn verify_entries(entries: &[LedgerEntry]) -> IntegrityReport {
    let mut issues = Vec::new();
    let mut expected_before = Decimal::ZERO;

    for (index, entry) in entries.iter().enumerate() {
        let expected_sequence = index as i64 + 1;
        if entry.sequence != expected_sequence {
            issues.push(format!(
                "Entry {} has sequence {}, expected {}",
                entry.id, entry.sequence, expected_sequence
            ));
        }

        if entry.balance_before != expected_before {
            issues.push(format!(
                "Entry #{} starts from {} but the previous balance was {}",
                entry.sequence,
                format_amount(entry.balance_before),
                format_amount(expected_before)
            ));
        }

        let Some(after) = entry.balance_before.checked_add(entry.amount) else {
            issues.push(format!(
                "Entry #{} overflows the balance: {} + {}",
                entry.sequence,
                format_amount(entry.balance_before),
                format_amount(entry.amount)
            ));
            break;
        };
        if after.is_sign_negative() && !after.is_zero() {
            issues.push(format!(
                "Entry #{} leaves a negative balance of {}",
                entry.sequence,
                format_amount(after)
            ));
        }

        expected_before = after;
    }

    IntegrityReport {
        entry_count: entries.len(),
        balance: Balance::new(expected_before),
        issues,
    }
}
