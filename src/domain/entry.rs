use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type EntryId = Uuid;

/// A ledger entry records one balance-changing event.
/// Entries are immutable: once appended they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// 1-based position in the ledger; the store rejects an append whose
    /// sequence does not directly follow the last stored entry
    pub sequence: i64,
    /// Running balance immediately before this event
    pub balance_before: Amount,
    /// Signed delta: positive for deposits, negative for withdrawals
    pub amount: Amount,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(sequence: i64, balance_before: Amount, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            balance_before,
            amount,
            created_at: Utc::now(),
        }
    }

    /// Running balance after this event.
    pub fn balance_after(&self) -> Amount {
        self.balance_before + self.amount
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_balance_after_deposit() {
        let entry = LedgerEntry::new(1, dec!(100.235), dec!(50.567));
        assert_eq!(entry.balance_after(), dec!(150.802));
    }

    #[test]
    fn test_balance_after_withdrawal() {
        let entry = LedgerEntry::new(2, dec!(100), dec!(-50));
        assert_eq!(entry.balance_after(), dec!(50));
    }

    #[test]
    fn test_zero_amount_keeps_balance() {
        let entry = LedgerEntry::new(1, dec!(10), Decimal::ZERO);
        assert_eq!(entry.balance_after(), dec!(10));
    }
}
