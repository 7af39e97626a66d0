use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::LedgerEntry;

use super::{LedgerStore, StoreError};

/// Volatile ledger store. The ledger is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count_entries(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn last_entry(&self) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.entries.read().await.last().cloned())
    }

    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let last_sequence = entries.last().map_or(0, |last| last.sequence);
        if entry.sequence != last_sequence + 1 {
            return Err(StoreError::Conflict {
                sequence: entry.sequence,
            });
        }
        entries.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn test_append_in_order() {
        let store = InMemoryStore::new();
        assert!(store.last_entry().await.unwrap().is_none());

        store
            .append_entry(&LedgerEntry::new(1, dec!(0), dec!(100)))
            .await
            .unwrap();
        store
            .append_entry(&LedgerEntry::new(2, dec!(100), dec!(-40)))
            .await
            .unwrap();

        let last = store.last_entry().await.unwrap().unwrap();
        assert_eq!(last.balance_after(), dec!(60));
        assert_eq!(store.count_entries().await, 2);
    }

    #[tokio::test]
    async fn test_append_conflict_leaves_ledger_untouched() {
        let store = InMemoryStore::new();
        store
            .append_entry(&LedgerEntry::new(1, dec!(0), dec!(100)))
            .await
            .unwrap();

        let result = store
            .append_entry(&LedgerEntry::new(1, dec!(0), dec!(-100)))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict { sequence: 1 })));
        assert_eq!(store.count_entries().await, 1);
    }
}
