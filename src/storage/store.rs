use async_trait::async_trait;
use thiserror::Error;

use crate::domain::LedgerEntry;

/// Failures raised by a ledger store. The wallet service never interprets
/// these; they are handed back to the caller as-is.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another writer appended first; the entry was built against a stale ledger.
    #[error("Ledger append conflict: sequence {sequence} is not next in line")]
    Conflict { sequence: i64 },

    #[error("Storage backend error: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Durable, append-only storage for one wallet's ledger.
///
/// Implementations must make `append_entry` a compare-and-append: it only
/// succeeds when `entry.sequence` directly follows the last stored entry.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The most recently appended entry, or `None` on an empty ledger.
    async fn last_entry(&self) -> Result<Option<LedgerEntry>, StoreError>;

    /// Append one entry after the current last entry.
    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;
}
