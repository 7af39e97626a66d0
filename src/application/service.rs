use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    Balance, Deposit, IntegrityReport, Withdrawal, current_balance, format_amount, plan_deposit,
    plan_withdrawal, verify_entries,
};
use crate::storage::{InMemoryStore, LedgerStore, Repository};

use super::AppError;

/// Application service providing the wallet operations.
/// This is the primary interface for any client (CLI, HTTP, tests).
///
/// Mutating operations hold `write_lock` across the whole
/// read-last-entry / validate / append sequence, so two concurrent
/// withdrawals can never both validate against the same balance.
pub struct WalletService<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: LedgerStore> WalletService<S> {
    /// Create a new wallet service on top of the given ledger store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current balance, derived from the last ledger entry.
    pub async fn get_balance(&self) -> Result<Balance, AppError> {
        let last = self.store.last_entry().await?;
        let balance = current_balance(last.as_ref());
        debug!(balance = %balance.amount, "Read balance");
        Ok(balance)
    }

    /// Add funds and return the new balance.
    /// Fails with [`AppError::InvalidAmount`] without touching the ledger
    /// when the new balance would not be representable.
    pub async fn deposit_funds(&self, deposit: Deposit) -> Result<Balance, AppError> {
        let _guard = self.write_lock.lock().await;

        let last = self.store.last_entry().await?;
        let entry = match plan_deposit(last.as_ref(), &deposit) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    amount = %deposit.amount(),
                    balance = %current_balance(last.as_ref()).amount,
                    "Rejected deposit"
                );
                return Err(err.into());
            }
        };
        self.store.append_entry(&entry).await?;

        let balance = Balance::new(entry.balance_after());
        info!(
            sequence = entry.sequence,
            amount = %deposit.amount(),
            balance = %balance.amount,
            "Deposited funds"
        );
        Ok(balance)
    }

    /// Take funds out and return the new balance.
    /// Fails with [`AppError::InsufficientBalance`] without touching the ledger
    /// when the withdrawal exceeds the current balance.
    pub async fn withdraw_funds(&self, withdrawal: Withdrawal) -> Result<Balance, AppError> {
        let _guard = self.write_lock.lock().await;

        let last = self.store.last_entry().await?;
        let entry = match plan_withdrawal(last.as_ref(), &withdrawal) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    requested = %withdrawal.amount(),
                    balance = %current_balance(last.as_ref()).amount,
                    "Rejected withdrawal"
                );
                return Err(err.into());
            }
        };
        self.store.append_entry(&entry).await?;

        let balance = Balance::new(entry.balance_after());
        info!(
            sequence = entry.sequence,
            amount = %withdrawal.amount(),
            balance = %balance.amount,
            "Withdrew funds"
        );
        Ok(balance)
    }
}

impl WalletService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Number of entries recorded so far.
    pub async fn entry_count(&self) -> Result<i64, AppError> {
        Ok(self.store.count_entries().await?)
    }

    /// Replay the whole ledger and report any broken invariant.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let entries = self.store.list_entries().await?;
        let report = verify_entries(&entries);
        if !report.is_healthy() {
            warn!(issues = report.issues.len(), "Ledger integrity issues found");
        } else {
            debug!(
                entries = report.entry_count,
                balance = %format_amount(report.balance.amount),
                "Ledger is consistent"
            );
        }
        Ok(report)
    }
}

impl WalletService<InMemoryStore> {
    /// A wallet whose ledger only lives as long as the process.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}
