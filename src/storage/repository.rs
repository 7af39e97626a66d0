use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::LedgerEntry;

use super::{LedgerStore, MIGRATION_001_INITIAL, StoreError};

/// SQLite-backed ledger store.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// List every entry in ledger order.
    pub async fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT sequence, id, balance_before, amount, created_at
            FROM ledger_entries
            ORDER BY sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list ledger entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Number of entries in the ledger.
    pub async fn count_entries(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM ledger_entries")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count ledger entries")?
            .get("count");
        Ok(count)
    }

    async fn fetch_last_entry(&self) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query(
            r#"
            SELECT sequence, id, balance_before, amount, created_at
            FROM ledger_entries
            ORDER BY sequence DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch last ledger entry")?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry> {
        let id_str: String = row.get("id");
        let balance_before_str: String = row.get("balance_before");
        let amount_str: String = row.get("amount");
        let created_at_str: String = row.get("created_at");

        Ok(LedgerEntry {
            id: Uuid::parse_str(&id_str).context("Invalid entry ID")?,
            sequence: row.get("sequence"),
            balance_before: Decimal::from_str(&balance_before_str)
                .with_context(|| format!("Invalid balance_before: {}", balance_before_str))?,
            amount: Decimal::from_str(&amount_str)
                .with_context(|| format!("Invalid amount: {}", amount_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl LedgerStore for Repository {
    async fn last_entry(&self) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.fetch_last_entry().await?)
    }

    /// Insert the entry only if the current last sequence is exactly one below it.
    /// The check and the insert run as a single statement, so a writer holding a
    /// stale view of the ledger gets a conflict instead of a fork.
    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO ledger_entries (sequence, id, balance_before, amount, created_at)
            SELECT ?, ?, ?, ?, ?
            WHERE (SELECT COALESCE(MAX(sequence), 0) FROM ledger_entries) = ?
            "#,
        )
        .bind(entry.sequence)
        .bind(entry.id.to_string())
        .bind(entry.balance_before.to_string())
        .bind(entry.amount.to_string())
        .bind(entry.created_at.to_rfc3339())
        .bind(entry.sequence - 1)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(StoreError::Conflict {
                sequence: entry.sequence,
            }),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Conflict {
                    sequence: entry.sequence,
                })
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to append ledger entry")
                .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    async fn test_repo() -> Result<(Repository, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("repo.db");
        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let repo = Repository::init(&url).await?;
        Ok((repo, temp_dir))
    }

    #[tokio::test]
    async fn test_empty_ledger_has_no_last_entry() -> Result<()> {
        let (repo, _temp) = test_repo().await?;
        assert!(repo.last_entry().await?.is_none());
        assert_eq!(repo.count_entries().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_and_read_back_exact_decimals() -> Result<()> {
        let (repo, _temp) = test_repo().await?;

        let first = LedgerEntry::new(1, dec!(0), dec!(100.235));
        repo.append_entry(&first).await?;
        let second = LedgerEntry::new(2, dec!(100.235), dec!(50.567));
        repo.append_entry(&second).await?;

        let last = repo.last_entry().await?.expect("ledger should not be empty");
        assert_eq!(last.id, second.id);
        assert_eq!(last.sequence, 2);
        assert_eq!(last.balance_before, dec!(100.235));
        assert_eq!(last.balance_after(), dec!(150.802));
        assert_eq!(repo.list_entries().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_rejects_stale_sequence() -> Result<()> {
        let (repo, _temp) = test_repo().await?;

        repo.append_entry(&LedgerEntry::new(1, dec!(0), dec!(10)))
            .await?;
        let stale = LedgerEntry::new(1, dec!(0), dec!(20));

        let result = repo.append_entry(&stale).await;
        assert!(matches!(result, Err(StoreError::Conflict { sequence: 1 })));
        assert_eq!(repo.count_entries().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_rejects_sequence_gap() -> Result<()> {
        let (repo, _temp) = test_repo().await?;

        let skipped = LedgerEntry::new(2, dec!(0), dec!(10));
        let result = repo.append_entry(&skipped).await;

        assert!(matches!(result, Err(StoreError::Conflict { sequence: 2 })));
        assert!(repo.last_entry().await?.is_none());
        Ok(())
    }
}
