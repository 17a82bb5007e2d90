use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{Amount, BalanceSheetEntry, Category, JournalEntry, LedgerBalance};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting the journal and the two derived snapshots.
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

    // ========================
    // Journal operations
    // ========================

    /// Append a journal entry and assign its id. The journal is append-only;
    /// there is no update or delete.
    pub async fn append_entry(&self, entry: &mut JournalEntry) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO journal (date, account, description, debit, credit)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(entry.date.to_string())
        .bind(&entry.account)
        .bind(&entry.description)
        .bind(entry.debit.to_string())
        .bind(entry.credit.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to append journal entry")?;

        entry.id = row.get("id");
        Ok(())
    }

    /// List all journal entries in insertion order.
    pub async fn list_journal(&self) -> Result<Vec<JournalEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, account, description, debit, credit
            FROM journal
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list journal entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    // ========================
    // Ledger operations
    // ========================

    /// Replace the ledger snapshot: delete every existing row, then insert
    /// the given balances. Runs in a single transaction so readers never
    /// observe a half-rebuilt ledger. Assigns row ids as it inserts.
    pub async fn replace_ledger(&self, balances: &mut [LedgerBalance]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin ledger rebuild")?;

        sqlx::query("DELETE FROM ledger")
            .execute(&mut *tx)
            .await
            .context("Failed to clear ledger")?;

        for balance in balances.iter_mut() {
            let row = sqlx::query(
                r#"
                INSERT INTO ledger (account, balance)
                VALUES (?, ?)
                RETURNING id
                "#,
            )
            .bind(&balance.account)
            .bind(balance.balance.to_string())
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert ledger balance")?;

            balance.id = row.get("id");
        }

        tx.commit().await.context("Failed to commit ledger rebuild")?;
        Ok(())
    }

    /// List the current ledger snapshot.
    pub async fn list_ledger(&self) -> Result<Vec<LedgerBalance>> {
        let rows = sqlx::query("SELECT id, account, balance FROM ledger ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list ledger balances")?;

        rows.iter().map(Self::row_to_balance).collect()
    }

    // ========================
    // Balance sheet operations
    // ========================

    /// Replace the balance sheet snapshot in a single transaction,
    /// assigning row ids as it inserts.
    pub async fn replace_balance_sheet(&self, entries: &mut [BalanceSheetEntry]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin balance sheet rebuild")?;

        sqlx::query("DELETE FROM balance_sheet")
            .execute(&mut *tx)
            .await
            .context("Failed to clear balance sheet")?;

        for entry in entries.iter_mut() {
            let row = sqlx::query(
                r#"
                INSERT INTO balance_sheet (account, category, amount)
                VALUES (?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&entry.account)
            .bind(entry.category.as_str())
            .bind(entry.amount.to_string())
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert balance sheet entry")?;

            entry.id = row.get("id");
        }

        tx.commit()
            .await
            .context("Failed to commit balance sheet rebuild")?;
        Ok(())
    }

    /// List the current balance sheet snapshot.
    pub async fn list_balance_sheet(&self) -> Result<Vec<BalanceSheetEntry>> {
        let rows = sqlx::query("SELECT id, account, category, amount FROM balance_sheet ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list balance sheet entries")?;

        rows.iter().map(Self::row_to_sheet_entry).collect()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<JournalEntry> {
        let date_str: String = row.get("date");
        let debit_str: String = row.get("debit");
        let credit_str: String = row.get("credit");

        Ok(JournalEntry {
            id: row.get("id"),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").context("Invalid entry date")?,
            account: row.get("account"),
            description: row.get("description"),
            debit: Amount::from_str(&debit_str).context("Invalid debit amount")?,
            credit: Amount::from_str(&credit_str).context("Invalid credit amount")?,
        })
    }

    fn row_to_balance(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerBalance> {
        let balance_str: String = row.get("balance");

        Ok(LedgerBalance {
            id: row.get("id"),
            account: row.get("account"),
            balance: Amount::from_str(&balance_str).context("Invalid ledger balance")?,
        })
    }

    fn row_to_sheet_entry(row: &sqlx::sqlite::SqliteRow) -> Result<BalanceSheetEntry> {
        let category_str: String = row.get("category");
        let amount_str: String = row.get("amount");

        Ok(BalanceSheetEntry {
            id: row.get("id"),
            account: row.get("account"),
            category: Category::from_str(&category_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", category_str))?,
            amount: Amount::from_str(&amount_str).context("Invalid balance sheet amount")?,
        })
    }
}
