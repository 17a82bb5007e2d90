use chrono::NaiveDate;

use crate::domain::{
    summarize_journal, Amount, BalanceSheetEntry, JournalEntry, LedgerBalance,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations for the books.
/// This is the primary interface for any client (CLI, menu, exporter).
pub struct BooksService {
    repo: Repository,
}

impl BooksService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path (created if missing).
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

    // ========================
    // Journal operations
    // ========================

    /// Post a new journal entry. The account is normalized to upper case;
    /// debit and credit must be non-negative. Nothing is written when
    /// validation fails.
    pub async fn post_entry(
        &self,
        date: NaiveDate,
        account: &str,
        description: &str,
        debit: Amount,
        credit: Amount,
    ) -> Result<JournalEntry, AppError> {
        if debit < Amount::ZERO {
            return Err(AppError::NegativeAmount {
                field: "debit",
                amount: debit,
            });
        }
        if credit < Amount::ZERO {
            return Err(AppError::NegativeAmount {
                field: "credit",
                amount: credit,
            });
        }

        let mut entry = JournalEntry::new(date, account, description, debit, credit);
        self.repo.append_entry(&mut entry).await?;
        Ok(entry)
    }

    /// List all journal entries in insertion order.
    pub async fn list_journal(&self) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self.repo.list_journal().await?)
    }

    // ========================
    // Aggregation pipeline
    // ========================

    /// Rebuild the ledger from the full journal: the previous snapshot is
    /// discarded and one net balance per account is written in its place.
    /// Returns the new snapshot.
    pub async fn rebuild_ledger(&self) -> Result<Vec<LedgerBalance>, AppError> {
        let entries = self.repo.list_journal().await?;
        let mut balances = summarize_journal(&entries);
        self.repo.replace_ledger(&mut balances).await?;
        Ok(balances)
    }

    /// Rebuild the balance sheet from the current ledger snapshot (not the
    /// journal: a stale ledger yields a matching stale balance sheet).
    /// Returns the new snapshot.
    pub async fn rebuild_balance_sheet(&self) -> Result<Vec<BalanceSheetEntry>, AppError> {
        let balances = self.repo.list_ledger().await?;
        let mut entries: Vec<BalanceSheetEntry> = balances
            .iter()
            .map(BalanceSheetEntry::from_balance)
            .collect();
        self.repo.replace_balance_sheet(&mut entries).await?;
        Ok(entries)
    }

    // ========================
    // Snapshot reads
    // ========================

    /// List the current ledger snapshot. Stale until `rebuild_ledger` is
    /// called after new journal entries; staleness is the caller's problem.
    pub async fn list_ledger(&self) -> Result<Vec<LedgerBalance>, AppError> {
        Ok(self.repo.list_ledger().await?)
    }

    /// List the current balance sheet snapshot.
    pub async fn list_balance_sheet(&self) -> Result<Vec<BalanceSheetEntry>, AppError> {
        Ok(self.repo.list_balance_sheet().await?)
    }
}
