use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type EntryId = i64;

/// Normalize an account identifier: surrounding whitespace stripped,
/// upper-cased. Ledger grouping matches on the normalized form.
pub fn normalize_account(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A posted journal transaction. Immutable once appended; there is no
/// update or delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub account: String,
    pub description: String,
    pub debit: Amount,
    pub credit: Amount,
}

impl JournalEntry {
    /// Create an entry ready for posting.
    pub fn new(
        date: NaiveDate,
        account: impl Into<String>,
        description: impl Into<String>,
        debit: Amount,
        credit: Amount,
    ) -> Self {
        Self {
            id: 0, // Will be assigned by storage
            date,
            account: normalize_account(&account.into()),
            description: description.into().trim().to_string(),
            debit,
            credit,
        }
    }
}
