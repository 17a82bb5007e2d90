use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Amount, EntryId, JournalEntry};

/// Net balance for one account. The ledger is regenerated in full on every
/// rebuild; rows never survive from a previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub id: EntryId,
    pub account: String,
    pub balance: Amount,
}

impl LedgerBalance {
    pub fn new(account: impl Into<String>, balance: Amount) -> Self {
        Self {
            id: 0, // Will be assigned by storage
            account: account.into(),
            balance,
        }
    }
}

/// Aggregate journal entries into one net balance per distinct account.
/// balance = sum of debits - sum of credits
///
/// An account whose debits and credits cancel still yields a row with
/// balance exactly zero. Results are ordered by account name.
pub fn summarize_journal(entries: &[JournalEntry]) -> Vec<LedgerBalance> {
    let mut totals: BTreeMap<&str, Amount> = BTreeMap::new();

    for entry in entries {
        *totals.entry(entry.account.as_str()).or_insert(Amount::ZERO) +=
            entry.debit - entry.credit;
    }

    totals
        .into_iter()
        .map(|(account, balance)| LedgerBalance::new(account, balance))
        .collect()
}
