use serde::{Deserialize, Serialize};

use super::{Amount, EntryId, LedgerBalance};

/// Balance sheet classification. This is a fixed three-way sign split, not
/// a chart-of-accounts mapping: positive balances are Assets, negative are
/// Liabilities, and exactly-zero balances land in Equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Assets,
    Liabilities,
    Equity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Assets => "Assets",
            Category::Liabilities => "Liabilities",
            Category::Equity => "Equity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "assets" => Some(Category::Assets),
            "liabilities" => Some(Category::Liabilities),
            "equity" => Some(Category::Equity),
            _ => None,
        }
    }

    /// Classify a net balance by sign. The zero case must stay Equity.
    pub fn for_balance(balance: Amount) -> Self {
        if balance > Amount::ZERO {
            Category::Assets
        } else if balance < Amount::ZERO {
            Category::Liabilities
        } else {
            Category::Equity
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One categorized, sign-normalized balance sheet row. Derived 1:1 from the
/// ledger snapshot and regenerated in full on every rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetEntry {
    pub id: EntryId,
    pub account: String,
    pub category: Category,
    pub amount: Amount,
}

impl BalanceSheetEntry {
    /// Derive the balance sheet row for one ledger balance. The category
    /// absorbs the sign; the amount is always non-negative.
    pub fn from_balance(balance: &LedgerBalance) -> Self {
        Self {
            id: 0, // Will be assigned by storage
            account: balance.account.clone(),
            category: Category::for_balance(balance.balance),
            amount: balance.balance.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_category_roundtrip() {
        for category in [Category::Assets, Category::Liabilities, Category::Equity] {
            let s = category.as_str();
            let parsed = Category::from_str(s).unwrap();
            assert_eq!(category, parsed);
        }
    }

    #[test]
    fn test_positive_balance_is_assets() {
        assert_eq!(Category::for_balance(dec("700")), Category::Assets);
        assert_eq!(Category::for_balance(dec("0.01")), Category::Assets);
    }

    #[test]
    fn test_negative_balance_is_liabilities() {
        assert_eq!(Category::for_balance(dec("-500")), Category::Liabilities);
        assert_eq!(Category::for_balance(dec("-0.01")), Category::Liabilities);
    }

    #[test]
    fn test_zero_balance_is_equity() {
        // Zero is Equity, never Assets or Liabilities
        assert_eq!(Category::for_balance(Amount::ZERO), Category::Equity);
        assert_eq!(Category::for_balance(dec("0.00")), Category::Equity);
    }

    #[test]
    fn test_from_balance_takes_absolute_amount() {
        let loan = LedgerBalance::new("LOAN", dec("-500"));
        let entry = BalanceSheetEntry::from_balance(&loan);

        assert_eq!(entry.account, "LOAN");
        assert_eq!(entry.category, Category::Liabilities);
        assert_eq!(entry.amount, dec("500"));
    }

    #[test]
    fn test_from_balance_zero() {
        let equip = LedgerBalance::new("EQUIP", Amount::ZERO);
        let entry = BalanceSheetEntry::from_balance(&equip);

        assert_eq!(entry.category, Category::Equity);
        assert_eq!(entry.amount, Amount::ZERO);
    }
}
