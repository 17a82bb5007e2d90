use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::application::BooksService;
use crate::domain::{Amount, BalanceSheetEntry, JournalEntry, LedgerBalance};

/// Default workbook file name; an existing file is overwritten.
pub const DEFAULT_WORKBOOK: &str = "accounting_data.xlsx";

/// Database snapshot for full JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub journal: Vec<JournalEntry>,
    pub ledger: Vec<LedgerBalance>,
    pub balance_sheet: Vec<BalanceSheetEntry>,
}

/// Row counts written to an exported workbook.
#[derive(Debug, Clone, Copy)]
pub struct WorkbookSummary {
    pub journal_rows: usize,
    pub ledger_rows: usize,
    pub balance_sheet_rows: usize,
}

/// Exporter for converting the three tables to external formats
pub struct Exporter<'a> {
    service: &'a BooksService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BooksService) -> Self {
        Self { service }
    }

    /// Export journal, ledger and balance sheet into a single workbook with
    /// one named sheet per table. Overwrites any existing file at `path`.
    pub async fn export_workbook(&self, path: &Path) -> Result<WorkbookSummary> {
        let journal = self.service.list_journal().await?;
        let ledger = self.service.list_ledger().await?;
        let balance_sheet = self.service.list_balance_sheet().await?;

        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name("Journal")?;
        write_header(
            sheet,
            &["ID", "Date", "Account", "Description", "Debit", "Credit"],
        )?;
        for (i, entry) in journal.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_number(row, 0, entry.id as f64)?;
            sheet.write_string(row, 1, entry.date.to_string())?;
            sheet.write_string(row, 2, &entry.account)?;
            sheet.write_string(row, 3, &entry.description)?;
            sheet.write_number(row, 4, amount_to_f64(entry.debit)?)?;
            sheet.write_number(row, 5, amount_to_f64(entry.credit)?)?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name("Ledger")?;
        write_header(sheet, &["ID", "Account", "Balance"])?;
        for (i, balance) in ledger.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_number(row, 0, balance.id as f64)?;
            sheet.write_string(row, 1, &balance.account)?;
            sheet.write_number(row, 2, amount_to_f64(balance.balance)?)?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name("Balance Sheet")?;
        write_header(sheet, &["ID", "Account", "Category", "Amount"])?;
        for (i, entry) in balance_sheet.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_number(row, 0, entry.id as f64)?;
            sheet.write_string(row, 1, &entry.account)?;
            sheet.write_string(row, 2, entry.category.as_str())?;
            sheet.write_number(row, 3, amount_to_f64(entry.amount)?)?;
        }

        workbook
            .save(path)
            .with_context(|| format!("Failed to write workbook: {}", path.display()))?;

        Ok(WorkbookSummary {
            journal_rows: journal.len(),
            ledger_rows: ledger.len(),
            balance_sheet_rows: balance_sheet.len(),
        })
    }

    /// Export journal entries to CSV format
    pub async fn export_journal_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_journal().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "account", "description", "debit", "credit"])?;

        let mut count = 0;
        for entry in &entries {
            csv_writer.write_record(&[
                entry.id.to_string(),
                entry.date.to_string(),
                entry.account.clone(),
                entry.description.clone(),
                entry.debit.to_string(),
                entry.credit.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export ledger balances to CSV format
    pub async fn export_ledger_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let balances = self.service.list_ledger().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "account", "balance"])?;

        let mut count = 0;
        for balance in &balances {
            csv_writer.write_record(&[
                balance.id.to_string(),
                balance.account.clone(),
                balance.balance.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export balance sheet entries to CSV format
    pub async fn export_balance_sheet_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_balance_sheet().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "account", "category", "amount"])?;

        let mut count = 0;
        for entry in &entries {
            csv_writer.write_record(&[
                entry.id.to_string(),
                entry.account.clone(),
                entry.category.as_str().to_string(),
                entry.amount.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all three tables as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let journal = self.service.list_journal().await?;
        let ledger = self.service.list_ledger().await?;
        let balance_sheet = self.service.list_balance_sheet().await?;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            journal,
            ledger,
            balance_sheet,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

fn amount_to_f64(amount: Amount) -> Result<f64> {
    amount.to_f64().context("Amount out of f64 range")
}
