pub mod menu;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::BooksService;
use crate::domain::{parse_amount, BalanceSheetEntry, JournalEntry, LedgerBalance};
use crate::io::{Exporter, DEFAULT_WORKBOOK};

/// Scriba - command line bookkeeping
#[derive(Parser)]
#[command(name = "scriba")]
#[command(about = "A local-first double-entry bookkeeping journal")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "scriba.db")]
    pub database: String,

    /// Subcommand to run; omit to enter the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Post a journal entry
    Post {
        /// Entry date (YYYY-MM-DD)
        date: String,

        /// Account name (normalized to upper case)
        account: String,

        /// Debit amount (e.g. "100" or "100.50")
        debit: String,

        /// Credit amount
        credit: String,

        /// Description of the transaction
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// View all journal entries
    Journal,

    /// Rebuild the ledger from the full journal
    RebuildLedger,

    /// Rebuild the balance sheet from the current ledger snapshot
    RebuildBalanceSheet,

    /// View the ledger snapshot
    Ledger,

    /// View the balance sheet snapshot
    BalanceSheet,

    /// Export data to a spreadsheet workbook, CSV or JSON
    Export {
        /// What to export: workbook, journal, ledger, balance-sheet, full
        #[arg(default_value = "workbook")]
        export_type: String,

        /// Output file (workbook defaults to accounting_data.xlsx,
        /// other formats to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            // No subcommand: enter the interactive menu.
            // Creates the database on first use.
            let service = BooksService::init(&self.database).await?;
            return menu::run(&service).await;
        };

        match command {
            Commands::Init => {
                BooksService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Post {
                date,
                account,
                debit,
                credit,
                description,
            } => {
                let service = BooksService::connect(&self.database).await?;
                let date = parse_entry_date(&date)?;
                let debit =
                    parse_amount(&debit).context("Invalid debit amount. Use '100' or '100.50'")?;
                let credit =
                    parse_amount(&credit).context("Invalid credit amount. Use '100' or '100.50'")?;

                let entry = service
                    .post_entry(date, &account, &description, debit, credit)
                    .await?;

                println!(
                    "Posted journal entry #{}: {} {} (debit {}, credit {})",
                    entry.id, entry.date, entry.account, entry.debit, entry.credit
                );
            }

            Commands::Journal => {
                let service = BooksService::connect(&self.database).await?;
                print_journal(&service.list_journal().await?);
            }

            Commands::RebuildLedger => {
                let service = BooksService::connect(&self.database).await?;
                let balances = service.rebuild_ledger().await?;
                println!(
                    "Journal entries converted to ledger ({} accounts).",
                    balances.len()
                );
            }

            Commands::RebuildBalanceSheet => {
                let service = BooksService::connect(&self.database).await?;
                let entries = service.rebuild_balance_sheet().await?;
                println!(
                    "Ledger converted to balance sheet ({} accounts).",
                    entries.len()
                );
            }

            Commands::Ledger => {
                let service = BooksService::connect(&self.database).await?;
                print_ledger(&service.list_ledger().await?);
            }

            Commands::BalanceSheet => {
                let service = BooksService::connect(&self.database).await?;
                print_balance_sheet(&service.list_balance_sheet().await?);
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = BooksService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &BooksService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    if export_type == "workbook" {
        let path = output.unwrap_or(DEFAULT_WORKBOOK);
        let summary = exporter.export_workbook(Path::new(path)).await?;
        println!("Data exported to {}.", path);
        eprintln!(
            "  {} journal entries, {} ledger balances, {} balance sheet entries",
            summary.journal_rows, summary.ledger_rows, summary.balance_sheet_rows
        );
        return Ok(());
    }

    // Determine output writer for the text formats
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "journal" => {
            let count = exporter.export_journal_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} journal entries", count);
            }
        }
        "ledger" => {
            let count = exporter.export_ledger_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} ledger balances", count);
            }
        }
        "balance-sheet" => {
            let count = exporter.export_balance_sheet_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} balance sheet entries", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} journal entries, {} ledger balances, {} balance sheet entries",
                    snapshot.journal.len(),
                    snapshot.ledger.len(),
                    snapshot.balance_sheet.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: workbook, journal, ledger, balance-sheet, full",
                export_type
            );
        }
    }

    Ok(())
}

pub(crate) fn parse_entry_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")
}

pub(crate) fn print_journal(entries: &[JournalEntry]) {
    if entries.is_empty() {
        println!("No journal entries found.");
        return;
    }

    println!(
        "{:<6} {:<12} {:<20} {:>12} {:>12}  DESCRIPTION",
        "ID", "DATE", "ACCOUNT", "DEBIT", "CREDIT"
    );
    println!("{}", "-".repeat(80));
    for entry in entries {
        println!(
            "{:<6} {:<12} {:<20} {:>12} {:>12}  {}",
            entry.id,
            entry.date.to_string(),
            truncate(&entry.account, 20),
            entry.debit.to_string(),
            entry.credit.to_string(),
            truncate(&entry.description, 30)
        );
    }
}

pub(crate) fn print_ledger(balances: &[LedgerBalance]) {
    if balances.is_empty() {
        println!("No ledger entries found.");
        return;
    }

    println!("{:<6} {:<20} {:>14}", "ID", "ACCOUNT", "BALANCE");
    println!("{}", "-".repeat(42));
    for balance in balances {
        println!(
            "{:<6} {:<20} {:>14}",
            balance.id,
            truncate(&balance.account, 20),
            balance.balance.to_string()
        );
    }
}

pub(crate) fn print_balance_sheet(entries: &[BalanceSheetEntry]) {
    if entries.is_empty() {
        println!("No balance sheet entries found.");
        return;
    }

    println!(
        "{:<6} {:<20} {:<12} {:>14}",
        "ID", "ACCOUNT", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(55));
    for entry in entries {
        println!(
            "{:<6} {:<20} {:<12} {:>14}",
            entry.id,
            truncate(&entry.account, 20),
            entry.category.as_str(),
            entry.amount.to_string()
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
