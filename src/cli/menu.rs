use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use crate::application::{AppError, BooksService};
use crate::domain::{parse_amount, Amount};
use crate::io::{Exporter, DEFAULT_WORKBOOK};

use super::{print_balance_sheet, print_journal, print_ledger};

/// One menu selection. Parsing is separate from dispatch so the input flow
/// is testable without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PostEntry,
    ViewJournal,
    RebuildLedger,
    RebuildBalanceSheet,
    ViewLedger,
    ViewBalanceSheet,
    Export,
    Exit,
}

impl MenuChoice {
    /// Map a raw menu input ("1".."8") to a choice.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::PostEntry),
            "2" => Some(MenuChoice::ViewJournal),
            "3" => Some(MenuChoice::RebuildLedger),
            "4" => Some(MenuChoice::RebuildBalanceSheet),
            "5" => Some(MenuChoice::ViewLedger),
            "6" => Some(MenuChoice::ViewBalanceSheet),
            "7" => Some(MenuChoice::Export),
            "8" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Fields collected for one journal entry before posting.
#[derive(Debug, Clone, PartialEq)]
struct EntryForm {
    date: NaiveDate,
    account: String,
    description: String,
    debit: Amount,
    credit: Amount,
}

/// Run the interactive menu loop until exit (choice 8) or end of input.
pub async fn run(service: &BooksService) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        prompt("Enter your choice (1-8): ")?;
        let Some(line) = next_line(&mut lines)? else {
            break;
        };

        let Some(choice) = MenuChoice::parse(&line) else {
            println!("Invalid choice. Please enter a number between 1 and 8.");
            continue;
        };

        if !dispatch(service, choice, &mut lines).await? {
            break;
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("Choose an option:");
    println!("1. Enter a journal entry");
    println!("2. View journal entries");
    println!("3. Convert journal entries to ledger");
    println!("4. Generate balance sheet from ledger");
    println!("5. View ledger");
    println!("6. View balance sheet");
    println!("7. Export data to spreadsheet");
    println!("8. Exit");
}

/// Handle one selected choice. Returns false when the loop should exit.
async fn dispatch<L>(service: &BooksService, choice: MenuChoice, lines: &mut L) -> Result<bool>
where
    L: Iterator<Item = io::Result<String>>,
{
    match choice {
        MenuChoice::PostEntry => {
            let Some(form) = read_entry(lines)? else {
                // Bad input already reported; nothing was posted.
                return Ok(true);
            };

            match service
                .post_entry(
                    form.date,
                    &form.account,
                    &form.description,
                    form.debit,
                    form.credit,
                )
                .await
            {
                Ok(_) => println!("Journal entry posted successfully."),
                Err(AppError::NegativeAmount { field, .. }) => {
                    println!("Invalid amount for {}. Amounts must not be negative.", field);
                }
                Err(err) => return Err(err.into()),
            }
        }

        MenuChoice::ViewJournal => print_journal(&service.list_journal().await?),

        MenuChoice::RebuildLedger => {
            service.rebuild_ledger().await?;
            println!("Journal entries converted to ledger.");
        }

        MenuChoice::RebuildBalanceSheet => {
            service.rebuild_balance_sheet().await?;
            println!("Ledger converted to balance sheet.");
        }

        MenuChoice::ViewLedger => print_ledger(&service.list_ledger().await?),

        MenuChoice::ViewBalanceSheet => print_balance_sheet(&service.list_balance_sheet().await?),

        MenuChoice::Export => {
            Exporter::new(service)
                .export_workbook(Path::new(DEFAULT_WORKBOOK))
                .await?;
            println!("Data exported to {}.", DEFAULT_WORKBOOK);
        }

        MenuChoice::Exit => {
            println!("Exiting the application.");
            return Ok(false);
        }
    }

    Ok(true)
}

/// Prompt for one entry's fields in order: date, account, description,
/// debit, credit. Returns None (after printing the reason) when any field
/// fails to parse or input ends; the whole entry is aborted and control
/// falls back to the menu.
fn read_entry<L>(lines: &mut L) -> Result<Option<EntryForm>>
where
    L: Iterator<Item = io::Result<String>>,
{
    prompt("Date (YYYY-MM-DD): ")?;
    let Some(raw_date) = next_line(lines)? else {
        return Ok(None);
    };
    let Ok(date) = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") else {
        println!("Invalid date format. Please try again.");
        return Ok(None);
    };

    prompt("Account: ")?;
    let Some(account) = next_line(lines)? else {
        return Ok(None);
    };

    prompt("Description: ")?;
    let Some(description) = next_line(lines)? else {
        return Ok(None);
    };

    prompt("Debit: ")?;
    let Some(raw_debit) = next_line(lines)? else {
        return Ok(None);
    };
    let Ok(debit) = parse_amount(&raw_debit) else {
        println!("Invalid amount for debit. Please enter a number.");
        return Ok(None);
    };

    prompt("Credit: ")?;
    let Some(raw_credit) = next_line(lines)? else {
        return Ok(None);
    };
    let Ok(credit) = parse_amount(&raw_credit) else {
        println!("Invalid amount for credit. Please enter a number.");
        return Ok(None);
    };

    Ok(Some(EntryForm {
        date,
        account: account.trim().to_string(),
        description: description.trim().to_string(),
        debit,
        credit,
    }))
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    io::stdout().flush()?;
    Ok(())
}

fn next_line<L>(lines: &mut L) -> Result<Option<String>>
where
    L: Iterator<Item = io::Result<String>>,
{
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn input_lines(inputs: &[&str]) -> std::vec::IntoIter<io::Result<String>> {
        inputs
            .iter()
            .map(|s| Ok(s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::PostEntry));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::ViewJournal));
        assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::RebuildLedger));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::RebuildBalanceSheet));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::ViewLedger));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::ViewBalanceSheet));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Export));
        assert_eq!(MenuChoice::parse("8"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse(" 8 "), Some(MenuChoice::Exit));
    }

    #[test]
    fn test_menu_choice_parse_invalid() {
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_read_entry_complete() {
        let mut lines = input_lines(&["2024-01-01", "cash", "seed money", "1000", "0"]);
        let form = read_entry(&mut lines).unwrap().unwrap();

        assert_eq!(form.date.to_string(), "2024-01-01");
        assert_eq!(form.account, "cash");
        assert_eq!(form.description, "seed money");
        assert_eq!(form.debit, Amount::from_str("1000").unwrap());
        assert_eq!(form.credit, Amount::ZERO);
    }

    #[test]
    fn test_read_entry_rejects_bad_date() {
        // Slashes instead of dashes abort the whole entry
        let mut lines = input_lines(&["2024/01/01"]);
        assert_eq!(read_entry(&mut lines).unwrap(), None);
    }

    #[test]
    fn test_read_entry_rejects_bad_debit() {
        let mut lines = input_lines(&["2024-01-01", "CASH", "seed", "lots", "0"]);
        assert_eq!(read_entry(&mut lines).unwrap(), None);
    }

    #[test]
    fn test_read_entry_rejects_bad_credit() {
        let mut lines = input_lines(&["2024-01-01", "CASH", "seed", "0", "many"]);
        assert_eq!(read_entry(&mut lines).unwrap(), None);
    }

    #[test]
    fn test_read_entry_stops_at_end_of_input() {
        let mut lines = input_lines(&["2024-01-01", "CASH"]);
        assert_eq!(read_entry(&mut lines).unwrap(), None);
    }
}
