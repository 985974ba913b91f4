//! CSV loader/cleaner for bank transaction exports.
//!
//! Policy is deliberately asymmetric: a row whose date cannot be parsed
//! fails the whole load, while a row whose amount is missing or not numeric
//! (banks emit sentinels like "N/A") is dropped silently.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use ledger_core::Transaction;

/// Header names of the three required columns. Exports differ per bank, so
/// these are configuration; defaults match a Chase-style export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvColumns {
    pub date: String,
    pub category: String,
    pub amount: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            date: "Transaction Date".to_string(),
            category: "Category".to_string(),
            amount: "Amount".to_string(),
        }
    }
}

/// Result of one load pass: the cleaned transactions plus how many rows the
/// amount filter discarded.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub dropped: usize,
}

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())?;
    // Two-digit-year exports ("1/6/24") come out as year 24 under %Y
    if parsed.year() < 100 {
        parsed.with_year(parsed.year() + 2000)
    } else {
        Some(parsed)
    }
}

/// Parse an amount cell, tolerating currency symbols and thousands
/// separators ("- $14.05", "$1,234.56"). `None` means the row is dropped.
fn parse_amount(s: &str) -> Option<f64> {
    let mut s = s.trim();
    if s.is_empty() {
        return None;
    }
    let negative = s.starts_with('-');
    if negative {
        s = s[1..].trim_start();
    }
    let cleaned = s.trim_start_matches('$').replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Load and clean a CSV export from disk.
pub fn load_transactions(path: impl AsRef<Path>, columns: &CsvColumns) -> Result<LoadReport> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_transactions(file, columns).with_context(|| format!("loading {}", path.display()))
}

/// Load and clean a CSV export from any reader. Tests feed in-memory CSV
/// through this entry point.
pub fn read_transactions<R: Read>(reader: R, columns: &CsvColumns) -> Result<LoadReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header row")?.clone();
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "column '{}' not found in header (available: {})",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })
    };
    let date_idx = find(&columns.date)?;
    let category_idx = find(&columns.category)?;
    let amount_idx = find(&columns.amount)?;

    let mut transactions = Vec::new();
    let mut dropped = 0usize;

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", row + 2))?;

        let date_raw = record.get(date_idx).unwrap_or("").trim();
        let date = match parse_date(date_raw) {
            Some(d) => d,
            None => bail!("row {}: unparseable date '{}'", row + 2, date_raw),
        };

        let amount = match parse_amount(record.get(amount_idx).unwrap_or("")) {
            Some(a) => a,
            None => {
                dropped += 1;
                continue;
            }
        };

        let category = record.get(category_idx).unwrap_or("").trim().to_string();
        transactions.push(Transaction::new(date, category, amount));
    }

    Ok(LoadReport {
        transactions,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<LoadReport> {
        read_transactions(csv.as_bytes(), &CsvColumns::default())
    }

    #[test]
    fn test_loads_valid_rows() {
        let report = load(
            "Transaction Date,Category,Amount\n\
             01/05/2024,Food,-20\n\
             01/10/2024,Salary,1000\n",
        )
        .unwrap();

        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.dropped, 0);
        let food = &report.transactions[0];
        assert_eq!(food.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(food.category, "Food");
        assert_eq!(food.amount, -20.0);
    }

    #[test]
    fn test_bad_amounts_dropped_silently() {
        let report = load(
            "Transaction Date,Category,Amount\n\
             01/05/2024,Food,-20\n\
             01/06/2024,Food,N/A\n\
             01/07/2024,Food,\n\
             01/20/2024,Food,-30\n",
        )
        .unwrap();

        assert_eq!(report.dropped, 2);
        // Surviving rows' sums are unaffected by the dropped ones
        let sum: f64 = report.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(sum, -50.0);
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let err = load(
            "Transaction Date,Category,Amount\n\
             01/05/2024,Food,-20\n\
             not-a-date,Food,-30\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unparseable date"), "{err}");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = load("Date,Category,Amount\n01/05/2024,Food,-20\n").unwrap_err();
        assert!(err.to_string().contains("Transaction Date"), "{err}");
    }

    #[test]
    fn test_currency_symbols_and_separators() {
        let report = load(
            "Transaction Date,Category,Amount\n\
             01/05/2024,Food,\"- $14.05\"\n\
             01/06/2024,Salary,\"$1,234.56\"\n",
        )
        .unwrap();
        assert_eq!(report.transactions[0].amount, -14.05);
        assert_eq!(report.transactions[1].amount, 1234.56);
    }

    #[test]
    fn test_alternate_date_formats() {
        let report = load(
            "Transaction Date,Category,Amount\n\
             2024-01-05,Food,-20\n\
             1/6/24,Food,-5\n",
        )
        .unwrap();
        assert_eq!(
            report.transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            report.transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_custom_column_names() {
        let columns = CsvColumns {
            date: "Posted".to_string(),
            category: "Kind".to_string(),
            amount: "Value".to_string(),
        };
        let report = read_transactions(
            "Posted,Kind,Value\n01/05/2024,Rent,-900\n".as_bytes(),
            &columns,
        )
        .unwrap();
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].category, "Rent");
    }
}
