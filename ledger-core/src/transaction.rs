//! Cleaned transaction type shared across the pipeline.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single validated bank transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Free-text category label from the export
    pub category: String,
    /// Positive = credit/income, negative or zero = debit/spend
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
        }
    }

    /// Returns true if this transaction belongs to the gain partition.
    pub fn is_gain(&self) -> bool {
        self.amount > 0.0
    }

    /// Returns true if this transaction belongs to the spend partition.
    pub fn is_spend(&self) -> bool {
        self.amount <= 0.0
    }

    /// This transaction's date truncated to the first of its month.
    pub fn month(&self) -> NaiveDate {
        month_start(self.date)
    }
}

/// Truncate a date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("first of month is always a valid date")
}
