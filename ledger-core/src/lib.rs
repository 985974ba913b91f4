//! ledger-core: transaction types, monthly aggregation, and the category palette

pub mod aggregate;
pub mod palette;
pub mod transaction;

pub use aggregate::{Aggregates, MonthlyCategoryBucket, MonthlyTotal, SignGroup};
pub use palette::CategoryColorMap;
pub use transaction::{Transaction, month_start};
