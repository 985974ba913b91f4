//! ledger-ingest: CSV bank-export ingestion (load, validate, filter)

pub mod loader;

pub use loader::{CsvColumns, LoadReport, load_transactions, read_transactions};
