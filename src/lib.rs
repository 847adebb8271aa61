//! # Transaction Report
//!
//! Reads bank transaction records from CSV, validates them, and aggregates
//! per-customer balances and histories. Records that fail validation are
//! collected with the reasons they were rejected.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts use `rust_decimal`, rounded only for display
//! - **Nothing lost**: every record is either aggregated or rejected
//! - **Strict invariants**: `balance == Σ deposits − Σ withdraws` per customer
//! - **Deterministic output**: customers in first-seen order, records in input order
//!
//! ## Example
//!
//! ```no_run
//! use transaction_report::{report, run};
//!
//! let result = run("bank_data_copy.csv");
//! report::write_report(std::io::stdout(), &result).unwrap();
//! report::write_rejected(std::io::stdout(), &result.rejected).unwrap();
//! ```

pub mod account;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod report;
pub mod transaction;

pub use account::{CustomerAggregate, HistoryEntry};
pub use config::Config;
pub use engine::{ingest_file, run, RejectedRecord, RunResult, RunTotals, TransactionIngestor};
pub use error::{ReportError, Result};
pub use money::{AmountError, Money};
pub use transaction::{
    reason, validate, ParsedTransaction, RawRecord, TransactionType, ValidationFailure,
};
