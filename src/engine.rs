//! Core ingestion engine.
//!
//! Validates records in input order, routes each one either into a customer
//! aggregate or into the rejected list, and keeps the run totals used for the
//! average transaction amount.

use crate::account::{BalanceRow, CustomerAggregate};
use crate::error::{ReportError, Result};
use crate::money::Money;
use crate::transaction::{self, ParsedTransaction, RawRecord, ValidationFailure};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A record that failed validation, with every failure found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub raw: RawRecord,
    pub failures: Vec<ValidationFailure>,
}

impl RejectedRecord {
    /// Space-joined failure messages.
    pub fn reason(&self) -> String {
        transaction::reason(&self.failures)
    }
}

/// Sum and count of all valid transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunTotals {
    pub total_amount: Money,
    pub valid_count: usize,
}

impl RunTotals {
    /// Average transaction amount, or `None` when nothing was valid.
    pub fn average(&self) -> Option<Money> {
        self.total_amount.average_over(self.valid_count)
    }
}

/// Everything a run produces.
///
/// When `error` is set the run was aborted by a file-level failure and all
/// other fields are empty.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Customers in first-valid-transaction order.
    pub customers: Vec<CustomerAggregate>,

    /// Rejected records in input order.
    pub rejected: Vec<RejectedRecord>,

    pub totals: RunTotals,

    pub error: Option<ReportError>,
}

impl RunResult {
    /// An empty result carrying a file-level failure.
    pub fn failure(err: ReportError) -> Self {
        RunResult {
            error: Some(err),
            ..RunResult::default()
        }
    }

    pub fn customer(&self, customer_id: &str) -> Option<&CustomerAggregate> {
        self.customers
            .iter()
            .find(|c| c.customer_id() == customer_id)
    }

    pub fn average(&self) -> Option<Money> {
        self.totals.average()
    }

    /// Writes customer balances as CSV, in aggregate order.
    pub fn write_balances<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.customers.is_empty() {
            csv_writer.write_record(["customer_id", "balance", "transactions"])?;
        }
        for customer in &self.customers {
            csv_writer.serialize(BalanceRow::from(customer))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// The transaction ingestor.
///
/// Single pass, single owner: every record is applied or rejected as soon as
/// it is read.
#[derive(Debug, Default)]
pub struct TransactionIngestor {
    /// Aggregates in creation order.
    customers: Vec<CustomerAggregate>,

    /// Customer id to position in `customers`.
    index: HashMap<String, usize>,

    rejected: Vec<RejectedRecord>,

    totals: RunTotals,

    records_seen: usize,
}

impl TransactionIngestor {
    /// Creates an empty ingestor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads CSV from `reader`, skipping the header line.
    ///
    /// Blank lines after the header are ingested as empty records. Invalid
    /// records are logged at warn level and collected. A read failure stops
    /// processing and is returned.
    pub fn process_csv<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(input.as_slice());
        csv_reader.byte_headers()?;

        // The csv reader skips blank lines; recover them from the bytes it
        // consumed ahead of each record.
        let mut start = byte_offset(csv_reader.position(), input.len());
        let mut record = StringRecord::new();
        loop {
            let more = csv_reader.read_record(&mut record)?;
            let end = byte_offset(csv_reader.position(), input.len()).max(start);

            let after_cr = start > 0 && input[start - 1] == b'\r';
            for _ in 0..leading_blank_lines(&input[start..end], after_cr) {
                self.ingest_record(RawRecord::default());
            }

            if !more {
                break;
            }
            self.ingest_record(RawRecord::from(&record));
            start = end;
        }

        Ok(())
    }

    /// Validates one record and applies or rejects it.
    pub fn ingest_record(&mut self, raw: RawRecord) {
        self.records_seen += 1;
        let record_num = self.records_seen;

        match transaction::validate(&raw) {
            Ok(tx) => {
                if self.apply(&tx) {
                    debug!(
                        "Record {}: {} {} for customer {}",
                        record_num, tx.kind, tx.amount, tx.customer_id
                    );
                } else {
                    self.reject(record_num, raw, vec![ValidationFailure::AmountOutOfRange]);
                }
            }
            Err(failures) => self.reject(record_num, raw, failures),
        }
    }

    fn reject(&mut self, record_num: usize, raw: RawRecord, failures: Vec<ValidationFailure>) {
        let rejected = RejectedRecord { raw, failures };
        warn!(
            "Record {}: rejected {}: {}",
            record_num,
            rejected.raw,
            rejected.reason()
        );
        self.rejected.push(rejected);
    }

    /// Applies a valid transaction to its customer and the totals.
    ///
    /// Returns `false`, changing nothing, if the customer's balance or the
    /// running total would overflow.
    fn apply(&mut self, tx: &ParsedTransaction) -> bool {
        let total_amount = match self.totals.total_amount.checked_add(tx.amount) {
            Some(total) => total,
            None => return false,
        };

        let applied = match self.index.get(&tx.customer_id) {
            Some(&position) => self.customers[position].apply(tx),
            None => {
                let mut customer = CustomerAggregate::new(tx.customer_id.clone());
                let applied = customer.apply(tx);
                if applied {
                    self.index.insert(tx.customer_id.clone(), self.customers.len());
                    self.customers.push(customer);
                }
                applied
            }
        };

        if applied {
            self.totals.total_amount = total_amount;
            self.totals.valid_count += 1;
        }
        applied
    }

    /// Number of records ingested so far, valid or not.
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    pub fn into_result(self) -> RunResult {
        RunResult {
            customers: self.customers,
            rejected: self.rejected,
            totals: self.totals,
            error: None,
        }
    }
}

/// Ingests the CSV file at `path`.
///
/// The file handle is dropped before returning, on success or failure.
pub fn ingest_file(path: &Path) -> Result<RunResult> {
    let display = path.display().to_string();

    let file = File::open(path).map_err(|e| ReportError::for_file(&display, e.into()))?;

    let mut ingestor = TransactionIngestor::new();
    ingestor
        .process_csv(file)
        .map_err(|e| ReportError::for_file(&display, e))?;

    debug!(
        "Ingested {} records from {}",
        ingestor.records_seen(),
        display
    );
    Ok(ingestor.into_result())
}

fn byte_offset(position: &csv::Position, len: usize) -> usize {
    usize::try_from(position.byte()).map_or(len, |byte| byte.min(len))
}

/// Counts the empty lines at the start of `consumed`.
///
/// `after_cr` is set when the previous record ended on `\r`, in which case a
/// leading `\n` completes that record's CRLF terminator rather than a blank line.
fn leading_blank_lines(consumed: &[u8], after_cr: bool) -> usize {
    let mut bytes = consumed;
    if after_cr && bytes.first() == Some(&b'\n') {
        bytes = &bytes[1..];
    }

    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                count += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => count += 1,
            _ => break,
        }
        i += 1;
    }
    count
}

/// Runs the ingestor over the file at `path`.
///
/// File-level failures are returned inside an otherwise empty [`RunResult`]
/// for the caller to report; partial results are discarded.
pub fn run<P: AsRef<Path>>(path: P) -> RunResult {
    match ingest_file(path.as_ref()) {
        Ok(result) => result,
        Err(err) => {
            debug!("Run aborted: {}", err);
            RunResult::failure(err)
        }
    }
}
