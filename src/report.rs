//! Text rendering of a run: the customer report and the rejected-record list.

use crate::engine::{RejectedRecord, RunResult};
use std::io::{self, Write};

const REPORT_TITLE: &str = "PiXELL River Transaction Report";

/// Writes per-customer balances and histories, then the average amount.
pub fn write_report<W: Write>(mut out: W, result: &RunResult) -> io::Result<()> {
    writeln!(out, "{}", REPORT_TITLE)?;
    writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()))?;
    writeln!(out)?;

    for customer in &result.customers {
        writeln!(out, "Customer ID: {}", customer.customer_id())?;
        writeln!(out, "Balance: {}", customer.balance().currency())?;
        writeln!(out, "Transaction History:")?;
        for entry in customer.history() {
            writeln!(out, "\t{}: {}", entry.kind.label(), entry.amount.currency())?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    match result.average() {
        Some(average) => writeln!(out, "AVERAGE TRANSACTION AMOUNT: {}", average.currency())?,
        None => writeln!(out, "No valid transactions to calculate average.")?,
    }

    Ok(())
}

/// Writes the rejected-record section.
pub fn write_rejected<W: Write>(mut out: W, rejected: &[RejectedRecord]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "REJECTED RECORDS")?;
    writeln!(out, "================")?;

    if rejected.is_empty() {
        writeln!(out, "No rejected records.")?;
        return Ok(());
    }

    for record in rejected {
        writeln!(out, "REJECTED: {} | Reason: {}", record.raw, record.reason())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TransactionIngestor;
    use std::io::Cursor;

    fn render(csv: &str) -> (String, String) {
        let mut ingestor = TransactionIngestor::new();
        ingestor.process_csv(Cursor::new(csv)).unwrap();
        let result = ingestor.into_result();

        let mut report = Vec::new();
        write_report(&mut report, &result).unwrap();
        let mut rejected = Vec::new();
        write_rejected(&mut rejected, &result.rejected).unwrap();

        (
            String::from_utf8(report).unwrap(),
            String::from_utf8(rejected).unwrap(),
        )
    }

    #[test]
    fn test_report_layout() {
        let (report, _) = render(
            "customer_id,type,amount
C1,deposit,100.00
C1,withdraw,30.00",
        );

        let expected = "PiXELL River Transaction Report
===============================

Customer ID: C1
Balance: $70.00
Transaction History:
\tDeposit: $100.00
\tWithdraw: $30.00


AVERAGE TRANSACTION AMOUNT: $65.00
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_without_valid_transactions() {
        let (report, _) = render("customer_id,type,amount\nC1,nope,1\n");
        assert!(!report.contains("Customer ID"));
        assert!(report.ends_with("\nNo valid transactions to calculate average.\n"));
    }

    #[test]
    fn test_report_large_and_negative_balances() {
        let (report, _) = render(
            "customer_id,type,amount
C1,deposit,1234567.891
C2,withdraw,1500",
        );
        assert!(report.contains("Balance: $1,234,567.89"));
        assert!(report.contains("\tDeposit: $1,234,567.89"));
        assert!(report.contains("Balance: $-1,500.00"));
        assert!(report.contains("\tWithdraw: $1,500.00"));
    }

    #[test]
    fn test_no_rejected_records() {
        let (_, rejected) = render("customer_id,type,amount\nC1,deposit,1\n");
        assert_eq!(
            rejected,
            "\nREJECTED RECORDS\n================\nNo rejected records.\n"
        );
    }

    #[test]
    fn test_rejected_records_listing() {
        let (_, rejected) = render(
            "customer_id,type,amount
C2,transfer,abc

C5,deposit",
        );
        assert!(rejected.contains(
            "REJECTED: ['C2', 'transfer', 'abc'] | Reason: Invalid transaction type. Non-numeric transaction amount.\n"
        ));
        assert!(rejected.contains("REJECTED: [] | Reason: Missing fields in record.\n"));
        assert!(rejected.contains("REJECTED: ['C5', 'deposit'] | Reason: Missing fields in record.\n"));
        assert!(!rejected.contains("No rejected records."));
    }
}
