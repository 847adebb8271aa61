//! Per-customer aggregate: running balance and transaction history.
//!
//! Maintains the invariant: `balance == Σ deposits − Σ withdraws` over `history`.

use crate::money::Money;
use crate::transaction::{ParsedTransaction, TransactionType};
use serde::Serialize;

/// One applied transaction in a customer's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub amount: Money,
    pub kind: TransactionType,
}

/// A customer's state after all valid transactions seen so far.
///
/// # Overdrafts
///
/// Withdrawals are not limited by the balance, so `balance` may go negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAggregate {
    customer_id: String,
    balance: Money,
    history: Vec<HistoryEntry>,
}

impl CustomerAggregate {
    /// Creates an aggregate with a zero balance and no history.
    pub fn new(customer_id: impl Into<String>) -> Self {
        CustomerAggregate {
            customer_id: customer_id.into(),
            balance: Money::ZERO,
            history: Vec::new(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Applied transactions in input order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Balance after applying `tx`, or `None` if it would overflow.
    pub fn balance_after(&self, tx: &ParsedTransaction) -> Option<Money> {
        match tx.kind {
            TransactionType::Deposit => self.balance.checked_add(tx.amount),
            TransactionType::Withdraw => self.balance.checked_sub(tx.amount),
        }
    }

    /// Applies a transaction to the balance and records it.
    ///
    /// Returns `false` and leaves the aggregate untouched on overflow.
    pub fn apply(&mut self, tx: &ParsedTransaction) -> bool {
        debug_assert_eq!(tx.customer_id, self.customer_id);

        let Some(balance) = self.balance_after(tx) else {
            return false;
        };
        self.balance = balance;
        self.history.push(HistoryEntry {
            amount: tx.amount,
            kind: tx.kind,
        });
        true
    }

    /// Recomputes the balance from the history alone.
    pub fn balance_from_history(&self) -> Option<Money> {
        self.history
            .iter()
            .try_fold(Money::ZERO, |acc, e| acc.checked_add(e.kind.signed(e.amount)))
    }
}

/// Row of the balances export.
#[derive(Debug, Serialize)]
pub struct BalanceRow<'a> {
    pub customer_id: &'a str,
    pub balance: Money,
    pub transactions: usize,
}

impl<'a> From<&'a CustomerAggregate> for BalanceRow<'a> {
    fn from(aggregate: &'a CustomerAggregate) -> Self {
        BalanceRow {
            customer_id: &aggregate.customer_id,
            balance: aggregate.balance,
            transactions: aggregate.history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: TransactionType, amount: &str) -> ParsedTransaction {
        ParsedTransaction {
            customer_id: "C1".to_string(),
            kind,
            amount: Money::parse(amount).unwrap(),
        }
    }

    #[test]
    fn test_new_aggregate_is_empty() {
        let agg = CustomerAggregate::new("C1");
        assert_eq!(agg.customer_id(), "C1");
        assert!(agg.balance().is_zero());
        assert!(agg.history().is_empty());
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let mut agg = CustomerAggregate::new("C1");
        assert!(agg.apply(&tx(TransactionType::Deposit, "100.00")));
        assert!(agg.apply(&tx(TransactionType::Withdraw, "30.00")));

        assert_eq!(agg.balance().to_string(), "70.00");
        assert_eq!(agg.history().len(), 2);
        assert_eq!(agg.history()[0].kind, TransactionType::Deposit);
        assert_eq!(agg.history()[1].amount.to_string(), "30.00");
    }

    #[test]
    fn test_overdraft_allowed() {
        let mut agg = CustomerAggregate::new("C1");
        assert!(agg.apply(&tx(TransactionType::Withdraw, "25")));
        assert_eq!(agg.balance().currency(), "$-25.00");
    }

    #[test]
    fn test_overflow_leaves_aggregate_untouched() {
        let max = ParsedTransaction {
            customer_id: "C1".to_string(),
            kind: TransactionType::Deposit,
            amount: Money::MAX,
        };
        let mut agg = CustomerAggregate::new("C1");
        assert!(agg.apply(&max));
        assert!(!agg.apply(&max));

        assert_eq!(agg.balance(), Money::MAX);
        assert_eq!(agg.history().len(), 1);

        let withdraw_max = ParsedTransaction {
            kind: TransactionType::Withdraw,
            ..max
        };
        let mut overdrawn = CustomerAggregate::new("C1");
        assert!(overdrawn.apply(&withdraw_max));
        assert!(!overdrawn.apply(&withdraw_max));
        assert_eq!(overdrawn.balance(), -Money::MAX);
    }

    #[test]
    fn test_balance_matches_history() {
        let mut agg = CustomerAggregate::new("C1");
        for (kind, amount) in [
            (TransactionType::Deposit, "10.10"),
            (TransactionType::Withdraw, "3.33"),
            (TransactionType::Deposit, "0.01"),
            (TransactionType::Withdraw, "50"),
        ] {
            assert!(agg.apply(&tx(kind, amount)));
            assert_eq!(Some(agg.balance()), agg.balance_from_history());
        }
    }

    #[test]
    fn test_balance_row() {
        let mut agg = CustomerAggregate::new("C1");
        assert!(agg.apply(&tx(TransactionType::Deposit, "5")));
        let row = BalanceRow::from(&agg);
        assert_eq!(row.customer_id, "C1");
        assert_eq!(row.transactions, 1);
        assert_eq!(row.balance.to_string(), "5.00");
    }
}
