//! Transaction records: raw CSV rows, validation, and the typed result.

use crate::money::{AmountError, Money};
use std::fmt;

/// Minimum number of fields a record needs: customer id, type, amount.
pub const REQUIRED_FIELDS: usize = 3;

/// One input line as read from the CSV file, fields untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawRecord {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&csv::StringRecord> for RawRecord {
    fn from(record: &csv::StringRecord) -> Self {
        RawRecord::new(record.iter())
    }
}

/// Renders as `['C2', 'transfer', '50']`, with backslashes and quotes escaped.
impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let escaped = field.replace('\\', "\\\\").replace('\'', "\\'");
            write!(f, "'{}'", escaped)?;
        }
        f.write_str("]")
    }
}

/// Kind of a valid transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Credits the customer's balance.
    Deposit,
    /// Debits the customer's balance. Overdrafts are allowed.
    Withdraw,
}

impl TransactionType {
    /// Parses a type field, ignoring surrounding whitespace and case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Some(TransactionType::Deposit),
            "withdraw" => Some(TransactionType::Withdraw),
            _ => None,
        }
    }

    /// Lowercase name, as written in input files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
        }
    }

    /// Capitalized name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdraw => "Withdraw",
        }
    }

    /// The amount's effect on a balance.
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            TransactionType::Deposit => amount,
            TransactionType::Withdraw => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated transaction ready to be applied to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    /// Trimmed customer identifier
    pub customer_id: String,

    pub kind: TransactionType,

    /// Never negative
    pub amount: Money,
}

/// A single reason a record was rejected.
///
/// Variants are declared in the order their messages appear in a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationFailure {
    MissingFields,
    InvalidType,
    NonNumericAmount,
    NegativeAmount,
    /// The amount, or the balance or total it would produce, does not fit in [`Money`].
    AmountOutOfRange,
}

impl ValidationFailure {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFields => "Missing fields in record.",
            ValidationFailure::InvalidType => "Invalid transaction type.",
            ValidationFailure::NonNumericAmount => "Non-numeric transaction amount.",
            ValidationFailure::NegativeAmount => "Negative transaction amount.",
            ValidationFailure::AmountOutOfRange => "Transaction amount out of range.",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Joins failure messages into the reason string shown for a rejected record.
pub fn reason(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ValidationFailure::message)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validates a raw record.
///
/// A short record fails with [`ValidationFailure::MissingFields`] alone.
/// Otherwise the type and the amount are checked independently and every
/// failure found is returned, type first.
pub fn validate(record: &RawRecord) -> Result<ParsedTransaction, Vec<ValidationFailure>> {
    let fields = record.fields();
    if fields.len() < REQUIRED_FIELDS {
        return Err(vec![ValidationFailure::MissingFields]);
    }

    let mut failures = Vec::new();

    let kind = TransactionType::parse(&fields[1]);
    if kind.is_none() {
        failures.push(ValidationFailure::InvalidType);
    }

    let amount = match Money::parse(&fields[2]) {
        Ok(amount) if amount.is_negative() => {
            failures.push(ValidationFailure::NegativeAmount);
            None
        }
        Ok(amount) => Some(amount),
        Err(AmountError::OutOfRange { negative: true }) => {
            failures.push(ValidationFailure::NegativeAmount);
            None
        }
        Err(AmountError::OutOfRange { negative: false }) => {
            failures.push(ValidationFailure::AmountOutOfRange);
            None
        }
        Err(AmountError::NotANumber) => {
            failures.push(ValidationFailure::NonNumericAmount);
            None
        }
    };

    match (kind, amount) {
        (Some(kind), Some(amount)) => Ok(ParsedTransaction {
            customer_id: fields[0].trim().to_string(),
            kind,
            amount,
        }),
        _ => Err(failures),
    }
}
