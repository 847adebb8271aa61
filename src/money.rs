//! Exact monetary amounts with two-decimal display.
//!
//! Uses `rust_decimal` internally so balances and totals are computed without
//! floating-point drift. Values keep their full precision; rounding to cents
//! happens only when a value is displayed. Arithmetic is checked: sums that
//! leave the decimal range yield `None` instead of panicking.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Why an amount field could not be turned into [`Money`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// Not a finite number at all
    #[error("not a number")]
    NotANumber,

    /// A number, but beyond the magnitude or precision `Money` can hold
    #[error("number out of range")]
    OutOfRange { negative: bool },
}

/// A monetary amount.
///
/// # Examples
///
/// ```
/// use transaction_report::Money;
///
/// let amount = Money::parse("1234.5").unwrap();
/// assert_eq!(amount.to_string(), "1234.50");
/// assert_eq!(amount.currency(), "$1,234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places shown when displaying.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest representable amount, about 7.9e28.
    pub const MAX: Self = Money(Decimal::MAX);

    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Parses a numeric field.
    ///
    /// Surrounding whitespace is ignored. Plain and scientific notation are
    /// accepted. A well-formed finite number that does not fit in a
    /// `Decimal` is [`AmountError::OutOfRange`]; anything else, including an
    /// empty field, `inf` and `nan`, is [`AmountError::NotANumber`].
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::NotANumber);
        }

        if let Ok(value) =
            Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))
        {
            return Ok(Money(value));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Err(AmountError::OutOfRange {
                negative: value < 0.0,
            }),
            _ => Err(AmountError::NotANumber),
        }
    }

    /// Returns `true` if the value is strictly below zero. `-0` is not negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self + rhs`, or `None` on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `self - rhs`, or `None` on overflow.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Divides by a count, returning `None` for a zero count.
    pub fn average_over(self, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(count)).map(Money)
    }

    /// Value rounded half-to-even to [`DISPLAY_SCALE`](Self::DISPLAY_SCALE) places.
    fn rounded(&self) -> Decimal {
        let rounded = self.0.round_dp(Self::DISPLAY_SCALE);
        // Avoid printing "-0.00".
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }

    /// Formats the value as currency: `$`, thousands separators, two decimals.
    ///
    /// Negative values keep their sign after the symbol, e.g. `$-1,200.00`.
    pub fn currency(&self) -> String {
        let rounded = self.rounded();
        let plain = format!("{:.2}", rounded.abs());
        let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        format!("${}{}.{}", sign, grouped, cents)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
