//! Amounts
//!
//! Monetary amounts are carried as exact integers in minor units (hundredths of the major
//! unit). Text is normalized through one of two entry points:
//!
//! - [`normalize_strict`] fails on text that is not a number. Used for the target and for
//!   every must-include value.
//! - [`normalize_lenient`] silently drops text that is not a number. Used for the bulk pool,
//!   where stray blank or malformed lines are expected.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;
use tracing::debug;

/// Currency symbols stripped before parsing.
pub const CURRENCY_SYMBOLS: [char; 3] = ['$', '£', '€'];

/// Digit grouping separator stripped before parsing.
pub const GROUPING_SEPARATOR: char = ',';

/// Number of decimal places held by one minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors produced by strict normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The text does not describe a monetary amount.
    #[error("not a monetary amount: {0:?}")]
    Unparsable(String),
}

impl AmountError {
    /// Returns the offending text.
    pub fn into_text(self) -> String {
        match self {
            AmountError::Unparsable(text) => text,
        }
    }
}

/// An amount from the input pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount {
    value: i64,
    text: String,
    position: usize,
}

impl Amount {
    /// Creates a new amount.
    pub fn new(value: i64, text: impl Into<String>, position: usize) -> Self {
        Self {
            value,
            text: text.into(),
            position,
        }
    }

    /// Value in minor units.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Trimmed source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based position in the pool.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Parses decimal-looking text into minor units.
///
/// Currency symbols and grouping separators are removed, an optional sign is honoured, and
/// the value is rounded to the nearest minor unit (ties to even). Returns `None` for text
/// that does not parse or does not fit in an `i64`.
pub fn parse_minor_units(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !CURRENCY_SYMBOLS.contains(ch) && *ch != GROUPING_SEPARATOR)
        .collect();

    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return None;
    }

    let amount = Decimal::from_str(cleaned)
        .or_else(|_err| Decimal::from_scientific(cleaned))
        .ok()?;

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
}

/// Strictly normalizes a single value.
///
/// # Errors
///
/// Returns [`AmountError::Unparsable`] naming the text if it is not a monetary amount.
pub fn normalize_strict(text: &str) -> Result<i64, AmountError> {
    parse_minor_units(text).ok_or_else(|| AmountError::Unparsable(text.to_string()))
}

/// Leniently normalizes a list of values into pool amounts.
///
/// Entries that do not parse are dropped. Survivors keep their trimmed text and are numbered
/// contiguously in input order.
pub fn normalize_lenient<I, S>(texts: I) -> Vec<Amount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut amounts = Vec::new();

    for text in texts {
        let text = text.as_ref();

        match parse_minor_units(text) {
            Some(value) => {
                let position = amounts.len();
                amounts.push(Amount::new(value, text.trim(), position));
            }
            None => debug!(text, "skipping unparsable pool entry"),
        }
    }

    amounts
}

/// Restates minor units as a decimal in major units.
pub fn to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, MINOR_UNIT_SCALE)
}
