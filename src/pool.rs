//! Pool

use crate::amounts::{Amount, normalize_lenient, to_decimal};

/// The ordered amounts available for selection in one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pool {
    amounts: Vec<Amount>,
}

impl Pool {
    /// Builds a pool by leniently normalizing the given text.
    pub fn lenient<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            amounts: normalize_lenient(texts),
        }
    }

    /// Builds a pool from minor-unit values, using their decimal form as the source text.
    pub fn from_minor_units(values: impl IntoIterator<Item = i64>) -> Self {
        let amounts = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| Amount::new(value, to_decimal(value).to_string(), position))
            .collect();

        Self { amounts }
    }

    /// Number of amounts in the pool.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Whether the pool holds no amounts.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Returns the amount at the given position.
    pub fn get(&self, position: usize) -> Option<&Amount> {
        self.amounts.get(position)
    }

    /// Iterates over the amounts in pool order.
    pub fn iter(&self) -> impl Iterator<Item = &Amount> {
        self.amounts.iter()
    }

    /// Minor-unit values in pool order.
    pub fn values(&self) -> Vec<i64> {
        self.amounts.iter().map(Amount::value).collect()
    }

    /// Number of amounts equal to `value`.
    pub fn count_of(&self, value: i64) -> usize {
        self.amounts
            .iter()
            .filter(|amount| amount.value() == value)
            .count()
    }

    /// Sum of every negative amount.
    pub fn negative_total(&self) -> i128 {
        self.amounts
            .iter()
            .map(|amount| i128::from(amount.value().min(0)))
            .sum()
    }

    /// Sum of every positive amount.
    pub fn positive_total(&self) -> i128 {
        self.amounts
            .iter()
            .map(|amount| i128::from(amount.value().max(0)))
            .sum()
    }
}

impl From<Vec<Amount>> for Pool {
    fn from(amounts: Vec<Amount>) -> Self {
        Self { amounts }
    }
}
