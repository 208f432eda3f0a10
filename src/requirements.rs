//! Required multiset
//!
//! Values that must appear in every reported combination, each with a minimum number of
//! occurrences. Built once per request with strict parsing.

use rustc_hash::FxHashMap;

use crate::{
    amounts::{AmountError, normalize_strict},
    pool::Pool,
};

/// A required value that the pool cannot supply often enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortfall {
    /// Required value in minor units
    pub value: i64,

    /// Number of occurrences demanded
    pub required: usize,

    /// Number of occurrences in the pool
    pub available: usize,
}

/// Minimum occurrence counts keyed by minor-unit value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredMultiset {
    counts: FxHashMap<i64, usize>,
}

impl RequiredMultiset {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the multiset from must-include text, one occurrence per entry.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails strict parsing.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, AmountError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut required = Self::new();

        for text in texts {
            required.insert(normalize_strict(text.as_ref())?);
        }

        Ok(required)
    }

    /// Adds one required occurrence of `value`.
    pub fn insert(&mut self, value: i64) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Required count for `value` (zero if not required).
    pub fn count_of(&self, value: i64) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Whether nothing is required.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Required `(value, count)` pairs in ascending value order.
    pub fn requirements(&self) -> Vec<(i64, usize)> {
        let mut pairs: Vec<(i64, usize)> = self
            .counts
            .iter()
            .map(|(&value, &count)| (value, count))
            .collect();

        pairs.sort_unstable();
        pairs
    }

    /// Whether the given selection of values meets every requirement.
    pub fn is_satisfied_by(&self, values: impl IntoIterator<Item = i64>) -> bool {
        if self.counts.is_empty() {
            return true;
        }

        let mut seen: FxHashMap<i64, usize> = FxHashMap::default();

        for value in values {
            if self.counts.contains_key(&value) {
                *seen.entry(value).or_insert(0) += 1;
            }
        }

        self.counts
            .iter()
            .all(|(value, &count)| seen.get(value).copied().unwrap_or(0) >= count)
    }

    /// Checks that the pool holds enough of every required value.
    ///
    /// # Errors
    ///
    /// Returns the smallest required value whose demand exceeds its supply.
    pub fn check_supply(&self, pool: &Pool) -> Result<(), Shortfall> {
        for (value, required) in self.requirements() {
            let available = pool.count_of(value);

            if available < required {
                return Err(Shortfall {
                    value,
                    required,
                    available,
                });
            }
        }

        Ok(())
    }
}
