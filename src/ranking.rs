//! Ranking
//!
//! Orders found combinations longest first and turns the survivors into reportable results.

use std::{cmp::Reverse, num::NonZeroUsize};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    amounts::to_decimal,
    combinations::Combination,
    pool::Pool,
    problem::Problem,
};

/// Sorts combinations by descending length and keeps the first `limit`.
///
/// The sort is stable: combinations of equal length keep the order they were found in.
pub fn rank(mut combinations: Vec<Combination>, limit: NonZeroUsize) -> Vec<Combination> {
    combinations.sort_by_key(|combination| Reverse(combination.len()));
    combinations.truncate(limit.get());
    combinations
}

/// A pool amount as reported to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Pool position plus the display offset
    pub index: usize,

    /// Source text of the amount
    pub text: String,
}

/// One reported combination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Amounts in the combination
    pub used: Vec<Entry>,

    /// Amounts left out of the combination, ascending by position
    pub unused: Vec<Entry>,

    /// Number of amounts in the combination
    pub length: usize,

    /// The target, restated in major units
    pub sum: Decimal,

    /// The target in minor units
    #[serde(skip)]
    pub sum_minor_units: i64,
}

impl MatchResult {
    /// Builds the report for `combination`, shifting every index by `index_offset`.
    pub fn from_combination(
        combination: &Combination,
        problem: &Problem,
        index_offset: usize,
    ) -> Self {
        let pool = problem.pool();

        Self {
            used: entries(pool, combination.indices(), index_offset),
            unused: entries(pool, &combination.unused(pool.len()), index_offset),
            length: combination.len(),
            sum: to_decimal(problem.target()),
            sum_minor_units: problem.target(),
        }
    }
}

/// Builds reports for ranked combinations.
pub fn summarize(
    combinations: &[Combination],
    problem: &Problem,
    index_offset: usize,
) -> Vec<MatchResult> {
    combinations
        .iter()
        .map(|combination| MatchResult::from_combination(combination, problem, index_offset))
        .collect()
}

fn entries(pool: &Pool, indices: &[usize], index_offset: usize) -> Vec<Entry> {
    indices
        .iter()
        .filter_map(|&idx| {
            pool.get(idx).map(|amount| Entry {
                index: idx.saturating_add(index_offset),
                text: amount.text().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{combinations::IndexList, requirements::RequiredMultiset};

    use super::*;

    fn combination(indices: &[usize]) -> Combination {
        Combination::new(IndexList::from_slice(indices), 0)
    }

    #[test]
    fn ranks_longest_first_and_truncates() -> TestResult {
        let found = vec![
            combination(&[0, 4]),
            combination(&[0, 1, 2]),
            combination(&[5]),
            combination(&[0, 2, 3]),
        ];

        let ranked = rank(found, NonZeroUsize::new(2).ok_or("zero")?);

        assert_eq!(ranked, vec![combination(&[0, 1, 2]), combination(&[0, 2, 3])]);

        Ok(())
    }

    #[test]
    fn ties_keep_discovery_order() -> TestResult {
        let found = vec![combination(&[1, 2]), combination(&[0, 3]), combination(&[2, 3])];

        let ranked = rank(found.clone(), NonZeroUsize::new(10).ok_or("zero")?);

        assert_eq!(ranked, found);

        Ok(())
    }

    #[test]
    fn rank_of_nothing_is_empty() -> TestResult {
        assert!(rank(Vec::new(), NonZeroUsize::new(3).ok_or("zero")?).is_empty());

        Ok(())
    }

    #[test]
    fn reports_used_and_unused_with_offset() {
        let problem = Problem::new(
            Pool::lenient(["5.00", "5.00", "3.00"]),
            RequiredMultiset::new(),
            1000,
        );

        let result = MatchResult::from_combination(&combination(&[0, 1]), &problem, 8);

        assert_eq!(
            result.used,
            vec![
                Entry {
                    index: 8,
                    text: "5.00".to_string()
                },
                Entry {
                    index: 9,
                    text: "5.00".to_string()
                },
            ]
        );
        assert_eq!(
            result.unused,
            vec![Entry {
                index: 10,
                text: "3.00".to_string()
            }]
        );
        assert_eq!(result.length, 2);
        assert_eq!(result.sum.to_string(), "10.00");
        assert_eq!(result.sum_minor_units, 1000);
    }
}
