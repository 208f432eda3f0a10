//! Problem

use crate::{amounts::Amount, pool::Pool, requirements::RequiredMultiset};

/// A validated search input: the pool, the required multiset and the target.
///
/// Built once per request and read-only for the rest of it. Use
/// [`Request::prepare`](crate::request::Request::prepare) to build one from raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pool: Pool,
    required: RequiredMultiset,
    target: i64,
}

impl Problem {
    /// Creates a new problem.
    pub fn new(pool: Pool, required: RequiredMultiset, target: i64) -> Self {
        Self {
            pool,
            required,
            target,
        }
    }

    /// Amounts available for selection.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Values every combination must contain.
    pub fn required(&self) -> &RequiredMultiset {
        &self.required
    }

    /// Target sum in minor units.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Whether the pool values at `indices` satisfy the required multiset.
    pub fn meets_requirements(&self, indices: &[usize]) -> bool {
        self.required.is_satisfied_by(
            indices
                .iter()
                .filter_map(|&idx| self.pool.get(idx).map(Amount::value)),
        )
    }

    /// Sum of the pool values at `indices`.
    pub fn sum_of(&self, indices: &[usize]) -> i128 {
        indices
            .iter()
            .filter_map(|&idx| self.pool.get(idx))
            .map(|amount| i128::from(amount.value()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn checks_requirements_against_indices() -> TestResult {
        let problem = Problem::new(
            Pool::lenient(["3.00", "5.00", "3.00"]),
            RequiredMultiset::from_texts(["3.00", "3.00"])?,
            1100,
        );

        assert!(problem.meets_requirements(&[0, 1, 2]));
        assert!(!problem.meets_requirements(&[0, 1]));
        assert_eq!(problem.sum_of(&[0, 1, 2]), 1100);

        Ok(())
    }
}
