//! Backtracking Solver
//!
//! Depth-first enumeration of every include/exclude decision over the pool, cut wherever
//! the [`ReachabilityIndex`] says the remaining amount cannot be made from what is left.
//! The search is exhaustive; ranking by length happens only once it has finished.

use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::{
    combinations::{Combination, IndexList},
    problem::Problem,
    ranking::rank,
    reachability::ReachabilityIndex,
    solvers::{
        Solver, SolverError,
        observer::{SearchObserver, SearchStats},
    },
};

/// Work left on the explicit search stack.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Decide the amount at `position` with `sum` chosen so far.
    Visit { position: usize, sum: i128 },

    /// Undo the most recent inclusion.
    Backtrack,
}

/// Solver using bitset-pruned exhaustive backtracking
#[derive(Debug)]
pub struct BacktrackingSolver;

impl Solver for BacktrackingSolver {
    fn solve(problem: &Problem, limit: NonZeroUsize) -> Result<Vec<Combination>, SolverError> {
        let mut stats = SearchStats::default();

        let ranked = Self::solve_with_observer(problem, limit, &mut stats)?;

        debug!(
            visited = stats.visited,
            pruned = stats.pruned,
            matched = stats.matched,
            rejected = stats.rejected,
            "backtracking search statistics"
        );

        Ok(ranked)
    }
}

impl BacktrackingSolver {
    /// Solve while reporting search events to `observer`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the reachability index cannot be built.
    pub fn solve_with_observer<O: SearchObserver>(
        problem: &Problem,
        limit: NonZeroUsize,
        observer: &mut O,
    ) -> Result<Vec<Combination>, SolverError> {
        let index = ReachabilityIndex::build(&problem.pool().values())?;

        let found = Self::enumerate(problem, &index, observer);

        info!(
            found = found.len(),
            limit = limit.get(),
            "backtracking search finished"
        );

        Ok(rank(found, limit))
    }

    /// Every combination that hits the target and meets the requirements, in discovery order.
    ///
    /// Discovery order is include-before-exclude from the first pool position. A branch ends
    /// as soon as its running sum equals the target, whether or not the requirements hold.
    /// The empty selection is never a match and never ends a branch.
    pub fn enumerate<O: SearchObserver>(
        problem: &Problem,
        index: &ReachabilityIndex,
        observer: &mut O,
    ) -> Vec<Combination> {
        let values = problem.pool().values();
        let target = i128::from(problem.target());

        let mut found = Vec::new();
        let mut chosen = IndexList::new();
        let mut stack = vec![Step::Visit { position: 0, sum: 0 }];

        while let Some(step) = stack.pop() {
            let (position, sum) = match step {
                Step::Visit { position, sum } => (position, sum),
                Step::Backtrack => {
                    chosen.pop();
                    continue;
                }
            };

            observer.on_visit(position, sum);

            if sum == target && !chosen.is_empty() {
                if problem.meets_requirements(&chosen) {
                    let combination = Combination::new(chosen.clone(), problem.target());
                    observer.on_match(&combination);
                    found.push(combination);
                } else {
                    observer.on_rejected(&chosen);
                }

                continue;
            }

            let Some(&value) = values.get(position) else {
                continue;
            };

            let remaining = target - sum;

            if !index.can_reach(position, remaining) {
                observer.on_prune(position, remaining);
                continue;
            }

            // Pushed in reverse: the include subtree runs first, then its inclusion is
            // undone, then the exclude subtree runs.
            stack.push(Step::Visit {
                position: position + 1,
                sum,
            });
            stack.push(Step::Backtrack);
            stack.push(Step::Visit {
                position: position + 1,
                sum: sum + i128::from(value),
            });
            chosen.push(position);
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{pool::Pool, requirements::RequiredMultiset};

    use super::*;

    fn problem(target: i64, values: &[i64], required: &[i64]) -> Problem {
        let mut multiset = RequiredMultiset::new();

        for &value in required {
            multiset.insert(value);
        }

        Problem::new(Pool::from_minor_units(values.iter().copied()), multiset, target)
    }

    fn limit(k: usize) -> Result<NonZeroUsize, &'static str> {
        NonZeroUsize::new(k).ok_or("limit must be non-zero")
    }

    fn indices(combinations: &[Combination]) -> Vec<Vec<usize>> {
        combinations
            .iter()
            .map(|combination| combination.indices().to_vec())
            .collect()
    }

    #[test]
    fn finds_the_pair_of_fives() -> TestResult {
        let problem = problem(1000, &[500, 500, 300], &[]);

        let result = BacktrackingSolver::solve(&problem, limit(3)?)?;

        assert_eq!(indices(&result), vec![vec![0, 1]]);
        assert_eq!(result.first().map(Combination::sum), Some(1000));

        Ok(())
    }

    #[test]
    fn zero_target_uses_both_opposites() -> TestResult {
        let problem = problem(0, &[500, -500], &[]);

        let result = BacktrackingSolver::solve(&problem, limit(3)?)?;

        assert_eq!(indices(&result), vec![vec![0, 1]]);

        Ok(())
    }

    #[test]
    fn discovery_order_is_include_first() -> TestResult {
        let problem = problem(600, &[100, 200, 300, 200, 500], &[]);
        let index = ReachabilityIndex::build(&problem.pool().values())?;

        let found = BacktrackingSolver::enumerate(&problem, &index, &mut SearchStats::default());

        assert_eq!(
            indices(&found),
            vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 4]]
        );

        Ok(())
    }

    #[test]
    fn keeps_the_longest_when_limited() -> TestResult {
        let problem = problem(600, &[100, 200, 300, 200, 500], &[]);

        let result = BacktrackingSolver::solve(&problem, limit(2)?)?;

        assert_eq!(indices(&result), vec![vec![0, 1, 2], vec![0, 2, 3]]);

        Ok(())
    }

    #[test]
    fn exact_match_ends_the_branch() -> TestResult {
        // 5 + 5 hits the target before 3 and -3 can be added.
        let problem = problem(1000, &[500, 500, 300, -300], &[]);

        let result = BacktrackingSolver::solve(&problem, limit(5)?)?;

        assert_eq!(indices(&result), vec![vec![0, 1]]);

        Ok(())
    }

    #[test]
    fn required_values_filter_matches() -> TestResult {
        let problem = problem(800, &[500, 500, 300, 400, 100], &[300]);

        let mut stats = SearchStats::default();
        let result = BacktrackingSolver::solve_with_observer(&problem, limit(5)?, &mut stats)?;

        assert_eq!(
            indices(&result),
            vec![vec![2, 3, 4], vec![0, 2], vec![1, 2]]
        );
        assert_eq!(stats.matched, 3);

        Ok(())
    }

    #[test]
    fn rejected_matches_are_reported() -> TestResult {
        let problem = problem(500, &[500, 200, 300], &[200]);

        let mut stats = SearchStats::default();
        let result = BacktrackingSolver::solve_with_observer(&problem, limit(5)?, &mut stats)?;

        assert_eq!(indices(&result), vec![vec![1, 2]]);
        assert_eq!(stats.rejected, 1);

        Ok(())
    }

    #[test]
    fn unreachable_target_finds_nothing() -> TestResult {
        let problem = problem(700, &[500, 300], &[]);

        let mut stats = SearchStats::default();
        let result = BacktrackingSolver::solve_with_observer(&problem, limit(3)?, &mut stats)?;

        assert!(result.is_empty());
        assert_eq!(stats.visited, 1);
        assert_eq!(stats.pruned, 1);

        Ok(())
    }

    #[test]
    fn handles_deep_pools_without_recursion() -> TestResult {
        let values = vec![1; 5000];
        let problem = problem(5000, &values, &[]);

        let result = BacktrackingSolver::solve(&problem, limit(1)?)?;

        assert_eq!(result.first().map(Combination::len), Some(5000));

        Ok(())
    }

    #[test]
    fn results_sum_to_target() -> TestResult {
        let values = [1250, -300, 475, 800, -125, 300, 1000, 25, -475, 650];
        let problem = problem(1500, &values, &[]);

        let result = BacktrackingSolver::solve(&problem, limit(50)?)?;

        assert!(!result.is_empty());

        for combination in &result {
            assert_eq!(problem.sum_of(combination.indices()), 1500);
        }

        let lengths: Vec<usize> = result.iter().map(Combination::len).collect();
        assert!(lengths.windows(2).all(|w| w.first() >= w.get(1)));

        Ok(())
    }
}
