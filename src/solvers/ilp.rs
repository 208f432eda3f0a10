//! ILP Solver
//!
//! Optimal-first strategy: an integer program first finds the largest number of amounts that
//! can hit the target while meeting the requirements, then the same program with that
//! cardinality fixed is re-solved to enumerate distinct combinations. Each solution found is
//! excluded from the next solve with a "no-good" cut.

use std::num::NonZeroUsize;

use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    constraint, variable,
};
use num_traits::ToPrimitive;
use smallvec::SmallVec;
use tracing::{debug, info};

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    combinations::{Combination, IndexList},
    problem::Problem,
    solvers::{Solver, SolverError},
};

/// Binary threshold for determining truthiness
pub const BINARY_THRESHOLD: f64 = 0.5;

type SelectionVariables = SmallVec<[Variable; 16]>;

/// Solver using Integer Linear Programming (ILP)
#[derive(Debug)]
pub struct ILPSolver;

impl Solver for ILPSolver {
    fn solve(problem: &Problem, limit: NonZeroUsize) -> Result<Vec<Combination>, SolverError> {
        if problem.pool().is_empty() {
            return Ok(Vec::new());
        }

        let Some(cardinality) = Self::maximum_cardinality(problem)? else {
            info!("no combination meets the target");
            return Ok(Vec::new());
        };

        debug!(cardinality, "maximum cardinality found");

        let mut found: Vec<Combination> = Vec::new();

        while found.len() < limit.get() {
            let Some(combination) = Self::next_combination(problem, cardinality, &found)? else {
                break;
            };

            found.push(combination);
        }

        info!(
            found = found.len(),
            limit = limit.get(),
            cardinality,
            "optimal search finished"
        );

        Ok(found)
    }
}

impl ILPSolver {
    /// The largest number of amounts that hit the target and meet every requirement.
    ///
    /// Returns `None` when no non-empty selection does.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the model cannot be built or solved.
    pub fn maximum_cardinality(problem: &Problem) -> Result<Option<usize>, SolverError> {
        let mut pb = ProblemVariables::new();
        let selection = selection_variables(problem, &mut pb);
        let cardinality = cardinality_expression(&selection);

        let mut model = pb.maximise(cardinality.clone()).using(default_solver);

        for rule in base_constraints(problem, &selection)? {
            model = model.with(rule);
        }

        // The empty selection never counts as a combination.
        model = model.with(constraint::geq(cardinality, 1));

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let chosen = selected_indices(&solution, &selection);

        verify(problem, &chosen)?;

        Ok(Some(chosen.len()))
    }

    /// Finds a combination of exactly `cardinality` amounts not already in `found`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the model cannot be built or solved.
    fn next_combination(
        problem: &Problem,
        cardinality: usize,
        found: &[Combination],
    ) -> Result<Option<Combination>, SolverError> {
        let mut pb = ProblemVariables::new();
        let selection = selection_variables(problem, &mut pb);
        let objective = cardinality_expression(&selection);

        let mut model = pb.maximise(objective.clone()).using(default_solver);

        for rule in base_constraints(problem, &selection)? {
            model = model.with(rule);
        }

        model = model.with(constraint::eq(objective, count_to_f64(cardinality)?));

        for previous in found {
            model = model.with(no_good_cut(&selection, previous)?);
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let chosen = selected_indices(&solution, &selection);

        verify(problem, &chosen)?;

        if chosen.len() != cardinality {
            return Err(SolverError::InvariantViolation {
                message: "solution cardinality differs from the fixed cardinality",
            });
        }

        Ok(Some(Combination::new(chosen, problem.target())))
    }
}

/// One binary variable per pool position: 1 if the amount is chosen.
fn selection_variables(problem: &Problem, pb: &mut ProblemVariables) -> SelectionVariables {
    (0..problem.pool().len())
        .map(|_| pb.add(variable().binary()))
        .collect()
}

fn cardinality_expression(selection: &[Variable]) -> Expression {
    let mut cardinality = Expression::default();

    for var in selection {
        cardinality += Expression::from(*var);
    }

    cardinality
}

/// Exact-sum and minimum-multiplicity constraints shared by both phases.
///
/// # Errors
///
/// Returns [`SolverError::MinorUnitsNotRepresentable`] if an amount or the target cannot be
/// used as an exact solver coefficient.
fn base_constraints(
    problem: &Problem,
    selection: &[Variable],
) -> Result<Vec<Constraint>, SolverError> {
    let mut total = Expression::default();

    for (var, amount) in selection.iter().zip(problem.pool().iter()) {
        total += *var * minor_units_to_f64(amount.value())?;
    }

    let mut rules = vec![constraint::eq(total, minor_units_to_f64(problem.target())?)];

    for (value, required) in problem.required().requirements() {
        let mut occurrences = Expression::default();

        for (var, amount) in selection.iter().zip(problem.pool().iter()) {
            if amount.value() == value {
                occurrences += Expression::from(*var);
            }
        }

        rules.push(constraint::geq(occurrences, count_to_f64(required)?));
    }

    Ok(rules)
}

/// Forbids choosing every position of `previous` again.
fn no_good_cut(selection: &[Variable], previous: &Combination) -> Result<Constraint, SolverError> {
    let mut overlap = Expression::default();

    for &idx in previous.indices() {
        let var = selection.get(idx).ok_or(SolverError::InvariantViolation {
            message: "previous combination refers to a position outside the pool",
        })?;

        overlap += Expression::from(*var);
    }

    Ok(constraint::leq(
        overlap,
        count_to_f64(previous.len().saturating_sub(1))?,
    ))
}

fn selected_indices(solution: &impl Solution, selection: &[Variable]) -> IndexList {
    // Binary variables come back as floats; treat values above 0.5 as chosen to tolerate
    // numerical noise.
    selection
        .iter()
        .enumerate()
        .filter_map(|(idx, var)| (solution.value(*var) > BINARY_THRESHOLD).then_some(idx))
        .collect()
}

/// Re-checks a solver answer with exact integer arithmetic.
fn verify(problem: &Problem, chosen: &[usize]) -> Result<(), SolverError> {
    if problem.sum_of(chosen) != i128::from(problem.target()) {
        return Err(SolverError::InvariantViolation {
            message: "solution does not sum exactly to the target",
        });
    }

    if !problem.meets_requirements(chosen) {
        return Err(SolverError::InvariantViolation {
            message: "solution does not meet the required values",
        });
    }

    Ok(())
}

/// `good_lp` stores coefficients as `f64`. Only integers with absolute value <= 2^53 can be
/// represented exactly, so refuse anything that does not survive a round trip.
fn minor_units_to_f64(minor_units: i64) -> Result<f64, SolverError> {
    i64_to_f64_exact(minor_units).ok_or(SolverError::MinorUnitsNotRepresentable { minor_units })
}

fn count_to_f64(count: usize) -> Result<f64, SolverError> {
    count
        .to_i64()
        .and_then(i64_to_f64_exact)
        .ok_or(SolverError::InvariantViolation {
            message: "count cannot be represented as a solver coefficient",
        })
}

/// Convert an `i64` to an `f64` if it can be represented exactly.
fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
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

    #[test]
    fn finds_the_pair_of_fives() -> TestResult {
        let problem = problem(1000, &[500, 500, 300], &[]);

        let result = ILPSolver::solve(&problem, limit(3)?)?;

        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(Combination::indices), Some(&[0, 1][..]));

        Ok(())
    }

    #[test]
    fn maximises_cardinality() -> TestResult {
        let problem = problem(1000, &[500, 500, 300, -300], &[]);

        assert_eq!(ILPSolver::maximum_cardinality(&problem)?, Some(4));

        let result = ILPSolver::solve(&problem, limit(3)?)?;

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.first().map(Combination::indices),
            Some(&[0, 1, 2, 3][..])
        );

        Ok(())
    }

    #[test]
    fn enumerates_distinct_solutions_of_maximum_length() -> TestResult {
        let problem = problem(600, &[100, 200, 300, 200, 500], &[]);

        let result = ILPSolver::solve(&problem, limit(5)?)?;

        let mut found: Vec<Vec<usize>> = result
            .iter()
            .map(|combination| combination.indices().to_vec())
            .collect();
        found.sort();

        assert_eq!(found, vec![vec![0, 1, 2], vec![0, 2, 3]]);

        Ok(())
    }

    #[test]
    fn stops_at_the_limit() -> TestResult {
        let problem = problem(600, &[100, 200, 300, 200, 500], &[]);

        let result = ILPSolver::solve(&problem, limit(1)?)?;

        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(Combination::len), Some(3));

        Ok(())
    }

    #[test]
    fn honours_required_values() -> TestResult {
        let problem = problem(800, &[500, 500, 300, 400, 100], &[300]);

        let result = ILPSolver::solve(&problem, limit(3)?)?;

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.first().map(Combination::indices),
            Some(&[2, 3, 4][..])
        );

        Ok(())
    }

    #[test]
    fn infeasible_target_finds_nothing() -> TestResult {
        let problem = problem(700, &[500, 300], &[]);

        assert_eq!(ILPSolver::maximum_cardinality(&problem)?, None);
        assert!(ILPSolver::solve(&problem, limit(3)?)?.is_empty());

        Ok(())
    }

    #[test]
    fn zero_target_excludes_the_empty_selection() -> TestResult {
        let problem = problem(0, &[500, -500], &[]);

        let result = ILPSolver::solve(&problem, limit(3)?)?;

        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(Combination::len), Some(2));

        Ok(())
    }

    #[test]
    fn rejects_coefficients_that_are_not_exact() {
        let problem = problem(1, &[i64::MAX], &[]);

        let result = ILPSolver::solve(&problem, NonZeroUsize::MIN);

        assert!(matches!(
            result,
            Err(SolverError::MinorUnitsNotRepresentable { minor_units }) if minor_units == i64::MAX
        ));
    }

    #[test]
    fn exact_conversion() {
        assert_eq!(i64_to_f64_exact(0), Some(0.0));
        assert_eq!(i64_to_f64_exact(-123_456), Some(-123_456.0));
        assert_eq!(i64_to_f64_exact(i64::MAX), None);
    }
}
