//! Solvers for exact-sum combinations

use std::num::NonZeroUsize;

use good_lp::ResolutionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{combinations::Combination, problem::Problem};

pub mod backtracking;
pub mod ilp;
pub mod observer;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// The range of reachable sums is too wide to index.
    #[error("reachable sums span [{min}, {max}], which is too wide to index")]
    SumRangeTooWide {
        /// Sum of every negative amount
        min: i128,

        /// Sum of every positive amount
        max: i128,
    },

    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {minor_units}"
    )]
    MinorUnitsNotRepresentable {
        /// Money amount in minor units
        minor_units: i64,
    },

    /// Wrapped solver resolution error
    #[error(transparent)]
    ResolutionError(#[from] ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Trait for finding the longest exact-sum combinations of a problem
pub trait Solver {
    /// Find at most `limit` combinations, longest first.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve(problem: &Problem, limit: NonZeroUsize) -> Result<Vec<Combination>, SolverError>;
}

/// Which solver to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exhaustive backtracking pruned by reachable sums, then ranked by length.
    #[default]
    Backtracking,

    /// Maximise cardinality with an integer program, then enumerate solutions of that length.
    Optimal,
}

impl Strategy {
    /// Run the selected solver.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    pub fn solve(
        self,
        problem: &Problem,
        limit: NonZeroUsize,
    ) -> Result<Vec<Combination>, SolverError> {
        match self {
            Strategy::Backtracking => backtracking::BacktrackingSolver::solve(problem, limit),
            Strategy::Optimal => ilp::ILPSolver::solve(problem, limit),
        }
    }
}
