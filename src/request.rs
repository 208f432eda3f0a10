//! Requests
//!
//! The single external operation: raw text in, the K longest exact-sum combinations out.
//! Every precondition is checked before any search starts.

use std::num::NonZeroUsize;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    amounts::{normalize_strict, to_decimal},
    pool::Pool,
    problem::Problem,
    ranking::{MatchResult, summarize},
    requirements::RequiredMultiset,
    solvers::{SolverError, Strategy},
};

/// Number of results returned when none is requested.
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// Offset added to reported positions when none is requested.
pub const DEFAULT_INDEX_OFFSET: usize = 8;

/// Errors in request input, detected before searching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The target does not parse.
    #[error("invalid target value: {0:?}")]
    InvalidTarget(String),

    /// A must-include value does not parse.
    #[error("must-include value {0:?} is invalid")]
    InvalidRequiredValue(String),

    /// No pool entry parsed.
    #[error("no input values provided")]
    EmptyPool,

    /// The pool holds fewer copies of a required value than demanded.
    #[error("need {required}×{value}, but only {available} available")]
    InsufficientSupply {
        /// Required value in major units
        value: Decimal,

        /// Number of occurrences demanded
        required: usize,

        /// Number of occurrences in the pool
        available: usize,
    },
}

/// Errors from running a request.
#[derive(Debug, Error)]
pub enum ReckonError {
    /// Wrapped request validation error
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Wrapped solver error
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A search request, as text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Request {
    /// Target sum, e.g. `"72,409.53"` or `"-1,329.70"`
    pub target: String,

    /// Values every combination must contain (repeat a value to require it more than once)
    #[serde(default)]
    pub must_include: Vec<String>,

    /// Pool of available values; entries that do not parse are skipped
    #[serde(default)]
    pub values: Vec<String>,

    /// Maximum number of combinations to return
    #[serde(default = "default_limit")]
    pub limit: NonZeroUsize,

    /// Offset added to every reported position
    #[serde(default = "default_index_offset")]
    pub index_offset: usize,
}

fn default_limit() -> NonZeroUsize {
    DEFAULT_LIMIT
}

fn default_index_offset() -> usize {
    DEFAULT_INDEX_OFFSET
}

impl Request {
    /// Creates a request with the default limit and index offset.
    pub fn new<M, V>(target: impl Into<String>, must_include: M, values: V) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            target: target.into(),
            must_include: must_include.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
            limit: DEFAULT_LIMIT,
            index_offset: DEFAULT_INDEX_OFFSET,
        }
    }

    /// Sets the maximum number of combinations to return.
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroUsize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the offset added to reported positions.
    #[must_use]
    pub fn with_index_offset(mut self, index_offset: usize) -> Self {
        self.index_offset = index_offset;
        self
    }

    /// Validates the request and builds the search problem.
    ///
    /// # Errors
    ///
    /// - [`RequestError::InvalidTarget`]: the target does not parse.
    /// - [`RequestError::InvalidRequiredValue`]: a must-include value does not parse.
    /// - [`RequestError::EmptyPool`]: no pool entry parses.
    /// - [`RequestError::InsufficientSupply`]: a required value is demanded more often than
    ///   the pool holds it.
    pub fn prepare(&self) -> Result<Problem, RequestError> {
        let target = normalize_strict(&self.target)
            .map_err(|err| RequestError::InvalidTarget(err.into_text()))?;

        let required = RequiredMultiset::from_texts(&self.must_include)
            .map_err(|err| RequestError::InvalidRequiredValue(err.into_text()))?;

        let pool = Pool::lenient(&self.values);

        if pool.is_empty() {
            return Err(RequestError::EmptyPool);
        }

        required
            .check_supply(&pool)
            .map_err(|shortfall| RequestError::InsufficientSupply {
                value: to_decimal(shortfall.value),
                required: shortfall.required,
                available: shortfall.available,
            })?;

        info!(values = pool.len(), "total input values");

        Ok(Problem::new(pool, required, target))
    }

    /// Validates the request, runs the chosen strategy and reports the results.
    ///
    /// # Errors
    ///
    /// Returns a [`ReckonError`] if the request is invalid or the solver fails.
    pub fn run(&self, strategy: Strategy) -> Result<Vec<MatchResult>, ReckonError> {
        let problem = self.prepare()?;

        let combinations = strategy.solve(&problem, self.limit)?;

        Ok(summarize(&combinations, &problem, self.index_offset))
    }
}

/// Finds the K longest combinations of `request.values` that sum exactly to
/// `request.target` with the default backtracking strategy.
///
/// # Errors
///
/// Returns a [`ReckonError`] if the request is invalid or the solver fails.
pub fn find_top_k_longest(request: &Request) -> Result<Vec<MatchResult>, ReckonError> {
    request.run(Strategy::default())
}
