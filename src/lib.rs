//! Reckon
//!
//! Reckon finds the longest subsets of a pool of monetary amounts whose sum is exactly a
//! target, optionally forcing certain values into every subset. A suffix reachability index
//! prunes the backtracking search; an ILP strategy is available as an alternative.

pub mod amounts;
pub mod combinations;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod pool;
pub mod prelude;
pub mod problem;
pub mod ranking;
pub mod reachability;
pub mod report;
pub mod request;
pub mod requirements;
pub mod solvers;
