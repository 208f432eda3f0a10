//! Reckon prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::{Amount, AmountError, normalize_lenient, normalize_strict},
    combinations::Combination,
    pool::Pool,
    problem::Problem,
    ranking::{Entry, MatchResult, rank},
    reachability::ReachabilityIndex,
    request::{ReckonError, Request, RequestError, find_top_k_longest},
    requirements::RequiredMultiset,
    solvers::{
        Solver, SolverError, Strategy,
        backtracking::BacktrackingSolver,
        ilp::ILPSolver,
        observer::{NoopObserver, SearchObserver, SearchStats},
    },
};
